//! Encoder tuning parameters.

use crate::Pdf417Error;
use crate::dimension::{MIN_COLS, MAX_COLS};

/// ECI value of the UTF-8 character set.
pub const ECI_UTF8: u16 = 26;

/// Error correction selection. The automatic variants pick a level from the
/// number of data codewords and shift it by a bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorCorrection {
    /// Fixed level between 0 and 8
    Level(u8),
    AutoLow,
    #[default]
    AutoNormal,
    AutoMedium,
    AutoHigh,
}

/// Which compaction modes the segmenter may choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodingControl {
    /// Numeric, text and byte compaction
    #[default]
    Auto,
    /// Never use numeric compaction
    TextAndByte,
    /// Encode the whole input as a single byte run
    ByteOnly,
}

/// Character set declared through a GLI (codeword 927).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterSet {
    /// ISO-8859 part number (1 to 16, 12 does not exist)
    Iso8859(u8),
    Utf8,
}

impl CharacterSet {
    /// ECI assignment number of this character set.
    pub const fn eci(&self) -> u16 {
        match self {
            CharacterSet::Iso8859(part) => *part as u16 + 2,
            CharacterSet::Utf8 => ECI_UTF8,
        }
    }
}

/// Optional Global Label Identifiers emitted right after the length codeword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlobalLabel {
    pub character_set: Option<CharacterSet>,
    /// 900 to 810899
    pub general_purpose: Option<u32>,
    /// 810900 to 811799
    pub user_defined: Option<u32>,
}

/// Codeword introducing a user defined GLI
pub const GLI_USER_DEFINED: u16 = 925;
/// Codeword introducing a general purpose GLI
pub const GLI_GENERAL_PURPOSE: u16 = 926;
/// Codeword introducing a character set GLI
pub const GLI_CHARACTER_SET: u16 = 927;

pub const GENERAL_PURPOSE_RANGE: core::ops::RangeInclusive<u32> = 900..=810_899;
pub const USER_DEFINED_RANGE: core::ops::RangeInclusive<u32> = 810_900..=811_799;

impl GlobalLabel {
    /// Appends the GLI codeword sequences in character set, general purpose,
    /// user defined order.
    pub fn write(&self, out: &mut Vec<u16>) {
        if let Some(set) = self.character_set {
            out.extend([GLI_CHARACTER_SET, set.eci()]);
        }
        if let Some(value) = self.general_purpose {
            out.extend([GLI_GENERAL_PURPOSE, (value / 900 - 1) as u16, (value % 900) as u16]);
        }
        if let Some(value) = self.user_defined {
            out.extend([GLI_USER_DEFINED, (value - USER_DEFINED_RANGE.start()) as u16]);
        }
    }
}

/// Every tunable of the encoder. Setters validate immediately and refuse
/// out of range values.
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderConfig {
    error_correction: ErrorCorrection,
    encoding_control: EncodingControl,
    default_columns: u8,
    bar_width: u32,
    row_height: u32,
    quiet_zone: u32,
    inverted: bool,
    global_label: GlobalLabel,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            error_correction: ErrorCorrection::AutoNormal,
            encoding_control: EncodingControl::Auto,
            default_columns: 3,
            bar_width: 2,
            row_height: 6,
            quiet_zone: 4,
            inverted: false,
            global_label: GlobalLabel::default(),
        }
    }
}

fn invalid(name: &'static str, value: impl Into<i64>, expected: &'static str) -> Pdf417Error {
    Pdf417Error::InvalidParameter { name, value: value.into(), expected }
}

impl EncoderConfig {
    pub const fn error_correction(&self) -> ErrorCorrection {
        self.error_correction
    }

    pub fn set_error_correction(&mut self, ec: ErrorCorrection) -> Result<(), Pdf417Error> {
        if let ErrorCorrection::Level(level) = ec {
            if level > 8 {
                return Err(invalid("error correction level", level, "0..=8"));
            }
        }
        self.error_correction = ec;
        Ok(())
    }

    pub const fn encoding_control(&self) -> EncodingControl {
        self.encoding_control
    }

    pub fn set_encoding_control(&mut self, control: EncodingControl) {
        self.encoding_control = control;
    }

    /// Number of data columns used by the default fit.
    pub const fn default_columns(&self) -> u8 {
        self.default_columns
    }

    pub fn set_default_columns(&mut self, cols: u8) -> Result<(), Pdf417Error> {
        if !(MIN_COLS..=MAX_COLS).contains(&(cols as usize)) {
            return Err(invalid("default columns", cols, "1..=30"));
        }
        self.default_columns = cols;
        Ok(())
    }

    /// Width in pixels of the narrowest bar.
    pub const fn bar_width(&self) -> u32 {
        self.bar_width
    }

    /// Sets the narrow bar width. Row height and quiet zone are reset to
    /// their minimum for this width (3x and 2x).
    pub fn set_bar_width(&mut self, width: u32) -> Result<(), Pdf417Error> {
        if width < 1 {
            return Err(invalid("bar width", width, "at least 1"));
        }
        self.bar_width = width;
        self.row_height = 3 * width;
        self.quiet_zone = 2 * width;
        Ok(())
    }

    pub const fn row_height(&self) -> u32 {
        self.row_height
    }

    pub fn set_row_height(&mut self, height: u32) -> Result<(), Pdf417Error> {
        if height < 3 * self.bar_width {
            return Err(invalid("row height", height, "at least 3 times the bar width"));
        }
        self.row_height = height;
        Ok(())
    }

    pub const fn quiet_zone(&self) -> u32 {
        self.quiet_zone
    }

    pub fn set_quiet_zone(&mut self, width: u32) -> Result<(), Pdf417Error> {
        if width < 2 * self.bar_width {
            return Err(invalid("quiet zone", width, "at least 2 times the bar width"));
        }
        self.quiet_zone = width;
        Ok(())
    }

    pub const fn inverted(&self) -> bool {
        self.inverted
    }

    /// Renders white bars on black when set.
    pub fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
    }

    pub const fn global_label(&self) -> &GlobalLabel {
        &self.global_label
    }

    pub fn set_character_set(&mut self, set: Option<CharacterSet>) -> Result<(), Pdf417Error> {
        if let Some(CharacterSet::Iso8859(part)) = set {
            if !(1..=16).contains(&part) || part == 12 {
                return Err(invalid("ISO-8859 part", part, "1..=16 except 12"));
            }
        }
        self.global_label.character_set = set;
        Ok(())
    }

    pub fn set_general_purpose_label(&mut self, value: Option<u32>) -> Result<(), Pdf417Error> {
        if let Some(v) = value {
            if !GENERAL_PURPOSE_RANGE.contains(&v) {
                return Err(invalid("general purpose GLI", v, "900..=810899"));
            }
        }
        self.global_label.general_purpose = value;
        Ok(())
    }

    pub fn set_user_defined_label(&mut self, value: Option<u32>) -> Result<(), Pdf417Error> {
        if let Some(v) = value {
            if !USER_DEFINED_RANGE.contains(&v) {
                return Err(invalid("user defined GLI", v, "810900..=811799"));
            }
        }
        self.global_label.user_defined = value;
        Ok(())
    }
}
