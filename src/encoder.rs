//! The encoder front end: compaction, error correction level, geometry and
//! the cached module matrix of one symbol.

use log::debug;

use crate::builder::{Bitmap, ModuleMatrix};
use crate::config::{CharacterSet, EncoderConfig, GlobalLabel};
use crate::dimension::{self, Geometry};
use crate::ecc::{ecc_count, generate_ecc, select_level};
use crate::high_level::{compact, CW_PADDING};
use crate::{GeometryRejected, Pdf417Error};

/// Encodes bytes into a PDF417 symbol.
///
/// ```ignore
/// let mut encoder = Pdf417Encoder::default();
/// encoder.encode(b"PDF417 in a PDF document")?;
/// encoder.width_to_height_ratio(3.0).ok();
/// let bitmap = encoder.bitmap()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pdf417Encoder {
    config: EncoderConfig,
    /// Length slot, GLI and compacted data, without padding
    data: Vec<u16>,
    level: u8,
    geometry: Option<Geometry>,
    matrix: Option<ModuleMatrix>,
}

impl Pdf417Encoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config, ..Default::default() }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Parameters changed here apply to the next encode, dimensioning or
    /// rendering request.
    pub fn config_mut(&mut self) -> &mut EncoderConfig {
        &mut self.config
    }

    /// Encodes `data`, replacing any previous symbol.
    pub fn encode(&mut self, data: &[u8]) -> Result<(), Pdf417Error> {
        let label = *self.config.global_label();
        self.encode_with_label(data, &label)
    }

    /// Encodes a string. Non ASCII strings are stored as UTF-8 bytes behind a
    /// UTF-8 character set identifier.
    pub fn encode_str(&mut self, text: &str) -> Result<(), Pdf417Error> {
        let mut label = *self.config.global_label();
        if !text.is_ascii() {
            label.character_set = Some(CharacterSet::Utf8);
        }
        self.encode_with_label(text.as_bytes(), &label)
    }

    fn encode_with_label(&mut self, data: &[u8], label: &GlobalLabel) -> Result<(), Pdf417Error> {
        self.data.clear();
        self.geometry = None;
        self.matrix = None;

        if data.is_empty() {
            return Err(Pdf417Error::EmptyInput);
        }

        // slot 0 receives the length once the geometry is known
        let mut codewords = vec![0];
        label.write(&mut codewords);
        compact(data, self.config.encoding_control(), &mut codewords)?;

        let level = select_level(self.config.error_correction(), codewords.len());
        let geometry = dimension::default_fit(codewords.len(), ecc_count(level), self.config.default_columns() as usize)?;
        debug!("{} bytes -> {} data codewords, level {}, {}x{}",
            data.len(), codewords.len(), level, geometry.rows, geometry.cols);

        self.data = codewords;
        self.level = level;
        self.geometry = Some(geometry);
        Ok(())
    }

    fn apply(&mut self, geometry: Result<Geometry, GeometryRejected>) -> Result<(), GeometryRejected> {
        let geometry = geometry?;
        debug!("geometry set to {}x{}", geometry.rows, geometry.cols);
        self.geometry = Some(geometry);
        self.matrix = None;
        Ok(())
    }

    /// Forces the number of data columns, rows follow.
    pub fn set_data_columns(&mut self, cols: usize) -> Result<(), GeometryRejected> {
        if self.geometry.is_none() {
            return Err(GeometryRejected::NotEncoded);
        }
        self.apply(dimension::with_columns(self.data.len(), self.error_correction_length(), cols))
    }

    /// Forces the number of data rows, columns follow.
    pub fn set_data_rows(&mut self, rows: usize) -> Result<(), GeometryRejected> {
        if self.geometry.is_none() {
            return Err(GeometryRejected::NotEncoded);
        }
        self.apply(dimension::with_rows(self.data.len(), self.error_correction_length(), rows))
    }

    /// Picks the column count whose image width divided by image height is
    /// closest to `ratio`.
    pub fn width_to_height_ratio(&mut self, ratio: f64) -> Result<(), GeometryRejected> {
        if self.geometry.is_none() {
            return Err(GeometryRejected::NotEncoded);
        }
        self.apply(dimension::with_ratio(self.data.len(), self.error_correction_length(), ratio, &self.config))
    }

    pub fn geometry(&self) -> Option<Geometry> {
        self.geometry
    }

    pub fn data_rows(&self) -> usize {
        self.geometry.map_or(0, |g| g.rows)
    }

    pub fn data_columns(&self) -> usize {
        self.geometry.map_or(0, |g| g.cols)
    }

    pub fn error_correction_level(&self) -> u8 {
        self.level
    }

    pub fn error_correction_length(&self) -> usize {
        if self.geometry.is_some() { ecc_count(self.level) } else { 0 }
    }

    /// Length slot, GLI and compacted data codewords, before padding.
    pub fn data_codewords(&self) -> &[u16] {
        &self.data
    }

    /// Padding codewords needed by the current geometry.
    pub fn padding_count(&self) -> usize {
        self.geometry.map_or(0, |g| g.capacity() - self.error_correction_length() - self.data.len())
    }

    /// Modules in one row of the symbol.
    pub fn module_width(&self) -> usize {
        self.geometry.map_or(0, |g| g.module_width())
    }

    pub fn image_width(&self) -> u32 {
        self.geometry.map_or(0, |g| g.image_size(&self.config).0)
    }

    pub fn image_height(&self) -> u32 {
        self.geometry.map_or(0, |g| g.image_size(&self.config).1)
    }

    /// The complete codeword sequence: length, data, padding and error
    /// correction.
    pub fn codewords(&self) -> Result<Vec<u16>, Pdf417Error> {
        let geometry = self.geometry.ok_or(Pdf417Error::NotEncoded)?;
        let total = geometry.capacity() - self.error_correction_length();

        let mut codewords = self.data.clone();
        codewords.resize(total, CW_PADDING);
        codewords[0] = total as u16;
        codewords.resize(geometry.capacity(), 0);
        generate_ecc(&mut codewords, self.level);
        Ok(codewords)
    }

    /// Module matrix of the current geometry, rebuilt after any change.
    pub fn matrix(&mut self) -> Result<&ModuleMatrix, Pdf417Error> {
        let geometry = self.geometry.ok_or(Pdf417Error::NotEncoded)?;
        if self.matrix.is_none() {
            let codewords = self.codewords()?;
            self.matrix = Some(ModuleMatrix::build(&codewords, geometry, self.level));
        }
        self.matrix.as_ref().ok_or(Pdf417Error::NotEncoded)
    }

    /// Renders the symbol with the configured bar width, row height, quiet
    /// zone and colors.
    pub fn bitmap(&mut self) -> Result<Bitmap, Pdf417Error> {
        let config = &self.config;
        let (bar_width, row_height, quiet_zone, inverted) =
            (config.bar_width(), config.row_height(), config.quiet_zone(), config.inverted());
        Ok(self.matrix()?.rasterize(bar_width, row_height, quiet_zone, inverted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EncodingControl, ErrorCorrection};

    fn encoded(data: &[u8]) -> Pdf417Encoder {
        let mut encoder = Pdf417Encoder::default();
        encoder.encode(data).unwrap();
        encoder
    }

    fn byte_only() -> Pdf417Encoder {
        let mut config = EncoderConfig::default();
        config.set_encoding_control(EncodingControl::ByteOnly);
        Pdf417Encoder::new(config)
    }

    fn assert_length_invariant(encoder: &Pdf417Encoder) {
        assert_eq!(encoder.data_rows() * encoder.data_columns(),
            encoder.data_codewords().len() + encoder.padding_count() + encoder.error_correction_length());
    }

    #[test]
    fn test_encode_text_symbol() {
        let encoder = encoded(b"PDF FILE WRITER");
        assert_eq!(encoder.data_codewords(), [0, 900, 453, 176, 158, 334, 802, 518, 574, 539]);
        assert_eq!(encoder.error_correction_level(), 2);
        assert_eq!(encoder.geometry(), Some(Geometry { rows: 6, cols: 3 }));
        assert_eq!(encoder.codewords().unwrap(), [
            10, 900, 453, 176, 158, 334, 802, 518, 574, 539,
            // ecc
            887, 566, 255, 629, 496, 260, 291, 275
        ]);
    }

    #[test]
    fn test_empty_input() {
        let mut encoder = Pdf417Encoder::default();
        assert_eq!(encoder.encode(b""), Err(Pdf417Error::EmptyInput));
        assert_eq!(encoder.matrix().err(), Some(Pdf417Error::NotEncoded));
        assert_eq!(encoder.set_data_columns(3), Err(GeometryRejected::NotEncoded));
    }

    #[test]
    fn test_overflow() {
        let mut encoder = byte_only();
        assert!(matches!(encoder.encode(&[0u8; 1200]), Err(Pdf417Error::Overflow { .. })));
        assert_eq!(encoder.geometry(), None);
    }

    #[test]
    fn test_length_invariant() {
        let inputs: [&[u8]; 4] = [b"a", b"Hello, World!", b"0123456789012345678901234567890123456789", &[0xAB; 300]];
        for input in inputs {
            let mut encoder = encoded(input);
            assert_length_invariant(&encoder);
            for cols in 1..=30 {
                if encoder.set_data_columns(cols).is_ok() {
                    assert_eq!(encoder.data_columns(), cols);
                    assert_length_invariant(&encoder);
                    assert_eq!(encoder.codewords().unwrap().len(), encoder.data_rows() * cols);
                }
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let data = b"Invoice 2024-0042\r\nTotal: 1234567890123.45 EUR\x00\x01";
        let mut first = encoded(data);
        let mut second = encoded(data);
        assert_eq!(first.codewords().unwrap(), second.codewords().unwrap());
        assert_eq!(first.matrix().unwrap(), second.matrix().unwrap());
    }

    #[test]
    fn test_geometry_bounds() {
        let mut encoder = encoded(b"PDF FILE WRITER");
        let before = encoder.geometry();
        assert_eq!(encoder.set_data_columns(0), Err(GeometryRejected::ColumnsOutOfRange(0)));
        assert_eq!(encoder.set_data_columns(31), Err(GeometryRejected::ColumnsOutOfRange(31)));
        assert_eq!(encoder.set_data_rows(2), Err(GeometryRejected::RowsOutOfRange(2)));
        assert_eq!(encoder.set_data_rows(91), Err(GeometryRejected::RowsOutOfRange(91)));
        assert_eq!(encoder.geometry(), before);
    }

    #[test]
    fn test_redimension_keeps_data_and_level() {
        let mut encoder = encoded(b"Redimensioning keeps the data codewords");
        let data = encoder.data_codewords().to_vec();
        let level = encoder.error_correction_level();
        let before = encoder.codewords().unwrap();

        encoder.set_data_columns(6).unwrap();
        let after = encoder.codewords().unwrap();
        assert_eq!(encoder.error_correction_level(), level);
        assert_eq!(after.len() - encoder.error_correction_length(), after[0] as usize);
        assert_eq!(before[1..data.len()], after[1..data.len()]);
        assert!(after[data.len()..after[0] as usize].iter().all(|&cw| cw == CW_PADDING));
    }

    #[test]
    fn test_set_data_rows() {
        let mut encoder = encoded(b"PDF FILE WRITER");
        encoder.set_data_rows(3).unwrap();
        assert_eq!(encoder.geometry(), Some(Geometry { rows: 3, cols: 6 }));
        assert_eq!(encoder.matrix().unwrap().rows(), 3);
    }

    #[test]
    fn test_ratio_fit() {
        let mut encoder = byte_only();
        encoder.encode(&[0u8; 600]).unwrap();
        // too tall at 3 columns
        assert_eq!(encoder.geometry(), Some(Geometry { rows: 81, cols: 7 }));

        encoder.width_to_height_ratio(2.5).unwrap();
        assert_eq!(encoder.geometry(), Some(Geometry { rows: 41, cols: 14 }));
        assert_eq!((encoder.image_width(), encoder.image_height()), (622, 254));

        let before = encoder.geometry();
        assert!(encoder.width_to_height_ratio(1000.0).is_err());
        assert_eq!(encoder.geometry(), before);
    }

    #[test]
    fn test_matrix_invalidated() {
        let mut encoder = encoded(b"PDF FILE WRITER");
        assert_eq!(encoder.matrix().unwrap().width(), 17 * 7 + 1);
        encoder.set_data_columns(5).unwrap();
        assert_eq!(encoder.matrix().unwrap().width(), 17 * 9 + 1);
        encoder.encode(&[0u8; 600]).unwrap();
        let rows = encoder.data_rows();
        assert_eq!(encoder.matrix().unwrap().rows(), rows);
    }

    #[test]
    fn test_bitmap_size() {
        let mut encoder = encoded(b"PDF FILE WRITER");
        encoder.config_mut().set_bar_width(3).unwrap();
        let bitmap = encoder.bitmap().unwrap();
        assert_eq!(bitmap.width() as u32, encoder.image_width());
        assert_eq!(bitmap.height() as u32, encoder.image_height());
        assert_eq!(encoder.image_width(), 3 * (17 * 7 + 1) + 12);
        assert_eq!(encoder.image_height(), 9 * 6 + 12);
    }

    #[test]
    fn test_matrix_rows() {
        let mut encoder = encoded(b"PDF FILE WRITER");
        let expected = [
            "111111110101010001111010101111000011010100000110000100001100011001001110111011001100011111010101111100111111101000101001",
            "111111110101010001111010100001000011010000111001000110100011111011101001001111100110011111101010111000111111101000101001",
            "111111110101010001010100111100000011100111110100110111101111010111101100111000100111010101000011110000111111101000101001",
            "111111110101010001010111100111100011000100001101110110001110011010001100010000010110011010111100111110111111101000101001",
            "111111110101010001101011100000100011001011110000110111001100011101001111110011010110011101011100110000111111101000101001",
            "111111110101010001111101011110110010110001001110000101100000010111001011000010111000011110101111101100111111101000101001",
        ];
        let matrix = encoder.matrix().unwrap();
        assert_eq!(matrix.rows(), expected.len());
        for (row, modules) in expected.iter().enumerate() {
            let actual: String = matrix.row(row).iter().map(|&on| if on { '1' } else { '0' }).collect();
            assert_eq!(actual, *modules, "row {row}");
        }
    }

    #[test]
    fn test_global_label() {
        let mut config = EncoderConfig::default();
        config.set_character_set(Some(CharacterSet::Iso8859(1))).unwrap();
        config.set_user_defined_label(Some(811_000)).unwrap();
        let mut encoder = Pdf417Encoder::new(config);
        encoder.encode(b"PDF FILE WRITER").unwrap();
        assert_eq!(encoder.data_codewords()[..6], [0, 927, 3, 925, 100, 900]);
    }

    #[test]
    fn test_encode_str_utf8() {
        let mut encoder = Pdf417Encoder::default();
        encoder.encode_str("Grüße").unwrap();
        assert_eq!(encoder.data_codewords(), [0, 927, 26, 901, 119, 661, 576, 235, 307, 101]);
        assert_eq!(encoder.config().global_label().character_set, None);

        encoder.encode_str("PDF FILE WRITER").unwrap();
        assert_eq!(encoder.data_codewords()[1], 900);
    }

    #[test]
    fn test_explicit_level() {
        let mut config = EncoderConfig::default();
        config.set_error_correction(ErrorCorrection::Level(0)).unwrap();
        let mut encoder = Pdf417Encoder::new(config);
        encoder.encode(b"PDF FILE WRITER").unwrap();
        assert_eq!(encoder.error_correction_length(), 2);
        assert_eq!(encoder.geometry(), Some(Geometry { rows: 4, cols: 3 }));
        assert_eq!(encoder.padding_count(), 0);
    }
}
