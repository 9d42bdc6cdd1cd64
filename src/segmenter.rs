//! Splits the input into runs for the numeric, text and byte compactors.

use crate::config::EncodingControl;

/// Minimum number of consecutive digits worth a numeric run.
pub const MIN_NUMERIC_RUN: usize = 13;
/// Minimum number of consecutive text eligible bytes worth a text run.
pub const MIN_TEXT_RUN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Numeric,
    Text,
    Byte,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub kind: RunKind,
    pub len: usize,
}

/// Printable ASCII plus CR, LF and TAB.
#[inline]
pub const fn is_text(b: u8) -> bool {
    matches!(b, 0x20..=0x7E | b'\r' | b'\n' | b'\t')
}

fn digit_run(data: &[u8]) -> usize {
    data.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Counts text eligible bytes. When `numeric` is set, stops right before a
/// block of [MIN_NUMERIC_RUN] digits so that it can be picked up by the
/// numeric compactor.
fn text_run(data: &[u8], numeric: bool) -> usize {
    let mut digits = 0;
    for (i, &b) in data.iter().enumerate() {
        if !is_text(b) {
            return i;
        }
        if b.is_ascii_digit() {
            digits += 1;
            if numeric && digits == MIN_NUMERIC_RUN {
                return i + 1 - MIN_NUMERIC_RUN;
            }
        } else {
            digits = 0;
        }
    }
    data.len()
}

/// Counts bytes up to the first stretch of [MIN_TEXT_RUN] text eligible
/// bytes. Always at least one.
fn byte_run(data: &[u8]) -> usize {
    let mut text = 0;
    for (i, &b) in data.iter().enumerate() {
        if is_text(b) {
            text += 1;
            if text == MIN_TEXT_RUN {
                return (i + 1 - MIN_TEXT_RUN).max(1);
            }
        } else {
            text = 0;
        }
    }
    data.len().max(1)
}

/// Decides the kind and length of the run starting at the beginning of
/// `data`, which must not be empty.
pub fn next_run(data: &[u8], control: EncodingControl) -> Run {
    debug_assert!(!data.is_empty());

    if control == EncodingControl::ByteOnly {
        return Run { kind: RunKind::Byte, len: data.len() };
    }

    let numeric = control == EncodingControl::Auto;
    if numeric {
        let len = digit_run(data);
        if len >= MIN_NUMERIC_RUN {
            return Run { kind: RunKind::Numeric, len };
        }
    }

    let len = text_run(data, numeric);
    if len >= MIN_TEXT_RUN {
        return Run { kind: RunKind::Text, len };
    }

    Run { kind: RunKind::Byte, len: byte_run(data) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::RunKind::*;

    fn kinds(mut data: &[u8], control: EncodingControl) -> Vec<(RunKind, usize)> {
        let mut runs = Vec::new();
        while !data.is_empty() {
            let run = next_run(data, control);
            runs.push((run.kind, run.len));
            data = &data[run.len..];
        }
        runs
    }

    #[test]
    fn test_twelve_digits_stay_in_text() {
        assert_eq!(kinds(b"abcde123456789012fghij", EncodingControl::Auto), [(Text, 22)]);
    }

    #[test]
    fn test_thirteen_digits_are_numeric() {
        assert_eq!(kinds(b"abcde1234567890123fghij", EncodingControl::Auto),
            [(Text, 5), (Numeric, 13), (Text, 5)]);
    }

    #[test]
    fn test_text_threshold() {
        assert_eq!(kinds(b"\x80abcd\x81", EncodingControl::Auto), [(Byte, 6)]);
        assert_eq!(kinds(b"\x80abcde\x81", EncodingControl::Auto), [(Byte, 1), (Text, 5), (Byte, 1)]);
    }

    #[test]
    fn test_short_text_before_digits_falls_back_to_bytes() {
        assert_eq!(kinds(b"ab1234567890123", EncodingControl::Auto),
            [(Byte, 1), (Byte, 1), (Numeric, 13)]);
    }

    #[test]
    fn test_text_and_byte_never_numeric() {
        assert_eq!(kinds(b"12345678901234567890", EncodingControl::TextAndByte), [(Text, 20)]);
    }

    #[test]
    fn test_byte_only() {
        assert_eq!(kinds(b"Hello 12345678901234567890", EncodingControl::ByteOnly), [(Byte, 26)]);
    }

    #[test]
    fn test_long_digit_run() {
        let data = [b'7'; 100];
        assert_eq!(kinds(&data, EncodingControl::Auto), [(Numeric, 100)]);
    }

    #[test]
    fn test_runs_cover_input() {
        let data = b"\x00\x01Invoice 4711\r\n\xff\xfe0000000000000000 total: 12.50 EUR";
        let total: usize = kinds(data, EncodingControl::Auto).iter().map(|&(_, len)| len).sum();
        assert_eq!(total, data.len());
    }
}
