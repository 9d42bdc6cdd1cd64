use thiserror::Error;

/// Errors aborting an encode or rejecting a configuration value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Pdf417Error {
    /// Nothing to encode
    #[error("input data is empty")]
    EmptyInput,

    /// A text eligible byte has no code in any text sub-mode
    #[error("byte {byte:#04x} has no code in any text sub-mode")]
    TextTableGap { byte: u8 },

    /// No legal symbol can hold the codewords
    #[error("{codewords} codewords do not fit in a PDF417 symbol")]
    Overflow { codewords: usize },

    /// A tuning parameter is out of its legal range
    #[error("invalid {name}: {value} (expected {expected})")]
    InvalidParameter {
        name: &'static str,
        value: i64,
        expected: &'static str,
    },

    /// The matrix or the bitmap was requested before any successful encode
    #[error("no data has been encoded yet")]
    NotEncoded,

    /// A digit run could not be loaded into the numeric accumulator
    #[error("numeric run of {digits} digits could not be converted")]
    NumericConversion { digits: usize },
}

/// Reasons a dimensioning request was refused. The previous geometry is left
/// untouched, so the caller can try another strategy.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GeometryRejected {
    #[error("{0} data columns is outside 1..=30")]
    ColumnsOutOfRange(usize),

    #[error("{0} data rows is outside 3..=90")]
    RowsOutOfRange(usize),

    #[error("{rows}x{cols} needs {codewords} data codewords, more than 928")]
    CapacityExceeded { rows: usize, cols: usize, codewords: usize },

    #[error("no legal column count matches a width to height ratio of {0}")]
    NoRatioSolution(f64),

    #[error("no data has been encoded yet")]
    NotEncoded,
}
