//! Row and column selection.

use log::{debug, warn};

use crate::config::EncoderConfig;
use crate::{GeometryRejected, Pdf417Error};

/// Minimum number of rows in a PDF417 barcode.
pub const MIN_ROWS: usize = 3;
/// Maximum number of rows in a PDF417 barcode.
pub const MAX_ROWS: usize = 90;
/// Minimum number of data columns in a PDF417 barcode.
pub const MIN_COLS: usize = 1;
/// Maximum number of data columns in a PDF417 barcode.
pub const MAX_COLS: usize = 30;
/// Largest value of the length codeword (length, data and padding).
pub const MAX_DATA_CODEWORDS: usize = 928;

/// Modules taken by the start pattern, both row indicators and the stop
/// pattern.
const OVERHEAD_MODULES: usize = 17 * 4 + 1;

/// Data rows and data columns of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub rows: usize,
    pub cols: usize,
}

impl Geometry {
    /// Total codeword slots.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.rows * self.cols
    }

    /// Modules in one row: start, left indicator, data, right indicator and
    /// stop patterns.
    #[inline]
    pub const fn module_width(&self) -> usize {
        17 * self.cols + OVERHEAD_MODULES
    }

    /// Pixel width and height including the quiet zone.
    pub fn image_size(&self, config: &EncoderConfig) -> (u32, u32) {
        let quiet = 2 * config.quiet_zone();
        (
            config.bar_width() * self.module_width() as u32 + quiet,
            config.row_height() * self.rows as u32 + quiet,
        )
    }

    fn check_capacity(self, ecc_len: usize) -> Result<Self, GeometryRejected> {
        let codewords = self.capacity() - ecc_len;
        if codewords > MAX_DATA_CODEWORDS {
            return Err(GeometryRejected::CapacityExceeded { rows: self.rows, cols: self.cols, codewords });
        }
        Ok(self)
    }
}

#[inline]
const fn rows_for(total: usize, cols: usize) -> usize {
    let rows = total.div_ceil(cols);
    if rows < MIN_ROWS { MIN_ROWS } else { rows }
}

/// Fits `data_len + ecc_len` codewords with `cols` data columns, widening
/// the symbol when it would be taller than [MAX_ROWS].
pub fn default_fit(data_len: usize, ecc_len: usize, cols: usize) -> Result<Geometry, Pdf417Error> {
    let total = data_len + ecc_len;
    let overflow = Pdf417Error::Overflow { codewords: total };
    if data_len > MAX_DATA_CODEWORDS {
        return Err(overflow);
    }

    let mut cols = cols.clamp(MIN_COLS, MAX_COLS);
    if total.div_ceil(cols) > MAX_ROWS {
        cols = total.div_ceil(MAX_ROWS);
    }

    // padding must also fit in the length codeword
    for cols in cols..=MAX_COLS {
        let geometry = Geometry { rows: rows_for(total, cols), cols };
        if geometry.rows <= MAX_ROWS && geometry.check_capacity(ecc_len).is_ok() {
            debug!("default fit: {} rows x {} columns for {} codewords", geometry.rows, geometry.cols, total);
            return Ok(geometry);
        }
    }
    Err(overflow)
}

fn columns_geometry(total: usize, ecc_len: usize, cols: usize) -> Result<Geometry, GeometryRejected> {
    if !(MIN_COLS..=MAX_COLS).contains(&cols) {
        return Err(GeometryRejected::ColumnsOutOfRange(cols));
    }
    let rows = rows_for(total, cols);
    if rows > MAX_ROWS {
        return Err(GeometryRejected::RowsOutOfRange(rows));
    }
    Geometry { rows, cols }.check_capacity(ecc_len)
}

fn rows_geometry(total: usize, ecc_len: usize, rows: usize) -> Result<Geometry, GeometryRejected> {
    if !(MIN_ROWS..=MAX_ROWS).contains(&rows) {
        return Err(GeometryRejected::RowsOutOfRange(rows));
    }
    let cols = total.div_ceil(rows).max(MIN_COLS);
    if cols > MAX_COLS {
        return Err(GeometryRejected::ColumnsOutOfRange(cols));
    }
    Geometry { rows, cols }.check_capacity(ecc_len)
}

/// Geometry with exactly `cols` data columns.
pub fn with_columns(data_len: usize, ecc_len: usize, cols: usize) -> Result<Geometry, GeometryRejected> {
    columns_geometry(data_len + ecc_len, ecc_len, cols)
        .inspect_err(|e| warn!("rejected {cols} columns: {e}"))
}

/// Geometry with exactly `rows` data rows.
pub fn with_rows(data_len: usize, ecc_len: usize, rows: usize) -> Result<Geometry, GeometryRejected> {
    rows_geometry(data_len + ecc_len, ecc_len, rows)
        .inspect_err(|e| warn!("rejected {rows} rows: {e}"))
}

/// Geometry whose pixel width divided by pixel height is closest to `ratio`.
///
/// With `w` the bar width, `h` the row height, `q` the quiet zone and `n`
/// the total codeword count, the image is `w * (17 * cols + 69) + 2q` wide
/// and about `h * n / cols + 2q` tall. Equating their ratio to `ratio` gives
/// `17w * cols² + (69w + 2q * (1 - ratio)) * cols - ratio * h * n = 0`.
pub fn with_ratio(data_len: usize, ecc_len: usize, ratio: f64, config: &EncoderConfig) -> Result<Geometry, GeometryRejected> {
    if !ratio.is_finite() || ratio <= 0.0 {
        warn!("rejected width to height ratio {ratio}");
        return Err(GeometryRejected::NoRatioSolution(ratio));
    }

    let total = (data_len + ecc_len) as f64;
    let w = config.bar_width() as f64;
    let h = config.row_height() as f64;
    let q = config.quiet_zone() as f64;

    let a = 17.0 * w;
    let b = OVERHEAD_MODULES as f64 * w + 2.0 * q * (1.0 - ratio);
    let c = ratio * h * total;

    // c > 0, so there is always one positive root
    let cols = (-b + (b * b + 4.0 * a * c).sqrt()) / (2.0 * a);
    debug!("ratio {ratio}: {cols:.3} columns");

    with_columns(data_len, ecc_len, cols.round() as usize)
}
