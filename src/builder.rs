use crate::dimension::Geometry;
use crate::generators::{RowIndicators, SymbolRow};

/// Black (true) and white modules of a symbol, one row per data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleMatrix {
    rows: usize,
    width: usize,
    modules: Vec<bool>,
}

impl ModuleMatrix {
    /// Lays out `codewords` (exactly `geometry.capacity()` of them) row by
    /// row with the start, stop and row indicator patterns.
    pub fn build(codewords: &[u16], geometry: Geometry, level: u8) -> Self {
        debug_assert_eq!(codewords.len(), geometry.capacity());

        let width = geometry.module_width();
        let mut modules = vec![false; geometry.rows * width];
        let indicators = RowIndicators::new(geometry, level);

        for (row, (line, codewords)) in modules.chunks_exact_mut(width)
            .zip(codewords.chunks_exact(geometry.cols))
            .enumerate()
        {
            let mut offset = 0;
            for pattern in SymbolRow::new(codewords, row, &indicators) {
                let size = pattern.size() as usize;
                pattern.write(&mut line[offset..offset + size]);
                offset += size;
            }
            debug_assert_eq!(offset, width);
        }

        Self { rows: geometry.rows, width, modules }
    }

    #[inline]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of modules in a row.
    #[inline]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.modules[row * self.width + col]
    }

    pub fn row(&self, row: usize) -> &[bool] {
        &self.modules[row * self.width..(row + 1) * self.width]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.modules.chunks_exact(self.width)
    }

    /// Expands every module into a `bar_width` x `row_height` block framed
    /// by `quiet_zone` pixels.
    pub fn rasterize(&self, bar_width: u32, row_height: u32, quiet_zone: u32, inverted: bool) -> Bitmap {
        let (sx, sy, quiet) = (bar_width as usize, row_height as usize, quiet_zone as usize);
        let width = self.width * sx + 2 * quiet;
        let height = self.rows * sy + 2 * quiet;
        let mut pixels = vec![inverted; width * height];

        for (row, modules) in self.iter_rows().enumerate() {
            let top = quiet + row * sy;
            let line = &mut pixels[top * width..(top + 1) * width];
            for (col, &on) in modules.iter().enumerate() {
                let left = quiet + col * sx;
                line[left..left + sx].fill(on ^ inverted);
            }
            for y in top + 1..top + sy {
                pixels.copy_within(top * width..(top + 1) * width, y * width);
            }
        }

        Bitmap { width, height, pixels }
    }
}

/// Pixels of a rendered symbol, quiet zone included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

impl Bitmap {
    #[inline]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[y * self.width + x]
    }

    /// Row major pixels, true for black.
    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    /// One bit per pixel, most significant bit first, every row padded to a
    /// whole byte.
    pub fn to_packed(&self) -> Vec<u8> {
        let stride = self.width.div_ceil(8);
        let mut packed = vec![0u8; stride * self.height];
        for (line, pixels) in packed.chunks_exact_mut(stride).zip(self.pixels.chunks_exact(self.width)) {
            for (x, &on) in pixels.iter().enumerate() {
                if on {
                    line[x / 8] |= 0x80 >> (x % 8);
                }
            }
        }
        packed
    }
}

#[cfg(feature = "embedded-graphics")]
mod graphics {
    use embedded_graphics::pixelcolor::BinaryColor;
    use embedded_graphics::prelude::*;

    use super::Bitmap;

    impl Drawable for Bitmap {
        type Color = BinaryColor;
        type Output = ();

        fn draw<D>(&self, target: &mut D) -> Result<Self::Output, D::Error>
        where
            D: DrawTarget<Color = Self::Color>,
        {
            let width = self.width;
            target.draw_iter(self.pixels.iter().enumerate().map(|(i, &on)| {
                let point = Point::new((i % width) as i32, (i / width) as i32);
                Pixel(point, if on { BinaryColor::On } else { BinaryColor::Off })
            }))
        }
    }

    impl OriginDimensions for Bitmap {
        fn size(&self) -> Size {
            Size::new(self.width as u32, self.height as u32)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{START_PAT, STOP_PAT};

    fn matrix() -> ModuleMatrix {
        let codewords = [9, 1, 2, 3, 4, 5, 6, 7, 8];
        ModuleMatrix::build(&codewords, Geometry { rows: 3, cols: 3 }, 0)
    }

    #[test]
    fn test_matrix_dimensions() {
        let matrix = matrix();
        assert_eq!(matrix.rows(), 3);
        assert_eq!(matrix.width(), 17 * (3 + 4) + 1);
        assert_eq!(matrix.iter_rows().count(), 3);
    }

    #[test]
    fn test_matrix_start_stop() {
        let matrix = matrix();
        let start: Vec<bool> = START_PAT.into_iter().collect();
        let stop: Vec<bool> = STOP_PAT.into_iter().collect();
        for row in matrix.iter_rows() {
            assert_eq!(&row[..17], &start[..]);
            assert_eq!(&row[row.len() - 18..], &stop[..]);
            // every codeword starts with a bar
            for cw in 0..5 {
                assert!(row[17 + cw * 17]);
            }
        }
    }

    #[test]
    fn test_rasterize() {
        let matrix = matrix();
        let bitmap = matrix.rasterize(2, 6, 4, false);
        assert_eq!(bitmap.width(), 2 * matrix.width() + 8);
        assert_eq!(bitmap.height(), 6 * 3 + 8);

        // quiet zone
        assert!(!bitmap.get(0, 0));
        assert!(!bitmap.get(3, 10));
        assert!(!bitmap.get(bitmap.width() - 1, bitmap.height() - 1));

        for y in 0..3 * 6 {
            for x in 0..matrix.width() * 2 {
                assert_eq!(bitmap.get(4 + x, 4 + y), matrix.get(y / 6, x / 2));
            }
        }
    }

    #[test]
    fn test_rasterize_inverted() {
        let matrix = matrix();
        let normal = matrix.rasterize(1, 3, 2, false);
        let inverted = matrix.rasterize(1, 3, 2, true);
        assert!(inverted.get(0, 0));
        assert!(normal.pixels().iter().zip(inverted.pixels()).all(|(a, b)| a != b));
    }

    #[test]
    fn test_packed() {
        let matrix = matrix();
        let bitmap = matrix.rasterize(1, 3, 2, false);
        let packed = bitmap.to_packed();
        let stride = bitmap.width().div_ceil(8);
        assert_eq!(packed.len(), stride * bitmap.height());

        // first row is quiet zone, third row starts the start pattern at x = 2
        assert!(packed[..stride].iter().all(|&b| b == 0));
        assert_eq!(packed[2 * stride], 0b0011_1111);
        assert_eq!(packed[2 * stride + 1], 0b1101_0101);
    }
}
