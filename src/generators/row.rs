use core::iter;

use crate::dimension::Geometry;
use crate::generators::pattern::Pattern;
use crate::tables::HL_TO_LL;

pub const START_PAT: Pattern = Pattern::new(0b11111111010101000, 17);
pub const  STOP_PAT: Pattern = Pattern::new(0b111111101000101001, 18);

/// Module pattern of `codeword` in the cluster of row `cluster`: a leading
/// bar followed by the 16 modules stored in the table.
#[inline]
pub fn codeword_pattern(cluster: usize, codeword: u16) -> Pattern {
    Pattern::new((1 << 16) | HL_TO_LL[cluster * 929 + codeword as usize] as u32, 17)
}

/// Values shared by the row indicators of every row of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowIndicators {
    rows_val: u16,
    cols_val: u16,
    level_val: u16,
}

impl RowIndicators {
    pub fn new(geometry: Geometry, level: u8) -> Self {
        let last_row = geometry.rows as u16 - 1;
        Self {
            rows_val: last_row / 3,
            cols_val: geometry.cols as u16 - 1,
            level_val: level as u16 * 3 + last_row % 3,
        }
    }

    /// Left and right indicator codewords of `row`.
    pub fn markers(&self, row: usize) -> (u16, u16) {
        let row_id = (row / 3) as u16 * 30;
        let (left, right) = match row % 3 {
            0 => (self.rows_val, self.cols_val),
            1 => (self.level_val, self.rows_val),
            _ => (self.cols_val, self.level_val),
        };
        (left + row_id, right + row_id)
    }
}

/// Patterns of one row: start, left indicator, data codewords, right
/// indicator and stop.
#[derive(Debug, Clone)]
pub struct SymbolRow<'a> {
    codewords: &'a [u16],
    cluster: usize,
    left: u16,
    right: u16,
    /// Next slot, 0 being the start pattern
    slot: usize,
}

impl<'a> SymbolRow<'a> {
    pub fn new(codewords: &'a [u16], row: usize, indicators: &RowIndicators) -> Self {
        debug_assert!(!codewords.is_empty());
        let (left, right) = indicators.markers(row);
        Self { codewords, cluster: row % 3, left, right, slot: 0 }
    }

    #[inline]
    fn slots(&self) -> usize {
        self.codewords.len() + 4
    }
}

impl<'a> iter::Iterator for SymbolRow<'a> {
    type Item = Pattern;

    fn next(&mut self) -> Option<Self::Item> {
        let last = self.slots() - 1;
        let pattern = match self.slot {
            0 => START_PAT,
            1 => codeword_pattern(self.cluster, self.left),
            slot if slot < last - 1 => codeword_pattern(self.cluster, self.codewords[slot - 2]),
            slot if slot == last - 1 => codeword_pattern(self.cluster, self.right),
            slot if slot == last => STOP_PAT,
            _ => return None,
        };
        self.slot += 1;
        Some(pattern)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.slots().saturating_sub(self.slot);
        (count, Some(count))
    }
}

impl<'a> ExactSizeIterator for SymbolRow<'a> {}
impl<'a> iter::FusedIterator for SymbolRow<'a> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers() {
        // 10 rows, 4 columns, level 2
        let indicators = RowIndicators::new(Geometry { rows: 10, cols: 4 }, 2);
        assert_eq!(indicators.markers(0), (3, 3));
        assert_eq!(indicators.markers(1), (6, 3));
        assert_eq!(indicators.markers(2), (3, 6));
        assert_eq!(indicators.markers(3), (33, 33));
        assert_eq!(indicators.markers(9), (93, 93));
    }

    #[test]
    fn test_row_patterns() {
        let indicators = RowIndicators::new(Geometry { rows: 3, cols: 2 }, 0);
        let row = SymbolRow::new(&[1, 2], 1, &indicators);
        assert_eq!(row.len(), 6);

        let patterns: Vec<Pattern> = row.collect();
        assert_eq!(patterns[0], START_PAT);
        assert_eq!(patterns[1], codeword_pattern(1, 2));
        assert_eq!(patterns[2], codeword_pattern(1, 1));
        assert_eq!(patterns[3], codeword_pattern(1, 2));
        assert_eq!(patterns[4], codeword_pattern(1, 0));
        assert_eq!(patterns[5], STOP_PAT);

        let mut row = SymbolRow::new(&[1, 2], 1, &indicators);
        row.by_ref().for_each(drop);
        assert_eq!(row.len(), 0);
        assert_eq!(row.next(), None);

        let modules: usize = patterns.iter().map(|p| p.size() as usize).sum();
        assert_eq!(modules, 17 * (2 + 4) + 1);
    }

    #[test]
    fn test_codeword_pattern_leading_bar() {
        for cluster in 0..3 {
            let pattern = codeword_pattern(cluster, 0);
            assert_eq!(pattern.size(), 17);
            assert!(pattern.into_iter().next().unwrap());
        }
    }
}
