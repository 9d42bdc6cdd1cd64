use core::iter;

/// Up to 24 modules, most significant first, packed with their count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern(u32);

impl Pattern {
    pub const fn new(bits: u32, count: u8) -> Self {
        debug_assert!(count <= 24, "count is too big");

        Self((bits << 8) | count as u32)
    }

    /// Number of modules.
    #[inline]
    pub const fn size(&self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    #[inline]
    pub const fn bits(&self) -> u32 {
        self.0 >> 8
    }

    /// Writes the modules into `target`, which must hold [Pattern::size]
    /// entries.
    pub fn write(&self, target: &mut [bool]) {
        for (slot, module) in target.iter_mut().zip(*self) {
            *slot = module;
        }
    }
}

impl iter::IntoIterator for Pattern {
    type Item = bool;
    type IntoIter = Modules;

    fn into_iter(self) -> Self::IntoIter {
        Modules { value: self.bits(), count: self.size() as u32 }
    }
}

/// Modules of a [Pattern], black first.
#[derive(Debug, Clone)]
pub struct Modules {
    value: u32,
    count: u32,
}

impl iter::Iterator for Modules {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        if self.count > 0 {
            self.count -= 1;
            Some((self.value >> self.count) & 1 != 0)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.count as usize;
        (count, Some(count))
    }
}

impl iter::ExactSizeIterator for Modules {}
impl iter::FusedIterator for Modules {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modules_order() {
        let modules: Vec<bool> = Pattern::new(0b1101, 4).into_iter().collect();
        assert_eq!(modules, [true, true, false, true]);
    }

    #[test]
    fn test_write() {
        let mut target = [true; 5];
        Pattern::new(0b10001, 5).write(&mut target);
        assert_eq!(target, [true, false, false, false, true]);
        assert_eq!(Pattern::new(0, 17).into_iter().len(), 17);
    }
}
