//! Per-tick record of which grid positions already took part in a swap.

use bit_vec::BitVec;

/// One bit per grid cell, indexed the same way as [`crate::Grid`].
#[derive(Debug, Clone)]
pub struct ProcessedSet {
    bits: BitVec,
}

impl ProcessedSet {
    pub fn new(len: usize) -> Self {
        Self {
            bits: BitVec::from_elem(len, false),
        }
    }

    /// Clear every mark, resizing if the grid changed size.
    pub fn reset(&mut self, len: usize) {
        if self.bits.len() == len {
            self.bits.clear();
        } else {
            self.bits = BitVec::from_elem(len, false);
        }
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.bits.get(index).unwrap_or(false)
    }

    #[inline]
    pub fn mark(&mut self, index: usize) {
        self.bits.set(index, true);
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| *b).count()
    }
}
