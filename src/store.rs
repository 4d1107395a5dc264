//! Word-packed backing storage
//!
//! [`WordArray`] is the default [`BitStore`]: a fixed count of fixed-width
//! slots packed contiguously over `u64` words, so an encoded bucket costs
//! exactly its encoded width. Slot widths are arbitrary in `[1, 64]`, which
//! means a slot may straddle a word boundary; get/set stitch the two halves
//! back together.

use crate::traits::BitStore;

#[cfg(feature = "std")]
use std::vec::Vec;

#[cfg(not(feature = "std"))]
extern crate alloc;
#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

/// Fixed-width slot array over packed `u64` words.
#[derive(Clone, Debug)]
pub struct WordArray {
    words: Vec<u64>,
    len: usize,
    width: u32,
    mask: u64,
}

impl WordArray {
    /// Create a store of `len` slots, each `width` bits, all zero.
    ///
    /// # Panics
    ///
    /// Panics if `width` is not in `[1, 64]`.
    pub fn new(len: usize, width: u32) -> Self {
        assert!(
            width >= 1 && width <= 64,
            "slot width must be in [1, 64]"
        );

        let total_bits = len * width as usize;
        let mask = if width == 64 {
            u64::MAX
        } else {
            (1u64 << width) - 1
        };

        Self {
            words: vec![0u64; (total_bits + 63) / 64],
            len,
            width,
            mask,
        }
    }
}

impl BitStore for WordArray {
    #[inline]
    fn get(&self, index: usize) -> u64 {
        debug_assert!(index < self.len);
        let bit = index * self.width as usize;
        let word = bit / 64;
        let off = bit % 64;

        let mut value = self.words[word] >> off;
        if off + self.width as usize > 64 {
            // off > 0 here, so the shift below is at most 63
            value |= self.words[word + 1] << (64 - off);
        }
        value & self.mask
    }

    #[inline]
    fn set(&mut self, index: usize, bits: u64) {
        debug_assert!(index < self.len);
        let bits = bits & self.mask;
        let bit = index * self.width as usize;
        let word = bit / 64;
        let off = bit % 64;

        self.words[word] = (self.words[word] & !(self.mask << off)) | (bits << off);
        if off + self.width as usize > 64 {
            let spill = 64 - off;
            self.words[word + 1] =
                (self.words[word + 1] & !(self.mask >> spill)) | (bits >> spill);
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn word_width(&self) -> u32 {
        self.width
    }
}
