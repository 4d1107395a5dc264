//! Fixed-capacity fingerprint buckets
//!
//! A bucket is a small group of fingerprint slots addressed by one filter
//! index. Slot order carries no meaning: two buckets holding the same
//! multiset of nonzero fingerprints are equivalent. Unused slots hold zero,
//! which is why zero is never a legal fingerprint.
//!
//! Storage is a fixed inline array plus a logical slot count, so bucket
//! values move through the eviction loop without touching the heap.

/// Fingerprint tag substituted for an item. `0` means "empty slot"; legal
/// values are `1..2^f` for a filter with `f` fingerprint bits.
pub(crate) type Fingerprint = u16;

/// Hard upper bound on slots per bucket.
pub(crate) const MAX_SLOTS: usize = 8;

/// Fixed-capacity collection of fingerprint slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Bucket {
    len: u8,
    entries: [Fingerprint; MAX_SLOTS],
}

impl Bucket {
    /// An all-empty bucket with `len` logical slots.
    pub(crate) fn empty(len: u32) -> Self {
        debug_assert!(len >= 1 && len as usize <= MAX_SLOTS);
        Self {
            len: len as u8,
            entries: [0; MAX_SLOTS],
        }
    }

    /// The live slots, including empty ones.
    #[inline]
    pub(crate) fn slots(&self) -> &[Fingerprint] {
        &self.entries[..self.len as usize]
    }

    /// Overwrite slot `index`.
    #[inline]
    pub(crate) fn set_slot(&mut self, index: usize, fp: Fingerprint) {
        debug_assert!(index < self.len as usize);
        self.entries[index] = fp;
    }

    /// Replace slot `index` with `fp`, returning the previous occupant.
    #[inline]
    pub(crate) fn swap_slot(&mut self, index: usize, fp: Fingerprint) -> Fingerprint {
        debug_assert!(index < self.len as usize);
        core::mem::replace(&mut self.entries[index], fp)
    }

    /// Returns `true` if any slot holds `fp`.
    pub(crate) fn contains(&self, fp: Fingerprint) -> bool {
        self.slots().contains(&fp)
    }

    /// Returns `true` if some slot is empty.
    pub(crate) fn has_empty(&self) -> bool {
        self.slots().contains(&0)
    }

    /// Place `fp` in the first empty slot. Callers check [`has_empty`]
    /// first; a full bucket is left unchanged.
    ///
    /// [`has_empty`]: Bucket::has_empty
    pub(crate) fn add(&mut self, fp: Fingerprint) {
        debug_assert_ne!(fp, 0);
        for entry in &mut self.entries[..self.len as usize] {
            if *entry == 0 {
                *entry = fp;
                return;
            }
        }
        debug_assert!(false, "add into full bucket");
    }

    /// Clear exactly one slot holding `fp`. Returns `false` if no slot
    /// matched.
    pub(crate) fn delete(&mut self, fp: Fingerprint) -> bool {
        debug_assert_ne!(fp, 0);
        for entry in &mut self.entries[..self.len as usize] {
            if *entry == fp {
                *entry = 0;
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
impl Bucket {
    /// Canonical slot order, for multiset comparison in tests.
    pub(crate) fn sorted(mut self) -> Self {
        self.entries[..self.len as usize].sort_unstable();
        self
    }

    pub(crate) fn from_slots(slots: &[Fingerprint]) -> Self {
        let mut bucket = Self::empty(slots.len() as u32);
        for (i, &fp) in slots.iter().enumerate() {
            bucket.set_slot(i, fp);
        }
        bucket
    }
}
