//! Core abstractions and error types
//!
//! The backing bit storage is a narrow capability trait ([`BitStore`]) so
//! alternative backends can be substituted without touching the filter or
//! the bucket encodings, and the crate's two failure conditions live here
//! as [`FilterError`].

/// Error raised by filter construction and deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Construction parameters fall outside the supported ranges
    InvalidParameters(&'static str),
    /// Deleted item is absent from both candidate buckets: it was never
    /// added, or it was already deleted
    ItemNotFound,
}

impl core::fmt::Display for FilterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FilterError::InvalidParameters(reason) => {
                write!(f, "invalid parameters: {}", reason)
            }
            FilterError::ItemNotFound => write!(f, "item not previously inserted"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FilterError {}

/// Fixed-width random-access bit storage.
///
/// A store holds `len()` slots of `word_width()` bits each; each slot keeps
/// one encoded bucket. Slot values travel in the low bits of a `u64`, which
/// bounds `word_width()` at 64; every legal bucket encoding is under 64
/// bits.
///
/// The filter allocates its store exactly once at construction and owns it
/// for its whole lifetime; implementations never need to grow.
pub trait BitStore {
    /// Read the slot at `index`, returned in the low `word_width()` bits.
    fn get(&self, index: usize) -> u64;

    /// Write the low `word_width()` bits of `bits` to the slot at `index`.
    fn set(&mut self, index: usize, bits: u64);

    /// Number of slots.
    fn len(&self) -> usize;

    /// Returns `true` when the store has no slots.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Width of each slot in bits.
    fn word_width(&self) -> u32;

    /// Logical footprint in bytes: `len() * word_width()` bits, rounded up
    /// to whole bytes.
    fn size_bytes(&self) -> usize {
        (self.len() * self.word_width() as usize + 7) / 8
    }
}
