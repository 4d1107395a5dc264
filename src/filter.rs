//! Cuckoo filter for probabilistic set membership with deletion
//!
//! A cuckoo filter answers "definitely absent" or "possibly present" for a
//! tested item while storing only a small fingerprint per member, and unlike
//! a Bloom filter it supports deleting previously-inserted items. The design
//! follows Fan, Andersen, Kaminsky and Mitzenmacher, "Cuckoo Filter:
//! Practically Better Than Bloom" (CoNEXT 2014).

use crate::bucket::{Bucket, Fingerprint};
use crate::codec::BucketCodec;
use crate::math;
use crate::rand::Xorshift64;
use crate::store::WordArray;
use crate::traits::{BitStore, FilterError};
use xxhash_rust::xxh3::xxh3_64;

/// Upper bound on displacement steps for a single insertion.
const MAX_KICKS: u32 = 500;

/// Bucket capacity used by [`CuckooFilter::new`].
const DEFAULT_SLOTS: u32 = 4;

/// Default seed for the eviction RNG; override with [`CuckooFilter::seeded`].
const DEFAULT_SEED: u64 = 0x9e3779b97f4a7c15;

/// Answer of a membership query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Membership {
    /// The item is definitely not in the filter.
    No,
    /// The item is possibly in the filter; false positives happen when a
    /// different item shares both the fingerprint and a candidate bucket.
    Maybe,
}

/// Cuckoo filter for set membership testing with deletion
///
/// Each item is reduced to a small fingerprint that may live in one of two
/// candidate buckets. Inserting into a full pair of buckets displaces a
/// resident fingerprint to its own other candidate, cuckoo-hashing style,
/// up to a fixed retry budget.
///
/// # Example
///
/// ```
/// use cuckooset::{CuckooFilter, Membership};
///
/// // Create a filter for ~1000 items with 1% false positive rate
/// let mut filter = CuckooFilter::new(1000, 0.01);
///
/// filter.add(b"apple");
/// assert_eq!(filter.contains(b"apple"), Membership::Maybe);
/// assert_eq!(filter.contains(b"cherry"), Membership::No);
///
/// filter.delete(b"apple").unwrap();
/// assert_eq!(filter.contains(b"apple"), Membership::No);
/// ```
///
/// # Overflow
///
/// Inserting past capacity eventually exhausts the displacement budget. The
/// filter then degrades permanently into an overflowed state: the failed
/// item is lost, and every later query answers [`Membership::Maybe`]. This
/// trades precision for a bounded worst-case insertion cost instead of
/// failing the call.
///
/// # Deletion
///
/// Only delete items that were added. Deleting an item that was never
/// inserted fails with [`FilterError::ItemNotFound`], and when two distinct
/// items collide on both fingerprint and bucket, deleting one can silently
/// take the other with it. That hazard is inherent to fingerprint-based
/// membership.
#[derive(Clone, Debug)]
pub struct CuckooFilter<S: BitStore = WordArray> {
    /// Encoded buckets, one store word per bucket
    store: S,
    /// Bucket <-> bit pattern mapping, fixed at construction
    codec: BucketCodec,
    /// Fingerprint width in bits (f)
    fingerprint_bits: u32,
    /// Fingerprints per bucket (b)
    slots_per_bucket: u32,
    /// `num_buckets - 1`; bucket count is a power of two
    index_mask: u64,
    /// Net adds minus deletes; a bookkeeping counter, not a verified
    /// cardinality. May go negative after overflow.
    count: i64,
    /// One-way degradation flag, see the type-level docs
    overflowed: bool,
    /// Drives random displacement choices
    rng: Xorshift64,
}

impl CuckooFilter {
    /// Create a new cuckoo filter with expected capacity and false positive
    /// rate
    ///
    /// # Arguments
    ///
    /// * `expected_items` - Expected number of items to insert
    /// * `false_positive_rate` - Desired false positive rate (e.g., 0.01 for 1%)
    ///
    /// # Panics
    ///
    /// Panics if `expected_items` is 0 or `false_positive_rate` is not in (0, 1)
    pub fn new(expected_items: usize, false_positive_rate: f64) -> Self {
        assert!(expected_items > 0, "expected_items must be positive");
        assert!(
            false_positive_rate > 0.0 && false_positive_rate < 1.0,
            "false_positive_rate must be in (0, 1)"
        );

        // f >= log2(2b / p) fingerprint bits keep the collision bound under p.
        let fingerprint_bits = math::ceil(math::log2(
            2.0 * DEFAULT_SLOTS as f64 / false_positive_rate,
        )) as u32;
        let fingerprint_bits = fingerprint_bits.clamp(4, 15);

        // Longer eviction chains at higher occupancy; large filters target a
        // lower load factor so insertion stays reliable near capacity.
        let load_factor = if expected_items > 1 << 25 {
            0.4
        } else if expected_items > 1 << 20 {
            0.6
        } else {
            0.95
        };
        let buckets = math::ceil(expected_items as f64 / (DEFAULT_SLOTS as f64 * load_factor));
        let num_buckets = (buckets as usize).max(1).next_power_of_two();

        Self::from_parts(fingerprint_bits, DEFAULT_SLOTS, num_buckets)
    }

    /// Create a cuckoo filter with explicit parameters
    ///
    /// `num_buckets` is rounded up to the next power of two.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidParameters`] if `fingerprint_bits` is
    /// outside `[2, 16]`, `slots_per_bucket` is outside `[1, 8]`, their
    /// product is 64 bits or more, or `num_buckets` is 0.
    pub fn with_params(
        fingerprint_bits: u32,
        slots_per_bucket: u32,
        num_buckets: usize,
    ) -> Result<Self, FilterError> {
        validate_shape(fingerprint_bits, slots_per_bucket)?;
        if num_buckets == 0 {
            return Err(FilterError::InvalidParameters("num_buckets must be positive"));
        }
        let num_buckets = num_buckets.next_power_of_two();
        Ok(Self::from_parts(fingerprint_bits, slots_per_bucket, num_buckets))
    }

    fn from_parts(fingerprint_bits: u32, slots_per_bucket: u32, num_buckets: usize) -> Self {
        debug_assert!(num_buckets.is_power_of_two());
        let codec = BucketCodec::choose(fingerprint_bits, slots_per_bucket);
        Self {
            store: WordArray::new(num_buckets, codec.width_bits()),
            codec,
            fingerprint_bits,
            slots_per_bucket,
            index_mask: (num_buckets - 1) as u64,
            count: 0,
            overflowed: false,
            rng: Xorshift64::new(DEFAULT_SEED),
        }
    }
}

impl<S: BitStore> CuckooFilter<S> {
    /// Create a cuckoo filter over a caller-provided backing store
    ///
    /// The store must hold a power-of-two number of words, each exactly as
    /// wide as one encoded bucket for the given shape. The filter owns the
    /// store for its lifetime; pass it in empty.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidParameters`] if the shape is out of
    /// range or the store does not match it.
    pub fn with_store(
        store: S,
        fingerprint_bits: u32,
        slots_per_bucket: u32,
    ) -> Result<Self, FilterError> {
        validate_shape(fingerprint_bits, slots_per_bucket)?;
        let codec = BucketCodec::choose(fingerprint_bits, slots_per_bucket);
        if store.word_width() != codec.width_bits() {
            return Err(FilterError::InvalidParameters(
                "store word width must equal the encoded bucket width",
            ));
        }
        if !store.len().is_power_of_two() {
            return Err(FilterError::InvalidParameters(
                "store length must be a power of two",
            ));
        }
        Ok(Self {
            index_mask: (store.len() - 1) as u64,
            store,
            codec,
            fingerprint_bits,
            slots_per_bucket,
            count: 0,
            overflowed: false,
            rng: Xorshift64::new(DEFAULT_SEED),
        })
    }

    /// Replace the eviction RNG with one seeded from `seed`, for
    /// reproducible displacement sequences.
    pub fn seeded(self, seed: u64) -> Self {
        Self {
            rng: Xorshift64::new(seed),
            ..self
        }
    }

    /// Insert an item into the filter
    ///
    /// Never fails: when the displacement budget is exhausted the filter
    /// switches to the overflowed state instead (see the type-level docs).
    /// Adding the same item twice occupies two slots, so it can be deleted
    /// twice.
    pub fn add(&mut self, item: &[u8]) {
        self.count += 1;
        if self.overflowed {
            return;
        }

        let (fingerprint, index1, index2) = self.candidates(item);
        for index in [index1, index2] {
            let mut bucket = self.load(index);
            if bucket.has_empty() {
                bucket.add(fingerprint);
                self.write(index, &bucket);
                return;
            }
        }
        self.relocate(fingerprint, [index1, index2]);
    }

    /// Displace resident fingerprints until `fingerprint` finds a slot or
    /// the kick budget runs out.
    fn relocate(&mut self, mut fingerprint: Fingerprint, candidates: [u64; 2]) {
        let mut index = candidates[self.rng.next_bounded(2)];
        for _ in 0..MAX_KICKS {
            // The current bucket is always full here, so any slot works.
            let slot = self.rng.next_bounded(self.slots_per_bucket as usize);
            let mut bucket = self.load(index);
            fingerprint = bucket.swap_slot(slot, fingerprint);
            self.write(index, &bucket);

            // The evicted fingerprint keeps its membership: it moves to its
            // other candidate bucket relative to the one just vacated.
            index = self.other_index(fingerprint, index);
            let mut bucket = self.load(index);
            if bucket.has_empty() {
                bucket.add(fingerprint);
                self.write(index, &bucket);
                return;
            }
        }
        self.overflowed = true;
    }

    /// Remove one previously-added occurrence of an item
    ///
    /// After overflow only the bookkeeping counter is decremented, since
    /// bucket contents can no longer be reasoned about.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::ItemNotFound`] if the item's fingerprint sits
    /// in neither candidate bucket. That means the caller deleted an item
    /// that was never added, or deleted it twice; the counter is left
    /// untouched.
    pub fn delete(&mut self, item: &[u8]) -> Result<(), FilterError> {
        if self.overflowed {
            self.count -= 1;
            return Ok(());
        }

        let (fingerprint, index1, index2) = self.candidates(item);
        for index in [index1, index2] {
            let mut bucket = self.load(index);
            if bucket.delete(fingerprint) {
                self.write(index, &bucket);
                self.count -= 1;
                return Ok(());
            }
        }
        Err(FilterError::ItemNotFound)
    }

    /// Check if an item might be in the filter
    ///
    /// Returns [`Membership::No`] only when the item is definitely absent.
    /// Items that were added and neither deleted nor lost to overflow are
    /// always [`Membership::Maybe`] (no false negatives). An overflowed
    /// filter answers `Maybe` for every item.
    pub fn contains(&self, item: &[u8]) -> Membership {
        if self.overflowed {
            return Membership::Maybe;
        }

        let (fingerprint, index1, index2) = self.candidates(item);
        if self.load(index1).contains(fingerprint) || self.load(index2).contains(fingerprint) {
            Membership::Maybe
        } else {
            Membership::No
        }
    }

    /// Get the fingerprint width in bits
    pub fn fingerprint_bits(&self) -> u32 {
        self.fingerprint_bits
    }

    /// Get the number of fingerprint slots per bucket
    pub fn slots_per_bucket(&self) -> u32 {
        self.slots_per_bucket
    }

    /// Get the number of buckets
    pub fn num_buckets(&self) -> usize {
        self.store.len()
    }

    /// Get the total number of fingerprint slots
    pub fn capacity(&self) -> usize {
        self.store.len() * self.slots_per_bucket as usize
    }

    /// Net adds minus deletes
    ///
    /// A bookkeeping counter, not a verified live-member count: it keeps
    /// moving after overflow and can go negative if deletes are misused.
    pub fn count(&self) -> i64 {
        self.count
    }

    /// Whether the filter has degraded into the overflowed state
    ///
    /// Monotonic: once `true` it stays `true` for the filter's lifetime.
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// Get the backing-store footprint in bytes
    pub fn size_bytes(&self) -> usize {
        self.store.size_bytes()
    }

    /// Upper bound on the false positive rate, `2b / 2^f`
    pub fn false_positive_rate(&self) -> f64 {
        let rate = 2.0 * self.slots_per_bucket as f64 / (1u64 << self.fingerprint_bits) as f64;
        rate.min(1.0)
    }

    /// Fingerprint and both candidate bucket indices for an item.
    fn candidates(&self, item: &[u8]) -> (Fingerprint, u64, u64) {
        let hash = xxh3_64(item);
        let fingerprint = self.fingerprint_of(hash);
        let index1 = hash & self.index_mask;
        let index2 = self.other_index(fingerprint, index1);
        (fingerprint, index1, index2)
    }

    /// First nonzero `f`-bit window of `hash`, scanning from the top end
    /// down; `1` when every window is zero. Never returns the empty-slot
    /// sentinel `0`.
    fn fingerprint_of(&self, hash: u64) -> Fingerprint {
        let mask = (1u64 << self.fingerprint_bits) - 1;
        let mut shift = 64 - self.fingerprint_bits;
        while shift > 0 {
            let window = (hash >> shift) & mask;
            if window != 0 {
                return window as Fingerprint;
            }
            shift = shift.saturating_sub(self.fingerprint_bits);
        }
        1
    }

    /// The other candidate index for a fingerprint currently at `index`.
    /// Self-inverse because the bucket count is a power of two.
    fn other_index(&self, fingerprint: Fingerprint, index: u64) -> u64 {
        (index ^ xxh3_64(&fingerprint.to_le_bytes())) & self.index_mask
    }

    fn load(&self, index: u64) -> Bucket {
        self.codec.decode(self.store.get(index as usize))
    }

    fn write(&mut self, index: u64, bucket: &Bucket) {
        self.store.set(index as usize, self.codec.encode(bucket));
    }
}

fn validate_shape(fingerprint_bits: u32, slots_per_bucket: u32) -> Result<(), FilterError> {
    if !(2..=16).contains(&fingerprint_bits) {
        return Err(FilterError::InvalidParameters(
            "fingerprint_bits must be in [2, 16]",
        ));
    }
    if !(1..=8).contains(&slots_per_bucket) {
        return Err(FilterError::InvalidParameters(
            "slots_per_bucket must be in [1, 8]",
        ));
    }
    if fingerprint_bits * slots_per_bucket >= 64 {
        return Err(FilterError::InvalidParameters(
            "fingerprint_bits * slots_per_bucket must be less than 64",
        ));
    }
    Ok(())
}
