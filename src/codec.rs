//! Bucket encodings
//!
//! A bucket travels through [`BitStore`] words as a single fixed-width bit
//! pattern. Two encodings exist:
//!
//! * [`BucketCodec::Direct`] concatenates the raw fingerprints, costing
//!   `f * b` bits for `b` slots of `f`-bit fingerprints.
//! * [`BucketCodec::Packed`] applies the semi-sorting trick from the cuckoo
//!   filter paper (Fan et al., CoNEXT 2014, section 5.2): for four-slot
//!   buckets the slot order is meaningless, so the four low nibbles are
//!   sorted and replaced by an index into the enumeration of all 3876
//!   non-decreasing nibble 4-tuples. That index needs 12 bits instead of 16,
//!   saving one bit per fingerprint. The high `f - 4` bits of each entry are
//!   stored verbatim after the index, in the same sorted order, for a total
//!   of `12 + (f - 4) * 4` bits.
//!
//! Both conversion tables are built at compile time and live in read-only
//! data.
//!
//! [`BitStore`]: crate::traits::BitStore

use crate::bucket::{Bucket, Fingerprint};

/// Number of non-decreasing 4-tuples over 16 nibble values: C(19, 4).
const NUM_NIBBLE_CODES: usize = 3876;

/// Bits needed to address every nibble-tuple code.
const NIBBLE_CODE_BITS: u32 = 12;

/// Slot count the packed encoding is defined for.
const PACKED_SLOTS: u32 = 4;

/// Code -> packed sorted nibbles, one nibble per 4-bit lane, smallest in
/// the lowest lane. Codes enumerate the tuples in ascending packed order.
static CODE_TO_NIBBLES: [u16; NUM_NIBBLE_CODES] = build_code_to_nibbles();

/// Packed sorted nibbles -> code. Indexed directly by the 16-bit pack;
/// entries for tuples that are not sorted are never consulted.
static NIBBLES_TO_CODE: [u16; 1 << 16] = build_nibbles_to_code();

const fn build_code_to_nibbles() -> [u16; NUM_NIBBLE_CODES] {
    let mut table = [0u16; NUM_NIBBLE_CODES];
    let mut code = 0;
    let mut n3 = 0u16;
    while n3 < 16 {
        let mut n2 = 0u16;
        while n2 <= n3 {
            let mut n1 = 0u16;
            while n1 <= n2 {
                let mut n0 = 0u16;
                while n0 <= n1 {
                    table[code] = n3 << 12 | n2 << 8 | n1 << 4 | n0;
                    code += 1;
                    n0 += 1;
                }
                n1 += 1;
            }
            n2 += 1;
        }
        n3 += 1;
    }
    table
}

const fn build_nibbles_to_code() -> [u16; 1 << 16] {
    let forward = build_code_to_nibbles();
    let mut table = [0u16; 1 << 16];
    let mut code = 0;
    while code < NUM_NIBBLE_CODES {
        table[forward[code] as usize] = code as u16;
        code += 1;
    }
    table
}

/// How a bucket maps to its fixed-width bit pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BucketCodec {
    /// Raw concatenation of `slots` fingerprints of `fingerprint_bits` each.
    Direct { fingerprint_bits: u32, slots: u32 },
    /// Semi-sorted encoding for four-slot buckets with `fingerprint_bits >= 4`.
    Packed { fingerprint_bits: u32 },
}

impl BucketCodec {
    /// Pick the densest encoding available for the given shape.
    pub(crate) fn choose(fingerprint_bits: u32, slots: u32) -> Self {
        if slots == PACKED_SLOTS && fingerprint_bits >= 4 {
            BucketCodec::Packed { fingerprint_bits }
        } else {
            BucketCodec::Direct {
                fingerprint_bits,
                slots,
            }
        }
    }

    /// Encoded width of one bucket in bits.
    pub(crate) fn width_bits(&self) -> u32 {
        match *self {
            BucketCodec::Direct {
                fingerprint_bits,
                slots,
            } => fingerprint_bits * slots,
            BucketCodec::Packed { fingerprint_bits } => {
                NIBBLE_CODE_BITS + (fingerprint_bits - 4) * PACKED_SLOTS
            }
        }
    }

    /// Pack `bucket` into its bit pattern. The result occupies the low
    /// [`width_bits`] bits of the returned word.
    ///
    /// [`width_bits`]: BucketCodec::width_bits
    pub(crate) fn encode(&self, bucket: &Bucket) -> u64 {
        match *self {
            BucketCodec::Direct {
                fingerprint_bits, ..
            } => {
                let mut word = 0u64;
                for (i, &fp) in bucket.slots().iter().enumerate() {
                    debug_assert!(u32::from(fp) < (1 << fingerprint_bits));
                    word |= u64::from(fp) << (i as u32 * fingerprint_bits);
                }
                word
            }
            BucketCodec::Packed { fingerprint_bits } => {
                let mut entries = [0 as Fingerprint; PACKED_SLOTS as usize];
                entries.copy_from_slice(bucket.slots());
                // Ties on the nibble are broken by the high bits so every
                // multiset has exactly one encoding.
                entries.sort_unstable_by_key(|&e| (e & 0xF, e >> 4));

                let mut nibbles = 0u16;
                for (i, &fp) in entries.iter().enumerate() {
                    nibbles |= (fp & 0xF) << (4 * i);
                }
                let mut word = u64::from(NIBBLES_TO_CODE[nibbles as usize]);

                let high_bits = fingerprint_bits - 4;
                for (i, &fp) in entries.iter().enumerate() {
                    debug_assert!(u32::from(fp) < (1 << fingerprint_bits));
                    let high = u64::from(fp >> 4);
                    word |= high << (NIBBLE_CODE_BITS + i as u32 * high_bits);
                }
                word
            }
        }
    }

    /// Rebuild a bucket from its bit pattern. Slot order is canonical for
    /// the encoding, not the order the fingerprints were inserted in.
    pub(crate) fn decode(&self, word: u64) -> Bucket {
        match *self {
            BucketCodec::Direct {
                fingerprint_bits,
                slots,
            } => {
                let mask = fingerprint_mask(fingerprint_bits);
                let mut bucket = Bucket::empty(slots);
                for i in 0..slots {
                    let fp = (word >> (i * fingerprint_bits)) & mask;
                    bucket.set_slot(i as usize, fp as Fingerprint);
                }
                bucket
            }
            BucketCodec::Packed { fingerprint_bits } => {
                let code = (word & ((1 << NIBBLE_CODE_BITS) - 1)) as usize;
                let nibbles = CODE_TO_NIBBLES[code];

                let high_bits = fingerprint_bits - 4;
                let high_mask = fingerprint_mask(fingerprint_bits) >> 4;
                let mut bucket = Bucket::empty(PACKED_SLOTS);
                for i in 0..PACKED_SLOTS {
                    let nibble = u64::from(nibbles >> (4 * i)) & 0xF;
                    let high = (word >> (NIBBLE_CODE_BITS + i * high_bits)) & high_mask;
                    bucket.set_slot(i as usize, (high << 4 | nibble) as Fingerprint);
                }
                bucket
            }
        }
    }
}

#[inline]
fn fingerprint_mask(fingerprint_bits: u32) -> u64 {
    (1 << fingerprint_bits) - 1
}

#[cfg(test)]
impl BucketCodec {
    /// Slots per decoded bucket, for sizing test fixtures.
    pub(crate) fn slots(&self) -> u32 {
        match *self {
            BucketCodec::Direct { slots, .. } => slots,
            BucketCodec::Packed { .. } => PACKED_SLOTS,
        }
    }
}
