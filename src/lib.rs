//! # Cuckooset
//!
//! A cuckoo filter for Rust: approximate set membership with deletion.
//!
//! A cuckoo filter answers "definitely absent" or "possibly present" for a
//! tested item while storing only a few bits per member. Use it to
//! short-circuit expensive lookups, e.g. skipping a disk or network read
//! when a key is provably absent. Unlike a Bloom filter, previously-added
//! items can be deleted again.
//!
//! ## Features
//!
//! - **Deletion**: remove members without rebuilding the filter
//! - **Compact**: semi-sorted bucket packing spends one bit less per
//!   fingerprint than the naive layout
//! - **Bounded insertion cost**: displacement is capped; over-capacity load
//!   degrades the filter gracefully instead of looping
//! - **Deterministic**: no global state; eviction randomness is seedable
//! - **Pluggable storage**: bring your own bit store through a narrow trait
//!
//! ## Quick Start
//!
//! ```rust
//! use cuckooset::prelude::*;
//!
//! // Track ~10k keys at a 1% false positive rate
//! let mut seen = CuckooFilter::new(10_000, 0.01);
//!
//! seen.add(b"alice");
//! seen.add(b"bob");
//!
//! assert_eq!(seen.contains(b"alice"), Membership::Maybe);
//! assert_eq!(seen.contains(b"mallory"), Membership::No);
//!
//! // Members can be removed again
//! seen.delete(b"bob").unwrap();
//! assert_eq!(seen.contains(b"bob"), Membership::No);
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Standard library support; disable for `no_std` use
//!   (an allocator is still required)

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

// Core traits always available
pub mod traits;

pub mod filter;
pub mod store;

mod bucket;
mod codec;
mod math;
mod rand;

pub mod prelude {
    pub use crate::filter::{CuckooFilter, Membership};
    pub use crate::store::WordArray;
    pub use crate::traits::{BitStore, FilterError};
}

pub use filter::{CuckooFilter, Membership};
pub use store::WordArray;
pub use traits::{BitStore, FilterError};
