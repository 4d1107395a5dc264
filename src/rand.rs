//! Small seeded PRNG for eviction decisions
//!
//! The filter owns its generator so eviction walks are reproducible from a
//! seed and never touch global state. Xorshift64 is enough here: the
//! randomness only picks which slot to kick, not anything
//! security-sensitive.

/// Xorshift64 PRNG, no_std-compatible.
#[derive(Clone, Debug)]
pub(crate) struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    /// Create a generator from a seed. Xorshift state must be nonzero, so a
    /// zero seed is replaced with a fixed constant.
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 0x853c49e6748fea9b } else { seed },
        }
    }

    pub(crate) fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generate a random usize in `[0, bound)`.
    ///
    /// Uses rejection sampling to eliminate modulo bias. Bounds here are at
    /// most the slot count of a bucket, so the bias would be negligible
    /// anyway, but this is correct.
    pub(crate) fn next_bounded(&mut self, bound: usize) -> usize {
        let bound = bound as u64;
        // threshold = 2^64 % bound (using the wrapping_neg trick)
        let threshold = bound.wrapping_neg() % bound;
        loop {
            let r = self.next();
            if r >= threshold {
                return (r % bound) as usize;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let mut a = Xorshift64::new(42);
        let mut b = Xorshift64::new(42);
        for _ in 0..100 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test]
    fn test_zero_seed_usable() {
        let mut rng = Xorshift64::new(0);
        assert_ne!(rng.next(), 0);
    }

    #[test]
    fn test_bounded_in_range() {
        let mut rng = Xorshift64::new(7);
        for bound in 1..=8 {
            for _ in 0..1000 {
                assert!(rng.next_bounded(bound) < bound);
            }
        }
    }

    #[test]
    fn test_bounded_hits_all_values() {
        let mut rng = Xorshift64::new(9);
        let mut seen = [false; 4];
        for _ in 0..1000 {
            seen[rng.next_bounded(4)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
