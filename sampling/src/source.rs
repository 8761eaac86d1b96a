use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_core::RngCore;

const MAXF64: f64 = 9007199254740992.0;

/// Seedable randomness source used for every secret, error and mask
/// polynomial drawn by the engine.
pub struct Source {
    source: ChaCha8Rng,
}

/// Draws a fresh 32-byte seed from the thread-local OS-seeded generator.
pub fn new_seed() -> [u8; 32] {
    let mut seed: [u8; 32] = [0u8; 32];
    rand::rng().fill_bytes(&mut seed);
    seed
}

impl Source {
    pub fn new(seed: [u8; 32]) -> Source {
        Source {
            source: ChaCha8Rng::from_seed(seed),
        }
    }

    /// Source seeded from the operating system.
    pub fn from_entropy() -> Source {
        Source::new(new_seed())
    }

    pub fn new_seed(&mut self) -> [u8; 32] {
        let mut seed: [u8; 32] = [0u8; 32];
        self.source.fill_bytes(&mut seed);
        seed
    }

    pub fn branch(&mut self) -> Self {
        Source::new(self.new_seed())
    }

    /// Rejection-samples a value in `[0, max)` from `next_u64() & mask`.
    #[inline(always)]
    pub fn next_u64n(&mut self, max: u64, mask: u64) -> u64 {
        let mut x: u64 = self.next_u64() & mask;
        while x >= max {
            x = self.next_u64() & mask;
        }
        x
    }

    /// Uniform value in `[0, q)`.
    #[inline(always)]
    pub fn next_mod(&mut self, q: u64) -> u64 {
        let mask: u64 = u64::MAX >> q.leading_zeros();
        self.next_u64n(q, mask)
    }

    #[inline(always)]
    pub fn next_f64(&mut self, min: f64, max: f64) -> f64 {
        min + ((self.next_u64() << 11 >> 11) as f64) / MAXF64 * (max - min)
    }

    #[inline(always)]
    pub fn next_i64(&mut self) -> i64 {
        self.next_u64() as i64
    }
}

impl RngCore for Source {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        self.source.next_u32()
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        self.source.next_u64()
    }

    #[inline(always)]
    fn fill_bytes(&mut self, bytes: &mut [u8]) {
        self.source.fill_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a: Source = Source::new([7u8; 32]);
        let mut b: Source = Source::new([7u8; 32]);
        (0..16).for_each(|_| assert_eq!(a.next_u64(), b.next_u64()));
    }

    #[test]
    fn next_mod_in_range() {
        let mut source: Source = Source::new([1u8; 32]);
        let q: u64 = 786433;
        (0..4096).for_each(|_| assert!(source.next_mod(q) < q));
    }

    #[test]
    fn next_f64_in_range() {
        let mut source: Source = Source::new([2u8; 32]);
        (0..4096).for_each(|_| {
            let x: f64 = source.next_f64(-0.5, 0.5);
            assert!((-0.5..0.5).contains(&x));
        });
    }
}
