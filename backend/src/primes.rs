use primality_test::is_prime;

use crate::exception::{NativeException, NativeResult};

/// Walks down the primes `p = 1 mod nth_root` with exactly `bit_size` bits,
/// starting from `2^bit_size`.
pub struct NttFriendlyPrimes {
    bit_size: u32,
    nth_root: u64,
    prev_prime: u64,
}

impl NttFriendlyPrimes {
    pub fn new(bit_size: u32, nth_root: u64) -> NativeResult<Self> {
        if !(2..=61).contains(&bit_size) {
            return Err(NativeException::invalid_argument(format!(
                "bit_size={} is out of range [2, 61]",
                bit_size
            )));
        }
        if nth_root == 0 || nth_root >= (1u64 << bit_size) {
            return Err(NativeException::invalid_argument(format!(
                "nth_root={} is too large for bit_size={}",
                nth_root, bit_size
            )));
        }
        Ok(Self {
            bit_size,
            nth_root,
            prev_prime: (1u64 << bit_size) + 1 - nth_root,
        })
    }

    pub fn next_downstream_prime(&mut self) -> NativeResult<u64> {
        let lower: u64 = 1u64 << (self.bit_size - 1);
        while self.prev_prime >= lower {
            let candidate: u64 = self.prev_prime;
            self.prev_prime = match self.prev_prime.checked_sub(self.nth_root) {
                Some(p) => p,
                None => 0,
            };
            if is_prime(candidate) {
                return Ok(candidate);
            }
        }
        Err(NativeException::logic_error(format!(
            "failed to find enough qualifying primes of {} bits",
            self.bit_size
        )))
    }

    pub fn next_downstream_primes(&mut self, k: usize) -> NativeResult<Vec<u64>> {
        (0..k).map(|_| self.next_downstream_prime()).collect()
    }
}
