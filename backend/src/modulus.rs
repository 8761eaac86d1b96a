/// Word-sized prime modulus, `q < 2^62`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Modulus {
    q: u64,
    bits: u32,
}

/// Operand prepared for Shoup multiplication: `(w, floor(w * 2^64 / q))`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shoup(pub u64, pub u64);

impl Shoup {
    #[inline(always)]
    pub fn value(&self) -> u64 {
        self.0
    }

    #[inline(always)]
    pub fn quotient(&self) -> u64 {
        self.1
    }
}

impl Modulus {
    pub fn new(q: u64) -> Self {
        assert!(
            q > 1 && q < (1 << 62),
            "invalid argument: q={} must be in [2, 2^62)",
            q
        );
        Self {
            q,
            bits: u64::BITS - q.leading_zeros(),
        }
    }

    #[inline(always)]
    pub fn q(&self) -> u64 {
        self.q
    }

    #[inline(always)]
    pub fn bit_count(&self) -> u32 {
        self.bits
    }

    #[inline(always)]
    pub fn reduce(&self, x: u64) -> u64 {
        x % self.q
    }

    #[inline(always)]
    pub fn reduce_u128(&self, x: u128) -> u64 {
        (x % self.q as u128) as u64
    }

    #[inline(always)]
    pub fn reduce_i64(&self, x: i64) -> u64 {
        x.rem_euclid(self.q as i64) as u64
    }

    /// Maps `x` in `[0, q)` to its centered representative in `(-q/2, q/2]`.
    #[inline(always)]
    pub fn center(&self, x: u64) -> i64 {
        if x > self.q >> 1 {
            x as i64 - self.q as i64
        } else {
            x as i64
        }
    }

    #[inline(always)]
    pub fn add(&self, a: u64, b: u64) -> u64 {
        let s: u64 = a + b;
        if s >= self.q { s - self.q } else { s }
    }

    #[inline(always)]
    pub fn sub(&self, a: u64, b: u64) -> u64 {
        if a >= b { a - b } else { a + self.q - b }
    }

    #[inline(always)]
    pub fn neg(&self, a: u64) -> u64 {
        if a == 0 { 0 } else { self.q - a }
    }

    #[inline(always)]
    pub fn mul(&self, a: u64, b: u64) -> u64 {
        ((a as u128 * b as u128) % self.q as u128) as u64
    }

    pub fn pow(&self, x: u64, exponent: u64) -> u64 {
        let mut y: u64 = 1;
        let mut x_pow: u64 = self.reduce(x);
        let mut e: u64 = exponent;
        while e > 0 {
            if e & 1 == 1 {
                y = self.mul(y, x_pow);
            }
            x_pow = self.mul(x_pow, x_pow);
            e >>= 1;
        }
        y
    }

    /// Inverse of `x` modulo `q`, if `gcd(x, q) = 1`.
    pub fn inv(&self, x: u64) -> Option<u64> {
        inv_mod(x, self.q)
    }

    pub fn prepare(&self, w: u64) -> Shoup {
        let w: u64 = self.reduce(w);
        Shoup(w, (((w as u128) << 64) / self.q as u128) as u64)
    }

    #[inline(always)]
    pub fn mul_shoup(&self, w: Shoup, x: u64) -> u64 {
        let t: u64 = ((w.1 as u128 * x as u128) >> 64) as u64;
        let r: u64 = w.0.wrapping_mul(x).wrapping_sub(t.wrapping_mul(self.q));
        if r >= self.q { r - self.q } else { r }
    }

    /// Smallest `psi` of multiplicative order exactly `nth_root` (a power of two).
    pub fn primitive_nth_root(&self, nth_root: u64) -> Option<u64> {
        assert!(
            nth_root.is_power_of_two() && nth_root >= 2,
            "invalid argument: nth_root={} must be a power of two",
            nth_root
        );
        if (self.q - 1) % nth_root != 0 {
            return None;
        }
        let exponent: u64 = (self.q - 1) / nth_root;
        let mut best: Option<u64> = None;
        for g in 2..self.q {
            let psi: u64 = self.pow(g, exponent);
            if self.pow(psi, nth_root >> 1) == self.q - 1 {
                // every odd power of a primitive root is primitive
                let psi_sq: u64 = self.mul(psi, psi);
                let mut candidate: u64 = psi;
                for _ in 0..nth_root >> 1 {
                    if best.is_none_or(|b| candidate < b) {
                        best = Some(candidate);
                    }
                    candidate = self.mul(candidate, psi_sq);
                }
                return best;
            }
        }
        None
    }
}

/// Inverse of `x` modulo an arbitrary `m > 1`.
pub fn inv_mod(x: u64, m: u64) -> Option<u64> {
    let (mut r0, mut r1): (i128, i128) = (m as i128, (x % m) as i128);
    let (mut t0, mut t1): (i128, i128) = (0, 1);
    while r1 != 0 {
        let q: i128 = r0 / r1;
        (r0, r1) = (r1, r0 - q * r1);
        (t0, t1) = (t1, t0 - q * t1);
    }
    if r0 != 1 {
        return None;
    }
    Some(t0.rem_euclid(m as i128) as u64)
}

pub(crate) fn reverse_bits_msb(x: usize, log_n: u32) -> usize {
    if log_n == 0 {
        return 0;
    }
    x.reverse_bits() >> (usize::BITS - log_n)
}
