use itertools::izip;

use crate::exception::{NativeException, NativeResult};
use crate::modulus::{Modulus, Shoup, reverse_bits_msb};

/// Negacyclic NTT over `Z_q[X]/(X^n + 1)`.
///
/// Forward output is in bit-reversed order, backward input is expected in
/// bit-reversed order; the pair is an exact inverse.
pub struct Table {
    modulus: Modulus,
    n: usize,
    psi: u64,
    psi_forward_rev: Vec<Shoup>,
    psi_backward_rev: Vec<Shoup>,
    n_inv: Shoup,
}

impl Table {
    pub fn new(modulus: Modulus, n: usize) -> NativeResult<Table> {
        if !n.is_power_of_two() || n < 2 {
            return Err(NativeException::invalid_argument(format!(
                "n={} is not a power of two",
                n
            )));
        }

        let nth_root: u64 = (n as u64) << 1;
        let psi: u64 = modulus.primitive_nth_root(nth_root).ok_or_else(|| {
            NativeException::invalid_argument(format!(
                "q={} has no primitive {}-th root of unity",
                modulus.q(),
                nth_root
            ))
        })?;
        let psi_inv: u64 = modulus
            .inv(psi)
            .ok_or_else(|| NativeException::logic_error("psi is not invertible"))?;
        let n_inv: u64 = modulus
            .inv(n as u64)
            .ok_or_else(|| NativeException::logic_error("n is not invertible"))?;

        let log_n: u32 = n.trailing_zeros();

        let mut psi_forward_rev: Vec<Shoup> = vec![modulus.prepare(1); n];
        let mut psi_backward_rev: Vec<Shoup> = vec![modulus.prepare(1); n];

        let mut powers_forward: u64 = 1u64;
        let mut powers_backward: u64 = 1u64;

        for i in 1..n {
            let i_rev: usize = reverse_bits_msb(i, log_n);
            powers_forward = modulus.mul(powers_forward, psi);
            powers_backward = modulus.mul(powers_backward, psi_inv);
            psi_forward_rev[i_rev] = modulus.prepare(powers_forward);
            psi_backward_rev[i_rev] = modulus.prepare(powers_backward);
        }

        Ok(Self {
            modulus,
            n,
            psi,
            psi_forward_rev,
            psi_backward_rev,
            n_inv: modulus.prepare(n_inv),
        })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn modulus(&self) -> &Modulus {
        &self.modulus
    }

    pub fn psi(&self) -> u64 {
        self.psi
    }

    pub fn forward_inplace(&self, a: &mut [u64]) {
        assert_eq!(
            a.len(),
            self.n,
            "invalid argument: a.len()={} != n={}",
            a.len(),
            self.n
        );
        let log_n: u32 = self.n.trailing_zeros();
        for layer in 0..log_n {
            let (m, size) = (1usize << layer, 1usize << (log_n - layer - 1));
            izip!(a.chunks_exact_mut(2 * size), &self.psi_forward_rev[m..]).for_each(|(a, psi)| {
                let (a, b) = a.split_at_mut(size);
                izip!(a, b).for_each(|(a, b)| self.dit_inplace(a, b, *psi));
            });
        }
    }

    pub fn backward_inplace(&self, a: &mut [u64]) {
        assert_eq!(
            a.len(),
            self.n,
            "invalid argument: a.len()={} != n={}",
            a.len(),
            self.n
        );
        let log_n: u32 = self.n.trailing_zeros();
        for layer in (0..log_n).rev() {
            let (m, size) = (1usize << layer, 1usize << (log_n - layer - 1));
            izip!(a.chunks_exact_mut(2 * size), &self.psi_backward_rev[m..]).for_each(|(a, psi)| {
                let (a, b) = a.split_at_mut(size);
                izip!(a, b).for_each(|(a, b)| self.dif_inplace(a, b, *psi));
            });
        }
        a.iter_mut()
            .for_each(|x| *x = self.modulus.mul_shoup(self.n_inv, *x));
    }

    #[inline(always)]
    fn dit_inplace(&self, a: &mut u64, b: &mut u64, t: Shoup) {
        debug_assert!(*a < self.modulus.q(), "a:{} q:{}", a, self.modulus.q());
        let bt: u64 = self.modulus.mul_shoup(t, *b);
        *b = self.modulus.sub(*a, bt);
        *a = self.modulus.add(*a, bt);
    }

    #[inline(always)]
    fn dif_inplace(&self, a: &mut u64, b: &mut u64, t: Shoup) {
        debug_assert!(*a < self.modulus.q(), "a:{} q:{}", a, self.modulus.q());
        let d: u64 = self.modulus.sub(*a, *b);
        *a = self.modulus.add(*a, *b);
        *b = self.modulus.mul_shoup(t, d);
    }
}
