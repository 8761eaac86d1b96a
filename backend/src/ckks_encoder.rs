use std::f64::consts::PI;

use itertools::izip;
use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive};

use crate::complex::Complex;
use crate::context::Context;
use crate::exception::{NativeException, NativeResult};
use crate::modulus::reverse_bits_msb;
use crate::params::SchemeType;
use crate::plaintext::Plaintext;
use crate::pool::{Allocation, MemoryPool};
use crate::rns::{RnsBase, RnsPoly};

/// Twisted FFT tables for the canonical embedding: slot `k` is the evaluation
/// at `zeta^(2k+1)` with `zeta = exp(i*pi/n)`.
struct FftTables {
    n: usize,
    twist: Vec<Complex>,
    bit_rev: Vec<usize>,
    twiddles: Vec<Vec<Complex>>,
}

impl FftTables {
    fn new(n: usize) -> Self {
        let log_n: u32 = n.trailing_zeros();
        let twist: Vec<Complex> = (0..n)
            .map(|j| Complex::from_polar(1.0, PI * j as f64 / n as f64))
            .collect();
        let bit_rev: Vec<usize> = (0..n).map(|i| reverse_bits_msb(i, log_n)).collect();
        let twiddles: Vec<Vec<Complex>> = (0..log_n)
            .map(|s| {
                let half: usize = 1 << s;
                (0..half)
                    .map(|k| Complex::from_polar(1.0, -PI * k as f64 / half as f64))
                    .collect()
            })
            .collect();
        Self {
            n,
            twist,
            bit_rev,
            twiddles,
        }
    }

    /// In-place DFT `A[j] = sum_k a[k] exp(-2*pi*i*jk/n)`.
    fn fft(&self, a: &mut [Complex]) {
        debug_assert_eq!(a.len(), self.n);
        for i in 0..self.n {
            let j: usize = self.bit_rev[i];
            if i < j {
                a.swap(i, j);
            }
        }
        for (s, twiddles) in self.twiddles.iter().enumerate() {
            let half: usize = 1 << s;
            a.chunks_exact_mut(half << 1).for_each(|chunk| {
                let (lo, hi) = chunk.split_at_mut(half);
                izip!(lo, hi, twiddles).for_each(|(u, v, w)| {
                    let t: Complex = *w * *v;
                    let x: Complex = *u;
                    *u = x + t;
                    *v = x - t;
                });
            });
        }
    }
}

/// Approximate-number encoding of `n/2` complex slots.
pub struct CkksEncoder {
    context: Context,
    fft: FftTables,
}

impl CkksEncoder {
    pub fn new(context: &Context) -> NativeResult<Self> {
        context.require_scheme(SchemeType::Ckks)?;
        Ok(Self {
            context: context.clone(),
            fft: FftTables::new(context.poly_modulus_degree()),
        })
    }

    pub fn slot_count(&self) -> usize {
        self.context.poly_modulus_degree() >> 1
    }

    pub fn encode_f64(
        &self,
        values: &[f64],
        scale: f64,
        pool: &MemoryPool,
    ) -> NativeResult<Plaintext> {
        let values: Vec<Complex> = values.iter().map(|v| Complex::from(*v)).collect();
        self.encode_complex(&values, scale, pool)
    }

    pub fn encode_complex(
        &self,
        values: &[Complex],
        scale: f64,
        pool: &MemoryPool,
    ) -> NativeResult<Plaintext> {
        let base: &RnsBase = self.context.base()?;
        let n: usize = base.n();
        let slots: usize = self.slot_count();
        if values.len() > slots {
            return Err(NativeException::invalid_argument(format!(
                "values has size {} larger than slot_count {}",
                values.len(),
                slots
            )));
        }
        if !scale.is_finite() || scale <= 0.0 || scale.log2() + 1.0 >= base.bit_count() as f64 {
            return Err(NativeException::invalid_argument("scale out of bounds"));
        }
        if values.iter().any(|v| !v.re.is_finite() || !v.im.is_finite()) {
            return Err(NativeException::invalid_argument("encoded values must be finite"));
        }

        let mut a: Vec<Complex> = vec![Complex::ZERO; n];
        values.iter().enumerate().for_each(|(k, z)| {
            a[k] = *z;
            a[n - 1 - k] = z.conj();
        });
        self.fft.fft(&mut a);

        let inv_n: f64 = 1.0 / n as f64;
        let max_bits: f64 = base.bit_count() as f64 - 1.0;
        let mut poly: RnsPoly = base.alloc_poly();
        for (j, (a_j, twist)) in izip!(&a, &self.fft.twist).enumerate() {
            let coeff: f64 = ((*a_j * twist.conj()).re * inv_n * scale).round();
            if coeff != 0.0 && coeff.abs().log2() >= max_bits {
                return Err(NativeException::invalid_argument("encoded values are too large"));
            }
            if coeff.abs() < (1u64 << 62) as f64 {
                let c: i64 = coeff as i64;
                base.moduli()
                    .iter()
                    .enumerate()
                    .for_each(|(i, m)| poly.at_mut(i)[j] = m.reduce_i64(c));
            } else {
                let c: BigInt = BigInt::from_f64(coeff).ok_or_else(|| {
                    NativeException::invalid_argument("encoded values must be finite")
                })?;
                base.residues(&c)
                    .into_iter()
                    .enumerate()
                    .for_each(|(i, r)| poly.at_mut(i)[j] = r);
            }
        }

        Ok(Plaintext::from_poly(self.context.parms_id(), scale, poly, pool))
    }

    fn decode_core(&self, plaintext: &Plaintext, pool: &MemoryPool) -> NativeResult<Vec<Complex>> {
        plaintext.require_valid(&self.context)?;
        let base: &RnsBase = self.context.base()?;
        let n: usize = base.n();
        let _scratch: Allocation = pool.allocate(n * size_of::<Complex>());

        let poly: RnsPoly = plaintext.to_poly();
        let inv_scale: f64 = 1.0 / plaintext.scale();
        let mut b: Vec<Complex> = izip!(0..n, &self.fft.twist)
            .map(|(j, twist)| {
                let m_j: f64 = base.compose_centered(&poly, j).to_f64().unwrap_or(0.0) * inv_scale;
                twist.scale(m_j).conj()
            })
            .collect();
        self.fft.fft(&mut b);
        Ok(b.iter().take(self.slot_count()).map(|z| z.conj()).collect())
    }

    /// Real parts of the slots; scratch memory is drawn from `pool`.
    pub fn decode_f64(&self, plaintext: &Plaintext, pool: &MemoryPool) -> NativeResult<Vec<f64>> {
        Ok(self.decode_core(plaintext, pool)?.into_iter().map(|z| z.re).collect())
    }

    /// Complex slots; scratch memory is drawn from the global pool.
    pub fn decode_complex(&self, plaintext: &Plaintext) -> NativeResult<Vec<Complex>> {
        self.decode_core(plaintext, &MemoryPool::global())
    }
}
