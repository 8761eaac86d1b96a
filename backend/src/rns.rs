use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use itertools::izip;
use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};

use crate::exception::{NativeException, NativeResult};
use crate::modulus::Modulus;
use crate::ntt::Table;

/// Polynomial of `Z_Q[X]/(X^n + 1)` stored limb-major in RNS form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RnsPoly {
    pub(crate) n: usize,
    pub(crate) data: Vec<Vec<u64>>,
}

impl RnsPoly {
    pub fn alloc(n: usize, limbs: usize) -> Self {
        Self {
            n,
            data: vec![vec![0u64; n]; limbs],
        }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn limbs(&self) -> usize {
        self.data.len()
    }

    pub fn at(&self, i: usize) -> &[u64] {
        &self.data[i]
    }

    pub fn at_mut(&mut self, i: usize) -> &mut [u64] {
        &mut self.data[i]
    }

    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|limb| limb.iter().all(|x| *x == 0))
    }

    pub fn size_in_bytes(&self) -> usize {
        self.n * self.data.len() * size_of::<u64>()
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_u64::<LittleEndian>(self.n as u64)?;
        writer.write_u64::<LittleEndian>(self.data.len() as u64)?;
        for limb in self.data.iter() {
            for x in limb.iter() {
                writer.write_u64::<LittleEndian>(*x)?;
            }
        }
        Ok(())
    }

    /// Reads a polynomial and checks it against `base`.
    pub fn read_from<R: Read>(reader: &mut R, base: &RnsBase) -> NativeResult<Self> {
        let n: usize = reader.read_u64::<LittleEndian>()? as usize;
        let limbs: usize = reader.read_u64::<LittleEndian>()? as usize;
        if n != base.n() || limbs != base.len() {
            return Err(NativeException::invalid_argument(format!(
                "polynomial shape (n={}, limbs={}) does not match the encryption parameters (n={}, limbs={})",
                n,
                limbs,
                base.n(),
                base.len()
            )));
        }
        let mut poly: RnsPoly = RnsPoly::alloc(n, limbs);
        for (limb, modulus) in izip!(poly.data.iter_mut(), base.moduli()) {
            for x in limb.iter_mut() {
                *x = reader.read_u64::<LittleEndian>()?;
                if *x >= modulus.q() {
                    return Err(NativeException::invalid_argument(
                        "polynomial coefficient is not reduced",
                    ));
                }
            }
        }
        Ok(poly)
    }
}

/// Coefficient-modulus basis `Q = q_0 * ... * q_{L-1}` with its NTT tables and
/// CRT constants.
pub struct RnsBase {
    n: usize,
    moduli: Vec<Modulus>,
    tables: Vec<Table>,
    product: BigUint,
    punctured: Vec<BigUint>,
    punctured_inv: Vec<u64>,
}

impl RnsBase {
    pub fn new(n: usize, primes: &[u64]) -> NativeResult<Self> {
        if primes.is_empty() {
            return Err(NativeException::invalid_argument("coeff_modulus is empty"));
        }
        let moduli: Vec<Modulus> = primes.iter().map(|q| Modulus::new(*q)).collect();
        let tables: Vec<Table> = moduli
            .iter()
            .map(|m| Table::new(*m, n))
            .collect::<NativeResult<Vec<Table>>>()?;
        let product: BigUint = primes
            .iter()
            .fold(BigUint::from(1u64), |acc, q| acc * BigUint::from(*q));
        let punctured: Vec<BigUint> = primes.iter().map(|q| &product / *q).collect();
        let punctured_inv: Vec<u64> = izip!(&moduli, &punctured)
            .map(|(m, q_hat)| {
                let q_hat_mod: u64 = (q_hat % m.q()).to_u64().unwrap_or(0);
                m.inv(q_hat_mod).ok_or_else(|| {
                    NativeException::invalid_argument(
                        "coeff_modulus primes are not pairwise coprime",
                    )
                })
            })
            .collect::<NativeResult<Vec<u64>>>()?;
        Ok(Self {
            n,
            moduli,
            tables,
            product,
            punctured,
            punctured_inv,
        })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn len(&self) -> usize {
        self.moduli.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moduli.is_empty()
    }

    pub fn moduli(&self) -> &[Modulus] {
        &self.moduli
    }

    pub fn product(&self) -> &BigUint {
        &self.product
    }

    pub fn bit_count(&self) -> u64 {
        self.product.bits()
    }

    pub fn alloc_poly(&self) -> RnsPoly {
        RnsPoly::alloc(self.n, self.len())
    }

    /// Lifts small signed coefficients into every limb.
    pub fn from_signed(&self, coeffs: &[i64]) -> RnsPoly {
        let mut poly: RnsPoly = self.alloc_poly();
        izip!(poly.data.iter_mut(), &self.moduli).for_each(|(limb, m)| {
            izip!(limb.iter_mut(), coeffs).for_each(|(x, c)| *x = m.reduce_i64(*c));
        });
        poly
    }

    /// Reduces a big signed integer into its residues.
    pub fn residues(&self, x: &BigInt) -> Vec<u64> {
        self.moduli
            .iter()
            .map(|m| {
                x.mod_floor(&BigInt::from(m.q()))
                    .to_u64()
                    .unwrap_or(0)
            })
            .collect()
    }

    /// CRT reconstruction of coefficient `i` in `[0, Q)`.
    pub fn compose(&self, poly: &RnsPoly, i: usize) -> BigUint {
        let mut acc: BigUint = BigUint::zero();
        for (j, m) in self.moduli.iter().enumerate() {
            let y: u64 = m.mul(poly.data[j][i], self.punctured_inv[j]);
            acc += &self.punctured[j] * y;
        }
        acc % &self.product
    }

    /// CRT reconstruction of coefficient `i` in `(-Q/2, Q/2]`.
    pub fn compose_centered(&self, poly: &RnsPoly, i: usize) -> BigInt {
        let x: BigUint = self.compose(poly, i);
        let half: BigUint = &self.product >> 1;
        if x > half {
            BigInt::from_biguint(Sign::Minus, &self.product - x)
        } else {
            BigInt::from_biguint(Sign::Plus, x)
        }
    }

    pub fn ntt_forward(&self, poly: &mut RnsPoly) {
        izip!(poly.data.iter_mut(), &self.tables)
            .for_each(|(limb, table)| table.forward_inplace(limb));
    }

    pub fn ntt_backward(&self, poly: &mut RnsPoly) {
        izip!(poly.data.iter_mut(), &self.tables)
            .for_each(|(limb, table)| table.backward_inplace(limb));
    }

    pub fn add_assign(&self, a: &mut RnsPoly, b: &RnsPoly) {
        izip!(a.data.iter_mut(), &b.data, &self.moduli).for_each(|(a, b, m)| {
            izip!(a.iter_mut(), b).for_each(|(x, y)| *x = m.add(*x, *y));
        });
    }

    pub fn sub_assign(&self, a: &mut RnsPoly, b: &RnsPoly) {
        izip!(a.data.iter_mut(), &b.data, &self.moduli).for_each(|(a, b, m)| {
            izip!(a.iter_mut(), b).for_each(|(x, y)| *x = m.sub(*x, *y));
        });
    }

    pub fn neg_assign(&self, a: &mut RnsPoly) {
        izip!(a.data.iter_mut(), &self.moduli).for_each(|(a, m)| {
            a.iter_mut().for_each(|x| *x = m.neg(*x));
        });
    }

    /// Pointwise product of two polynomials in NTT form.
    pub fn mul_pointwise(&self, a: &RnsPoly, b: &RnsPoly) -> RnsPoly {
        let mut c: RnsPoly = self.alloc_poly();
        izip!(c.data.iter_mut(), &a.data, &b.data, &self.moduli).for_each(|(c, a, b, m)| {
            izip!(c.iter_mut(), a, b).for_each(|(z, x, y)| *z = m.mul(*x, *y));
        });
        c
    }

    /// Negacyclic product of two polynomials in coefficient form.
    pub fn multiply(&self, a: &RnsPoly, b: &RnsPoly) -> RnsPoly {
        let mut a_ntt: RnsPoly = a.clone();
        let mut b_ntt: RnsPoly = b.clone();
        self.ntt_forward(&mut a_ntt);
        self.ntt_forward(&mut b_ntt);
        let mut c: RnsPoly = self.mul_pointwise(&a_ntt, &b_ntt);
        self.ntt_backward(&mut c);
        c
    }

    /// Multiplies every limb `j` by `scalars[j]`.
    pub fn mul_scalar_assign(&self, a: &mut RnsPoly, scalars: &[u64]) {
        izip!(a.data.iter_mut(), scalars, &self.moduli).for_each(|(a, s, m)| {
            let s_prep = m.prepare(*s);
            a.iter_mut().for_each(|x| *x = m.mul_shoup(s_prep, *x));
        });
    }

    /// Applies `X -> X^galois_elt` to a polynomial in coefficient form.
    pub fn automorphism(&self, a: &RnsPoly, galois_elt: usize) -> RnsPoly {
        let n: usize = self.n;
        let mask: usize = 2 * n - 1;
        let mut b: RnsPoly = self.alloc_poly();
        izip!(b.data.iter_mut(), &a.data, &self.moduli).for_each(|(b, a, m)| {
            a.iter().enumerate().for_each(|(i, x)| {
                let j: usize = (i * galois_elt) & mask;
                if j < n {
                    b[j] = *x;
                } else {
                    b[j - n] = m.neg(*x);
                }
            });
        });
        b
    }
}
