use std::collections::BTreeMap;
use std::fmt;

use crate::exception::{NativeException, NativeResult};
use crate::primes::NttFriendlyPrimes;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SchemeType {
    None = 0,
    Bfv = 1,
    Ckks = 2,
}

impl TryFrom<u8> for SchemeType {
    type Error = NativeException;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SchemeType::None),
            1 => Ok(SchemeType::Bfv),
            2 => Ok(SchemeType::Ckks),
            other => Err(NativeException::invalid_argument(format!(
                "unsupported scheme {}",
                other
            ))),
        }
    }
}

/// Security tiers of the homomorphic encryption standard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SecurityLevel {
    None,
    Tc128,
    Tc192,
    Tc256,
}

/// Fingerprint of a parameter set, embedded in every serialized object.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParmsId(pub [u8; 32]);

impl ParmsId {
    pub const ZERO: ParmsId = ParmsId([0u8; 32]);

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for ParmsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParmsId(")?;
        self.0[..8].iter().try_for_each(|b| write!(f, "{:02x}", b))?;
        write!(f, "..)")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptionParameters {
    scheme: SchemeType,
    poly_modulus_degree: usize,
    coeff_modulus: Vec<u64>,
    plain_modulus: u64,
}

impl EncryptionParameters {
    pub fn new(scheme: SchemeType) -> Self {
        Self {
            scheme,
            poly_modulus_degree: 0,
            coeff_modulus: Vec::new(),
            plain_modulus: 0,
        }
    }

    pub fn set_poly_modulus_degree(&mut self, n: usize) {
        self.poly_modulus_degree = n;
    }

    pub fn set_coeff_modulus(&mut self, coeff_modulus: Vec<u64>) {
        self.coeff_modulus = coeff_modulus;
    }

    pub fn set_plain_modulus(&mut self, plain_modulus: u64) {
        self.plain_modulus = plain_modulus;
    }

    pub fn scheme(&self) -> SchemeType {
        self.scheme
    }

    pub fn poly_modulus_degree(&self) -> usize {
        self.poly_modulus_degree
    }

    pub fn coeff_modulus(&self) -> &[u64] {
        &self.coeff_modulus
    }

    pub fn plain_modulus(&self) -> u64 {
        self.plain_modulus
    }

    pub fn parms_id(&self) -> ParmsId {
        let mut hasher: blake3::Hasher = blake3::Hasher::new();
        hasher.update(&[self.scheme as u8]);
        hasher.update(&(self.poly_modulus_degree as u64).to_le_bytes());
        hasher.update(&(self.coeff_modulus.len() as u64).to_le_bytes());
        self.coeff_modulus.iter().for_each(|q| {
            hasher.update(&q.to_le_bytes());
        });
        hasher.update(&self.plain_modulus.to_le_bytes());
        ParmsId(*hasher.finalize().as_bytes())
    }
}

pub struct CoeffModulus;

const DEGREES: [usize; 6] = [1024, 2048, 4096, 8192, 16384, 32768];

const MAX_BITS_TC128: [u32; 6] = [27, 54, 109, 218, 438, 881];
const MAX_BITS_TC192: [u32; 6] = [19, 37, 75, 152, 305, 611];
const MAX_BITS_TC256: [u32; 6] = [14, 29, 58, 118, 237, 476];

const DEFAULT_TC128: [&[u32]; 6] = [
    &[27],
    &[54],
    &[36, 36, 37],
    &[43, 43, 44, 44, 44],
    &[48, 48, 48, 49, 49, 49, 49, 49, 49],
    &[55, 55, 55, 55, 55, 55, 55, 55, 55, 55, 55, 55, 55, 55, 55, 56],
];

const DEFAULT_TC192: [&[u32]; 6] = [
    &[19],
    &[37],
    &[25, 25, 25],
    &[38, 38, 38, 38],
    &[51, 51, 51, 51, 51, 50],
    &[56, 56, 56, 56, 56, 56, 56, 56, 56, 56, 51],
];

const DEFAULT_TC256: [&[u32]; 6] = [
    &[14],
    &[29],
    &[19, 19, 20],
    &[30, 30, 29, 29],
    &[60, 59, 59, 59],
    &[60, 60, 60, 60, 59, 59, 59, 59],
];

fn degree_index(n: usize) -> Option<usize> {
    DEGREES.iter().position(|d| *d == n)
}

impl CoeffModulus {
    /// Largest total coefficient-modulus bit count allowed at degree `n` for
    /// `level`; `None` when the degree is outside the table or the level is
    /// [`SecurityLevel::None`].
    pub fn max_bit_count(n: usize, level: SecurityLevel) -> Option<u32> {
        let i: usize = degree_index(n)?;
        match level {
            SecurityLevel::None => None,
            SecurityLevel::Tc128 => Some(MAX_BITS_TC128[i]),
            SecurityLevel::Tc192 => Some(MAX_BITS_TC192[i]),
            SecurityLevel::Tc256 => Some(MAX_BITS_TC256[i]),
        }
    }

    /// Default prime bit sizes for degree `n` at `level`.
    pub fn default_bit_sizes(n: usize, level: SecurityLevel) -> NativeResult<&'static [u32]> {
        let i: usize = degree_index(n).ok_or_else(|| {
            NativeException::invalid_argument(format!("no default coeff_modulus for degree {}", n))
        })?;
        match level {
            SecurityLevel::None => Err(NativeException::invalid_argument(
                "no default coeff_modulus without a security level",
            )),
            SecurityLevel::Tc128 => Ok(DEFAULT_TC128[i]),
            SecurityLevel::Tc192 => Ok(DEFAULT_TC192[i]),
            SecurityLevel::Tc256 => Ok(DEFAULT_TC256[i]),
        }
    }

    /// Default coefficient modulus, saturating the bound of `level`.
    pub fn bfv_default(n: usize, level: SecurityLevel) -> NativeResult<Vec<u64>> {
        Self::create(n, Self::default_bit_sizes(n, level)?)
    }

    /// Distinct NTT-friendly primes (`q = 1 mod 2n`) with the requested bit
    /// sizes, largest first within each size, in the order of `bit_sizes`.
    pub fn create(n: usize, bit_sizes: &[u32]) -> NativeResult<Vec<u64>> {
        if !n.is_power_of_two() || n < 2 {
            return Err(NativeException::invalid_argument(format!(
                "poly_modulus_degree={} is not a power of two",
                n
            )));
        }
        if bit_sizes.is_empty() || bit_sizes.len() > 64 {
            return Err(NativeException::invalid_argument(format!(
                "coeff_modulus count={} is out of range [1, 64]",
                bit_sizes.len()
            )));
        }
        if let Some(b) = bit_sizes.iter().find(|b| !(2..=60).contains(*b)) {
            return Err(NativeException::invalid_argument(format!(
                "bit size {} is out of range [2, 60]",
                b
            )));
        }

        let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
        bit_sizes.iter().for_each(|b| *counts.entry(*b).or_insert(0) += 1);

        let mut primes: BTreeMap<u32, std::vec::IntoIter<u64>> = BTreeMap::new();
        for (bits, count) in counts {
            let mut generator: NttFriendlyPrimes = NttFriendlyPrimes::new(bits, 2 * n as u64)?;
            primes.insert(bits, generator.next_downstream_primes(count)?.into_iter());
        }

        bit_sizes
            .iter()
            .map(|b| {
                primes
                    .get_mut(b)
                    .and_then(|it| it.next())
                    .ok_or_else(|| NativeException::logic_error("prime list exhausted"))
            })
            .collect()
    }
}

pub struct PlainModulus;

impl PlainModulus {
    /// Prime plain modulus of `bit_size` bits enabling batching at degree `n`.
    pub fn batching(n: usize, bit_size: u32) -> NativeResult<u64> {
        CoeffModulus::create(n, &[bit_size]).map(|p| p[0])
    }
}
