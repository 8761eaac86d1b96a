use std::sync::Arc;

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use primality_test::is_prime;
use tracing::debug;

use crate::exception::{NativeException, NativeResult};
use crate::modulus::Modulus;
use crate::ntt::Table;
use crate::params::{CoeffModulus, EncryptionParameters, ParmsId, SchemeType, SecurityLevel};
use crate::pool::{Allocation, MemoryPool};
use crate::rns::RnsBase;

pub const POLY_MODULUS_DEGREE_MAX: usize = 32768;

/// Outcome of parameter validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParameterError {
    Success,
    NoneScheme,
    InvalidPolyModulusDegree,
    InvalidCoeffModulusSize,
    InvalidCoeffModulusBitCount,
    InvalidCoeffModulusNotPrime,
    InvalidCoeffModulusDuplicate,
    InvalidCoeffModulusNoNtt,
    InvalidParametersInsecure,
    InvalidPlainModulusBitCount,
    InvalidPlainModulusCoprimality,
    InvalidPlainModulusTooLarge,
    InvalidPlainModulusNonzero,
    FailedCreatingRnsBase,
}

impl ParameterError {
    pub fn name(&self) -> &'static str {
        match self {
            ParameterError::Success => "success",
            ParameterError::NoneScheme => "none_scheme",
            ParameterError::InvalidPolyModulusDegree => "invalid_poly_modulus_degree",
            ParameterError::InvalidCoeffModulusSize => "invalid_coeff_modulus_size",
            ParameterError::InvalidCoeffModulusBitCount => "invalid_coeff_modulus_bit_count",
            ParameterError::InvalidCoeffModulusNotPrime => "invalid_coeff_modulus_not_prime",
            ParameterError::InvalidCoeffModulusDuplicate => "invalid_coeff_modulus_duplicate",
            ParameterError::InvalidCoeffModulusNoNtt => "invalid_coeff_modulus_no_ntt",
            ParameterError::InvalidParametersInsecure => "invalid_parameters_insecure",
            ParameterError::InvalidPlainModulusBitCount => "invalid_plain_modulus_bit_count",
            ParameterError::InvalidPlainModulusCoprimality => "invalid_plain_modulus_coprimality",
            ParameterError::InvalidPlainModulusTooLarge => "invalid_plain_modulus_too_large",
            ParameterError::InvalidPlainModulusNonzero => "invalid_plain_modulus_nonzero",
            ParameterError::FailedCreatingRnsBase => "failed_creating_rns_base",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ParameterError::Success => "valid",
            ParameterError::NoneScheme => "scheme must be BFV or CKKS",
            ParameterError::InvalidPolyModulusDegree => {
                "poly_modulus_degree must be a power of two in [2, 32768]"
            }
            ParameterError::InvalidCoeffModulusSize => {
                "coeff_modulus must contain between 1 and 64 primes"
            }
            ParameterError::InvalidCoeffModulusBitCount => {
                "coeff_modulus primes must have between 2 and 60 bits"
            }
            ParameterError::InvalidCoeffModulusNotPrime => "coeff_modulus values must be prime",
            ParameterError::InvalidCoeffModulusDuplicate => "coeff_modulus primes must be distinct",
            ParameterError::InvalidCoeffModulusNoNtt => {
                "coeff_modulus primes must be congruent to 1 modulo 2 * poly_modulus_degree"
            }
            ParameterError::InvalidParametersInsecure => {
                "parameters are not compliant with the HomomorphicEncryption.org security standard"
            }
            ParameterError::InvalidPlainModulusBitCount => {
                "plain_modulus must have between 2 and 60 bits"
            }
            ParameterError::InvalidPlainModulusCoprimality => {
                "plain_modulus must be coprime to every coeff_modulus prime"
            }
            ParameterError::InvalidPlainModulusTooLarge => {
                "plain_modulus must be smaller than the coefficient modulus"
            }
            ParameterError::InvalidPlainModulusNonzero => "plain_modulus must be zero for CKKS",
            ParameterError::FailedCreatingRnsBase => "failed to build the RNS base",
        }
    }
}

pub(crate) struct ContextData {
    parms: EncryptionParameters,
    parms_id: ParmsId,
    security_level: SecurityLevel,
    parameter_error: ParameterError,
    base: Option<RnsBase>,
    plain_modulus: Option<Modulus>,
    plain_table: Option<Table>,
    delta: Vec<u64>,
    _alloc: Allocation,
}

/// Validated parameter set with the precomputations every engine object
/// needs. Cheap to clone.
#[derive(Clone)]
pub struct Context {
    data: Arc<ContextData>,
}

impl Context {
    /// Never fails: invalid parameters yield a context whose
    /// [`Context::parameters_set`] is false.
    pub fn new(
        parms: EncryptionParameters,
        security_level: SecurityLevel,
        pool: &MemoryPool,
    ) -> Context {
        let parms_id: ParmsId = parms.parms_id();
        let mut parameter_error: ParameterError = validate(&parms, security_level);

        let mut base: Option<RnsBase> = None;
        let mut plain_modulus: Option<Modulus> = None;
        let mut plain_table: Option<Table> = None;
        let mut delta: Vec<u64> = Vec::new();

        if parameter_error == ParameterError::Success {
            match RnsBase::new(parms.poly_modulus_degree(), parms.coeff_modulus()) {
                Ok(b) => {
                    if parms.scheme() == SchemeType::Bfv {
                        let t: Modulus = Modulus::new(parms.plain_modulus());
                        let q_over_t: BigUint = b.product() / t.q();
                        delta = b
                            .moduli()
                            .iter()
                            .map(|m| (&q_over_t % m.q()).to_u64().unwrap_or(0))
                            .collect();
                        if is_prime(t.q()) {
                            plain_table = Table::new(t, parms.poly_modulus_degree()).ok();
                        }
                        plain_modulus = Some(t);
                    }
                    base = Some(b);
                }
                Err(_) => parameter_error = ParameterError::FailedCreatingRnsBase,
            }
        }

        let bytes: usize = base
            .as_ref()
            .map(|b| b.n() * b.len() * 2 * size_of::<u64>())
            .unwrap_or(0);

        debug!(
            n = parms.poly_modulus_degree(),
            coeff_modulus_bits = total_bits(parms.coeff_modulus()),
            parameters_set = parameter_error == ParameterError::Success,
            error = parameter_error.name(),
            "created context"
        );

        Context {
            data: Arc::new(ContextData {
                parms,
                parms_id,
                security_level,
                parameter_error,
                base,
                plain_modulus,
                plain_table,
                delta,
                _alloc: pool.allocate(bytes),
            }),
        }
    }

    pub fn parameters_set(&self) -> bool {
        self.data.parameter_error == ParameterError::Success
    }

    pub fn parameter_error(&self) -> ParameterError {
        self.data.parameter_error
    }

    pub fn parameter_error_name(&self) -> &'static str {
        self.data.parameter_error.name()
    }

    pub fn parameter_error_message(&self) -> &'static str {
        self.data.parameter_error.message()
    }

    pub fn parms(&self) -> &EncryptionParameters {
        &self.data.parms
    }

    pub fn parms_id(&self) -> ParmsId {
        self.data.parms_id
    }

    pub fn scheme(&self) -> SchemeType {
        self.data.parms.scheme()
    }

    pub fn security_level(&self) -> SecurityLevel {
        self.data.security_level
    }

    pub fn poly_modulus_degree(&self) -> usize {
        self.data.parms.poly_modulus_degree()
    }

    pub fn total_coeff_modulus_bit_count(&self) -> u32 {
        total_bits(self.data.parms.coeff_modulus())
    }

    pub fn using_batching(&self) -> bool {
        self.data.plain_table.is_some()
    }

    pub fn ptr_eq(&self, other: &Context) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Fails with the validation message when the parameters are not set.
    pub fn require_set(&self) -> NativeResult<()> {
        if self.parameters_set() {
            Ok(())
        } else {
            Err(NativeException::invalid_argument(format!(
                "encryption parameters are not set correctly: {}",
                self.parameter_error_message()
            )))
        }
    }

    pub(crate) fn require_scheme(&self, scheme: SchemeType) -> NativeResult<()> {
        self.require_set()?;
        if self.scheme() != scheme {
            return Err(NativeException::invalid_argument(format!(
                "unsupported scheme {:?}, expected {:?}",
                self.scheme(),
                scheme
            )));
        }
        Ok(())
    }

    pub(crate) fn base(&self) -> NativeResult<&RnsBase> {
        self.require_set()?;
        self.data
            .base
            .as_ref()
            .ok_or_else(|| NativeException::logic_error("context has no coefficient modulus base"))
    }

    pub(crate) fn plain_modulus(&self) -> NativeResult<&Modulus> {
        self.data
            .plain_modulus
            .as_ref()
            .ok_or_else(|| NativeException::logic_error("context has no plain modulus"))
    }

    pub(crate) fn plain_table(&self) -> NativeResult<&Table> {
        self.data.plain_table.as_ref().ok_or_else(|| {
            NativeException::invalid_argument("encryption parameters are not valid for batching")
        })
    }

    /// `floor(Q / t)` modulo each coefficient-modulus prime.
    pub(crate) fn delta(&self) -> &[u64] {
        &self.data.delta
    }
}

fn total_bits(coeff_modulus: &[u64]) -> u32 {
    coeff_modulus.iter().map(|q| u64::BITS - q.leading_zeros()).sum()
}

fn validate(parms: &EncryptionParameters, security_level: SecurityLevel) -> ParameterError {
    if parms.scheme() == SchemeType::None {
        return ParameterError::NoneScheme;
    }

    let n: usize = parms.poly_modulus_degree();
    if !n.is_power_of_two() || !(2..=POLY_MODULUS_DEGREE_MAX).contains(&n) {
        return ParameterError::InvalidPolyModulusDegree;
    }

    let coeff_modulus: &[u64] = parms.coeff_modulus();
    if coeff_modulus.is_empty() || coeff_modulus.len() > 64 {
        return ParameterError::InvalidCoeffModulusSize;
    }
    if coeff_modulus
        .iter()
        .any(|q| !(2..=60).contains(&(u64::BITS - q.leading_zeros())))
    {
        return ParameterError::InvalidCoeffModulusBitCount;
    }
    if coeff_modulus.iter().any(|q| !is_prime(*q)) {
        return ParameterError::InvalidCoeffModulusNotPrime;
    }
    let mut sorted: Vec<u64> = coeff_modulus.to_vec();
    sorted.sort_unstable();
    if sorted.windows(2).any(|w| w[0] == w[1]) {
        return ParameterError::InvalidCoeffModulusDuplicate;
    }
    let two_n: u64 = 2 * n as u64;
    if coeff_modulus.iter().any(|q| q % two_n != 1) {
        return ParameterError::InvalidCoeffModulusNoNtt;
    }

    if security_level != SecurityLevel::None {
        match CoeffModulus::max_bit_count(n, security_level) {
            Some(max) if total_bits(coeff_modulus) <= max => {}
            _ => return ParameterError::InvalidParametersInsecure,
        }
    }

    let t: u64 = parms.plain_modulus();
    match parms.scheme() {
        SchemeType::Bfv => {
            if !(2..=60).contains(&(u64::BITS - t.leading_zeros())) {
                return ParameterError::InvalidPlainModulusBitCount;
            }
            if coeff_modulus.iter().any(|q| num_integer::gcd(*q, t) != 1) {
                return ParameterError::InvalidPlainModulusCoprimality;
            }
            if total_bits(coeff_modulus) <= u64::BITS - t.leading_zeros() {
                return ParameterError::InvalidPlainModulusTooLarge;
            }
        }
        SchemeType::Ckks => {
            if t != 0 {
                return ParameterError::InvalidPlainModulusNonzero;
            }
        }
        SchemeType::None => return ParameterError::NoneScheme,
    }

    ParameterError::Success
}
