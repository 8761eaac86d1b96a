//! Maps a computation level and a security tier to concrete encryption
//! parameters. The mapping is a fixed lookup; nothing is validated here and
//! unsupported tuples only show up once a context reports
//! `parameters_set() == false`.

use crate::error::Result;
use crate::scheme::{ComputationLevel, SecurityTier};

/// Polynomial modulus degrees a profile may carry.
pub const POLY_MODULUS_LADDER: [usize; 4] = [4096, 8192, 16384, 32768];

/// Batching prime used for every level and tier. Congruent to 1 modulo
/// 2N for all degrees of the ladder.
pub const PLAIN_MODULUS_CANDIDATE: u64 = 786433;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EncryptionParameterProfile {
    pub poly_modulus_degree: usize,
    /// Degree whose default coefficient modulus is used.
    pub coeff_modulus_degree: usize,
    pub plain_modulus_candidate: u64,
    pub scale: f64,
    pub security: SecurityTier,
}

impl EncryptionParameterProfile {
    pub fn scale_exponent(&self) -> i32 {
        self.scale.log2().round() as i32
    }
}

pub fn poly_modulus_degree(level: ComputationLevel) -> usize {
    match level {
        ComputationLevel::Low => POLY_MODULUS_LADDER[0],
        ComputationLevel::Medium => POLY_MODULUS_LADDER[1],
        ComputationLevel::High => POLY_MODULUS_LADDER[2],
    }
}

/// Exponent `k` of the default scale `2^k`.
pub fn scale_exponent(level: ComputationLevel, tier: SecurityTier) -> i32 {
    match (level, tier) {
        (ComputationLevel::Low, SecurityTier::Tc128) => 54,
        (ComputationLevel::Low, SecurityTier::Tc192) => 16,
        (ComputationLevel::Low, SecurityTier::Tc256) => 29,
        (ComputationLevel::Medium, SecurityTier::Tc128) => 163,
        (ComputationLevel::Medium, SecurityTier::Tc192) => 93,
        (ComputationLevel::Medium, SecurityTier::Tc256) => 59,
        (ComputationLevel::High, SecurityTier::Tc128) => 383,
        (ComputationLevel::High, SecurityTier::Tc192) => 246,
        (ComputationLevel::High, SecurityTier::Tc256) => 118,
    }
}

pub fn derive(level: ComputationLevel, tier: SecurityTier) -> EncryptionParameterProfile {
    let degree: usize = poly_modulus_degree(level);
    EncryptionParameterProfile {
        poly_modulus_degree: degree,
        coeff_modulus_degree: degree,
        plain_modulus_candidate: PLAIN_MODULUS_CANDIDATE,
        scale: 2f64.powi(scale_exponent(level, tier)),
        security: tier,
    }
}

/// Same as [`derive`] for a raw bit count; only 128, 192 and 256 are accepted.
pub fn derive_from_bits(
    level: ComputationLevel,
    security_bits: u32,
) -> Result<EncryptionParameterProfile> {
    Ok(derive(level, SecurityTier::try_from(security_bits)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn derive_table() {
        let expected: [(ComputationLevel, u32, usize, i32); 9] = [
            (ComputationLevel::Low, 128, 4096, 54),
            (ComputationLevel::Low, 192, 4096, 16),
            (ComputationLevel::Low, 256, 4096, 29),
            (ComputationLevel::Medium, 128, 8192, 163),
            (ComputationLevel::Medium, 192, 8192, 93),
            (ComputationLevel::Medium, 256, 8192, 59),
            (ComputationLevel::High, 128, 16384, 383),
            (ComputationLevel::High, 192, 16384, 246),
            (ComputationLevel::High, 256, 16384, 118),
        ];
        for (level, bits, degree, k) in expected {
            let profile: EncryptionParameterProfile = derive_from_bits(level, bits).unwrap();
            assert_eq!(profile.poly_modulus_degree, degree, "{} {}", level, bits);
            assert_eq!(profile.coeff_modulus_degree, degree);
            assert_eq!(profile.plain_modulus_candidate, 786433);
            assert_eq!(profile.scale, 2f64.powi(k), "{} {}", level, bits);
            assert_eq!(profile.scale_exponent(), k);
            assert_eq!(profile.security.bits(), bits);
            assert!(POLY_MODULUS_LADDER.contains(&profile.poly_modulus_degree));
        }
    }

    #[test]
    fn plain_modulus_batches_on_every_degree() {
        POLY_MODULUS_LADDER
            .iter()
            .for_each(|n| assert_eq!(PLAIN_MODULUS_CANDIDATE % (2 * *n as u64), 1));
    }

    #[test]
    fn derive_rejects_unknown_bits() {
        assert!(matches!(
            derive_from_bits(ComputationLevel::Low, 100),
            Err(Error::Config(_))
        ));
    }
}
