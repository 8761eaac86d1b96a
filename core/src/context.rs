use backend::{CoeffModulus, Context, EncryptionParameters, MemoryPool};
use tracing::{debug, warn};

use crate::advisor::EncryptionParameterProfile;
use crate::error::Result;
use crate::handle::ResourceHandle;
use crate::scheme::{SchemeKind, SecurityTier};

/// A native context validated against a security tier. Objects created
/// from it draw their memory from the context's pool.
pub struct SchemeContext {
    handle: ResourceHandle<Context>,
    profile: Option<EncryptionParameterProfile>,
    kind: SchemeKind,
    tier: SecurityTier,
    parameters_set: bool,
    pool: MemoryPool,
}

impl SchemeContext {
    /// Builds a context from the engine's default coefficient modulus for
    /// the profile's degree and tier. Never fails on unsupported
    /// parameters: check [`SchemeContext::parameters_set`].
    pub fn new(profile: &EncryptionParameterProfile, kind: SchemeKind, tier: SecurityTier) -> Self {
        let degree: usize = profile.coeff_modulus_degree;
        let coeff_modulus: Vec<u64> =
            match CoeffModulus::bfv_default(degree, profile.security.level()) {
                Ok(coeff_modulus) => coeff_modulus,
                Err(e) => {
                    warn!(degree, error = %e, "no default coefficient modulus");
                    Vec::new()
                }
            };
        let parms: EncryptionParameters = Self::parameters(
            kind,
            profile.poly_modulus_degree,
            coeff_modulus,
            profile.plain_modulus_candidate,
        );
        Self::build(parms, Some(*profile), kind, tier)
    }

    /// Builds a context from an explicit list of prime bit sizes.
    pub fn custom(
        kind: SchemeKind,
        poly_modulus_degree: usize,
        bit_sizes: &[u32],
        plain_modulus: u64,
        tier: SecurityTier,
    ) -> Self {
        let coeff_modulus: Vec<u64> = match CoeffModulus::create(poly_modulus_degree, bit_sizes) {
            Ok(coeff_modulus) => coeff_modulus,
            Err(e) => {
                warn!(
                    degree = poly_modulus_degree,
                    ?bit_sizes,
                    error = %e,
                    "cannot create coefficient modulus"
                );
                Vec::new()
            }
        };
        let parms: EncryptionParameters =
            Self::parameters(kind, poly_modulus_degree, coeff_modulus, plain_modulus);
        Self::build(parms, None, kind, tier)
    }

    fn parameters(
        kind: SchemeKind,
        degree: usize,
        coeff_modulus: Vec<u64>,
        plain_modulus: u64,
    ) -> EncryptionParameters {
        let mut parms: EncryptionParameters = EncryptionParameters::new(kind.scheme_type());
        parms.set_poly_modulus_degree(degree);
        parms.set_coeff_modulus(coeff_modulus);
        if kind == SchemeKind::Integer {
            parms.set_plain_modulus(plain_modulus);
        }
        parms
    }

    fn build(
        parms: EncryptionParameters,
        profile: Option<EncryptionParameterProfile>,
        kind: SchemeKind,
        tier: SecurityTier,
    ) -> Self {
        let pool: MemoryPool = MemoryPool::new();
        let context: Context = Context::new(parms, tier.level(), &pool);
        let parameters_set: bool = context.parameters_set();
        if parameters_set {
            debug!(
                scheme = %kind,
                %tier,
                degree = context.poly_modulus_degree(),
                "scheme context ready"
            );
        } else {
            warn!(
                scheme = %kind,
                %tier,
                error = context.parameter_error_name(),
                "encryption parameters are not set"
            );
        }
        Self {
            handle: ResourceHandle::from_instance("context", context),
            profile,
            kind,
            tier,
            parameters_set,
            pool,
        }
    }

    /// Cached result of the engine's parameter validation.
    pub fn parameters_set(&self) -> bool {
        self.parameters_set
    }

    pub fn parameter_error_name(&self) -> Result<&'static str> {
        Ok(self.native()?.parameter_error_name())
    }

    pub fn parameter_error_message(&self) -> Result<&'static str> {
        Ok(self.native()?.parameter_error_message())
    }

    pub fn profile(&self) -> Option<&EncryptionParameterProfile> {
        self.profile.as_ref()
    }

    pub fn kind(&self) -> SchemeKind {
        self.kind
    }

    pub fn tier(&self) -> SecurityTier {
        self.tier
    }

    pub fn poly_modulus_degree(&self) -> Result<usize> {
        Ok(self.native()?.poly_modulus_degree())
    }

    pub fn pool(&self) -> &MemoryPool {
        &self.pool
    }

    pub fn native(&self) -> Result<&Context> {
        self.handle.require()
    }

    /// Releases the native context. Objects already built keep their own
    /// reference to it.
    pub fn delete(&mut self) {
        self.handle.delete();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::{PLAIN_MODULUS_CANDIDATE, derive};
    use crate::error::Error;
    use crate::scheme::ComputationLevel;

    #[test]
    fn profiles_build_valid_contexts() {
        for level in ComputationLevel::ALL {
            for tier in SecurityTier::ALL {
                for kind in [SchemeKind::Integer, SchemeKind::Approximate] {
                    let context: SchemeContext =
                        SchemeContext::new(&derive(level, tier), kind, tier);
                    assert!(context.parameters_set(), "{} {} {}", level, tier, kind);
                    assert_eq!(context.parameter_error_name().unwrap(), "success");
                }
            }
        }
    }

    #[test]
    fn insecure_bit_sizes_are_not_set() {
        let custom = |tier: SecurityTier| {
            SchemeContext::custom(
                SchemeKind::Integer,
                4096,
                &[46, 16, 46],
                PLAIN_MODULUS_CANDIDATE,
                tier,
            )
        };
        let context: SchemeContext = custom(SecurityTier::Tc192);
        assert!(!context.parameters_set());
        assert_eq!(context.parameter_error_name().unwrap(), "invalid_parameters_insecure");

        let relaxed: SchemeContext = custom(SecurityTier::Tc128);
        assert!(relaxed.parameters_set());
    }

    #[test]
    fn stricter_tier_than_profile_is_not_set() {
        let profile: EncryptionParameterProfile =
            derive(ComputationLevel::Low, SecurityTier::Tc128);
        let context: SchemeContext =
            SchemeContext::new(&profile, SchemeKind::Integer, SecurityTier::Tc256);
        assert!(!context.parameters_set());
    }

    #[test]
    fn deleted_context_reports_released() {
        let mut context: SchemeContext = SchemeContext::new(
            &derive(ComputationLevel::Low, SecurityTier::Tc128),
            SchemeKind::Integer,
            SecurityTier::Tc128,
        );
        context.delete();
        context.delete();
        assert!(matches!(context.native(), Err(Error::Released("context"))));
        assert!(context.parameters_set());
    }
}
