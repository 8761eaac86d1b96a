mod encryption;

use crate::{CoeffModulus, Context, EncryptionParameters, MemoryPool, SchemeType, SecurityLevel};

pub(crate) const PLAIN_MODULUS: u64 = 786433;

pub(crate) fn bfv_context(n: usize, level: SecurityLevel, pool: &MemoryPool) -> Context {
    let mut parms: EncryptionParameters = EncryptionParameters::new(SchemeType::Bfv);
    parms.set_poly_modulus_degree(n);
    parms.set_coeff_modulus(CoeffModulus::bfv_default(n, level).unwrap());
    parms.set_plain_modulus(PLAIN_MODULUS);
    Context::new(parms, level, pool)
}

pub(crate) fn ckks_context(n: usize, level: SecurityLevel, pool: &MemoryPool) -> Context {
    let mut parms: EncryptionParameters = EncryptionParameters::new(SchemeType::Ckks);
    parms.set_poly_modulus_degree(n);
    parms.set_coeff_modulus(CoeffModulus::bfv_default(n, level).unwrap());
    Context::new(parms, level, pool)
}
