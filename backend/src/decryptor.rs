use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use crate::ciphertext::Ciphertext;
use crate::context::Context;
use crate::exception::{NativeException, NativeResult};
use crate::keys::SecretKey;
use crate::params::SchemeType;
use crate::plaintext::Plaintext;
use crate::pool::MemoryPool;
use crate::rns::{RnsBase, RnsPoly};

pub struct Decryptor {
    context: Context,
    secret_key: SecretKey,
    pool: MemoryPool,
}

impl Decryptor {
    pub fn new(context: &Context, secret_key: &SecretKey, pool: &MemoryPool) -> NativeResult<Self> {
        secret_key.require_valid(context)?;
        Ok(Self {
            context: context.clone(),
            secret_key: secret_key.clone(),
            pool: pool.clone(),
        })
    }

    /// `c_0 + c_1 * s + ... + c_{k-1} * s^{k-1}` in coefficient form.
    fn phase(&self, ct: &Ciphertext) -> NativeResult<RnsPoly> {
        ct.require_valid(&self.context)?;
        let base: &RnsBase = self.context.base()?;
        let mut acc: RnsPoly = base.alloc_poly();
        let mut s_pow: RnsPoly = self.secret_key.poly.clone();
        for c in ct.polys.iter().skip(1) {
            let mut c_ntt: RnsPoly = c.clone();
            base.ntt_forward(&mut c_ntt);
            base.add_assign(&mut acc, &base.mul_pointwise(&c_ntt, &s_pow));
            s_pow = base.mul_pointwise(&s_pow, &self.secret_key.poly);
        }
        base.ntt_backward(&mut acc);
        base.add_assign(&mut acc, &ct.polys[0]);
        Ok(acc)
    }

    pub fn decrypt(&self, ct: &Ciphertext) -> NativeResult<Plaintext> {
        let phase: RnsPoly = self.phase(ct)?;
        let base: &RnsBase = self.context.base()?;
        match self.context.scheme() {
            SchemeType::Bfv => {
                let t: u64 = self.context.plain_modulus()?.q();
                let q: &BigUint = base.product();
                let half_q: BigUint = q >> 1;
                let data: Vec<u64> = (0..base.n())
                    .map(|i| {
                        let x: BigUint = base.compose(&phase, i) * t + &half_q;
                        ((x / q) % t).to_u64().unwrap_or(0)
                    })
                    .collect();
                Ok(Plaintext::from_parts(
                    crate::params::ParmsId::ZERO,
                    1.0,
                    base.n(),
                    0,
                    data,
                    &self.pool,
                ))
            }
            SchemeType::Ckks => Ok(Plaintext::from_poly(
                self.context.parms_id(),
                ct.scale,
                phase,
                &self.pool,
            )),
            SchemeType::None => Err(NativeException::invalid_argument("unsupported scheme")),
        }
    }

    /// Remaining bits of noise headroom of a BFV ciphertext; 0 means
    /// decryption is no longer guaranteed to be correct.
    pub fn invariant_noise_budget(&self, ct: &Ciphertext) -> NativeResult<u32> {
        self.context.require_scheme(SchemeType::Bfv)?;
        let phase: RnsPoly = self.phase(ct)?;
        let base: &RnsBase = self.context.base()?;
        let t: u64 = self.context.plain_modulus()?.q();
        let q: &BigUint = base.product();
        let half_q: BigUint = q >> 1;
        let mut norm: BigUint = BigUint::zero();
        for i in 0..base.n() {
            let v: BigUint = (base.compose(&phase, i) * t) % q;
            let v_abs: BigUint = if v > half_q { q - v } else { v };
            if v_abs > norm {
                norm = v_abs;
            }
        }
        let budget: i64 = q.bits() as i64 - norm.bits() as i64 - 1;
        Ok(budget.max(0) as u32)
    }
}
