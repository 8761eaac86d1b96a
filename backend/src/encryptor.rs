use itertools::izip;
use sampling::distributions::{fill_normal, fill_ternary};
use sampling::source::{Source, new_seed};

use crate::ciphertext::Ciphertext;
use crate::context::Context;
use crate::exception::NativeResult;
use crate::keygen::{NOISE_MAX_DEVIATION, NOISE_STANDARD_DEVIATION};
use crate::keys::PublicKey;
use crate::params::SchemeType;
use crate::plaintext::Plaintext;
use crate::pool::MemoryPool;
use crate::rns::{RnsBase, RnsPoly};

/// Public-key encryption.
pub struct Encryptor {
    context: Context,
    public_key: PublicKey,
    source: Source,
    pool: MemoryPool,
}

impl Encryptor {
    pub fn new(context: &Context, public_key: &PublicKey, pool: &MemoryPool) -> NativeResult<Self> {
        Self::with_seed(context, public_key, new_seed(), pool)
    }

    pub fn with_seed(
        context: &Context,
        public_key: &PublicKey,
        seed: [u8; 32],
        pool: &MemoryPool,
    ) -> NativeResult<Self> {
        context.require_set()?;
        public_key.require_valid(context)?;
        Ok(Self {
            context: context.clone(),
            public_key: public_key.clone(),
            source: Source::new(seed),
            pool: pool.clone(),
        })
    }

    pub fn encrypt_zero(&mut self) -> NativeResult<Ciphertext> {
        let base: &RnsBase = self.context.base()?;
        let n: usize = base.n();

        let mut u: Vec<i64> = vec![0i64; n];
        fill_ternary(&mut self.source, &mut u);
        let mut u_ntt: RnsPoly = base.from_signed(&u);
        base.ntt_forward(&mut u_ntt);

        let mut polys: Vec<RnsPoly> = Vec::with_capacity(2);
        for pk in self.public_key.ct.polys.iter() {
            let mut c: RnsPoly = base.mul_pointwise(pk, &u_ntt);
            base.ntt_backward(&mut c);
            let mut e: Vec<i64> = vec![0i64; n];
            fill_normal(&mut self.source, NOISE_STANDARD_DEVIATION, NOISE_MAX_DEVIATION, &mut e);
            base.add_assign(&mut c, &base.from_signed(&e));
            polys.push(c);
        }

        Ok(Ciphertext::from_parts(self.context.parms_id(), 1.0, polys, &self.pool))
    }

    pub fn encrypt(&mut self, plaintext: &Plaintext) -> NativeResult<Ciphertext> {
        plaintext.require_valid(&self.context)?;
        let mut ct: Ciphertext = self.encrypt_zero()?;
        let base: &RnsBase = self.context.base()?;
        match self.context.scheme() {
            SchemeType::Bfv => {
                add_scaled_message(
                    base,
                    self.context.delta(),
                    &mut ct.polys[0],
                    plaintext.data(),
                    false,
                );
            }
            _ => {
                base.add_assign(&mut ct.polys[0], &plaintext.to_poly());
                ct.scale = plaintext.scale();
            }
        }
        Ok(ct)
    }
}

/// `c += delta * m` (or `c -= delta * m`) with `m` given modulo `t`.
pub(crate) fn add_scaled_message(
    base: &RnsBase,
    delta: &[u64],
    c: &mut RnsPoly,
    m: &[u64],
    negate: bool,
) {
    for (i, (modulus, d)) in izip!(base.moduli(), delta).enumerate() {
        let d_prep = modulus.prepare(*d);
        izip!(c.at_mut(i).iter_mut(), m).for_each(|(x, y)| {
            let dm: u64 = modulus.mul_shoup(d_prep, *y);
            *x = if negate { modulus.sub(*x, dm) } else { modulus.add(*x, dm) };
        });
    }
}
