use sampling::distributions::{fill_normal, fill_ternary};
use sampling::source::{Source, new_seed};
use tracing::debug;
use utils::map::Map;

use crate::ciphertext::Ciphertext;
use crate::context::Context;
use crate::exception::{NativeException, NativeResult};
use crate::keys::{GaloisKeys, KSwitchKey, PublicKey, RelinKeys, SecretKey};
use crate::modulus::{Modulus, inv_mod};
use crate::pool::MemoryPool;
use crate::rns::{RnsBase, RnsPoly};

pub const GALOIS_GENERATOR: u64 = 3;
pub const NOISE_STANDARD_DEVIATION: f64 = 3.2;
pub const NOISE_MAX_DEVIATION: f64 = 6.0 * NOISE_STANDARD_DEVIATION;

/// Galois element rotating batched slots by `step`; step 0 maps to the
/// conjugation element `2n - 1`.
pub fn galois_elt_from_step(n: usize, step: i32) -> NativeResult<u64> {
    let two_n: u64 = 2 * n as u64;
    let slots: u64 = n as u64 >> 1;
    if step == 0 {
        return Ok(two_n - 1);
    }
    if step.unsigned_abs() as u64 >= slots {
        return Err(NativeException::invalid_argument(format!(
            "step {} is out of range for {} slots per row",
            step, slots
        )));
    }
    let m: Modulus = Modulus::new(two_n);
    let generator: u64 = if step > 0 {
        GALOIS_GENERATOR
    } else {
        inv_mod(GALOIS_GENERATOR, two_n)
            .ok_or_else(|| NativeException::logic_error("generator is not invertible"))?
    };
    Ok(m.pow(generator, step.unsigned_abs() as u64))
}

pub fn galois_elts_from_steps(n: usize, steps: &[i32]) -> NativeResult<Vec<u64>> {
    let mut elts: Vec<u64> = steps
        .iter()
        .map(|step| galois_elt_from_step(n, *step))
        .collect::<NativeResult<Vec<u64>>>()?;
    elts.sort_unstable();
    elts.dedup();
    Ok(elts)
}

/// Power-of-two steps in both directions plus the conjugation element.
pub fn default_galois_elts(n: usize) -> Vec<u64> {
    let log_slots: u32 = (n >> 1).trailing_zeros();
    let mut steps: Vec<i32> = vec![0];
    (0..log_slots).for_each(|i| {
        steps.push(1 << i);
        steps.push(-(1 << i));
    });
    galois_elts_from_steps(n, &steps).unwrap_or_default()
}

pub struct KeyGenerator {
    context: Context,
    secret_key: SecretKey,
    source: Source,
    pool: MemoryPool,
}

impl KeyGenerator {
    /// Samples a fresh ternary secret.
    pub fn new(context: &Context, pool: &MemoryPool) -> NativeResult<Self> {
        Self::with_seed(context, new_seed(), pool)
    }

    pub fn with_seed(context: &Context, seed: [u8; 32], pool: &MemoryPool) -> NativeResult<Self> {
        let base: &RnsBase = context.base()?;
        let mut source: Source = Source::new(seed);
        let mut s: Vec<i64> = vec![0i64; base.n()];
        fill_ternary(&mut source, &mut s);
        let mut s_ntt: RnsPoly = base.from_signed(&s);
        base.ntt_forward(&mut s_ntt);
        debug!(n = base.n(), limbs = base.len(), "sampled secret key");
        Ok(Self {
            context: context.clone(),
            secret_key: SecretKey::from_parts(context.parms_id(), s_ntt, pool),
            source,
            pool: pool.clone(),
        })
    }

    /// Resumes key generation from an existing secret key.
    pub fn from_secret_key(
        context: &Context,
        secret_key: &SecretKey,
        pool: &MemoryPool,
    ) -> NativeResult<Self> {
        secret_key.require_valid(context)?;
        Ok(Self {
            context: context.clone(),
            secret_key: secret_key.clone(),
            source: Source::new(new_seed()),
            pool: pool.clone(),
        })
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    pub fn create_public_key(&mut self) -> NativeResult<PublicKey> {
        let (b, a): (RnsPoly, RnsPoly) = self.encrypt_zero_ntt()?;
        Ok(PublicKey {
            ct: Ciphertext::from_parts(self.context.parms_id(), 1.0, vec![b, a], &self.pool),
        })
    }

    pub fn create_relin_keys(&mut self) -> NativeResult<RelinKeys> {
        let s_sq: RnsPoly = {
            let base: &RnsBase = self.context.base()?;
            base.mul_pointwise(&self.secret_key.poly, &self.secret_key.poly)
        };
        let key: KSwitchKey = self.create_kswitch_key(&s_sq)?;
        debug!(rows = key.rows(), "created relinearization keys");
        Ok(RelinKeys {
            parms_id: self.context.parms_id(),
            key: Some(key),
        })
    }

    pub fn create_galois_keys(&mut self, galois_elts: &[u64]) -> NativeResult<GaloisKeys> {
        let n: usize = self.context.poly_modulus_degree();
        let two_n: u64 = 2 * n as u64;
        if let Some(elt) = galois_elts.iter().find(|g| *g & 1 == 0 || **g >= two_n) {
            return Err(NativeException::invalid_argument(format!(
                "galois element {} is not valid",
                elt
            )));
        }

        let s_coeff: RnsPoly = {
            let base: &RnsBase = self.context.base()?;
            let mut s: RnsPoly = self.secret_key.poly.clone();
            base.ntt_backward(&mut s);
            s
        };

        let mut keys: Map<u64, KSwitchKey> = Map::new();
        for galois_elt in galois_elts {
            if keys.contains_key(galois_elt) {
                continue;
            }
            let target: RnsPoly = {
                let base: &RnsBase = self.context.base()?;
                let mut t: RnsPoly = base.automorphism(&s_coeff, *galois_elt as usize);
                base.ntt_forward(&mut t);
                t
            };
            keys.insert(*galois_elt, self.create_kswitch_key(&target)?);
        }
        debug!(count = keys.len(), "created galois keys");
        Ok(GaloisKeys {
            parms_id: self.context.parms_id(),
            keys,
        })
    }

    /// Galois keys for every power-of-two rotation and the conjugation.
    pub fn create_galois_keys_all(&mut self) -> NativeResult<GaloisKeys> {
        let elts: Vec<u64> = default_galois_elts(self.context.poly_modulus_degree());
        self.create_galois_keys(&elts)
    }

    fn create_kswitch_key(&mut self, target_ntt: &RnsPoly) -> NativeResult<KSwitchKey> {
        let limbs: usize = self.context.base()?.len();
        let mut rows: Vec<PublicKey> = Vec::with_capacity(limbs);
        for i in 0..limbs {
            let (mut b, a): (RnsPoly, RnsPoly) = self.encrypt_zero_ntt()?;
            let m: Modulus = self.context.base()?.moduli()[i];
            b.at_mut(i)
                .iter_mut()
                .zip(target_ntt.at(i))
                .for_each(|(x, y)| *x = m.add(*x, *y));
            rows.push(PublicKey {
                ct: Ciphertext::from_parts(self.context.parms_id(), 1.0, vec![b, a], &self.pool),
            });
        }
        Ok(KSwitchKey { rows })
    }

    /// Symmetric encryption of zero `(-(a*s) + e, a)` in NTT form.
    fn encrypt_zero_ntt(&mut self) -> NativeResult<(RnsPoly, RnsPoly)> {
        let base: &RnsBase = self.context.base()?;
        let mut a: RnsPoly = base.alloc_poly();
        for (i, m) in base.moduli().iter().enumerate() {
            a.at_mut(i)
                .iter_mut()
                .for_each(|x| *x = self.source.next_mod(m.q()));
        }
        let mut e: Vec<i64> = vec![0i64; base.n()];
        fill_normal(&mut self.source, NOISE_STANDARD_DEVIATION, NOISE_MAX_DEVIATION, &mut e);
        let mut e_ntt: RnsPoly = base.from_signed(&e);
        base.ntt_forward(&mut e_ntt);

        let mut b: RnsPoly = base.mul_pointwise(&a, &self.secret_key.poly);
        base.neg_assign(&mut b);
        base.add_assign(&mut b, &e_ntt);
        Ok((b, a))
    }
}
