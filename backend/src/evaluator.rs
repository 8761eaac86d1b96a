use crate::ciphertext::Ciphertext;
use crate::context::Context;
use crate::encryptor::add_scaled_message;
use crate::exception::{NativeException, NativeResult};
use crate::params::SchemeType;
use crate::plaintext::Plaintext;
use crate::rns::{RnsBase, RnsPoly};

/// Additive and plaintext-multiplicative homomorphic operations.
pub struct Evaluator {
    context: Context,
}

fn scales_match(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs())
}

impl Evaluator {
    pub fn new(context: &Context) -> NativeResult<Self> {
        context.require_set()?;
        Ok(Self {
            context: context.clone(),
        })
    }

    fn require_compatible(&self, a: &Ciphertext, b: &Ciphertext) -> NativeResult<()> {
        a.require_valid(&self.context)?;
        b.require_valid(&self.context)?;
        if a.size() != b.size() {
            return Err(NativeException::invalid_argument("ciphertext sizes do not match"));
        }
        if !scales_match(a.scale, b.scale) {
            return Err(NativeException::invalid_argument("scale mismatch"));
        }
        Ok(())
    }

    pub fn add_inplace(&self, a: &mut Ciphertext, b: &Ciphertext) -> NativeResult<()> {
        self.require_compatible(a, b)?;
        let base: &RnsBase = self.context.base()?;
        a.polys
            .iter_mut()
            .zip(b.polys.iter())
            .for_each(|(x, y)| base.add_assign(x, y));
        Ok(())
    }

    pub fn add(&self, a: &Ciphertext, b: &Ciphertext) -> NativeResult<Ciphertext> {
        let mut c: Ciphertext = a.clone();
        self.add_inplace(&mut c, b)?;
        Ok(c)
    }

    pub fn sub_inplace(&self, a: &mut Ciphertext, b: &Ciphertext) -> NativeResult<()> {
        self.require_compatible(a, b)?;
        let base: &RnsBase = self.context.base()?;
        a.polys
            .iter_mut()
            .zip(b.polys.iter())
            .for_each(|(x, y)| base.sub_assign(x, y));
        Ok(())
    }

    pub fn sub(&self, a: &Ciphertext, b: &Ciphertext) -> NativeResult<Ciphertext> {
        let mut c: Ciphertext = a.clone();
        self.sub_inplace(&mut c, b)?;
        Ok(c)
    }

    pub fn negate_inplace(&self, a: &mut Ciphertext) -> NativeResult<()> {
        a.require_valid(&self.context)?;
        let base: &RnsBase = self.context.base()?;
        a.polys.iter_mut().for_each(|x| base.neg_assign(x));
        Ok(())
    }

    pub fn negate(&self, a: &Ciphertext) -> NativeResult<Ciphertext> {
        let mut c: Ciphertext = a.clone();
        self.negate_inplace(&mut c)?;
        Ok(c)
    }

    fn add_plain_core(&self, a: &mut Ciphertext, pt: &Plaintext, negate: bool) -> NativeResult<()> {
        a.require_valid(&self.context)?;
        pt.require_valid(&self.context)?;
        let base: &RnsBase = self.context.base()?;
        match self.context.scheme() {
            SchemeType::Bfv => {
                add_scaled_message(base, self.context.delta(), &mut a.polys[0], pt.data(), negate);
            }
            _ => {
                if !scales_match(a.scale, pt.scale) {
                    return Err(NativeException::invalid_argument("scale mismatch"));
                }
                let m: RnsPoly = pt.to_poly();
                if negate {
                    base.sub_assign(&mut a.polys[0], &m);
                } else {
                    base.add_assign(&mut a.polys[0], &m);
                }
            }
        }
        Ok(())
    }

    pub fn add_plain_inplace(&self, a: &mut Ciphertext, pt: &Plaintext) -> NativeResult<()> {
        self.add_plain_core(a, pt, false)
    }

    pub fn add_plain(&self, a: &Ciphertext, pt: &Plaintext) -> NativeResult<Ciphertext> {
        let mut c: Ciphertext = a.clone();
        self.add_plain_inplace(&mut c, pt)?;
        Ok(c)
    }

    pub fn sub_plain_inplace(&self, a: &mut Ciphertext, pt: &Plaintext) -> NativeResult<()> {
        self.add_plain_core(a, pt, true)
    }

    pub fn sub_plain(&self, a: &Ciphertext, pt: &Plaintext) -> NativeResult<Ciphertext> {
        let mut c: Ciphertext = a.clone();
        self.sub_plain_inplace(&mut c, pt)?;
        Ok(c)
    }

    pub fn multiply_plain_inplace(&self, a: &mut Ciphertext, pt: &Plaintext) -> NativeResult<()> {
        a.require_valid(&self.context)?;
        pt.require_valid(&self.context)?;
        let base: &RnsBase = self.context.base()?;
        let m: RnsPoly = match self.context.scheme() {
            SchemeType::Bfv => {
                let t = self.context.plain_modulus()?;
                let centered: Vec<i64> = pt.data().iter().map(|x| t.center(*x)).collect();
                base.from_signed(&centered)
            }
            _ => {
                let scale: f64 = a.scale * pt.scale;
                if scale.log2() >= base.bit_count() as f64 {
                    return Err(NativeException::invalid_argument("scale out of bounds"));
                }
                a.scale = scale;
                pt.to_poly()
            }
        };
        let mut m_ntt: RnsPoly = m;
        base.ntt_forward(&mut m_ntt);
        for c in a.polys.iter_mut() {
            base.ntt_forward(c);
            *c = base.mul_pointwise(c, &m_ntt);
            base.ntt_backward(c);
        }
        Ok(())
    }

    pub fn multiply_plain(&self, a: &Ciphertext, pt: &Plaintext) -> NativeResult<Ciphertext> {
        let mut c: Ciphertext = a.clone();
        self.multiply_plain_inplace(&mut c, pt)?;
        Ok(c)
    }
}
