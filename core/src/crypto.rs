use crate::context::SchemeContext;
use crate::error::Result;
use crate::handle::ResourceHandle;
use crate::objects::{Ciphertext, Plaintext, PublicKey, SecretKey};

pub struct Encryptor {
    handle: ResourceHandle<backend::Encryptor>,
}

impl Encryptor {
    pub fn new(context: &SchemeContext, public_key: &PublicKey) -> Result<Self> {
        let mut handle: ResourceHandle<backend::Encryptor> = ResourceHandle::new("encryptor");
        handle.initialize(|| -> Result<backend::Encryptor> {
            Ok(backend::Encryptor::new(context.native()?, public_key.require()?, context.pool())?)
        })?;
        Ok(Self { handle })
    }

    pub fn encrypt(&mut self, plaintext: &Plaintext) -> Result<Ciphertext> {
        let ct: backend::Ciphertext = self.handle.require_mut()?.encrypt(plaintext.require()?)?;
        Ok(Ciphertext::from_native(ct))
    }
}

pub struct Decryptor {
    handle: ResourceHandle<backend::Decryptor>,
}

impl Decryptor {
    pub fn new(context: &SchemeContext, secret_key: &SecretKey) -> Result<Self> {
        let mut handle: ResourceHandle<backend::Decryptor> = ResourceHandle::new("decryptor");
        handle.initialize(|| -> Result<backend::Decryptor> {
            Ok(backend::Decryptor::new(context.native()?, secret_key.require()?, context.pool())?)
        })?;
        Ok(Self { handle })
    }

    pub fn decrypt(&self, ciphertext: &Ciphertext) -> Result<Plaintext> {
        let pt: backend::Plaintext = self.handle.require()?.decrypt(ciphertext.require()?)?;
        Ok(Plaintext::from_native(pt))
    }

    /// Remaining noise budget in bits. Integer scheme only.
    pub fn invariant_noise_budget(&self, ciphertext: &Ciphertext) -> Result<u32> {
        Ok(self.handle.require()?.invariant_noise_budget(ciphertext.require()?)?)
    }
}

/// Additive and plaintext-multiplicative evaluation.
pub struct Evaluator {
    handle: ResourceHandle<backend::Evaluator>,
}

impl Evaluator {
    pub fn new(context: &SchemeContext) -> Result<Self> {
        let mut handle: ResourceHandle<backend::Evaluator> = ResourceHandle::new("evaluator");
        handle.initialize(|| -> Result<backend::Evaluator> {
            Ok(backend::Evaluator::new(context.native()?)?)
        })?;
        Ok(Self { handle })
    }

    pub fn add(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        let ct: backend::Ciphertext = self.handle.require()?.add(a.require()?, b.require()?)?;
        Ok(Ciphertext::from_native(ct))
    }

    pub fn sub(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        let ct: backend::Ciphertext = self.handle.require()?.sub(a.require()?, b.require()?)?;
        Ok(Ciphertext::from_native(ct))
    }

    pub fn negate(&self, a: &Ciphertext) -> Result<Ciphertext> {
        let ct: backend::Ciphertext = self.handle.require()?.negate(a.require()?)?;
        Ok(Ciphertext::from_native(ct))
    }

    pub fn add_plain(&self, a: &Ciphertext, b: &Plaintext) -> Result<Ciphertext> {
        let ct: backend::Ciphertext = self.handle.require()?.add_plain(a.require()?, b.require()?)?;
        Ok(Ciphertext::from_native(ct))
    }

    pub fn sub_plain(&self, a: &Ciphertext, b: &Plaintext) -> Result<Ciphertext> {
        let ct: backend::Ciphertext = self.handle.require()?.sub_plain(a.require()?, b.require()?)?;
        Ok(Ciphertext::from_native(ct))
    }

    pub fn multiply_plain(&self, a: &Ciphertext, b: &Plaintext) -> Result<Ciphertext> {
        let ct: backend::Ciphertext =
            self.handle.require()?.multiply_plain(a.require()?, b.require()?)?;
        Ok(Ciphertext::from_native(ct))
    }
}
