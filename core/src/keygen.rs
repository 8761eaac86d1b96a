use backend::{Context, KeyGenerator, MemoryPool, default_galois_elts, galois_elts_from_steps};
use tracing::debug;

use crate::context::SchemeContext;
use crate::error::Result;
use crate::objects::{GaloisKeys, PublicKey, RelinKeys, SecretKey};

/// Latest key material produced under a context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyState {
    Uninitialized,
    KeysGenerated,
    RelinKeysGenerated,
    GaloisKeysGenerated,
}

#[derive(Debug)]
pub struct KeyPair {
    pub public: PublicKey,
    pub secret: SecretKey,
}

/// Produces key material for one context. Keys are serialized through
/// [`crate::Persist`].
pub struct KeyLifecycle {
    context: Context,
    pool: MemoryPool,
    state: KeyState,
}

impl KeyLifecycle {
    pub fn new(context: &SchemeContext) -> Result<Self> {
        Ok(Self {
            context: context.native()?.clone(),
            pool: context.pool().clone(),
            state: KeyState::Uninitialized,
        })
    }

    pub fn state(&self) -> KeyState {
        self.state
    }

    /// Samples a fresh secret key and its public key on every call.
    pub fn generate_keys(&mut self) -> Result<KeyPair> {
        let mut keygen: KeyGenerator = KeyGenerator::new(&self.context, &self.pool)?;
        let public: backend::PublicKey = keygen.create_public_key()?;
        let secret: backend::SecretKey = keygen.secret_key().clone();
        self.state = KeyState::KeysGenerated;
        debug!(degree = self.context.poly_modulus_degree(), "generated key pair");
        Ok(KeyPair {
            public: PublicKey::from_native(public),
            secret: SecretKey::from_native(secret),
        })
    }

    pub fn generate_relin_keys(&mut self, secret: &SecretKey) -> Result<RelinKeys> {
        let mut keygen: KeyGenerator =
            KeyGenerator::from_secret_key(&self.context, secret.require()?, &self.pool)?;
        let keys: backend::RelinKeys = keygen.create_relin_keys()?;
        self.state = KeyState::RelinKeysGenerated;
        Ok(RelinKeys::from_native(keys))
    }

    /// Galois keys for the given rotation steps, or for every power-of-two
    /// step in both directions plus the conjugation when `steps` is `None`.
    pub fn generate_galois_keys(
        &mut self,
        secret: &SecretKey,
        steps: Option<&[i32]>,
    ) -> Result<GaloisKeys> {
        let n: usize = self.context.poly_modulus_degree();
        let elts: Vec<u64> = match steps {
            Some(steps) => galois_elts_from_steps(n, steps)?,
            None => default_galois_elts(n),
        };
        let mut keygen: KeyGenerator =
            KeyGenerator::from_secret_key(&self.context, secret.require()?, &self.pool)?;
        let keys: backend::GaloisKeys = keygen.create_galois_keys(&elts)?;
        self.state = KeyState::GaloisKeysGenerated;
        debug!(count = keys.len(), "generated galois keys");
        Ok(GaloisKeys::from_native(keys))
    }
}
