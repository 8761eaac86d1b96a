use tracing::debug;

use crate::advisor::EncryptionParameterProfile;
use crate::artifact::Persist;
use crate::codec::{BatchEncoder, CkksEncoder, ElementKind, EncodeExtras, SlotVector, TypedCodec};
use crate::config::SessionConfig;
use crate::context::SchemeContext;
use crate::crypto::{Decryptor, Encryptor, Evaluator};
use crate::error::{Error, Result};
use crate::keygen::{KeyLifecycle, KeyPair, KeyState};
use crate::objects::{Ciphertext, GaloisKeys, Plaintext, PublicKey, RelinKeys, SecretKey};
use crate::scheme::SchemeKind;

/// One configured context with its key material. Sessions are independent
/// values; several may coexist.
pub struct Session {
    config: SessionConfig,
    context: SchemeContext,
    keys: KeyLifecycle,
    key_pair: Option<KeyPair>,
}

impl Session {
    /// Derives parameters from `config` and builds the context. Succeeds
    /// even when the parameters are rejected; see [`Session::parameters_set`].
    pub fn new(config: SessionConfig) -> Result<Self> {
        let profile: EncryptionParameterProfile = config.profile();
        let context: SchemeContext =
            SchemeContext::new(&profile, config.scheme, config.security_bits);
        let keys: KeyLifecycle = KeyLifecycle::new(&context)?;
        debug!(
            level = %config.computation_level,
            tier = %config.security_bits,
            scheme = %config.scheme,
            parameters_set = context.parameters_set(),
            "session configured"
        );
        Ok(Self {
            config,
            context,
            keys,
            key_pair: None,
        })
    }

    /// Replaces the context. Keys of the previous context are released.
    pub fn reconfigure(&mut self, config: SessionConfig) -> Result<()> {
        *self = Session::new(config)?;
        Ok(())
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn context(&self) -> &SchemeContext {
        &self.context
    }

    pub fn parameters_set(&self) -> bool {
        self.context.parameters_set()
    }

    pub fn key_state(&self) -> KeyState {
        self.keys.state()
    }

    /// Codec of the configured scheme.
    pub fn codec(&self) -> Result<Box<dyn TypedCodec>> {
        Ok(match self.config.scheme {
            SchemeKind::Integer => Box::new(BatchEncoder::new(&self.context)?),
            SchemeKind::Approximate => Box::new(CkksEncoder::new(&self.context)?),
        })
    }

    pub fn evaluator(&self) -> Result<Evaluator> {
        Evaluator::new(&self.context)
    }

    /// Generates a fresh key pair and makes it the session's keys.
    pub fn generate_keys(&mut self) -> Result<&KeyPair> {
        let key_pair: KeyPair = self.keys.generate_keys()?;
        Ok(self.key_pair.insert(key_pair))
    }

    pub fn public_key(&self) -> Option<&PublicKey> {
        self.key_pair.as_ref().map(|k| &k.public)
    }

    pub fn secret_key(&self) -> Option<&SecretKey> {
        self.key_pair.as_ref().map(|k| &k.secret)
    }

    /// Replaces the session's keys, e.g. with keys loaded from artifacts.
    pub fn set_keys(&mut self, key_pair: KeyPair) {
        self.key_pair = Some(key_pair);
    }

    /// Before [`Session::generate_keys`] the engine sees an empty secret key
    /// and rejects it.
    pub fn generate_relin_keys(&mut self) -> Result<RelinKeys> {
        match self.key_pair.as_ref() {
            Some(key_pair) => self.keys.generate_relin_keys(&key_pair.secret),
            None => self.keys.generate_relin_keys(&SecretKey::new(&self.context)),
        }
    }

    pub fn generate_galois_keys(&mut self, steps: Option<&[i32]>) -> Result<GaloisKeys> {
        match self.key_pair.as_ref() {
            Some(key_pair) => self.keys.generate_galois_keys(&key_pair.secret, steps),
            None => self.keys.generate_galois_keys(&SecretKey::new(&self.context), steps),
        }
    }

    pub fn encode(&self, values: &SlotVector, kind: Option<ElementKind>) -> Result<Plaintext> {
        self.codec()?.encode(values, kind, &EncodeExtras::default())
    }

    pub fn decode(&self, plaintext: &Plaintext, kind: Option<ElementKind>) -> Result<SlotVector> {
        self.codec()?.decode(plaintext, kind)
    }

    /// Encodes `values` and encrypts them under the session's public key.
    pub fn encrypt(&self, values: &SlotVector, kind: Option<ElementKind>) -> Result<Ciphertext> {
        let public: &PublicKey = self.public_key().ok_or(Error::Released("public key"))?;
        let plaintext: Plaintext = self.encode(values, kind)?;
        Encryptor::new(&self.context, public)?.encrypt(&plaintext)
    }

    /// Decrypts with the session's secret key and decodes the slots.
    pub fn decrypt(
        &self,
        ciphertext: &Ciphertext,
        kind: Option<ElementKind>,
    ) -> Result<SlotVector> {
        let secret: &SecretKey = self.secret_key().ok_or(Error::Released("secret key"))?;
        let plaintext: Plaintext = Decryptor::new(&self.context, secret)?.decrypt(ciphertext)?;
        self.decode(&plaintext, kind)
    }

    /// Saves with the configured compression mode.
    pub fn save<P: Persist>(&self, object: &P) -> Result<String> {
        object.save(self.config.compression)
    }

    pub fn save_array<P: Persist>(&self, object: &P) -> Result<Vec<u8>> {
        object.save_array(self.config.compression)
    }

    pub fn load<P: Persist>(&self, object: &mut P, encoded: &str) -> Result<()> {
        object.load(&self.context, encoded)
    }

    pub fn load_array<P: Persist>(&self, object: &mut P, bytes: &[u8]) -> Result<()> {
        object.load_array(&self.context, bytes)
    }
}
