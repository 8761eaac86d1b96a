//! Policy and lifecycle front end for the `backend` homomorphic encryption
//! engine.
//!
//! A [`Session`] derives parameters from a [`SessionConfig`], builds a
//! [`SchemeContext`] and hands out codecs and keys. Every engine object is
//! held by a [`ResourceHandle`] that releases it when replaced, deleted or
//! dropped.

pub mod advisor;
pub mod artifact;
pub mod codec;
pub mod config;
pub mod context;
pub mod crypto;
pub mod error;
pub mod handle;
pub mod keygen;
pub mod objects;
pub mod scheme;
pub mod session;
#[cfg(test)]
mod tests;

pub use advisor::{
    EncryptionParameterProfile, PLAIN_MODULUS_CANDIDATE, POLY_MODULUS_LADDER, derive,
    derive_from_bits,
};
pub use artifact::{Persist, SerializableArtifact};
pub use codec::{BatchEncoder, CkksEncoder, ElementKind, EncodeExtras, SlotVector, TypedCodec};
pub use config::SessionConfig;
pub use context::SchemeContext;
pub use crypto::{Decryptor, Encryptor, Evaluator};
pub use error::{Error, Result};
pub use handle::ResourceHandle;
pub use keygen::{KeyLifecycle, KeyPair, KeyState};
pub use objects::{Ciphertext, GaloisKeys, Plaintext, PublicKey, RelinKeys, SecretKey};
pub use scheme::{CompressionMode, ComputationLevel, SchemeKind, SecurityTier};
pub use session::Session;

pub use backend::Complex;
