//! Lattice homomorphic-encryption engine: parameter validation, key
//! generation, BFV and CKKS encryption, batching and approximate encoders,
//! and a self-describing serialization stream.
//!
//! Every object is allocated against a [`MemoryPool`] so callers can observe
//! when native memory is released. Failures are reported as opaque
//! [`NativeException`] values.

pub mod batch_encoder;
pub mod ciphertext;
pub mod ckks_encoder;
pub mod complex;
pub mod context;
pub mod decryptor;
pub mod encryptor;
pub mod evaluator;
pub mod exception;
pub mod keygen;
pub mod keys;
pub mod modulus;
pub mod ntt;
pub mod params;
pub mod plaintext;
pub mod pool;
pub mod primes;
pub mod rns;
pub mod serialization;

#[cfg(test)]
mod tests;

pub use batch_encoder::BatchEncoder;
pub use ciphertext::Ciphertext;
pub use ckks_encoder::CkksEncoder;
pub use complex::Complex;
pub use context::{Context, ParameterError};
pub use decryptor::Decryptor;
pub use encryptor::Encryptor;
pub use evaluator::Evaluator;
pub use exception::{ExceptionKind, NativeException, NativeResult};
pub use keygen::{KeyGenerator, default_galois_elts, galois_elts_from_steps};
pub use keys::{GaloisKeys, PublicKey, RelinKeys, SecretKey};
pub use params::{
    CoeffModulus, EncryptionParameters, ParmsId, PlainModulus, SchemeType, SecurityLevel,
};
pub use plaintext::Plaintext;
pub use pool::{Allocation, MemoryPool};
pub use serialization::{
    ComprMode, ReaderFrom, SerializationHeader, WriterTo, load, peek_header, save,
};
