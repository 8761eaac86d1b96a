//! Engine objects wrapped in a [`ResourceHandle`]. Each wrapper dereferences
//! to its handle, so `instance`, `inject` and `delete` are available
//! directly.

use std::ops::{Deref, DerefMut};

use crate::artifact::Persist;
use crate::context::SchemeContext;
use crate::handle::ResourceHandle;

macro_rules! resource {
    ($(#[$meta:meta])* $name:ident, $native:ty, $label:literal, $empty:expr) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            handle: ResourceHandle<$native>,
        }

        impl $name {
            /// Holds an empty native object bound to the context's pool.
            pub fn new(context: &SchemeContext) -> Self {
                let empty: fn(&SchemeContext) -> $native = $empty;
                Self::from_native(empty(context))
            }

            pub fn from_native(native: $native) -> Self {
                Self {
                    handle: ResourceHandle::from_instance($label, native),
                }
            }
        }

        impl Deref for $name {
            type Target = ResourceHandle<$native>;

            fn deref(&self) -> &Self::Target {
                &self.handle
            }
        }

        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.handle
            }
        }

        impl Persist for $name {
            type Native = $native;

            fn handle(&self) -> &ResourceHandle<$native> {
                &self.handle
            }

            fn handle_mut(&mut self) -> &mut ResourceHandle<$native> {
                &mut self.handle
            }
        }
    };
}

resource!(Plaintext, backend::Plaintext, "plaintext", |c| backend::Plaintext::new(c.pool()));
resource!(Ciphertext, backend::Ciphertext, "ciphertext", |c| backend::Ciphertext::new(c.pool()));
resource!(PublicKey, backend::PublicKey, "public key", |c| backend::PublicKey::new(c.pool()));
resource!(
    /// An empty secret key is rejected by every engine operation until a
    /// generated or loaded key is injected.
    SecretKey,
    backend::SecretKey,
    "secret key",
    |c| backend::SecretKey::new(c.pool())
);
resource!(RelinKeys, backend::RelinKeys, "relinearization keys", |_| backend::RelinKeys::new());
resource!(GaloisKeys, backend::GaloisKeys, "galois keys", |_| backend::GaloisKeys::new());
