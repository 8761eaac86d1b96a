//! Encode and decode dispatch by element kind.
//!
//! Each codec has a default kind (`int32` for the integer scheme, `double`
//! for the approximate one). A missing kind resolves to it silently; an
//! unrecognized tag or a kind of the other scheme also resolves to it, with
//! a warning.

mod batch;
mod ckks;
mod element;

pub use batch::BatchEncoder;
pub use ckks::CkksEncoder;
pub use element::{ElementKind, SlotVector};

use tracing::warn;

use crate::error::Result;
use crate::objects::Plaintext;
use crate::scheme::SchemeKind;

/// Scheme specific encode arguments.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EncodeExtras {
    /// Scale of approximate encodings. Ignored by the integer scheme.
    pub scale: Option<f64>,
}

impl EncodeExtras {
    pub fn with_scale(scale: f64) -> Self {
        Self { scale: Some(scale) }
    }
}

pub trait TypedCodec {
    fn scheme(&self) -> SchemeKind;

    fn default_kind(&self) -> ElementKind;

    fn accepts(&self, kind: ElementKind) -> bool;

    fn slot_count(&self) -> Result<usize>;

    fn encode(
        &self,
        values: &SlotVector,
        kind: Option<ElementKind>,
        extras: &EncodeExtras,
    ) -> Result<Plaintext>;

    fn decode(&self, plaintext: &Plaintext, kind: Option<ElementKind>) -> Result<SlotVector>;

    fn resolve(&self, kind: Option<ElementKind>) -> ElementKind {
        match kind {
            Some(kind) if self.accepts(kind) => kind,
            Some(kind) => {
                warn!(
                    scheme = %self.scheme(),
                    requested = %kind,
                    fallback = %self.default_kind(),
                    "element kind not supported by scheme"
                );
                self.default_kind()
            }
            None => self.default_kind(),
        }
    }

    fn resolve_tag(&self, tag: Option<&str>) -> ElementKind {
        match tag {
            Some(tag) => match ElementKind::from_tag(tag) {
                Some(kind) => self.resolve(Some(kind)),
                None => {
                    warn!(
                        scheme = %self.scheme(),
                        tag,
                        fallback = %self.default_kind(),
                        "unrecognized element tag"
                    );
                    self.default_kind()
                }
            },
            None => self.default_kind(),
        }
    }

    fn encode_tagged(
        &self,
        values: &SlotVector,
        tag: Option<&str>,
        extras: &EncodeExtras,
    ) -> Result<Plaintext> {
        let kind: ElementKind = self.resolve_tag(tag);
        self.encode(values, Some(kind), extras)
    }

    fn decode_tagged(&self, plaintext: &Plaintext, tag: Option<&str>) -> Result<SlotVector> {
        let kind: ElementKind = self.resolve_tag(tag);
        self.decode(plaintext, Some(kind))
    }
}
