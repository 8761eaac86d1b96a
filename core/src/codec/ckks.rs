use backend::MemoryPool;

use crate::codec::{ElementKind, EncodeExtras, SlotVector, TypedCodec};
use crate::context::SchemeContext;
use crate::error::Result;
use crate::handle::ResourceHandle;
use crate::objects::Plaintext;
use crate::scheme::SchemeKind;

/// Scale used when neither the caller nor the context profile provides one.
pub const DEFAULT_SCALE: f64 = (1u64 << 40) as f64;

/// Approximate codec over `N/2` complex slots.
pub struct CkksEncoder {
    handle: ResourceHandle<backend::CkksEncoder>,
    pool: MemoryPool,
    default_scale: f64,
}

impl CkksEncoder {
    pub fn new(context: &SchemeContext) -> Result<Self> {
        let mut handle: ResourceHandle<backend::CkksEncoder> = ResourceHandle::new("ckks encoder");
        handle.initialize(|| -> Result<backend::CkksEncoder> {
            Ok(backend::CkksEncoder::new(context.native()?)?)
        })?;
        Ok(Self {
            handle,
            pool: context.pool().clone(),
            default_scale: context.profile().map(|p| p.scale).unwrap_or(DEFAULT_SCALE),
        })
    }

    pub fn default_scale(&self) -> f64 {
        self.default_scale
    }

    pub fn delete(&mut self) {
        self.handle.delete();
    }
}

impl TypedCodec for CkksEncoder {
    fn scheme(&self) -> SchemeKind {
        SchemeKind::Approximate
    }

    fn default_kind(&self) -> ElementKind {
        ElementKind::Double
    }

    fn accepts(&self, kind: ElementKind) -> bool {
        matches!(kind, ElementKind::Double | ElementKind::ComplexDouble)
    }

    fn slot_count(&self) -> Result<usize> {
        Ok(self.handle.require()?.slot_count())
    }

    fn encode(
        &self,
        values: &SlotVector,
        kind: Option<ElementKind>,
        extras: &EncodeExtras,
    ) -> Result<Plaintext> {
        let encoder: &backend::CkksEncoder = self.handle.require()?;
        let scale: f64 = extras.scale.unwrap_or(self.default_scale);
        let native: backend::Plaintext = match self.resolve(kind) {
            ElementKind::ComplexDouble => {
                encoder.encode_complex(&values.to_complex(), scale, &self.pool)?
            }
            _ => encoder.encode_f64(&values.to_f64s(), scale, &self.pool)?,
        };
        Ok(Plaintext::from_native(native))
    }

    fn decode(&self, plaintext: &Plaintext, kind: Option<ElementKind>) -> Result<SlotVector> {
        let encoder: &backend::CkksEncoder = self.handle.require()?;
        let pt: &backend::Plaintext = plaintext.require()?;
        let slots: SlotVector = match self.resolve(kind) {
            // complex decode runs on the engine's global pool
            ElementKind::ComplexDouble => SlotVector::ComplexDouble(encoder.decode_complex(pt)?),
            _ => SlotVector::Double(encoder.decode_f64(pt, &self.pool)?),
        };
        Ok(slots)
    }
}
