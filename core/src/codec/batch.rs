use backend::MemoryPool;

use crate::codec::{ElementKind, EncodeExtras, SlotVector, TypedCodec};
use crate::context::SchemeContext;
use crate::error::Result;
use crate::handle::ResourceHandle;
use crate::objects::Plaintext;
use crate::scheme::SchemeKind;

/// Integer codec: one slot per coefficient, values modulo the plain modulus.
pub struct BatchEncoder {
    handle: ResourceHandle<backend::BatchEncoder>,
    pool: MemoryPool,
}

impl BatchEncoder {
    pub fn new(context: &SchemeContext) -> Result<Self> {
        let mut handle: ResourceHandle<backend::BatchEncoder> =
            ResourceHandle::new("batch encoder");
        handle.initialize(|| -> Result<backend::BatchEncoder> {
            Ok(backend::BatchEncoder::new(context.native()?)?)
        })?;
        Ok(Self {
            handle,
            pool: context.pool().clone(),
        })
    }

    pub fn delete(&mut self) {
        self.handle.delete();
    }
}

impl TypedCodec for BatchEncoder {
    fn scheme(&self) -> SchemeKind {
        SchemeKind::Integer
    }

    fn default_kind(&self) -> ElementKind {
        ElementKind::Int32
    }

    fn accepts(&self, kind: ElementKind) -> bool {
        matches!(kind, ElementKind::Int32 | ElementKind::UInt32)
    }

    fn slot_count(&self) -> Result<usize> {
        Ok(self.handle.require()?.slot_count())
    }

    fn encode(
        &self,
        values: &SlotVector,
        kind: Option<ElementKind>,
        _extras: &EncodeExtras,
    ) -> Result<Plaintext> {
        let encoder: &backend::BatchEncoder = self.handle.require()?;
        let native: backend::Plaintext = match self.resolve(kind) {
            ElementKind::UInt32 => encoder.encode_u64(&values.to_u64s(), &self.pool)?,
            _ => encoder.encode_i64(&values.to_i64s(), &self.pool)?,
        };
        Ok(Plaintext::from_native(native))
    }

    fn decode(&self, plaintext: &Plaintext, kind: Option<ElementKind>) -> Result<SlotVector> {
        let encoder: &backend::BatchEncoder = self.handle.require()?;
        let pt: &backend::Plaintext = plaintext.require()?;
        let slots: SlotVector = match self.resolve(kind) {
            ElementKind::UInt32 => {
                let values: Vec<u64> = encoder.decode_u64(pt, &self.pool)?;
                SlotVector::UInt32(values.into_iter().map(|x| x as u32).collect())
            }
            _ => {
                let values: Vec<i64> = encoder.decode_i64(pt, &self.pool)?;
                SlotVector::Int32(values.into_iter().map(|x| x as i32).collect())
            }
        };
        Ok(slots)
    }
}
