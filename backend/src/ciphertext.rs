use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::context::Context;
use crate::exception::{NativeException, NativeResult};
use crate::params::ParmsId;
use crate::pool::{Allocation, MemoryPool};
use crate::rns::RnsPoly;
use crate::serialization::{
    ReaderFrom, WriterTo, read_len, read_parms_id, require_parms_id, write_parms_id,
};

/// Ciphertext `(c_0, ..., c_{k-1})` over the full coefficient modulus.
#[derive(Clone, Debug)]
pub struct Ciphertext {
    pub(crate) parms_id: ParmsId,
    pub(crate) scale: f64,
    pub(crate) polys: Vec<RnsPoly>,
    alloc: Allocation,
}

impl Ciphertext {
    /// Empty ciphertext.
    pub fn new(pool: &MemoryPool) -> Self {
        Self::from_parts(ParmsId::ZERO, 1.0, Vec::new(), pool)
    }

    pub(crate) fn from_parts(
        parms_id: ParmsId,
        scale: f64,
        polys: Vec<RnsPoly>,
        pool: &MemoryPool,
    ) -> Self {
        let bytes: usize = polys.iter().map(|p| p.size_in_bytes()).sum();
        Self {
            parms_id,
            scale,
            polys,
            alloc: pool.allocate(bytes),
        }
    }

    pub fn parms_id(&self) -> ParmsId {
        self.parms_id
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Number of polynomials.
    pub fn size(&self) -> usize {
        self.polys.len()
    }

    pub fn poly_modulus_degree(&self) -> usize {
        self.polys.first().map(|p| p.n()).unwrap_or(0)
    }

    pub fn coeff_modulus_size(&self) -> usize {
        self.polys.first().map(|p| p.limbs()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.polys.is_empty()
    }

    pub fn pool(&self) -> &MemoryPool {
        self.alloc.pool()
    }

    pub(crate) fn require_valid(&self, context: &Context) -> NativeResult<()> {
        require_parms_id(context, &self.parms_id)?;
        if self.polys.len() < 2 {
            return Err(NativeException::invalid_argument(
                "ciphertext is not valid for encryption parameters",
            ));
        }
        Ok(())
    }
}

impl PartialEq for Ciphertext {
    fn eq(&self, other: &Self) -> bool {
        self.parms_id == other.parms_id && self.scale == other.scale && self.polys == other.polys
    }
}

impl WriterTo for Ciphertext {
    fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        write_parms_id(writer, &self.parms_id)?;
        writer.write_f64::<LittleEndian>(self.scale)?;
        writer.write_u64::<LittleEndian>(self.polys.len() as u64)?;
        for poly in self.polys.iter() {
            poly.write_to(writer)?;
        }
        Ok(())
    }
}

impl ReaderFrom for Ciphertext {
    fn read_from<R: Read>(
        context: &Context,
        reader: &mut R,
        pool: &MemoryPool,
    ) -> NativeResult<Self> {
        let parms_id: ParmsId = read_parms_id(reader)?;
        require_parms_id(context, &parms_id)?;
        let scale: f64 = reader.read_f64::<LittleEndian>()?;
        let size: usize = read_len(reader, 16)?;
        let base = context.base()?;
        let polys: Vec<RnsPoly> = (0..size)
            .map(|_| RnsPoly::read_from(reader, base))
            .collect::<NativeResult<Vec<RnsPoly>>>()?;
        let ct: Ciphertext = Ciphertext::from_parts(parms_id, scale, polys, pool);
        ct.require_valid(context)?;
        Ok(ct)
    }
}
