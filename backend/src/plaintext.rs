use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::context::Context;
use crate::exception::{NativeException, NativeResult};
use crate::params::{ParmsId, SchemeType};
use crate::pool::{Allocation, MemoryPool};
use crate::rns::RnsPoly;
use crate::serialization::{
    ReaderFrom, WriterTo, read_len, read_parms_id, require_parms_id, write_parms_id,
};

/// Encoded message.
///
/// BFV plaintexts hold `n` coefficients modulo the plain modulus and carry a
/// zero `ParmsId`; CKKS plaintexts hold `n * L` residues (limb-major) tagged
/// with the context's `ParmsId` and a scale.
#[derive(Clone, Debug)]
pub struct Plaintext {
    pub(crate) parms_id: ParmsId,
    pub(crate) scale: f64,
    pub(crate) coeff_count: usize,
    pub(crate) coeff_modulus_size: usize,
    pub(crate) data: Vec<u64>,
    alloc: Allocation,
}

impl Plaintext {
    /// Empty plaintext.
    pub fn new(pool: &MemoryPool) -> Self {
        Self::from_parts(ParmsId::ZERO, 1.0, 0, 0, Vec::new(), pool)
    }

    pub(crate) fn from_parts(
        parms_id: ParmsId,
        scale: f64,
        coeff_count: usize,
        coeff_modulus_size: usize,
        data: Vec<u64>,
        pool: &MemoryPool,
    ) -> Self {
        let alloc: Allocation = pool.allocate(data.len() * size_of::<u64>());
        Self {
            parms_id,
            scale,
            coeff_count,
            coeff_modulus_size,
            data,
            alloc,
        }
    }

    pub(crate) fn from_poly(
        parms_id: ParmsId,
        scale: f64,
        poly: RnsPoly,
        pool: &MemoryPool,
    ) -> Self {
        let coeff_count: usize = poly.n();
        let coeff_modulus_size: usize = poly.limbs();
        let data: Vec<u64> = poly.data.into_iter().flatten().collect();
        Self::from_parts(parms_id, scale, coeff_count, coeff_modulus_size, data, pool)
    }

    pub(crate) fn to_poly(&self) -> RnsPoly {
        RnsPoly {
            n: self.coeff_count,
            data: self
                .data
                .chunks_exact(self.coeff_count.max(1))
                .map(|c| c.to_vec())
                .collect(),
        }
    }

    pub fn parms_id(&self) -> ParmsId {
        self.parms_id
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn coeff_count(&self) -> usize {
        self.coeff_count
    }

    pub fn coeff_modulus_size(&self) -> usize {
        self.coeff_modulus_size
    }

    pub fn data(&self) -> &[u64] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|x| *x == 0)
    }

    pub fn pool(&self) -> &MemoryPool {
        self.alloc.pool()
    }

    /// Checks the plaintext can be consumed under `context`.
    pub(crate) fn require_valid(&self, context: &Context) -> NativeResult<()> {
        context.require_set()?;
        let n: usize = context.poly_modulus_degree();
        match context.scheme() {
            SchemeType::Bfv => {
                let t: u64 = context.plain_modulus()?.q();
                if !self.parms_id.is_zero()
                    || self.coeff_modulus_size != 0
                    || self.coeff_count != n
                    || self.data.len() != n
                    || self.data.iter().any(|x| *x >= t)
                {
                    return Err(NativeException::invalid_argument(
                        "plaintext is not valid for encryption parameters",
                    ));
                }
            }
            SchemeType::Ckks => {
                require_parms_id(context, &self.parms_id)?;
                let base = context.base()?;
                if self.coeff_count != n
                    || self.coeff_modulus_size != base.len()
                    || self.data.len() != n * base.len()
                {
                    return Err(NativeException::invalid_argument(
                        "plaintext is not valid for encryption parameters",
                    ));
                }
                let out_of_range: bool = self
                    .data
                    .chunks_exact(n)
                    .zip(base.moduli())
                    .any(|(limb, m)| limb.iter().any(|x| *x >= m.q()));
                if out_of_range {
                    return Err(NativeException::invalid_argument(
                        "plaintext is not valid for encryption parameters",
                    ));
                }
            }
            SchemeType::None => return Err(NativeException::invalid_argument("unsupported scheme")),
        }
        Ok(())
    }
}

impl PartialEq for Plaintext {
    fn eq(&self, other: &Self) -> bool {
        self.parms_id == other.parms_id
            && self.scale == other.scale
            && self.coeff_count == other.coeff_count
            && self.coeff_modulus_size == other.coeff_modulus_size
            && self.data == other.data
    }
}

impl WriterTo for Plaintext {
    fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        write_parms_id(writer, &self.parms_id)?;
        writer.write_f64::<LittleEndian>(self.scale)?;
        writer.write_u64::<LittleEndian>(self.coeff_count as u64)?;
        writer.write_u64::<LittleEndian>(self.coeff_modulus_size as u64)?;
        writer.write_u64::<LittleEndian>(self.data.len() as u64)?;
        for x in self.data.iter() {
            writer.write_u64::<LittleEndian>(*x)?;
        }
        Ok(())
    }
}

impl ReaderFrom for Plaintext {
    fn read_from<R: Read>(
        context: &Context,
        reader: &mut R,
        pool: &MemoryPool,
    ) -> NativeResult<Self> {
        let parms_id: ParmsId = read_parms_id(reader)?;
        let scale: f64 = reader.read_f64::<LittleEndian>()?;
        let coeff_count: usize = reader.read_u64::<LittleEndian>()? as usize;
        let coeff_modulus_size: usize = reader.read_u64::<LittleEndian>()? as usize;
        let len: usize = read_len(reader, 64 * crate::context::POLY_MODULUS_DEGREE_MAX)?;
        let mut data: Vec<u64> = vec![0u64; len];
        for x in data.iter_mut() {
            *x = reader.read_u64::<LittleEndian>()?;
        }
        let pt: Plaintext =
            Plaintext::from_parts(parms_id, scale, coeff_count, coeff_modulus_size, data, pool);
        pt.require_valid(context)?;
        Ok(pt)
    }
}
