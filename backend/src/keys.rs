use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use utils::map::Map;

use crate::ciphertext::Ciphertext;
use crate::context::Context;
use crate::exception::{NativeException, NativeResult};
use crate::params::ParmsId;
use crate::pool::{Allocation, MemoryPool};
use crate::rns::RnsPoly;
use crate::serialization::{
    ReaderFrom, WriterTo, read_len, read_parms_id, require_parms_id, write_parms_id,
};

/// Ternary secret `s`, stored in NTT form.
#[derive(Clone, Debug)]
pub struct SecretKey {
    pub(crate) parms_id: ParmsId,
    pub(crate) poly: RnsPoly,
    alloc: Allocation,
}

impl SecretKey {
    /// Empty key, not valid for any parameters.
    pub fn new(pool: &MemoryPool) -> Self {
        Self::from_parts(ParmsId::ZERO, RnsPoly::alloc(0, 0), pool)
    }

    pub(crate) fn from_parts(parms_id: ParmsId, poly: RnsPoly, pool: &MemoryPool) -> Self {
        let alloc: Allocation = pool.allocate(poly.size_in_bytes());
        Self { parms_id, poly, alloc }
    }

    pub fn parms_id(&self) -> ParmsId {
        self.parms_id
    }

    pub fn is_empty(&self) -> bool {
        self.poly.limbs() == 0
    }

    pub(crate) fn require_valid(&self, context: &Context) -> NativeResult<()> {
        let base = context.base()?;
        if self.parms_id != context.parms_id()
            || self.poly.n() != base.n()
            || self.poly.limbs() != base.len()
        {
            return Err(NativeException::invalid_argument(
                "secret key is not valid for encryption parameters",
            ));
        }
        Ok(())
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.parms_id == other.parms_id && self.poly == other.poly
    }
}

impl WriterTo for SecretKey {
    fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        write_parms_id(writer, &self.parms_id)?;
        self.poly.write_to(writer)
    }
}

impl ReaderFrom for SecretKey {
    fn read_from<R: Read>(
        context: &Context,
        reader: &mut R,
        pool: &MemoryPool,
    ) -> NativeResult<Self> {
        let parms_id: ParmsId = read_parms_id(reader)?;
        require_parms_id(context, &parms_id)?;
        let poly: RnsPoly = RnsPoly::read_from(reader, context.base()?)?;
        Ok(SecretKey::from_parts(parms_id, poly, pool))
    }
}

/// Encryption of zero `(-(a*s) + e, a)` in NTT form.
#[derive(Clone, Debug, PartialEq)]
pub struct PublicKey {
    pub(crate) ct: Ciphertext,
}

impl PublicKey {
    /// Empty key, not valid for any parameters.
    pub fn new(pool: &MemoryPool) -> Self {
        Self {
            ct: Ciphertext::new(pool),
        }
    }

    pub fn parms_id(&self) -> ParmsId {
        self.ct.parms_id
    }

    pub fn is_empty(&self) -> bool {
        self.ct.is_empty()
    }

    pub(crate) fn require_valid(&self, context: &Context) -> NativeResult<()> {
        if self.ct.parms_id != context.parms_id() || self.ct.size() != 2 {
            return Err(NativeException::invalid_argument(
                "public key is not valid for encryption parameters",
            ));
        }
        Ok(())
    }
}

impl WriterTo for PublicKey {
    fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.ct.write_to(writer)
    }
}

impl ReaderFrom for PublicKey {
    fn read_from<R: Read>(
        context: &Context,
        reader: &mut R,
        pool: &MemoryPool,
    ) -> NativeResult<Self> {
        let pk: PublicKey = PublicKey {
            ct: Ciphertext::read_from(context, reader, pool)?,
        };
        pk.require_valid(context)?;
        Ok(pk)
    }
}

/// Key-switching key towards `s`: one encryption per RNS limb `i` of
/// `target * g_i`, where `g_i = 1 mod q_i` and `0 mod q_j` for `j != i`.
#[derive(Clone, Debug, PartialEq)]
pub struct KSwitchKey {
    pub(crate) rows: Vec<PublicKey>,
}

impl KSwitchKey {
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_u64::<LittleEndian>(self.rows.len() as u64)?;
        for row in self.rows.iter() {
            row.write_to(writer)?;
        }
        Ok(())
    }

    fn read_from<R: Read>(
        context: &Context,
        reader: &mut R,
        pool: &MemoryPool,
    ) -> NativeResult<Self> {
        let rows: usize = read_len(reader, 64)?;
        if rows != context.base()?.len() {
            return Err(NativeException::invalid_argument(
                "key switching key is not valid for encryption parameters",
            ));
        }
        Ok(Self {
            rows: (0..rows)
                .map(|_| PublicKey::read_from(context, reader, pool))
                .collect::<NativeResult<Vec<PublicKey>>>()?,
        })
    }
}

/// Relinearization key: key switching from `s^2` to `s`.
#[derive(Clone, Debug, PartialEq)]
pub struct RelinKeys {
    pub(crate) parms_id: ParmsId,
    pub(crate) key: Option<KSwitchKey>,
}

impl RelinKeys {
    pub fn new() -> Self {
        Self {
            parms_id: ParmsId::ZERO,
            key: None,
        }
    }

    pub fn parms_id(&self) -> ParmsId {
        self.parms_id
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_none()
    }
}

impl Default for RelinKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl WriterTo for RelinKeys {
    fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        write_parms_id(writer, &self.parms_id)?;
        match &self.key {
            Some(key) => {
                writer.write_u8(1)?;
                key.write_to(writer)
            }
            None => writer.write_u8(0),
        }
    }
}

impl ReaderFrom for RelinKeys {
    fn read_from<R: Read>(
        context: &Context,
        reader: &mut R,
        pool: &MemoryPool,
    ) -> NativeResult<Self> {
        let parms_id: ParmsId = read_parms_id(reader)?;
        require_parms_id(context, &parms_id)?;
        let key: Option<KSwitchKey> = match reader.read_u8()? {
            0 => None,
            _ => Some(KSwitchKey::read_from(context, reader, pool)?),
        };
        Ok(Self { parms_id, key })
    }
}

/// Galois keys: key switching from `s(X^g)` to `s`, keyed by Galois element `g`.
#[derive(Clone, Debug)]
pub struct GaloisKeys {
    pub(crate) parms_id: ParmsId,
    pub(crate) keys: Map<u64, KSwitchKey>,
}

impl GaloisKeys {
    pub fn new() -> Self {
        Self {
            parms_id: ParmsId::ZERO,
            keys: Map::new(),
        }
    }

    pub fn parms_id(&self) -> ParmsId {
        self.parms_id
    }

    pub fn has_key(&self, galois_elt: u64) -> bool {
        self.keys.contains_key(&galois_elt)
    }

    pub fn galois_elts(&self) -> Vec<u64> {
        self.keys.sorted_keys()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Default for GaloisKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for GaloisKeys {
    fn eq(&self, other: &Self) -> bool {
        self.parms_id == other.parms_id && self.keys == other.keys
    }
}

impl WriterTo for GaloisKeys {
    fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        write_parms_id(writer, &self.parms_id)?;
        writer.write_u64::<LittleEndian>(self.keys.len() as u64)?;
        for (galois_elt, key) in self.keys.iter_sorted() {
            writer.write_u64::<LittleEndian>(galois_elt)?;
            key.write_to(writer)?;
        }
        Ok(())
    }
}

impl ReaderFrom for GaloisKeys {
    fn read_from<R: Read>(
        context: &Context,
        reader: &mut R,
        pool: &MemoryPool,
    ) -> NativeResult<Self> {
        let parms_id: ParmsId = read_parms_id(reader)?;
        require_parms_id(context, &parms_id)?;
        let two_n: u64 = 2 * context.poly_modulus_degree() as u64;
        let count: usize = read_len(reader, context.poly_modulus_degree())?;
        let mut keys: Map<u64, KSwitchKey> = Map::new();
        for _ in 0..count {
            let galois_elt: u64 = reader.read_u64::<LittleEndian>()?;
            if galois_elt & 1 == 0 || galois_elt >= two_n {
                return Err(NativeException::invalid_argument(format!(
                    "galois element {} is not valid",
                    galois_elt
                )));
            }
            keys.insert(galois_elt, KSwitchKey::read_from(context, reader, pool)?);
        }
        Ok(Self { parms_id, keys })
    }
}
