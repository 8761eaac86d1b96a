use std::io::{Cursor, Read, Take, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;

use crate::context::Context;
use crate::exception::{NativeException, NativeResult};
use crate::params::ParmsId;
use crate::pool::MemoryPool;

pub const SERIALIZATION_MAGIC: u16 = 0xA15E;
pub const HEADER_SIZE: u8 = 16;
pub const VERSION_MAJOR: u8 = 1;
pub const VERSION_MINOR: u8 = 0;

/// Upper bound on a loaded stream, guards against corrupted size fields.
pub const MAX_STREAM_SIZE: u64 = 1 << 34;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ComprMode {
    None = 0,
    Deflate = 1,
}

impl TryFrom<u8> for ComprMode {
    type Error = NativeException;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ComprMode::None),
            1 => Ok(ComprMode::Deflate),
            other => Err(NativeException::invalid_argument(format!(
                "unsupported compression mode {}",
                other
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SerializationHeader {
    pub magic: u16,
    pub header_size: u8,
    pub version_major: u8,
    pub version_minor: u8,
    pub compr_mode: ComprMode,
    pub reserved: u16,
    pub size: u64,
}

impl SerializationHeader {
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_u16::<LittleEndian>(self.magic)?;
        writer.write_u8(self.header_size)?;
        writer.write_u8(self.version_major)?;
        writer.write_u8(self.version_minor)?;
        writer.write_u8(self.compr_mode as u8)?;
        writer.write_u16::<LittleEndian>(self.reserved)?;
        writer.write_u64::<LittleEndian>(self.size)?;
        Ok(())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> NativeResult<Self> {
        let magic: u16 = reader.read_u16::<LittleEndian>()?;
        if magic != SERIALIZATION_MAGIC {
            return Err(NativeException::invalid_argument("loaded stream has an invalid header"));
        }
        let header_size: u8 = reader.read_u8()?;
        let version_major: u8 = reader.read_u8()?;
        let version_minor: u8 = reader.read_u8()?;
        let compr_mode: ComprMode = ComprMode::try_from(reader.read_u8()?)?;
        let reserved: u16 = reader.read_u16::<LittleEndian>()?;
        let size: u64 = reader.read_u64::<LittleEndian>()?;
        if header_size != HEADER_SIZE || version_major != VERSION_MAJOR || reserved != 0 {
            return Err(NativeException::invalid_argument(format!(
                "unsupported stream version {}.{}",
                version_major, version_minor
            )));
        }
        if size < HEADER_SIZE as u64 || size > MAX_STREAM_SIZE {
            return Err(NativeException::invalid_argument(format!("invalid stream size {}", size)));
        }
        Ok(Self {
            magic,
            header_size,
            version_major,
            version_minor,
            compr_mode,
            reserved,
            size,
        })
    }
}

pub trait WriterTo {
    fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()>;
}

pub trait ReaderFrom: Sized {
    /// Reads an object and validates it against `context`.
    fn read_from<R: Read>(
        context: &Context,
        reader: &mut R,
        pool: &MemoryPool,
    ) -> NativeResult<Self>;
}

/// Writes `obj` behind a stream header, deflating the payload on request.
pub fn save<T: WriterTo>(obj: &T, compr_mode: ComprMode) -> NativeResult<Vec<u8>> {
    let mut body: Vec<u8> = Vec::new();
    obj.write_to(&mut body)?;

    let payload: Vec<u8> = match compr_mode {
        ComprMode::None => body,
        ComprMode::Deflate => {
            let mut encoder: ZlibEncoder<Vec<u8>> =
                ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&body)?;
            encoder.finish()?
        }
    };

    let header: SerializationHeader = SerializationHeader {
        magic: SERIALIZATION_MAGIC,
        header_size: HEADER_SIZE,
        version_major: VERSION_MAJOR,
        version_minor: VERSION_MINOR,
        compr_mode,
        reserved: 0,
        size: (HEADER_SIZE as usize + payload.len()) as u64,
    };

    let mut out: Vec<u8> = Vec::with_capacity(header.size as usize);
    header.write_to(&mut out)?;
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Reads the header of a stream without decoding the payload.
pub fn peek_header(bytes: &[u8]) -> NativeResult<SerializationHeader> {
    SerializationHeader::read_from(&mut Cursor::new(bytes))
}

pub fn load<T: ReaderFrom>(context: &Context, bytes: &[u8], pool: &MemoryPool) -> NativeResult<T> {
    let header: SerializationHeader = peek_header(bytes)?;
    if header.size != bytes.len() as u64 {
        return Err(NativeException::invalid_argument(format!(
            "stream size {} does not match buffer size {}",
            header.size,
            bytes.len()
        )));
    }
    let payload: &[u8] = &bytes[HEADER_SIZE as usize..];
    // Objects are decoded straight from the inflating reader, so a payload
    // never inflates past the shape the context allows.
    match header.compr_mode {
        ComprMode::None => read_exact_object(context, &mut Cursor::new(payload), pool),
        ComprMode::Deflate => {
            let mut reader: Take<ZlibDecoder<&[u8]>> =
                ZlibDecoder::new(payload).take(MAX_STREAM_SIZE);
            read_exact_object(context, &mut reader, pool)
        }
    }
}

fn read_exact_object<T: ReaderFrom, R: Read>(
    context: &Context,
    reader: &mut R,
    pool: &MemoryPool,
) -> NativeResult<T> {
    let obj: T = T::read_from(context, reader, pool)?;
    let mut rest: [u8; 1] = [0u8; 1];
    if reader.read(&mut rest)? != 0 {
        return Err(NativeException::invalid_argument("loaded stream has trailing data"));
    }
    Ok(obj)
}

pub(crate) fn write_parms_id<W: Write>(writer: &mut W, parms_id: &ParmsId) -> std::io::Result<()> {
    writer.write_all(&parms_id.0)
}

pub(crate) fn read_parms_id<R: Read>(reader: &mut R) -> NativeResult<ParmsId> {
    let mut id: [u8; 32] = [0u8; 32];
    reader.read_exact(&mut id)?;
    Ok(ParmsId(id))
}

pub(crate) fn require_parms_id(context: &Context, parms_id: &ParmsId) -> NativeResult<()> {
    context.require_set()?;
    if *parms_id != context.parms_id() {
        return Err(NativeException::invalid_argument(
            "loaded object is not valid for encryption parameters (ParmsId mismatch)",
        ));
    }
    Ok(())
}

pub(crate) fn read_len<R: Read>(reader: &mut R, max: usize) -> NativeResult<usize> {
    let len: u64 = reader.read_u64::<LittleEndian>()?;
    if len > max as u64 {
        return Err(NativeException::invalid_argument(format!(
            "length {} exceeds the maximum {}",
            len, max
        )));
    }
    Ok(len as usize)
}
