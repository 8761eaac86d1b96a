use backend::{ReaderFrom, SerializationHeader, WriterTo, load, peek_header, save};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::context::SchemeContext;
use crate::error::{Error, Result};
use crate::handle::ResourceHandle;
use crate::scheme::CompressionMode;

/// A self-describing serialized object: a 16 byte header carrying the
/// compression mode and total size, followed by the payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SerializableArtifact {
    bytes: Vec<u8>,
    header: SerializationHeader,
}

impl SerializableArtifact {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let header: SerializationHeader = peek_header(&bytes)?;
        Ok(Self { bytes, header })
    }

    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes: Vec<u8> = STANDARD
            .decode(encoded.trim())
            .map_err(|e| Error::Artifact(e.to_string()))?;
        Self::from_bytes(bytes)
    }

    pub fn compression(&self) -> CompressionMode {
        CompressionMode::from(self.header.compr_mode)
    }

    /// Total size, header included.
    pub fn size(&self) -> u64 {
        self.header.size
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

/// Save and load contract shared by every wrapped engine object. Loading
/// replaces the held instance, releasing the previous one.
pub trait Persist {
    type Native: WriterTo + ReaderFrom;

    fn handle(&self) -> &ResourceHandle<Self::Native>;

    fn handle_mut(&mut self) -> &mut ResourceHandle<Self::Native>;

    fn artifact(&self, mode: CompressionMode) -> Result<SerializableArtifact> {
        SerializableArtifact::from_bytes(self.save_array(mode)?)
    }

    /// Base64 string form of the stream.
    fn save(&self, mode: CompressionMode) -> Result<String> {
        Ok(STANDARD.encode(self.save_array(mode)?))
    }

    fn save_array(&self, mode: CompressionMode) -> Result<Vec<u8>> {
        Ok(save(self.handle().require()?, mode.compr_mode())?)
    }

    fn load(&mut self, context: &SchemeContext, encoded: &str) -> Result<()> {
        let bytes: Vec<u8> = STANDARD
            .decode(encoded.trim())
            .map_err(|e| Error::Artifact(e.to_string()))?;
        self.load_array(context, &bytes)
    }

    fn load_array(&mut self, context: &SchemeContext, bytes: &[u8]) -> Result<()> {
        let native: Self::Native = load(context.native()?, bytes, context.pool())?;
        self.handle_mut().inject(native);
        Ok(())
    }

    fn load_artifact(
        &mut self,
        context: &SchemeContext,
        artifact: &SerializableArtifact,
    ) -> Result<()> {
        self.load_array(context, artifact.as_bytes())
    }
}
