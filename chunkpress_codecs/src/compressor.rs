use std::str::FromStr;

use chunkpress_core::{
    envelope, Codec, CodecKind, CompressError, CompressionSpec, Result, ScratchBuffer,
};
use tracing::trace;

use crate::{build, codec_by_kind};

/// A configured compression context.
///
/// Compresses with the codec its spec names and decompresses anything the
/// registry can detect, whatever spec produced it. The context owns its
/// scratch buffer; `&mut self` on every call keeps it to one call at a time,
/// so parallel workers each hold their own `Compressor`.
pub struct Compressor {
    spec: CompressionSpec,
    codec: Box<dyn Codec>,
    scratch: ScratchBuffer,
}

impl Compressor {
    pub fn new(spec: CompressionSpec) -> Self {
        Self::with_scratch(spec, ScratchBuffer::new())
    }

    /// Use `scratch` instead of a fresh unbounded buffer, e.g. one created
    /// with [`ScratchBuffer::with_limit`].
    pub fn with_scratch(spec: CompressionSpec, scratch: ScratchBuffer) -> Self {
        let codec = build(&spec);
        Self {
            spec,
            codec,
            scratch,
        }
    }

    pub fn spec(&self) -> &CompressionSpec {
        &self.spec
    }

    pub fn codec(&self) -> &dyn Codec {
        self.codec.as_ref()
    }

    pub fn compress(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        let out = self.codec.compress(data, &mut self.scratch)?;
        trace!(
            codec = self.codec.name(),
            raw = data.len(),
            compressed = out.len(),
            "compressed chunk"
        );
        Ok(out)
    }

    pub fn decompress(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        let kind = Self::detect(data)?;
        codec_by_kind(kind).decompress(data, &mut self.scratch)
    }

    /// Which codec produced `data`, from its first two bytes.
    pub fn detect(data: &[u8]) -> Result<CodecKind> {
        envelope::detect(data)
    }
}

impl FromStr for Compressor {
    type Err = CompressError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self::new(s.parse()?))
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new(CompressionSpec::default())
    }
}
