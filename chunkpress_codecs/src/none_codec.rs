use chunkpress_core::format::{CodecKind, TAG_LEN, TAG_NONE};
use chunkpress_core::{envelope, Codec, Result, ScratchBuffer};

/// No-op codec: stores chunks verbatim behind the `none` tag.
///
/// Useful for:
/// - Data that is already compressed or encrypted, where further
///   compression would only expand it.
/// - The `auto` fallback when lz4 could not shrink a chunk at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoneCodec;

impl Codec for NoneCodec {
    fn kind(&self) -> Option<CodecKind> {
        Some(CodecKind::None)
    }

    fn name(&self) -> &'static str {
        "none"
    }

    fn compress(&self, raw: &[u8], _scratch: &mut ScratchBuffer) -> Result<Vec<u8>> {
        Ok(envelope::attach(TAG_NONE, raw))
    }

    fn decompress(&self, compressed: &[u8], _scratch: &mut ScratchBuffer) -> Result<Vec<u8>> {
        Ok(envelope::strip(TAG_LEN, compressed)?.to_vec())
    }
}
