use std::io::Write;

use chunkpress_core::bounded::read_bounded;
use chunkpress_core::format::{CodecKind, DEFAULT_LEVEL_ZLIB};
use chunkpress_core::{Codec, CompressError, Result, ScratchBuffer};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

/// Legacy zlib codec.
///
/// Output is a bare zlib stream with no envelope tag, matching chunks written
/// before tags existed. Detection relies on the zlib header's check bits, see
/// [`chunkpress_core::format::is_zlib_header`].
#[derive(Debug, Clone, Copy)]
pub struct ZlibCodec {
    /// Compression level (0 = stored, 9 = smallest).
    pub level: u32,
}

impl Default for ZlibCodec {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL_ZLIB,
        }
    }
}

impl ZlibCodec {
    pub fn new(level: u32) -> Self {
        Self { level }
    }
}

impl Codec for ZlibCodec {
    fn kind(&self) -> Option<CodecKind> {
        Some(CodecKind::Zlib)
    }

    fn name(&self) -> &'static str {
        "zlib"
    }

    fn compress(&self, raw: &[u8], _scratch: &mut ScratchBuffer) -> Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(self.level));
        encoder
            .write_all(raw)
            .map_err(|e| CompressError::compression_failed("zlib", e.to_string()))?;
        encoder
            .finish()
            .map_err(|e| CompressError::compression_failed("zlib", e.to_string()))
    }

    fn decompress(&self, compressed: &[u8], scratch: &mut ScratchBuffer) -> Result<Vec<u8>> {
        read_bounded("zlib", scratch, ZlibDecoder::new(compressed))
    }
}
