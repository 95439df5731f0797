use chunkpress_core::bounded::{decompress_bounded, Attempt};
use chunkpress_core::format::{CodecKind, TAG_LEN, TAG_LZ4};
use chunkpress_core::{envelope, Codec, CompressError, Result, ScratchBuffer};
use lz4_flex::block::{compress_into, decompress_into, get_maximum_output_size, DecompressError};

/// LZ4 raw block codec.
///
/// Fastest of the bundled codecs in both directions, and the probe `auto`
/// runs on every chunk. The block format carries no decompressed size, so
/// decompression goes through the bounded retry loop.
///
/// Takes no level.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lz4Codec;

impl Codec for Lz4Codec {
    fn kind(&self) -> Option<CodecKind> {
        Some(CodecKind::Lz4)
    }

    fn name(&self) -> &'static str {
        "lz4"
    }

    fn compress(&self, raw: &[u8], scratch: &mut ScratchBuffer) -> Result<Vec<u8>> {
        let bound = get_maximum_output_size(raw.len());
        let buf = scratch
            .get(bound)
            .map_err(|e| CompressError::compression_failed("lz4", e.to_string()))?;
        let n = compress_into(raw, buf)
            .map_err(|e| CompressError::compression_failed("lz4", e.to_string()))?;
        if n == 0 {
            return Err(CompressError::compression_failed("lz4", "no output produced"));
        }
        Ok(envelope::attach(TAG_LZ4, &buf[..n]))
    }

    fn decompress(&self, compressed: &[u8], scratch: &mut ScratchBuffer) -> Result<Vec<u8>> {
        let payload = envelope::strip(TAG_LEN, compressed)?;
        decompress_bounded("lz4", scratch, payload.len(), |buf| {
            match decompress_into(payload, buf) {
                Ok(n) => Attempt::Done(n),
                Err(DecompressError::OutputTooSmall { .. }) => Attempt::TooSmall,
                Err(e) => Attempt::Failed(e.to_string()),
            }
        })
    }
}
