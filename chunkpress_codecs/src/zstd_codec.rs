use chunkpress_core::format::{CodecKind, DEFAULT_LEVEL_ZSTD, TAG_LEN, TAG_ZSTD};
use chunkpress_core::{envelope, Codec, CompressError, Result, ScratchBuffer};
use tracing::trace;
use zstd::zstd_safe;

/// Zstandard frame codec.
///
/// Each chunk is one independent frame. The frame header records the
/// original size, so decompression allocates exactly that much and then
/// insists the decoder produced exactly that much.
///
/// Best for: the `auto` target on general data; levels trade speed for size.
#[derive(Debug, Clone, Copy)]
pub struct ZstdCodec {
    /// Compression level (1 = fast / larger, 22 = slow / smallest).
    pub level: i32,
}

impl Default for ZstdCodec {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL_ZSTD,
        }
    }
}

impl ZstdCodec {
    pub fn new(level: i32) -> Self {
        Self { level }
    }
}

/// Most output one frame byte can produce. The densest zstd block is an RLE
/// block: a 3-byte header plus one byte expanding to at most 128 KiB.
const MAX_EXPANSION: usize = 128 * 1024 / 4;

/// Original size recorded in a zstd frame header.
fn frame_content_size(frame: &[u8]) -> Result<usize> {
    match zstd_safe::get_frame_content_size(frame) {
        Ok(Some(size)) => usize::try_from(size).map_err(|_| {
            CompressError::decompression("zstd", format!("frame content size {size} too large"))
        }),
        Ok(None) => Err(CompressError::decompression(
            "zstd",
            "get size failed: original size unknown",
        )),
        Err(_) => Err(CompressError::decompression(
            "zstd",
            "get size failed: data was not compressed by zstd",
        )),
    }
}

impl Codec for ZstdCodec {
    fn kind(&self) -> Option<CodecKind> {
        Some(CodecKind::Zstd)
    }

    fn name(&self) -> &'static str {
        "zstd"
    }

    fn compress(&self, raw: &[u8], scratch: &mut ScratchBuffer) -> Result<Vec<u8>> {
        let bound = zstd_safe::compress_bound(raw.len());
        let buf = scratch
            .get(bound)
            .map_err(|e| CompressError::compression_failed("zstd", e.to_string()))?;
        let n = zstd::bulk::compress_to_buffer(raw, buf, self.level)
            .map_err(|e| CompressError::compression_failed("zstd", e.to_string()))?;
        if n == 0 {
            return Err(CompressError::compression_failed("zstd", "no output produced"));
        }
        Ok(envelope::attach(TAG_ZSTD, &buf[..n]))
    }

    fn decompress(&self, compressed: &[u8], scratch: &mut ScratchBuffer) -> Result<Vec<u8>> {
        let frame = envelope::strip(TAG_LEN, compressed)?;
        let original_size = frame_content_size(frame)?;
        if original_size > frame.len().saturating_mul(MAX_EXPANSION) {
            return Err(CompressError::decompression(
                "zstd",
                format!(
                    "frame of {} bytes cannot hold the {original_size} bytes it declares",
                    frame.len()
                ),
            ));
        }
        let buf = scratch
            .get(original_size)
            .map_err(|e| CompressError::decompression("zstd", e.to_string()))?;
        let n = zstd::bulk::decompress_to_buffer(frame, buf)
            .map_err(|e| CompressError::decompression("zstd", e.to_string()))?;
        if n != original_size {
            return Err(CompressError::decompression(
                "zstd",
                format!("size mismatch: frame declares {original_size} bytes, got {n}"),
            ));
        }
        trace!(compressed = frame.len(), original_size, "zstd frame decoded");
        Ok(buf[..n].to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_size_sentinels_are_distinguished() {
        let not_zstd = frame_content_size(b"definitely not a zstd frame").unwrap_err();
        assert!(not_zstd.to_string().contains("not compressed by zstd"));

        // A streamed frame with no pledged size leaves the content size out.
        let mut encoder = zstd::stream::Encoder::new(Vec::new(), 3).unwrap();
        std::io::Write::write_all(&mut encoder, b"streamed without a size").unwrap();
        let streamed = encoder.finish().unwrap();
        let unknown = frame_content_size(&streamed).unwrap_err();
        assert!(unknown.to_string().contains("original size unknown"));
    }

    #[test]
    fn bulk_frames_carry_their_size() {
        let frame = zstd::bulk::compress(&[7u8; 5000], 3).unwrap();
        assert_eq!(frame_content_size(&frame).unwrap(), 5000);
    }

    #[test]
    fn implausible_declared_size_is_refused_before_allocating() {
        // Magic, single-segment descriptor with an 8-byte size, then one
        // empty raw block: a valid 16-byte header claiming 4 GiB.
        let mut frame = vec![0x28, 0xb5, 0x2f, 0xfd, 0xe0];
        frame.extend_from_slice(&(4u64 << 30).to_le_bytes());
        frame.extend_from_slice(&[0x01, 0x00, 0x00]);
        assert_eq!(frame_content_size(&frame).unwrap(), 4 << 30);

        let chunk = envelope::attach(TAG_ZSTD, &frame);
        let mut scratch = ScratchBuffer::new();
        let err = ZstdCodec::default().decompress(&chunk, &mut scratch).unwrap_err();
        assert!(err.to_string().contains("cannot hold"), "{err}");
        assert!(scratch.is_empty());
    }

    #[test]
    fn highly_compressible_frames_stay_within_expansion_bound() {
        let data = vec![0u8; 16 * 1024 * 1024];
        let mut scratch = ScratchBuffer::new();
        let chunk = ZstdCodec::default().compress(&data, &mut scratch).unwrap();
        assert_eq!(ZstdCodec::default().decompress(&chunk, &mut scratch).unwrap(), data);
    }
}
