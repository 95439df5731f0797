use std::io::Write;

use chunkpress_core::bounded::read_bounded;
use chunkpress_core::format::{CodecKind, DEFAULT_LEVEL_LZMA, TAG_LEN, TAG_LZMA};
use chunkpress_core::{envelope, Codec, CompressError, Result, ScratchBuffer};
use xz2::read::XzDecoder;
use xz2::stream::{Check, Stream};
use xz2::write::XzEncoder;

/// LZMA2 codec in an xz container.
///
/// The xz integrity check is switched off: chunks are authenticated by the
/// surrounding pipeline, so a second checksum here would only cost cycles.
#[derive(Debug, Clone, Copy)]
pub struct LzmaCodec {
    /// xz preset (0 = fast, 9 = smallest).
    pub level: u32,
}

impl Default for LzmaCodec {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL_LZMA,
        }
    }
}

impl LzmaCodec {
    pub fn new(level: u32) -> Self {
        Self { level }
    }
}

impl Codec for LzmaCodec {
    fn kind(&self) -> Option<CodecKind> {
        Some(CodecKind::Lzma)
    }

    fn name(&self) -> &'static str {
        "lzma"
    }

    fn compress(&self, raw: &[u8], _scratch: &mut ScratchBuffer) -> Result<Vec<u8>> {
        let stream = Stream::new_easy_encoder(self.level, Check::None)
            .map_err(|e| CompressError::compression_failed("lzma", e.to_string()))?;
        let mut out = Vec::with_capacity(TAG_LEN + raw.len() / 2);
        out.extend_from_slice(&TAG_LZMA);
        let mut encoder = XzEncoder::new_stream(out, stream);
        encoder
            .write_all(raw)
            .map_err(|e| CompressError::compression_failed("lzma", e.to_string()))?;
        encoder
            .finish()
            .map_err(|e| CompressError::compression_failed("lzma", e.to_string()))
    }

    fn decompress(&self, compressed: &[u8], scratch: &mut ScratchBuffer) -> Result<Vec<u8>> {
        let payload = envelope::strip(TAG_LEN, compressed)?;
        read_bounded("lzma", scratch, XzDecoder::new(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_is_tagged_xz() {
        let mut scratch = ScratchBuffer::new();
        let out = LzmaCodec::new(0).compress(b"hello hello hello", &mut scratch).unwrap();
        assert_eq!(&out[..TAG_LEN], &TAG_LZMA);
        // xz stream magic follows the tag.
        assert_eq!(&out[TAG_LEN..TAG_LEN + 6], &[0xfd, b'7', b'z', b'X', b'Z', 0x00]);
    }

    #[test]
    fn corrupt_stream_is_a_decompression_error() {
        let mut scratch = ScratchBuffer::new();
        let mut out = LzmaCodec::default().compress(&[1u8; 4096], &mut scratch).unwrap();
        let len = out.len();
        out.truncate(len - 8);
        let err = LzmaCodec::default().decompress(&out, &mut scratch).unwrap_err();
        assert!(matches!(err, CompressError::Decompression { codec: "lzma", .. }));
    }

    #[test]
    fn output_respects_scratch_limit() {
        let mut scratch = ScratchBuffer::new();
        let out = LzmaCodec::new(0).compress(&[0u8; 8192], &mut scratch).unwrap();
        let mut small = ScratchBuffer::with_limit(4096);
        let err = LzmaCodec::default().decompress(&out, &mut small).unwrap_err();
        assert!(err.to_string().contains("output exceeds 4096 bytes"), "{err}");
    }
}
