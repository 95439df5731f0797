mod auto;
mod compressor;
mod lz4_codec;
mod lzma_codec;
mod none_codec;
mod zlib_codec;
mod zstd_codec;

pub use auto::{AutoCodec, Decision};
pub use compressor::Compressor;
pub use lz4_codec::Lz4Codec;
pub use lzma_codec::LzmaCodec;
pub use none_codec::NoneCodec;
pub use zlib_codec::ZlibCodec;
pub use zstd_codec::ZstdCodec;

use chunkpress_core::format::{DEFAULT_LEVEL_LZMA, DEFAULT_LEVEL_ZLIB, DEFAULT_LEVEL_ZSTD};
use chunkpress_core::{Codec, CodecKind, CompressionSpec};

static NONE: NoneCodec = NoneCodec;
static LZ4: Lz4Codec = Lz4Codec;
static ZSTD: ZstdCodec = ZstdCodec {
    level: DEFAULT_LEVEL_ZSTD,
};
static LZMA: LzmaCodec = LzmaCodec {
    level: DEFAULT_LEVEL_LZMA,
};
static ZLIB: ZlibCodec = ZlibCodec {
    level: DEFAULT_LEVEL_ZLIB,
};

/// Resolve the adapter that decompresses chunks of a detected `kind`.
///
/// Levels only matter when compressing, so the default-level instance
/// decodes every chunk of its format.
pub fn codec_by_kind(kind: CodecKind) -> &'static dyn Codec {
    match kind {
        CodecKind::None => &NONE,
        CodecKind::Lz4 => &LZ4,
        CodecKind::Zstd => &ZSTD,
        CodecKind::Lzma => &LZMA,
        CodecKind::Zlib => &ZLIB,
    }
}

/// Build a fresh compressing adapter for `spec`.
///
/// Side-effect free; calling it twice yields two independent adapters.
pub fn build(spec: &CompressionSpec) -> Box<dyn Codec> {
    match spec {
        CompressionSpec::None => Box::new(NoneCodec),
        CompressionSpec::Lz4 => Box::new(Lz4Codec),
        CompressionSpec::Zlib { level } => Box::new(ZlibCodec::new(*level)),
        CompressionSpec::Lzma { level } => Box::new(LzmaCodec::new(*level)),
        CompressionSpec::Zstd { level } => Box::new(ZstdCodec::new(*level)),
        CompressionSpec::Auto(target) => Box::new(AutoCodec::new(build(target))),
    }
}
