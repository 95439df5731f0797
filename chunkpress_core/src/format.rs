use std::fmt;

/// Length of the envelope tag prepended to every tagged codec's output.
pub const TAG_LEN: usize = 2;

pub type Tag = [u8; TAG_LEN];

// ── Tags ───────────────────────────────────────────────────────────────────
//
// Byte 0 names the codec, byte 1 is reserved and always zero. Reserved or
// retired values are never reassigned.

pub const TAG_NONE: Tag = [0x00, 0x00];
pub const TAG_LZ4: Tag = [0x01, 0x00];
pub const TAG_LZMA: Tag = [0x02, 0x00];
pub const TAG_ZSTD: Tag = [0x03, 0x00];

// ── Levels ─────────────────────────────────────────────────────────────────

pub const ZLIB_LEVELS: std::ops::RangeInclusive<u32> = 0..=9;
pub const DEFAULT_LEVEL_ZLIB: u32 = 6;

pub const LZMA_LEVELS: std::ops::RangeInclusive<u32> = 0..=9;
pub const DEFAULT_LEVEL_LZMA: u32 = 6;

pub const ZSTD_LEVELS: std::ops::RangeInclusive<i32> = 1..=22;
pub const DEFAULT_LEVEL_ZSTD: i32 = 3;

// ── Auto thresholds ────────────────────────────────────────────────────────

/// lz4 ratio below which the data is worth handing to the target codec.
pub const COMPRESSIBLE_RATIO: f64 = 0.97;

/// lz4 ratio at or above which the data is stored verbatim.
pub const EXPANSION_RATIO: f64 = 1.0;

/// The target codec's output must be below this fraction of lz4's output.
pub const TARGET_GAIN_RATIO: f64 = 0.99;

// ── Bounded decompression ──────────────────────────────────────────────────

/// First output guess for codecs without an embedded size: 1.1 × 8 MiB.
pub const INITIAL_FLOOR: usize = 9_227_468;

/// Multiplier applied to the output guess after a "buffer too small".
pub const GROWTH_FACTOR: f64 = 1.5;

/// Output guesses never grow past 128 MiB.
pub const HARD_CEILING: usize = 128 * 1024 * 1024;

// ── Codec identity ─────────────────────────────────────────────────────────

/// Every real (decompressible) codec known to the registry.
///
/// `auto` is deliberately absent: it only ever emits one of these.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CodecKind {
    None,
    Lz4,
    Zstd,
    Lzma,
    /// Legacy zlib streams, written before the envelope existed.
    Zlib,
}

/// Detection priority. Exact-tag codecs come first, cheapest first; zlib is
/// matched by a header checksum pattern and must stay last.
pub const DETECTION_ORDER: [CodecKind; 5] = [
    CodecKind::Lz4,
    CodecKind::Zstd,
    CodecKind::None,
    CodecKind::Lzma,
    CodecKind::Zlib,
];

impl CodecKind {
    /// Envelope tag, or `None` for the tag-less legacy codec.
    pub fn tag(self) -> Option<Tag> {
        match self {
            CodecKind::None => Some(TAG_NONE),
            CodecKind::Lz4 => Some(TAG_LZ4),
            CodecKind::Lzma => Some(TAG_LZMA),
            CodecKind::Zstd => Some(TAG_ZSTD),
            CodecKind::Zlib => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CodecKind::None => "none",
            CodecKind::Lz4 => "lz4",
            CodecKind::Zstd => "zstd",
            CodecKind::Lzma => "lzma",
            CodecKind::Zlib => "zlib",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(CodecKind::None),
            "lz4" => Some(CodecKind::Lz4),
            "zstd" => Some(CodecKind::Zstd),
            "lzma" => Some(CodecKind::Lzma),
            "zlib" => Some(CodecKind::Zlib),
            _ => None,
        }
    }

    /// Whether `header` (the first two bytes of a chunk) was produced by
    /// this codec.
    pub fn detects(self, header: &Tag) -> bool {
        match self.tag() {
            Some(tag) => *header == tag,
            None => is_zlib_header(header),
        }
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// zlib CMF/FLG check: deflate method in the low nibble of CMF, and the
/// 16-bit header value is a multiple of 31.
pub fn is_zlib_header(header: &Tag) -> bool {
    let (cmf, flg) = (header[0] as u16, header[1] as u16);
    cmf & 0x0f == 8 && (cmf * 256 + flg) % 31 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_unique() {
        let tags: Vec<Tag> = DETECTION_ORDER.iter().filter_map(|k| k.tag()).collect();
        for (i, a) in tags.iter().enumerate() {
            for b in &tags[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn no_tag_looks_like_zlib() {
        for kind in DETECTION_ORDER {
            if let Some(tag) = kind.tag() {
                assert!(!is_zlib_header(&tag), "{kind} tag collides with zlib");
            }
        }
    }

    #[test]
    fn zlib_is_detected_last() {
        assert_eq!(DETECTION_ORDER.last(), Some(&CodecKind::Zlib));
    }

    #[test]
    fn common_zlib_headers() {
        // 78 01 / 78 9c / 78 da are what zlib writes for levels 0-1, 6, 9.
        assert!(is_zlib_header(&[0x78, 0x01]));
        assert!(is_zlib_header(&[0x78, 0x9c]));
        assert!(is_zlib_header(&[0x78, 0xda]));
        assert!(!is_zlib_header(&[0x78, 0x00]));
        assert!(!is_zlib_header(&[0x79, 0x9c]));
    }

    #[test]
    fn names_round_trip() {
        for kind in DETECTION_ORDER {
            assert_eq!(CodecKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(CodecKind::from_name("auto"), None);
    }

    #[test]
    fn initial_floor_is_eleven_tenths_of_8mib() {
        assert_eq!(INITIAL_FLOOR, (1.1 * (8 * 1024 * 1024) as f64) as usize);
    }
}
