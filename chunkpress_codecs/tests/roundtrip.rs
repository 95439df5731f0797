/// Round-trip tests: every codec, driven through the same `Compressor`
/// entry point callers use, must reproduce its input byte for byte and be
/// detected as the codec that wrote it.
use chunkpress_codecs::Compressor;
use chunkpress_core::CodecKind;
use proptest::prelude::*;

/// Generate `len` deterministic bytes using a simple LCG.
fn pseudo_random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = seed;
    (0..len)
        .map(|_| {
            rng = rng
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (rng >> 56) as u8
        })
        .collect()
}

/// Generate `len` highly compressible bytes (repeating pattern).
fn compressible_bytes(len: usize) -> Vec<u8> {
    let pattern = b"the quick brown fox jumps over the lazy dog. ";
    (0..len).map(|i| pattern[i % pattern.len()]).collect()
}

const SPECS: &[(&str, CodecKind)] = &[
    ("none", CodecKind::None),
    ("lz4", CodecKind::Lz4),
    ("zstd,1", CodecKind::Zstd),
    ("zstd,3", CodecKind::Zstd),
    ("lzma,0", CodecKind::Lzma),
    ("lzma,6", CodecKind::Lzma),
    ("zlib,0", CodecKind::Zlib),
    ("zlib,6", CodecKind::Zlib),
];

fn assert_roundtrip(data: &[u8]) {
    for &(spec, kind) in SPECS {
        let mut c: Compressor = spec.parse().unwrap();
        let compressed = c.compress(data).unwrap();
        assert_eq!(
            Compressor::detect(&compressed).unwrap(),
            kind,
            "{spec} output detected as another codec"
        );
        let restored = c.decompress(&compressed).unwrap();
        assert_eq!(restored, data, "{spec} round-trip of {} bytes", data.len());
    }
}

// ── tests ──────────────────────────────────────────────────────────────────

#[test]
fn test_roundtrip_empty() {
    assert_roundtrip(b"");
}

#[test]
fn test_roundtrip_single_byte() {
    assert_roundtrip(b"\x00");
    assert_roundtrip(b"\xff");
}

#[test]
fn test_roundtrip_1kib() {
    assert_roundtrip(&pseudo_random_bytes(1024, 1));
    assert_roundtrip(&compressible_bytes(1024));
}

#[test]
fn test_roundtrip_8mib() {
    assert_roundtrip(&pseudo_random_bytes(8 * 1024 * 1024, 0xDEAD_BEEF));
    assert_roundtrip(&compressible_bytes(8 * 1024 * 1024));
}

/// lz4 on 64 MiB of zeros compresses far below the initial output guess, so
/// decompression has to grow the buffer several times before it fits.
#[test]
fn test_lz4_grows_output_buffer() {
    let data = vec![0u8; 64 * 1024 * 1024];
    let mut c: Compressor = "lz4".parse().unwrap();
    let compressed = c.compress(&data).unwrap();
    assert!(compressed.len() * 3 < chunkpress_core::format::INITIAL_FLOOR);
    assert_eq!(c.decompress(&compressed).unwrap(), data);
}

/// xz and zlib streams carry no output size, so a tiny chunk of zeros that
/// expands past the ceiling must be refused rather than decoded.
#[test]
fn test_streaming_decoders_stop_at_ceiling() {
    use chunkpress_core::format::HARD_CEILING;

    let data = vec![0u8; HARD_CEILING + 1024 * 1024];
    for spec in ["zlib,9", "lzma,0"] {
        let mut c: Compressor = spec.parse().unwrap();
        let compressed = c.compress(&data).unwrap();
        assert!(compressed.len() < 1024 * 1024, "{spec}");
        let err = c.decompress(&compressed).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("{} decompress failed: output exceeds {HARD_CEILING} bytes", &spec[..4]),
            "{spec}"
        );
    }
}

#[test]
#[ignore = "allocates several hundred MiB"]
fn test_roundtrip_100mib() {
    assert_roundtrip(&pseudo_random_bytes(100 * 1024 * 1024, 42));
}

#[test]
fn test_any_compressor_decodes_any_chunk() {
    let data = compressible_bytes(100_000);
    let mut reader: Compressor = "none".parse().unwrap();
    for &(spec, _) in SPECS {
        let mut writer: Compressor = spec.parse().unwrap();
        let compressed = writer.compress(&data).unwrap();
        assert_eq!(reader.decompress(&compressed).unwrap(), data, "{spec}");
    }
}

#[test]
fn test_auto_roundtrip() {
    for spec in ["auto,zstd,3", "auto,lzma,1", "auto,zlib,9", "auto,lz4", "auto,none"] {
        let mut c: Compressor = spec.parse().unwrap();
        for data in [
            Vec::new(),
            compressible_bytes(50_000),
            pseudo_random_bytes(50_000, 9),
        ] {
            let compressed = c.compress(&data).unwrap();
            assert_eq!(c.decompress(&compressed).unwrap(), data, "{spec}");
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn roundtrip_property(data in prop::collection::vec(any::<u8>(), 0..4096)) {
        for &(spec, _) in SPECS {
            let mut c: Compressor = spec.parse().unwrap();
            let compressed = c.compress(&data).unwrap();
            prop_assert_eq!(c.decompress(&compressed).unwrap(), data.clone());
        }
    }
}
