//! The adaptive meta-codec.
//!
//! `auto` never writes a format of its own. For every chunk it runs lz4 as a
//! cheap probe and uses the probe's ratio to decide whether the configured
//! target codec is worth running at all. Whatever it returns is a regular
//! lz4, none or target chunk, tagged as such, so decompression goes through
//! normal detection.

use chunkpress_core::format::{CodecKind, COMPRESSIBLE_RATIO, EXPANSION_RATIO, TARGET_GAIN_RATIO};
use chunkpress_core::{Codec, CompressError, Result, ScratchBuffer};
use tracing::debug;

use crate::{Lz4Codec, NoneCodec};

/// What the lz4 probe says about a chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Clearly compressible: try the target codec.
    Target,
    /// Barely compressible: the probe output is good enough.
    Fast,
    /// Not compressible: store verbatim.
    Store,
}

pub struct AutoCodec {
    target: Box<dyn Codec>,
    lz4: Lz4Codec,
    none: NoneCodec,
}

/// `out / input` as a ratio; an empty input never counts as compressible.
fn ratio(out: usize, input: usize) -> f64 {
    if input == 0 {
        f64::INFINITY
    } else {
        out as f64 / input as f64
    }
}

impl AutoCodec {
    pub fn new(target: Box<dyn Codec>) -> Self {
        Self {
            target,
            lz4: Lz4Codec,
            none: NoneCodec,
        }
    }

    pub fn target(&self) -> &dyn Codec {
        self.target.as_ref()
    }

    /// Run the lz4 probe and classify `raw`. The probe output is returned so
    /// the caller does not have to compress twice.
    pub fn decide(&self, raw: &[u8], scratch: &mut ScratchBuffer) -> Result<(Decision, Vec<u8>)> {
        let fast = self.lz4.compress(raw, scratch)?;
        let r = ratio(fast.len(), raw.len());
        let decision = if r < COMPRESSIBLE_RATIO {
            Decision::Target
        } else if r < EXPANSION_RATIO {
            Decision::Fast
        } else {
            Decision::Store
        };
        debug!(len = raw.len(), lz4_ratio = r, ?decision, "auto probe");
        Ok((decision, fast))
    }
}

impl Codec for AutoCodec {
    fn kind(&self) -> Option<CodecKind> {
        None
    }

    fn name(&self) -> &'static str {
        "auto"
    }

    fn compress(&self, raw: &[u8], scratch: &mut ScratchBuffer) -> Result<Vec<u8>> {
        let (decision, fast) = self.decide(raw, scratch)?;
        match decision {
            Decision::Fast => Ok(fast),
            Decision::Store => self.none.compress(raw, scratch),
            Decision::Target => {
                let expensive = self.target.compress(raw, scratch)?;
                let gain = ratio(expensive.len(), fast.len());
                if gain < TARGET_GAIN_RATIO {
                    Ok(expensive)
                } else {
                    // Not worth the slower decompression for this little.
                    debug!(codec = self.target.name(), gain, "keeping lz4 output");
                    Ok(fast)
                }
            }
        }
    }

    fn decompress(&self, _compressed: &[u8], _scratch: &mut ScratchBuffer) -> Result<Vec<u8>> {
        Err(CompressError::Unsupported {
            codec: "auto",
            operation: "decompress",
        })
    }
}
