//! Retrying output allocation for codecs whose decompressed size cannot be
//! read from the compressed input.
//!
//! The loop starts from a generous guess, grows it geometrically whenever the
//! native call reports the buffer was too small, and gives up at
//! [`HARD_CEILING`]. Streaming decoders (xz, zlib) go through
//! [`read_bounded`] instead, which applies the same ceiling to a reader.

use std::io::{ErrorKind, Read};

use tracing::trace;

use crate::error::{CompressError, Result};
use crate::format::{GROWTH_FACTOR, HARD_CEILING, INITIAL_FLOOR};
use crate::scratch::ScratchBuffer;

/// Outcome of one decompression attempt into a fixed-size buffer.
#[derive(Debug)]
pub enum Attempt {
    /// The output fit; this many bytes were written.
    Done(usize),
    /// The output did not fit; retry with a larger buffer.
    TooSmall,
    /// Hard failure, the input is corrupt.
    Failed(String),
}

/// Output size to try first for `compressed_len` bytes of input.
pub fn initial_guess(compressed_len: usize) -> usize {
    INITIAL_FLOOR.max(compressed_len.saturating_mul(3))
}

/// Next output size after `size` proved too small, or `None` once the
/// ceiling has already been tried.
pub fn next_guess(size: usize) -> Option<usize> {
    if size >= HARD_CEILING {
        return None;
    }
    let grown = (size as f64 * GROWTH_FACTOR) as usize;
    Some(grown.clamp(size + 1, HARD_CEILING))
}

/// Run `attempt` against growing scratch regions until it fits.
///
/// On success the decompressed bytes are copied out of `scratch`.
pub fn decompress_bounded<F>(
    codec: &'static str,
    scratch: &mut ScratchBuffer,
    compressed_len: usize,
    mut attempt: F,
) -> Result<Vec<u8>>
where
    F: FnMut(&mut [u8]) -> Attempt,
{
    let mut size = initial_guess(compressed_len);
    loop {
        let buf = scratch
            .get(size)
            .map_err(|e| CompressError::decompression(codec, e.to_string()))?;
        match attempt(&mut *buf) {
            Attempt::Done(n) => {
                trace!(codec, compressed_len, output = n, buffer = size, "decompressed");
                return Ok(buf[..n].to_vec());
            }
            Attempt::Failed(msg) => return Err(CompressError::decompression(codec, msg)),
            Attempt::TooSmall => match next_guess(size) {
                Some(next) => {
                    trace!(codec, from = size, to = next, "output buffer too small, growing");
                    size = next;
                }
                None => {
                    return Err(CompressError::decompression(
                        codec,
                        format!("output exceeds {HARD_CEILING} bytes"),
                    ))
                }
            },
        }
    }
}

/// Read a streaming decoder to its end, refusing output past [`HARD_CEILING`]
/// or the scratch limit, whichever is lower.
///
/// Output memory is reserved with `try_reserve`, so exhaustion is reported as
/// `Decompression` instead of aborting.
pub fn read_bounded<R: Read>(
    codec: &'static str,
    scratch: &ScratchBuffer,
    reader: R,
) -> Result<Vec<u8>> {
    let limit = scratch.limit().map_or(HARD_CEILING, |l| l.min(HARD_CEILING));
    let mut limited = reader.take(limit as u64 + 1);
    let mut chunk = [0u8; 64 * 1024];
    let mut out = Vec::new();
    loop {
        let n = match limited.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(CompressError::decompression(codec, e.to_string())),
        };
        if out.len() + n > limit {
            return Err(CompressError::decompression(
                codec,
                format!("output exceeds {limit} bytes"),
            ));
        }
        out.try_reserve(n).map_err(|e| {
            CompressError::decompression(codec, format!("output allocation failed: {e}"))
        })?;
        out.extend_from_slice(&chunk[..n]);
    }
    trace!(codec, output = out.len(), "stream decoded");
    Ok(out)
}
