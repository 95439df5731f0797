//! The tag-prefixed wire representation of one compressed chunk, and the
//! header-only detection that picks a decompressor for it.

use tracing::debug;

use crate::error::{CompressError, Result};
use crate::format::{CodecKind, Tag, DETECTION_ORDER, TAG_LEN};

/// Prepend `tag` to `payload`.
pub fn attach(tag: Tag, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(TAG_LEN + payload.len());
    out.extend_from_slice(&tag);
    out.extend_from_slice(payload);
    out
}

/// Drop the leading `tag_len` bytes.
pub fn strip(tag_len: usize, data: &[u8]) -> Result<&[u8]> {
    data.get(tag_len..).ok_or(CompressError::MalformedInput {
        needed: tag_len,
        got: data.len(),
    })
}

/// First two bytes of `data`.
pub fn header(data: &[u8]) -> Result<Tag> {
    match data {
        [a, b, ..] => Ok([*a, *b]),
        _ => Err(CompressError::MalformedInput {
            needed: TAG_LEN,
            got: data.len(),
        }),
    }
}

/// Identify the codec that produced `data` by walking [`DETECTION_ORDER`].
pub fn detect(data: &[u8]) -> Result<CodecKind> {
    let hdr = header(data)?;
    match DETECTION_ORDER.iter().find(|kind| kind.detects(&hdr)) {
        Some(kind) => Ok(*kind),
        None => {
            debug!(header = ?hdr, "no codec matched chunk header");
            Err(CompressError::UnknownFormat { header: hdr })
        }
    }
}
