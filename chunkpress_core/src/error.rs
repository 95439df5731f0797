//! Error taxonomy shared by every codec adapter.
//!
//! Native library errors (lz4_flex, zstd, xz2, flate2) are mapped into these
//! variants at the adapter boundary and never escape the crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressError {
    /// No registered codec recognises the leading bytes.
    #[error("no decompressor for this data found: {header:02x?}")]
    UnknownFormat { header: [u8; 2] },

    /// Input is shorter than the fixed header it must carry.
    #[error("malformed input: need at least {needed} bytes, got {got}")]
    MalformedInput { needed: usize, got: usize },

    /// Native decompression failed, or the output could not be sized safely.
    #[error("{codec} decompress failed: {msg}")]
    Decompression { codec: &'static str, msg: String },

    /// A compression specification string could not be parsed or validated.
    #[error("invalid compression specification: {0}")]
    InvalidSpecification(String),

    /// A bounded native compress call produced no output.
    #[error("{codec} compress failed: {msg}")]
    CompressionFailed { codec: &'static str, msg: String },

    /// The codec does not implement the requested operation.
    #[error("{codec} does not support {operation}")]
    Unsupported {
        codec: &'static str,
        operation: &'static str,
    },
}

impl CompressError {
    pub fn decompression(codec: &'static str, msg: impl Into<String>) -> Self {
        CompressError::Decompression {
            codec,
            msg: msg.into(),
        }
    }

    pub fn compression_failed(codec: &'static str, msg: impl Into<String>) -> Self {
        CompressError::CompressionFailed {
            codec,
            msg: msg.into(),
        }
    }

    pub fn invalid_spec(msg: impl Into<String>) -> Self {
        CompressError::InvalidSpecification(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, CompressError>;
