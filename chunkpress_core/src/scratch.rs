use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScratchError {
    #[error("scratch buffer limit exceeded: requested {requested} bytes, limit {limit}")]
    LimitExceeded { requested: usize, limit: usize },
    #[error("scratch allocation of {requested} bytes failed: {source}")]
    OutOfMemory {
        requested: usize,
        #[source]
        source: TryReserveError,
    },
}

/// Reusable, growable byte region borrowed by codecs for the duration of one
/// compress or decompress call.
///
/// The buffer only ever grows, so steady-state chunk processing stops
/// allocating after the first few calls. Callers that process chunks in
/// parallel give each worker its own `ScratchBuffer`.
#[derive(Debug, Default)]
pub struct ScratchBuffer {
    buf: Vec<u8>,
    limit: Option<usize>,
}

impl ScratchBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A buffer that refuses to grow past `limit` bytes.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            buf: Vec::new(),
            limit: Some(limit),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Bytes currently held, whether or not the last call used them all.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Borrow exactly `min_size` bytes, growing the backing storage if
    /// needed. Contents left over from earlier calls are not cleared.
    pub fn get(&mut self, min_size: usize) -> Result<&mut [u8], ScratchError> {
        if let Some(limit) = self.limit {
            if min_size > limit {
                return Err(ScratchError::LimitExceeded {
                    requested: min_size,
                    limit,
                });
            }
        }
        if self.buf.len() < min_size {
            self.buf
                .try_reserve_exact(min_size - self.buf.len())
                .map_err(|source| ScratchError::OutOfMemory {
                    requested: min_size,
                    source,
                })?;
            self.buf.resize(min_size, 0);
        }
        Ok(&mut self.buf[..min_size])
    }

    /// Release the backing storage.
    pub fn clear(&mut self) {
        self.buf = Vec::new();
    }
}
