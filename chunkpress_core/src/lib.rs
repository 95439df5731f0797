pub mod bounded;
pub mod codec;
pub mod envelope;
pub mod error;
pub mod format;
pub mod scratch;
pub mod spec;

pub use codec::Codec;
pub use error::{CompressError, Result};
pub use format::{CodecKind, Tag, TAG_LEN};
pub use scratch::{ScratchBuffer, ScratchError};
pub use spec::CompressionSpec;
