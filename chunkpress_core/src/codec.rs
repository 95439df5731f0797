use crate::error::Result;
use crate::format::CodecKind;
use crate::scratch::ScratchBuffer;

/// Core compression abstraction.
///
/// Each `Codec` implementation:
/// - Compresses one bounded in-memory chunk per call and keeps no state
///   between calls, so one instance can serve many chunks and many threads.
/// - Emits output that identifies itself: a [`TAG_LEN`](crate::format::TAG_LEN)
///   tag for every codec except legacy zlib, which is recognised by its
///   native header.
/// - Guarantees `decompress(compress(x)) == x` for every `x`, including the
///   empty chunk.
///
/// `scratch` is borrowed for the duration of the call only. Implementations
/// use it for bounded native output and copy the result out before
/// returning.
pub trait Codec: Send + Sync {
    /// Registry identity, or `None` for meta-codecs that only delegate.
    fn kind(&self) -> Option<CodecKind>;

    /// Human-readable codec name for logs and CLI display.
    fn name(&self) -> &'static str;

    /// Compress a single chunk into a self-identifying byte string.
    fn compress(&self, raw: &[u8], scratch: &mut ScratchBuffer) -> Result<Vec<u8>>;

    /// Decompress a chunk this codec produced.
    fn decompress(&self, compressed: &[u8], scratch: &mut ScratchBuffer) -> Result<Vec<u8>>;
}
