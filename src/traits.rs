use crate::errors::SmfResult;
use bytes::Bytes;

/// Decode a value from an immutable buffer starting at a byte offset.
///
/// The buffer is never consumed; callers advance their own offset by the
/// length the parsed value reports.
pub trait SmfParser {
    fn parse_at(data: &Bytes, offset: usize) -> SmfResult<Self>
    where
        Self: Sized;
}
