//! CDR encoding trait

use crate::{AlignedWriteBuffer, Result};

/// Trait for types that can be encoded to CDR format
pub trait CdrEncode {
    /// Encode this value at the end of `out`.
    ///
    /// Implementations align to [`cdr_align`](Self::cdr_align) before writing
    /// and take the byte order from the buffer's context.
    fn cdr_encode(&self, out: &mut AlignedWriteBuffer) -> Result<()>;

    /// Get the CDR alignment requirement for this type
    fn cdr_align() -> usize
    where
        Self: Sized,
    {
        1
    }
}
