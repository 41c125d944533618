//! CDR decoding trait

use crate::{AlignedReadBuffer, Result};

/// Trait for types that can be decoded from CDR format
pub trait CdrDecode: Sized {
    /// Decode a value at the reader's cursor, skipping leading alignment padding.
    fn cdr_decode(input: &mut AlignedReadBuffer) -> Result<Self>;

    /// Get the CDR alignment requirement for this type
    fn cdr_align() -> usize {
        1
    }
}
