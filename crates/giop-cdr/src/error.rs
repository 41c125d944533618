//! CDR error types

use std::fmt;

use thiserror::Error;

/// Maximum number of elements a length-prefixed value may claim on decode.
///
/// Guards against hostile length fields forcing huge allocations.
pub const MAX_CDR_ALLOCATION_SIZE: usize = 16 * 1024 * 1024;

/// Buffer operation that was being attempted when an [`AlignmentError`] was raised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Padding insertion or padding skip
    Align,
    /// Raw append on the write side
    Write,
    /// Raw read on the read side
    Read,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Align => f.write_str("align"),
            Operation::Write => f.write_str("write"),
            Operation::Read => f.write_str("read"),
        }
    }
}

/// The single failure raised by the aligned buffers.
///
/// Raw `write`/`read` calls report an alignment of 1.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignmentError {
    /// The write-side storage could not grow by `requested` bytes
    #[error("unable to {op} at {alignment}: cannot extend storage of {len} bytes by {requested}")]
    StorageExhausted {
        op: Operation,
        alignment: usize,
        requested: usize,
        len: usize,
    },

    /// Not enough bytes remain on the read side
    #[error("unable to {op} at {alignment}: needed {needed} bytes, have {have}")]
    Underrun {
        op: Operation,
        alignment: usize,
        needed: usize,
        have: usize,
    },
}

impl AlignmentError {
    /// Alignment requested by the failed operation
    pub fn alignment(&self) -> usize {
        match self {
            AlignmentError::StorageExhausted { alignment, .. }
            | AlignmentError::Underrun { alignment, .. } => *alignment,
        }
    }

    /// Operation that failed
    pub fn operation(&self) -> Operation {
        match self {
            AlignmentError::StorageExhausted { op, .. } | AlignmentError::Underrun { op, .. } => *op,
        }
    }

    /// Whether the error came from truncated or malformed input
    pub fn is_underrun(&self) -> bool {
        matches!(self, AlignmentError::Underrun { .. })
    }
}

/// CDR encoding/decoding errors raised above the buffer layer
#[derive(Debug, Error)]
pub enum CdrError {
    /// Alignment or bounds failure in the underlying buffer
    #[error(transparent)]
    Alignment(#[from] AlignmentError),

    /// Invalid string - bad length or missing terminator
    #[error("invalid string: {0}")]
    InvalidString(String),

    /// Boolean octet other than 0 or 1
    #[error("invalid boolean octet: {0}")]
    InvalidBoolean(u8),

    /// Message does not start with "GIOP"
    #[error("bad GIOP magic: {0:02x?}")]
    BadMagic([u8; 4]),

    /// GIOP version outside 1.0..=1.2
    #[error("unsupported GIOP version {major}.{minor}")]
    UnsupportedVersion { major: u8, minor: u8 },

    /// Code set this library cannot transcode
    #[error("unsupported code set: 0x{0:08x}")]
    UnsupportedCodeSet(u32),

    /// Unknown or version-inappropriate message type
    #[error("invalid message type: {0}")]
    InvalidMessageType(u8),

    /// Encapsulation byte-order octet other than 0 or 1
    #[error("invalid byte order flag: {0}")]
    InvalidByteOrder(u8),

    /// Declared size disagrees with the bytes present
    #[error("size mismatch: declared {declared} bytes, got {actual}")]
    SizeMismatch { declared: usize, actual: usize },

    /// Length field exceeds the decode allocation cap
    #[error("allocation limit exceeded: requested {requested}, limit {limit}")]
    AllocationLimitExceeded { requested: usize, limit: usize },

    /// UTF-8 decoding error
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// UTF-16 decoding error
    #[error("UTF-16 error: {0}")]
    Utf16(#[from] std::char::DecodeUtf16Error),
}

/// Result type for CDR codec operations
pub type Result<T> = std::result::Result<T, CdrError>;
