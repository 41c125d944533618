//! CDR (Common Data Representation) marshaling buffers
//!
//! This crate provides the alignment-aware byte buffers that CORBA GIOP
//! marshaling is built on, plus codecs for primitives, strings, encapsulations
//! and the GIOP message envelope.
//!
//! # CDR Alignment
//!
//! - Primitives align to their natural size (1, 2, 4, or 8 bytes)
//! - Alignment is measured from the start of the enclosing message, not the
//!   start of the local buffer; a buffer embedded after a header carries a
//!   base offset
//! - Writer and reader must use the same base offset, or every field after
//!   the first padded one is misread
//!
//! ```
//! use giop_cdr::{AlignedWriteBuffer, CdrDecode, CdrEncode};
//!
//! let mut out = AlignedWriteBuffer::new();
//! out.set_base_offset(12);
//! 1u8.cdr_encode(&mut out).unwrap();
//! 2.5f64.cdr_encode(&mut out).unwrap();
//! assert_eq!(out.len(), 12);
//!
//! let mut input = out.to_read_buffer_aligned();
//! assert_eq!(u8::cdr_decode(&mut input).unwrap(), 1);
//! assert_eq!(f64::cdr_decode(&mut input).unwrap(), 2.5);
//! ```

mod context;
mod decode;
mod encapsulation;
mod encode;
mod error;
pub mod message;
mod primitives;
mod read;
mod storage;
mod strings;
mod write;

pub use context::{align_padding, code_sets, CdrContext, CodeSetContext, GiopVersion};
pub use decode::CdrDecode;
pub use encapsulation::{read_encapsulation, write_encapsulation};
pub use encode::CdrEncode;
pub use error::{AlignmentError, CdrError, Operation, Result, MAX_CDR_ALLOCATION_SIZE};
pub use message::{read_message, read_message_with, GiopHeader, MessageBuilder, MessageType};
pub use read::AlignedReadBuffer;
pub use strings::{CdrOctets, CdrString, CdrWString};
pub use write::{AlignedWriteBuffer, WriteBufferConfig};

/// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};
