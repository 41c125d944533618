//! GIOP message envelope
//!
//! Every GIOP message starts with a fixed 12-byte header:
//!
//! ```text
//! +------+------+------+------+-------+-------+-------+------+----------------+
//! | 'G'  | 'I'  | 'O'  | 'P'  | major | minor | flags | type | message_size   |
//! +------+------+------+------+-------+-------+-------+------+----------------+
//!    0      1      2      3      4       5       6       7       8..12 (u32)
//! ```
//!
//! The body follows immediately and is aligned relative to the start of the
//! header, so body buffers are created with a base offset of [`HEADER_SIZE`].

use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, warn};

use crate::context::{CodeSetContext, GiopVersion};
use crate::error::MAX_CDR_ALLOCATION_SIZE;
use crate::write::WriteBufferConfig;
use crate::{
    AlignedReadBuffer, AlignedWriteBuffer, CdrContext, CdrDecode, CdrEncode, CdrError, Result,
};

/// Message magic
pub const GIOP_MAGIC: [u8; 4] = *b"GIOP";

/// Size of the GIOP message header
pub const HEADER_SIZE: usize = 12;

/// GIOP header flag bits
pub mod flags {
    /// Set when the message is little-endian
    pub const BYTE_ORDER: u8 = 0x01;
    /// Set when more fragments follow (GIOP 1.1+)
    pub const MORE_FRAGMENTS: u8 = 0x02;
}

/// GIOP message types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageType {
    Request = 0,
    Reply = 1,
    CancelRequest = 2,
    LocateRequest = 3,
    LocateReply = 4,
    CloseConnection = 5,
    MessageError = 6,
    /// GIOP 1.1+ only
    Fragment = 7,
}

impl MessageType {
    /// Decode a message type octet as valid for `version`
    pub fn from_u8(value: u8, version: GiopVersion) -> Result<Self> {
        let ty = match value {
            0 => MessageType::Request,
            1 => MessageType::Reply,
            2 => MessageType::CancelRequest,
            3 => MessageType::LocateRequest,
            4 => MessageType::LocateReply,
            5 => MessageType::CloseConnection,
            6 => MessageType::MessageError,
            7 if version.supports_fragments() => MessageType::Fragment,
            other => return Err(CdrError::InvalidMessageType(other)),
        };
        Ok(ty)
    }
}

/// Decoded GIOP message header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GiopHeader {
    pub version: GiopVersion,
    pub flags: u8,
    pub message_type: MessageType,
    /// Body length in bytes, excluding the header
    pub message_size: u32,
}

impl GiopHeader {
    pub fn little_endian(&self) -> bool {
        self.flags & flags::BYTE_ORDER != 0
    }

    pub fn more_fragments(&self) -> bool {
        self.version.supports_fragments() && self.flags & flags::MORE_FRAGMENTS != 0
    }

    /// Stream context for decoding this message's body
    pub fn context(&self, code_set: CodeSetContext) -> CdrContext {
        CdrContext::with_byte_order(self.little_endian())
            .with_version(self.version)
            .with_code_set(code_set)
    }

    /// Encode the header in its own byte order
    pub fn encode(&self) -> Result<Bytes> {
        let mut out = AlignedWriteBuffer::with_capacity(HEADER_SIZE);
        out.set_context(CdrContext::with_byte_order(self.little_endian()));
        out.write(&GIOP_MAGIC)?;
        self.version.major.cdr_encode(&mut out)?;
        self.version.minor.cdr_encode(&mut out)?;
        self.flags.cdr_encode(&mut out)?;
        (self.message_type as u8).cdr_encode(&mut out)?;
        self.message_size.cdr_encode(&mut out)?;
        Ok(out.into_bytes())
    }

    /// Decode and validate a header from the start of `bytes`
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut input = AlignedReadBuffer::new(Bytes::copy_from_slice(
            &bytes[..bytes.len().min(HEADER_SIZE)],
        ));

        let magic: [u8; 4] = input.read_array()?;
        if magic != GIOP_MAGIC {
            return Err(CdrError::BadMagic(magic));
        }
        let version = GiopVersion::new(u8::cdr_decode(&mut input)?, u8::cdr_decode(&mut input)?);
        if !version.is_supported() {
            return Err(CdrError::UnsupportedVersion {
                major: version.major,
                minor: version.minor,
            });
        }
        let header_flags = u8::cdr_decode(&mut input)?;
        // GIOP 1.0 carries a plain byte_order boolean here
        if !version.supports_fragments() && header_flags > 1 {
            return Err(CdrError::InvalidByteOrder(header_flags));
        }
        let message_type = MessageType::from_u8(u8::cdr_decode(&mut input)?, version)?;

        input.set_context(CdrContext::with_byte_order(header_flags & flags::BYTE_ORDER != 0));
        let message_size = u32::cdr_decode(&mut input)?;

        Ok(Self {
            version,
            flags: header_flags,
            message_type,
            message_size,
        })
    }
}

/// Builds one GIOP message: a body buffer aligned against the full message
#[derive(Debug)]
pub struct MessageBuilder {
    message_type: MessageType,
    more_fragments: bool,
    body: AlignedWriteBuffer,
}

impl MessageBuilder {
    pub fn new(ctx: CdrContext, message_type: MessageType) -> Self {
        Self::with_config(WriteBufferConfig::default(), ctx, message_type)
    }

    pub fn with_config(config: WriteBufferConfig, ctx: CdrContext, message_type: MessageType) -> Self {
        let mut body = AlignedWriteBuffer::with_config(config, ctx);
        body.set_base_offset(HEADER_SIZE);
        Self {
            message_type,
            more_fragments: false,
            body,
        }
    }

    /// Body buffer; its base offset is the header size
    pub fn body(&mut self) -> &mut AlignedWriteBuffer {
        &mut self.body
    }

    /// Mark that further Fragment messages follow this one
    pub fn set_more_fragments(&mut self, more: bool) {
        self.more_fragments = more;
    }

    /// Encode a value into the body
    pub fn put<T: CdrEncode>(&mut self, value: &T) -> Result<()> {
        value.cdr_encode(&mut self.body)
    }

    /// Prepend the header and return the complete message
    pub fn finish(self) -> Result<Bytes> {
        let ctx = *self.body.context();
        let version = ctx.version;
        if !version.is_supported() {
            return Err(CdrError::UnsupportedVersion {
                major: version.major,
                minor: version.minor,
            });
        }
        // validates Fragment against the version
        MessageType::from_u8(self.message_type as u8, version)?;

        let mut header_flags = ctx.byte_order_flag();
        if self.more_fragments {
            if !version.supports_fragments() {
                return Err(CdrError::InvalidMessageType(MessageType::Fragment as u8));
            }
            header_flags |= flags::MORE_FRAGMENTS;
        }

        let body_len = self.body.len();
        let message_size = u32::try_from(body_len).map_err(|_| CdrError::AllocationLimitExceeded {
            requested: body_len,
            limit: u32::MAX as usize,
        })?;
        let header = GiopHeader {
            version,
            flags: header_flags,
            message_type: self.message_type,
            message_size,
        };

        let mut message = BytesMut::with_capacity(HEADER_SIZE + body_len);
        message.put(header.encode()?);
        message.put(self.body.into_bytes());
        debug!(
            version = %version,
            message_type = ?header.message_type,
            message_size,
            "framed GIOP message"
        );
        Ok(message.freeze())
    }
}

/// Split a complete message into its header and a body reader.
///
/// The body reader uses a base offset of [`HEADER_SIZE`] and the default
/// code sets. Bytes past `message_size` are not part of the body.
pub fn read_message(bytes: Bytes) -> Result<(GiopHeader, AlignedReadBuffer)> {
    read_message_with(bytes, CodeSetContext::default())
}

/// [`read_message`] with negotiated code sets
pub fn read_message_with(
    bytes: Bytes,
    code_set: CodeSetContext,
) -> Result<(GiopHeader, AlignedReadBuffer)> {
    let header = GiopHeader::decode(&bytes).map_err(|e| {
        warn!(error = %e, "rejecting GIOP header");
        e
    })?;

    let size = header.message_size as usize;
    if size > MAX_CDR_ALLOCATION_SIZE {
        return Err(CdrError::AllocationLimitExceeded {
            requested: size,
            limit: MAX_CDR_ALLOCATION_SIZE,
        });
    }
    let available = bytes.len() - HEADER_SIZE;
    if available < size {
        warn!(declared = size, available, "truncated GIOP message");
        return Err(CdrError::SizeMismatch {
            declared: size,
            actual: available,
        });
    }

    let mut body = AlignedReadBuffer::with_context(
        bytes.slice(HEADER_SIZE..HEADER_SIZE + size),
        header.context(code_set),
    );
    body.set_base_offset(HEADER_SIZE);
    Ok((header, body))
}
