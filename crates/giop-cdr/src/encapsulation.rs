//! CDR encapsulations
//!
//! An encapsulation is an octet sequence whose first octet is a byte-order
//! flag. The content restarts alignment at the first octet of the sequence,
//! independent of where the sequence sits in the outer stream, and may use a
//! different byte order than the outer stream.

use tracing::{debug, warn};

use crate::{
    AlignedReadBuffer, AlignedWriteBuffer, CdrContext, CdrDecode, CdrEncode, CdrError, CdrOctets,
    Result,
};

/// Write an encapsulation whose content is produced by `f`.
///
/// The inner buffer inherits the outer version and code sets; only the byte
/// order is chosen per encapsulation.
pub fn write_encapsulation<F>(out: &mut AlignedWriteBuffer, little_endian: bool, f: F) -> Result<()>
where
    F: FnOnce(&mut AlignedWriteBuffer) -> Result<()>,
{
    let ctx = CdrContext {
        little_endian,
        ..*out.context()
    };
    let mut inner = AlignedWriteBuffer::with_context(ctx);
    inner.write_u8(ctx.byte_order_flag())?;
    f(&mut inner)?;

    debug!(len = inner.len(), little_endian, "writing encapsulation");
    CdrOctets::new(inner.into_bytes()).cdr_encode(out)
}

/// Read an encapsulation and return a reader over its content.
///
/// The returned reader is positioned after the byte-order flag, with a base
/// offset of 0 and the byte order the flag declares.
pub fn read_encapsulation(input: &mut AlignedReadBuffer) -> Result<AlignedReadBuffer> {
    let octets = CdrOctets::cdr_decode(input)?;
    let mut inner = AlignedReadBuffer::with_context(octets.into_bytes(), *input.context());

    let flag = inner.read_u8()?;
    let little_endian = match flag {
        0 => false,
        1 => true,
        other => {
            warn!(flag = other, "invalid encapsulation byte order");
            return Err(CdrError::InvalidByteOrder(other));
        }
    };
    inner.set_context(CdrContext {
        little_endian,
        ..*input.context()
    });
    Ok(inner)
}
