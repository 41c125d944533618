//! Alignment-aware read buffer

use bytes::Bytes;
use tracing::trace;

use crate::context::{align_padding, CdrContext};
use crate::error::{AlignmentError, Operation};

/// Cursor over a fixed byte sequence that skips CDR alignment padding.
///
/// Mirrors [`AlignedWriteBuffer`](crate::AlignedWriteBuffer): as long as both
/// sides use the same base offset, every `align` here consumes exactly the
/// padding the writer inserted. Padding content is never inspected.
#[derive(Debug, Clone)]
pub struct AlignedReadBuffer {
    bytes: Bytes,
    position: usize,
    base_offset: usize,
    ctx: CdrContext,
}

impl AlignedReadBuffer {
    /// Create a reader with the default context
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self::with_context(bytes, CdrContext::default())
    }

    pub fn with_context(bytes: impl Into<Bytes>, ctx: CdrContext) -> Self {
        Self {
            bytes: bytes.into(),
            position: 0,
            base_offset: 0,
            ctx,
        }
    }

    /// Set the distance of this buffer's first byte from the message start
    pub fn set_base_offset(&mut self, offset: usize) {
        self.base_offset = offset;
    }

    pub fn base_offset(&self) -> usize {
        self.base_offset
    }

    pub fn context(&self) -> &CdrContext {
        &self.ctx
    }

    pub fn set_context(&mut self, ctx: CdrContext) {
        self.ctx = ctx;
    }

    /// Current read cursor
    pub fn position(&self) -> usize {
        self.position
    }

    /// Cursor position relative to the enclosing message start
    pub fn message_position(&self) -> usize {
        self.position.wrapping_add(self.base_offset)
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The whole underlying sequence, including bytes already read
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Skip padding so the cursor sits on an `alignment` boundary.
    ///
    /// Returns the number of bytes skipped.
    pub fn align(&mut self, alignment: usize) -> Result<usize, AlignmentError> {
        let pad = align_padding(self.position, self.base_offset, alignment);
        if pad == 0 {
            return Ok(0);
        }
        if pad > self.remaining() {
            return Err(AlignmentError::Underrun {
                op: Operation::Align,
                alignment,
                needed: pad,
                have: self.remaining(),
            });
        }
        trace!(
            alignment,
            pad,
            position = self.position,
            base_offset = self.base_offset,
            "skipping read padding"
        );
        self.position += pad;
        Ok(pad)
    }

    /// Return the next `n` bytes without copying
    pub fn read(&mut self, n: usize) -> Result<Bytes, AlignmentError> {
        self.ensure(n)?;
        let out = self.bytes.slice(self.position..self.position + n);
        self.position += n;
        Ok(out)
    }

    /// Fill `dst` from the next `dst.len()` bytes
    pub fn read_into(&mut self, dst: &mut [u8]) -> Result<(), AlignmentError> {
        self.ensure(dst.len())?;
        dst.copy_from_slice(&self.bytes[self.position..self.position + dst.len()]);
        self.position += dst.len();
        Ok(())
    }

    /// Read a fixed-size array, used by the primitive codecs
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], AlignmentError> {
        let mut out = [0u8; N];
        self.read_into(&mut out)?;
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, AlignmentError> {
        let [b] = self.read_array::<1>()?;
        Ok(b)
    }

    fn ensure(&self, n: usize) -> Result<(), AlignmentError> {
        if n > self.remaining() {
            return Err(AlignmentError::Underrun {
                op: Operation::Read,
                alignment: 1,
                needed: n,
                have: self.remaining(),
            });
        }
        Ok(())
    }
}
