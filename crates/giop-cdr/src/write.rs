//! Alignment-aware write buffer
//!
//! Alignment is computed against `len + base_offset`, the position of the
//! next byte within the enclosing message. A body written after a 12-byte
//! GIOP header sets a base offset of 12 so its doubles land on 8-byte
//! boundaries of the whole message, not of the body.

use bytes::Bytes;
use tracing::{debug, trace};

use crate::context::{align_padding, CdrContext};
use crate::error::{AlignmentError, Operation};
use crate::read::AlignedReadBuffer;
use crate::storage::{ByteStore, StoreFull};

/// Write buffer configuration
#[derive(Debug, Clone)]
pub struct WriteBufferConfig {
    /// Bytes reserved up front
    pub initial_capacity: usize,
    /// Hard cap on the buffer length; `None` grows until allocation fails
    pub max_len: Option<usize>,
}

impl Default for WriteBufferConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 256,
            max_len: None,
        }
    }
}

/// Append-only byte buffer that pads to CDR alignment boundaries
#[derive(Debug, Clone)]
pub struct AlignedWriteBuffer {
    store: ByteStore,
    base_offset: usize,
    ctx: CdrContext,
}

impl AlignedWriteBuffer {
    /// Create an empty buffer with the default configuration and context
    pub fn new() -> Self {
        Self::with_config(WriteBufferConfig::default(), CdrContext::default())
    }

    /// Create an empty buffer with a capacity hint
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(
            WriteBufferConfig {
                initial_capacity: capacity,
                ..Default::default()
            },
            CdrContext::default(),
        )
    }

    /// Create an empty buffer that carries `ctx` as its stream metadata
    pub fn with_context(ctx: CdrContext) -> Self {
        Self::with_config(WriteBufferConfig::default(), ctx)
    }

    pub fn with_config(config: WriteBufferConfig, ctx: CdrContext) -> Self {
        Self {
            store: ByteStore::new(config.initial_capacity, config.max_len),
            base_offset: 0,
            ctx,
        }
    }

    /// Set the distance of this buffer's first byte from the message start.
    ///
    /// Must be set before the first `align` call to take effect consistently.
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

    /// Number of bytes written
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.len() == 0
    }

    /// Position of the next byte relative to the enclosing message start
    pub fn message_position(&self) -> usize {
        self.store.len().wrapping_add(self.base_offset)
    }

    pub fn as_slice(&self) -> &[u8] {
        self.store.as_slice()
    }

    /// Append raw bytes without any alignment
    pub fn write(&mut self, data: &[u8]) -> Result<(), AlignmentError> {
        self.store
            .extend(data)
            .map_err(|full| storage_exhausted(Operation::Write, 1, full))
    }

    /// Append a single octet
    pub fn write_u8(&mut self, value: u8) -> Result<(), AlignmentError> {
        self.write(&[value])
    }

    /// Zero-pad so the next byte starts on an `alignment` boundary.
    ///
    /// Returns the number of padding bytes inserted.
    pub fn align(&mut self, alignment: usize) -> Result<usize, AlignmentError> {
        let pad = align_padding(self.store.len(), self.base_offset, alignment);
        if pad == 0 {
            return Ok(0);
        }
        trace!(
            alignment,
            pad,
            len = self.store.len(),
            base_offset = self.base_offset,
            "padding write buffer"
        );
        self.store
            .fill(pad, 0)
            .map_err(|full| storage_exhausted(Operation::Align, alignment, full))?;
        Ok(pad)
    }

    /// Clear the contents; the base offset and context are kept
    pub fn reset(&mut self) {
        self.store.clear();
    }

    /// Independent copy of the current contents
    pub fn snapshot_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(self.store.as_slice())
    }

    /// Hand the written bytes to a new reader.
    ///
    /// The reader starts its own message (base offset 0) and carries this
    /// buffer's context. Use [`to_read_buffer_aligned`](Self::to_read_buffer_aligned)
    /// to keep the writer's base offset.
    pub fn to_read_buffer(&self) -> AlignedReadBuffer {
        debug!(len = self.store.len(), "write buffer handoff");
        AlignedReadBuffer::with_context(self.snapshot_bytes(), self.ctx)
    }

    /// Hand the written bytes to a new reader that keeps this buffer's base offset
    pub fn to_read_buffer_aligned(&self) -> AlignedReadBuffer {
        let mut reader = self.to_read_buffer();
        reader.set_base_offset(self.base_offset);
        reader
    }

    /// Consume the buffer, returning its bytes without copying
    pub fn into_bytes(self) -> Bytes {
        Bytes::from(self.store.into_vec())
    }
}

impl Default for AlignedWriteBuffer {
    fn default() -> Self {
        Self::new()
    }
}

fn storage_exhausted(op: Operation, alignment: usize, full: StoreFull) -> AlignmentError {
    AlignmentError::StorageExhausted {
        op,
        alignment,
        requested: full.requested,
        len: full.len,
    }
}
