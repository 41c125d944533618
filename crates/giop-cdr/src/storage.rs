//! Owned byte storage backing the write buffer
//!
//! Growth is fallible: every append reserves first, so allocation failure or
//! the configured size limit surfaces as [`StoreFull`] instead of aborting.

use tracing::trace;

/// Storage could not grow by `requested` bytes from `len`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StoreFull {
    pub requested: usize,
    pub len: usize,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ByteStore {
    buf: Vec<u8>,
    limit: Option<usize>,
}

impl ByteStore {
    /// Capacity is a hint; a failed initial reservation leaves the store empty
    pub fn new(capacity: usize, limit: Option<usize>) -> Self {
        let hint = limit.map_or(capacity, |l| capacity.min(l));
        let mut buf = Vec::new();
        if let Err(e) = buf.try_reserve(hint) {
            trace!(hint, error = %e, "initial reservation failed, growing on demand");
        }
        Self { buf, limit }
    }

    fn reserve(&mut self, additional: usize) -> Result<(), StoreFull> {
        let full = StoreFull {
            requested: additional,
            len: self.buf.len(),
        };
        let new_len = self.buf.len().checked_add(additional).ok_or(full)?;
        if let Some(limit) = self.limit {
            if new_len > limit {
                return Err(full);
            }
        }
        self.buf.try_reserve(additional).map_err(|_| full)
    }

    pub fn extend(&mut self, data: &[u8]) -> Result<(), StoreFull> {
        self.reserve(data.len())?;
        self.buf.extend_from_slice(data);
        Ok(())
    }

    /// Append `count` copies of `byte`
    pub fn fill(&mut self, count: usize, byte: u8) -> Result<(), StoreFull> {
        self.reserve(count)?;
        self.buf.resize(self.buf.len() + count, byte);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}
