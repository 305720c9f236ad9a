//! In-memory pipeline endpoints
//!
//! [`SliceSource`] is a finite source over borrowed bytes and [`VecSink`] an
//! unbounded sink collecting into a vector. Both are the endpoints tests and
//! one-shot helpers hang a transform between.

use streamsec_api::{Error, Result, Sink, Source};

/// Finite source over a byte slice.
///
/// With a chunk limit set, views never exceed that many bytes, which lets a
/// caller exercise a transform against a trickling upstream.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
    max_chunk: Option<usize>,
}

impl<'a> SliceSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            max_chunk: None,
        }
    }

    /// Limit every view to at most `max_chunk` bytes (0 is treated as 1)
    pub fn with_max_chunk(mut self, max_chunk: usize) -> Self {
        self.max_chunk = Some(max_chunk.max(1));
        self
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos == self.data.len()
    }
}

impl Source for SliceSource<'_> {
    fn request_data(&mut self, _size: usize) -> Result<&[u8]> {
        if self.is_exhausted() {
            return Err(Error::no_more_data("slice source"));
        }
        let end = match self.max_chunk {
            Some(max) => (self.pos + max).min(self.data.len()),
            None => self.data.len(),
        };
        Ok(&self.data[self.pos..end])
    }

    fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.data.len());
    }
}

/// Unbounded sink collecting into a `Vec<u8>`.
#[derive(Debug, Default, Clone)]
pub struct VecSink {
    data: Vec<u8>,
    len: usize,
    flushes: usize,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            len: 0,
            flushes: 0,
        }
    }

    /// Committed bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of times [`Sink::flush`] was called
    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Drop committed bytes, keeping the allocation
    pub fn clear(&mut self) {
        self.len = 0;
    }

    pub fn into_inner(mut self) -> Vec<u8> {
        self.data.truncate(self.len);
        self.data
    }
}

impl Sink for VecSink {
    fn request_space(&mut self, size: usize) -> Result<&mut [u8]> {
        let needed = self.len + size;
        if self.data.len() < needed {
            self.data.resize(needed, 0);
        }
        Ok(&mut self.data[self.len..])
    }

    fn advance(&mut self, n: usize) {
        self.len = (self.len + n).min(self.data.len());
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }
}
