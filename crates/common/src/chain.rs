//! Chaining adapters
//!
//! A transform reads from a [`Source`] and writes to a [`Sink`], but exposes
//! [`Input`] / [`Output`] to its caller. These adapters close the loop so that
//! one transform can be the upstream or downstream of another, e.g. a TLS
//! session carried over a ciphered link.

use streamsec_api::{Input, Output, Result, Sink, Source};
use streamsec_params::DEFAULT_BUFFER_SIZE;

/// Presents an [`Input`] as a [`Source`].
///
/// Each refill performs one retrying read of up to `max(chunk, size)` bytes.
/// End of stream of the wrapped input propagates unchanged.
#[derive(Debug)]
pub struct BufferedSource<I: Input> {
    inner: I,
    buf: Vec<u8>,
    start: usize,
    end: usize,
    chunk: usize,
}

impl<I: Input> BufferedSource<I> {
    pub fn new(inner: I) -> Self {
        Self::with_chunk(inner, DEFAULT_BUFFER_SIZE)
    }

    pub fn with_chunk(inner: I, chunk: usize) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            start: 0,
            end: 0,
            chunk: chunk.max(1),
        }
    }

    pub fn get_ref(&self) -> &I {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut I {
        &mut self.inner
    }

    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<I: Input> Source for BufferedSource<I> {
    fn request_data(&mut self, size: usize) -> Result<&[u8]> {
        if self.start == self.end {
            let want = self.chunk.max(size);
            if self.buf.len() < want {
                self.buf.resize(want, 0);
            }
            let n = self.inner.read_some(&mut self.buf[..want])?;
            self.start = 0;
            self.end = n;
        }
        Ok(&self.buf[self.start..self.end])
    }

    fn advance(&mut self, n: usize) {
        self.start = (self.start + n).min(self.end);
    }
}

/// Presents an [`Output`] as a [`Sink`].
///
/// Committed bytes are handed to the wrapped output once `chunk` bytes have
/// accumulated, and on every [`Sink::flush`], which also flushes the output.
#[derive(Debug)]
pub struct BufferedSink<O: Output> {
    inner: O,
    buf: Vec<u8>,
    len: usize,
    chunk: usize,
    error: Option<streamsec_api::Error>,
}

impl<O: Output> BufferedSink<O> {
    pub fn new(inner: O) -> Self {
        Self::with_chunk(inner, DEFAULT_BUFFER_SIZE)
    }

    pub fn with_chunk(inner: O, chunk: usize) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            len: 0,
            chunk: chunk.max(1),
            error: None,
        }
    }

    pub fn get_ref(&self) -> &O {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut O {
        &mut self.inner
    }

    fn write_through(&mut self) -> Result<()> {
        if self.len > 0 {
            self.inner.write_all(&self.buf[..self.len])?;
            self.len = 0;
        }
        Ok(())
    }
}

impl<O: Output> Sink for BufferedSink<O> {
    fn request_space(&mut self, size: usize) -> Result<&mut [u8]> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        let needed = self.len + size;
        if self.buf.len() < needed {
            self.buf.resize(needed, 0);
        }
        Ok(&mut self.buf[self.len..])
    }

    // `advance` cannot fail; a failed write-through is reported by the next
    // request_space or flush.
    fn advance(&mut self, n: usize) {
        self.len = (self.len + n).min(self.buf.len());
        if self.len >= self.chunk && self.error.is_none() {
            if let Err(e) = self.write_through() {
                self.error = Some(e);
            }
        }
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.write_through()?;
        self.inner.flush()
    }
}
