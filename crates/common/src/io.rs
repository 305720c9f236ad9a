//! Bridges between `std::io` and the stream contract
//!
//! [`IoSource`] wraps any blocking reader as a [`Source`]; [`IoSink`] wraps any
//! writer as a [`Sink`]. A reader returning `Ok(0)` is end of stream and
//! surfaces as [`Error::NoMoreData`](streamsec_api::Error::NoMoreData).

use std::io::{ErrorKind, Read, Write};

use streamsec_api::{Error, Result, ResultExt, Sink, Source};
use streamsec_params::{DEFAULT_BUFFER_SIZE, DEFAULT_READ_CHUNK};

/// Source reading from a blocking `std::io::Read`
#[derive(Debug)]
pub struct IoSource<R: Read> {
    inner: R,
    buf: Vec<u8>,
    start: usize,
    end: usize,
    chunk: usize,
}

impl<R: Read> IoSource<R> {
    pub fn new(inner: R) -> Self {
        Self::with_chunk(inner, DEFAULT_READ_CHUNK)
    }

    /// Read at most `chunk` bytes per refill (0 is treated as 1)
    pub fn with_chunk(inner: R, chunk: usize) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            start: 0,
            end: 0,
            chunk: chunk.max(1),
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    fn refill(&mut self) -> Result<()> {
        if self.buf.len() < self.chunk {
            self.buf.resize(self.chunk, 0);
        }
        loop {
            match self.inner.read(&mut self.buf[..self.chunk]) {
                Ok(0) => return Err(Error::no_more_data("io source")),
                Ok(n) => {
                    self.start = 0;
                    self.end = n;
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e).with_context("io source"),
            }
        }
    }
}

impl<R: Read> Source for IoSource<R> {
    fn request_data(&mut self, _size: usize) -> Result<&[u8]> {
        if self.start == self.end {
            self.refill()?;
        }
        Ok(&self.buf[self.start..self.end])
    }

    fn advance(&mut self, n: usize) {
        self.start = (self.start + n).min(self.end);
    }
}

/// Sink writing to a `std::io::Write`
///
/// Committed bytes are written out once `DEFAULT_BUFFER_SIZE` of them have
/// accumulated, and on every [`Sink::flush`], which also flushes the writer.
/// Dropping the sink flushes on a best-effort basis.
#[derive(Debug)]
pub struct IoSink<W: Write> {
    inner: W,
    buf: Vec<u8>,
    len: usize,
    error: Option<Error>,
}

impl<W: Write> IoSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            buf: Vec::with_capacity(DEFAULT_BUFFER_SIZE),
            len: 0,
            error: None,
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Bytes committed but not yet written out
    pub fn pending(&self) -> usize {
        self.len
    }

    fn write_out(&mut self) -> Result<()> {
        if self.len > 0 {
            self.inner
                .write_all(&self.buf[..self.len])
                .with_context("io sink")?;
            self.len = 0;
        }
        Ok(())
    }
}

impl<W: Write> Sink for IoSink<W> {
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

    // A failed write-out is reported by the next request_space or flush.
    fn advance(&mut self, n: usize) {
        self.len = (self.len + n).min(self.buf.len());
        if self.len >= DEFAULT_BUFFER_SIZE && self.error.is_none() {
            if let Err(e) = self.write_out() {
                self.error = Some(e);
            }
        }
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.write_out()?;
        self.inner.flush().with_context("io sink")
    }
}

impl<W: Write> Drop for IoSink<W> {
    fn drop(&mut self) {
        if self.len > 0 {
            if let Err(e) = Sink::flush(self) {
                tracing::warn!(error = %e, "io sink dropped with unflushed bytes");
            }
        }
    }
}
