//! In-memory transport buffer
//!
//! A TLS engine reads records from and writes records to a `std::io` stream.
//! [`MemoryTransport`] is that stream: a growable FIFO that reports
//! `WouldBlock` when read empty, so the engine can say "need more input"
//! instead of blocking.

use std::collections::VecDeque;
use std::io::{self, Read, Write};

use streamsec_api::{Result, Sink, Source};

/// Growable FIFO byte buffer implementing `Read` and `Write`.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    buf: VecDeque<u8>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Append bytes to the back of the buffer
    pub fn extend_from_slice(&mut self, data: &[u8]) {
        self.buf.extend(data);
    }

    /// Move everything buffered into `sink`, returning the byte count.
    pub fn drain_to<K: Sink + ?Sized>(&mut self, sink: &mut K) -> Result<usize> {
        let total = self.buf.len();
        if total == 0 {
            return Ok(0);
        }
        let (front, back) = self.buf.as_slices();
        let space = sink.request_space(total)?;
        space[..front.len()].copy_from_slice(front);
        space[front.len()..total].copy_from_slice(back);
        sink.advance(total);
        self.buf.clear();
        Ok(total)
    }

    /// Pull one view from `source` (up to `size` bytes) into the buffer,
    /// returning the byte count. Blocks as the source does and propagates
    /// its errors, including end of stream.
    pub fn fill_from<S: Source + ?Sized>(&mut self, source: &mut S, size: usize) -> Result<usize> {
        let view = source.request_data(size)?;
        let n = view.len().min(size.max(1));
        self.buf.extend(&view[..n]);
        source.advance(n);
        Ok(n)
    }
}

impl Read for MemoryTransport {
    fn read(&mut self, dest: &mut [u8]) -> io::Result<usize> {
        if dest.is_empty() {
            return Ok(0);
        }
        if self.buf.is_empty() {
            return Err(io::ErrorKind::WouldBlock.into());
        }
        let n = self.buf.len().min(dest.len());
        for (d, s) in dest.iter_mut().zip(self.buf.drain(..n)) {
            *d = s;
        }
        Ok(n)
    }
}

impl Write for MemoryTransport {
    fn write(&mut self, src: &[u8]) -> io::Result<usize> {
        self.buf.extend(src);
        Ok(src.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
