//! Caller-facing side of a transform.
//!
//! Implementors provide a single step (`read_bytes` / `write_bytes`) that may
//! return 0 to mean "internal state advanced, call again". The provided
//! methods wrap that step in the retry loop so callers never see the sentinel.

use crate::{Error, Result};

/// Chunk used by [`Input::read_to_end`]
const READ_TO_END_CHUNK: usize = 8 * 1024;

/// Readable end of a transform.
pub trait Input {
    /// Performs one step of the transform into `dest`.
    ///
    /// Returns the number of bytes produced. `Ok(0)` with a non-empty `dest`
    /// means the transform advanced its internal state (refilled a lookahead
    /// buffer, stepped a handshake, pulled transport bytes) and must be called
    /// again.
    fn read_bytes(&mut self, dest: &mut [u8]) -> Result<usize>;

    /// Reads at least one byte, retrying until the transform produces output.
    fn read_some(&mut self, dest: &mut [u8]) -> Result<usize> {
        if dest.is_empty() {
            return Ok(0);
        }
        loop {
            let n = self.read_bytes(dest)?;
            if n > 0 {
                return Ok(n);
            }
        }
    }

    /// Fills `dest` completely.
    fn read_exact(&mut self, mut dest: &mut [u8]) -> Result<()> {
        while !dest.is_empty() {
            let n = self.read_some(dest)?;
            dest = &mut dest[n..];
        }
        Ok(())
    }

    /// Reads until the transform reports [`Error::NoMoreData`], appending to
    /// `out`. Returns the number of bytes appended.
    fn read_to_end(&mut self, out: &mut Vec<u8>) -> Result<usize> {
        let start = out.len();
        let mut chunk = [0u8; READ_TO_END_CHUNK];
        loop {
            match self.read_some(&mut chunk) {
                Ok(n) => out.extend_from_slice(&chunk[..n]),
                Err(Error::NoMoreData { .. }) => return Ok(out.len() - start),
                Err(e) => return Err(e),
            }
        }
    }
}

/// Writable end of a transform.
pub trait Output {
    /// Performs one step of the transform over `src`.
    ///
    /// Returns the number of bytes of `src` consumed. `Ok(0)` with a non-empty
    /// `src` means the transform advanced its internal state and must be
    /// called again.
    fn write_bytes(&mut self, src: &[u8]) -> Result<usize>;

    /// Flushes the downstream sink.
    fn flush(&mut self) -> Result<()>;

    /// Writes all of `src`, retrying until every byte is consumed.
    fn write_all(&mut self, mut src: &[u8]) -> Result<()> {
        while !src.is_empty() {
            let n = self.write_bytes(src)?;
            src = &src[n..];
        }
        Ok(())
    }
}

impl<I: Input + ?Sized> Input for &mut I {
    fn read_bytes(&mut self, dest: &mut [u8]) -> Result<usize> {
        (**self).read_bytes(dest)
    }
}

impl<O: Output + ?Sized> Output for &mut O {
    fn write_bytes(&mut self, src: &[u8]) -> Result<usize> {
        (**self).write_bytes(src)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}
