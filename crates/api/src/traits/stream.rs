//! Pull/push endpoints of a pipeline.
//!
//! A [`Source`] hands out views of bytes it already holds and is told how many
//! of them were consumed; a [`Sink`] hands out writable space and is told how
//! many bytes were produced into it. Neither side copies on behalf of the
//! transform sitting between them, which is what lets a transform decrypt
//! straight out of its upstream buffer into its downstream buffer.

use crate::Result;

/// Pull-based upstream of a transform.
pub trait Source {
    /// Returns a view of pending bytes, blocking until at least one byte is
    /// available.
    ///
    /// `size` is the amount the caller intends to consume. The view is never
    /// empty but may be shorter or longer than `size`; callers consume a prefix
    /// of it and report that through [`Source::advance`].
    ///
    /// # Errors
    /// Fails with [`crate::Error::NoMoreData`] once a finite source is
    /// exhausted. Live transports fail with a transport error instead.
    fn request_data(&mut self, size: usize) -> Result<&[u8]>;

    /// Marks `n` bytes of the last view as consumed.
    fn advance(&mut self, n: usize);
}

/// Push-based downstream of a transform.
pub trait Sink {
    /// Returns a writable view of at least `size` bytes.
    fn request_space(&mut self, size: usize) -> Result<&mut [u8]>;

    /// Commits `n` bytes written into the last view.
    fn advance(&mut self, n: usize);

    /// Pushes committed bytes towards the real transport.
    fn flush(&mut self) -> Result<()>;

    /// Copies `data` into the sink.
    fn put(&mut self, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        let space = self.request_space(data.len())?;
        space[..data.len()].copy_from_slice(data);
        self.advance(data.len());
        Ok(())
    }
}

impl<S: Source + ?Sized> Source for &mut S {
    fn request_data(&mut self, size: usize) -> Result<&[u8]> {
        (**self).request_data(size)
    }

    fn advance(&mut self, n: usize) {
        (**self).advance(n)
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn request_data(&mut self, size: usize) -> Result<&[u8]> {
        (**self).request_data(size)
    }

    fn advance(&mut self, n: usize) {
        (**self).advance(n)
    }
}

impl<K: Sink + ?Sized> Sink for &mut K {
    fn request_space(&mut self, size: usize) -> Result<&mut [u8]> {
        (**self).request_space(size)
    }

    fn advance(&mut self, n: usize) {
        (**self).advance(n)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

impl<K: Sink + ?Sized> Sink for Box<K> {
    fn request_space(&mut self, size: usize) -> Result<&mut [u8]> {
        (**self).request_space(size)
    }

    fn advance(&mut self, n: usize) {
        (**self).advance(n)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}
