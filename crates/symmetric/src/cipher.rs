//! Block cipher stream transform
//!
//! A cipher context only emits whole blocks, and in decrypt mode it holds
//! back the last block until it knows whether more follows (so that padding
//! can be stripped). The caller, meanwhile, may ask for any number of bytes.
//! [`CipherDecrypt`] bridges the two with a two-block lookahead buffer that is
//! used only when the caller's buffer is too small to receive a decrypted run
//! directly. [`CipherEncrypt`] needs no buffer of its own: it asks its sink
//! for enough room for the engine's worst-case output.

use openssl::symm::Mode;
use streamsec_api::{Error, Input, Output, Result, Sink, Source};

use crate::engine::{CipherEngine, CipherParams};

/// Decrypted bytes waiting for a caller whose buffer was too small.
#[derive(Debug, Default)]
struct Lookahead {
    buf: Vec<u8>,
    start: usize,
    end: usize,
}

impl Lookahead {
    fn for_block_size(block_size: usize) -> Self {
        let mut lookahead = Self::default();
        lookahead.reserve(block_size);
        lookahead
    }

    /// Make room for two blocks of engine output, keeping unread bytes.
    fn reserve(&mut self, block_size: usize) {
        if block_size > 1 && self.buf.len() < 2 * block_size {
            self.buf.resize(2 * block_size, 0);
        }
    }

    fn is_empty(&self) -> bool {
        self.start == self.end
    }

    fn drain_into(&mut self, dest: &mut [u8]) -> usize {
        let n = (self.end - self.start).min(dest.len());
        dest[..n].copy_from_slice(&self.buf[self.start..self.start + n]);
        self.start += n;
        if self.start == self.end {
            self.start = 0;
            self.end = 0;
        }
        n
    }

    /// Whole buffer as the output of one engine update. Only valid while
    /// empty.
    fn slot(&mut self) -> &mut [u8] {
        &mut self.buf[..]
    }

    fn filled(&mut self, n: usize) {
        self.start = 0;
        self.end = n;
    }

    /// Space after the unread bytes for a final block of `size` bytes.
    fn tail(&mut self, size: usize) -> &mut [u8] {
        if self.start > 0 {
            self.buf.copy_within(self.start..self.end, 0);
            self.end -= self.start;
            self.start = 0;
        }
        if self.buf.len() < self.end + size {
            self.buf.resize(self.end + size, 0);
        }
        &mut self.buf[self.end..]
    }

    fn commit_tail(&mut self, n: usize) {
        self.end += n;
    }
}

/// Decrypting half: pulls ciphertext from `S`, yields plaintext.
///
/// # End of stream
///
/// When `finalize_on_starvation` is set (the default) and the upstream
/// reports [`Error::NoMoreData`], the context is finalized in place and the
/// trailing plaintext is delivered on the following reads, after which reads
/// fail with `NoMoreData`. This is only correct when the upstream's end of
/// data really is the end of the ciphertext, i.e. when the transport below
/// frames message length. Over a live transport that can stall, clear the flag
/// and call [`CipherDecrypt::finalize_decryption`] once the message is known
/// to be complete.
#[derive(Debug)]
pub struct CipherDecrypt<S: Source> {
    upstream: S,
    engine: Option<CipherEngine>,
    lookahead: Lookahead,
    finalize_on_starvation: bool,
    ended: bool,
}

impl<S: Source> CipherDecrypt<S> {
    pub fn new(upstream: S, params: &CipherParams) -> Result<Self> {
        let engine = CipherEngine::new(params, Mode::Decrypt)?;
        Ok(Self {
            upstream,
            lookahead: Lookahead::for_block_size(engine.block_size()),
            engine: Some(engine),
            finalize_on_starvation: true,
            ended: false,
        })
    }

    /// A decryptor with no context yet; reads fail with
    /// [`Error::Uninitialized`] until [`CipherDecrypt::init`] is called.
    pub fn uninitialized(upstream: S) -> Self {
        Self {
            upstream,
            engine: None,
            lookahead: Lookahead::default(),
            finalize_on_starvation: true,
            ended: false,
        }
    }

    /// Set up a fresh context, discarding any current one. Plaintext already
    /// sitting in the lookahead is still delivered first.
    pub fn init(&mut self, params: &CipherParams) -> Result<()> {
        let engine = CipherEngine::new(params, Mode::Decrypt)?;
        self.lookahead.reserve(engine.block_size());
        self.engine = Some(engine);
        self.ended = false;
        Ok(())
    }

    pub fn with_finalize_on_starvation(mut self, enabled: bool) -> Self {
        self.finalize_on_starvation = enabled;
        self
    }

    pub fn set_finalize_on_starvation(&mut self, enabled: bool) {
        self.finalize_on_starvation = enabled;
    }

    pub fn finalize_on_starvation(&self) -> bool {
        self.finalize_on_starvation
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.is_some()
    }

    /// Flush the held-back block into the lookahead and release the context.
    ///
    /// Calling this without a context is a no-op. After the lookahead is
    /// drained, reads fail with [`Error::Uninitialized`] until re-`init`.
    pub fn finalize_decryption(&mut self) -> Result<()> {
        finalize_into(&mut self.engine, &mut self.lookahead)
    }

    pub fn get_ref(&self) -> &S {
        &self.upstream
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.upstream
    }

    pub fn into_inner(self) -> S {
        self.upstream
    }
}

fn finalize_into(engine: &mut Option<CipherEngine>, lookahead: &mut Lookahead) -> Result<()> {
    let Some(mut engine) = engine.take() else {
        return Ok(());
    };
    let size = engine.block_size().max(1);
    let n = engine.finalize(lookahead.tail(size))?;
    lookahead.commit_tail(n);
    Ok(())
}

impl<S: Source> Input for CipherDecrypt<S> {
    fn read_bytes(&mut self, dest: &mut [u8]) -> Result<usize> {
        if dest.is_empty() {
            return Ok(0);
        }
        if !self.lookahead.is_empty() {
            return Ok(self.lookahead.drain_into(dest));
        }

        let block_size = match &self.engine {
            Some(engine) => engine.block_size(),
            None if self.ended => return Err(Error::no_more_data("cipher decrypt")),
            None => return Err(Error::uninitialized("cipher decrypt")),
        };

        // Below two blocks the engine's output may not fit in `dest`.
        let use_lookahead = block_size > 1 && dest.len() < 2 * block_size;
        let want = if block_size <= 1 {
            dest.len()
        } else if use_lookahead {
            block_size
        } else {
            (dest.len() / block_size - 1) * block_size
        };

        let view = match self.upstream.request_data(want) {
            Ok(view) => view,
            Err(e) if e.is_no_more_data() && self.finalize_on_starvation => {
                tracing::debug!("upstream exhausted, finalizing decryption");
                finalize_into(&mut self.engine, &mut self.lookahead)?;
                self.ended = true;
                return Ok(0);
            }
            Err(e) => return Err(e),
        };
        let input = &view[..view.len().min(want)];

        let Some(engine) = self.engine.as_mut() else {
            return Err(Error::uninitialized("cipher decrypt"));
        };
        let produced = if use_lookahead {
            engine.update(input, self.lookahead.slot())?
        } else {
            engine.update(input, dest)?
        };
        let consumed = input.len();
        self.upstream.advance(consumed);

        if use_lookahead {
            self.lookahead.filled(produced);
            return Ok(0);
        }
        Ok(produced)
    }
}

/// Encrypting half: takes plaintext, pushes ciphertext into `K`.
///
/// Dropping an encryptor finalizes it; a failure at that point cannot be
/// returned and is logged instead. Pass `&mut sink` to keep access to the
/// sink after the encryptor is gone.
#[derive(Debug)]
pub struct CipherEncrypt<K: Sink> {
    downstream: K,
    engine: Option<CipherEngine>,
}

impl<K: Sink> CipherEncrypt<K> {
    pub fn new(downstream: K, params: &CipherParams) -> Result<Self> {
        Ok(Self {
            downstream,
            engine: Some(CipherEngine::new(params, Mode::Encrypt)?),
        })
    }

    /// An encryptor with no context yet; writes fail with
    /// [`Error::Uninitialized`] until [`CipherEncrypt::init`] is called.
    pub fn uninitialized(downstream: K) -> Self {
        Self {
            downstream,
            engine: None,
        }
    }

    /// Set up a fresh context. A context still in use is finalized first so
    /// its ciphertext is complete.
    pub fn init(&mut self, params: &CipherParams) -> Result<()> {
        let engine = CipherEngine::new(params, Mode::Encrypt)?;
        self.finalize_encryption()?;
        self.engine = Some(engine);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.is_some()
    }

    /// Emit the final (padding) block and release the context.
    ///
    /// Calling this without a context is a no-op.
    pub fn finalize_encryption(&mut self) -> Result<()> {
        let Some(mut engine) = self.engine.take() else {
            return Ok(());
        };
        let block_size = engine.block_size();
        if block_size > 1 {
            let space = self.downstream.request_space(block_size)?;
            let n = engine.finalize(&mut space[..block_size])?;
            self.downstream.advance(n);
        } else {
            let mut tail = [0u8; streamsec_params::MAX_BLOCK_LENGTH];
            let n = engine.finalize(&mut tail)?;
            self.downstream.put(&tail[..n])?;
        }
        Ok(())
    }

    pub fn get_ref(&self) -> &K {
        &self.downstream
    }

    pub fn get_mut(&mut self) -> &mut K {
        &mut self.downstream
    }
}

impl<K: Sink> Output for CipherEncrypt<K> {
    fn write_bytes(&mut self, src: &[u8]) -> Result<usize> {
        let Some(engine) = self.engine.as_mut() else {
            return Err(Error::uninitialized("cipher encrypt"));
        };
        if src.is_empty() {
            return Ok(0);
        }
        let room = engine.update_space(src.len());
        let space = self.downstream.request_space(room)?;
        let n = engine.update(src, &mut space[..room])?;
        self.downstream.advance(n);
        Ok(src.len())
    }

    fn flush(&mut self) -> Result<()> {
        self.downstream.flush()
    }
}

impl<K: Sink> Drop for CipherEncrypt<K> {
    fn drop(&mut self) {
        if let Err(e) = self.finalize_encryption() {
            tracing::error!(error = %e, "failed to finalize encryption on drop");
        }
    }
}

/// Decrypting and encrypting halves over one duplex link.
///
/// Reads go to the decryptor, writes to the encryptor; the halves share
/// nothing and can be driven independently.
#[derive(Debug)]
pub struct Cipher<S: Source, K: Sink> {
    decrypt: CipherDecrypt<S>,
    encrypt: CipherEncrypt<K>,
}

impl<S: Source, K: Sink> Cipher<S, K> {
    /// Both directions use the same algorithm, key and IV.
    pub fn new(upstream: S, downstream: K, params: &CipherParams) -> Result<Self> {
        Self::with_params(upstream, downstream, params, params)
    }

    pub fn with_params(
        upstream: S,
        downstream: K,
        decrypt_params: &CipherParams,
        encrypt_params: &CipherParams,
    ) -> Result<Self> {
        Ok(Self {
            decrypt: CipherDecrypt::new(upstream, decrypt_params)?,
            encrypt: CipherEncrypt::new(downstream, encrypt_params)?,
        })
    }

    pub fn decryptor(&self) -> &CipherDecrypt<S> {
        &self.decrypt
    }

    pub fn decryptor_mut(&mut self) -> &mut CipherDecrypt<S> {
        &mut self.decrypt
    }

    pub fn encryptor(&self) -> &CipherEncrypt<K> {
        &self.encrypt
    }

    pub fn encryptor_mut(&mut self) -> &mut CipherEncrypt<K> {
        &mut self.encrypt
    }

    pub fn finalize_decryption(&mut self) -> Result<()> {
        self.decrypt.finalize_decryption()
    }

    pub fn finalize_encryption(&mut self) -> Result<()> {
        self.encrypt.finalize_encryption()
    }
}

impl<S: Source, K: Sink> Input for Cipher<S, K> {
    fn read_bytes(&mut self, dest: &mut [u8]) -> Result<usize> {
        self.decrypt.read_bytes(dest)
    }
}

impl<S: Source, K: Sink> Output for Cipher<S, K> {
    fn write_bytes(&mut self, src: &[u8]) -> Result<usize> {
        self.encrypt.write_bytes(src)
    }

    fn flush(&mut self) -> Result<()> {
        self.encrypt.flush()
    }
}
