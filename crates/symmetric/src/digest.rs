//! Digest filters
//!
//! Transparent transforms that hash every byte passing through them. The
//! digest so far can be read at any point without disturbing the running
//! hash.

use openssl::hash::{Hasher, MessageDigest};
use streamsec_api::{Input, Output, Result, Sink, Source};
use streamsec_common::SecureCompare;

use crate::error::CipherResultExt;

/// Digest of `data` in one call
pub fn compute(md: MessageDigest, data: &[u8]) -> Result<Vec<u8>> {
    let digest = openssl::hash::hash(md, data).map_engine_err("digest")?;
    Ok(digest.to_vec())
}

/// Constant-time digest comparison
pub fn matches(expected: &[u8], actual: &[u8]) -> bool {
    expected.secure_eq(actual)
}

fn snapshot(hasher: &Hasher) -> Result<Vec<u8>> {
    let mut copy = hasher.clone();
    let digest = copy.finish().map_engine_err("digest finish")?;
    Ok(digest.to_vec())
}

/// Pull-side filter: reads from `S` unchanged, hashing what it hands out.
pub struct DigestSource<S: Source> {
    upstream: S,
    hasher: Hasher,
    total: u64,
}

impl<S: Source> DigestSource<S> {
    pub fn new(upstream: S, md: MessageDigest) -> Result<Self> {
        Ok(Self {
            upstream,
            hasher: Hasher::new(md).map_engine_err("digest init")?,
            total: 0,
        })
    }

    /// Digest of everything read so far
    pub fn digest(&self) -> Result<Vec<u8>> {
        snapshot(&self.hasher)
    }

    pub fn bytes_hashed(&self) -> u64 {
        self.total
    }

    pub fn get_ref(&self) -> &S {
        &self.upstream
    }

    pub fn into_inner(self) -> S {
        self.upstream
    }
}

impl<S: Source> Input for DigestSource<S> {
    fn read_bytes(&mut self, dest: &mut [u8]) -> Result<usize> {
        if dest.is_empty() {
            return Ok(0);
        }
        let view = self.upstream.request_data(dest.len())?;
        let n = view.len().min(dest.len());
        dest[..n].copy_from_slice(&view[..n]);
        self.upstream.advance(n);

        self.hasher.update(&dest[..n]).map_engine_err("digest update")?;
        self.total += n as u64;
        Ok(n)
    }
}

/// Push-side filter: writes to `K` unchanged, hashing what it forwards.
pub struct DigestSink<K: Sink> {
    downstream: K,
    hasher: Hasher,
    total: u64,
}

impl<K: Sink> DigestSink<K> {
    pub fn new(downstream: K, md: MessageDigest) -> Result<Self> {
        Ok(Self {
            downstream,
            hasher: Hasher::new(md).map_engine_err("digest init")?,
            total: 0,
        })
    }

    /// Digest of everything written so far
    pub fn digest(&self) -> Result<Vec<u8>> {
        snapshot(&self.hasher)
    }

    pub fn bytes_hashed(&self) -> u64 {
        self.total
    }

    pub fn get_ref(&self) -> &K {
        &self.downstream
    }

    pub fn into_inner(self) -> K {
        self.downstream
    }
}

impl<K: Sink> Output for DigestSink<K> {
    fn write_bytes(&mut self, src: &[u8]) -> Result<usize> {
        self.downstream.put(src)?;
        self.hasher.update(src).map_engine_err("digest update")?;
        self.total += src.len() as u64;
        Ok(src.len())
    }

    fn flush(&mut self) -> Result<()> {
        self.downstream.flush()
    }
}
