//! Shared fixtures for the streamsec integration tests and benchmarks
pub mod pki;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use streamsec_api::{Input, Output, Result};

pub use pipe::{pipe, PipeCloser, PipeReader, PipeWriter};
pub use pki::{Pki, TEST_DOMAIN};

/// Deterministic pseudo-random bytes
pub fn test_bytes(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut data = vec![0u8; len];
    rng.fill(&mut data[..]);
    data
}

/// Write `data` through `output` in pieces of random size in `1..=max_chunk`.
pub fn write_chunked<O: Output + ?Sized>(output: &mut O, data: &[u8], max_chunk: usize, seed: u64) -> Result<()> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut rest = data;
    while !rest.is_empty() {
        let n = rng.gen_range(1..=max_chunk.max(1)).min(rest.len());
        output.write_all(&rest[..n])?;
        rest = &rest[n..];
    }
    Ok(())
}

/// Read until end of stream with buffers of random size in `1..=max_chunk`.
pub fn read_chunked<I: Input + ?Sized>(input: &mut I, max_chunk: usize, seed: u64) -> Result<Vec<u8>> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let mut buf = vec![0u8; max_chunk.max(1)];
    let mut out = Vec::new();
    loop {
        let want = rng.gen_range(1..=buf.len());
        match input.read_some(&mut buf[..want]) {
            Ok(n) => out.extend_from_slice(&buf[..n]),
            Err(e) if e.is_no_more_data() => return Ok(out),
            Err(e) => return Err(e),
        }
    }
}
