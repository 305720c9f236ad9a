//! Symmetric stream transforms for the streamsec library
//!
//! This crate adapts an OpenSSL cipher context into a pair of pipeline
//! filters: [`CipherDecrypt`] pulls ciphertext from a [`Source`] and yields
//! plaintext through [`Input`], [`CipherEncrypt`] takes plaintext through
//! [`Output`] and pushes ciphertext into a [`Sink`]. Callers pick any chunk
//! size; block alignment and padding are handled inside the transform.
//!
//! Digest filters ([`DigestSource`], [`DigestSink`]) hash bytes as they pass
//! through a pipeline without altering them.
//!
//! [`Source`]: streamsec_api::Source
//! [`Sink`]: streamsec_api::Sink
//! [`Input`]: streamsec_api::Input
//! [`Output`]: streamsec_api::Output

#![forbid(unsafe_code)]

pub mod cipher;
pub mod digest;
pub mod engine;
pub mod error;

// Re-export main types for convenience
pub use cipher::{Cipher, CipherDecrypt, CipherEncrypt};
pub use digest::{DigestSink, DigestSource};
pub use engine::{CipherEngine, CipherParams};

// Algorithms are chosen by the caller and passed through untouched
pub use openssl::hash::MessageDigest;
pub use openssl::symm::{Cipher as Algorithm, Mode};

// Re-export the API error system instead of custom error types
pub use streamsec_api::error::{Error, Result};
