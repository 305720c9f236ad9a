//! # streamsec
//!
//! Chainable byte-stream filters over external cryptographic engines: an
//! OpenSSL cipher context and a rustls TLS connection.
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! streamsec = "0.3"
//! ```
//!
//! ## Features
//!
//! - `symmetric` (default): cipher and digest transforms
//! - `tls` (default): TLS transform
//! - `serde`: serde derives on the TLS method types
//! - `full`: All features enabled
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports functionality from several sub-crates:
//!
//! - [`streamsec-api`]: Stream contract and error type
//! - [`streamsec-common`]: Sources, sinks, chaining adapters, secret memory
//! - [`streamsec-params`]: Shared constants
//! - [`streamsec-symmetric`]: Cipher and digest transforms
//! - [`streamsec-tls`]: TLS transform
//!
//! ## Example
//!
//! ```
//! # #[cfg(feature = "symmetric")]
//! # fn main() -> streamsec::api::Result<()> {
//! use streamsec::prelude::*;
//! use streamsec::symmetric::{Algorithm, CipherDecrypt, CipherEncrypt, CipherParams};
//!
//! let params = CipherParams::new(Algorithm::aes_128_cbc(), vec![7u8; 16], Some(&[9u8; 16][..]))?;
//!
//! let mut ciphertext = VecSink::new();
//! let mut enc = CipherEncrypt::new(&mut ciphertext, &params)?;
//! enc.write_all(b"attack at dawn")?;
//! enc.finalize_encryption()?;
//! drop(enc);
//!
//! let mut dec = CipherDecrypt::new(SliceSource::new(ciphertext.as_slice()), &params)?;
//! let mut plaintext = Vec::new();
//! dec.read_to_end(&mut plaintext)?;
//! assert_eq!(plaintext, b"attack at dawn");
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "symmetric"))]
//! # fn main() {}
//! ```
//!
//! [`streamsec-api`]: streamsec_api
//! [`streamsec-common`]: streamsec_common
//! [`streamsec-params`]: streamsec_params
//! [`streamsec-symmetric`]: https://docs.rs/streamsec-symmetric
//! [`streamsec-tls`]: https://docs.rs/streamsec-tls

// Core re-exports (always available)
pub use streamsec_api as api;
pub use streamsec_common as common;
pub use streamsec_params as params;

// Feature-gated re-exports
#[cfg(feature = "symmetric")]
pub use streamsec_symmetric as symmetric;

#[cfg(feature = "tls")]
pub use streamsec_tls as tls;

pub use zeroize;

/// Common imports for streamsec users
pub mod prelude {
    // Re-export error types
    pub use crate::api::{Error, Result};

    // Re-export the stream contract
    pub use crate::api::{Input, Output, Sink, Source};

    // Re-export pipeline glue
    pub use crate::common::{
        BufferedSink,
        BufferedSource,
        IoSink,
        IoSource,
        SliceSource,
        VecSink,
    };

    // Re-export security types
    pub use crate::common::{SecretVec, SecureCompare};

    #[cfg(feature = "symmetric")]
    pub use crate::symmetric::{Cipher, CipherDecrypt, CipherEncrypt, CipherParams};

    #[cfg(feature = "tls")]
    pub use crate::tls::{Context, Method, Tls};
}
