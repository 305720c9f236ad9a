//! TLS stream transform for the streamsec library
//!
//! [`Tls`] runs a rustls connection over any [`Source`]/[`Sink`] pair. The
//! engine never touches the real transport: it reads records from an inbound
//! memory buffer and writes records to an outbound one, and the transform
//! moves bytes between those buffers and the pipeline. Reads and writes drive
//! the handshake transparently, so the first `read_some` or `write_all` on a
//! fresh session blocks until the handshake is done.
//!
//! [`Source`]: streamsec_api::Source
//! [`Sink`]: streamsec_api::Sink

#![forbid(unsafe_code)]

pub mod context;
pub mod decrypt;
pub mod encrypt;
pub mod error;
pub mod session;
pub mod tls;

pub use context::{Context, Method, ProtocolVersion, Role};
pub use decrypt::TlsDecrypt;
pub use encrypt::TlsEncrypt;
pub use session::{InboundPull, OutboundPump, Session};
pub use tls::Tls;

// Certificate and key hand-off types
pub use rustls_pki_types::{CertificateDer, PrivateKeyDer};

pub use streamsec_api::error::{Error, Result};
