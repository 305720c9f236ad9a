//! Common implementations and shared functionality for streamsec
//!
//! This crate provides the pieces every transform and every pipeline needs
//! but that belong to no single engine: zeroizing key storage, in-memory
//! sources and sinks, bridges to `std::io`, adapters that turn one transform
//! into the source or sink of the next, and the in-memory transport the TLS
//! engine reads from and writes to.

pub mod buffer;
pub mod chain;
pub mod io;
pub mod memory;
pub mod security;

pub use buffer::{SliceSource, VecSink};
pub use chain::{BufferedSink, BufferedSource};
pub use io::{IoSink, IoSource};
pub use memory::MemoryTransport;
pub use security::{SecretVec, SecureCompare};
