//! Constant values for streamsec
//!
//! Sizes shared by the transforms and the pipeline glue live here so that
//! every crate sizes its buffers from the same numbers.

pub mod stream;
pub mod symmetric;
pub mod tls;

pub use stream::{DEFAULT_BUFFER_SIZE, DEFAULT_READ_CHUNK};
pub use symmetric::MAX_BLOCK_LENGTH;
pub use tls::MAX_TLS_RECORD_SIZE;
