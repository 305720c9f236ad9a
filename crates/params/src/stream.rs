//! Constants for the pipeline glue

/// Initial capacity of adapter buffers in bytes
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// Bytes requested from a blocking reader per refill
pub const DEFAULT_READ_CHUNK: usize = 8 * 1024;
