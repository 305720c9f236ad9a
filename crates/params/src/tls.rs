//! Constants for the TLS transform

/// Largest TLS record payload in bytes. Inbound pulls request this much so a
/// whole record can arrive in one step.
pub const MAX_TLS_RECORD_SIZE: usize = 16 * 1024;
