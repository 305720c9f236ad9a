//! Constants for symmetric ciphers

/// Largest cipher block length the engine reports, in bytes
pub const MAX_BLOCK_LENGTH: usize = 32;

/// AES block size in bytes
pub const AES_BLOCK_SIZE: usize = 16;

/// AES-128 key size in bytes
pub const AES128_KEY_SIZE: usize = 16;

/// AES-256 key size in bytes
pub const AES256_KEY_SIZE: usize = 32;

/// ChaCha20 key size in bytes
pub const CHACHA20_KEY_SIZE: usize = 32;

/// ChaCha20 IV size in bytes (32-bit counter followed by a 96-bit nonce)
pub const CHACHA20_IV_SIZE: usize = 16;
