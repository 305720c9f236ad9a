//! Error handling for symmetric transforms
//!
//! OpenSSL reports failures as an [`ErrorStack`]. These helpers fold a stack
//! into the API error type, keeping the code of the innermost entry.

// Re-export the primary API error system
pub use streamsec_api::error::{Error, Result};

use openssl::error::ErrorStack;

// Helper functions to convert errors (instead of From impls which violate orphan rules)

/// Convert an OpenSSL error stack to an API Error
pub fn from_openssl_error(context: &'static str, err: ErrorStack) -> Error {
    let code = err
        .errors()
        .last()
        .map(|e| e.code() as u64)
        .unwrap_or(0);
    let message = if err.errors().is_empty() {
        "unspecified engine failure".to_string()
    } else {
        err.to_string()
    };
    Error::Engine {
        context,
        code,
        message,
    }
}

// Extension trait to make conversions more ergonomic
pub trait CipherResultExt<T> {
    /// Convert a Result with an OpenSSL error stack to a Result with API Error
    fn map_engine_err(self, context: &'static str) -> Result<T>;
}

impl<T> CipherResultExt<T> for core::result::Result<T, ErrorStack> {
    fn map_engine_err(self, context: &'static str) -> Result<T> {
        self.map_err(|e| from_openssl_error(context, e))
    }
}
