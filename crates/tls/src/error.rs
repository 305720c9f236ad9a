//! Error handling for the TLS transform

pub use streamsec_api::error::{validate, Error, Result};

/// Convert a rustls error to an API Error
///
/// rustls has no numeric error codes, so `code` is always 0; the message
/// carries the engine's description (alert, certificate problem, ...).
pub fn from_rustls_error(context: &'static str, err: rustls::Error) -> Error {
    Error::Engine {
        context,
        code: 0,
        message: err.to_string(),
    }
}

/// Convert an I/O error raised by the engine's record layer
pub fn from_record_io_error(context: &'static str, err: std::io::Error) -> Error {
    Error::Engine {
        context,
        code: 0,
        message: err.to_string(),
    }
}

// Extension trait to make conversions more ergonomic
pub trait TlsResultExt<T> {
    /// Convert a Result with a rustls error to a Result with API Error
    fn map_engine_err(self, context: &'static str) -> Result<T>;
}

impl<T> TlsResultExt<T> for core::result::Result<T, rustls::Error> {
    fn map_engine_err(self, context: &'static str) -> Result<T> {
        self.map_err(|e| from_rustls_error(context, e))
    }
}

impl<T> TlsResultExt<T> for core::result::Result<T, std::io::Error> {
    fn map_engine_err(self, context: &'static str) -> Result<T> {
        self.map_err(|e| from_record_io_error(context, e))
    }
}
