//! Error type definitions for streaming transforms

use thiserror::Error as ThisError;

/// Primary error type for streaming transform operations
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// The transform was used before its engine was set up, or after the
    /// engine was reset by an explicit finalize
    #[error("{context}: engine not initialized")]
    Uninitialized {
        context: &'static str,
    },

    /// The upstream source is exhausted
    #[error("{context}: no more data")]
    NoMoreData {
        context: &'static str,
    },

    /// Bad algorithm/key/parameter combination detected while building an engine
    #[error("{context}: configuration error: {message}")]
    Configuration {
        context: &'static str,
        message: String,
    },

    /// Invalid parameter error
    #[error("{context}: {message}")]
    InvalidParameter {
        context: &'static str,
        message: String,
    },

    /// Invalid length error with context
    #[error("{context}: invalid length (expected {expected}, got {actual})")]
    InvalidLength {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Failure reported by the underlying cryptographic engine. `code` is the
    /// engine's own error code (0 when the engine has none) and is kept for
    /// diagnostics only.
    #[error("{context}: engine error {code:#x}: {message}")]
    Engine {
        context: &'static str,
        code: u64,
        message: String,
    },

    /// Failure of a real transport below the pipeline
    #[error("{context}: transport error: {message}")]
    Transport {
        context: &'static str,
        message: String,
    },

    /// Other error
    #[error("{context}: {message}")]
    Other {
        context: &'static str,
        message: String,
    },
}

/// Result type for streaming transform operations
pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    /// Shorthand for the starvation error raised by finite sources
    pub const fn no_more_data(context: &'static str) -> Self {
        Self::NoMoreData { context }
    }

    /// Shorthand for the error raised by a transform without an engine
    pub const fn uninitialized(context: &'static str) -> Self {
        Self::Uninitialized { context }
    }

    /// True when this error reports upstream starvation
    pub fn is_no_more_data(&self) -> bool {
        matches!(self, Self::NoMoreData { .. })
    }

    /// The wrapped engine error code, if this error came from an engine
    pub fn engine_code(&self) -> Option<u64> {
        match self {
            Self::Engine { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// The context string attached to this error
    pub fn context(&self) -> &'static str {
        match self {
            Self::Uninitialized { context }
            | Self::NoMoreData { context }
            | Self::Configuration { context, .. }
            | Self::InvalidParameter { context, .. }
            | Self::InvalidLength { context, .. }
            | Self::Engine { context, .. }
            | Self::Transport { context, .. }
            | Self::Other { context, .. } => context,
        }
    }

    /// Replace the context of an existing error, keeping everything else
    pub fn with_context(self, context: &'static str) -> Self {
        match self {
            Self::Uninitialized { .. } => Self::Uninitialized { context },
            Self::NoMoreData { .. } => Self::NoMoreData { context },
            Self::Configuration { message, .. } => Self::Configuration { context, message },
            Self::InvalidParameter { message, .. } => Self::InvalidParameter { context, message },
            Self::InvalidLength { expected, actual, .. } => Self::InvalidLength {
                context,
                expected,
                actual,
            },
            Self::Engine { code, message, .. } => Self::Engine { context, code, message },
            Self::Transport { message, .. } => Self::Transport { context, message },
            Self::Other { message, .. } => Self::Other { context, message },
        }
    }

    /// Replace the message of an existing error. Variants without a message
    /// are returned unchanged.
    pub fn with_message(self, message: impl Into<String>) -> Self {
        let message = message.into();
        match self {
            Self::Configuration { context, .. } => Self::Configuration { context, message },
            Self::InvalidParameter { context, .. } => Self::InvalidParameter { context, message },
            Self::Engine { context, code, .. } => Self::Engine { context, code, message },
            Self::Transport { context, .. } => Self::Transport { context, message },
            Self::Other { context, .. } => Self::Other { context, message },
            other => other,
        }
    }
}
