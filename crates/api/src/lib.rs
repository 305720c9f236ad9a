//! Public API traits and types for the streamsec library
//!
//! This crate provides the contract every streamsec transform is written
//! against: the pull-based [`Source`] and push-based [`Sink`] that connect a
//! transform to its neighbours in a pipeline, the caller-facing [`Input`] and
//! [`Output`] traits with their internal retry loops, and the shared
//! [`Error`] type.

pub mod error;
pub mod traits;

// Re-export commonly used items at the crate level for convenience
pub use error::{Error, Result, ResultExt};

// Re-export all traits from the traits module
pub use traits::{Input, Output, Sink, Source};

// Re-export trait modules for direct access
pub use traits::{stream, transform};
