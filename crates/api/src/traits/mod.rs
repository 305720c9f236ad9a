//! Trait definitions for the stream contract

pub mod stream;
pub mod transform;

pub use stream::{Sink, Source};
pub use transform::{Input, Output};
