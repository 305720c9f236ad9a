//! Security primitives for handling key material
//!
//! Keys handed to a transform are kept in zeroizing storage, and digest
//! comparison goes through constant-time equality.

pub mod compare;
pub mod secret;

pub use compare::SecureCompare;
pub use secret::SecretVec;
