//! Constant-time comparison

use subtle::ConstantTimeEq;

/// Trait for byte strings that can be compared without leaking timing
pub trait SecureCompare {
    /// Compare two values in constant time
    fn secure_eq(&self, other: &Self) -> bool;

    /// Compare two values and return a constant-time choice
    fn secure_cmp(&self, other: &Self) -> subtle::Choice;
}

impl SecureCompare for [u8] {
    fn secure_eq(&self, other: &Self) -> bool {
        bool::from(self.secure_cmp(other))
    }

    // Lengths are public; only the contents are compared in constant time.
    fn secure_cmp(&self, other: &Self) -> subtle::Choice {
        self.ct_eq(other)
    }
}

impl<const N: usize> SecureCompare for [u8; N] {
    fn secure_eq(&self, other: &Self) -> bool {
        bool::from(self.secure_cmp(other))
    }

    fn secure_cmp(&self, other: &Self) -> subtle::Choice {
        self[..].ct_eq(&other[..])
    }
}
