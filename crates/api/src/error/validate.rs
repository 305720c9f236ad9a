//! Validation helpers returning the unified error type

use super::types::{Error, Result};

/// Fail with [`Error::InvalidParameter`] unless `condition` holds
pub fn parameter(condition: bool, context: &'static str, details: &'static str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            context,
            message: details.to_string(),
        })
    }
}

/// Fail with [`Error::InvalidLength`] unless `actual == expected`
pub fn length(context: &'static str, actual: usize, expected: usize) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(Error::InvalidLength {
            context,
            expected,
            actual,
        })
    }
}

/// Fail with [`Error::Configuration`] unless `condition` holds
pub fn configuration(condition: bool, context: &'static str, details: &'static str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(Error::Configuration {
            context,
            message: details.to_string(),
        })
    }
}
