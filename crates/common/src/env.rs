//! Environment helpers
//!
//! Lookups for variables the process cannot start without.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    #[error("required env var {0} not set")]
    Missing(String),
    #[error("required env var {0} is empty")]
    Empty(String),
}

/// Read a required variable. Unset and empty values are both errors.
pub fn require_var(name: &str) -> Result<String, EnvError> {
    match std::env::var(name) {
        Ok(v) if v.is_empty() => Err(EnvError::Empty(name.to_string())),
        Ok(v) => Ok(v),
        Err(_) => Err(EnvError::Missing(name.to_string())),
    }
}
