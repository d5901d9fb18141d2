//! Core error types for coinfocus-core.
//!
//! The session engine itself never fails: misuse degrades to a no-op.
//! These types cover the collaborators around it (configuration, ledger,
//! prompt input) and the validation of user-supplied session parameters.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Ledger-specific errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// No record with the given id
    #[error("No ledger record with id {0}")]
    NotFound(String),

    /// Record is not a pending income entry
    #[error("Record {0} is not pending")]
    NotPending(String),

    /// Spending more than the confirmed balance
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: u64, available: u64 },

    /// Parent PIN required or wrong
    #[error("Parent PIN rejected")]
    PinRejected,

    /// Failed to read or write the ledger file
    #[error("Failed to access ledger at {path}: {message}")]
    Storage { path: PathBuf, message: String },
}

/// Validation errors.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Errors from answering a pending prompt.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PromptError {
    /// No prompt of the expected kind is pending
    #[error("No {0} prompt is pending")]
    NothingPending(&'static str),

    /// PIN input was not exactly four ASCII digits
    #[error("PIN must be exactly 4 digits")]
    MalformedPin,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let err = LedgerError::InsufficientBalance {
            requested: 3,
            available: 0,
        };
        assert_eq!(err.to_string(), "Insufficient balance: requested 3, available 0");

        let err = ValidationError::invalid("total_minutes", "must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid value for 'total_minutes': must be positive"
        );

        let err = ConfigError::UnknownKey("session.nope".into());
        assert_eq!(err.to_string(), "Unknown configuration key: session.nope");
        assert_eq!(PromptError::MalformedPin.to_string(), "PIN must be exactly 4 digits");
    }
}
