//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`InsufficientFunds`] thrown when a source account cannot cover a debit.
//! - [`KeyNotFound`] thrown when an account or a transaction is not found.
//! - [`InvalidCredentials`] thrown when the sign-in policy rejects the
//!   credentials.
//!
//!  [`InsufficientFunds`]: EngineError::InsufficientFunds
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`InvalidCredentials`]: EngineError::InvalidCredentials
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Incomplete passcode: 6 digits are required")]
    IncompletePasscode,
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error(transparent)]
    Storage(#[from] std::io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Export(#[from] csv::Error),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InsufficientFunds(a), Self::InsufficientFunds(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidCredentials, Self::InvalidCredentials) => true,
            (Self::IncompletePasscode, Self::IncompletePasscode) => true,
            (Self::InvalidState(a), Self::InvalidState(b)) => a == b,
            (Self::Storage(a), Self::Storage(b)) => a.to_string() == b.to_string(),
            (Self::Serialization(a), Self::Serialization(b)) => a.to_string() == b.to_string(),
            (Self::Export(a), Self::Export(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
