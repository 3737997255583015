//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`DataUnavailable`] returned when the transaction file cannot be read.
//! - [`Write`] returned when an append or a migration could not be persisted.
//! - [`InvalidAmount`] and [`InvalidEntry`] returned on bad user input.
//! - [`InvalidHorizon`] returned when a projection horizon is out of range.
//! - [`Unauthorized`] returned when credentials do not match.
//!
//! A single unparseable row is not an error: it is reported as a
//! [`ParseSkip`] next to the loaded entries.
//!
//!  [`DataUnavailable`]: EngineError::DataUnavailable
//!  [`Write`]: EngineError::Write
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidEntry`]: EngineError::InvalidEntry
//!  [`InvalidHorizon`]: EngineError::InvalidHorizon
//!  [`Unauthorized`]: EngineError::Unauthorized
//!  [`ParseSkip`]: super::store::ParseSkip
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Transaction data unavailable: {0}")]
    DataUnavailable(String),
    #[error("Failed to write transaction data: {0}")]
    Write(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid entry: {0}")]
    InvalidEntry(String),
    #[error("Invalid projection horizon: {0} (expected 1-24 months)")]
    InvalidHorizon(i64),
    #[error("Invalid username or password")]
    Unauthorized,
}

impl EngineError {
    pub(crate) fn unavailable(err: impl std::fmt::Display) -> Self {
        Self::DataUnavailable(err.to_string())
    }

    pub(crate) fn write(err: impl std::fmt::Display) -> Self {
        Self::Write(err.to_string())
    }
}
