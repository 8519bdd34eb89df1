//! The module contains the error the engine can throw.
//!
//! Settling a ledger never fails: the errors below come from building the
//! engine inputs (amounts, rosters, ledgers) and from configuring a
//! [`Settler`].
//!
//! - [`InvalidAmount`] thrown when an amount is negative or not finite.
//! - [`ExistingKey`] thrown when a roster contains the same id twice.
//! - [`CurrencyMismatch`] thrown when an amount cannot be normalized.
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`CurrencyMismatch`]: EngineError::CurrencyMismatch
//!  [`Settler`]: super::settlement::Settler
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid epsilon: {0}")]
    InvalidEpsilon(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Currency mismatch: {0}")]
    CurrencyMismatch(String),
    #[error("Invalid ledger: {0}")]
    InvalidLedger(#[from] serde_json::Error),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidEpsilon(a), Self::InvalidEpsilon(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::CurrencyMismatch(a), Self::CurrencyMismatch(b)) => a == b,
            (Self::InvalidLedger(a), Self::InvalidLedger(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
