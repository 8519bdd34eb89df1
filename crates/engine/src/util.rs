//! Internal helpers for model validation.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every entry point enforces the same invariants.

use crate::{Amount, EngineError, ResultEngine};

/// Validate an expense amount: finite and non-negative.
pub(crate) fn validate_expense_amount(amount: Amount) -> ResultEngine<Amount> {
    if !amount.is_finite() {
        return Err(EngineError::InvalidAmount(format!(
            "amount must be finite, got {amount}"
        )));
    }
    if amount.value() < 0.0 {
        return Err(EngineError::InvalidAmount(format!(
            "amount must be >= 0, got {amount}"
        )));
    }
    Ok(amount)
}

/// Validate a settlement tolerance: finite and non-negative.
pub(crate) fn validate_epsilon(epsilon: Amount) -> ResultEngine<Amount> {
    if !epsilon.is_finite() || epsilon.value() < 0.0 {
        return Err(EngineError::InvalidEpsilon(format!(
            "epsilon must be a finite value >= 0, got {epsilon}"
        )));
    }
    Ok(epsilon)
}
