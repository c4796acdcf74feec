//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// money rules, missing or duplicate entities). Transport concerns belong in
/// the API crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A requested entity does not exist.
    #[error("{entity} not found with id: {id}")]
    NotFound { entity: &'static str, id: String },

    /// An entity with the same identifier is already stored.
    #[error("{entity} already exists with id: #{id}")]
    AlreadyExists { entity: &'static str, id: String },

    /// A money rule was broken (negative amount, overdraft, overflow).
    #[error("{0}")]
    InvalidMoneyOperation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(entity: &'static str, id: impl core::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn already_exists(entity: &'static str, id: impl core::fmt::Display) -> Self {
        Self::AlreadyExists {
            entity,
            id: id.to_string(),
        }
    }

    pub fn user_not_found(id: impl core::fmt::Display) -> Self {
        Self::not_found("User", id)
    }

    pub fn ledger_not_found(id: impl core::fmt::Display) -> Self {
        Self::not_found("Ledger", id)
    }

    pub fn user_already_exists(id: impl core::fmt::Display) -> Self {
        Self::already_exists("User", id)
    }

    pub fn ledger_already_exists(id: impl core::fmt::Display) -> Self {
        Self::already_exists("Ledger", id)
    }

    pub fn invalid_money(msg: impl Into<String>) -> Self {
        Self::InvalidMoneyOperation(msg.into())
    }

    pub fn amount_must_be_positive(amount: i64) -> Self {
        Self::invalid_money(format!("Amount must be a positive number: {amount}"))
    }

    pub fn could_not_subtract_greater(amount: i64, subtrahend: i64) -> Self {
        Self::invalid_money(format!(
            "Amount to subtract must not be greater than amount: {amount} - {subtrahend}"
        ))
    }

    pub fn insufficient_funds(balance: i64, withdraw_amount: i64) -> Self {
        Self::invalid_money(format!(
            "Insufficient funds. Balance: {balance}. Withdraw amount: {withdraw_amount}"
        ))
    }

    pub fn amount_overflow(amount: i64, addend: i64) -> Self {
        Self::invalid_money(format!("Amount overflow: {amount} + {addend}"))
    }
}
