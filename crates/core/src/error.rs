//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic business/domain failures (validation,
/// stock invariants, conflicts). Transport concerns belong in the API layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An order quantity was not strictly positive.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// A requested record was not found.
    #[error("not found")]
    NotFound,

    /// A decrement would drive stock below zero.
    #[error("insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: i64, requested: i64 },

    /// A value failed boundary validation (e.g. blank title).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Optimistic-concurrency conflict (stale version token).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage backend failure.
    #[error("storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn invalid_quantity(quantity: i64) -> Self {
        Self::InvalidQuantity(quantity)
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn insufficient_stock(available: i64, requested: i64) -> Self {
        Self::InsufficientStock {
            available,
            requested,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
