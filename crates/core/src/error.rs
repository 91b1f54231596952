//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic business failures (validation,
/// stock accounting, missing records). Store plumbing failures are folded
/// in as `StoreUnavailable` so callers see one error surface.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A value failed validation (e.g. blank name, negative amount).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A reservation or positive adjustment exceeded the available stock.
    ///
    /// Carries the material name and the quantities involved so the UI can
    /// tell the user exactly what is short.
    #[error("insufficient stock for \"{material}\": requested {requested}, available {available}")]
    InsufficientStock {
        material: String,
        available: f64,
        requested: f64,
    },

    /// A referenced Material, Budget, or Line no longer exists.
    #[error("not found")]
    NotFound,

    /// A conditional write lost too many races (optimistic concurrency).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Underlying store I/O failure, not specific to any operation.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn insufficient_stock(material: impl Into<String>, available: f64, requested: f64) -> Self {
        Self::InsufficientStock {
            material: material.into(),
            available,
            requested,
        }
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn store_unavailable(msg: impl Into<String>) -> Self {
        Self::StoreUnavailable(msg.into())
    }
}
