//! Core error types for the carteira engine.
//!
//! This module defines storage-agnostic error types. Storage-specific
//! errors are converted into [`StoreError`] by the storage layer.

use rust_decimal::Decimal;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the holdings ledger.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Validation errors raised synchronously, before any mutation.
///
/// Every variant is fully recoverable by the caller: when one of these
/// is returned, no asset state has changed.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cannot sell {requested} units of {ticker}: only {held} held")]
    InsufficientQuantity {
        ticker: String,
        requested: Decimal,
        held: Decimal,
    },

    #[error("Split ratio must be positive, got {0}")]
    InvalidRatio(Decimal),

    #[error(
        "Applying ratio {ratio} to {ticker} leaves a non-tradable fraction of {projected} units; \
         set liquidate_remaining to close the position"
    )]
    FractionalResidue {
        ticker: String,
        ratio: Decimal,
        projected: Decimal,
    },
}

/// Storage-agnostic error type for repository operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The requested asset exists in neither partition.
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// An asset with this id already exists.
    #[error("Asset already exists: {0}")]
    Duplicate(String),

    /// The write carried a version stamp that is not newer than the
    /// stored document. Another operation won the race.
    #[error("Stale write for asset {asset_id}: attempted version {attempted}, store has {current}")]
    StaleVersion {
        asset_id: String,
        attempted: u64,
        current: u64,
    },

    /// The backing store rejected or lost the write.
    #[error("Store write failed: {0}")]
    WriteFailed(String),

    /// Internal/unexpected store error.
    #[error("Internal store error: {0}")]
    Internal(String),
}

// === From implementations for common error types ===

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
