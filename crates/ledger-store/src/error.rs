//! # Store Errors
//!
//! The error surface repository operations expose to callers. Validation
//! failures bubble up from `ledger-core` unchanged; storage failures are
//! wrapped so callers can distinguish "you sent bad data" from "the disk
//! let us down".

use thiserror::Error;

use crate::persistence::PersistenceError;
use ledger_core::ValidationError;

/// Any error a ledger operation can return.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Input failed a domain rule (empty name, negative amount, duplicate
    /// SKU, ...).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The operation conflicts with existing records (e.g. deleting a shop
    /// that has recorded sales).
    #[error("{message}")]
    Conflict { message: String },

    /// The durable layer failed. The in-memory mutation (if any) has already
    /// been applied; see the ledger docs for the recovery contract.
    #[error("Storage failure: {0}")]
    Io(#[from] PersistenceError),
}

impl StoreError {
    /// Creates a NotFound error.
    ///
    /// ## Example
    /// ```rust,ignore
    /// return Err(StoreError::not_found("Shop", shop_id));
    /// ```
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Creates a Conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        StoreError::Conflict {
            message: message.into(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = StoreError::not_found("Product", "p-123");
        assert_eq!(err.to_string(), "Product not found: p-123");
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err: StoreError = ValidationError::required("name").into();
        assert_eq!(err.to_string(), "name is required");
    }
}
