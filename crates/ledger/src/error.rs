//! Unified error handling for ledger operations.
//!
//! Every mutating ledger operation returns `Result<T, LedgerError>`. Failures
//! are local to the call; nothing here is fatal to the process.

use breadbox_core::ProductId;
use thiserror::Error;

use crate::store::StorageError;

/// Ledger-level error type.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Bad input: negative stock or price, invalid quantity, or an order
    /// status transition the state machine does not permit.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unknown product, order, or user id.
    #[error("not found: {0}")]
    NotFound(String),

    /// The product has no stock available for the requested operation.
    #[error("product {product_id} is out of stock")]
    OutOfStock {
        /// The product that could not be added.
        product_id: ProductId,
    },

    /// Underlying key-value store read/write failure.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type alias for [`LedgerError`].
pub type Result<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::NotFound("product p-1".to_owned());
        assert_eq!(err.to_string(), "not found: product p-1");

        let err = LedgerError::OutOfStock {
            product_id: ProductId::new("p-2"),
        };
        assert_eq!(err.to_string(), "product p-2 is out of stock");
    }

    #[test]
    fn test_storage_error_conversion() {
        let storage = StorageError::Backend("disk full".to_owned());
        let err = LedgerError::from(storage);
        assert!(matches!(err, LedgerError::Storage(_)));
    }
}
