//! Contract error types for warehouse service
//!
//! These errors are transport-agnostic and used for inter-module communication.

use uuid::Uuid;

/// Warehouse service domain errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WarehouseError {
    /// Entity id absent, or zero rows affected by update/delete
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Resource type (branch, category, product, ...)
        resource: String,
        /// Resource identifier
        id: String,
    },

    /// Mutation attempted on a finished shipment
    #[error("coming table {coming_table_id} is already finished")]
    AlreadyFinalized { coming_table_id: Uuid },

    /// No catalog product matches the scanned barcode
    #[error("unknown barcode for this shipment: {barcode}")]
    UnknownBarcode { barcode: String },

    /// Malformed input
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Underlying store failure, labelled with the failing operation
    #[error("store error while trying to {operation}")]
    Store { operation: String },
}

impl WarehouseError {
    pub fn not_found(resource: &str, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
