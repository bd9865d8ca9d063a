use uuid::Uuid;

use crate::repository::StorageError;

// ============================================================================
// Order Service Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderServiceError {
    /// The request failed validation or violated a business rule
    /// (missing fields, non-positive quantity, duplicate id).
    /// Recoverable by the caller correcting input; never retried here.
    #[error("{0}")]
    InvalidOrderData(String),

    /// The requested id has no corresponding order. Distinguishes
    /// "absent" from "error".
    #[error("Order with ID {0} was not found.")]
    OrderNotFound(Uuid),

    /// Underlying persistence failure, re-raised unchanged.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl OrderServiceError {
    /// Rejection for a create that targets an id already in storage.
    pub fn duplicate_id(order_id: Uuid) -> Self {
        Self::InvalidOrderData(format!("Order with ID {order_id} already exists."))
    }

    /// Short label used for failure metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidOrderData(_) => "invalid_data",
            Self::OrderNotFound(_) => "not_found",
            Self::Storage(_) => "storage",
        }
    }
}
