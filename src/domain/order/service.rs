use std::sync::Arc;

use uuid::Uuid;

use crate::api::dto::{CreateOrderRequest, OrderResponse};
use crate::repository::{OrderRepository, StorageError};

use super::errors::OrderServiceError;
use super::mapper::{map_to_order, map_to_order_response};
use super::validation::validate_create_order_request;

// ============================================================================
// Order Service
// ============================================================================
//
// Orchestrates a creation request through its states:
//
//   Received -> Validated -> IdResolved -> DuplicateChecked -> Persisted -> Mapped
//
// The service is stateless between invocations. Its only collaborator is the
// repository, passed in at construction; there are no ambient instances.
//
// ============================================================================

pub struct OrderService {
    repository: Arc<dyn OrderRepository>,
}

impl OrderService {
    pub fn new(repository: Arc<dyn OrderRepository>) -> Self {
        Self { repository }
    }

    /// Validate, resolve the id, reject duplicates, persist, and map back.
    pub async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<OrderResponse, OrderServiceError> {
        validate_create_order_request(&request)?;

        tracing::info!(customer_name = %request.customer_name.trim(), "Creating order");

        // Carried ids are used verbatim; only a missing id is generated.
        let order_id = request.order_id.unwrap_or_else(Uuid::new_v4);

        // Early probe for a friendly rejection. Not atomic with the insert:
        // the storage uniqueness constraint below is what actually holds
        // under concurrent same-id creates.
        if self.repository.exists(order_id).await? {
            tracing::warn!(order_id = %order_id, "Rejected create for existing order id");
            return Err(OrderServiceError::duplicate_id(order_id));
        }

        let order = map_to_order(&request, order_id);

        let created = match self.repository.create(&order).await {
            Ok(created) => created,
            // Conflict from storage is the authoritative duplicate signal.
            Err(StorageError::DuplicateId(id)) => {
                return Err(OrderServiceError::duplicate_id(id));
            }
            Err(err) => {
                tracing::error!(order_id = %order_id, error = %err, "Failed to persist order");
                return Err(err.into());
            }
        };

        let response = map_to_order_response(&created);

        tracing::info!(
            order_id = %response.order_id,
            item_count = response.order_items.len(),
            "Order created"
        );

        Ok(response)
    }

    /// Fetch one order; absence is an error, not a null.
    pub async fn get_order(&self, order_id: Uuid) -> Result<OrderResponse, OrderServiceError> {
        tracing::debug!(order_id = %order_id, "Retrieving order");

        match self.repository.get_by_id(order_id).await? {
            Some(order) => Ok(map_to_order_response(&order)),
            None => {
                tracing::warn!(order_id = %order_id, "Order not found");
                Err(OrderServiceError::OrderNotFound(order_id))
            }
        }
    }

    /// All orders, newest first. Empty storage is an empty list.
    pub async fn list_orders(&self) -> Result<Vec<OrderResponse>, OrderServiceError> {
        tracing::debug!("Retrieving all orders");

        let orders = self.repository.get_all().await?;
        Ok(orders.iter().map(map_to_order_response).collect())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
