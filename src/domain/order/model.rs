use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

// ============================================================================
// Order Domain Model
// ============================================================================
//
// Ownership is one-directional: an Order owns its items by value, and an
// OrderItem carries only the owning order's id as a foreign key. Items never
// hold a navigable reference back to their order.
//
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub customer_name: String,
    /// Set once by the creation pipeline; only a full update may overwrite it.
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    /// Sequence-assigned by storage; 0 until the item has been persisted.
    pub id: i64,
    pub order_id: Uuid,
    pub product_id: String,
    pub quantity: i32,
}

impl OrderItem {
    /// A not-yet-persisted item belonging to `order_id`.
    pub fn new(order_id: Uuid, product_id: impl Into<String>, quantity: i32) -> Self {
        Self {
            id: 0,
            order_id,
            product_id: product_id.into(),
            quantity,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
