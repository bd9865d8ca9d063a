use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

// ============================================================================
// Wire DTOs
// ============================================================================
//
// Field names on the wire are camelCase. Absent request fields deserialize
// to their empty defaults so the validator, not the JSON decoder, owns the
// rejection message for missing data.
//
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Client-supplied id; generated by the service when absent.
    #[serde(default)]
    pub order_id: Option<Uuid>,

    #[serde(default)]
    pub customer_name: String,

    #[serde(default)]
    pub order_items: Vec<OrderItemDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemDto {
    #[serde(default)]
    pub product_id: String,

    #[serde(default)]
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: Uuid,
    pub customer_name: String,
    pub created_at: DateTime<Utc>,
    pub order_items: Vec<OrderItemResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub product_id: String,
    pub quantity: i32,
}

// ============================================================================
// Unit Tests
// ============================================================================
