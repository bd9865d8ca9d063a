use chrono::Utc;
use uuid::Uuid;

use crate::api::dto::{CreateOrderRequest, OrderItemResponse, OrderResponse};
use super::model::{Order, OrderItem};

// ============================================================================
// Wire <-> Entity Mapping
// ============================================================================
//
// Deterministic apart from the creation timestamp. The order id is resolved
// exactly once, in the service, and passed in here so every item receives
// the same foreign key.
//
// ============================================================================

/// Build the entity to persist from a validated creation request.
///
/// Trims the customer name and every product id; stamps `created_at` with
/// the current time. Item ids are left at 0 for storage to assign.
pub fn map_to_order(request: &CreateOrderRequest, order_id: Uuid) -> Order {
    Order {
        id: order_id,
        customer_name: request.customer_name.trim().to_string(),
        created_at: Utc::now(),
        items: request
            .order_items
            .iter()
            .map(|item| OrderItem::new(order_id, item.product_id.trim(), item.quantity))
            .collect(),
    }
}

/// Project a persisted order onto the response shape.
///
/// Item ids and the foreign key stay internal; the wire sees only
/// `product_id` and `quantity` per item.
pub fn map_to_order_response(order: &Order) -> OrderResponse {
    OrderResponse {
        order_id: order.id,
        customer_name: order.customer_name.clone(),
        created_at: order.created_at,
        order_items: order
            .items
            .iter()
            .map(|item| OrderItemResponse {
                product_id: item.product_id.clone(),
                quantity: item.quantity,
            })
            .collect(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::OrderItemDto;

    #[test]
    fn test_map_to_order_trims_fields() {
        let request = CreateOrderRequest {
            order_id: None,
            customer_name: "  John Doe  ".to_string(),
            order_items: vec![OrderItemDto {
                product_id: " PROD001 ".to_string(),
                quantity: 2,
            }],
        };

        let order_id = Uuid::new_v4();
        let order = map_to_order(&request, order_id);

        assert_eq!(order.customer_name, "John Doe");
        assert_eq!(order.items[0].product_id, "PROD001");
    }

    #[test]
    fn test_every_item_gets_the_order_id() {
        let request = CreateOrderRequest {
            order_id: None,
            customer_name: "Jane Smith".to_string(),
            order_items: vec![
                OrderItemDto {
                    product_id: "PROD001".to_string(),
                    quantity: 2,
                },
                OrderItemDto {
                    product_id: "PROD002".to_string(),
                    quantity: 1,
                },
            ],
        };

        let order_id = Uuid::new_v4();
        let order = map_to_order(&request, order_id);

        assert_eq!(order.id, order_id);
        assert!(order.items.iter().all(|item| item.order_id == order_id));
        assert!(order.items.iter().all(|item| item.id == 0));
    }

    #[test]
    fn test_response_hides_item_identity() {
        let order_id = Uuid::new_v4();
        let order = Order {
            id: order_id,
            customer_name: "John Doe".to_string(),
            created_at: Utc::now(),
            items: vec![OrderItem {
                id: 42,
                order_id,
                product_id: "PROD001".to_string(),
                quantity: 3,
            }],
        };

        let response = map_to_order_response(&order);

        assert_eq!(response.order_id, order_id);
        assert_eq!(response.customer_name, "John Doe");
        assert_eq!(response.created_at, order.created_at);
        assert_eq!(response.order_items.len(), 1);
        assert_eq!(response.order_items[0].product_id, "PROD001");
        assert_eq!(response.order_items[0].quantity, 3);

        // The projection must not leak item ids: the serialized form only
        // carries productId and quantity.
        let json = serde_json::to_value(&response.order_items[0]).unwrap();
        assert_eq!(
            json.as_object().unwrap().keys().len(),
            2,
            "item projection grew an unexpected field"
        );
    }
}
