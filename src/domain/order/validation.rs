use crate::api::dto::CreateOrderRequest;
use super::errors::OrderServiceError;

// ============================================================================
// Creation Request Validation
// ============================================================================
//
// Pure function of the input; fails on the FIRST violation found. Checks run
// in a fixed order so callers always see the same message for the same
// request:
//
//   1. customer name present
//   2. at least one item
//   3. per item, in sequence: product id present, quantity positive
//
// ============================================================================

pub fn validate_create_order_request(
    request: &CreateOrderRequest,
) -> Result<(), OrderServiceError> {
    if request.customer_name.trim().is_empty() {
        return Err(OrderServiceError::InvalidOrderData(
            "Customer name is required.".to_string(),
        ));
    }

    if request.order_items.is_empty() {
        return Err(OrderServiceError::InvalidOrderData(
            "At least one order item is required.".to_string(),
        ));
    }

    for item in &request.order_items {
        if item.product_id.trim().is_empty() {
            return Err(OrderServiceError::InvalidOrderData(
                "Product ID is required for all items.".to_string(),
            ));
        }

        if item.quantity <= 0 {
            return Err(OrderServiceError::InvalidOrderData(
                "Quantity must be greater than zero for all items.".to_string(),
            ));
        }
    }

    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::OrderItemDto;

    fn valid_request() -> CreateOrderRequest {
        CreateOrderRequest {
            order_id: None,
            customer_name: "John Doe".to_string(),
            order_items: vec![OrderItemDto {
                product_id: "PROD001".to_string(),
                quantity: 1,
            }],
        }
    }

    fn message(result: Result<(), OrderServiceError>) -> String {
        match result {
            Err(OrderServiceError::InvalidOrderData(msg)) => msg,
            other => panic!("expected InvalidOrderData, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(validate_create_order_request(&valid_request()).is_ok());
    }

    #[test]
    fn test_empty_customer_name_rejected() {
        let mut request = valid_request();
        request.customer_name = String::new();

        assert_eq!(
            message(validate_create_order_request(&request)),
            "Customer name is required."
        );
    }

    #[test]
    fn test_whitespace_customer_name_rejected() {
        let mut request = valid_request();
        request.customer_name = "   ".to_string();

        assert_eq!(
            message(validate_create_order_request(&request)),
            "Customer name is required."
        );
    }

    #[test]
    fn test_empty_items_rejected() {
        let mut request = valid_request();
        request.order_items.clear();

        assert_eq!(
            message(validate_create_order_request(&request)),
            "At least one order item is required."
        );
    }

    #[test]
    fn test_blank_product_id_rejected() {
        let mut request = valid_request();
        request.order_items[0].product_id = "  ".to_string();

        assert_eq!(
            message(validate_create_order_request(&request)),
            "Product ID is required for all items."
        );
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut request = valid_request();
        request.order_items[0].quantity = 0;

        assert_eq!(
            message(validate_create_order_request(&request)),
            "Quantity must be greater than zero for all items."
        );
    }

    #[test]
    fn test_negative_quantity_rejected() {
        let mut request = valid_request();
        request.order_items[0].quantity = -1;

        assert_eq!(
            message(validate_create_order_request(&request)),
            "Quantity must be greater than zero for all items."
        );
    }

    #[test]
    fn test_quantity_of_one_accepted() {
        let mut request = valid_request();
        request.order_items[0].quantity = 1;

        assert!(validate_create_order_request(&request).is_ok());
    }

    #[test]
    fn test_name_checked_before_items() {
        // Both violations present; the name violation wins.
        let request = CreateOrderRequest {
            order_id: None,
            customer_name: String::new(),
            order_items: vec![],
        };

        assert_eq!(
            message(validate_create_order_request(&request)),
            "Customer name is required."
        );
    }

    #[test]
    fn test_later_item_violation_still_caught() {
        let mut request = valid_request();
        request.order_items.push(OrderItemDto {
            product_id: "PROD002".to_string(),
            quantity: 0,
        });

        assert_eq!(
            message(validate_create_order_request(&request)),
            "Quantity must be greater than zero for all items."
        );
    }
}
