use actix_web::{web, HttpResponse, Responder};
use prometheus::{Encoder, TextEncoder};
use uuid::Uuid;

use crate::domain::order::{OrderService, OrderServiceError};
use crate::metrics::Metrics;

use super::dto::CreateOrderRequest;
use super::envelope::ApiResponse;

// ============================================================================
// HTTP Handlers - Boundary Layer
// ============================================================================
//
// The only place where typed errors become status codes:
//
//   InvalidOrderData -> 400, OrderNotFound -> 404, Storage -> 500
//   created -> 201, read/list -> 200
//
// Everything below the boundary speaks OrderServiceError; nothing here
// inspects message strings.
//
// ============================================================================

/// Register all routes on the application.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/api/orders", web::post().to(create_order))
        .route("/api/orders", web::get().to(list_orders))
        .route("/api/orders/{id}", web::get().to(get_order))
        .route("/health", web::get().to(health_handler))
        .route("/metrics", web::get().to(metrics_handler));
}

/// A body that does not decode still gets the envelope, not actix's
/// plain-text default.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let detail = err.to_string();
        actix_web::error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(ApiResponse::<()>::error_with_details(
                "Validation failed.",
                vec![detail],
            )),
        )
        .into()
    })
}

fn error_response(err: &OrderServiceError) -> HttpResponse {
    match err {
        OrderServiceError::InvalidOrderData(message) => {
            HttpResponse::BadRequest().json(ApiResponse::<()>::error(message.clone()))
        }
        OrderServiceError::OrderNotFound(_) => {
            HttpResponse::NotFound().json(ApiResponse::<()>::error(err.to_string()))
        }
        OrderServiceError::Storage(storage_err) => {
            // Logged here, at the boundary; the detail stays out of the wire.
            tracing::error!(error = %storage_err, "Unexpected storage failure");
            HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("An unexpected error occurred."))
        }
    }
}

async fn create_order(
    service: web::Data<OrderService>,
    metrics: web::Data<Metrics>,
    request: web::Json<CreateOrderRequest>,
) -> impl Responder {
    tracing::info!(
        customer_name = %request.customer_name,
        "Received request to create order"
    );

    match service.create_order(request.into_inner()).await {
        Ok(order) => {
            metrics.record_order_created();
            HttpResponse::Created()
                .json(ApiResponse::success(order, "Order created successfully."))
        }
        Err(err) => {
            metrics.record_create_failure(err.reason());
            error_response(&err)
        }
    }
}

async fn get_order(
    service: web::Data<OrderService>,
    metrics: web::Data<Metrics>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let order_id = path.into_inner();

    match service.get_order(order_id).await {
        Ok(order) => {
            metrics.record_lookup("hit");
            HttpResponse::Ok().json(ApiResponse::success(order, "Order retrieved successfully."))
        }
        Err(err) => {
            metrics.record_lookup(match err {
                OrderServiceError::OrderNotFound(_) => "miss",
                _ => "error",
            });
            error_response(&err)
        }
    }
}

async fn list_orders(
    service: web::Data<OrderService>,
    metrics: web::Data<Metrics>,
) -> impl Responder {
    match service.list_orders().await {
        Ok(orders) => {
            metrics.record_list();
            HttpResponse::Ok().json(ApiResponse::success(
                orders,
                "Orders retrieved successfully.",
            ))
        }
        Err(err) => error_response(&err),
    }
}

async fn health_handler() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "order-svc"
    }))
}

async fn metrics_handler(metrics: web::Data<Metrics>) -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = metrics.registry().gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %err, "Failed to encode metrics");
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(buffer)
}

// ============================================================================
// Boundary Tests
// ============================================================================
