use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;
mod domain;
mod metrics;
mod repository;

use config::AppConfig;
use domain::order::OrderService;
use repository::{InMemoryOrderRepository, OrderRepository, PgOrderRepository};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var
    // Example: RUST_LOG=debug cargo run
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,order_svc=debug")),
        )
        .init();

    tracing::info!("🚀 Starting order service");

    let config = AppConfig::from_env();

    // === 1. Pick the storage backend ===
    let repository: Arc<dyn OrderRepository> = match &config.database_url {
        Some(url) => {
            tracing::info!("Connecting to Postgres...");
            let pool = PgPoolOptions::new()
                .max_connections(config.max_db_connections)
                .connect(url)
                .await?;

            let repository = PgOrderRepository::new(pool);
            repository.init_schema().await?;
            Arc::new(repository)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, falling back to in-memory storage");
            Arc::new(InMemoryOrderRepository::new())
        }
    };

    // === 2. Wire the service and metrics ===
    let service = web::Data::new(OrderService::new(repository));
    let metrics = web::Data::new(metrics::Metrics::new()?);

    // === 3. Seed sample orders for the in-memory backend ===
    // With no database there is nothing to look at after a restart, so give
    // the API something to return out of the box.
    if config.database_url.is_none() {
        seed_demo_orders(&service).await;
    }

    // === 4. Serve ===
    tracing::info!(bind_addr = %config.bind_addr, "✅ Order API listening");

    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .app_data(metrics.clone())
            .configure(api::configure)
    })
    .bind(&config.bind_addr)?
    .run()
    .await?;

    Ok(())
}

/// The two sample orders the service has always shipped with.
async fn seed_demo_orders(service: &OrderService) {
    use api::dto::{CreateOrderRequest, OrderItemDto};

    let samples = [
        CreateOrderRequest {
            order_id: None,
            customer_name: "John Doe".to_string(),
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
        },
        CreateOrderRequest {
            order_id: None,
            customer_name: "Jane Smith".to_string(),
            order_items: vec![OrderItemDto {
                product_id: "PROD003".to_string(),
                quantity: 3,
            }],
        },
    ];

    for sample in samples {
        match service.create_order(sample).await {
            Ok(order) => tracing::info!(order_id = %order.order_id, "Seeded sample order"),
            Err(err) => tracing::warn!(error = %err, "Failed to seed sample order"),
        }
    }
}
