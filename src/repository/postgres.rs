use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::order::{Order, OrderItem};
use super::{OrderRepository, StorageError};

// ============================================================================
// PostgreSQL Order Repository
// ============================================================================
//
// Schema:
//
//   orders       (order_id UUID PK, customer_name VARCHAR(100), created_at TIMESTAMPTZ)
//   order_items  (id BIGSERIAL PK, order_id UUID FK ON DELETE CASCADE,
//                 product_id VARCHAR(50), quantity INT CHECK (quantity > 0))
//
// The primary key on orders.order_id is the authoritative uniqueness
// constraint: a concurrent create that slips past the service's existence
// probe lands here as a unique violation and surfaces as DuplicateId.
// Cascade delete is the foreign key's job, so an item never outlives its
// order.
//
// ============================================================================

pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the tables if they are not there yet. Run once at startup.
    pub async fn init_schema(&self) -> Result<(), StorageError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS orders (
                 order_id UUID PRIMARY KEY,
                 customer_name VARCHAR(100) NOT NULL,
                 created_at TIMESTAMPTZ NOT NULL
             )",
        )
        .execute(&self.pool)
        .await
        .map_err(|err| log_db_error("creating orders table", err))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS order_items (
                 id BIGSERIAL PRIMARY KEY,
                 order_id UUID NOT NULL REFERENCES orders(order_id) ON DELETE CASCADE,
                 product_id VARCHAR(50) NOT NULL,
                 quantity INT NOT NULL CHECK (quantity > 0)
             )",
        )
        .execute(&self.pool)
        .await
        .map_err(|err| log_db_error("creating order_items table", err))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_order_items_order_id ON order_items(order_id)",
        )
        .execute(&self.pool)
        .await
        .map_err(|err| log_db_error("indexing order_items", err))?;

        tracing::info!("Order schema ready");
        Ok(())
    }

    async fn load_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>, StorageError> {
        let rows = sqlx::query(
            "SELECT id, order_id, product_id, quantity
             FROM order_items
             WHERE order_id = $1
             ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|err| log_db_error("loading order items", err))?;

        rows.iter()
            .map(item_from_row)
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(|err| log_db_error("decoding order items", err))
    }
}

fn order_from_row(row: &PgRow) -> Result<Order, sqlx::Error> {
    Ok(Order {
        id: row.try_get("order_id")?,
        customer_name: row.try_get("customer_name")?,
        created_at: row.try_get("created_at")?,
        items: Vec::new(),
    })
}

fn item_from_row(row: &PgRow) -> Result<OrderItem, sqlx::Error> {
    Ok(OrderItem {
        id: row.try_get("id")?,
        order_id: row.try_get("order_id")?,
        product_id: row.try_get("product_id")?,
        quantity: row.try_get("quantity")?,
    })
}

fn log_db_error(operation: &str, err: sqlx::Error) -> StorageError {
    tracing::error!(error = %err, operation = operation, "Storage operation failed");
    StorageError::Database(err)
}

fn map_order_insert_error(order_id: Uuid, err: sqlx::Error) -> StorageError {
    match err.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => {
            tracing::warn!(order_id = %order_id, "Unique constraint rejected duplicate order id");
            StorageError::DuplicateId(order_id)
        }
        _ => log_db_error("inserting order", err),
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn get_by_id(&self, order_id: Uuid) -> Result<Option<Order>, StorageError> {
        let row = sqlx::query(
            "SELECT order_id, customer_name, created_at FROM orders WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| log_db_error("retrieving order", err))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut order =
            order_from_row(&row).map_err(|err| log_db_error("decoding order", err))?;
        order.items = self.load_items(order_id).await?;

        Ok(Some(order))
    }

    async fn get_all(&self) -> Result<Vec<Order>, StorageError> {
        let order_rows = sqlx::query(
            "SELECT order_id, customer_name, created_at
             FROM orders
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|err| log_db_error("retrieving all orders", err))?;

        let mut orders = order_rows
            .iter()
            .map(order_from_row)
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(|err| log_db_error("decoding orders", err))?;

        // One pass over order_items instead of a query per order.
        let item_rows = sqlx::query(
            "SELECT id, order_id, product_id, quantity FROM order_items ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|err| log_db_error("retrieving order items", err))?;

        let mut items_by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
        for row in &item_rows {
            let item = item_from_row(row)
                .map_err(|err| log_db_error("decoding order items", err))?;
            items_by_order.entry(item.order_id).or_default().push(item);
        }

        for order in &mut orders {
            if let Some(items) = items_by_order.remove(&order.id) {
                order.items = items;
            }
        }

        Ok(orders)
    }

    async fn create(&self, order: &Order) -> Result<Order, StorageError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| log_db_error("opening transaction", err))?;

        sqlx::query(
            "INSERT INTO orders (order_id, customer_name, created_at) VALUES ($1, $2, $3)",
        )
        .bind(order.id)
        .bind(&order.customer_name)
        .bind(order.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|err| map_order_insert_error(order.id, err))?;

        for item in &order.items {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity) VALUES ($1, $2, $3)",
            )
            .bind(order.id)
            .bind(&item.product_id)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await
            .map_err(|err| log_db_error("inserting order item", err))?;
        }

        tx.commit()
            .await
            .map_err(|err| log_db_error("committing order", err))?;

        tracing::debug!(
            order_id = %order.id,
            item_count = order.items.len(),
            "Persisted order"
        );

        // Reload so the caller sees the sequence-assigned item ids.
        self.get_by_id(order.id)
            .await?
            .ok_or(StorageError::MissingOrder(order.id))
    }

    async fn update(&self, order: &Order) -> Result<Order, StorageError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| log_db_error("opening transaction", err))?;

        let result = sqlx::query(
            "UPDATE orders SET customer_name = $2, created_at = $3 WHERE order_id = $1",
        )
        .bind(order.id)
        .bind(&order.customer_name)
        .bind(order.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|err| log_db_error("updating order", err))?;

        if result.rows_affected() == 0 {
            tracing::warn!(order_id = %order.id, "Rejected update for unknown order id");
            return Err(StorageError::MissingOrder(order.id));
        }

        // Full replace: drop the old item rows and write the new set.
        sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(order.id)
            .execute(&mut *tx)
            .await
            .map_err(|err| log_db_error("clearing order items", err))?;

        for item in &order.items {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity) VALUES ($1, $2, $3)",
            )
            .bind(order.id)
            .bind(&item.product_id)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await
            .map_err(|err| log_db_error("inserting order item", err))?;
        }

        tx.commit()
            .await
            .map_err(|err| log_db_error("committing order update", err))?;

        self.get_by_id(order.id)
            .await?
            .ok_or(StorageError::MissingOrder(order.id))
    }

    async fn delete(&self, order_id: Uuid) -> Result<bool, StorageError> {
        // ON DELETE CASCADE takes the item rows with the order.
        let result = sqlx::query("DELETE FROM orders WHERE order_id = $1")
            .bind(order_id)
            .execute(&self.pool)
            .await
            .map_err(|err| log_db_error("deleting order", err))?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, order_id: Uuid) -> Result<bool, StorageError> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM orders WHERE order_id = $1)")
            .bind(order_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| log_db_error("checking order existence", err))?;

        row.try_get(0)
            .map_err(|err| log_db_error("decoding existence probe", err))
    }
}
