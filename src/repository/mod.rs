use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::order::Order;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryOrderRepository;
pub use postgres::PgOrderRepository;

// ============================================================================
// Order Repository - Durable Storage Abstraction
// ============================================================================
//
// Responsibilities:
// 1. Persist an order and ALL of its items as a single atomic unit
// 2. Identifier-existence checks for duplicate detection
// 3. Listing ordered by creation time, newest first
// 4. Cascade delete: items never outlive their order
//
// Failures are logged where they occur and re-raised unchanged; nothing at
// this layer retries.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database failure: {0}")]
    Database(#[from] sqlx::Error),

    /// Uniqueness conflict on the order id. The constraint in storage is the
    /// authoritative duplicate signal; the service's existence probe is only
    /// an early courtesy check.
    #[error("order {0} already exists in storage")]
    DuplicateId(Uuid),

    /// An update or post-create reload targeted a row that is not there.
    #[error("order {0} is not in storage")]
    MissingOrder(Uuid),
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Fetch one order, items included. `None` when the id is unknown.
    async fn get_by_id(&self, order_id: Uuid) -> Result<Option<Order>, StorageError>;

    /// Fetch every order, items included, ordered by `created_at`
    /// descending. Empty storage yields an empty vec, never an error.
    async fn get_all(&self) -> Result<Vec<Order>, StorageError>;

    /// Persist the order and its items atomically. Returns the freshly
    /// reloaded entity so sequence-assigned item ids are reflected.
    async fn create(&self, order: &Order) -> Result<Order, StorageError>;

    /// Full replace of an existing order's mutable fields. Does not alter
    /// the id.
    async fn update(&self, order: &Order) -> Result<Order, StorageError>;

    /// True if a row existed and was removed (cascading to items); false
    /// when nothing matched. A missing id is not an error.
    async fn delete(&self, order_id: Uuid) -> Result<bool, StorageError>;

    /// Existence probe used for duplicate detection.
    async fn exists(&self, order_id: Uuid) -> Result<bool, StorageError>;
}
