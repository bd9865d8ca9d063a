use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::order::Order;
use super::{OrderRepository, StorageError};

// ============================================================================
// In-Memory Order Repository
// ============================================================================
//
// Storage fallback for running without a database, and the backend the
// service tests run against. A single write-lock critical section makes
// create/update/delete atomic, so the uniqueness and cascade invariants hold
// exactly as they do under Postgres.
//
// ============================================================================

pub struct InMemoryOrderRepository {
    orders: RwLock<HashMap<Uuid, Order>>,
    /// Item id sequence. Monotonic; ids of deleted items are never reused.
    item_seq: AtomicI64,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
            item_seq: AtomicI64::new(1),
        }
    }

    fn assign_item_ids(&self, order: &mut Order) {
        for item in &mut order.items {
            if item.id == 0 {
                item.id = self.item_seq.fetch_add(1, Ordering::SeqCst);
            }
            item.order_id = order.id;
        }
    }
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn get_by_id(&self, order_id: Uuid) -> Result<Option<Order>, StorageError> {
        let orders = self.orders.read().await;
        Ok(orders.get(&order_id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Order>, StorageError> {
        let orders = self.orders.read().await;

        let mut all: Vec<Order> = orders.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(all)
    }

    async fn create(&self, order: &Order) -> Result<Order, StorageError> {
        let mut orders = self.orders.write().await;

        // The map key doubles as the uniqueness constraint: checked and
        // inserted under one write lock, so concurrent same-id creates
        // cannot both pass.
        if orders.contains_key(&order.id) {
            tracing::warn!(order_id = %order.id, "Rejected create for existing order id");
            return Err(StorageError::DuplicateId(order.id));
        }

        let mut stored = order.clone();
        self.assign_item_ids(&mut stored);
        orders.insert(stored.id, stored.clone());

        tracing::debug!(
            order_id = %stored.id,
            item_count = stored.items.len(),
            "Stored order in memory"
        );

        // Clone back out: the caller gets the reloaded entity with assigned
        // item ids, matching the SQL implementation.
        Ok(stored)
    }

    async fn update(&self, order: &Order) -> Result<Order, StorageError> {
        let mut orders = self.orders.write().await;

        if !orders.contains_key(&order.id) {
            tracing::warn!(order_id = %order.id, "Rejected update for unknown order id");
            return Err(StorageError::MissingOrder(order.id));
        }

        let mut stored = order.clone();
        self.assign_item_ids(&mut stored);
        orders.insert(stored.id, stored.clone());

        Ok(stored)
    }

    async fn delete(&self, order_id: Uuid) -> Result<bool, StorageError> {
        let mut orders = self.orders.write().await;

        // Items are owned by value, so removing the order removes them too.
        Ok(orders.remove(&order_id).is_some())
    }

    async fn exists(&self, order_id: Uuid) -> Result<bool, StorageError> {
        let orders = self.orders.read().await;
        Ok(orders.contains_key(&order_id))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::OrderItem;
    use chrono::{Duration, Utc};

    fn order_with_items(customer: &str, product_ids: &[&str]) -> Order {
        let order_id = Uuid::new_v4();
        Order {
            id: order_id,
            customer_name: customer.to_string(),
            created_at: Utc::now(),
            items: product_ids
                .iter()
                .map(|product_id| OrderItem::new(order_id, *product_id, 1))
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_item_ids() {
        let repo = InMemoryOrderRepository::new();
        let order = order_with_items("John Doe", &["PROD001", "PROD002"]);

        let created = repo.create(&order).await.unwrap();

        assert_eq!(created.items.len(), 2);
        assert!(created.items.iter().all(|item| item.id > 0));
        assert_ne!(created.items[0].id, created.items[1].id);
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let repo = InMemoryOrderRepository::new();
        let order = order_with_items("John Doe", &["PROD001"]);

        let created = repo.create(&order).await.unwrap();
        let fetched = repo.get_by_id(order.id).await.unwrap().unwrap();

        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.customer_name, "John Doe");
        assert_eq!(fetched.items.len(), 1);
        assert_eq!(fetched.items[0].id, created.items[0].id);
    }

    #[tokio::test]
    async fn test_create_duplicate_id_conflicts() {
        let repo = InMemoryOrderRepository::new();
        let order = order_with_items("John Doe", &["PROD001"]);

        repo.create(&order).await.unwrap();
        let second = repo.create(&order).await;

        assert!(matches!(second, Err(StorageError::DuplicateId(id)) if id == order.id));
    }

    #[tokio::test]
    async fn test_get_all_orders_newest_first() {
        let repo = InMemoryOrderRepository::new();

        let mut older = order_with_items("Jane Smith", &["PROD003"]);
        older.created_at = Utc::now() - Duration::hours(2);
        let newer = order_with_items("John Doe", &["PROD001"]);

        repo.create(&older).await.unwrap();
        repo.create(&newer).await.unwrap();

        let all = repo.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, newer.id);
        assert_eq!(all[1].id, older.id);
    }

    #[tokio::test]
    async fn test_get_all_on_empty_storage() {
        let repo = InMemoryOrderRepository::new();
        assert!(repo.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_cascades_and_reports_absence() {
        let repo = InMemoryOrderRepository::new();
        let order = order_with_items("John Doe", &["PROD001", "PROD002"]);
        repo.create(&order).await.unwrap();

        assert!(repo.delete(order.id).await.unwrap());
        assert!(repo.get_by_id(order.id).await.unwrap().is_none());

        // Second delete of the same id is not an error, just a no-op.
        assert!(!repo.delete(order.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_item_ids_not_reused_after_delete() {
        let repo = InMemoryOrderRepository::new();

        let first = repo
            .create(&order_with_items("John Doe", &["PROD001"]))
            .await
            .unwrap();
        let highest = first.items[0].id;

        repo.delete(first.id).await.unwrap();

        let second = repo
            .create(&order_with_items("Jane Smith", &["PROD002"]))
            .await
            .unwrap();

        assert!(second.items[0].id > highest);
    }

    #[tokio::test]
    async fn test_update_replaces_mutable_fields() {
        let repo = InMemoryOrderRepository::new();
        let order = order_with_items("John Doe", &["PROD001"]);
        let created = repo.create(&order).await.unwrap();

        let mut replacement = created.clone();
        replacement.customer_name = "Jane Smith".to_string();
        replacement.items = vec![OrderItem::new(created.id, "PROD009", 5)];

        let updated = repo.update(&replacement).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.customer_name, "Jane Smith");
        assert_eq!(updated.items.len(), 1);
        assert_eq!(updated.items[0].product_id, "PROD009");
        assert!(updated.items[0].id > 0);
    }

    #[tokio::test]
    async fn test_update_unknown_order_fails() {
        let repo = InMemoryOrderRepository::new();
        let order = order_with_items("John Doe", &["PROD001"]);

        let result = repo.update(&order).await;
        assert!(matches!(result, Err(StorageError::MissingOrder(id)) if id == order.id));
    }

    #[tokio::test]
    async fn test_exists_probe() {
        let repo = InMemoryOrderRepository::new();
        let order = order_with_items("John Doe", &["PROD001"]);

        assert!(!repo.exists(order.id).await.unwrap());
        repo.create(&order).await.unwrap();
        assert!(repo.exists(order.id).await.unwrap());
    }
}
