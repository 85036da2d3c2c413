use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::OrderId;
use domain::{Order, UserId};
use tokio::sync::RwLock;

use crate::{Result, StoreError, store::OrderStore};

#[derive(Default)]
struct State {
    orders: HashMap<OrderId, Order>,
    fail_writes: bool,
}

/// In-memory order store.
///
/// Backs the tests and the default server wiring; provides the same
/// interface a document-database implementation would.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of stored orders.
    pub async fn order_count(&self) -> usize {
        self.state.read().await.orders.len()
    }

    /// Configures the store to fail all subsequent writes.
    pub async fn set_fail_writes(&self, fail: bool) {
        self.state.write().await.fail_writes = fail;
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: Order) -> Result<()> {
        let mut state = self.state.write().await;
        if state.fail_writes {
            return Err(StoreError::Backend("write failure injected".to_string()));
        }
        if state.orders.contains_key(&order.id()) {
            return Err(StoreError::DuplicateId(order.id()));
        }
        state.orders.insert(order.id(), order);
        Ok(())
    }

    async fn get(&self, id: OrderId) -> Result<Option<Order>> {
        let state = self.state.read().await;
        Ok(state.orders.get(&id).cloned())
    }

    async fn get_by_user(&self, user_id: &UserId) -> Result<Vec<Order>> {
        let state = self.state.read().await;
        let mut orders: Vec<Order> = state
            .orders
            .values()
            .filter(|o| o.user_id() == user_id)
            .cloned()
            .collect();
        orders.sort_by_key(|o| o.created_at());
        Ok(orders)
    }

    async fn update(&self, order: &Order) -> Result<()> {
        let mut state = self.state.write().await;
        if state.fail_writes {
            return Err(StoreError::Backend("write failure injected".to_string()));
        }
        if !state.orders.contains_key(&order.id()) {
            return Err(StoreError::NotFound(order.id()));
        }
        state.orders.insert(order.id(), order.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Money, OrderItem, OrderStatus, ShippingAddress};

    fn test_order(user: &str) -> Order {
        Order::new(
            UserId::new(user),
            vec![OrderItem::new("SKU-001", 1, Money::from_cents(500))],
            ShippingAddress {
                street: "1 Main St".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                zip_code: "62701".to_string(),
                country: "US".to_string(),
            },
            "credit_card",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn insert_and_get() {
        let store = InMemoryOrderStore::new();
        let order = test_order("user-1");
        let id = order.id();

        store.insert(order.clone()).await.unwrap();
        assert_eq!(store.order_count().await, 1);

        let loaded = store.get(id).await.unwrap().unwrap();
        assert_eq!(loaded, order);
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let store = InMemoryOrderStore::new();
        let result = store.get(OrderId::new()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn insert_duplicate_id_fails() {
        let store = InMemoryOrderStore::new();
        let order = test_order("user-1");

        store.insert(order.clone()).await.unwrap();
        let result = store.insert(order).await;
        assert!(matches!(result, Err(StoreError::DuplicateId(_))));
    }

    #[tokio::test]
    async fn get_by_user_filters_and_orders_by_creation() {
        let store = InMemoryOrderStore::new();
        let first = test_order("user-1");
        let second = test_order("user-1");
        let other = test_order("user-2");

        store.insert(first.clone()).await.unwrap();
        store.insert(second.clone()).await.unwrap();
        store.insert(other).await.unwrap();

        let orders = store.get_by_user(&UserId::new("user-1")).await.unwrap();
        assert_eq!(orders.len(), 2);
        assert!(orders[0].created_at() <= orders[1].created_at());

        let none = store.get_by_user(&UserId::new("user-3")).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn update_replaces_document() {
        let store = InMemoryOrderStore::new();
        let mut order = test_order("user-1");
        store.insert(order.clone()).await.unwrap();

        order.set_status(OrderStatus::Processing).unwrap();
        store.update(&order).await.unwrap();

        let loaded = store.get(order.id()).await.unwrap().unwrap();
        assert_eq!(loaded.status(), OrderStatus::Processing);
    }

    #[tokio::test]
    async fn update_missing_fails() {
        let store = InMemoryOrderStore::new();
        let order = test_order("user-1");

        let result = store.update(&order).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn write_failure_injection() {
        let store = InMemoryOrderStore::new();
        store.set_fail_writes(true).await;

        let result = store.insert(test_order("user-1")).await;
        assert!(matches!(result, Err(StoreError::Backend(_))));
        assert_eq!(store.order_count().await, 0);
    }
}
