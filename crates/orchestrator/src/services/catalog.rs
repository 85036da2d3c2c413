//! Item stock ledger contract and in-memory double.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use domain::{Money, ProductId};
use thiserror::Error;

/// Errors returned by the stock ledger.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// No item exists under the given product ID.
    #[error("Item not found")]
    NotFound,

    /// The adjustment would drive stock below zero.
    #[error("Insufficient stock")]
    InsufficientStock,

    /// The ledger could not be reached.
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
}

/// A catalog item as reported by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    /// Human-readable product name.
    pub name: String,
    /// Current price per unit.
    pub price: Money,
    /// Units currently in stock.
    pub stock: i64,
}

/// Remote stock ledger owning per-item stock counts.
///
/// `adjust_stock` must be atomic with respect to concurrent callers on
/// the same item: two concurrent decrements may never both drive stock
/// negative. The orchestrator's paired-adjustment invariant depends on
/// this guarantee holding at the ledger boundary.
#[async_trait]
pub trait StockLedger: Send + Sync {
    /// Resolves an item by product ID.
    async fn get_item(&self, product_id: &ProductId) -> Result<CatalogItem, LedgerError>;

    /// Adjusts stock by `delta` (negative to reserve, positive to
    /// restore) and returns the new stock count.
    async fn adjust_stock(&self, product_id: &ProductId, delta: i64) -> Result<i64, LedgerError>;
}

#[derive(Debug, Default)]
struct LedgerState {
    items: HashMap<ProductId, CatalogItem>,
    unavailable: bool,
}

/// In-memory stock ledger for tests and the default server wiring.
///
/// Adjustments are check-and-set under a single write lock, which makes
/// them atomic as the contract requires.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStockLedger {
    state: Arc<RwLock<LedgerState>>,
}

impl InMemoryStockLedger {
    /// Creates a new empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an item.
    pub fn add_item(
        &self,
        product_id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money,
        stock: i64,
    ) {
        self.state.write().unwrap().items.insert(
            product_id.into(),
            CatalogItem {
                name: name.into(),
                price,
                stock,
            },
        );
    }

    /// Removes an item, simulating deletion from the catalog.
    pub fn remove_item(&self, product_id: &ProductId) {
        self.state.write().unwrap().items.remove(product_id);
    }

    /// Returns the current stock of an item, if it exists.
    pub fn stock_of(&self, product_id: &ProductId) -> Option<i64> {
        self.state
            .read()
            .unwrap()
            .items
            .get(product_id)
            .map(|item| item.stock)
    }

    /// Makes all subsequent calls fail as transport errors.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.write().unwrap().unavailable = unavailable;
    }
}

#[async_trait]
impl StockLedger for InMemoryStockLedger {
    async fn get_item(&self, product_id: &ProductId) -> Result<CatalogItem, LedgerError> {
        let state = self.state.read().unwrap();
        if state.unavailable {
            return Err(LedgerError::Unavailable("connection refused".to_string()));
        }
        state
            .items
            .get(product_id)
            .cloned()
            .ok_or(LedgerError::NotFound)
    }

    async fn adjust_stock(&self, product_id: &ProductId, delta: i64) -> Result<i64, LedgerError> {
        let mut state = self.state.write().unwrap();
        if state.unavailable {
            return Err(LedgerError::Unavailable("connection refused".to_string()));
        }
        let item = state.items.get_mut(product_id).ok_or(LedgerError::NotFound)?;

        // Check-and-set under the write lock: concurrent decrements
        // cannot both pass the check.
        let new_stock = item.stock + delta;
        if new_stock < 0 {
            return Err(LedgerError::InsufficientStock);
        }
        item.stock = new_stock;
        Ok(new_stock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_item() {
        let ledger = InMemoryStockLedger::new();
        ledger.add_item("SKU-001", "Widget", Money::from_cents(1000), 5);

        let item = ledger.get_item(&"SKU-001".into()).await.unwrap();
        assert_eq!(item.name, "Widget");
        assert_eq!(item.price.cents(), 1000);
        assert_eq!(item.stock, 5);

        let err = ledger.get_item(&"SKU-404".into()).await.unwrap_err();
        assert_eq!(err, LedgerError::NotFound);
    }

    #[tokio::test]
    async fn test_adjust_stock_decrement_and_restore() {
        let ledger = InMemoryStockLedger::new();
        ledger.add_item("SKU-001", "Widget", Money::from_cents(1000), 5);

        let remaining = ledger.adjust_stock(&"SKU-001".into(), -3).await.unwrap();
        assert_eq!(remaining, 2);

        let restored = ledger.adjust_stock(&"SKU-001".into(), 3).await.unwrap();
        assert_eq!(restored, 5);
    }

    #[tokio::test]
    async fn test_adjust_stock_never_goes_negative() {
        let ledger = InMemoryStockLedger::new();
        ledger.add_item("SKU-001", "Widget", Money::from_cents(1000), 2);

        let err = ledger.adjust_stock(&"SKU-001".into(), -3).await.unwrap_err();
        assert_eq!(err, LedgerError::InsufficientStock);
        assert_eq!(ledger.stock_of(&"SKU-001".into()), Some(2));
    }

    #[tokio::test]
    async fn test_unavailable_fails_all_calls() {
        let ledger = InMemoryStockLedger::new();
        ledger.add_item("SKU-001", "Widget", Money::from_cents(1000), 5);
        ledger.set_unavailable(true);

        assert!(matches!(
            ledger.get_item(&"SKU-001".into()).await,
            Err(LedgerError::Unavailable(_))
        ));
        assert!(matches!(
            ledger.adjust_stock(&"SKU-001".into(), -1).await,
            Err(LedgerError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_decrements_contend_atomically() {
        let ledger = InMemoryStockLedger::new();
        ledger.add_item("SKU-001", "Widget", Money::from_cents(1000), 5);

        let mut handles = Vec::new();
        for _ in 0..10 {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move {
                ledger.adjust_stock(&"SKU-001".into(), -1).await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 5);
        assert_eq!(ledger.stock_of(&"SKU-001".into()), Some(0));
    }
}
