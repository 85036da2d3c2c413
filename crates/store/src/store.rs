//! The order store contract.

use async_trait::async_trait;
use common::OrderId;
use domain::{Order, UserId};

use crate::Result;

/// Persistence contract for order documents.
///
/// Implementations must make `update` atomic per document; no
/// cross-document transactionality is assumed anywhere in the core.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Inserts a new order document.
    ///
    /// Fails with [`crate::StoreError::DuplicateId`] if a document with
    /// the same ID already exists.
    async fn insert(&self, order: Order) -> Result<()>;

    /// Looks up an order by ID.
    async fn get(&self, id: OrderId) -> Result<Option<Order>>;

    /// Returns all orders placed by the given user, oldest first.
    async fn get_by_user(&self, user_id: &UserId) -> Result<Vec<Order>>;

    /// Replaces an existing order document.
    ///
    /// Fails with [`crate::StoreError::NotFound`] if the document does
    /// not exist.
    async fn update(&self, order: &Order) -> Result<()>;
}
