//! Store error types.

use common::OrderId;
use thiserror::Error;

/// Errors that can occur during order store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No order document exists under the given ID.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// An insert collided with an existing document ID.
    #[error("Order already exists: {0}")]
    DuplicateId(OrderId),

    /// The backing store failed.
    #[error("Store backend error: {0}")]
    Backend(String),
}
