//! Orchestrator error types.

use common::OrderId;
use domain::{OrderError, OrderStatus, ProductId, UserId};
use store::StoreError;
use thiserror::Error;

/// Errors surfaced by orchestrator operations.
///
/// Every downstream failure maps verbatim into one of these kinds;
/// nothing is retried or masked internally.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The user does not exist, or the identity directory could not be
    /// asked (the two are deliberately not distinguished at this
    /// boundary).
    #[error("Unknown user: {0}")]
    InvalidUser(UserId),

    /// A line item references a product the ledger does not know.
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),

    /// The ledger holds less stock than the requested quantity.
    #[error("Insufficient stock for {product_name} ({product_id})")]
    InsufficientStock {
        product_id: ProductId,
        product_name: String,
    },

    /// No order exists under the given ID.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The order has already shipped or been delivered.
    #[error("Order {id} cannot be cancelled in status {status}")]
    OrderNotCancellable { id: OrderId, status: OrderStatus },

    /// Validation or state-machine error from the domain layer.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Order store error.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A downstream service could not be reached.
    #[error("Downstream unavailable: {0}")]
    Unavailable(String),
}
