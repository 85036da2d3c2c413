//! Domain error types.

use thiserror::Error;

use crate::order::{OrderStatus, PaymentStatus, ProductId};

/// Errors that can occur while constructing or mutating an order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// An order must contain at least one line item.
    #[error("Order has no items")]
    NoItems,

    /// Line item quantities must be positive.
    #[error("Invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity { product_id: ProductId, quantity: u32 },

    /// The requested status value is not part of the enumerated set.
    #[error("Invalid status value: {0}")]
    InvalidStatus(String),

    /// The requested status transition is not in the transition table.
    #[error("Illegal status transition: {from} -> {to}")]
    IllegalTransition { from: OrderStatus, to: OrderStatus },

    /// The requested payment status transition is not in the transition table.
    #[error("Illegal payment status transition: {from} -> {to}")]
    IllegalPaymentTransition {
        from: PaymentStatus,
        to: PaymentStatus,
    },
}
