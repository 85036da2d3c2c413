//! Domain layer for the order service.
//!
//! This crate provides the Order entity with its lifecycle state machine,
//! the independent payment state machine, and the value objects shared
//! across the workspace (identifiers, money, order items, addresses).

pub mod error;
pub mod order;

pub use error::OrderError;
pub use order::{
    Money, Order, OrderItem, OrderStatus, PaymentStatus, ProductId, ShippingAddress, UserId,
};
