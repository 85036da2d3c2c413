//! The Order entity.

use chrono::{DateTime, Utc};
use common::OrderId;
use serde::{Deserialize, Serialize};

use crate::error::OrderError;
use crate::order::status::{OrderStatus, PaymentStatus};
use crate::order::value_objects::{Money, OrderItem, ShippingAddress, UserId};

/// An order document as persisted in the order store.
///
/// Items are immutable after creation; only `status`, `payment_status`,
/// and `updated_at` change over the order's lifetime. The total amount is
/// computed from the items at construction time and never accepted from
/// the outside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    items: Vec<OrderItem>,
    total_amount: Money,
    status: OrderStatus,
    payment_status: PaymentStatus,
    shipping_address: ShippingAddress,
    payment_method: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Order {
    /// Creates a new pending order with a fresh ID and the current time.
    ///
    /// Validates that the item list is non-empty and every quantity is
    /// positive; the total is the sum of the item line totals.
    pub fn new(
        user_id: UserId,
        items: Vec<OrderItem>,
        shipping_address: ShippingAddress,
        payment_method: impl Into<String>,
    ) -> Result<Self, OrderError> {
        if items.is_empty() {
            return Err(OrderError::NoItems);
        }
        for item in &items {
            if item.quantity == 0 {
                return Err(OrderError::InvalidQuantity {
                    product_id: item.product_id.clone(),
                    quantity: item.quantity,
                });
            }
        }

        let total_amount = items.iter().map(OrderItem::total_price).sum();
        let now = Utc::now();

        Ok(Self {
            id: OrderId::new(),
            user_id,
            items,
            total_amount,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            shipping_address,
            payment_method: payment_method.into(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn total_amount(&self) -> Money {
        self.total_amount
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    pub fn shipping_address(&self) -> &ShippingAddress {
        &self.shipping_address
    }

    pub fn payment_method(&self) -> &str {
        &self.payment_method
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves the order to a new fulfillment status.
    ///
    /// Fails with [`OrderError::IllegalTransition`] and mutates nothing if
    /// the transition is not in the table.
    pub fn set_status(&mut self, next: OrderStatus) -> Result<(), OrderError> {
        if !self.status.can_transition_to(next) {
            return Err(OrderError::IllegalTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Cancels the order.
    ///
    /// Separate from [`Order::set_status`] because cancellation must be
    /// paired with a stock restore by the caller; the transition table
    /// therefore never reaches `cancelled` directly.
    pub fn cancel(&mut self) -> Result<(), OrderError> {
        if !self.status.can_cancel() {
            return Err(OrderError::IllegalTransition {
                from: self.status,
                to: OrderStatus::Cancelled,
            });
        }
        self.status = OrderStatus::Cancelled;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Moves the order to a new payment status.
    pub fn set_payment_status(&mut self, next: PaymentStatus) -> Result<(), OrderError> {
        if !self.payment_status.can_transition_to(next) {
            return Err(OrderError::IllegalPaymentTransition {
                from: self.payment_status,
                to: next,
            });
        }
        self.payment_status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Returns true if the order has not shipped yet and may be cancelled.
    pub fn is_cancellable(&self) -> bool {
        self.status.can_cancel()
    }
}
