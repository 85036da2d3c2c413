//! The order orchestrator.

use std::time::Instant;

use common::OrderId;
use domain::{Order, OrderItem, OrderStatus, PaymentStatus, ProductId, ShippingAddress, UserId};
use store::OrderStore;

use crate::Result;
use crate::error::OrchestratorError;
use crate::services::catalog::{LedgerError, StockLedger};
use crate::services::identity::IdentityDirectory;

/// A line item in an order request. Prices are never accepted from the
/// caller; they are snapshotted from the ledger during reservation.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// An order creation request.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub items: Vec<NewOrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
}

/// Coordinates the identity directory, stock ledger, and order store.
///
/// Stateless between calls; every operation runs to completion
/// independently and issues its downstream calls sequentially. Stock
/// reservations made before a failing step are compensated with
/// opposite adjustments before the error is returned, so a failed
/// creation never leaves reservations behind.
pub struct OrderOrchestrator<S, L, D>
where
    S: OrderStore,
    L: StockLedger,
    D: IdentityDirectory,
{
    store: S,
    ledger: L,
    directory: D,
}

impl<S, L, D> OrderOrchestrator<S, L, D>
where
    S: OrderStore,
    L: StockLedger,
    D: IdentityDirectory,
{
    /// Creates a new orchestrator over the given collaborators.
    pub fn new(store: S, ledger: L, directory: D) -> Self {
        Self {
            store,
            ledger,
            directory,
        }
    }

    /// Creates an order.
    ///
    /// Validates the user against the identity directory, reserves
    /// stock item by item in caller order, then persists the order with
    /// `status=pending` and `payment_status=pending`. On any failure
    /// after one or more reservations, the reservations already made
    /// are released before the error is returned.
    #[tracing::instrument(
        skip(self, request),
        fields(user_id = %request.user_id, item_count = request.items.len())
    )]
    pub async fn create_order(&self, request: NewOrder) -> Result<Order> {
        metrics::counter!("order_create_attempts_total").increment(1);
        let started = Instant::now();

        if request.items.is_empty() {
            return Err(domain::OrderError::NoItems.into());
        }
        for line in &request.items {
            if line.quantity == 0 {
                return Err(domain::OrderError::InvalidQuantity {
                    product_id: line.product_id.clone(),
                    quantity: line.quantity,
                }
                .into());
            }
        }

        // Identity check first: no stock has been touched yet, so a
        // failure here needs no compensation. Directory transport
        // failures count as an unknown user at this boundary.
        match self.directory.exists(&request.user_id).await {
            Ok(true) => {}
            Ok(false) => return Err(OrchestratorError::InvalidUser(request.user_id)),
            Err(err) => {
                tracing::warn!(error = %err, "identity directory lookup failed");
                return Err(OrchestratorError::InvalidUser(request.user_id));
            }
        }

        let mut reserved: Vec<(ProductId, u32)> = Vec::with_capacity(request.items.len());
        let mut items: Vec<OrderItem> = Vec::with_capacity(request.items.len());

        for line in &request.items {
            match self.reserve_line(line).await {
                Ok(item) => {
                    reserved.push((line.product_id.clone(), line.quantity));
                    items.push(item);
                }
                Err(err) => {
                    self.release_reservations(&reserved).await;
                    return Err(err);
                }
            }
        }

        let order = match Order::new(
            request.user_id,
            items,
            request.shipping_address,
            request.payment_method,
        ) {
            Ok(order) => order,
            Err(err) => {
                self.release_reservations(&reserved).await;
                return Err(err.into());
            }
        };

        if let Err(err) = self.store.insert(order.clone()).await {
            self.release_reservations(&reserved).await;
            return Err(err.into());
        }

        metrics::counter!("orders_created_total").increment(1);
        metrics::histogram!("order_create_duration_seconds")
            .record(started.elapsed().as_secs_f64());
        tracing::info!(order_id = %order.id(), total = %order.total_amount(), "order created");
        Ok(order)
    }

    /// Loads an order by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, id: OrderId) -> Result<Order> {
        self.store
            .get(id)
            .await?
            .ok_or(OrchestratorError::OrderNotFound(id))
    }

    /// Returns all orders placed by the given user, oldest first.
    ///
    /// No existence check against the directory: an unknown user simply
    /// has no orders.
    #[tracing::instrument(skip(self))]
    pub async fn list_orders_for_user(&self, user_id: &UserId) -> Result<Vec<Order>> {
        Ok(self.store.get_by_user(user_id).await?)
    }

    /// Moves an order to a new fulfillment status along the transition
    /// table and persists it.
    #[tracing::instrument(skip(self))]
    pub async fn set_status(&self, id: OrderId, status: OrderStatus) -> Result<Order> {
        let mut order = self.get_order(id).await?;
        order.set_status(status)?;
        self.store.update(&order).await?;
        tracing::info!(order_id = %id, status = %status, "order status updated");
        Ok(order)
    }

    /// Moves an order to a new payment status and persists it.
    #[tracing::instrument(skip(self))]
    pub async fn set_payment_status(&self, id: OrderId, status: PaymentStatus) -> Result<Order> {
        let mut order = self.get_order(id).await?;
        order.set_payment_status(status)?;
        self.store.update(&order).await?;
        tracing::info!(order_id = %id, payment_status = %status, "payment status updated");
        Ok(order)
    }

    /// Cancels an order, restoring exactly the stock reserved at
    /// creation.
    ///
    /// Fails with [`OrchestratorError::OrderNotCancellable`] if the
    /// order has shipped or been delivered; in that case nothing is
    /// touched. If an individual restore fails midway, restores already
    /// applied are rolled back before the error is returned.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_order(&self, id: OrderId) -> Result<Order> {
        let mut order = self
            .store
            .get(id)
            .await?
            .ok_or(OrchestratorError::OrderNotFound(id))?;

        if !order.is_cancellable() {
            return Err(OrchestratorError::OrderNotCancellable {
                id,
                status: order.status(),
            });
        }

        let mut restored: Vec<(ProductId, u32)> = Vec::with_capacity(order.items().len());
        for item in order.items() {
            match self
                .ledger
                .adjust_stock(&item.product_id, i64::from(item.quantity))
                .await
            {
                Ok(_) => restored.push((item.product_id.clone(), item.quantity)),
                Err(err) => {
                    let mapped = ledger_error(err, &item.product_id, item.product_id.as_str());
                    self.rollback_restores(&restored).await;
                    return Err(mapped);
                }
            }
        }

        order.cancel()?;
        if let Err(err) = self.store.update(&order).await {
            self.rollback_restores(&restored).await;
            return Err(err.into());
        }

        metrics::counter!("orders_cancelled_total").increment(1);
        tracing::info!(order_id = %id, "order cancelled");
        Ok(order)
    }

    /// Resolves one line item and reserves its stock, snapshotting the
    /// ledger price into the resulting order item.
    async fn reserve_line(&self, line: &NewOrderItem) -> Result<OrderItem> {
        let item = self
            .ledger
            .get_item(&line.product_id)
            .await
            .map_err(|err| ledger_error(err, &line.product_id, line.product_id.as_str()))?;

        if i64::from(line.quantity) > item.stock {
            return Err(OrchestratorError::InsufficientStock {
                product_id: line.product_id.clone(),
                product_name: item.name,
            });
        }

        // The ledger re-checks atomically; a lost race since get_item
        // surfaces as the same error kinds.
        self.ledger
            .adjust_stock(&line.product_id, -i64::from(line.quantity))
            .await
            .map_err(|err| ledger_error(err, &line.product_id, &item.name))?;

        Ok(OrderItem::new(
            line.product_id.clone(),
            line.quantity,
            item.price,
        ))
    }

    /// Best-effort compensation: releases reservations made earlier in
    /// a failed creation. Individual failures are logged and counted,
    /// not surfaced; the caller returns the original error.
    async fn release_reservations(&self, reserved: &[(ProductId, u32)]) {
        for (product_id, quantity) in reserved {
            if let Err(err) = self
                .ledger
                .adjust_stock(product_id, i64::from(*quantity))
                .await
            {
                metrics::counter!("reservation_release_failures_total").increment(1);
                tracing::warn!(%product_id, quantity, error = %err, "failed to release reservation");
            }
        }
    }

    /// Best-effort rollback of restores applied before a failed
    /// cancellation step.
    async fn rollback_restores(&self, restored: &[(ProductId, u32)]) {
        for (product_id, quantity) in restored {
            if let Err(err) = self
                .ledger
                .adjust_stock(product_id, -i64::from(*quantity))
                .await
            {
                metrics::counter!("restore_rollback_failures_total").increment(1);
                tracing::warn!(%product_id, quantity, error = %err, "failed to roll back restore");
            }
        }
    }
}

fn ledger_error(err: LedgerError, product_id: &ProductId, product_name: &str) -> OrchestratorError {
    match err {
        LedgerError::NotFound => OrchestratorError::UnknownProduct(product_id.clone()),
        LedgerError::InsufficientStock => OrchestratorError::InsufficientStock {
            product_id: product_id.clone(),
            product_name: product_name.to_string(),
        },
        LedgerError::Unavailable(msg) => OrchestratorError::Unavailable(msg),
    }
}
