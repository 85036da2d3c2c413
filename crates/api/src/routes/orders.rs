//! Order endpoints.

use std::str::FromStr;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use common::OrderId;
use domain::{Order, OrderStatus, PaymentStatus, ShippingAddress, UserId};
use orchestrator::{
    InMemoryIdentityDirectory, InMemoryStockLedger, NewOrder, NewOrderItem, OrderOrchestrator,
};
use serde::{Deserialize, Serialize};
use store::OrderStore;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: OrderStore> {
    pub orchestrator: OrderOrchestrator<S, InMemoryStockLedger, InMemoryIdentityDirectory>,
    pub ledger: InMemoryStockLedger,
    pub directory: InMemoryIdentityDirectory,
}

// -- Request types --

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: String,
    pub items: Vec<OrderItemRequest>,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    /// Accepted for wire compatibility, never trusted: the total is
    /// always recomputed from ledger price snapshots.
    #[serde(default)]
    pub total_amount: Option<i64>,
}

#[derive(Deserialize)]
pub struct OrderItemRequest {
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[derive(Deserialize)]
pub struct PaymentUpdateRequest {
    pub payment_status: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub user_id: String,
    pub items: Vec<OrderItemResponse>,
    pub total_cents: i64,
    pub status: String,
    pub payment_status: String,
    pub shipping_address: ShippingAddress,
    pub payment_method: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        let items = order
            .items()
            .iter()
            .map(|item| OrderItemResponse {
                product_id: item.product_id.to_string(),
                quantity: item.quantity,
                unit_price_cents: item.unit_price.cents(),
            })
            .collect();

        OrderResponse {
            id: order.id().to_string(),
            user_id: order.user_id().to_string(),
            items,
            total_cents: order.total_amount().cents(),
            status: order.status().to_string(),
            payment_status: order.payment_status().to_string(),
            shipping_address: order.shipping_address().clone(),
            payment_method: order.payment_method().to_string(),
            created_at: order.created_at().to_rfc3339(),
            updated_at: order.updated_at().to_rfc3339(),
        }
    }
}

// -- Handlers --

/// POST /orders — create a new order.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(axum::http::StatusCode, Json<OrderResponse>), ApiError> {
    let request = NewOrder {
        user_id: UserId::new(req.user_id),
        items: req
            .items
            .into_iter()
            .map(|item| NewOrderItem {
                product_id: item.product_id.into(),
                quantity: item.quantity,
            })
            .collect(),
        shipping_address: req.shipping_address,
        payment_method: req.payment_method,
    };

    let order = state.orchestrator.create_order(request).await?;
    Ok((axum::http::StatusCode::CREATED, Json(order.into())))
}

/// GET /orders/:id — load an order by ID.
#[tracing::instrument(skip(state))]
pub async fn get<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state.orchestrator.get_order(order_id).await?;
    Ok(Json(order.into()))
}

/// GET /orders/user/:user_id — list all orders placed by a user.
#[tracing::instrument(skip(state))]
pub async fn list_for_user<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = state
        .orchestrator
        .list_orders_for_user(&UserId::new(user_id))
        .await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

/// PATCH /orders/:id/status — move an order along the status table.
#[tracing::instrument(skip(state, req))]
pub async fn set_status<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let status = OrderStatus::from_str(&req.status)?;
    let order = state.orchestrator.set_status(order_id, status).await?;
    Ok(Json(order.into()))
}

/// PATCH /orders/:id/payment — update an order's payment status.
#[tracing::instrument(skip(state, req))]
pub async fn set_payment_status<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Json(req): Json<PaymentUpdateRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let status = PaymentStatus::from_str(&req.payment_status)?;
    let order = state
        .orchestrator
        .set_payment_status(order_id, status)
        .await?;
    Ok(Json(order.into()))
}

/// POST /orders/:id/cancel — cancel an order and restore its stock.
#[tracing::instrument(skip(state))]
pub async fn cancel<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state.orchestrator.cancel_order(order_id).await?;
    Ok(Json(order.into()))
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid order ID: {e}")))?;
    Ok(OrderId::from(uuid))
}
