//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::OrderError;
use orchestrator::OrchestratorError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client (malformed IDs, unparseable bodies).
    BadRequest(String),
    /// Orchestrator operation error.
    Orchestrator(OrchestratorError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Orchestrator(err) => orchestrator_error_to_response(err),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn orchestrator_error_to_response(err: OrchestratorError) -> (StatusCode, String) {
    let status = match &err {
        OrchestratorError::InvalidUser(_)
        | OrchestratorError::UnknownProduct(_)
        | OrchestratorError::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
        OrchestratorError::Order(order_err) => match order_err {
            OrderError::IllegalTransition { .. } | OrderError::IllegalPaymentTransition { .. } => {
                StatusCode::CONFLICT
            }
            OrderError::NoItems
            | OrderError::InvalidQuantity { .. }
            | OrderError::InvalidStatus(_) => StatusCode::BAD_REQUEST,
        },
        OrchestratorError::OrderNotFound(_) => StatusCode::NOT_FOUND,
        OrchestratorError::OrderNotCancellable { .. } => StatusCode::CONFLICT,
        OrchestratorError::Unavailable(_) => StatusCode::BAD_GATEWAY,
        OrchestratorError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "internal server error");
    }

    (status, err.to_string())
}

impl From<OrchestratorError> for ApiError {
    fn from(err: OrchestratorError) -> Self {
        ApiError::Orchestrator(err)
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        ApiError::Orchestrator(err.into())
    }
}
