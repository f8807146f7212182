//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::AppState;
use derrick_shared::AppError;

pub mod accounts;
pub mod companies;
pub mod entries;
pub mod health;
pub mod ownerships;
pub mod properties;
pub mod transactions;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(properties::routes())
        .merge(companies::routes())
        .merge(accounts::routes())
        .merge(transactions::routes())
        .merge(ownerships::routes())
        .merge(entries::routes())
}

/// Renders an application error as a JSON response.
///
/// Server-side failures are logged and replaced with a generic message so
/// infrastructure details never reach the caller.
pub(crate) fn error_response(err: AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = if status.is_server_error() {
        error!(error = %err, "Request failed");
        "An error occurred".to_string()
    } else {
        err.to_string()
    };

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": message
        })),
    )
        .into_response()
}

/// Rejects a request that omitted a required field.
pub(crate) fn missing_field(field: &str) -> Response {
    error_response(AppError::Validation(format!(
        "Missing required field: {field}"
    )))
}

/// Rejects a request whose date range is half-open.
pub(crate) fn incomplete_date_range() -> Response {
    error_response(AppError::Validation(
        "Both start_date and end_date are required for a date range".to_string(),
    ))
}
