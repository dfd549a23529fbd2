use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use bookshop_core::DomainError;

/// Map the domain error taxonomy onto status-coded JSON responses.
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::InvalidQuantity(q) => json_error(
            StatusCode::BAD_REQUEST,
            "invalid_quantity",
            format!("quantity must be positive, got {q}"),
        ),
        DomainError::InsufficientStock {
            available,
            requested,
        } => json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "insufficient_stock",
            format!("{available} available, {requested} requested"),
        ),
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::Storage(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", msg)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
