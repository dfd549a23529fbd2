use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use bookshop_core::BookId;
use bookshop_infra::RequestContext;
use bookshop_orders::Order;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/", post(submit_order))
}

pub async fn submit_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<dto::SubmitOrderRequest>,
) -> axum::response::Response {
    let book_id: BookId = match body.book_id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid book id"),
    };

    let order = Order::new(book_id, body.quantity);

    match services.orders().submit(&ctx, order).await {
        Ok(receipt) => (StatusCode::CREATED, Json(dto::receipt_to_json(&receipt))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
