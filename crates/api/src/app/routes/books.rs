use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use bookshop_catalog::Book;
use bookshop_core::{AuthorId, BookId};
use bookshop_infra::RequestContext;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_book).get(list_books))
        .route("/:id", get(get_book).delete(delete_book))
}

pub async fn create_book(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<dto::CreateBookRequest>,
) -> axum::response::Response {
    let author_id: AuthorId = match body.author_id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid author id");
        }
    };

    let book = match Book::new(BookId::new(), body.title, author_id, body.stock, Utc::now()) {
        Ok(b) => b,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let id = book.id_typed();
    match services.store().insert_book(&ctx, book).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "id": id.to_string() })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_books(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
) -> axum::response::Response {
    match services.store().list_books(&ctx).await {
        Ok(books) => {
            let body: Vec<_> = books.iter().map(dto::book_to_json).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_book(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: BookId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid book id"),
    };

    match services.store().get_book(&ctx, id).await {
        Ok(book) => (StatusCode::OK, Json(dto::book_to_json(&book))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_book(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: BookId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid book id"),
    };

    match services.store().delete_book(&ctx, id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
