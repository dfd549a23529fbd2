use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use bookshop_catalog::Author;
use bookshop_core::AuthorId;
use bookshop_infra::RequestContext;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_author).get(list_authors))
        .route("/:id", get(get_author))
        .route("/:id/books", get(books_by_author))
}

pub async fn create_author(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Json(body): Json<dto::CreateAuthorRequest>,
) -> axum::response::Response {
    let author = match Author::new(AuthorId::new(), body.name, Utc::now()) {
        Ok(a) => a,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let id = author.id_typed();
    match services.store().insert_author(&ctx, author).await {
        Ok(()) => (
            StatusCode::CREATED,
            Json(serde_json::json!({ "id": id.to_string() })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_authors(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
) -> axum::response::Response {
    match services.store().list_authors(&ctx).await {
        Ok(authors) => {
            let body: Vec<_> = authors.iter().map(dto::author_to_json).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_author(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: AuthorId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid author id");
        }
    };

    match services.store().get_author(&ctx, id).await {
        Ok(author) => (StatusCode::OK, Json(dto::author_to_json(&author))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn books_by_author(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: AuthorId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid author id");
        }
    };

    match services.store().books_by_author(&ctx, id).await {
        Ok(books) => {
            let body: Vec<_> = books.iter().map(dto::book_to_json).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}
