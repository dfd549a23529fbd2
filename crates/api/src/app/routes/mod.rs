use axum::Router;

pub mod authors;
pub mod books;
pub mod orders;
pub mod system;

/// Router for all request-scoped endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/orders", orders::router())
        .nest("/books", books::router())
        .nest("/authors", authors::router())
}
