use axum::{middleware::Next, response::Response};

use bookshop_infra::RequestContext;

/// Attach a fresh `RequestContext` to every request.
///
/// Handlers pull it out of extensions and thread it explicitly through store
/// calls; nothing downstream reaches for ambient request state.
pub async fn request_context(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let ctx = RequestContext::new();

    tracing::debug!(
        request_id = %ctx.request_id(),
        method = %req.method(),
        path = %req.uri().path(),
        "request received"
    );

    req.extensions_mut().insert(ctx);
    next.run(req).await
}
