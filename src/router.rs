// src/router.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::htmx_handlers::*;
use crate::state::AppState;

pub fn build_router(app_state: AppState) -> Router {
    let body_limit = app_state.max_upload_bytes;

    Router::new()
        .route("/", get(serve_index))
        .route("/htmx/products", get(refresh_products_htmx_handler))
        .route("/htmx/form/new", post(start_create_htmx_handler))
        .route("/htmx/form/cancel", post(cancel_form_htmx_handler))
        .route("/htmx/form/submit", post(submit_form_htmx_handler))
        .route("/htmx/products/{id}/edit", post(start_edit_htmx_handler))
        .route(
            "/htmx/products/{id}/delete",
            post(delete_product_htmx_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(app_state)
}
