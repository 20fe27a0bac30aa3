//! HTTP surface of the daemon.
//!
//! A thin axum layer over [`CatalogRepository`]: routing, query/body
//! extraction and error-to-status mapping live here, all catalog
//! semantics stay in [`crate::catalog`].

mod error;
mod handlers;

pub use error::{ApiError, ApiResult};
pub use handlers::ListItemsQuery;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::catalog::CatalogRepository;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<CatalogRepository>,
}

impl AppState {
    #[must_use]
    pub fn new(repository: Arc<CatalogRepository>) -> Self {
        Self { repository }
    }
}

/// Build the router with all catalog routes and request tracing.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/items",
            get(handlers::list_items).post(handlers::create_item),
        )
        .route(
            "/items/:id",
            get(handlers::get_item)
                .put(handlers::update_item)
                .delete(handlers::delete_item),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
