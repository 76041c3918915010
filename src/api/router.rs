//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the API router.
pub fn api_router(core: Arc<CoreState>) -> Router {
    build_router(ApiContext::new(core))
}

fn build_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/search", post(endpoints::search::search))
        .route(
            "/medications",
            get(endpoints::medications::list)
                .post(endpoints::medications::add)
                .delete(endpoints::medications::clear),
        )
        .route("/medications/:name", delete(endpoints::medications::remove))
        .with_state(ctx)
        .layer(TraceLayer::new_for_http())
}
