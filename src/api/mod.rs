//! HTTP API server

use axum::{
    routing::{delete, get},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::store::CommentStore;

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

/// Build the API router, mounting the comments resource at `base_path`
///
/// The collection answers both with and without a trailing slash.
pub fn create_router(state: AppState, base_path: &str) -> Router {
    let base = base_path.trim_end_matches('/');

    let mut router = Router::new().route("/health", get(handlers::health));
    if !base.is_empty() {
        router = router.route(
            base,
            get(handlers::list_comments).post(handlers::create_comment),
        );
    }

    let router = router
        .route(
            &format!("{}/", base),
            get(handlers::list_comments).post(handlers::create_comment),
        )
        .route(&format!("{}/:id", base), delete(handlers::delete_comment));

    router
        .layer(
            ServiceBuilder::new().layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            ),
        )
        .with_state(state)
}

/// Convenience helper mounting the comments resource at the root
pub fn create_root_router(store: Arc<dyn CommentStore>) -> Router {
    create_router(AppState::new(store, "comments"), "/")
}
