//! HTTP Request Handlers
//!
//! Thin transport over the contest context: the description as plain text
//! at `/`, a JSON view under `/api/v1`, a health probe, and static assets.

pub mod context;
pub mod health;

use std::path::Path;

use axum::Router;
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Create all API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(context::routes())
}

/// Create the full application router
pub fn app(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .merge(routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}
