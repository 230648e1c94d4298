//! Contest context handlers

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::{services::ContextService, state::AppState};

/// JSON view of the served contest
#[derive(Debug, Serialize)]
pub struct ContestContextResponse {
    /// `ALL` or the requested contest id
    pub selection: String,
    /// Whether a contest row backs this context
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub description: String,
}

/// The contest description, as the response body
async fn describe(State(state): State<AppState>) -> String {
    ContextService::describe(state.context()).to_string()
}

async fn get_contest(State(state): State<AppState>) -> Json<ContestContextResponse> {
    let context = state.context();
    let found = context.is_found();
    let contest = context.contest();

    Json(ContestContextResponse {
        selection: context.selector().to_string(),
        found,
        id: found.then_some(contest.id),
        name: found.then(|| contest.name.clone()),
        description: ContextService::describe(context).to_string(),
    })
}

/// Context routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(describe))
        .route("/api/v1/contest", get(get_contest))
}
