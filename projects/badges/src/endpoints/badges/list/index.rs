use axum::{extract::State, response::IntoResponse, Json};

use crate::state::AppState;

/// Axum handler: GET /badges
pub async fn handler(State(state): State<AppState>) -> impl IntoResponse {
	Json(state.catalog.names().into_iter().map(String::from).collect::<Vec<_>>())
}
