use axum::{
	body::Body,
	extract::{Path, State},
	http::{Response, StatusCode},
	response::IntoResponse,
};
use thiserror::Error;
use tracing::error;

use crate::pipeline::{responder::{respond, RespondError}, run_badge, PipelineError};
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum HandlerError {
	#[error("BadgeNotFound: {name}")]
	BadgeNotFound {
		name: String,
	},

	#[error("RunBadge: {source}")]
	RunBadge {
		#[from]
		source: PipelineError,
	},

	#[error("Respond: {source}")]
	Respond {
		#[from]
		source: RespondError,
	},
}

impl IntoResponse for HandlerError {
	fn into_response(self) -> axum::response::Response {
		match self {
			HandlerError::BadgeNotFound{ name } => (StatusCode::NOT_FOUND, format!("Badge {name} is not configured")).into_response(),
			HandlerError::RunBadge{ source } => (StatusCode::BAD_GATEWAY, source.to_string()).into_response(),
			HandlerError::Respond{ source } => (StatusCode::INTERNAL_SERVER_ERROR, source.to_string()).into_response(),
		}
	}
}

/// Axum handler: GET /badges/{name}
pub async fn handler(
	State(state): State<AppState>,
	Path(name): Path<String>,
) -> Result<Response<Body>, HandlerError> {
	let badge = state
		.catalog
		.get(&name)
		.ok_or_else(|| HandlerError::BadgeNotFound { name: name.clone() })?;

	let descriptor = run_badge(state.fetcher.as_ref(), state.github_token.as_deref(), badge)
		.await
		.inspect_err(|err| error!(badge = %name, "badge failed: {err}"))?;

	Ok(respond(&descriptor)?)
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use super::*;
	use crate::catalog::{Catalog, Endpoints};
	use crate::testing::StubFetcher;

	fn state(fetcher: StubFetcher, token: Option<&str>) -> AppState {
		AppState::new(
			Arc::new(fetcher),
			Catalog::builtin(&Endpoints::default()),
			token.map(String::from),
		)
	}

	#[tokio::test]
	async fn serves_workflows_badge() {
		let fetcher = StubFetcher::default().with_prefix("https://api.github.com/search/code", r#"{"total_count": 7}"#);

		let response = handler(State(state(fetcher, Some("token"))), Path("workflows".to_string()))
			.await
			.unwrap();

		assert_eq!(response.status(), StatusCode::OK);
		let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
		assert_eq!(&body[..], br#"{"subject":"GitHub Workflows","status":7,"color":"blue"}"#);
	}

	#[tokio::test]
	async fn unknown_badge_is_not_found() {
		let result = handler(State(state(StubFetcher::default(), None)), Path("stars".to_string())).await;

		let response = result.unwrap_err().into_response();
		assert_eq!(response.status(), StatusCode::NOT_FOUND);
	}

	#[tokio::test]
	async fn upstream_failure_emits_no_badge() {
		let fetcher = StubFetcher::default();

		let result = handler(State(state(fetcher, None)), Path("pulls".to_string())).await;

		let err = result.unwrap_err();
		assert!(matches!(err, HandlerError::RunBadge { .. }));
		let response = err.into_response();
		assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
		let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
		assert!(!body.starts_with(b"{"));
	}
}
