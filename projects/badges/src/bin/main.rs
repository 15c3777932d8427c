use std::sync::Arc;

use axum::serve;
use interfaces_upstream::index::{FetchUpstreamError, HttpFetcher, DEFAULT_USER_AGENT};
use projects_badges::{app, config::{Settings, SettingsError}, state::AppState};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum MainError {
	#[error("Settings: {source}")]
	Settings {
		#[source]
		source: SettingsError,
	},
	#[error("TracingInit: {source}")]
	TracingInit {
		#[source]
		source: utils_trace::TracingInitError,
	},
	#[error("HttpClient: {source}")]
	HttpClient {
		#[source]
		source: FetchUpstreamError,
	},
	#[error("TcpListenerBind: {source}")]
	TcpListenerBind {
		#[source]
		source: std::io::Error,
	},
	#[error("Serve: {source}")]
	Serve {
		#[source]
		source: std::io::Error,
	}
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
	let settings = Settings::from_env()
		.map_err(|source| MainError::Settings { source })?;

	utils_trace::init(&settings.log_level, settings.log_format)
		.map_err(|source| MainError::TracingInit { source })?;

	let catalog = settings
		.load_catalog()
		.map_err(|source| MainError::Settings { source })?;

	if settings.github_token.is_none() {
		warn!("GITHUB_TOKEN is not set, badges reading the GitHub API will fail");
	}

	let fetcher = HttpFetcher::new(DEFAULT_USER_AGENT)
		.map_err(|source| MainError::HttpClient { source })?;

	info!(badges = ?catalog.names(), "serving badges");
	let state = AppState::new(Arc::new(fetcher), catalog, settings.github_token.clone());

	let listener = tokio::net::TcpListener::bind(settings.addr)
		.await
		.map_err(|source| MainError::TcpListenerBind { source })?;

	info!("Server running on addr: {}", settings.addr);

	serve(listener, app(state))
		.await
		.map_err(|source| MainError::Serve { source })?;

	Ok(())
}
