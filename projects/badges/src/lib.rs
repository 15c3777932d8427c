//! Shield badges computed from upstream counts
//!
//! - HTTP endpoints in `endpoints/`
//! - fetch -> extract -> aggregate -> format pipeline in `pipeline/`
//! - badge definitions in `catalog`, runtime settings in `config`
//! - GITHUB_TOKEN env var is needed by the badges reading the GitHub API

pub mod catalog;
pub mod config;
pub mod endpoints;
pub mod models;
pub mod pipeline;
pub mod state;

#[cfg(test)]
mod testing;

use axum::{routing::get, Router};

use endpoints::badges::{list::index::handler as badges_list_handler, read::index::handler as badges_read_handler};
use state::AppState;

pub fn app(state: AppState) -> Router {
	Router::new()
		.route("/badges", get(badges_list_handler))
		.route("/badges/{name}", get(badges_read_handler))
		.with_state(state)
}
