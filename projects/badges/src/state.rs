use std::sync::Arc;

use interfaces_upstream::index::Fetch;

use crate::catalog::Catalog;

/// Shared, read-only for the lifetime of the server.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<dyn Fetch>,
    pub catalog: Arc<Catalog>,
    pub github_token: Option<Arc<str>>,
}

impl AppState {
    pub fn new(fetcher: Arc<dyn Fetch>, catalog: Catalog, github_token: Option<String>) -> Self {
        Self {
            fetcher,
            catalog: Arc::new(catalog),
            github_token: github_token.map(Arc::from),
        }
    }
}
