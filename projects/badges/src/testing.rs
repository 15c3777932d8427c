use std::sync::Mutex;

use async_trait::async_trait;
use interfaces_upstream::index::{Fetch, FetchUpstreamError, UpstreamRequest, UpstreamResult};
use reqwest::StatusCode;

enum Route {
    Exact(String),
    Prefix(String),
}

impl Route {
    fn matches(&self, url: &str) -> bool {
        match self {
            Route::Exact(exact) => url == exact,
            Route::Prefix(prefix) => url.starts_with(prefix.as_str()),
        }
    }
}

/// Canned upstream answers keyed by URL. Unknown URLs answer 404.
#[derive(Default)]
pub struct StubFetcher {
    routes: Vec<(Route, StatusCode, String)>,
    requests: Mutex<Vec<UpstreamRequest>>,
}

impl StubFetcher {
    pub fn with(self, url: &str, body: &str) -> Self {
        self.with_status(url, StatusCode::OK, body)
    }

    pub fn with_status(mut self, url: &str, status: StatusCode, body: &str) -> Self {
        self.routes.push((Route::Exact(url.to_string()), status, body.to_string()));
        self
    }

    pub fn with_prefix(mut self, prefix: &str, body: &str) -> Self {
        self.routes.push((Route::Prefix(prefix.to_string()), StatusCode::OK, body.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<UpstreamRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetch for StubFetcher {
    async fn fetch(&self, request: &UpstreamRequest) -> Result<UpstreamResult, FetchUpstreamError> {
        self.requests.lock().unwrap().push(request.clone());

        let (status, body) = self
            .routes
            .iter()
            .find(|(route, _, _)| route.matches(&request.url))
            .map(|(_, status, body)| (*status, body.clone()))
            .unwrap_or((StatusCode::NOT_FOUND, String::new()));

        Ok(UpstreamResult { body, status })
    }
}
