use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_USER_AGENT: &str = "badges-rust-client";

/// A single GET against an upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub url: String,
    pub bearer: Option<String>,
    pub accept: Option<String>,
}

impl UpstreamRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            bearer: None,
            accept: None,
        }
    }

    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }
}

pub struct UpstreamResult {
    pub body: String,
    pub status: StatusCode,
}

#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, request: &UpstreamRequest) -> Result<UpstreamResult, FetchUpstreamError>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str) -> Result<Self, FetchUpstreamError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|source| FetchUpstreamError::ClientBuild { source })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, request: &UpstreamRequest) -> Result<UpstreamResult, FetchUpstreamError> {
        debug!(url = %request.url, authenticated = request.bearer.is_some(), "fetching upstream");

        let mut builder = self.client.get(&request.url);
        if let Some(token) = &request.bearer {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(accept) = &request.accept {
            builder = builder.header(header::ACCEPT, accept);
        }

        let response = builder
            .send()
            .await
            .map_err(|source| FetchUpstreamError::RequestSend {
                url: request.url.clone(),
                source,
            })?;

        let status = response.status();

        let body = response
            .text()
            .await
            .map_err(|source| FetchUpstreamError::ResponseRead {
                url: request.url.clone(),
                source,
            })?;

        Ok(UpstreamResult { body, status })
    }
}

#[derive(Debug, Error)]
pub enum FetchUpstreamError {
    #[error("ClientBuild: {source}")]
    ClientBuild {
        source: reqwest::Error,
    },

    #[error("RequestSend: {url}: {source}")]
    RequestSend {
        url: String,
        source: reqwest::Error,
    },

    #[error("ResponseRead: {url}: {source}")]
    ResponseRead {
        url: String,
        source: reqwest::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_sets_headers() {
        let request = UpstreamRequest::get("https://example.invalid/count")
            .with_bearer("secret")
            .with_accept("application/vnd.github.v3+json");

        assert_eq!(request.url, "https://example.invalid/count");
        assert_eq!(request.bearer.as_deref(), Some("secret"));
        assert_eq!(request.accept.as_deref(), Some("application/vnd.github.v3+json"));
    }

    #[tokio::test]
    async fn malformed_url_fails_on_send() {
        let fetcher = HttpFetcher::new(DEFAULT_USER_AGENT).expect("client builds");
        let result = fetcher.fetch(&UpstreamRequest::get("not a url")).await;

        match result {
            Err(FetchUpstreamError::RequestSend { url, .. }) => assert_eq!(url, "not a url"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("malformed url must not succeed"),
        }
    }
}
