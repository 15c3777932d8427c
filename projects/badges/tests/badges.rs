use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use interfaces_upstream::index::{Fetch, FetchUpstreamError, HttpFetcher, UpstreamRequest, UpstreamResult, DEFAULT_USER_AGENT};
use projects_badges::{
    catalog::Catalog,
    endpoints::badges::read::index::{handler, HandlerError},
    pipeline::{run_badge, PipelineError},
    state::AppState,
};

const CATALOG: &str = r#"
[[badges]]
name = "downloads"
subject = "Downloads"
style = { kind = "compact", unit = "/month" }

[badges.total]
source = { kind = "url", url = "https://counts.example/downloads" }
extractor = { kind = "integer" }

[[badges]]
name = "broken"
subject = "Broken"
style = { kind = "count" }

[badges.total]
source = { kind = "url", url = "not a url" }
extractor = { kind = "integer" }
"#;

/// Answers every request with the same body.
struct FixedFetcher(&'static str);

#[async_trait]
impl Fetch for FixedFetcher {
    async fn fetch(&self, _request: &UpstreamRequest) -> Result<UpstreamResult, FetchUpstreamError> {
        Ok(UpstreamResult {
            body: self.0.to_string(),
            status: StatusCode::OK,
        })
    }
}

fn catalog() -> anyhow::Result<Catalog> {
    Ok(toml::from_str(CATALOG)?)
}

#[tokio::test]
async fn configured_badge_is_served_as_json() -> anyhow::Result<()> {
    let state = AppState::new(Arc::new(FixedFetcher("1234567")), catalog()?, None);

    let response = handler(State(state), Path("downloads".to_string())).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(
        std::str::from_utf8(&body)?,
        r#"{"subject":"Downloads","status":"1.2M/month","color":"blue"}"#
    );
    Ok(())
}

#[tokio::test]
async fn transport_failure_propagates_without_a_badge() -> anyhow::Result<()> {
    let catalog = catalog()?;
    let fetcher = HttpFetcher::new(DEFAULT_USER_AGENT)?;

    let result = run_badge(&fetcher, None, catalog.get("broken").expect("configured")).await;
    assert!(matches!(result, Err(PipelineError::Fetch { .. })));

    let state = AppState::new(Arc::new(fetcher), catalog, None);
    let err = handler(State(state), Path("broken".to_string()))
        .await
        .expect_err("a failed fetch must not produce a badge");
    assert!(matches!(err, HandlerError::RunBadge { .. }));
    assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    Ok(())
}
