use futures::future::try_join_all;
use interfaces_github::packages::{parse_versions, select_version_pages, TagFilter};
use interfaces_upstream::index::{Fetch, UpstreamRequest, UpstreamResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::PipelineError;

/// A fixed upstream URL plus the headers it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upstream {
    pub url: String,
    /// Send the configured token as a bearer credential.
    #[serde(default)]
    pub auth: bool,
    #[serde(default)]
    pub accept: Option<String>,
}

impl Upstream {
    pub fn public(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            auth: false,
            accept: None,
        }
    }

    pub fn authenticated(url: impl Into<String>) -> Self {
        Self {
            auth: true,
            ..Self::public(url)
        }
    }

    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    fn request(&self, token: Option<&str>) -> Result<UpstreamRequest, PipelineError> {
        let mut request = UpstreamRequest::get(&self.url);
        if self.auth {
            let token = token.ok_or_else(|| PipelineError::MissingToken {
                url: self.url.clone(),
            })?;
            request = request.with_bearer(token);
        }
        if let Some(accept) = &self.accept {
            request = request.with_accept(accept);
        }
        Ok(request)
    }
}

/// Where the bodies of a metric come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Source {
    Url(Upstream),
    /// Pages of the newest tagged versions of a GitHub container package.
    PackageVersions {
        listing: Upstream,
        #[serde(default)]
        tags: TagFilter,
        limit: usize,
    },
}

pub async fn fetch_body(fetcher: &dyn Fetch, request: &UpstreamRequest) -> Result<String, PipelineError> {
    let UpstreamResult { body, status } = fetcher.fetch(request).await?;

    if !status.is_success() {
        warn!(url = %request.url, %status, "upstream answered with an error status");
        return Err(PipelineError::UpstreamStatus {
            url: request.url.clone(),
            status,
        });
    }

    Ok(body)
}

/// All bodies of `source`. Version pages are fetched concurrently and any failure fails the lot.
pub async fn fetch_bodies(
    fetcher: &dyn Fetch,
    source: &Source,
    token: Option<&str>,
) -> Result<Vec<String>, PipelineError> {
    match source {
        Source::Url(upstream) => {
            let body = fetch_body(fetcher, &upstream.request(token)?).await?;
            Ok(vec![body])
        }
        Source::PackageVersions { listing, tags, limit } => {
            let listing_body = fetch_body(fetcher, &listing.request(token)?).await?;
            let versions = parse_versions(&listing_body)?;
            let pages = select_version_pages(&versions, tags, *limit);
            debug!(listed = versions.len(), selected = pages.len(), "fetching version pages");

            try_join_all(pages.into_iter().map(|page| async move {
                fetch_body(fetcher, &UpstreamRequest::get(page)).await
            }))
            .await
        }
    }
}
