//! Fetch -> extract -> aggregate -> format, parameterized by a `BadgeConfig`.

pub mod aggregator;
pub mod extractor;
pub mod fetcher;
pub mod formatter;
pub mod responder;

use interfaces_github::packages::ParseVersionsError;
use interfaces_upstream::index::{Fetch, FetchUpstreamError};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::info;

use crate::catalog::BadgeConfig;
use crate::models::badge::BadgeDescriptor;
use aggregator::AggregateError;
use extractor::{ExtractError, Extractor};
use fetcher::fetch_bodies;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Fetch: {source}")]
    Fetch {
        #[from]
        source: FetchUpstreamError,
    },

    #[error("UpstreamStatus: {url} answered {status}")]
    UpstreamStatus { url: String, status: StatusCode },

    #[error("MissingToken: {url} needs a GitHub token")]
    MissingToken { url: String },

    #[error("InvalidListing: {source}")]
    InvalidListing {
        #[from]
        source: ParseVersionsError,
    },

    #[error("Extract: {source}")]
    Extract {
        #[from]
        source: ExtractError,
    },

    #[error("Aggregate: {source}")]
    Aggregate {
        #[from]
        source: AggregateError,
    },
}

/// Runs one badge end to end. Nothing is returned unless every fetch and extraction succeeded.
pub async fn run_badge(
    fetcher: &dyn Fetch,
    token: Option<&str>,
    badge: &BadgeConfig,
) -> Result<BadgeDescriptor, PipelineError> {
    let (total_bodies, rate_bodies) = match &badge.rate {
        None => (fetch_bodies(fetcher, &badge.total.source, token).await?, None),
        Some(rate) if rate.metric.source == badge.total.source => {
            let bodies = fetch_bodies(fetcher, &badge.total.source, token).await?;
            (bodies.clone(), Some(bodies))
        }
        Some(rate) => {
            let (total, rate) = futures::try_join!(
                fetch_bodies(fetcher, &badge.total.source, token),
                fetch_bodies(fetcher, &rate.metric.source, token),
            )?;
            (total, Some(rate))
        }
    };

    let total = aggregator::sum(&extract_all(&badge.total.extractor, &total_bodies)?)?;

    let rate = match (&badge.rate, rate_bodies) {
        (Some(rate), Some(bodies)) => Some(aggregator::rate(
            &extract_all(&rate.metric.extractor, &bodies)?,
            rate.period,
        )?),
        _ => None,
    };

    let status = formatter::compose_status(&badge.style, total, rate);
    info!(badge = %badge.name, %status, "badge computed");

    Ok(BadgeDescriptor {
        subject: badge.subject.clone(),
        status,
        color: badge.color.clone(),
    })
}

fn extract_all(extractor: &Extractor, bodies: &[String]) -> Result<Vec<u64>, ExtractError> {
    let mut counts = Vec::new();
    for body in bodies {
        counts.extend(extractor.extract(body)?.into_counts());
    }
    Ok(counts)
}
