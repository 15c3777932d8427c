use interfaces_github::packages::{package_page_url, versions_url, TagFilter, GITHUB_JSON_ACCEPT};
use interfaces_github::search::{workflow_search_url, TOTAL_COUNT_POINTER};
use serde::{Deserialize, Serialize};

use crate::pipeline::aggregator::Period;
use crate::pipeline::extractor::Extractor;
use crate::pipeline::fetcher::{Source, Upstream};
use crate::pipeline::formatter::Style;

pub const DEFAULT_COLOR: &str = "blue";

/// One number a badge needs: where to fetch it and how to read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub source: Source,
    pub extractor: Extractor,
}

/// A period total turned into a per-day rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rate {
    pub metric: Metric,
    pub period: Period,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeConfig {
    pub name: String,
    pub subject: String,
    #[serde(default = "default_color")]
    pub color: String,
    pub total: Metric,
    #[serde(default)]
    pub rate: Option<Rate>,
    pub style: Style,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub badges: Vec<BadgeConfig>,
}

impl Catalog {
    pub fn get(&self, name: &str) -> Option<&BadgeConfig> {
        self.badges.iter().find(|badge| badge.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.badges.iter().map(|badge| badge.name.as_str()).collect()
    }

    /// The badges of the publish-unit-test-result action, pointed at `endpoints`.
    pub fn builtin(endpoints: &Endpoints) -> Self {
        let counter = |key: &str| Upstream::public(endpoints.counter_url(key));
        let package_page = package_page_url(
            &endpoints.github_web,
            &endpoints.owner,
            &endpoints.repository,
            &endpoints.package,
        );
        let last_30_days = Extractor::LabelledSibling {
            tag: "span".to_string(),
            label: "Last 30 days".to_string(),
        };

        let badges = vec![
            BadgeConfig {
                name: "workflows".to_string(),
                subject: WORKFLOWS_SUBJECT.to_string(),
                color: default_color(),
                total: Metric {
                    source: Source::Url(Upstream::authenticated(workflow_search_url(
                        &endpoints.github_api,
                        &endpoints.repository,
                    ))),
                    extractor: Extractor::JsonField {
                        pointer: TOTAL_COUNT_POINTER.to_string(),
                    },
                },
                rate: None,
                style: Style::Count,
            },
            BadgeConfig {
                name: "workflows-counter".to_string(),
                subject: WORKFLOWS_SUBJECT.to_string(),
                color: default_color(),
                total: Metric {
                    source: Source::Url(counter("workflows")),
                    extractor: Extractor::Integer,
                },
                rate: None,
                style: Style::Grouped,
            },
            BadgeConfig {
                name: "pulls-counter".to_string(),
                subject: PULLS_SUBJECT.to_string(),
                color: default_color(),
                total: Metric {
                    source: Source::Url(counter("pull.count")),
                    extractor: Extractor::Integer,
                },
                rate: None,
                style: Style::Compact {
                    unit: Some("/month".to_string()),
                },
            },
            BadgeConfig {
                name: "pulls".to_string(),
                subject: PULLS_SUBJECT.to_string(),
                color: default_color(),
                total: Metric {
                    source: Source::Url(counter("pull.total")),
                    extractor: Extractor::Integer,
                },
                rate: Some(Rate {
                    metric: Metric {
                        source: Source::Url(counter("pull.month")),
                        extractor: Extractor::Integer,
                    },
                    period: Period::Days { days: 30 },
                }),
                style: Style::Compact { unit: None },
            },
            BadgeConfig {
                name: "pulls-versions".to_string(),
                subject: PULLS_SUBJECT.to_string(),
                color: default_color(),
                total: Metric {
                    source: Source::PackageVersions {
                        listing: Upstream::authenticated(versions_url(
                            &endpoints.github_api,
                            &endpoints.owner,
                            &endpoints.package,
                        ))
                        .with_accept(GITHUB_JSON_ACCEPT),
                        tags: TagFilter {
                            exclude: ["v1.7", "v1.8", "v1.9", "v1.13", "v1.14"]
                                .into_iter()
                                .map(String::from)
                                .collect(),
                            ..TagFilter::default()
                        },
                        limit: 10,
                    },
                    extractor: last_30_days,
                },
                rate: None,
                style: Style::Compact {
                    unit: Some("/month".to_string()),
                },
            },
            BadgeConfig {
                name: "pulls-page".to_string(),
                subject: PULLS_SUBJECT.to_string(),
                color: default_color(),
                total: Metric {
                    source: Source::Url(Upstream::public(package_page.clone())),
                    extractor: Extractor::LabelledAttribute {
                        tag: "span".to_string(),
                        label: "Total downloads".to_string(),
                        target: "h3".to_string(),
                        attribute: "title".to_string(),
                    },
                },
                rate: Some(Rate {
                    metric: Metric {
                        source: Source::Url(Upstream::public(package_page)),
                        extractor: Extractor::AttributeSeries {
                            tag: "rect".to_string(),
                            attribute: "data-merge-count".to_string(),
                        },
                    },
                    period: Period::Buckets,
                }),
                style: Style::Compact { unit: None },
            },
        ];

        Self { badges }
    }
}

pub const WORKFLOWS_SUBJECT: &str = "GitHub Workflows";
pub const PULLS_SUBJECT: &str = "Docker pulls";

/// Upstream locations the built-in badges are parameterized with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub counter_host: String,
    pub counter_prefix: String,
    pub github_api: String,
    pub github_web: String,
    pub owner: String,
    pub repository: String,
    pub package: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            counter_host: "http://github.com-enricomi.s3-website.eu-central-1.amazonaws.com".to_string(),
            counter_prefix: "publish-unit-test-result".to_string(),
            github_api: "https://api.github.com".to_string(),
            github_web: "https://github.com".to_string(),
            owner: "EnricoMi".to_string(),
            repository: "publish-unit-test-result-action".to_string(),
            package: "publish-unit-test-result-action".to_string(),
        }
    }
}

impl Endpoints {
    /// Counter files are named `<prefix>.<key>`, e.g. `publish-unit-test-result.pull.total`.
    pub fn counter_url(&self, key: &str) -> String {
        format!(
            "{}/{}.{key}",
            self.counter_host.trim_end_matches('/'),
            self.counter_prefix
        )
    }
}
