use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const GITHUB_JSON_ACCEPT: &str = "application/vnd.github.v3+json";

/// One entry of `GET /users/{owner}/packages/container/{package}/versions`.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageVersion {
    pub html_url: String,
    #[serde(default)]
    pub metadata: VersionMetadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionMetadata {
    #[serde(default)]
    pub package_type: String,
    #[serde(default)]
    pub container: ContainerMetadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContainerMetadata {
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PackageVersion {
    pub fn is_container(&self) -> bool {
        self.metadata.package_type == "container"
    }
}

/// Which version tags count as a release worth reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFilter {
    pub prefix: String,
    pub contains: String,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for TagFilter {
    fn default() -> Self {
        Self {
            prefix: "v".to_string(),
            contains: ".".to_string(),
            exclude: Vec::new(),
        }
    }
}

impl TagFilter {
    pub fn matches(&self, tag: &str) -> bool {
        tag.starts_with(&self.prefix)
            && tag.contains(&self.contains)
            && !self.exclude.iter().any(|excluded| excluded == tag)
    }
}

#[derive(Debug, Error)]
pub enum ParseVersionsError {
    #[error("DeserializeVersions: {source}")]
    DeserializeVersions {
        #[from]
        source: serde_json::Error,
    },
}

pub fn parse_versions(body: &str) -> Result<Vec<PackageVersion>, ParseVersionsError> {
    Ok(serde_json::from_str(body)?)
}

/// Page URLs of the first `limit` container versions carrying a tag accepted by `filter`.
/// The listing order is kept, newest first as GitHub returns it.
pub fn select_version_pages(versions: &[PackageVersion], filter: &TagFilter, limit: usize) -> Vec<String> {
    versions
        .iter()
        .filter(|version| version.is_container())
        .filter(|version| version.metadata.container.tags.iter().any(|tag| filter.matches(tag)))
        .take(limit)
        .map(|version| version.html_url.clone())
        .collect()
}

pub fn versions_url(api_base: &str, owner: &str, package: &str) -> String {
    format!(
        "{}/users/{owner}/packages/container/{package}/versions",
        api_base.trim_end_matches('/')
    )
}

pub fn package_page_url(web_base: &str, owner: &str, repository: &str, package: &str) -> String {
    format!(
        "{}/{owner}/{repository}/pkgs/container/{package}",
        web_base.trim_end_matches('/')
    )
}
