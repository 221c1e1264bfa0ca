//! Pull-request change detection against the Bitbucket Server REST API.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::GitOpsError;

/// How a spec file changed in the pull request.
///
/// Deletions are dropped at this boundary: the engine has no delete
/// semantics, so a removed spec file must never trigger reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
}

impl ChangeKind {
    fn from_git_change_type(value: &str) -> Option<Self> {
        match value {
            "ADD" => Some(ChangeKind::Added),
            "MODIFY" => Some(ChangeKind::Modified),
            _ => None,
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Added => write!(f, "added"),
            ChangeKind::Modified => write!(f, "modified"),
        }
    }
}

/// Client for the Bitbucket Server REST API (v1.0), scoped to one
/// project/repository pair.
pub struct ChangesClient {
    http: reqwest::Client,
    base_url: String,
    project_key: String,
    repository_slug: String,
    username: String,
    password: String,
}

impl ChangesClient {
    pub fn new(
        base_url: &str,
        project_key: &str,
        repository_slug: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, GitOpsError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            project_key: project_key.to_string(),
            repository_slug: repository_slug.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// The pull request a commit belongs to, if any.
    pub async fn pull_request_for_commit(
        &self,
        commit_id: &str,
    ) -> Result<Option<u64>, GitOpsError> {
        let url = format!(
            "{}/rest/api/1.0/projects/{}/repos/{}/commits/{}/pull-requests",
            self.base_url, self.project_key, self.repository_slug, commit_id
        );
        debug!(%url, "looking up pull request for commit");
        let page: Page<PullRequestSummary> = self.get_json(&url).await?;
        Ok(page.values.first().map(|pr| pr.id))
    }

    /// Changed file paths of a pull request, restricted to additions and
    /// modifications.
    pub async fn changed_files(
        &self,
        pull_request_id: u64,
    ) -> Result<BTreeMap<String, ChangeKind>, GitOpsError> {
        let url = format!(
            "{}/rest/api/1.0/projects/{}/repos/{}/pull-requests/{}/changes",
            self.base_url, self.project_key, self.repository_slug, pull_request_id
        );
        debug!(%url, "fetching pull request changes");
        let page: Page<Change> = self.get_json(&url).await?;

        let mut files = BTreeMap::new();
        for change in page.values {
            let Some(git_change_type) = change
                .properties
                .as_ref()
                .and_then(|p| p.git_change_type.as_deref())
            else {
                warn!(path = %change.path.full_path, "change entry without a git change type");
                continue;
            };
            match ChangeKind::from_git_change_type(git_change_type) {
                Some(kind) => {
                    files.insert(change.path.full_path, kind);
                }
                None => {
                    debug!(
                        path = %change.path.full_path,
                        change_type = git_change_type,
                        "ignoring change type"
                    );
                }
            }
        }
        Ok(files)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, GitOpsError> {
        let response = self
            .http
            .get(url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GitOpsError::Api(format!("{url} returned {status}")));
        }
        Ok(response.json().await?)
    }
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::Deserialize<'de>"))]
struct Page<T> {
    #[serde(default)]
    values: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct PullRequestSummary {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct Change {
    properties: Option<ChangeProperties>,
    path: ChangePath,
}

#[derive(Debug, Deserialize)]
struct ChangeProperties {
    #[serde(rename = "gitChangeType")]
    git_change_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChangePath {
    #[serde(rename = "toString")]
    full_path: String,
}
