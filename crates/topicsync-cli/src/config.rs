//! Application configuration.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use topicsync_kafka::ClusterConfig;

/// Everything the tool needs besides credentials and the commit id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Bitbucket REST API access.
    pub bitbucket: BitbucketConfig,

    /// The repository holding the topic spec files.
    pub repository: RepositoryConfig,

    /// Clusters reconciliation may target.
    pub clusters: Vec<ClusterConfig>,

    /// Halt the run on the first execution fault instead of carrying on
    /// with the remaining topics.
    #[serde(default)]
    pub fail_fast: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BitbucketConfig {
    pub base_url: String,
    pub project_key: String,
    pub repository_slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub url: String,
    pub branch: String,
    /// Local checkout directory for the spec repository.
    pub target_dir: PathBuf,
}

impl AppConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&text)
            .with_context(|| format!("cannot parse config file {}", path.display()))?;
        Ok(config)
    }
}
