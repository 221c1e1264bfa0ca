//! Parses one topic spec file into a validated [`TopicSpec`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use topicsync_core::{TargetCluster, TopicSpec};

use crate::error::GitOpsError;

/// Load and validate the topic spec at `path`.
pub fn load_topic_spec(path: &Path) -> Result<TopicSpec, GitOpsError> {
    let text = std::fs::read_to_string(path)?;
    parse_topic_spec(&text)
}

/// Parse a topic spec document.
///
/// Expected shape:
///
/// ```yaml
/// topicName: orders
/// spec:
///   partitions: 3
///   replication-factor: 2
///   target-cluster:
///     name: analytics
///     env: prod
///   config:
///     retention.ms: 604800000
/// ```
///
/// Scalar config values of any YAML type are coerced to strings, since
/// the broker reports every config value as a string.
pub fn parse_topic_spec(text: &str) -> Result<TopicSpec, GitOpsError> {
    let document: TopicDocument =
        serde_yaml::from_str(text).map_err(|e| GitOpsError::MalformedSpec(e.to_string()))?;

    let name = document
        .topic_name
        .ok_or_else(|| missing("topicName"))?;
    let spec = document.spec.ok_or_else(|| missing("spec"))?;
    let partitions = spec.partitions.ok_or_else(|| missing("spec.partitions"))?;
    let replication_factor = spec
        .replication_factor
        .ok_or_else(|| missing("spec.replication-factor"))?;
    let target = spec
        .target_cluster
        .ok_or_else(|| missing("spec.target-cluster"))?;
    let cluster_name = target
        .name
        .ok_or_else(|| missing("spec.target-cluster.name"))?;
    let environment = target
        .env
        .ok_or_else(|| missing("spec.target-cluster.env"))?;

    let mut config = BTreeMap::new();
    for (key, value) in spec.config {
        config.insert(key.clone(), scalar_to_string(&key, &value)?);
    }

    let spec = TopicSpec::new(
        name,
        to_count("spec.partitions", partitions)?,
        to_count("spec.replication-factor", replication_factor)?,
        config,
        TargetCluster {
            name: cluster_name,
            environment,
        },
    )?;
    Ok(spec)
}

fn missing(field: &str) -> GitOpsError {
    GitOpsError::MalformedSpec(format!("missing required field `{field}`"))
}

fn to_count(field: &str, value: i64) -> Result<u32, GitOpsError> {
    u32::try_from(value)
        .map_err(|_| GitOpsError::MalformedSpec(format!("field `{field}` is out of range: {value}")))
}

fn scalar_to_string(key: &str, value: &serde_yaml::Value) -> Result<String, GitOpsError> {
    match value {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(GitOpsError::MalformedSpec(format!(
            "config value for `{key}` must be a scalar, got {other:?}"
        ))),
    }
}

#[derive(Debug, Deserialize)]
struct TopicDocument {
    #[serde(rename = "topicName")]
    topic_name: Option<String>,
    spec: Option<SpecSection>,
}

#[derive(Debug, Deserialize)]
struct SpecSection {
    partitions: Option<i64>,
    #[serde(rename = "replication-factor")]
    replication_factor: Option<i64>,
    #[serde(rename = "target-cluster")]
    target_cluster: Option<TargetClusterSection>,
    #[serde(default)]
    config: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Deserialize)]
struct TargetClusterSection {
    name: Option<String>,
    env: Option<String>,
}
