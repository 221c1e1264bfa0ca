//! Resolves declared target clusters to live admin connections.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use topicsync_core::{AdminProvider, ProviderError, TargetCluster, TopicAdmin};

use crate::client::KafkaTopicAdmin;
use crate::error::ClientError;

fn default_timeout_secs() -> u64 {
    30
}

/// One reachable cluster, keyed by `(name, env)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    pub name: String,
    #[serde(rename = "env")]
    pub environment: String,
    pub bootstrap_servers: String,
    /// Extra librdkafka properties, e.g. security settings.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    /// Timeout for admin operations against this cluster.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// All clusters this run may reconcile against.
#[derive(Debug, Clone, Default)]
pub struct ClusterRegistry {
    clusters: Vec<ClusterConfig>,
}

impl ClusterRegistry {
    pub fn new(clusters: Vec<ClusterConfig>) -> Self {
        Self { clusters }
    }

    /// Look up `(name, env)` and open an admin connection to it.
    pub fn admin_for(&self, target: &TargetCluster) -> Result<KafkaTopicAdmin, ClientError> {
        let cluster = self
            .clusters
            .iter()
            .find(|c| c.name == target.name && c.environment == target.environment)
            .ok_or_else(|| ClientError::UnknownCluster {
                name: target.name.clone(),
                environment: target.environment.clone(),
            })?;
        info!(
            cluster = %cluster.name,
            environment = %cluster.environment,
            "resolved target cluster"
        );
        KafkaTopicAdmin::connect(cluster)
    }
}

#[async_trait]
impl AdminProvider for ClusterRegistry {
    async fn resolve(&self, target: &TargetCluster) -> Result<Box<dyn TopicAdmin>, ProviderError> {
        let admin = self.admin_for(target).map_err(|e| match e {
            ClientError::UnknownCluster { name, environment } => {
                ProviderError::UnknownCluster { name, environment }
            }
            other => ProviderError::Connect(other.to_string()),
        })?;
        Ok(Box::new(admin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ClusterRegistry {
        ClusterRegistry::new(vec![ClusterConfig {
            name: "analytics".into(),
            environment: "prod".into(),
            bootstrap_servers: "localhost:9092".into(),
            properties: BTreeMap::new(),
            timeout_secs: 5,
        }])
    }

    fn target(name: &str, environment: &str) -> TargetCluster {
        TargetCluster {
            name: name.into(),
            environment: environment.into(),
        }
    }

    #[test]
    fn known_pair_resolves_without_a_reachable_broker() {
        // Client creation is lazy, so this succeeds offline.
        assert!(registry().admin_for(&target("analytics", "prod")).is_ok());
    }

    #[test]
    fn unknown_pair_is_a_resolution_error() {
        let err = registry().admin_for(&target("analytics", "staging")).unwrap_err();
        assert!(matches!(
            err,
            ClientError::UnknownCluster { ref environment, .. } if environment == "staging"
        ));

        let err = registry().admin_for(&target("billing", "prod")).unwrap_err();
        assert!(matches!(err, ClientError::UnknownCluster { ref name, .. } if name == "billing"));
    }

    #[test]
    fn cluster_config_deserializes_with_defaults() {
        let yaml = r#"
name: analytics
env: prod
bootstrap_servers: "broker-1:9092,broker-2:9092"
"#;
        let config: ClusterConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.environment, "prod");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.properties.is_empty());
    }

    #[test]
    fn cluster_config_accepts_security_properties() {
        let yaml = r#"
name: analytics
env: prod
bootstrap_servers: "broker-1:9093"
properties:
  security.protocol: SASL_SSL
  sasl.mechanism: SCRAM-SHA-256
timeout_secs: 10
"#;
        let config: ClusterConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config.properties.get("security.protocol").map(String::as_str),
            Some("SASL_SSL")
        );
        assert_eq!(config.timeout_secs, 10);
    }
}
