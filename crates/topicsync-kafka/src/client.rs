//! rdkafka-backed administrative connection.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use rdkafka::admin::{
    AdminClient, AdminOptions, AlterConfig, NewPartitions, NewTopic, ResourceSpecifier,
    TopicReplication, TopicResult,
};
use rdkafka::client::DefaultClientContext;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{BaseConsumer, Consumer};
use rdkafka::types::RDKafkaErrorCode;
use tokio::task;
use tracing::{debug, warn};

use topicsync_core::{AdminError, ClusterTopicState, ConfigDelta, TopicAdmin, TopicSpec};

use crate::error::ClientError;
use crate::provider::ClusterConfig;

/// Session timeout for the short-lived metadata consumers. These never
/// join a consumer group, so the value only bounds the connection.
const METADATA_SESSION_TIMEOUT_MS: &str = "6000";

/// A live admin connection to one Kafka cluster.
///
/// Mutations go through an rdkafka [`AdminClient`]; metadata reads use a
/// short-lived consumer per call, since librdkafka serves metadata
/// through the consumer interface. Dropping the value closes the client.
pub struct KafkaTopicAdmin {
    admin: AdminClient<DefaultClientContext>,
    client_config: ClientConfig,
    timeout: Duration,
}

impl std::fmt::Debug for KafkaTopicAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KafkaTopicAdmin")
            .field("client_config", &self.client_config)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Partition-level facts pulled out of a metadata response.
struct PartitionSummary {
    partitions: u32,
    replication_factor: u32,
    heterogeneous_replicas: bool,
}

impl KafkaTopicAdmin {
    /// Build a client for the given cluster definition. Creation is lazy
    /// on the broker side, so this succeeds without a reachable cluster.
    pub fn connect(config: &ClusterConfig) -> Result<Self, ClientError> {
        let mut client_config = ClientConfig::new();
        client_config.set("bootstrap.servers", &config.bootstrap_servers);
        for (key, value) in &config.properties {
            client_config.set(key, value);
        }
        debug!(
            cluster = %config.name,
            environment = %config.environment,
            servers = %config.bootstrap_servers,
            "building admin client"
        );
        let admin: AdminClient<DefaultClientContext> = client_config.create()?;
        Ok(Self {
            admin,
            client_config,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    fn options(&self) -> AdminOptions {
        AdminOptions::new().operation_timeout(Some(self.timeout))
    }

    /// Fetch partition metadata for one topic on a blocking worker.
    ///
    /// `Ok(None)` means the broker reported the topic as unknown.
    async fn partition_summary(
        &self,
        name: &str,
    ) -> Result<Option<PartitionSummary>, AdminError> {
        let mut config = self.client_config.clone();
        config.set("session.timeout.ms", METADATA_SESSION_TIMEOUT_MS);
        let topic_name = name.to_string();
        let timeout = self.timeout;

        task::spawn_blocking(move || {
            let consumer: BaseConsumer = config
                .create()
                .map_err(|e| AdminError::Communication(e.to_string()))?;
            let metadata = consumer
                .fetch_metadata(Some(&topic_name), timeout)
                .map_err(|e| AdminError::Communication(e.to_string()))?;

            let topic = metadata
                .topics()
                .iter()
                .find(|t| t.name() == topic_name)
                .ok_or_else(|| {
                    AdminError::Communication(format!(
                        "broker returned no metadata for `{topic_name}`"
                    ))
                })?;

            if let Some(err) = topic.error() {
                let code = RDKafkaErrorCode::from(err);
                if code == RDKafkaErrorCode::UnknownTopicOrPartition {
                    return Ok(None);
                }
                return Err(AdminError::Communication(format!(
                    "metadata error for `{topic_name}`: {code}"
                )));
            }

            let partitions = topic.partitions();
            if partitions.is_empty() {
                return Err(AdminError::Communication(format!(
                    "broker reported `{topic_name}` with no partitions"
                )));
            }
            let replication_factor = partitions[0].replicas().len() as u32;
            let heterogeneous_replicas = partitions
                .iter()
                .any(|p| p.replicas().len() as u32 != replication_factor);

            Ok(Some(PartitionSummary {
                partitions: partitions.len() as u32,
                replication_factor,
                heterogeneous_replicas,
            }))
        })
        .await
        .map_err(|e| AdminError::Communication(format!("metadata task failed: {e}")))?
    }
}

/// Surface per-topic results of a create/grow request as one error.
fn confirm(results: Vec<TopicResult>, what: &str) -> Result<(), AdminError> {
    for result in results {
        if let Err((topic, code)) = result {
            return Err(AdminError::Execution(format!(
                "{what} failed for `{topic}`: {code}"
            )));
        }
    }
    Ok(())
}

#[async_trait]
impl TopicAdmin for KafkaTopicAdmin {
    async fn describe_topic(&self, name: &str) -> Result<Option<ClusterTopicState>, AdminError> {
        let Some(summary) = self.partition_summary(name).await? else {
            return Ok(None);
        };
        if summary.heterogeneous_replicas {
            warn!(
                topic = name,
                "partitions carry heterogeneous replica counts, reporting the first partition's"
            );
        }

        let results = self
            .admin
            .describe_configs([&ResourceSpecifier::Topic(name)], &self.options())
            .await
            .map_err(|e| AdminError::Communication(e.to_string()))?;
        let resource = results
            .into_iter()
            .next()
            .ok_or_else(|| {
                AdminError::Communication(format!("empty config response for `{name}`"))
            })?
            .map_err(|code| {
                AdminError::Communication(format!("describe configs failed for `{name}`: {code}"))
            })?;

        let mut config = BTreeMap::new();
        for entry in resource.entries {
            if let Some(value) = entry.value {
                config.insert(entry.name, value);
            }
        }

        Ok(Some(ClusterTopicState {
            partitions: summary.partitions,
            replication_factor: summary.replication_factor,
            config,
        }))
    }

    async fn create_topic(&self, spec: &TopicSpec) -> Result<(), AdminError> {
        let mut topic = NewTopic::new(
            &spec.name,
            spec.partitions as i32,
            TopicReplication::Fixed(spec.replication_factor as i32),
        );
        for (key, value) in &spec.config {
            topic = topic.set(key, value);
        }
        let results = self
            .admin
            .create_topics([&topic], &self.options())
            .await
            .map_err(|e| AdminError::Execution(e.to_string()))?;
        confirm(results, "create topic")
    }

    async fn increase_partitions(&self, name: &str, target: u32) -> Result<(), AdminError> {
        let partitions = NewPartitions::new(name, target as usize);
        let results = self
            .admin
            .create_partitions([&partitions], &self.options())
            .await
            .map_err(|e| AdminError::Execution(e.to_string()))?;
        confirm(results, "partition increase")
    }

    async fn alter_topic_config(&self, name: &str, delta: &ConfigDelta) -> Result<(), AdminError> {
        let mut alter = AlterConfig::new(ResourceSpecifier::Topic(name));
        for (key, value) in delta {
            alter = alter.set(key, value);
        }
        let results = self
            .admin
            .alter_configs([&alter], &self.options())
            .await
            .map_err(|e| AdminError::Execution(e.to_string()))?;
        for result in results {
            if let Err((resource, code)) = result {
                return Err(AdminError::Execution(format!(
                    "alter configs failed for {resource:?}: {code}"
                )));
            }
        }
        Ok(())
    }
}
