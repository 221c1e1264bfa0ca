//! In-memory implementation of [`TopicAdmin`] for testing.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::admin::TopicAdmin;
use crate::error::AdminError;
use crate::plan::ConfigDelta;
use crate::spec::TopicSpec;
use crate::state::ClusterTopicState;

/// One recorded administrative call, in issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedOp {
    CreateTopic { name: String },
    IncreasePartitions { name: String, target: u32 },
    AlterConfig { name: String, keys: Vec<String> },
}

/// In-memory topic admin that simulates a broker cluster.
///
/// Records every mutation so tests can assert call order, and can be told
/// to fail mutations against selected topics to simulate administrative
/// faults. Clones share the same simulated cluster.
#[derive(Clone, Default)]
pub struct InMemoryTopicAdmin {
    topics: Arc<RwLock<HashMap<String, ClusterTopicState>>>,
    operations: Arc<Mutex<Vec<RecordedOp>>>,
    failing_topics: Arc<RwLock<HashSet<String>>>,
}

impl InMemoryTopicAdmin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the simulated cluster with an existing topic.
    pub async fn seed_topic(&self, name: &str, state: ClusterTopicState) {
        self.topics.write().await.insert(name.to_string(), state);
    }

    /// Make every subsequent mutation against `name` fail.
    pub async fn fail_mutations_for(&self, name: &str) {
        self.failing_topics.write().await.insert(name.to_string());
    }

    pub async fn topic(&self, name: &str) -> Option<ClusterTopicState> {
        self.topics.read().await.get(name).cloned()
    }

    pub async fn operations(&self) -> Vec<RecordedOp> {
        self.operations.lock().await.clone()
    }

    async fn check_can_mutate(&self, name: &str) -> Result<(), AdminError> {
        if self.failing_topics.read().await.contains(name) {
            return Err(AdminError::Execution(format!(
                "injected failure for topic `{name}`"
            )));
        }
        Ok(())
    }

    async fn record(&self, op: RecordedOp) {
        self.operations.lock().await.push(op);
    }
}

#[async_trait]
impl TopicAdmin for InMemoryTopicAdmin {
    async fn describe_topic(&self, name: &str) -> Result<Option<ClusterTopicState>, AdminError> {
        Ok(self.topics.read().await.get(name).cloned())
    }

    async fn create_topic(&self, spec: &TopicSpec) -> Result<(), AdminError> {
        self.check_can_mutate(&spec.name).await?;
        let mut topics = self.topics.write().await;
        if topics.contains_key(&spec.name) {
            return Err(AdminError::Execution(format!(
                "topic `{}` already exists",
                spec.name
            )));
        }
        topics.insert(
            spec.name.clone(),
            ClusterTopicState {
                partitions: spec.partitions,
                replication_factor: spec.replication_factor,
                config: spec.config.clone(),
            },
        );
        drop(topics);
        self.record(RecordedOp::CreateTopic {
            name: spec.name.clone(),
        })
        .await;
        Ok(())
    }

    async fn increase_partitions(&self, name: &str, target: u32) -> Result<(), AdminError> {
        self.check_can_mutate(name).await?;
        let mut topics = self.topics.write().await;
        let state = topics
            .get_mut(name)
            .ok_or_else(|| AdminError::Execution(format!("unknown topic `{name}`")))?;
        if target <= state.partitions {
            return Err(AdminError::Execution(format!(
                "partition count for `{name}` can only grow ({} -> {target})",
                state.partitions
            )));
        }
        state.partitions = target;
        drop(topics);
        self.record(RecordedOp::IncreasePartitions {
            name: name.to_string(),
            target,
        })
        .await;
        Ok(())
    }

    async fn alter_topic_config(&self, name: &str, delta: &ConfigDelta) -> Result<(), AdminError> {
        self.check_can_mutate(name).await?;
        let mut topics = self.topics.write().await;
        let state = topics
            .get_mut(name)
            .ok_or_else(|| AdminError::Execution(format!("unknown topic `{name}`")))?;
        for (key, value) in delta {
            state.config.insert(key.clone(), value.clone());
        }
        drop(topics);
        self.record(RecordedOp::AlterConfig {
            name: name.to_string(),
            keys: delta.keys().cloned().collect(),
        })
        .await;
        Ok(())
    }
}
