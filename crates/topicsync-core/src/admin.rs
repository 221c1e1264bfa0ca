//! Administrative connection contracts.

use async_trait::async_trait;

use crate::error::{AdminError, ProviderError};
use crate::plan::ConfigDelta;
use crate::spec::{TargetCluster, TopicSpec};
use crate::state::ClusterTopicState;

/// A live administrative connection to one broker cluster.
///
/// Implementations issue the actual broker calls; the executor drives
/// them in a fixed order and awaits each to completion. Dropping the
/// value closes the underlying connection, which is why the run
/// coordinator, not the executor, owns it.
#[async_trait]
pub trait TopicAdmin: Send + Sync {
    /// Current live state of a topic, or `None` when the broker reports
    /// that the topic does not exist. Any other failure is a
    /// communication error, never `None`.
    async fn describe_topic(&self, name: &str) -> Result<Option<ClusterTopicState>, AdminError>;

    /// Create the topic, with partition count, replication factor and the
    /// full declared config attached to the creation request.
    async fn create_topic(&self, spec: &TopicSpec) -> Result<(), AdminError>;

    /// Grow the topic to `target` partitions.
    async fn increase_partitions(&self, name: &str, target: u32) -> Result<(), AdminError>;

    /// Apply one batched request of per-key set operations.
    async fn alter_topic_config(&self, name: &str, delta: &ConfigDelta) -> Result<(), AdminError>;
}

/// Resolves a declared target cluster to a live administrative connection.
#[async_trait]
pub trait AdminProvider: Send + Sync {
    async fn resolve(&self, target: &TargetCluster) -> Result<Box<dyn TopicAdmin>, ProviderError>;
}
