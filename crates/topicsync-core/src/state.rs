//! Live topic state, as reported by a broker cluster.

use std::collections::BTreeMap;

/// Observed state of one existing topic.
///
/// Fetched fresh from the cluster on every run, never cached across runs.
/// A topic that does not exist is represented as the absence of this
/// value, not as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterTopicState {
    pub partitions: u32,
    /// Replica count of the first partition. The reader warns when
    /// partitions carry heterogeneous replica counts.
    pub replication_factor: u32,
    pub config: BTreeMap<String, String>,
}
