//! Declared topic state, as parsed from a topic spec file.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SpecError;

/// The cluster a topic is declared against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetCluster {
    pub name: String,
    pub environment: String,
}

/// One declared topic: the desired end state for a single reconciliation
/// run. Immutable once constructed; [`TopicSpec::new`] is the only way to
/// obtain a validated instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSpec {
    pub name: String,
    pub partitions: u32,
    pub replication_factor: u32,
    /// Broker config entries. Values are strings because the broker
    /// reports every config value as a string.
    pub config: BTreeMap<String, String>,
    pub target_cluster: TargetCluster,
}

impl TopicSpec {
    pub fn new(
        name: impl Into<String>,
        partitions: u32,
        replication_factor: u32,
        config: BTreeMap<String, String>,
        target_cluster: TargetCluster,
    ) -> Result<Self, SpecError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SpecError::InvalidField {
                field: "topicName",
                reason: "must not be empty".into(),
            });
        }
        if partitions == 0 {
            return Err(SpecError::InvalidField {
                field: "spec.partitions",
                reason: "must be a positive integer".into(),
            });
        }
        if partitions > i32::MAX as u32 {
            return Err(SpecError::InvalidField {
                field: "spec.partitions",
                reason: format!("{partitions} exceeds the broker maximum of {}", i32::MAX),
            });
        }
        if replication_factor == 0 {
            return Err(SpecError::InvalidField {
                field: "spec.replication-factor",
                reason: "must be a positive integer".into(),
            });
        }
        if replication_factor > i16::MAX as u32 {
            return Err(SpecError::InvalidField {
                field: "spec.replication-factor",
                reason: format!("{replication_factor} exceeds the broker maximum of {}", i16::MAX),
            });
        }
        if target_cluster.name.trim().is_empty() {
            return Err(SpecError::MissingField("spec.target-cluster.name"));
        }
        if target_cluster.environment.trim().is_empty() {
            return Err(SpecError::MissingField("spec.target-cluster.env"));
        }
        Ok(Self {
            name,
            partitions,
            replication_factor,
            config,
            target_cluster,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster() -> TargetCluster {
        TargetCluster {
            name: "analytics".into(),
            environment: "prod".into(),
        }
    }

    #[test]
    fn accepts_a_minimal_valid_spec() {
        let spec = TopicSpec::new("orders", 3, 2, BTreeMap::new(), cluster()).unwrap();
        assert_eq!(spec.name, "orders");
        assert_eq!(spec.partitions, 3);
        assert_eq!(spec.replication_factor, 2);
    }

    #[test]
    fn rejects_zero_partitions() {
        let err = TopicSpec::new("orders", 0, 2, BTreeMap::new(), cluster()).unwrap_err();
        assert!(matches!(
            err,
            SpecError::InvalidField { field: "spec.partitions", .. }
        ));
    }

    #[test]
    fn rejects_zero_replication_factor() {
        let err = TopicSpec::new("orders", 3, 0, BTreeMap::new(), cluster()).unwrap_err();
        assert!(matches!(
            err,
            SpecError::InvalidField { field: "spec.replication-factor", .. }
        ));
    }

    #[test]
    fn rejects_blank_topic_name() {
        let err = TopicSpec::new("  ", 3, 2, BTreeMap::new(), cluster()).unwrap_err();
        assert!(matches!(err, SpecError::InvalidField { field: "topicName", .. }));
    }

    #[test]
    fn rejects_blank_cluster_fields() {
        let target = TargetCluster {
            name: String::new(),
            environment: "prod".into(),
        };
        let err = TopicSpec::new("orders", 3, 2, BTreeMap::new(), target).unwrap_err();
        assert!(matches!(err, SpecError::MissingField("spec.target-cluster.name")));

        let target = TargetCluster {
            name: "analytics".into(),
            environment: String::new(),
        };
        let err = TopicSpec::new("orders", 3, 2, BTreeMap::new(), target).unwrap_err();
        assert!(matches!(err, SpecError::MissingField("spec.target-cluster.env")));
    }
}
