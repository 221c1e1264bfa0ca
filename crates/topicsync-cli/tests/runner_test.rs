//! Run coordinator tests with a simulated cluster.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use topicsync_cli::Runner;
use topicsync_core::memory::{InMemoryTopicAdmin, RecordedOp};
use topicsync_core::{
    AdminProvider, ClusterTopicState, ProviderError, TargetCluster, TopicAdmin, TopicOutcome,
};
use topicsync_gitops::ChangeKind;

/// Resolves every target in the "test" environment to one shared
/// simulated cluster.
struct FakeProvider {
    admin: InMemoryTopicAdmin,
}

#[async_trait]
impl AdminProvider for FakeProvider {
    async fn resolve(&self, target: &TargetCluster) -> Result<Box<dyn TopicAdmin>, ProviderError> {
        if target.environment != "test" {
            return Err(ProviderError::UnknownCluster {
                name: target.name.clone(),
                environment: target.environment.clone(),
            });
        }
        Ok(Box::new(self.admin.clone()))
    }
}

fn write_spec(dir: &Path, file: &str, name: &str, partitions: u32, environment: &str) {
    let text = format!(
        r#"topicName: {name}
spec:
  partitions: {partitions}
  replication-factor: 2
  target-cluster:
    name: analytics
    env: {environment}
  config:
    retention.ms: 604800000
"#
    );
    std::fs::write(dir.join(file), text).unwrap();
}

fn changes(files: &[&str]) -> BTreeMap<String, ChangeKind> {
    files
        .iter()
        .map(|f| (f.to_string(), ChangeKind::Added))
        .collect()
}

fn runner(admin: &InMemoryTopicAdmin, root: &Path, fail_fast: bool) -> Runner {
    Runner::new(
        Arc::new(FakeProvider {
            admin: admin.clone(),
        }),
        root.to_path_buf(),
        fail_fast,
    )
}

#[tokio::test]
async fn creates_updates_and_leaves_converged_topics_alone() {
    let dir = tempfile::tempdir().unwrap();
    write_spec(dir.path(), "orders.yaml", "orders", 3, "test");
    write_spec(dir.path(), "payments.yaml", "payments", 6, "test");

    let admin = InMemoryTopicAdmin::new();
    admin
        .seed_topic(
            "payments",
            ClusterTopicState {
                partitions: 3,
                replication_factor: 2,
                config: BTreeMap::from([("retention.ms".to_string(), "604800000".to_string())]),
            },
        )
        .await;

    let report = runner(&admin, dir.path(), false)
        .run(&changes(&["orders.yaml", "payments.yaml"]))
        .await;

    assert_eq!(report.topics.len(), 2);
    assert!(!report.has_failures());
    assert_eq!(report.topics[0].outcome, TopicOutcome::Created);
    assert_eq!(
        report.topics[1].outcome,
        TopicOutcome::Updated {
            partition_target: Some(6),
            config_keys: vec![],
        }
    );

    // Second run over the same change set converges to all-unchanged.
    let report = runner(&admin, dir.path(), false)
        .run(&changes(&["orders.yaml", "payments.yaml"]))
        .await;
    assert!(report
        .topics
        .iter()
        .all(|t| t.outcome == TopicOutcome::Unchanged));
}

#[tokio::test]
async fn malformed_spec_skips_that_topic_and_continues() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.yaml"), "topicName: broken\n").unwrap();
    write_spec(dir.path(), "orders.yaml", "orders", 3, "test");

    let admin = InMemoryTopicAdmin::new();
    let report = runner(&admin, dir.path(), false)
        .run(&changes(&["broken.yaml", "orders.yaml"]))
        .await;

    assert_eq!(report.topics.len(), 2);
    assert!(matches!(
        report.topics[0].outcome,
        TopicOutcome::Skipped { ref reason } if reason.contains("spec load failed")
    ));
    assert_eq!(report.topics[1].outcome, TopicOutcome::Created);
    assert!(!report.has_failures());
}

#[tokio::test]
async fn unknown_cluster_skips_that_topic() {
    let dir = tempfile::tempdir().unwrap();
    write_spec(dir.path(), "orders.yaml", "orders", 3, "prod");

    let admin = InMemoryTopicAdmin::new();
    let report = runner(&admin, dir.path(), false)
        .run(&changes(&["orders.yaml"]))
        .await;

    assert!(matches!(
        report.topics[0].outcome,
        TopicOutcome::Skipped { ref reason } if reason.contains("cluster resolution failed")
    ));
    assert!(admin.operations().await.is_empty());
}

#[tokio::test]
async fn partition_shrink_is_reported_as_rejected_without_mutations() {
    let dir = tempfile::tempdir().unwrap();
    write_spec(dir.path(), "orders.yaml", "orders", 2, "test");

    let admin = InMemoryTopicAdmin::new();
    admin
        .seed_topic(
            "orders",
            ClusterTopicState {
                partitions: 5,
                replication_factor: 2,
                config: BTreeMap::from([("retention.ms".to_string(), "604800000".to_string())]),
            },
        )
        .await;

    let report = runner(&admin, dir.path(), false)
        .run(&changes(&["orders.yaml"]))
        .await;

    assert!(matches!(
        report.topics[0].outcome,
        TopicOutcome::Rejected { ref reason } if reason.contains("cannot decrease")
    ));
    assert!(admin.operations().await.is_empty());
    assert!(!report.has_failures());
}

#[tokio::test]
async fn execution_fault_fails_the_topic_and_run_continues_by_default() {
    let dir = tempfile::tempdir().unwrap();
    write_spec(dir.path(), "a-orders.yaml", "orders", 3, "test");
    write_spec(dir.path(), "b-payments.yaml", "payments", 3, "test");

    let admin = InMemoryTopicAdmin::new();
    admin.fail_mutations_for("orders").await;

    let report = runner(&admin, dir.path(), false)
        .run(&changes(&["a-orders.yaml", "b-payments.yaml"]))
        .await;

    assert_eq!(report.topics.len(), 2);
    assert!(matches!(report.topics[0].outcome, TopicOutcome::Failed { .. }));
    assert_eq!(report.topics[1].outcome, TopicOutcome::Created);
    assert!(report.has_failures());
    assert!(!report.aborted);
}

#[tokio::test]
async fn fail_fast_halts_the_run_on_the_first_execution_fault() {
    let dir = tempfile::tempdir().unwrap();
    write_spec(dir.path(), "a-orders.yaml", "orders", 3, "test");
    write_spec(dir.path(), "b-payments.yaml", "payments", 3, "test");

    let admin = InMemoryTopicAdmin::new();
    admin.fail_mutations_for("orders").await;

    let report = runner(&admin, dir.path(), true)
        .run(&changes(&["a-orders.yaml", "b-payments.yaml"]))
        .await;

    assert_eq!(report.topics.len(), 1);
    assert!(report.aborted);
    assert!(report.has_failures());
    assert_eq!(
        admin.operations().await,
        Vec::<RecordedOp>::new(),
        "the failed create never reached the cluster and nothing else ran"
    );
}
