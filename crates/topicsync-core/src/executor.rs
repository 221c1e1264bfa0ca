//! Applies a plan against an administrative connection.

use tracing::info;

use crate::admin::TopicAdmin;
use crate::error::AdminError;
use crate::plan::Plan;
use crate::report::TopicOutcome;
use crate::spec::TopicSpec;

/// Apply `plan` for `spec` through `admin`.
///
/// Operation order is fixed: a partition increase completes before any
/// config change is issued. `NoOp` and `Rejected` plans issue no
/// administrative call at all. A failed call surfaces as an error without
/// retry; mapping it to a per-topic outcome is the coordinator's job.
pub async fn execute(
    admin: &dyn TopicAdmin,
    spec: &TopicSpec,
    plan: &Plan,
) -> Result<TopicOutcome, AdminError> {
    match plan {
        Plan::Create => {
            admin.create_topic(spec).await?;
            info!(
                topic = %spec.name,
                partitions = spec.partitions,
                replication_factor = spec.replication_factor,
                "topic created"
            );
            Ok(TopicOutcome::Created)
        }
        Plan::NoOp => Ok(TopicOutcome::Unchanged),
        Plan::Rejected { reason } => Ok(TopicOutcome::Rejected {
            reason: reason.clone(),
        }),
        Plan::Update {
            partition_target,
            config_delta,
        } => {
            if let Some(target) = partition_target {
                admin.increase_partitions(&spec.name, *target).await?;
                info!(topic = %spec.name, target, "partition count increased");
            }
            if !config_delta.is_empty() {
                admin.alter_topic_config(&spec.name, config_delta).await?;
                info!(
                    topic = %spec.name,
                    keys = config_delta.len(),
                    "topic config updated"
                );
            }
            Ok(TopicOutcome::Updated {
                partition_target: *partition_target,
                config_keys: config_delta.keys().cloned().collect(),
            })
        }
    }
}
