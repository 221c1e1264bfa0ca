//! Run coordinator: reconciles every changed topic spec in turn.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use topicsync_core::{
    build_plan, execute, AdminProvider, RunReport, TopicOutcome, TopicReport,
};
use topicsync_gitops::{load_topic_spec, ChangeKind};

/// Reconciles topics one at a time, in the supplied order, collecting one
/// outcome per spec file. The order of the change list carries no
/// meaning; correctness never depends on it.
pub struct Runner {
    provider: Arc<dyn AdminProvider>,
    specs_root: PathBuf,
    fail_fast: bool,
}

impl Runner {
    pub fn new(provider: Arc<dyn AdminProvider>, specs_root: PathBuf, fail_fast: bool) -> Self {
        Self {
            provider,
            specs_root,
            fail_fast,
        }
    }

    pub async fn run(&self, changes: &BTreeMap<String, ChangeKind>) -> RunReport {
        let mut report = RunReport::default();
        let mut remaining = changes.len();
        for (path, kind) in changes {
            debug!(%path, %kind, "processing changed spec file");
            let topic_report = self.reconcile_file(path).await;
            match &topic_report.outcome {
                TopicOutcome::Skipped { reason } => {
                    warn!(source = %path, "topic skipped: {reason}");
                }
                TopicOutcome::Failed { reason } => {
                    error!(source = %path, "topic failed: {reason}");
                }
                outcome => info!(source = %path, "topic {outcome}"),
            }
            let failed = topic_report.outcome.is_failure();
            report.record(topic_report);
            remaining -= 1;
            if failed && self.fail_fast {
                if remaining > 0 {
                    error!(
                        remaining,
                        "halting run after execution fault (fail_fast enabled)"
                    );
                    report.aborted = true;
                }
                break;
            }
        }
        report
    }

    async fn reconcile_file(&self, rel_path: &str) -> TopicReport {
        let path = self.specs_root.join(rel_path);
        let spec = match load_topic_spec(&path) {
            Ok(spec) => spec,
            Err(e) => {
                return TopicReport::skipped(rel_path, None, format!("spec load failed: {e}"))
            }
        };
        info!(
            topic = %spec.name,
            cluster = %spec.target_cluster.name,
            environment = %spec.target_cluster.environment,
            "reconciling topic"
        );

        let admin = match self.provider.resolve(&spec.target_cluster).await {
            Ok(admin) => admin,
            Err(e) => {
                return TopicReport::skipped(
                    rel_path,
                    Some(spec.name),
                    format!("cluster resolution failed: {e}"),
                )
            }
        };

        let state = match admin.describe_topic(&spec.name).await {
            Ok(state) => state,
            Err(e) => {
                return TopicReport::skipped(
                    rel_path,
                    Some(spec.name),
                    format!("cluster state read failed: {e}"),
                )
            }
        };

        let plan = build_plan(&spec, state.as_ref());
        debug!(topic = %spec.name, ?plan, "plan computed");

        let outcome = match execute(admin.as_ref(), &spec, &plan).await {
            Ok(outcome) => outcome,
            Err(e) => TopicOutcome::Failed {
                reason: e.to_string(),
            },
        };

        // `admin` drops here, closing this topic's connection on every
        // exit path.
        TopicReport {
            source: rel_path.to_string(),
            topic: Some(spec.name),
            outcome,
        }
    }
}
