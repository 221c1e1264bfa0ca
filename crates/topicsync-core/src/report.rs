//! Per-topic outcomes aggregated into a run report.

use std::fmt;

/// What happened to a single topic during a run.
///
/// Every topic gets exactly one outcome, so partial failures stay
/// isolated: a skipped or failed topic never unwinds the rest of the
/// batch by itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicOutcome {
    Created,
    Updated {
        partition_target: Option<u32>,
        config_keys: Vec<String>,
    },
    Unchanged,
    /// The plan was rejected before any administrative call.
    Rejected { reason: String },
    /// The topic was not reconciled (spec, resolution or read failure).
    Skipped { reason: String },
    /// An administrative call failed while the plan was being applied.
    Failed { reason: String },
}

impl TopicOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, TopicOutcome::Failed { .. })
    }
}

impl fmt::Display for TopicOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopicOutcome::Created => write!(f, "created"),
            TopicOutcome::Updated {
                partition_target,
                config_keys,
            } => {
                write!(f, "updated (")?;
                if let Some(target) = partition_target {
                    write!(f, "partitions -> {target}")?;
                    if !config_keys.is_empty() {
                        write!(f, ", ")?;
                    }
                }
                if !config_keys.is_empty() {
                    write!(f, "config: {}", config_keys.join(", "))?;
                }
                write!(f, ")")
            }
            TopicOutcome::Unchanged => write!(f, "unchanged"),
            TopicOutcome::Rejected { reason } => write!(f, "rejected: {reason}"),
            TopicOutcome::Skipped { reason } => write!(f, "skipped: {reason}"),
            TopicOutcome::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}

/// Outcome of one spec file.
#[derive(Debug, Clone)]
pub struct TopicReport {
    /// Repository-relative path of the spec file.
    pub source: String,
    /// Topic name, when the spec parsed far enough to know it.
    pub topic: Option<String>,
    pub outcome: TopicOutcome,
}

impl TopicReport {
    pub fn skipped(source: impl Into<String>, topic: Option<String>, reason: String) -> Self {
        Self {
            source: source.into(),
            topic,
            outcome: TopicOutcome::Skipped { reason },
        }
    }
}

/// All per-topic outcomes of one reconciliation run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub topics: Vec<TopicReport>,
    /// Set when a fail-fast run halted before processing every topic.
    pub aborted: bool,
}

impl RunReport {
    pub fn record(&mut self, report: TopicReport) {
        self.topics.push(report);
    }

    pub fn has_failures(&self) -> bool {
        self.aborted || self.topics.iter().any(|t| t.outcome.is_failure())
    }

    pub fn summary(&self) -> String {
        let mut created = 0;
        let mut updated = 0;
        let mut unchanged = 0;
        let mut rejected = 0;
        let mut skipped = 0;
        let mut failed = 0;
        for report in &self.topics {
            match report.outcome {
                TopicOutcome::Created => created += 1,
                TopicOutcome::Updated { .. } => updated += 1,
                TopicOutcome::Unchanged => unchanged += 1,
                TopicOutcome::Rejected { .. } => rejected += 1,
                TopicOutcome::Skipped { .. } => skipped += 1,
                TopicOutcome::Failed { .. } => failed += 1,
            }
        }
        let mut summary = format!(
            "{} topics: {created} created, {updated} updated, {unchanged} unchanged, \
             {rejected} rejected, {skipped} skipped, {failed} failed",
            self.topics.len()
        );
        if self.aborted {
            summary.push_str(" (run aborted)");
        }
        summary
    }
}
