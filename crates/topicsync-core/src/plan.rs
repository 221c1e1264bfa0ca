//! Drift detection: turns declared and live topic state into a plan.

use std::collections::BTreeMap;

use crate::spec::TopicSpec;
use crate::state::ClusterTopicState;

/// Config keys whose declared value differs from, or is absent in, the
/// live topic config. One-directional: keys that exist only on the broker
/// are never touched.
pub type ConfigDelta = BTreeMap<String, String>;

/// The minimal set of mutations that converges one topic to its declared
/// spec. Constructed by [`build_plan`] and consumed exactly once by the
/// executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// The topic does not exist. Create it with the full declared spec.
    Create,

    /// The topic already matches the declared spec.
    NoOp,

    /// The topic exists and has drifted.
    Update {
        /// New partition count. Invariant: strictly greater than the live
        /// count, a shrink is rejected instead.
        partition_target: Option<u32>,
        config_delta: ConfigDelta,
    },

    /// The spec asks for a mutation the broker cannot perform.
    Rejected { reason: String },
}

/// Derive the plan for one topic.
///
/// Pure and deterministic. Replication factor is a creation-time-only
/// parameter and is never compared for an existing topic.
///
/// A declared partition count below the live count rejects the whole
/// plan: a config delta observed at the same time is deliberately not
/// applied, so that an inconsistent spec file mutates nothing.
pub fn build_plan(spec: &TopicSpec, state: Option<&ClusterTopicState>) -> Plan {
    let Some(state) = state else {
        return Plan::Create;
    };

    if spec.partitions < state.partitions {
        return Plan::Rejected {
            reason: format!(
                "partition count cannot decrease (cluster has {}, spec declares {})",
                state.partitions, spec.partitions
            ),
        };
    }

    let partition_target = (spec.partitions > state.partitions).then_some(spec.partitions);
    let config_delta = config_delta(&spec.config, &state.config);

    if partition_target.is_none() && config_delta.is_empty() {
        Plan::NoOp
    } else {
        Plan::Update {
            partition_target,
            config_delta,
        }
    }
}

/// Compare declared config against live config.
///
/// String comparison only: broker-reported values are already strings and
/// no type coercion happens here.
pub fn config_delta(
    declared: &BTreeMap<String, String>,
    live: &BTreeMap<String, String>,
) -> ConfigDelta {
    declared
        .iter()
        .filter(|(key, value)| live.get(*key) != Some(value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
