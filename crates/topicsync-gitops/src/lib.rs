//! Change detection, repository sync and spec loading for topicsync.
//!
//! Everything here is plumbing around the reconciliation engine: finding
//! out which topic spec files a commit's pull request touched, bringing
//! the local checkout of the spec repository up to date, and parsing one
//! spec file into a validated [`TopicSpec`](topicsync_core::TopicSpec).

pub mod changes;
pub mod error;
pub mod loader;
pub mod repo;

pub use changes::{ChangeKind, ChangesClient};
pub use error::GitOpsError;
pub use loader::{load_topic_spec, parse_topic_spec};
pub use repo::SpecRepo;
