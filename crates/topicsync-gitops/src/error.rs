//! Error types for the gitops plumbing.

use thiserror::Error;

use topicsync_core::SpecError;

#[derive(Debug, Error)]
pub enum GitOpsError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response from bitbucket: {0}")]
    Api(String),

    #[error("git {operation} failed: {detail}")]
    Git { operation: String, detail: String },

    #[error("malformed topic spec: {0}")]
    MalformedSpec(String),

    #[error("invalid topic spec: {0}")]
    Spec(#[from] SpecError),
}
