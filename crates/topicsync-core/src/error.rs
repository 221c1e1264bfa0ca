//! Error taxonomy for the reconciliation engine.

use thiserror::Error;

/// A declared topic spec failed validation.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

/// A broker-facing administrative call failed.
///
/// `Communication` covers failures while reading cluster state and must
/// never be treated as topic absence: a network fault mistaken for a
/// missing topic would trigger an erroneous re-creation attempt.
/// `Execution` covers failed mutations while a plan is being applied.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("cluster communication failure: {0}")]
    Communication(String),

    #[error("administrative call failed: {0}")]
    Execution(String),
}

/// A declared target cluster could not be turned into a live connection.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no cluster registered for `{name}` in environment `{environment}`")]
    UnknownCluster { name: String, environment: String },

    #[error("failed to build admin client: {0}")]
    Connect(String),
}
