//! Error types for the Kafka client layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no cluster registered for `{name}` in environment `{environment}`")]
    UnknownCluster { name: String, environment: String },

    #[error("kafka client error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),
}
