//! Kafka admin client bindings for topicsync.
//!
//! Implements the core [`TopicAdmin`](topicsync_core::TopicAdmin)
//! contract on top of the rdkafka admin API, and resolves declared
//! target clusters to live connections from configuration.

pub mod client;
pub mod error;
pub mod provider;

pub use client::KafkaTopicAdmin;
pub use error::ClientError;
pub use provider::{ClusterConfig, ClusterRegistry};
