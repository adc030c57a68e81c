//! Error types for queue simulation experiments

use thiserror::Error;

pub type Result<T> = std::result::Result<T, QueueError>;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Invalid capacity: at least one server is required, got {0}")]
    InvalidCapacity(usize),

    #[error("Invalid rate: expected a strictly positive rate, got {0}")]
    InvalidRate(f64),

    #[error("Invalid service time: expected a strictly positive duration, got {0}")]
    InvalidServiceTime(f64),

    #[error("Invalid horizon: expected a strictly positive horizon, got {0}")]
    InvalidHorizon(f64),

    #[error("Invalid threshold: expected a strictly positive threshold, got {0}")]
    InvalidThreshold(f64),

    #[error("Invalid probability: expected a value in [0, 1], got {0}")]
    InvalidProbability(f64),

    #[error("Invalid batch size: at least 2 replications per batch are required, got {0}")]
    InvalidBatchSize(usize),

    #[error("Invalid replication cap: {cap} is not a multiple of the batch size {batch_size}")]
    InvalidReplicationCap { cap: usize, batch_size: usize },

    #[error("Invalid budget: at least one replication is required")]
    InvalidBudget,

    #[error("Undefined ratio: {0}")]
    UndefinedRatio(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
