pub mod analyzer;
pub mod engine;
pub mod error;
pub mod logging;
pub mod parser;
pub mod utils;

pub use analyzer::{ConfidenceReport, FixedBudgetReport, ReplicationController, Termination};
pub use engine::models::{run_replication, Model, QueueModel};
pub use engine::outcome::{Metric, Outcome};
pub use engine::random_process::{RandomProcess, RandomSource, ServiceTime};
pub use engine::scenario::Scenario;
pub use error::{QueueError, Result};
