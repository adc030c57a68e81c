pub mod accumulator;
pub mod controller;
pub mod moving_average;

pub use accumulator::StatisticsAccumulator;
pub use controller::{
    CancellationToken, ConfidenceReport, FixedBudgetReport, ReplicationController, Termination,
};
pub use moving_average::{Band, Checkpoint, ErrorBands, MovingAverageTracker};
