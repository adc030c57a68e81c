use serde::Deserialize;

use crate::engine::outcome::Outcome;
use crate::engine::random_process::RandomSource;
use crate::engine::scenario::Scenario;
use crate::error::Result;

mod impatient;
mod loss;

pub use impatient::{balk_probability, Impatient};
pub use loss::Loss;

/// A queueing discipline that can play out one finite-horizon replication.
pub trait QueueModel {
    fn name(&self) -> &'static str;

    /// Runs one replication of `scenario`, drawing all randomness from `source`.
    fn replicate<S: RandomSource>(&self, scenario: &Scenario, source: &mut S) -> Result<Outcome>;
}

/// Models available to experiments and configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Model {
    /// Customers queue and may balk depending on the backlog.
    Impatient,
    /// No waiting room: arrivals finding every server busy are blocked.
    Loss,
}

impl QueueModel for Model {
    fn name(&self) -> &'static str {
        match self {
            Model::Impatient => Impatient.name(),
            Model::Loss => Loss.name(),
        }
    }

    fn replicate<S: RandomSource>(
        &self,
        scenario: &Scenario,
        source: &mut S,
    ) -> Result<Outcome> {
        match self {
            Model::Impatient => Impatient.replicate(scenario, source),
            Model::Loss => Loss.replicate(scenario, source),
        }
    }
}

pub fn run_replication<S: RandomSource>(
    model: Model,
    scenario: &Scenario,
    source: &mut S,
) -> Result<Outcome> {
    let outcome = model.replicate(scenario, source)?;
    tracing::trace!(
        model = model.name(),
        accepted = outcome.accepted,
        rejected = outcome.rejected,
        ratio = outcome.rejection_ratio,
        max_wait = outcome.max_wait,
        "replication finished"
    );
    Ok(outcome)
}
