use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::{Duration, Instant};

use indicatif::ProgressBar;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, info};

use crate::analyzer::accumulator::StatisticsAccumulator;
use crate::analyzer::moving_average::{Checkpoint, ErrorBands, MovingAverageTracker};
use crate::engine::models::{run_replication, Model, QueueModel};
use crate::engine::outcome::{Metric, Outcome};
use crate::engine::random_process::RandomProcess;
use crate::engine::scenario::Scenario;
use crate::error::{QueueError, Result};

pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Shared flag used to stop an experiment from another thread. The
/// controller looks at it between batches only.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Why an experiment stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The confidence interval became narrower than the threshold.
    Converged,
    /// The fixed number of replications was run.
    BudgetExhausted,
    /// `max_replications` was reached before convergence.
    CapReached,
    Cancelled,
    TimedOut,
}

pub(crate) fn check_replication_cap(cap: Option<usize>, batch_size: usize) -> Result<()> {
    match cap {
        Some(cap) if cap % batch_size != 0 => {
            Err(QueueError::InvalidReplicationCap { cap, batch_size })
        }
        _ => Ok(()),
    }
}

/// Runs replications of one scenario in batches and decides when to stop.
///
/// Replication `i` of an experiment always draws from the ChaCha stream `i`
/// of the experiment seed, so sequential and parallel runs agree exactly.
pub struct ReplicationController {
    model: Model,
    scenario: Scenario,
    seed: u64,
    batch_size: usize,
    parallel: bool,
    max_replications: Option<usize>,
    timeout: Option<Duration>,
    cancellation: CancellationToken,
    progress: ProgressBar,
}

impl ReplicationController {
    pub fn new(model: Model, scenario: Scenario) -> Self {
        Self {
            model,
            scenario,
            seed: rand::thread_rng().gen(),
            batch_size: DEFAULT_BATCH_SIZE,
            parallel: false,
            max_replications: None,
            timeout: None,
            cancellation: CancellationToken::new(),
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Result<Self> {
        if batch_size < 2 {
            return Err(QueueError::InvalidBatchSize(batch_size));
        }
        self.batch_size = batch_size;
        Ok(self)
    }

    /// Spread the replications of each batch over the rayon thread pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Stops a confidence run once this many replications have been made.
    /// Batches always complete, so the cap must be a multiple of the batch
    /// size; this is checked when the run starts.
    pub fn with_max_replications(mut self, max_replications: Option<usize>) -> Self {
        self.max_replications = max_replications;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn model(&self) -> Model {
        self.model
    }

    /// Runs `count` replications starting at global index `first`.
    fn run_batch(&self, first: usize, count: usize) -> Result<Vec<Outcome>> {
        let (model, scenario, seed) = (self.model, self.scenario, self.seed);
        let replicate = move |index: usize| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.set_stream(index as u64);
            run_replication(model, &scenario, &mut RandomProcess::new(rng))
        };
        let indices = first..first + count;
        if self.parallel {
            indices.into_par_iter().map(replicate).collect()
        } else {
            indices.map(replicate).collect()
        }
    }

    fn interrupted(&self, started: Instant) -> Option<Termination> {
        if self.cancellation.is_cancelled() {
            return Some(Termination::Cancelled);
        }
        match self.timeout {
            Some(timeout) if started.elapsed() >= timeout => Some(Termination::TimedOut),
            _ => None,
        }
    }

    /// Runs batches until the 95% confidence interval of the mean rejection
    /// ratio, `2 * 1.96 * standard error`, is narrower than `threshold`.
    pub fn run_until_confidence(&self, threshold: f64) -> Result<ConfidenceReport> {
        if !(threshold > 0.0 && threshold.is_finite()) {
            return Err(QueueError::InvalidThreshold(threshold));
        }
        check_replication_cap(self.max_replications, self.batch_size)?;
        info!(
            model = self.model.name(),
            seed = self.seed,
            threshold,
            batch_size = self.batch_size,
            "starting confidence experiment"
        );

        let started = Instant::now();
        let mut outcomes = StatisticsAccumulator::new();
        let mut tracker = MovingAverageTracker::new();
        let mut interval_width = None;

        let termination = loop {
            if let Some(reason) = self.interrupted(started) {
                break reason;
            }
            if self
                .max_replications
                .is_some_and(|cap| outcomes.len() >= cap)
            {
                break Termination::CapReached;
            }

            let batch = self.run_batch(outcomes.len(), self.batch_size)?;
            outcomes.extend(&batch);
            let checkpoint = tracker.record(&outcomes)?;
            let width = outcomes.interval_width(Metric::RejectionRatio)?;
            interval_width = Some(width);

            debug!(
                replications = checkpoint.replications,
                mean_ratio = checkpoint.mean(Metric::RejectionRatio),
                mean_max_wait = checkpoint.mean(Metric::MaxWait),
                width,
                "checkpoint"
            );
            self.progress.set_position(outcomes.len() as u64);
            self.progress.set_message(format!("interval width {width:.6}"));

            if width < threshold {
                break Termination::Converged;
            }
        };

        self.progress.finish_and_clear();
        info!(
            replications = outcomes.len(),
            ?termination,
            ?interval_width,
            "confidence experiment finished"
        );

        Ok(ConfidenceReport {
            seed: self.seed,
            threshold,
            termination,
            interval_width,
            outcomes,
            tracker,
        })
    }

    /// Runs exactly `total` replications, unless interrupted, and reports
    /// the sample means.
    pub fn run_fixed_budget(&self, total: usize) -> Result<FixedBudgetReport> {
        if total == 0 {
            return Err(QueueError::InvalidBudget);
        }
        info!(
            model = self.model.name(),
            seed = self.seed,
            total,
            "starting fixed budget experiment"
        );

        let started = Instant::now();
        let mut outcomes = StatisticsAccumulator::new();
        self.progress.set_length(total as u64);

        let termination = loop {
            if outcomes.len() >= total {
                break Termination::BudgetExhausted;
            }
            if let Some(reason) = self.interrupted(started) {
                break reason;
            }
            let count = self.batch_size.min(total - outcomes.len());
            let batch = self.run_batch(outcomes.len(), count)?;
            outcomes.extend(&batch);
            self.progress.set_position(outcomes.len() as u64);
        };

        self.progress.finish_and_clear();
        info!(
            replications = outcomes.len(),
            ?termination,
            "fixed budget experiment finished"
        );

        FixedBudgetReport::from_outcomes(self.seed, termination, outcomes)
    }
}

/// Everything observed by [`ReplicationController::run_until_confidence`].
#[derive(Debug, Clone)]
pub struct ConfidenceReport {
    pub seed: u64,
    pub threshold: f64,
    pub termination: Termination,
    /// Width of the 95% interval of the mean rejection ratio after the last
    /// batch, `None` when no batch ran.
    pub interval_width: Option<f64>,
    /// Raw per-replication outcomes.
    pub outcomes: StatisticsAccumulator,
    pub tracker: MovingAverageTracker,
}

impl ConfidenceReport {
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }

    pub fn replications(&self) -> usize {
        self.outcomes.len()
    }

    pub fn half_width(&self) -> Option<f64> {
        self.interval_width.map(|w| w / 2.0)
    }

    pub fn mean(&self, metric: Metric) -> Result<f64> {
        self.outcomes.mean(metric)
    }

    pub fn moving_average(&self, metric: Metric) -> Vec<f64> {
        self.tracker.moving_average(metric)
    }

    pub fn error_bands(&self) -> ErrorBands {
        self.tracker.error_bands()
    }

    /// Replication counts at which checkpoints were taken.
    pub fn checkpoint_counts(&self) -> Vec<usize> {
        self.tracker.replication_counts()
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        self.tracker.checkpoints()
    }
}

/// Sample means of a fixed number of replications.
#[derive(Debug, Clone)]
pub struct FixedBudgetReport {
    pub seed: u64,
    pub termination: Termination,
    pub replications: usize,
    pub mean_accepted: f64,
    pub mean_rejected: f64,
    pub mean_rejection_ratio: f64,
    pub mean_max_wait: f64,
    /// `1.96 * standard error` of the mean rejection ratio.
    pub rejection_ratio_half_width: Option<f64>,
}

impl FixedBudgetReport {
    fn from_outcomes(
        seed: u64,
        termination: Termination,
        outcomes: StatisticsAccumulator,
    ) -> Result<Self> {
        Ok(Self {
            seed,
            termination,
            replications: outcomes.len(),
            mean_accepted: outcomes.mean(Metric::Accepted)?,
            mean_rejected: outcomes.mean(Metric::Rejected)?,
            mean_rejection_ratio: outcomes.mean(Metric::RejectionRatio)?,
            mean_max_wait: outcomes.mean(Metric::MaxWait)?,
            rejection_ratio_half_width: outcomes.half_width(Metric::RejectionRatio).ok(),
        })
    }
}
