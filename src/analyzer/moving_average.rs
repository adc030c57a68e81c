use crate::analyzer::accumulator::StatisticsAccumulator;
use crate::engine::outcome::Metric;
use crate::error::Result;

/// `mean ± one standard error`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub lower: f64,
    pub upper: f64,
}

impl Band {
    fn around(mean: f64, standard_error: f64) -> Self {
        Self {
            lower: mean - standard_error,
            upper: mean + standard_error,
        }
    }
}

/// Cumulative statistics recorded at a batch boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkpoint {
    /// Replications observed so far.
    pub replications: usize,
    /// Mean over all replications so far, indexed by [`Metric::index`].
    pub means: [f64; 4],
    pub rejection_ratio_band: Band,
    pub max_wait_band: Band,
}

impl Checkpoint {
    pub fn mean(&self, metric: Metric) -> f64 {
        self.means[metric.index()]
    }
}

/// Upper and lower one standard error bounds, one entry per checkpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorBands {
    pub upper_w: Vec<f64>,
    pub lower_w: Vec<f64>,
    pub upper_tm: Vec<f64>,
    pub lower_tm: Vec<f64>,
}

/// Convergence diagnostics: one append-only [`Checkpoint`] per batch.
#[derive(Debug, Clone, Default)]
pub struct MovingAverageTracker {
    checkpoints: Vec<Checkpoint>,
}

impl MovingAverageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a checkpoint summarising everything in `accumulator`.
    pub fn record(&mut self, accumulator: &StatisticsAccumulator) -> Result<&Checkpoint> {
        let mut means = [0.0; 4];
        for metric in Metric::ALL {
            means[metric.index()] = accumulator.mean(metric)?;
        }
        let checkpoint = Checkpoint {
            replications: accumulator.len(),
            means,
            rejection_ratio_band: Band::around(
                means[Metric::RejectionRatio.index()],
                accumulator.standard_error(Metric::RejectionRatio)?,
            ),
            max_wait_band: Band::around(
                means[Metric::MaxWait.index()],
                accumulator.standard_error(Metric::MaxWait)?,
            ),
        };
        self.checkpoints.push(checkpoint);
        Ok(&self.checkpoints[self.checkpoints.len() - 1])
    }

    pub fn checkpoints(&self) -> &[Checkpoint] {
        &self.checkpoints
    }

    pub fn latest(&self) -> Option<&Checkpoint> {
        self.checkpoints.last()
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    pub fn moving_average(&self, metric: Metric) -> Vec<f64> {
        self.checkpoints.iter().map(|c| c.mean(metric)).collect()
    }

    pub fn error_bands(&self) -> ErrorBands {
        let mut bands = ErrorBands::default();
        for c in &self.checkpoints {
            bands.upper_w.push(c.rejection_ratio_band.upper);
            bands.lower_w.push(c.rejection_ratio_band.lower);
            bands.upper_tm.push(c.max_wait_band.upper);
            bands.lower_tm.push(c.max_wait_band.lower);
        }
        bands
    }

    pub fn replication_counts(&self) -> Vec<usize> {
        self.checkpoints.iter().map(|c| c.replications).collect()
    }
}
