use ndarray::ArrayView1;

use crate::engine::outcome::{Metric, Outcome};
use crate::error::{QueueError, Result};

/// Two-sided 95% normal quantile.
pub const Z_95: f64 = 1.96;

/// Per-metric sequences of replication outcomes, in the order they were
/// observed.
#[derive(Debug, Clone, Default)]
pub struct StatisticsAccumulator {
    series: [Vec<f64>; 4],
}

impl StatisticsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: &Outcome) {
        for metric in Metric::ALL {
            self.series[metric.index()].push(outcome.value(metric));
        }
    }

    pub fn extend<'a>(&mut self, outcomes: impl IntoIterator<Item = &'a Outcome>) {
        for outcome in outcomes {
            self.push(outcome);
        }
    }

    pub fn len(&self) -> usize {
        self.series[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn series(&self, metric: Metric) -> &[f64] {
        &self.series[metric.index()]
    }

    pub fn mean(&self, metric: Metric) -> Result<f64> {
        ArrayView1::from(self.series(metric))
            .mean()
            .ok_or(QueueError::UndefinedRatio("mean of zero observations"))
    }

    /// Sample standard deviation over the square root of the sample size.
    pub fn standard_error(&self, metric: Metric) -> Result<f64> {
        let values = ArrayView1::from(self.series(metric));
        if values.len() < 2 {
            return Err(QueueError::UndefinedRatio(
                "standard error of fewer than two observations",
            ));
        }
        Ok(values.std(1.0) / (values.len() as f64).sqrt())
    }

    /// `1.96 * standard error`.
    pub fn half_width(&self, metric: Metric) -> Result<f64> {
        Ok(Z_95 * self.standard_error(metric)?)
    }

    /// Full width of the 95% confidence interval, `2 * 1.96 * standard error`.
    pub fn interval_width(&self, metric: Metric) -> Result<f64> {
        Ok(2.0 * self.half_width(metric)?)
    }
}
