use crate::error::{QueueError, Result};

/// Result of one replication.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    /// Customers assigned to a server.
    pub accepted: u64,
    /// Customers that balked or were blocked.
    pub rejected: u64,
    /// `rejected / (accepted + rejected + still queued)` at the end of the horizon.
    pub rejection_ratio: f64,
    /// Longest time between an arrival and the end of its service.
    pub max_wait: f64,
}

impl Outcome {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Accepted => self.accepted as f64,
            Metric::Rejected => self.rejected as f64,
            Metric::RejectionRatio => self.rejection_ratio,
            Metric::MaxWait => self.max_wait,
        }
    }
}

/// The four quantities estimated by an experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Accepted,
    Rejected,
    RejectionRatio,
    MaxWait,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Accepted,
        Metric::Rejected,
        Metric::RejectionRatio,
        Metric::MaxWait,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Accepted => "accepted",
            Metric::Rejected => "rejected",
            Metric::RejectionRatio => "rejection ratio",
            Metric::MaxWait => "max wait",
        }
    }
}

/// `rejected / (accepted + rejected + queued)`.
pub fn rejection_ratio(accepted: u64, rejected: u64, queued: u64) -> Result<f64> {
    let total = accepted + rejected + queued;
    if total == 0 {
        return Err(QueueError::UndefinedRatio(
            "rejection ratio before any arrival",
        ));
    }
    Ok(rejected as f64 / total as f64)
}
