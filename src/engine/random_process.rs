use rand::Rng;
use rand_distr::{Bernoulli, Distribution, Exp};

use crate::error::{QueueError, Result};

/// How long a customer occupies a server.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ServiceTime {
    /// Exponentially distributed with the given rate (mean `1 / rate`).
    Exponential { rate: f64 },
    /// Every customer is served for exactly `duration`.
    Constant { duration: f64 },
}

impl ServiceTime {
    pub fn validate(&self) -> Result<()> {
        match *self {
            ServiceTime::Exponential { rate } => check_rate(rate),
            ServiceTime::Constant { duration } if duration > 0.0 && duration.is_finite() => Ok(()),
            ServiceTime::Constant { duration } => Err(QueueError::InvalidServiceTime(duration)),
        }
    }

    /// Expected service duration.
    pub fn mean(&self) -> f64 {
        match *self {
            ServiceTime::Exponential { rate } => 1.0 / rate,
            ServiceTime::Constant { duration } => duration,
        }
    }
}

pub(crate) fn check_rate(rate: f64) -> Result<()> {
    // also rejects NaN
    if rate > 0.0 && rate.is_finite() {
        Ok(())
    } else {
        Err(QueueError::InvalidRate(rate))
    }
}

/// Draws a replication needs, in the order the model asks for them.
pub trait RandomSource {
    fn next_interarrival(&mut self, rate: f64) -> Result<f64>;

    fn next_service_time(&mut self, service: ServiceTime) -> Result<f64>;

    /// Returns `true` with probability `p`.
    fn next_balk_decision(&mut self, p: f64) -> Result<bool>;
}

/// Source of every random draw made by a replication.
///
/// The generator is injected so that a replication is fully determined by
/// the state of `rng` when it starts.
pub struct RandomProcess<R> {
    rng: R,
}

impl<R: Rng> RandomProcess<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> RandomSource for RandomProcess<R> {
    fn next_interarrival(&mut self, rate: f64) -> Result<f64> {
        check_rate(rate)?;
        let exp = Exp::new(rate).map_err(|_| QueueError::InvalidRate(rate))?;
        Ok(exp.sample(&mut self.rng))
    }

    /// Constant durations are returned as is and consume no randomness.
    fn next_service_time(&mut self, service: ServiceTime) -> Result<f64> {
        service.validate()?;
        match service {
            ServiceTime::Exponential { rate } => {
                let exp = Exp::new(rate).map_err(|_| QueueError::InvalidRate(rate))?;
                Ok(exp.sample(&mut self.rng))
            }
            ServiceTime::Constant { duration } => Ok(duration),
        }
    }

    fn next_balk_decision(&mut self, p: f64) -> Result<bool> {
        let bernoulli = Bernoulli::new(p).map_err(|_| QueueError::InvalidProbability(p))?;
        Ok(bernoulli.sample(&mut self.rng))
    }
}
