use crate::engine::random_process::{check_rate, ServiceTime};
use crate::error::{QueueError, Result};

/// Validated parameters of a queueing system observed over `[0, horizon]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scenario {
    servers: usize,
    arrival_rate: f64,
    service: ServiceTime,
    horizon: f64,
}

impl Scenario {
    pub fn new(servers: usize, arrival_rate: f64, service: ServiceTime, horizon: f64) -> Result<Self> {
        if servers == 0 {
            return Err(QueueError::InvalidCapacity(servers));
        }
        check_rate(arrival_rate)?;
        service.validate()?;
        if !(horizon > 0.0 && horizon.is_finite()) {
            return Err(QueueError::InvalidHorizon(horizon));
        }
        Ok(Self {
            servers,
            arrival_rate,
            service,
            horizon,
        })
    }

    /// Exponential service with `service_rate`, the usual setup for the
    /// impatient customers model.
    pub fn impatient(servers: usize, arrival_rate: f64, service_rate: f64, horizon: f64) -> Result<Self> {
        Self::new(
            servers,
            arrival_rate,
            ServiceTime::Exponential { rate: service_rate },
            horizon,
        )
    }

    /// Constant service time, the usual setup for the loss system.
    pub fn loss(servers: usize, arrival_rate: f64, service_time: f64, horizon: f64) -> Result<Self> {
        Self::new(
            servers,
            arrival_rate,
            ServiceTime::Constant {
                duration: service_time,
            },
            horizon,
        )
    }

    pub fn servers(&self) -> usize {
        self.servers
    }

    pub fn arrival_rate(&self) -> f64 {
        self.arrival_rate
    }

    pub fn service(&self) -> ServiceTime {
        self.service
    }

    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    /// Offered load in Erlangs, `arrival_rate * mean service time`.
    pub fn offered_load(&self) -> f64 {
        self.arrival_rate * self.service.mean()
    }

    pub fn with_horizon(self, horizon: f64) -> Result<Self> {
        Self::new(self.servers, self.arrival_rate, self.service, horizon)
    }
}
