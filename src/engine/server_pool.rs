use itertools::Itertools;

use crate::error::{QueueError, Result};

/// Time at which each of `n` servers next becomes free.
#[derive(Debug, Clone)]
pub struct ServerPool {
    free_times: Vec<f64>,
}

impl ServerPool {
    pub fn new(servers: usize) -> Result<Self> {
        if servers == 0 {
            return Err(QueueError::InvalidCapacity(servers));
        }
        Ok(Self {
            free_times: vec![0.0; servers],
        })
    }

    pub fn len(&self) -> usize {
        self.free_times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free_times.is_empty()
    }

    /// Server with the smallest free time, lowest index on ties.
    pub fn earliest_free(&self) -> (usize, f64) {
        // position_min_by keeps the first of equal elements
        let index = self
            .free_times
            .iter()
            .position_min_by(|a, b| a.total_cmp(b))
            .unwrap_or(0);
        (index, self.free_times[index])
    }

    /// Starts serving a customer who arrived at `arrival_time` on `server`.
    /// Service begins once both the server is free and the customer has
    /// arrived. Returns the server's new free time.
    pub fn assign(&mut self, server: usize, arrival_time: f64, duration: f64) -> f64 {
        let slot = &mut self.free_times[server];
        *slot = slot.max(arrival_time) + duration;
        *slot
    }

    pub fn free_times(&self) -> &[f64] {
        &self.free_times
    }
}
