use crate::engine::arrivals::ArrivalRecord;
use crate::engine::models::QueueModel;
use crate::engine::outcome::{rejection_ratio, Outcome};
use crate::engine::random_process::RandomSource;
use crate::engine::scenario::Scenario;
use crate::engine::server_pool::ServerPool;
use crate::error::{QueueError, Result};

/// Multi-server queue whose customers balk when the backlog grows.
///
/// Every arrival is admitted tentatively. Once the servers that are free at
/// its arrival time have taken waiting customers, the newest arrival balks
/// with probability `r / (r + n)`, `r` being the number of customers queued
/// ahead of it, and is then removed from the record.
#[derive(Debug, Clone, Copy, Default)]
pub struct Impatient;

/// Probability that a customer finding `backlog` others waiting in front of
/// `servers` servers walks away.
pub fn balk_probability(backlog: usize, servers: usize) -> Result<f64> {
    if servers == 0 {
        return Err(QueueError::InvalidCapacity(servers));
    }
    Ok(backlog as f64 / (backlog + servers) as f64)
}

impl QueueModel for Impatient {
    fn name(&self) -> &'static str {
        "impatient"
    }

    fn replicate<S: RandomSource>(
        &self,
        scenario: &Scenario,
        source: &mut S,
    ) -> Result<Outcome> {
        let servers = scenario.servers();
        let mut pool = ServerPool::new(servers)?;
        let mut arrivals = ArrivalRecord::new();
        let mut accepted = 0usize;
        let mut rejected = 0u64;
        let mut ratio = 0.0;
        let mut max_wait = 0.0f64;
        let mut clock = 0.0;

        loop {
            let gap = source.next_interarrival(scenario.arrival_rate())?;
            if clock + gap > scenario.horizon() {
                break;
            }
            clock += gap;
            arrivals.push(clock);

            // earliest free server is recomputed after each assignment
            while accepted < arrivals.len() {
                let (server, free_at) = pool.earliest_free();
                if free_at > clock {
                    break;
                }
                let Some(arrived) = arrivals.get(accepted) else {
                    break;
                };
                let duration = source.next_service_time(scenario.service())?;
                let done = pool.assign(server, arrived, duration);
                max_wait = max_wait.max(done - arrived);
                accepted += 1;
            }

            // customers waiting ahead of the newest arrival
            let backlog = (arrivals.len() - 1).saturating_sub(accepted);
            let p = balk_probability(backlog, servers)?;
            if source.next_balk_decision(p)? {
                arrivals.retract_latest();
                rejected += 1;
            }

            let queued = arrivals.len() - accepted;
            ratio = rejection_ratio(accepted as u64, rejected, queued as u64)?;
        }

        Ok(Outcome {
            accepted: accepted as u64,
            rejected,
            rejection_ratio: ratio,
            max_wait,
        })
    }
}
