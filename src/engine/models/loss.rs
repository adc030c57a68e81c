use crate::engine::models::QueueModel;
use crate::engine::outcome::Outcome;
use crate::engine::random_process::RandomSource;
use crate::engine::scenario::Scenario;
use crate::engine::server_pool::ServerPool;
use crate::error::Result;

/// Erlang loss system: an arrival takes a free server or is blocked.
#[derive(Debug, Clone, Copy, Default)]
pub struct Loss;

impl QueueModel for Loss {
    fn name(&self) -> &'static str {
        "loss"
    }

    fn replicate<S: RandomSource>(
        &self,
        scenario: &Scenario,
        source: &mut S,
    ) -> Result<Outcome> {
        let mut pool = ServerPool::new(scenario.servers())?;
        let mut accepted = 0u64;
        let mut rejected = 0u64;
        let mut clock = 0.0;

        loop {
            let gap = source.next_interarrival(scenario.arrival_rate())?;
            if clock + gap > scenario.horizon() {
                break;
            }
            clock += gap;

            let (server, free_at) = pool.earliest_free();
            if free_at <= clock {
                let duration = source.next_service_time(scenario.service())?;
                pool.assign(server, clock, duration);
                accepted += 1;
            } else {
                rejected += 1;
            }
        }

        let total = accepted + rejected;
        let rejection_ratio = if total == 0 {
            0.0
        } else {
            rejected as f64 / total as f64
        };

        Ok(Outcome {
            accepted,
            rejected,
            rejection_ratio,
            max_wait: 0.0,
        })
    }
}
