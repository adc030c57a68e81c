use std::{fs::File, io::BufReader, path::Path, time::Duration};

use serde::Deserialize;

use crate::{
    analyzer::controller::{check_replication_cap, ReplicationController, DEFAULT_BATCH_SIZE},
    engine::{models::Model, random_process::ServiceTime, scenario::Scenario},
    error::{QueueError, Result},
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServiceConfig {
    rate: Option<f64>,
    time: Option<f64>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum PolicyKind {
    Confidence,
    Fixed,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExperimentSection {
    policy: PolicyKind,
    threshold: Option<f64>,
    replications: Option<usize>,
    #[serde(default = "default_batch_size")]
    batch_size: usize,
    max_replications: Option<usize>,
    timeout_secs: Option<f64>,
    #[serde(default)]
    parallel: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParsedConfig {
    model: Model,
    servers: usize,
    arrival_rate: f64,
    service: ServiceConfig,
    horizon: f64,
    seed: Option<u64>,
    experiment: ExperimentSection,
}

/// How an experiment decides to stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoppingPolicy {
    Confidence { threshold: f64 },
    Fixed { replications: usize },
}

/// A validated experiment description.
#[derive(Debug, Clone)]
pub struct ExperimentConfig {
    pub model: Model,
    pub scenario: Scenario,
    pub seed: Option<u64>,
    pub policy: StoppingPolicy,
    pub batch_size: usize,
    pub max_replications: Option<usize>,
    pub timeout: Option<Duration>,
    pub parallel: bool,
}

impl ExperimentConfig {
    /// Controller configured with everything but the stopping policy.
    pub fn controller(&self) -> Result<ReplicationController> {
        let mut controller = ReplicationController::new(self.model, self.scenario)
            .with_batch_size(self.batch_size)?
            .with_parallel(self.parallel)
            .with_max_replications(self.max_replications)
            .with_timeout(self.timeout);
        if let Some(seed) = self.seed {
            controller = controller.with_seed(seed);
        }
        Ok(controller)
    }
}

fn parse_service(service: ServiceConfig) -> Result<ServiceTime> {
    match (service.rate, service.time) {
        (Some(rate), None) => Ok(ServiceTime::Exponential { rate }),
        (None, Some(duration)) => Ok(ServiceTime::Constant { duration }),
        _ => Err(QueueError::Config(
            "service needs exactly one of `rate` or `time`".to_string(),
        )),
    }
}

fn parse_policy(experiment: &ExperimentSection) -> Result<StoppingPolicy> {
    match experiment.policy {
        PolicyKind::Confidence => {
            let threshold = experiment.threshold.ok_or_else(|| {
                QueueError::Config("confidence policy needs a `threshold`".to_string())
            })?;
            if !(threshold > 0.0 && threshold.is_finite()) {
                return Err(QueueError::InvalidThreshold(threshold));
            }
            Ok(StoppingPolicy::Confidence { threshold })
        }
        PolicyKind::Fixed => {
            let replications = experiment.replications.ok_or_else(|| {
                QueueError::Config("fixed policy needs `replications`".to_string())
            })?;
            if replications == 0 {
                return Err(QueueError::InvalidBudget);
            }
            Ok(StoppingPolicy::Fixed { replications })
        }
    }
}

fn parse_timeout(timeout_secs: Option<f64>) -> Result<Option<Duration>> {
    timeout_secs
        .map(|secs| {
            Duration::try_from_secs_f64(secs)
                .map_err(|e| QueueError::Config(format!("invalid timeout {secs}: {e}")))
        })
        .transpose()
}

fn validate(parsed: ParsedConfig) -> Result<ExperimentConfig> {
    let service = parse_service(parsed.service)?;
    let scenario = Scenario::new(parsed.servers, parsed.arrival_rate, service, parsed.horizon)?;
    let policy = parse_policy(&parsed.experiment)?;
    if parsed.experiment.batch_size < 2 {
        return Err(QueueError::InvalidBatchSize(parsed.experiment.batch_size));
    }
    check_replication_cap(
        parsed.experiment.max_replications,
        parsed.experiment.batch_size,
    )?;
    Ok(ExperimentConfig {
        model: parsed.model,
        scenario,
        seed: parsed.seed,
        policy,
        batch_size: parsed.experiment.batch_size,
        max_replications: parsed.experiment.max_replications,
        timeout: parse_timeout(parsed.experiment.timeout_secs)?,
        parallel: parsed.experiment.parallel,
    })
}

pub fn parse_config_str(document: &str) -> Result<ExperimentConfig> {
    validate(serde_yaml::from_str(document)?)
}

pub fn parse_config(path: &Path) -> Result<ExperimentConfig> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    validate(serde_yaml::from_reader(reader)?)
}
