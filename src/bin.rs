use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use itertools::izip;
use std::path::Path;

use queueflow::{
    analyzer::{ConfidenceReport, FixedBudgetReport},
    engine::models::QueueModel,
    logging::init_logging,
    parser::yaml_parser::{parse_config, ExperimentConfig, StoppingPolicy},
    utils::erlang::erlang_b,
    Metric, Model, Result,
};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    /// Path to the Yaml experiment file
    #[arg(short, long)]
    pub config: String,

    /// Overrides the seed of the experiment file
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Run the replications of each batch on all cores
    #[arg(short, long)]
    pub parallel: bool,

    /// Print the moving averages recorded at every checkpoint
    #[arg(long)]
    pub checkpoints: bool,

    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {pos} replications {msg} [{elapsed}]") {
        bar.set_style(style);
    }
    bar
}

fn print_scenario(config: &ExperimentConfig) {
    let scenario = &config.scenario;
    println!("model: {}", config.model.name());
    println!(
        "servers: {}, arrival rate: {}, service: {:?}, horizon: {}",
        scenario.servers(),
        scenario.arrival_rate(),
        scenario.service(),
        scenario.horizon()
    );
}

fn print_confidence(report: &ConfidenceReport, show_checkpoints: bool) -> Result<()> {
    println!("seed: {}", report.seed);
    println!(
        "replications: {} ({:?})",
        report.replications(),
        report.termination
    );
    if report.replications() == 0 {
        return Ok(());
    }
    for metric in Metric::ALL {
        println!("mean {}: {}", metric.label(), report.mean(metric)?);
    }
    if let Some(half_width) = report.half_width() {
        println!(
            "rejection ratio: {}±{} (threshold {} on interval width)",
            report.mean(Metric::RejectionRatio)?,
            half_width,
            report.threshold
        );
    }

    if show_checkpoints {
        let bands = report.error_bands();
        println!("k;accepted;rejected;ratio;max_wait;ratio_low;ratio_high;wait_low;wait_high");
        for (k, x, y, w, tm, lw, uw, ltm, utm) in izip!(
            report.checkpoint_counts(),
            report.moving_average(Metric::Accepted),
            report.moving_average(Metric::Rejected),
            report.moving_average(Metric::RejectionRatio),
            report.moving_average(Metric::MaxWait),
            bands.lower_w,
            bands.upper_w,
            bands.lower_tm,
            bands.upper_tm
        ) {
            println!("{k};{x};{y};{w};{tm};{lw};{uw};{ltm};{utm}");
        }
    }
    Ok(())
}

fn print_fixed(report: &FixedBudgetReport, config: &ExperimentConfig) {
    println!("seed: {}", report.seed);
    println!(
        "replications: {} ({:?})",
        report.replications, report.termination
    );
    println!("mean accepted: {}", report.mean_accepted);
    println!("mean rejected: {}", report.mean_rejected);
    match report.rejection_ratio_half_width {
        Some(half_width) => println!(
            "mean rejection ratio: {}±{}",
            report.mean_rejection_ratio, half_width
        ),
        None => println!("mean rejection ratio: {}", report.mean_rejection_ratio),
    }
    println!("mean max wait: {}", report.mean_max_wait);
    if config.model == Model::Loss {
        println!(
            "erlang B reference: {}",
            erlang_b(config.scenario.servers(), config.scenario.offered_load())
        );
    }
}

pub fn main() -> Result<()> {
    let args = Arguments::parse();
    init_logging(&args.log_level);

    let mut config = parse_config(Path::new(&args.config))?;
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    config.parallel |= args.parallel;
    print_scenario(&config);

    let controller = config.controller()?.with_progress(progress_bar());
    match config.policy {
        StoppingPolicy::Confidence { threshold } => {
            let report = controller.run_until_confidence(threshold)?;
            print_confidence(&report, args.checkpoints)?;
        }
        StoppingPolicy::Fixed { replications } => {
            let report = controller.run_fixed_budget(replications)?;
            print_fixed(&report, &config);
        }
    }
    Ok(())
}
