//! End to end experiments driven by the replication controller.

use ndarray::ArrayView1;
use queueflow::{
    analyzer::CancellationToken, utils::erlang::erlang_b, Metric, Model, ReplicationController,
    Scenario, Termination,
};

fn impatient_controller(seed: u64) -> ReplicationController {
    let scenario = Scenario::impatient(5, 3.0, 0.5, 50.0).unwrap();
    ReplicationController::new(Model::Impatient, scenario)
        .with_seed(seed)
        .with_max_replications(Some(200_000))
}

#[test]
fn confidence_experiment_converges_below_threshold() {
    let threshold = 0.01;
    let report = impatient_controller(7)
        .run_until_confidence(threshold)
        .unwrap();

    assert_eq!(report.termination, Termination::Converged);
    let width = report.interval_width.unwrap();
    assert!(width < threshold, "{width} >= {threshold}");
    assert!(report.half_width().unwrap() < threshold);
    assert_eq!(report.replications() % 100, 0);

    let counts = report.checkpoint_counts();
    assert_eq!(counts.last().copied(), Some(report.replications()));
    assert!(counts.iter().enumerate().all(|(i, &k)| k == 100 * (i + 1)));
}

#[test]
fn interval_width_shrinks_as_batches_accumulate() {
    // never converges, so every run goes to the cap
    let widths: Vec<(f64, f64)> = (0..5)
        .map(|seed| {
            let report = impatient_controller(seed)
                .with_batch_size(50)
                .unwrap()
                .with_max_replications(Some(2_000))
                .run_until_confidence(1e-9)
                .unwrap();
            assert_eq!(report.termination, Termination::CapReached);
            let bands = report.error_bands();
            let first = bands.upper_w[0] - bands.lower_w[0];
            let last = bands.upper_w[bands.upper_w.len() - 1] - bands.lower_w[bands.lower_w.len() - 1];
            (first, last)
        })
        .collect();
    for (first, last) in widths {
        // 40 times the sample size, roughly a sixth of the width
        assert!(last < first, "{last} >= {first}");
    }
}

#[test]
fn moving_averages_match_prefix_means() {
    let report = impatient_controller(11)
        .with_batch_size(25)
        .unwrap()
        .with_max_replications(Some(500))
        .run_until_confidence(1e-9)
        .unwrap();

    let counts = report.checkpoint_counts();
    assert_eq!(counts.len(), 20);
    for metric in Metric::ALL {
        let averages = report.moving_average(metric);
        let raw = report.outcomes.series(metric);
        assert_eq!(raw.len(), 500);
        for (average, &count) in averages.iter().zip(&counts) {
            let expected = ArrayView1::from(&raw[..count]).mean().unwrap();
            assert_eq!(*average, expected, "{metric:?} at {count}");
        }
    }
}

#[test]
fn sequential_and_parallel_runs_agree() {
    let sequential = impatient_controller(99)
        .with_max_replications(Some(1_000))
        .run_until_confidence(1e-9)
        .unwrap();
    let parallel = impatient_controller(99)
        .with_parallel(true)
        .with_max_replications(Some(1_000))
        .run_until_confidence(1e-9)
        .unwrap();
    for metric in Metric::ALL {
        assert_eq!(
            sequential.outcomes.series(metric),
            parallel.outcomes.series(metric)
        );
    }
    assert_eq!(sequential.interval_width, parallel.interval_width);
    assert_eq!(sequential.checkpoints(), parallel.checkpoints());
}

#[test]
fn loss_system_blocking_is_close_to_erlang_b() {
    let scenario = Scenario::loss(6, 2.0, 2.0, 50.0).unwrap();
    let report = ReplicationController::new(Model::Loss, scenario)
        .with_seed(6)
        .run_fixed_budget(1_000)
        .unwrap();

    assert_eq!(report.replications, 1_000);
    assert_eq!(report.termination, Termination::BudgetExhausted);
    assert!((0.0..=1.0).contains(&report.mean_rejection_ratio));
    assert_eq!(report.mean_max_wait, 0.0);

    let reference = erlang_b(6, scenario.offered_load());
    assert!(
        (report.mean_rejection_ratio - reference).abs() < 0.025,
        "{} vs {reference}",
        report.mean_rejection_ratio
    );
    // about 100 arrivals per replication
    assert!((80.0..=120.0).contains(&(report.mean_accepted + report.mean_rejected)));
}

#[test]
fn cancellation_from_another_thread_stops_at_a_batch_boundary() {
    let token = CancellationToken::new();
    let controller = impatient_controller(3)
        .with_cancellation(token.clone())
        .with_max_replications(None);

    let handle = std::thread::spawn(move || controller.run_until_confidence(1e-12));
    std::thread::sleep(std::time::Duration::from_millis(50));
    token.cancel();

    let report = handle.join().unwrap().unwrap();
    assert_eq!(report.termination, Termination::Cancelled);
    assert_eq!(report.replications() % 100, 0);
    assert_eq!(report.checkpoint_counts().len(), report.replications() / 100);
}
