//! Properties of single replications of both queue models.

use queueflow::{run_replication, Model, Outcome, RandomProcess, Scenario};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn replicate(model: Model, scenario: &Scenario, seed: u64) -> Outcome {
    let mut process = RandomProcess::new(ChaCha8Rng::seed_from_u64(seed));
    run_replication(model, scenario, &mut process).unwrap()
}

#[test]
fn outcomes_stay_within_bounds() {
    let scenarios = [
        (Model::Impatient, Scenario::impatient(5, 3.0, 0.5, 50.0).unwrap()),
        (Model::Impatient, Scenario::impatient(1, 8.0, 0.2, 30.0).unwrap()),
        (Model::Loss, Scenario::loss(6, 2.0, 2.0, 50.0).unwrap()),
        (Model::Loss, Scenario::loss(1, 4.0, 3.0, 20.0).unwrap()),
    ];
    for (model, scenario) in scenarios {
        for seed in 0..100 {
            let outcome = replicate(model, &scenario, seed);
            assert!(
                (0.0..=1.0).contains(&outcome.rejection_ratio),
                "{model:?} seed {seed}: {outcome:?}"
            );
            assert!(outcome.max_wait >= 0.0);
        }
    }
}

#[test]
fn longer_horizon_never_processes_fewer_customers() {
    let base = [
        (Model::Impatient, Scenario::impatient(3, 3.0, 0.5, 5.0).unwrap()),
        (Model::Loss, Scenario::loss(3, 3.0, 2.0, 5.0).unwrap()),
    ];
    for (model, scenario) in base {
        for seed in 0..20 {
            let mut previous = 0;
            for horizon in [5.0, 10.0, 20.0, 40.0, 80.0] {
                let scenario = scenario.with_horizon(horizon).unwrap();
                let outcome = replicate(model, &scenario, seed);
                let processed = outcome.accepted + outcome.rejected;
                assert!(
                    processed >= previous,
                    "{model:?} seed {seed} horizon {horizon}: {processed} < {previous}"
                );
                previous = processed;
            }
        }
    }
}

#[test]
fn abundant_servers_reject_nobody() {
    let loss = Scenario::loss(1_000, 3.0, 2.0, 50.0).unwrap();
    let impatient = Scenario::impatient(1_000, 3.0, 0.5, 50.0).unwrap();
    for seed in 0..30 {
        assert_eq!(replicate(Model::Loss, &loss, seed).rejected, 0);
        assert_eq!(replicate(Model::Impatient, &impatient, seed).rejected, 0);
    }
}

#[test]
fn impatient_rejections_shrink_with_more_servers() {
    let mean_rejected = |servers: usize| {
        let scenario = Scenario::impatient(servers, 3.0, 0.5, 50.0).unwrap();
        (0..200)
            .map(|seed| replicate(Model::Impatient, &scenario, seed).rejected as f64)
            .sum::<f64>()
            / 200.0
    };
    let few = mean_rejected(3);
    let some = mean_rejected(6);
    let many = mean_rejected(20);
    assert!(few > some, "{few} <= {some}");
    assert!(some > many, "{some} <= {many}");
}

#[test]
fn smoke_scenario() {
    let scenario = Scenario::impatient(5, 3.0, 0.5, 50.0).unwrap();
    let outcome = replicate(Model::Impatient, &scenario, 20_240_501);
    let processed = outcome.accepted + outcome.rejected;
    assert!((50..=300).contains(&processed), "{outcome:?}");
    assert!(outcome.accepted > 0);
    assert!(outcome.max_wait > 0.0);
}

#[test]
fn replications_are_reproducible() {
    let scenario = Scenario::impatient(5, 3.0, 0.5, 50.0).unwrap();
    let first: Vec<Outcome> = (0..10)
        .map(|seed| replicate(Model::Impatient, &scenario, seed))
        .collect();
    let second: Vec<Outcome> = (0..10)
        .map(|seed| replicate(Model::Impatient, &scenario, seed))
        .collect();
    assert_eq!(first, second);
}
