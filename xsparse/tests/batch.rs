use std::{ thread, time::Duration };
use ndarray as nd;
use xsparse::{
    dispatch::{ Dispatcher, default_pool_size, solve_batch },
    error::{ DispatchError, XError },
    potential::{ DoubleWell, Harmonic, InfiniteWell, Potential },
    solve::{ SolverConfig, solve },
};

// harmonic potential that takes a while to evaluate
struct Slow {
    c: f64,
    delay: Duration,
}

impl Potential for Slow {
    fn eval(&self, x: &nd::Array1<f64>) -> nd::Array1<f64> {
        thread::sleep(self.delay);
        Harmonic { c: self.c }.eval(x)
    }
}

fn staggered() -> Vec<Slow> {
    // earliest submissions finish last
    (1..=4)
        .map(|k| Slow {
            c: (k * k) as f64,
            delay: Duration::from_millis(100 * (4 - k) as u64),
        })
        .collect()
}

fn ground_energy(res: &Result<xsparse::solve::EigenResult, XError>) -> f64 {
    let res = res.as_ref().unwrap();
    res.evals[res.sorted_indices()[0]]
}

#[test]
fn order_preserved_under_staggered_latency() {
    let potentials = staggered();
    for pool_size in [1, 2, 4] {
        let batch = solve_batch(
            potentials.iter(), Some(pool_size), SolverConfig::default())
            .unwrap();
        assert_eq!(batch.len(), 4);
        assert_eq!(batch.num_failed(), 0);
        let mut completion = batch.completion.clone();
        completion.sort_unstable();
        assert_eq!(completion, vec![0, 1, 2, 3]);
        if pool_size == 4 {
            // the last submission sleeps least and should not finish last
            assert_ne!(batch.completion, vec![0, 1, 2, 3]);
        }
        for (k, res) in batch.results.iter().enumerate() {
            // ground state of c x² is √c
            let expected = (k + 1) as f64;
            assert!((ground_energy(res) - expected).abs() / expected < 0.05);
        }
    }
}

#[test]
fn matches_serial_solves() {
    let potentials: Vec<Box<dyn Potential>> = vec![
        Box::new(Harmonic::default()),
        Box::new(InfiniteWell::default()),
        Box::new(DoubleWell::default()),
    ];
    let config = SolverConfig::default();
    let dispatcher = Dispatcher::new(None, config.clone()).unwrap();
    assert_eq!(dispatcher.pool_size(), default_pool_size());
    assert_eq!(dispatcher.get_config(), &config);
    let batch = dispatcher.run(potentials.iter().map(|p| p.as_ref()));
    dispatcher.shutdown();
    for (potential, res) in potentials.iter().zip(&batch.results) {
        let serial = solve(potential.as_ref(), &config).unwrap();
        let parallel = res.as_ref().unwrap();
        assert!(
            (&serial.evals - &parallel.evals).iter().all(|d| d.abs() < 1e-12)
        );
        assert_eq!(serial.grid, parallel.grid);
    }
    assert!(batch.elapsed > Duration::ZERO);
}

#[test]
fn failure_is_isolated_to_its_slot() {
    let good = Harmonic::default();
    let bad = |x: &nd::Array1<f64>| nd::Array1::<f64>::zeros(x.len() / 2);
    let potentials: Vec<&dyn Potential> = vec![&good, &bad, &good];
    let batch = solve_batch(potentials, Some(3), SolverConfig::default())
        .unwrap();
    assert_eq!(batch.num_failed(), 1);
    assert!(batch.results[0].is_ok());
    assert!(batch.results[2].is_ok());
    let err = batch.results[1].as_ref().unwrap_err();
    assert!(err.is_contract_violation());
    assert!(matches!(err, XError::Length(_)));
}

#[test]
fn numerical_failure_is_isolated_to_its_slot() {
    let good = DoubleWell::default();
    // undefined on the right half of the grid
    let bad = |x: &nd::Array1<f64>| {
        x.mapv(|xk| if xk > 0.0 { f64::NAN } else { xk * xk })
    };
    let potentials: Vec<&dyn Potential> = vec![&bad, &good, &good, &bad];
    let batch = solve_batch(potentials, Some(2), SolverConfig::default())
        .unwrap();
    assert_eq!(batch.num_failed(), 2);
    assert!(batch.results[1].is_ok());
    assert!(batch.results[2].is_ok());
    for i in [0, 3] {
        let err = batch.results[i].as_ref().unwrap_err();
        assert!(err.is_numerical_failure());
        assert!(matches!(err, XError::NonFinite));
    }
}

#[test]
fn bad_config_fails_every_slot() {
    let config = SolverConfig { n: 3, ..SolverConfig::default() };
    let potentials = [Harmonic::default(), Harmonic { c: 2.0 }];
    let batch = solve_batch(potentials.iter(), Some(2), config).unwrap();
    assert_eq!(batch.num_failed(), 2);
    assert!(batch.results.iter()
        .all(|res| res.as_ref().unwrap_err().is_contract_violation()));
}

#[test]
fn zero_threads_is_rejected() {
    let res = Dispatcher::new(Some(0), SolverConfig::default());
    assert!(matches!(res, Err(DispatchError::BadPoolSize)));
}

#[test]
fn empty_batch() {
    let potentials: Vec<Harmonic> = Vec::new();
    let batch = solve_batch(potentials.iter(), Some(2), SolverConfig::default())
        .unwrap();
    assert!(batch.is_empty());
    assert!(batch.completion.is_empty());
}
