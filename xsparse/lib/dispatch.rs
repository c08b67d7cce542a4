//! Batch solution of many potentials on a fixed-size worker pool.
//!
//! Each potential is an independent task running [`solve`] with a shared,
//! read-only [`SolverConfig`]. Tasks are tagged with their submission index and
//! reported over a channel as they finish; once the whole batch has joined,
//! results are placed back in submission order. A task that fails only marks
//! its own slot.
//!
//! ```
//! use xsparse::{
//!     dispatch::Dispatcher,
//!     potential::{ Harmonic, Potential },
//!     solve::SolverConfig,
//! };
//!
//! let potentials: Vec<Box<dyn Potential>> = vec![
//!     Box::new(Harmonic { c: 1.0 }),
//!     Box::new(Harmonic { c: 4.0 }),
//! ];
//! let dispatcher = Dispatcher::new(Some(2), SolverConfig::default()).unwrap();
//! let batch = dispatcher.run(potentials.iter().map(|p| p.as_ref()));
//! dispatcher.shutdown();
//! let e0: Vec<f64>
//!     = batch.results.iter()
//!     .map(|res| res.as_ref().unwrap().evals[0])
//!     .collect();
//! assert!((e0[0] - 1.0).abs() < 0.05);
//! assert!((e0[1] - 2.0).abs() < 0.05);
//! ```

use std::{ sync::mpsc, thread, time::{ Duration, Instant } };
use rayon::{ ThreadPool, ThreadPoolBuilder };
use tracing::{ debug, info };
use crate::{
    error::DispatchError,
    potential::Potential,
    solve::{ EigenResult, SolverConfig, XResult, solve },
};

/// Outcome of a single task.
pub type SlotResult = XResult<EigenResult>;

/// Output of [`Dispatcher::run`].
#[derive(Debug)]
pub struct Batch {
    /// Per-task outcomes, in submission order.
    pub results: Vec<SlotResult>,
    /// Total wall-clock time for the batch.
    pub elapsed: Duration,
    /// Submission indices in the order that tasks finished.
    pub completion: Vec<usize>,
}

impl Batch {
    /// Get the number of tasks.
    pub fn len(&self) -> usize { self.results.len() }

    /// Return `true` if no tasks were submitted.
    pub fn is_empty(&self) -> bool { self.results.is_empty() }

    /// Count the tasks that failed.
    pub fn num_failed(&self) -> usize {
        self.results.iter().filter(|res| res.is_err()).count()
    }
}

/// Return the number of threads used when no pool size is given, i.e. the
/// available parallelism of the host (or 1, if it cannot be determined).
pub fn default_pool_size() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// Owner of a fixed-size worker pool.
///
/// The pool lives exactly as long as the `Dispatcher`; no global pool is
/// touched.
pub struct Dispatcher {
    pool: ThreadPool,
    config: SolverConfig,
}

impl Dispatcher {
    /// Create a new pool of `pool_size` threads (default:
    /// [`default_pool_size`]) that will solve every potential with `config`.
    ///
    /// Fails if zero threads are requested or the threads cannot be spawned.
    pub fn new(pool_size: Option<usize>, config: SolverConfig)
        -> Result<Self, DispatchError>
    {
        let nthreads
            = match pool_size {
                Some(0) => { return Err(DispatchError::BadPoolSize); },
                Some(n) => n,
                None => default_pool_size(),
            };
        let pool
            = ThreadPoolBuilder::new()
            .num_threads(nthreads)
            .thread_name(|k| format!("xsparse-worker-{}", k))
            .build()?;
        debug!(nthreads, "dispatch: pool created");
        Ok(Self { pool, config })
    }

    /// Get the number of worker threads.
    pub fn pool_size(&self) -> usize { self.pool.current_num_threads() }

    /// Get a reference to the solver configuration.
    pub fn get_config(&self) -> &SolverConfig { &self.config }

    /// Solve every potential, blocking until all are done.
    ///
    /// The `k`-th result always belongs to the `k`-th potential, regardless of
    /// the order in which the tasks finish.
    pub fn run<'a, I, P>(&self, potentials: I) -> Batch
    where
        I: IntoIterator<Item = &'a P>,
        P: Potential + ?Sized + 'a,
    {
        let potentials: Vec<&P> = potentials.into_iter().collect();
        let ntasks = potentials.len();
        let config = &self.config;
        let t0 = Instant::now();

        let (tx, rx) = mpsc::channel::<(usize, SlotResult)>();
        self.pool.scope(|s| {
            for (index, &potential) in potentials.iter().enumerate() {
                let tx = tx.clone();
                s.spawn(move |_| {
                    debug!(index, "dispatch: task started");
                    let res = solve(potential, config);
                    debug!(index, ok = res.is_ok(), "dispatch: task finished");
                    // `rx` outlives the scope
                    let _ = tx.send((index, res));
                });
            }
        });
        drop(tx);

        let mut slots: Vec<Option<SlotResult>>
            = (0..ntasks).map(|_| None).collect();
        let mut completion: Vec<usize> = Vec::with_capacity(ntasks);
        for (index, res) in rx {
            if let Err(err) = res.as_ref() {
                debug!(index, %err, "dispatch: task failed");
            }
            completion.push(index);
            slots[index] = Some(res);
        }
        // every task has reported once the scope has joined
        let results: Vec<SlotResult> = slots.into_iter().flatten().collect();
        debug_assert_eq!(results.len(), ntasks);

        let elapsed = t0.elapsed();
        info!(
            ntasks,
            nthreads = self.pool_size(),
            elapsed_s = elapsed.as_secs_f64(),
            "dispatch: batch done",
        );
        Batch { results, elapsed, completion }
    }

    /// Tear down the worker pool.
    ///
    /// Equivalent to dropping `self`.
    pub fn shutdown(self) {
        debug!(nthreads = self.pool_size(), "dispatch: pool shut down");
    }
}

/// Create a [`Dispatcher`], run a single batch on it, and shut it down.
pub fn solve_batch<'a, I, P>(
    potentials: I,
    pool_size: Option<usize>,
    config: SolverConfig,
) -> Result<Batch, DispatchError>
where
    I: IntoIterator<Item = &'a P>,
    P: Potential + ?Sized + 'a,
{
    let dispatcher = Dispatcher::new(pool_size, config)?;
    let batch = dispatcher.run(potentials);
    dispatcher.shutdown();
    Ok(batch)
}
