//! Functions to compute the lowest few solutions to the one-dimensional,
//! time-independent Schrödinger equation (TISE) for a single potential.
//!
//! A solve runs the whole pipeline for one [`Potential`]: grid construction,
//! Hamiltonian assembly, sparse eigen-extraction via [`eigs`], and
//! normalization of the eigenvectors so that `∫|ψ|² dx = 1` under the
//! trapezoidal rule.

use std::cmp;
use ndarray as nd;
use tracing::debug;
use crate::{
    eigs::{ EigsOptions, Which, eigs },
    error::XError,
    grid::Grid,
    hamiltonian::Hamiltonian,
    potential::Potential,
    utils::{ density, wf_norm, wf_renormalize },
};

pub type XResult<T> = Result<T, XError>;

// smallest acceptable value of √(∫|ψ|² dx) before normalization
const NORM_FLOOR: f64 = 1e-12;

/// Grid and eigensolver parameters for a single solve.
#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfig {
    /// Left endpoint of the grid (default: `-10`).
    pub xmin: f64,
    /// Right endpoint of the grid (default: `10`).
    pub xmax: f64,
    /// Number of grid points (default: `250`).
    pub n: usize,
    /// Eigensolver options; `eigs.k` is the number of states (default: `5`).
    pub eigs: EigsOptions,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self { xmin: -10.0, xmax: 10.0, n: 250, eigs: EigsOptions::default() }
    }
}

impl SolverConfig {
    /// Create a new config on the default grid that extracts `k` states from
    /// the selected part of the spectrum.
    pub fn new(k: usize, which: Which) -> Self {
        Self {
            eigs: EigsOptions { k, which, ..EigsOptions::default() },
            ..Self::default()
        }
    }

    /// Get the number of states to extract.
    pub fn k(&self) -> usize { self.eigs.k }

    /// Check that all parameters are valid without doing any work.
    pub fn check(&self) -> XResult<()> {
        XError::check_bounds(self.xmin, self.xmax)?;
        self.eigs.check(self.n)?;
        Ok(())
    }

    /// Construct the coordinate grid.
    pub fn grid(&self) -> XResult<Grid> {
        Grid::new_linspace(self.xmin, self.xmax, self.n)
    }
}

/// The lowest few solutions to the TISE for a single potential.
#[derive(Clone, Debug)]
pub struct EigenResult {
    /// Energies, ordered by distance from the eigensolver's target (for
    /// [`Which::SmallestMagnitude`] and a positive spectrum, this is
    /// ascending).
    pub evals: nd::Array1<f64>,
    /// Wavefunctions, as columns aligned with `evals`, normalized to unit
    /// trapezoidal norm over `grid`.
    pub evecs: nd::Array2<f64>,
    /// Coordinate grid.
    pub grid: Grid,
    /// Largest imaginary part discarded from `evals`.
    pub max_imag: f64,
    /// Number of eigensolver iterations.
    pub iters: usize,
}

impl EigenResult {
    /// Get the number of states.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.evals.len() }

    /// Get a view of the `i`-th wavefunction.
    ///
    /// *Panics if `i` is out of bounds*.
    pub fn wf(&self, i: usize) -> nd::ArrayView1<'_, f64> { self.evecs.column(i) }

    /// Compute the probability density of the `i`-th wavefunction.
    ///
    /// *Panics if `i` is out of bounds*.
    pub fn density(&self, i: usize) -> nd::Array1<f64> { density(&self.wf(i)) }

    /// Return state indices sorted by increasing energy.
    pub fn sorted_indices(&self) -> Vec<usize> {
        let mut idx: Vec<usize> = (0..self.len()).collect();
        idx.sort_by(|&a, &b| {
            self.evals[a].partial_cmp(&self.evals[b])
                .unwrap_or(cmp::Ordering::Equal)
        });
        idx
    }
}

/// Solve the TISE for `potential` on the grid described by `config`.
///
/// Fails with a contract violation if `config` is invalid or `potential` does
/// not return one value per grid point, and with a numerical failure if the
/// eigensolver does not converge or a wavefunction cannot be normalized.
pub fn solve<P>(potential: &P, config: &SolverConfig) -> XResult<EigenResult>
where P: Potential + ?Sized
{
    config.check()?;
    let grid = config.grid()?;
    let dx = grid.get_dx();
    let H = Hamiltonian::from_potential(&grid, potential)?;
    let res = eigs(&H, &config.eigs)?;
    let mut evecs = res.evecs;
    for (j, mut wf) in evecs.columns_mut().into_iter().enumerate() {
        if wf_renormalize(&mut wf, dx, NORM_FLOOR).is_none() {
            let norm = wf_norm(&wf, dx).sqrt();
            return Err(XError::ZeroNorm { index: j, norm });
        }
    }
    debug!(n = grid.len(), k = config.k(), iters = res.iters, "solve: done");
    Ok(EigenResult {
        evals: res.evals,
        evecs,
        grid,
        max_imag: res.max_imag,
        iters: res.iters,
    })
}
