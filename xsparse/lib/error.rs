//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! Errors returned for a single solve ([`XError`]) fall into two classes:
//! *contract violations*, where the caller has supplied an invalid
//! configuration or a potential that does not honor its length contract, and
//! *numerical failures*, where the eigensolver itself could not produce a
//! trustworthy result. Neither kind affects other solves in the same batch;
//! only [`DispatchError`] aborts a whole batch.
//!
//! [anyhow]: https://crates.io/crates/anyhow

use ndarray as nd;
use ndarray_linalg::error::LinalgError;
use thiserror::Error;

/// Returned when an operation requiring equal-length arrays encounters arrays
/// with unequal length.
#[derive(Debug, Error)]
#[error("encountered arrays with incompatible lengths; got {0} and {1}")]
pub struct LengthError(pub usize, pub usize);

impl LengthError {
    pub(crate) fn check<S, A, T, B>(
        a: &nd::ArrayBase<S, nd::Ix1>,
        b: &nd::ArrayBase<T, nd::Ix1>,
    ) -> Result<(), Self>
    where
        S: nd::Data<Elem = A>,
        T: nd::Data<Elem = B>,
    {
        let na = a.len();
        let nb = b.len();
        (na == nb).then_some(()).ok_or(Self(na, nb))
    }
}

/// Returned from single-potential solver functions.
#[derive(Debug, Error)]
pub enum XError {
    /// Returned when grid bounds are non-finite or not strictly increasing.
    #[error("grid bounds must be finite with xmin < xmax; got [{0}, {1}]")]
    BadBounds(f64, f64),

    /// Returned when the grid is too small to hold the requested number of
    /// eigenpairs.
    #[error("grid must have at least k + 1 points; got n = {n} for k = {k}")]
    BadGridSize { n: usize, k: usize },

    /// Returned when zero eigenpairs are requested.
    #[error("number of requested eigenpairs must be greater than 0")]
    BadEigCount,

    /// Returned when the iteration subspace cannot hold the requested
    /// eigenpairs or does not fit in the grid.
    #[error("subspace size must satisfy k <= ncv <= n; got ncv = {ncv} for k = {k}, n = {n}")]
    BadSubspace { ncv: usize, k: usize, n: usize },

    /// Returned when a non-positive `epsilon` value is encountered.
    #[error("epsilon values must be greater than 0; got {0}")]
    BadEpsilon(f64),

    /// Returned when a non-positive `maxiters` value is encountered.
    #[error("maxiters must be greater than 0; got {0}")]
    BadMaxiters(usize),

    /// Returned when the eigensolver fails to converge on all requested pairs
    /// within the iteration limit.
    #[error("eigs: only {converged} of {requested} eigenpairs converged after {iters} iterations")]
    NoConvergence { converged: usize, requested: usize, iters: usize },

    /// Returned when the Hamiltonian contains NaN or infinite elements, e.g.
    /// from a potential that is undefined somewhere on the grid.
    #[error("hamiltonian has non-finite elements")]
    NonFinite,

    /// Returned when an eigenvector has (numerically) zero norm and cannot be
    /// normalized.
    #[error("eigenvector {index} has near-zero norm {norm:e}")]
    ZeroNorm { index: usize, norm: f64 },

    /// [`LengthError`]
    #[error("array length error: {0}")]
    Length(#[from] LengthError),

    /// [`LinalgError`].
    #[error("linalg error: {0}")]
    Linalg(#[from] LinalgError),
}

impl XError {
    pub(crate) fn check_epsilon(epsilon: f64) -> Result<(), Self> {
        (epsilon > 0.0).then_some(()).ok_or(Self::BadEpsilon(epsilon))
    }

    pub(crate) fn check_maxiters(maxiters: usize) -> Result<(), Self> {
        (maxiters != 0).then_some(()).ok_or(Self::BadMaxiters(maxiters))
    }

    pub(crate) fn check_bounds(xmin: f64, xmax: f64) -> Result<(), Self> {
        (xmin.is_finite() && xmax.is_finite() && xmin < xmax)
            .then_some(())
            .ok_or(Self::BadBounds(xmin, xmax))
    }

    pub(crate) fn check_counts(n: usize, k: usize) -> Result<(), Self> {
        if k == 0 { return Err(Self::BadEigCount); }
        (n > k).then_some(()).ok_or(Self::BadGridSize { n, k })
    }

    /// Return `true` if `self` was caused by invalid input rather than by the
    /// numerics.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::BadBounds(..)
            | Self::BadGridSize { .. }
            | Self::BadEigCount
            | Self::BadSubspace { .. }
            | Self::BadEpsilon(_)
            | Self::BadMaxiters(_)
            | Self::Length(_)
        )
    }

    /// Return `true` if `self` was raised by the eigensolver or normalization.
    pub fn is_numerical_failure(&self) -> bool { !self.is_contract_violation() }
}

/// Returned from batch dispatch when the worker pool cannot be set up.
///
/// No tasks are run if this error is returned.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Returned when a pool of zero threads is requested.
    #[error("pool size must be greater than 0")]
    BadPoolSize,

    /// [`rayon::ThreadPoolBuildError`]
    #[error("failed to create worker pool: {0}")]
    PoolCreation(#[from] rayon::ThreadPoolBuildError),
}
