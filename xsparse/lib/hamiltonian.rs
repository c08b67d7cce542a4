//! The three-point finite-difference Hamiltonian `-∂² + V(x)`.
//!
//! On a uniform grid with spacing `dx`, the second derivative is approximated
//! by `(f[i - 1] - 2 f[i] + f[i + 1]) / dx²`, so the Hamiltonian is the
//! symmetric tridiagonal matrix
//! ```text
//! H[i, i]     =  2 / dx² + V[i]
//! H[i, i ± 1] = -1 / dx²
//! ```
//! Neighbors just outside the grid are taken to be zero, which imposes
//! Dirichlet boundary conditions at `x[0] - dx` and `x[n - 1] + dx`.
//!
//! Only the diagonal and the (constant) off-diagonal are stored. For
//! eigensolves, the shifted operator `H - σ` is converted to LAPACK's
//! tridiagonal format and LU-factorized with partial pivoting (`?gttrf`).

use ndarray as nd;
use ndarray_linalg::{
    FactorizeTridiagonalInto,
    LUFactorizedTridiagonal,
    Tridiagonal,
    layout::MatrixLayout,
};
use crate::{
    Arr1,
    Arr2,
    error::LengthError,
    grid::Grid,
    potential::Potential,
    solve::XResult,
};

/// Sparse (tridiagonal) Hamiltonian matrix.
#[derive(Clone, Debug)]
pub struct Hamiltonian {
    // main diagonal
    diag: nd::Array1<f64>,
    // value on both off-diagonals
    off: f64,
}

impl Hamiltonian {
    /// Assemble the Hamiltonian from a grid and a potential already sampled
    /// over it.
    ///
    /// Fails if `V` is not the same length as the grid.
    pub fn new<S>(grid: &Grid, V: &Arr1<S>) -> XResult<Self>
    where S: nd::Data<Elem = f64>
    {
        LengthError::check(grid.get_x(), V)?;
        let ondx2 = grid.get_dx().powi(2).recip();
        let diag: nd::Array1<f64> = V.mapv(|Vk| 2.0 * ondx2 + Vk);
        Ok(Self { diag, off: -ondx2 })
    }

    /// Sample `potential` over `grid` and assemble the Hamiltonian.
    ///
    /// Fails if the potential does not return one value per grid point.
    pub fn from_potential<P>(grid: &Grid, potential: &P) -> XResult<Self>
    where P: Potential + ?Sized
    {
        let V = potential.eval(grid.get_x());
        Self::new(grid, &V)
    }

    /// Get the size of the (square) matrix.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.diag.len() }

    /// Get a reference to the main diagonal.
    pub fn get_diag(&self) -> &nd::Array1<f64> { &self.diag }

    /// Get the value on the off-diagonals.
    pub fn get_off(&self) -> f64 { self.off }

    /// Get the `(i, j)`-th matrix element.
    ///
    /// *Panics if either index is out of bounds*.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        let n = self.len();
        assert!(i < n && j < n, "Hamiltonian::get: index out of bounds");
        if i == j {
            self.diag[i]
        } else if i.abs_diff(j) == 1 {
            self.off
        } else {
            0.0
        }
    }

    /// Expand into a dense matrix.
    pub fn to_dense(&self) -> nd::Array2<f64> {
        let n = self.len();
        let mut H: nd::Array2<f64> = nd::Array2::from_diag(&self.diag);
        if n > 1 {
            H.slice_mut(nd::s![1..n, 0..n - 1]).diag_mut().fill(self.off);
            H.slice_mut(nd::s![0..n - 1, 1..n]).diag_mut().fill(self.off);
        }
        H
    }

    /// Compute the matrix-vector product `H q`.
    ///
    /// *Panics if `q` does not have the same length as `self`*.
    pub fn dot<S>(&self, q: &Arr1<S>) -> nd::Array1<f64>
    where S: nd::Data<Elem = f64>
    {
        let n = self.len();
        let mut Hq: nd::Array1<f64> = &self.diag * q;
        if n > 1 {
            Hq.slice_mut(nd::s![0..n - 1])
                .scaled_add(self.off, &q.slice(nd::s![1..n]));
            Hq.slice_mut(nd::s![1..n])
                .scaled_add(self.off, &q.slice(nd::s![0..n - 1]));
        }
        Hq
    }

    /// Compute the matrix-matrix product `H Q`, where the columns of `Q` are
    /// vectors over the grid.
    ///
    /// *Panics if `Q` does not have as many rows as `self`*.
    pub fn dot_cols<S>(&self, Q: &Arr2<S>) -> nd::Array2<f64>
    where S: nd::Data<Elem = f64>
    {
        let n = self.len();
        let mut HQ: nd::Array2<f64>
            = Q * &self.diag.view().insert_axis(nd::Axis(1));
        if n > 1 {
            HQ.slice_mut(nd::s![0..n - 1, ..])
                .scaled_add(self.off, &Q.slice(nd::s![1..n, ..]));
            HQ.slice_mut(nd::s![1..n, ..])
                .scaled_add(self.off, &Q.slice(nd::s![0..n - 1, ..]));
        }
        HQ
    }

    /// Return Gershgorin bounds `(lower, upper)` on the spectrum.
    pub fn gershgorin(&self) -> (f64, f64) {
        let n = self.len();
        let r = self.off.abs();
        self.diag.iter().enumerate()
            .map(|(k, &d)| {
                let rk = if n == 1 {
                    0.0
                } else if k == 0 || k == n - 1 {
                    r
                } else {
                    2.0 * r
                };
                (d - rk, d + rk)
            })
            .fold(
                (f64::INFINITY, f64::NEG_INFINITY),
                |(lo, hi), (lok, hik)| (lo.min(lok), hi.max(hik)),
            )
    }

    /// Return `true` if every matrix element is finite.
    pub fn is_finite(&self) -> bool {
        self.off.is_finite() && self.diag.iter().all(|d| d.is_finite())
    }

    /// Infinity norm (maximum absolute row sum).
    pub fn norm_inf(&self) -> f64 {
        let n = self.len();
        let r = self.off.abs();
        self.diag.iter().enumerate()
            .map(|(k, &d)| {
                let nn = if n == 1 { 0 } else if k == 0 || k == n - 1 { 1 } else { 2 };
                d.abs() + nn as f64 * r
            })
            .fold(0.0, f64::max)
    }

    /// Convert the shifted operator `H - sigma` to LAPACK tridiagonal format.
    pub fn to_tridiagonal(&self, sigma: f64) -> Tridiagonal<f64> {
        let n = self.len();
        Tridiagonal {
            l: MatrixLayout::F { col: n as i32, lda: n as i32 },
            d: self.diag.iter().map(|d| d - sigma).collect(),
            dl: vec![self.off; n.saturating_sub(1)],
            du: vec![self.off; n.saturating_sub(1)],
        }
    }

    /// LU-factorize the shifted operator `H - sigma`.
    ///
    /// Fails if `sigma` is (numerically) an eigenvalue.
    pub fn factorize_shifted(&self, sigma: f64)
        -> XResult<LUFactorizedTridiagonal<f64>>
    {
        Ok(self.to_tridiagonal(sigma).factorize_tridiagonal_into()?)
    }
}
