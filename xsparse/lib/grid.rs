//! Uniform coordinate grids.

use ndarray as nd;
use crate::{ error::XError, solve::XResult };

/// An immutable, uniformly spaced coordinate grid over a closed interval.
///
/// Endpoints are included, so that a grid of `n` points over `[xmin, xmax]`
/// has spacing `(xmax - xmin) / (n - 1)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    // coordinate array
    x: nd::Array1<f64>,
    // grid spacing
    dx: f64,
}

impl Grid {
    /// Create a new `Grid` from "linspace-style" arguments (start, inclusive
    /// end, and an array length).
    ///
    /// Fails if the bounds are not finite and increasing, or if fewer than two
    /// points are requested.
    pub fn new_linspace(xmin: f64, xmax: f64, n: usize) -> XResult<Self> {
        XError::check_bounds(xmin, xmax)?;
        XError::check_counts(n, 1)?;
        let x: nd::Array1<f64> = nd::Array1::linspace(xmin, xmax, n);
        let dx = (xmax - xmin) / (n - 1) as f64;
        Ok(Self { x, dx })
    }

    /// Get a reference to the coordinate array.
    pub fn get_x(&self) -> &nd::Array1<f64> { &self.x }

    /// Get the grid spacing.
    pub fn get_dx(&self) -> f64 { self.dx }

    /// Get the number of points.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.x.len() }

    /// Get the left endpoint.
    pub fn xmin(&self) -> f64 { self.x[0] }

    /// Get the right endpoint.
    pub fn xmax(&self) -> f64 { self.x[self.x.len() - 1] }
}
