//! Potential energy functions sampled over a coordinate grid.
//!
//! Anything implementing [`Potential`] can be handed to the solver, including
//! plain closures:
//! ```
//! use ndarray as nd;
//! use xsparse::potential::Potential;
//!
//! let linear = |x: &nd::Array1<f64>| x.mapv(f64::abs);
//! let x: nd::Array1<f64> = nd::Array1::linspace(-1.0, 1.0, 5);
//! assert_eq!(linear.eval(&x), nd::array![1.0, 0.5, 0.0, 0.5, 1.0]);
//! ```

use ndarray as nd;

/// A potential energy function, evaluated over a whole coordinate array at
/// once.
///
/// Implementors must return an array with the same length as `x`, aligned
/// with it point by point, and must be safe to evaluate from several threads
/// at the same time.
pub trait Potential: Send + Sync {
    /// Sample the potential at each coordinate.
    fn eval(&self, x: &nd::Array1<f64>) -> nd::Array1<f64>;
}

impl<F> Potential for F
where F: Fn(&nd::Array1<f64>) -> nd::Array1<f64> + Send + Sync
{
    fn eval(&self, x: &nd::Array1<f64>) -> nd::Array1<f64> { self(x) }
}

/// Harmonic oscillator, `V(x) = c x²`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Harmonic {
    pub c: f64,
}

impl Default for Harmonic {
    fn default() -> Self { Self { c: 1.0 } }
}

impl Potential for Harmonic {
    fn eval(&self, x: &nd::Array1<f64>) -> nd::Array1<f64> {
        x.mapv(|xk| self.c * xk.powi(2))
    }
}

/// Approximation to an infinite square well: zero everywhere except for the
/// outermost `wall` samples on each side of the grid, which are set to
/// `height`.
///
/// Note that the walls are specified in samples, not coordinates, so the width
/// of the well depends on the grid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InfiniteWell {
    pub height: f64,
    pub wall: usize,
}

impl Default for InfiniteWell {
    fn default() -> Self { Self { height: 1e10, wall: 100 } }
}

impl Potential for InfiniteWell {
    fn eval(&self, x: &nd::Array1<f64>) -> nd::Array1<f64> {
        let n = x.len();
        let right = n.saturating_sub(self.wall);
        (0..n)
            .map(|k| if k < self.wall || k >= right { self.height } else { 0.0 })
            .collect()
    }
}

/// Symmetric double well, `V(x) = a x² + b x⁴ + c`.
///
/// For `a < 0 < b` the minima sit at `x = ±√(-a / 2b)`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DoubleWell {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Default for DoubleWell {
    fn default() -> Self { Self { a: -0.5, b: 0.01, c: 7.0 } }
}

impl Potential for DoubleWell {
    fn eval(&self, x: &nd::Array1<f64>) -> nd::Array1<f64> {
        x.mapv(|xk| self.a * xk.powi(2) + self.b * xk.powi(4) + self.c)
    }
}
