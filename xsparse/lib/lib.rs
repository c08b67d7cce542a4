#![allow(non_snake_case)]

//! Provides functions and higher-level constructs for batch solution of the
//! one-dimensional, time-independent Schrödinger equation via finite
//! differences and a sparse, shift-invert eigensolver.
//!
//! The pipeline is:
//! - Sample a [potential][potential::Potential] over a uniform
//!   [grid][grid::Grid].
//! - Assemble the three-point finite-difference [Hamiltonian][hamiltonian]
//!   with implicit Dirichlet boundaries.
//! - Extract a handful of eigenpairs closest to a target with [`eigs`] and
//!   normalize the resulting wavefunctions under the trapezoidal inner
//!   product ([`solve`]).
//! - Optionally, fan the above out over many potentials on a fixed-size
//!   thread pool while keeping results in submission order ([`dispatch`]).
//!
//! ```
//! use xsparse::{ potential::Harmonic, solve::{ SolverConfig, solve } };
//!
//! let res = solve(&Harmonic::default(), &SolverConfig::default()).unwrap();
//! // energies are √c (2n + 1) for -∂² + c x²
//! assert!((res.evals[0] - 1.0).abs() < 0.05);
//! ```
//!
//! See [`docs`] for theoretical background.

pub mod error;
pub mod grid;
pub mod potential;
pub mod hamiltonian;
pub mod eigs;
pub mod solve;
pub mod dispatch;
pub mod report;
pub mod utils;

pub mod docs;

pub(crate) const DEF_EPSILON: f64 = 1e-10;
pub(crate) const DEF_MAXITERS: usize = 1000;

pub type Arr1<S> = ndarray::ArrayBase<S, ndarray::Ix1>;
pub type Arr2<S> = ndarray::ArrayBase<S, ndarray::Ix2>;
