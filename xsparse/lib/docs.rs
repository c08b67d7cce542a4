//! Theoretical background.
//!
//! # Contents
//! - [Background](#background)
//! - [Units](#units)
//! - [Sparse eigensolution](#sparse-eigensolution)
//! - [Normalization](#normalization)
//! - [Batches](#batches)
//!
//! # Background
//! Solutions to the one-dimensional time-independent Schrödinger equation
//! (TISE) are eigenpairs of the Hamiltonian operator,
//! ```text
//!   ∂²
//! - --- ψ(x) + V(x) ψ(x) = E ψ(x)
//!   ∂x²
//! ```
//! written here in the natural units described [below](#units). Since the
//! Hamiltonian is Hermitian, its eigenvalues are real, and for a real potential
//! its eigenfunctions can be chosen to be real as well.
//!
//! Discretizing on a uniform grid
//! ```text
//! x[i] = x₀ + i δx, i ∊ {0, ..., N - 1}
//! ψ[i] = ψ(x[i])
//! V[i] = V(x[i])
//! ```
//! and replacing the second derivative with the three-point central difference
//! (which carries a *O*(*δx*²) error term)
//! ```text
//! ∂²ψ       ψ[i - 1] - 2 ψ[i] + ψ[i + 1]
//! --- |   ≈ ----------------------------
//! ∂x² |x[i]             δx²
//! ```
//! turns the TISE into a matrix eigenvalue problem *H* *ψ* = *E* *ψ* with
//! ```text
//! H = (2 I{0} - I{-1} - I{+1}) / δx² + V
//! V[i, j] = δ[i, j] V(x[i])
//! ```
//! where *I*{*k*} is the *N*×*N* matrix with elements equal to 1 on the *k*-th
//! diagonal and 0 elsewhere. The stencil at the ends of the grid refers to
//! *ψ*\[-1\] and *ψ*\[*N*\], which are simply dropped; this is equivalent to
//! fixing the wavefunction to zero just outside the grid (Dirichlet boundary
//! conditions). Hard walls inside the grid can be approximated by setting
//! *V* to a very large value over some region, as in
//! [`InfiniteWell`][crate::potential::InfiniteWell].
//!
//! *H* is real, symmetric, and tridiagonal, so storage and application to a
//! vector are both *O*(*N*), and linear systems (*H* - *σ*) *y* = *b* can be
//! solved in *O*(*N*) by LU factorization with partial pivoting.
//!
//! # Units
//! Starting from the usual expression of the TISE,
//! ```text
//!    ħ² ∂²
//! - --- --- ψ(x) + V(x) ψ(x) = E ψ(x)
//!   2 m ∂x²
//! ```
//! choosing a characteristic length scale *a*, changing variables to *x'* ≡
//! *x* / *a*, and dividing through by *ε* ≡ *ħ*²/2 *m* *a*² gives the
//! dimensionless form above, with *V*' = *V* / *ε* and *E*' = *E* / *ε*.
//!
//! Note that this convention differs from the other common choice *ħ* = *m* =
//! 1, where the kinetic term carries a factor 1/2. For example, the harmonic
//! potential *V*(*x*) = *c* *x*² has energies
//! ```text
//! E[n] = √c (2 n + 1)
//! ```
//! so that the ground state of *V* = *x*² lies at 1 rather than 1/2.
//!
//! # Sparse eigensolution
//! Usually only a handful of states near some target energy *σ* are wanted.
//! [`eigs`][crate::eigs] finds them by subspace iteration on the shifted
//! inverse (*H* - *σ*)⁻¹, whose eigenvalues 1 / (*E* - *σ*) are largest for
//! the energies *E* closest to *σ*. Starting from a block *Q* of *p*
//! orthonormal vectors, each iteration computes
//! ```text
//! Y = (H - σ)⁻¹ Q
//! Q = qr(Y)
//! ```
//! so that the block converges to the span of the *p* eigenvectors closest to
//! *σ*, with the error in the *k*-th component shrinking by |*E*\[*k*\] - *σ*|
//! / |*E*\[*p* + 1\] - *σ*| per iteration[^1]. Individual eigenpairs are then
//! extracted by the Rayleigh-Ritz procedure: the *p*×*p* projection *T* =
//! *Q*ᵀ *H* *Q* is diagonalized densely, and each eigenpair (*θ*, *z*) of *T*
//! gives an approximate eigenpair (*θ*, *Q* *z*) of *H*. Iteration stops when
//! the residual ‖*H* *x* - *θ* *x*‖ of every wanted pair falls below the
//! accuracy bound.
//!
//! Taking *σ* = 0 selects eigenvalues of smallest *magnitude*, which are the
//! lowest energies only if the spectrum is non-negative. Taking *σ* below the
//! Gershgorin lower bound
//! ```text
//! min_i (H[i, i] - Σ_{j ≠ i} |H[i, j]|)
//! ```
//! selects the algebraically smallest eigenvalues instead.
//!
//! # Normalization
//! Eigenvectors are returned normalized with respect to the continuum inner
//! product, with the integral evaluated by the trapezoidal rule,
//! ```text
//!            δx
//! ⟨ψ|ψ⟩ ≈  ---- (|ψ[0]|² + 2 |ψ[1]|² + ... + 2 |ψ[N - 2]|² + |ψ[N - 1]|²) = 1
//!             2
//! ```
//! so that |*ψ*\[*i*\]|² can be read directly as a probability density.
//!
//! # Batches
//! Solutions for different potentials share nothing, so a batch of potentials
//! can be solved in parallel with no coordination beyond collecting the
//! results. [`Dispatcher`][crate::dispatch::Dispatcher] runs one task per
//! potential on a fixed-size thread pool and reorders results by submission
//! index after all tasks have finished.
//!
//! [^1]: Y. Saad, *Numerical Methods for Large Eigenvalue Problems*, 2nd ed.,
//! SIAM (2011), ch. 5.
