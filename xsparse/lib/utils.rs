//! Miscellaneous tools.

use std::ops::Add;
use ndarray::{ self as nd, Ix1 };
use ndarray_linalg::Scalar;
use num_traits::{ One, Zero };

/// Integrate using the trapezoidal rule.
///
/// *Panics if `y` has length less than 2*.
pub fn trapz<S, A>(y: &nd::ArrayBase<S, Ix1>, dx: A) -> A
where
    S: nd::Data<Elem = A>,
    A: Scalar,
{
    let n: usize = y.len();
    let two = A::one() + A::one();
    (dx / two) * (y[0] + two * y.slice(nd::s![1..n - 1]).sum() + y[n - 1])
}

/// Calculate the squared norm ∫|ψ|² dx of a wavefunction.
///
/// *Panics if `q` has length less than 2*.
pub fn wf_norm<S, A>(q: &nd::ArrayBase<S, Ix1>, dx: A::Real) -> A::Real
where
    S: nd::Data<Elem = A>,
    A: Scalar,
{
    let n: usize = q.len();
    let two = <A as Scalar>::Real::one() + <A as Scalar>::Real::one();
    (dx / two) * (
        q[0].square()
        + two * q.iter().skip(1).take(n - 2).map(|qk| qk.square())
            .fold(<A as Scalar>::Real::zero(), <A as Scalar>::Real::add)
        + q[n - 1].square()
    )
}

/// Calculate the inner product of two wavefunctions.
///
/// *Panics if either array has length less than 2*.
pub fn wf_dot<S, T, A>(
    q: &nd::ArrayBase<S, Ix1>,
    p: &nd::ArrayBase<T, Ix1>,
    dx: A::Real,
) -> A
where
    S: nd::Data<Elem = A>,
    T: nd::Data<Elem = A>,
    A: Scalar,
{
    let n: usize = q.len().min(p.len());
    let two = A::one() + A::one();
    (A::from_real(dx) / two) * (
        q[0].conj() * p[0]
        + two * q.iter().zip(p).skip(1).take(n - 2)
            .fold(A::zero(), |acc, (qk, pk)| acc + qk.conj() * *pk)
        + q[n - 1].conj() * p[n - 1]
    )
}

/// Renormalize a wavefunction in place, returning the norm √(∫|ψ|² dx) it was
/// divided by.
///
/// Nothing is done if the norm is below `floor`, in which case `None` is
/// returned.
///
/// *Panics if `q` has length less than 2*.
pub fn wf_renormalize<S, A>(
    q: &mut nd::ArrayBase<S, Ix1>,
    dx: A::Real,
    floor: A::Real,
) -> Option<A::Real>
where
    S: nd::DataMut<Elem = A>,
    A: Scalar,
{
    let norm_r = wf_norm(q, dx).sqrt();
    if !(norm_r > floor) { return None; }
    let norm = A::from_real(norm_r);
    q.iter_mut().for_each(|qk| { *qk /= norm; });
    Some(norm_r)
}

/// Return a renormalized copy of a wavefunction, or `None` if its norm is
/// below `floor`.
///
/// *Panics if `q` has length less than 2*.
pub fn wf_normalized<S, A>(q: &nd::ArrayBase<S, Ix1>, dx: A::Real, floor: A::Real)
    -> Option<nd::Array1<A>>
where
    S: nd::Data<Elem = A>,
    A: Scalar,
{
    let mut q = q.to_owned();
    wf_renormalize(&mut q, dx, floor).map(|_| q)
}

/// Compute the probability density |ψ|² of a wavefunction.
pub fn density<S, A>(q: &nd::ArrayBase<S, Ix1>) -> nd::Array1<A::Real>
where
    S: nd::Data<Elem = A>,
    A: Scalar,
{
    q.mapv(|qk| qk.square())
}
