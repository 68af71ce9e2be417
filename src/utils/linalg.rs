//! Dense linear algebra helpers for symmetric positive-definite systems.
//!
//! The Levenberg-Marquardt step and the covariance estimate both reduce to
//! solving or inverting a small J^T J (+ damping) matrix; these routines
//! cover exactly that case. A non-positive pivot during factorization is the
//! singularity signal callers react to.

use ndarray::{Array1, Array2};

/// Pivot threshold below which a matrix is treated as singular.
const PIVOT_TOLERANCE: f64 = 1e-12;

/// Compute the lower Cholesky factor L of a symmetric positive-definite
/// matrix, so that L * L^T = a.
///
/// Returns `None` when a pivot is not sufficiently positive, i.e. the matrix
/// is singular or indefinite.
pub fn cholesky(a: &Array2<f64>) -> Option<Array2<f64>> {
    let n = a.nrows();
    debug_assert_eq!(n, a.ncols());

    let mut l = Array2::<f64>::zeros((n, n));

    for k in 0..n {
        let mut pivot = a[[k, k]];
        for j in 0..k {
            pivot -= l[[k, j]] * l[[k, j]];
        }

        if pivot <= PIVOT_TOLERANCE {
            return None;
        }

        let pivot_sqrt = pivot.sqrt();
        l[[k, k]] = pivot_sqrt;

        for i in k + 1..n {
            let mut value = a[[i, k]];
            for j in 0..k {
                value -= l[[i, j]] * l[[k, j]];
            }
            l[[i, k]] = value / pivot_sqrt;
        }
    }

    Some(l)
}

/// Solve L * L^T * x = b given the lower Cholesky factor L.
pub fn cholesky_solve(l: &Array2<f64>, b: &Array1<f64>) -> Array1<f64> {
    let n = l.nrows();
    debug_assert_eq!(n, b.len());

    // Forward substitution: L * y = b
    let mut y = b.clone();
    for i in 0..n {
        for j in 0..i {
            let yj = y[j];
            y[i] -= l[[i, j]] * yj;
        }
        y[i] /= l[[i, i]];
    }

    // Backward substitution: L^T * x = y
    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        x[i] = y[i];
        for j in (i + 1)..n {
            let xj = x[j];
            x[i] -= l[[j, i]] * xj;
        }
        x[i] /= l[[i, i]];
    }

    x
}

/// Solve a * x = b for a symmetric positive-definite matrix a.
///
/// Returns `None` when the matrix is singular or indefinite.
pub fn solve_spd(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let l = cholesky(a)?;
    Some(cholesky_solve(&l, b))
}

/// Invert a symmetric positive-definite matrix by solving against the
/// columns of the identity.
///
/// Returns `None` when the matrix is singular or indefinite.
pub fn invert_spd(a: &Array2<f64>) -> Option<Array2<f64>> {
    let n = a.nrows();
    let l = cholesky(a)?;

    let mut inv = Array2::<f64>::zeros((n, n));
    for j in 0..n {
        let mut e = Array1::<f64>::zeros(n);
        e[j] = 1.0;
        let col = cholesky_solve(&l, &e);
        for i in 0..n {
            inv[[i, j]] = col[i];
        }
    }

    Some(inv)
}
