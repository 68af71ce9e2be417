//! Covariance-based uncertainty estimation for fitted parameters.
//!
//! For nonlinear least-squares problems the covariance matrix is estimated as
//!
//!   covar = redchi * inv(J^T * J)
//!
//! where J is the Jacobian of the residuals at the optimum and redchi is the
//! reduced chi-square (residual sum of squares divided by the degrees of
//! freedom), under the assumption of homoscedastic Gaussian noise.

use crate::error::{FitError, Result};
use crate::utils::linalg;
use ndarray::{Array1, Array2};

/// Degrees of freedom for a fit with `ndata` observations and `nvarys`
/// parameters, floored at 1 so the reduced chi-square stays finite for
/// exactly-determined fits.
pub fn degrees_of_freedom(ndata: usize, nvarys: usize) -> usize {
    if ndata > nvarys {
        ndata - nvarys
    } else {
        1
    }
}

/// Calculate the covariance matrix from the Jacobian at the solution.
///
/// # Errors
///
/// * [`FitError::SingularJacobian`] when J^T J is not invertible
///   (degenerate or under-determined problem, e.g. collinear predictors)
pub fn covariance(jacobian: &Array2<f64>, redchi: f64) -> Result<Array2<f64>> {
    let jtj = jacobian.t().dot(jacobian);
    let inverse = linalg::invert_spd(&jtj).ok_or(FitError::SingularJacobian)?;
    Ok(inverse * redchi)
}

/// Calculate the correlation matrix from a covariance matrix.
///
/// The correlation matrix is calculated as
/// `correl[i,j] = covar[i,j] / sqrt(covar[i,i] * covar[j,j])`, so diagonal
/// elements are 1.0 and off-diagonal elements are correlation coefficients
/// between -1 and 1.
pub fn correlation(covar: &Array2<f64>) -> Array2<f64> {
    let n = covar.nrows();
    let mut correl = Array2::zeros((n, n));

    for i in 0..n {
        for j in 0..n {
            if i == j {
                correl[[i, j]] = 1.0;
            } else {
                let denom = (covar[[i, i]] * covar[[j, j]]).sqrt();
                if denom > 0.0 {
                    correl[[i, j]] = covar[[i, j]] / denom;
                }
            }
        }
    }

    correl
}

/// Extract standard errors from a covariance matrix.
///
/// Standard errors are the square roots of the diagonal elements.
pub fn standard_errors(covar: &Array2<f64>) -> Array1<f64> {
    let n = covar.nrows();
    let mut errors = Array1::zeros(n);

    for i in 0..n {
        errors[i] = if covar[[i, i]] > 0.0 {
            covar[[i, i]].sqrt()
        } else {
            0.0
        };
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::arr2;

    #[test]
    fn test_covariance_matches_closed_form() {
        // Jacobian with 3 data points, 2 parameters
        let jacobian = arr2(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
        let redchi = 2.0;

        // J^T J = [[35, 44], [44, 56]], det = 24
        // inv = [[56, -44], [-44, 35]] / 24
        let covar = covariance(&jacobian, redchi).unwrap();

        assert_eq!(covar.shape(), &[2, 2]);
        assert_relative_eq!(covar[[0, 0]], 2.0 * 56.0 / 24.0, epsilon = 1e-10);
        assert_relative_eq!(covar[[0, 1]], 2.0 * -44.0 / 24.0, epsilon = 1e-10);
        assert_relative_eq!(covar[[1, 0]], 2.0 * -44.0 / 24.0, epsilon = 1e-10);
        assert_relative_eq!(covar[[1, 1]], 2.0 * 35.0 / 24.0, epsilon = 1e-10);
    }

    #[test]
    fn test_covariance_singular_jacobian() {
        // Two identical columns: collinear predictors
        let jacobian = arr2(&[[1.0, 1.0], [2.0, 2.0], [3.0, 3.0]]);

        match covariance(&jacobian, 1.0) {
            Err(FitError::SingularJacobian) => (),
            other => panic!("Expected SingularJacobian, got {:?}", other),
        }
    }

    #[test]
    fn test_correlation() {
        let covar = arr2(&[[0.1, 0.05], [0.05, 0.2]]);
        let correl = correlation(&covar);

        assert_eq!(correl[[0, 0]], 1.0);
        assert_eq!(correl[[1, 1]], 1.0);

        let expected = 0.05 / (0.1f64 * 0.2f64).sqrt();
        assert_relative_eq!(correl[[0, 1]], expected, epsilon = 1e-10);
        assert_relative_eq!(correl[[1, 0]], expected, epsilon = 1e-10);
    }

    #[test]
    fn test_standard_errors() {
        let covar = arr2(&[[0.1, 0.05], [0.05, 0.2]]);
        let errors = standard_errors(&covar);

        assert_eq!(errors.len(), 2);
        assert_relative_eq!(errors[0], 0.1f64.sqrt(), epsilon = 1e-10);
        assert_relative_eq!(errors[1], 0.2f64.sqrt(), epsilon = 1e-10);
    }

    #[test]
    fn test_degrees_of_freedom_floor() {
        assert_eq!(degrees_of_freedom(101, 2), 99);
        assert_eq!(degrees_of_freedom(2, 2), 1);
        assert_eq!(degrees_of_freedom(1, 2), 1);
    }
}
