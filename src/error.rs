use ndarray::Array1;
use thiserror::Error;

/// Error types for the curvefit-rs library.
#[derive(Error, Debug)]
pub enum FitError {
    /// Error indicating a mismatch between input shapes or arities.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Error indicating the normal equations are not solvable.
    ///
    /// Raised for under-determined problems (fewer observations than
    /// parameters), collinear predictors, or a rank-deficient Jacobian at
    /// the solution.
    #[error("Singular Jacobian: normal equations are not solvable")]
    SingularJacobian,

    /// Error indicating the iteration budget was exhausted before the
    /// convergence tolerance was met.
    ///
    /// Carries the best parameter estimate found so far, so a caller can
    /// inspect it without mistaking it for a converged result.
    #[error("Failed to converge after {iterations} iterations (best cost {cost:.6e})")]
    NonConvergence {
        /// Best parameter estimate found before giving up
        params: Array1<f64>,
        /// Sum of squared residuals at that estimate
        cost: f64,
        /// Number of iterations performed
        iterations: usize,
    },

    /// Error during model function evaluation.
    #[error("Function evaluation error: {0}")]
    FunctionEvaluation(String),

    /// Error for parameter-related problems.
    #[error("Parameter error: {0}")]
    ParameterError(String),

    /// Parameter not found by name.
    #[error("Parameter not found: {0}")]
    ParameterNotFound(String),

    /// Invalid input data.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for curvefit-rs operations.
pub type Result<T> = std::result::Result<T, FitError>;

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_error_display() {
        let err = FitError::ShapeMismatch("expected 10 y values, got 9".to_string());
        assert!(format!("{}", err).contains("expected 10 y values, got 9"));

        let err = FitError::SingularJacobian;
        assert!(format!("{}", err).contains("Singular Jacobian"));

        let err = FitError::NonConvergence {
            params: array![1.0, 2.0],
            cost: 0.5,
            iterations: 100,
        };
        assert!(format!("{}", err).contains("100 iterations"));
    }

    #[test]
    fn test_non_convergence_carries_estimate() {
        let err = FitError::NonConvergence {
            params: array![3.0, -1.0],
            cost: 1.25,
            iterations: 42,
        };

        match err {
            FitError::NonConvergence { params, cost, .. } => {
                assert_eq!(params, array![3.0, -1.0]);
                assert_eq!(cost, 1.25);
            }
            _ => panic!("Expected NonConvergence variant"),
        }
    }
}
