//! High-level curve fitting entry points.
//!
//! This module implements the fit contract: given a model function, observed
//! data, and a set of named initial guesses, find the parameter values
//! minimizing the sum of squared residuals and estimate their uncertainty.
//!
//! A model is a function `Fn(&Parameters, &Array1<f64>) -> Result<Array1<f64>>`
//! evaluating the curve over the whole x grid. Guesses travel inside a
//! [`Parameters`] collection, bound to the names the model looks up, so the
//! guess-order/parameter-order mismatch of positional APIs cannot occur.

use std::fmt;

use ndarray::{Array1, Array2};
use rayon::prelude::*;

use crate::error::{FitError, Result};
use crate::lm::LevenbergMarquardt;
use crate::parameters::Parameters;
use crate::problem::Problem;
use crate::uncertainty;

/// Adapter exposing a model function plus observations as a [`Problem`].
struct CurveProblem<'a, F> {
    model: &'a F,
    template: &'a Parameters,
    x: &'a Array1<f64>,
    y: &'a Array1<f64>,
}

impl<'a, F> Problem for CurveProblem<'a, F>
where
    F: Fn(&Parameters, &Array1<f64>) -> Result<Array1<f64>>,
{
    fn eval(&self, params: &Array1<f64>) -> Result<Array1<f64>> {
        let mut scratch = self.template.clone();
        scratch.set_from_array(params)?;

        let y_pred = (self.model)(&scratch, self.x)?;

        if y_pred.len() != self.y.len() {
            return Err(FitError::ShapeMismatch(format!(
                "Model returned {} predictions for {} x values",
                y_pred.len(),
                self.x.len()
            )));
        }
        if y_pred.iter().any(|v| !v.is_finite()) {
            return Err(FitError::FunctionEvaluation(
                "Model returned a non-finite prediction".to_string(),
            ));
        }

        Ok(y_pred - self.y)
    }

    fn parameter_count(&self) -> usize {
        self.template.len()
    }

    fn residual_count(&self) -> usize {
        self.x.len()
    }
}

/// Result of fitting a model to data.
#[derive(Debug, Clone)]
pub struct FitResult {
    /// Fitted parameters, with standard errors filled in
    pub params: Parameters,

    /// Best-fit parameter values, in the parameter set's insertion order
    pub best_values: Array1<f64>,

    /// Covariance matrix of the fitted parameters (same ordering)
    pub covariance: Array2<f64>,

    /// Correlation matrix derived from the covariance
    pub correlation: Array2<f64>,

    /// Residuals (prediction - observation) at the solution
    pub residuals: Array1<f64>,

    /// Chi-square: sum of squared residuals at the solution
    pub chisqr: f64,

    /// Reduced chi-square (chi^2 / nfree)
    pub redchi: f64,

    /// Degrees of freedom (n_points - n_parameters, floored at 1)
    pub nfree: usize,

    /// Number of optimizer iterations performed
    pub iterations: usize,

    /// Number of model function evaluations
    pub func_evals: usize,

    /// A message describing which convergence criterion fired
    pub message: String,
}

impl fmt::Display for FitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Fit Report:")?;
        writeln!(f, "  Message: {}", self.message)?;
        writeln!(
            f,
            "  Data points: {}, variables: {}",
            self.residuals.len(),
            self.params.len()
        )?;
        writeln!(f, "  Chi-square: {:.6e}", self.chisqr)?;
        writeln!(f, "  Reduced chi-square: {:.6e}", self.redchi)?;
        writeln!(f, "  Iterations: {}", self.iterations)?;
        writeln!(f, "  Parameters:")?;
        for param in self.params.iter() {
            match param.stderr {
                Some(stderr) => writeln!(
                    f,
                    "    {}: {:.6} +/- {:.6} (init: {})",
                    param.name(),
                    param.value(),
                    stderr,
                    param.init_value()
                )?,
                None => writeln!(f, "    {}: {:.6}", param.name(), param.value())?,
            }
        }
        Ok(())
    }
}

/// Fit a model to data with the default optimizer configuration.
///
/// # Arguments
///
/// * `model` - Model function evaluating the curve over the x grid
/// * `x` - Independent variable observations
/// * `y` - Dependent variable observations, same length as `x`
/// * `params` - Named initial guesses, one per model parameter
///
/// # Errors
///
/// * [`FitError::ShapeMismatch`] when `x` and `y` differ in length
/// * [`FitError::SingularJacobian`] when there are fewer observations than
///   parameters, or the covariance is not computable at the solution
/// * [`FitError::NonConvergence`] when the iteration budget is exhausted
///
/// # Examples
///
/// ```
/// use curvefit_rs::{curve_fit, models};
/// use ndarray::Array1;
///
/// let x = Array1::linspace(0.0, 10.0, 11);
/// let y = x.mapv(|v| 2.0 * v + 1.0);
///
/// let result = curve_fit(models::line, &x, &y, &models::line_parameters(1.0, 0.0)).unwrap();
///
/// assert!((result.params.value("slope").unwrap() - 2.0).abs() < 1e-6);
/// assert!((result.params.value("intercept").unwrap() - 1.0).abs() < 1e-6);
/// ```
pub fn curve_fit<F>(
    model: F,
    x: &Array1<f64>,
    y: &Array1<f64>,
    params: &Parameters,
) -> Result<FitResult>
where
    F: Fn(&Parameters, &Array1<f64>) -> Result<Array1<f64>>,
{
    curve_fit_with(&LevenbergMarquardt::new(), model, x, y, params)
}

/// Fit a model to data with an explicitly configured optimizer.
pub fn curve_fit_with<F>(
    optimizer: &LevenbergMarquardt,
    model: F,
    x: &Array1<f64>,
    y: &Array1<f64>,
    params: &Parameters,
) -> Result<FitResult>
where
    F: Fn(&Parameters, &Array1<f64>) -> Result<Array1<f64>>,
{
    if params.is_empty() {
        return Err(FitError::InvalidInput(
            "Parameter set is empty".to_string(),
        ));
    }
    if x.len() != y.len() {
        return Err(FitError::ShapeMismatch(format!(
            "Expected {} y values, got {}",
            x.len(),
            y.len()
        )));
    }
    // Under-determined fit: no unique answer exists
    if x.len() < params.len() {
        return Err(FitError::SingularJacobian);
    }

    let problem = CurveProblem {
        model: &model,
        template: params,
        x,
        y,
    };

    // The Jacobian at the solution is needed for the covariance estimate
    let lm = optimizer.clone().with_calc_jacobian(true);
    let result = lm.minimize(&problem, params.to_array())?;

    let jacobian = match result.jacobian {
        Some(jacobian) => jacobian,
        None => problem.jacobian(&result.params)?,
    };

    let nfree = uncertainty::degrees_of_freedom(x.len(), params.len());
    let chisqr = result.cost;
    let redchi = chisqr / nfree as f64;

    let covariance = uncertainty::covariance(&jacobian, redchi)?;
    let correlation = uncertainty::correlation(&covariance);
    let stderrs = uncertainty::standard_errors(&covariance);

    let mut fitted = params.clone();
    fitted.set_from_array(&result.params)?;
    for (i, name) in params.names().iter().enumerate() {
        if let Some(param) = fitted.get_mut(name) {
            param.stderr = Some(stderrs[i]);
        }
    }

    Ok(FitResult {
        params: fitted,
        best_values: result.params,
        covariance,
        correlation,
        residuals: result.residuals,
        chisqr,
        redchi,
        nfree,
        iterations: result.iterations,
        func_evals: result.func_evals,
        message: result.message,
    })
}

/// Fit the same model to many independent datasets in parallel.
///
/// Each fit is independent and stateless, so the datasets are dispatched to
/// the rayon thread pool with no coordination beyond collecting results.
/// Per-dataset failures are reported in place, without aborting the batch.
pub fn curve_fit_batch<F>(
    model: F,
    datasets: &[(Array1<f64>, Array1<f64>)],
    params: &Parameters,
) -> Vec<Result<FitResult>>
where
    F: Fn(&Parameters, &Array1<f64>) -> Result<Array1<f64>> + Sync,
{
    let optimizer = LevenbergMarquardt::new();

    datasets
        .par_iter()
        .map(|(x, y)| curve_fit_with(&optimizer, &model, x, y, params))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_curve_fit_exact_line() {
        let x = array![0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let y = x.mapv(|v| 3.0 * v + 2.0);

        let result = curve_fit(models::line, &x, &y, &models::line_parameters(1.0, 0.0)).unwrap();

        assert_relative_eq!(result.params.value("slope").unwrap(), 3.0, epsilon = 1e-6);
        assert_relative_eq!(
            result.params.value("intercept").unwrap(),
            2.0,
            epsilon = 1e-6
        );
        assert_eq!(result.covariance.shape(), &[2, 2]);
        assert_eq!(result.nfree, 4);
    }

    #[test]
    fn test_curve_fit_shape_mismatch() {
        let x = array![0.0, 1.0, 2.0];
        let y = array![0.0, 1.0];

        match curve_fit(models::line, &x, &y, &models::line_parameters(1.0, 0.0)) {
            Err(FitError::ShapeMismatch(_)) => (),
            other => panic!("Expected ShapeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_curve_fit_empty_parameters() {
        let x = array![0.0, 1.0, 2.0];
        let y = array![0.0, 1.0, 2.0];

        match curve_fit(models::line, &x, &y, &Parameters::new()) {
            Err(FitError::InvalidInput(_)) => (),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_fit_report_display() {
        let x = array![0.0, 1.0, 2.0, 3.0, 4.0];
        let y = x.mapv(|v| 2.0 * v + 1.0);

        let result = curve_fit(models::line, &x, &y, &models::line_parameters(1.0, 0.0)).unwrap();
        let report = format!("{}", result);

        assert!(report.contains("Fit Report:"));
        assert!(report.contains("slope"));
        assert!(report.contains("intercept"));
        assert!(report.contains("+/-"));
    }
}
