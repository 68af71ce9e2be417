//! Built-in model functions for common fitting problems.
//!
//! Each model is a plain function over a named [`Parameters`] set, directly
//! usable with [`curve_fit`](crate::curve_fit::curve_fit). The constructors
//! build the matching parameter sets so callers cannot misname or misorder
//! the guesses.

use crate::error::Result;
use crate::parameters::Parameters;
use ndarray::Array1;

/// Straight line: `y = slope * x + intercept`.
///
/// Parameters: `slope`, `intercept`.
pub fn line(params: &Parameters, x: &Array1<f64>) -> Result<Array1<f64>> {
    let slope = params.value("slope")?;
    let intercept = params.value("intercept")?;
    Ok(x.mapv(|v| slope * v + intercept))
}

/// Build the parameter set for [`line`] with the given initial guesses.
pub fn line_parameters(slope: f64, intercept: f64) -> Parameters {
    let mut params = Parameters::new();
    // Fresh collection, names are distinct
    params.add_param("slope", slope).unwrap();
    params.add_param("intercept", intercept).unwrap();
    params
}

/// Closed-form ordinary-least-squares starting values for [`line`].
///
/// Useful as an initial guess when nothing better is known; requires at
/// least two distinct x values.
pub fn guess_line(x: &Array1<f64>, y: &Array1<f64>) -> Result<Parameters> {
    use crate::error::FitError;

    if x.len() != y.len() {
        return Err(FitError::ShapeMismatch(format!(
            "Expected {} y values, got {}",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(FitError::InvalidInput(
            "Need at least 2 data points to guess line parameters".to_string(),
        ));
    }

    let n = x.len() as f64;
    let sum_x: f64 = x.sum();
    let sum_y: f64 = y.sum();
    let sum_xy: f64 = x.iter().zip(y.iter()).map(|(&x, &y)| x * y).sum();
    let sum_xx: f64 = x.iter().map(|&x| x * x).sum();

    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator.abs() < 1e-10 {
        return Err(FitError::InvalidInput(
            "Cannot guess line parameters: x values are constant".to_string(),
        ));
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;

    Ok(line_parameters(slope, intercept))
}

/// Exponential decay: `y = amplitude * exp(-rate * x)`.
///
/// Parameters: `amplitude`, `rate`.
pub fn exponential(params: &Parameters, x: &Array1<f64>) -> Result<Array1<f64>> {
    let amplitude = params.value("amplitude")?;
    let rate = params.value("rate")?;
    Ok(x.mapv(|v| amplitude * (-rate * v).exp()))
}

/// Build the parameter set for [`exponential`] with the given initial guesses.
pub fn exponential_parameters(amplitude: f64, rate: f64) -> Parameters {
    let mut params = Parameters::new();
    params.add_param("amplitude", amplitude).unwrap();
    params.add_param("rate", rate).unwrap();
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FitError;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_line_eval() {
        let params = line_parameters(2.0, -1.0);
        let x = array![0.0, 1.0, 2.0];

        let y = line(&params, &x).unwrap();

        assert_eq!(y, array![-1.0, 1.0, 3.0]);
    }

    #[test]
    fn test_guess_line_exact() {
        let x = array![1.0, 2.0, 3.0, 4.0, 5.0];
        let y = array![2.0, 4.0, 6.0, 8.0, 10.0]; // y = 2x

        let params = guess_line(&x, &y).unwrap();

        assert_relative_eq!(params.value("slope").unwrap(), 2.0, epsilon = 1e-10);
        assert_relative_eq!(params.value("intercept").unwrap(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_guess_line_constant_x() {
        let x = array![3.0, 3.0, 3.0];
        let y = array![1.0, 2.0, 3.0];

        match guess_line(&x, &y) {
            Err(FitError::InvalidInput(_)) => (),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_exponential_eval() {
        let params = exponential_parameters(2.0, 0.5);
        let x = array![0.0, 2.0];

        let y = exponential(&params, &x).unwrap();

        assert_relative_eq!(y[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(y[1], 2.0 * (-1.0f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_misnamed_parameter_surfaces() {
        let params = Parameters::ones(&["slope", "offset"]).unwrap();
        let x = array![0.0, 1.0];

        match line(&params, &x) {
            Err(FitError::ParameterNotFound(name)) => assert_eq!(name, "intercept"),
            other => panic!("Expected ParameterNotFound, got {:?}", other),
        }
    }
}
