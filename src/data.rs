//! Synthetic data generation for fitting experiments.
//!
//! These helpers cover the tutorial workflow of simulating noisy
//! measurements before fitting them. The random number generator is always
//! supplied by the caller, so tests can seed it and stay reproducible.

use crate::error::{FitError, Result};
use ndarray::Array1;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Add zero-mean Gaussian noise with the given standard deviation to each
/// element of `y`.
pub fn add_gaussian_noise<R: Rng>(
    y: &Array1<f64>,
    sigma: f64,
    rng: &mut R,
) -> Result<Array1<f64>> {
    // Normal::new accepts negative standard deviations, silently flipping
    // the noise sign; reject them (and NaN) here instead.
    if sigma.is_nan() || sigma < 0.0 {
        return Err(FitError::InvalidInput(format!(
            "Noise standard deviation must be non-negative, got {}",
            sigma
        )));
    }
    let normal = Normal::new(0.0, sigma).map_err(|e| {
        FitError::InvalidInput(format!("Invalid noise standard deviation {}: {}", sigma, e))
    })?;

    Ok(y.mapv(|v| v + normal.sample(rng)))
}

/// Generate noisy observations of the line `slope * x + intercept`.
pub fn noisy_line<R: Rng>(
    slope: f64,
    intercept: f64,
    x: &Array1<f64>,
    sigma: f64,
    rng: &mut R,
) -> Result<Array1<f64>> {
    let y = x.mapv(|v| slope * v + intercept);
    add_gaussian_noise(&y, sigma, rng)
}
