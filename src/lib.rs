//! # curvefit-rs
//!
//! `curvefit-rs` is a small library for least-squares curve fitting of noisy
//! datasets, built around a from-scratch Levenberg-Marquardt optimizer with
//! covariance-based uncertainty estimates.
//!
//! The library provides:
//! - A Levenberg-Marquardt solver over a generic [`Problem`] trait
//! - A high-level [`curve_fit`] entry point taking a model function, data,
//!   and named initial guesses, returning fitted parameters together with
//!   their covariance matrix and standard errors
//! - Parallel fitting of many independent datasets ([`curve_fit::curve_fit_batch`])
//! - Seeded synthetic-data helpers for fitting experiments ([`data`])
//!
//! ## Basic Usage
//!
//! ```
//! use curvefit_rs::{curve_fit, data, models};
//! use ndarray::Array1;
//! use rand::SeedableRng;
//!
//! // Simulate noisy measurements of y = x
//! let x = Array1::linspace(0.0, 100.0, 101);
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let y = data::noisy_line(1.0, 0.0, &x, 5.0, &mut rng).unwrap();
//!
//! // Fit a line, starting from slope = 1, intercept = 0
//! let result = curve_fit(models::line, &x, &y, &models::line_parameters(1.0, 0.0)).unwrap();
//!
//! println!("{}", result);
//! let slope = result.params.get("slope").unwrap();
//! assert!((slope.value() - 1.0).abs() < 0.2);
//! assert!(slope.stderr.is_some());
//! ```

pub mod curve_fit;
pub mod data;
pub mod error;
pub mod lm;
pub mod models;
pub mod parameters;
pub mod problem;
pub mod uncertainty;

mod utils;

// Re-exports for convenience
pub use curve_fit::{curve_fit, curve_fit_batch, curve_fit_with, FitResult};
pub use error::{FitError, Result};
pub use lm::{LevenbergMarquardt, LmConfig};
pub use parameters::{Parameter, Parameters};
pub use problem::Problem;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
