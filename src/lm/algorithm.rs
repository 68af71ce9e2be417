//! Implementation of the Levenberg-Marquardt algorithm.
//!
//! The solver iterates the damped normal equations
//! (J^T J + λI) δ = J^T r, accepting a step only when it decreases the sum
//! of squared residuals. Failure to converge is reported through
//! [`FitError::NonConvergence`] (carrying the best estimate found) rather
//! than a success flag, so a caller can never mistake a non-converged fit
//! for a successful one.

use std::fmt;

use ndarray::{Array1, Array2};

use crate::error::{FitError, Result};
use crate::problem::Problem;
use crate::utils::linalg;

use super::config::LmConfig;

/// Result of a successful Levenberg-Marquardt optimization.
#[derive(Debug, Clone)]
pub struct LmResult {
    /// Optimized parameter values
    pub params: Array1<f64>,

    /// Residuals at the solution
    pub residuals: Array1<f64>,

    /// Sum of squared residuals at the solution
    pub cost: f64,

    /// Number of iterations performed
    pub iterations: usize,

    /// Number of function evaluations
    pub func_evals: usize,

    /// A message describing which convergence criterion fired
    pub message: String,

    /// The Jacobian matrix at the solution (if requested)
    pub jacobian: Option<Array2<f64>>,
}

impl fmt::Display for LmResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Optimization Result:")?;
        writeln!(f, "  Message: {}", self.message)?;
        writeln!(f, "  Cost: {:.6e}", self.cost)?;
        writeln!(f, "  Iterations: {}", self.iterations)?;
        writeln!(f, "  Function evaluations: {}", self.func_evals)?;
        writeln!(f, "  Parameters: {:?}", self.params)?;
        Ok(())
    }
}

/// The Levenberg-Marquardt optimizer.
#[derive(Debug, Clone, Default)]
pub struct LevenbergMarquardt {
    /// Configuration options
    config: LmConfig,
}

impl LevenbergMarquardt {
    /// Create a new Levenberg-Marquardt optimizer with default configuration.
    pub fn new() -> Self {
        Self {
            config: LmConfig::default(),
        }
    }

    /// Create a new Levenberg-Marquardt optimizer with the given configuration.
    pub fn with_config(config: LmConfig) -> Self {
        Self { config }
    }

    /// Set the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Set the tolerance for relative change in cost.
    pub fn with_ftol(mut self, ftol: f64) -> Self {
        self.config.ftol = ftol;
        self
    }

    /// Set the tolerance for change in parameter values.
    pub fn with_xtol(mut self, xtol: f64) -> Self {
        self.config.xtol = xtol;
        self
    }

    /// Set the tolerance for gradient norm.
    pub fn with_gtol(mut self, gtol: f64) -> Self {
        self.config.gtol = gtol;
        self
    }

    /// Set the initial value for the damping parameter.
    pub fn with_lambda(mut self, lambda: f64) -> Self {
        self.config.initial_lambda = lambda;
        self
    }

    /// Set the factor by which to increase lambda after a rejected step.
    pub fn with_lambda_up_factor(mut self, factor: f64) -> Self {
        self.config.lambda_up_factor = factor;
        self
    }

    /// Set the factor by which to decrease lambda after an accepted step.
    pub fn with_lambda_down_factor(mut self, factor: f64) -> Self {
        self.config.lambda_down_factor = factor;
        self
    }

    /// Set whether to calculate and return the Jacobian at the solution.
    pub fn with_calc_jacobian(mut self, calc_jacobian: bool) -> Self {
        self.config.calc_jacobian = calc_jacobian;
        self
    }

    /// Minimize the sum of squared residuals for the given problem.
    ///
    /// # Arguments
    ///
    /// * `problem` - The problem to solve
    /// * `initial_params` - Initial guess for the parameter values
    ///
    /// # Errors
    ///
    /// * [`FitError::ShapeMismatch`] when the guess arity does not match the
    ///   problem's parameter count, or a custom Jacobian has the wrong shape
    /// * [`FitError::SingularJacobian`] when the problem is under-determined
    ///   or the damped normal equations stay unsolvable at maximum damping
    /// * [`FitError::NonConvergence`] when the iteration budget is exhausted
    ///   or the damping saturates without a cost decrease
    pub fn minimize<P: Problem>(
        &self,
        problem: &P,
        initial_params: Array1<f64>,
    ) -> Result<LmResult> {
        let n_params = problem.parameter_count();
        if initial_params.len() != n_params {
            return Err(FitError::ShapeMismatch(format!(
                "Expected {} parameters, got {}",
                n_params,
                initial_params.len()
            )));
        }
        if n_params == 0 {
            return Err(FitError::InvalidInput(
                "Problem has no parameters".to_string(),
            ));
        }
        // Under-determined: fewer observations than parameters
        if problem.residual_count() < n_params {
            return Err(FitError::SingularJacobian);
        }

        let mut params = initial_params;
        let mut residuals = problem.eval(&params)?;
        let mut func_evals = 1;
        let mut cost: f64 = residuals.iter().map(|r| r.powi(2)).sum();

        if !cost.is_finite() {
            return Err(FitError::FunctionEvaluation(
                "Residuals are not finite at the initial parameters".to_string(),
            ));
        }

        let mut lambda = self.config.initial_lambda;
        let mut iterations = 0;

        loop {
            let jacobian = problem.jacobian(&params)?;
            // Forward differences cost one evaluation per parameter; an
            // analytic Jacobian costs none.
            if !problem.has_custom_jacobian() {
                func_evals += n_params;
            }

            if jacobian.nrows() != residuals.len() || jacobian.ncols() != n_params {
                return Err(FitError::ShapeMismatch(format!(
                    "Expected Jacobian of shape [{}, {}], got {:?}",
                    residuals.len(),
                    n_params,
                    jacobian.shape()
                )));
            }

            let jt = jacobian.t();
            let gradient = jt.dot(&residuals);
            let jtj = jt.dot(&jacobian);

            // Gradient convergence
            let gradient_norm = gradient.iter().map(|g| g * g).sum::<f64>().sqrt();
            if gradient_norm < self.config.gtol {
                return self.finish(
                    problem,
                    params,
                    residuals,
                    cost,
                    iterations,
                    func_evals,
                    format!(
                        "Gradient convergence: ||g|| = {:.2e} < {:.2e}",
                        gradient_norm, self.config.gtol
                    ),
                );
            }

            // Inner loop: grow the damping until a step is both solvable and
            // decreases the cost.
            let (new_params, new_residuals, new_cost, step_norm) = loop {
                let mut damped = jtj.clone();
                for i in 0..n_params {
                    damped[[i, i]] += lambda;
                }

                let step = match linalg::solve_spd(&damped, &gradient) {
                    Some(step) => step,
                    None => {
                        if lambda >= self.config.max_lambda {
                            return Err(FitError::SingularJacobian);
                        }
                        lambda = (lambda * self.config.lambda_up_factor)
                            .min(self.config.max_lambda);
                        continue;
                    }
                };

                let candidate = &params - &step;
                let candidate_residuals = problem.eval(&candidate)?;
                func_evals += 1;
                let candidate_cost: f64 =
                    candidate_residuals.iter().map(|r| r.powi(2)).sum();

                if candidate_cost.is_finite() && candidate_cost < cost {
                    let step_norm = step.iter().map(|s| s.abs()).fold(0.0, f64::max);
                    break (candidate, candidate_residuals, candidate_cost, step_norm);
                }

                // Step rejected: increase damping and retry
                if lambda >= self.config.max_lambda {
                    return Err(FitError::NonConvergence {
                        params,
                        cost,
                        iterations,
                    });
                }
                lambda = (lambda * self.config.lambda_up_factor).min(self.config.max_lambda);
            };

            let cost_change = (cost - new_cost) / cost.max(1e-10);
            params = new_params;
            residuals = new_residuals;
            cost = new_cost;
            lambda = (lambda * self.config.lambda_down_factor).max(self.config.min_lambda);
            iterations += 1;

            if step_norm < self.config.xtol {
                return self.finish(
                    problem,
                    params,
                    residuals,
                    cost,
                    iterations,
                    func_evals,
                    format!(
                        "Parameter convergence: max|dx| = {:.2e} < {:.2e}",
                        step_norm, self.config.xtol
                    ),
                );
            }
            if cost_change < self.config.ftol {
                return self.finish(
                    problem,
                    params,
                    residuals,
                    cost,
                    iterations,
                    func_evals,
                    format!(
                        "Cost convergence: |df|/|f| = {:.2e} < {:.2e}",
                        cost_change, self.config.ftol
                    ),
                );
            }
            if iterations >= self.config.max_iterations {
                return Err(FitError::NonConvergence {
                    params,
                    cost,
                    iterations,
                });
            }
        }
    }

    fn finish<P: Problem>(
        &self,
        problem: &P,
        params: Array1<f64>,
        residuals: Array1<f64>,
        cost: f64,
        iterations: usize,
        func_evals: usize,
        message: String,
    ) -> Result<LmResult> {
        let jacobian = if self.config.calc_jacobian {
            Some(problem.jacobian(&params)?)
        } else {
            None
        };

        Ok(LmResult {
            params,
            residuals,
            cost,
            iterations,
            func_evals,
            message,
            jacobian,
        })
    }
}
