//! Levenberg-Marquardt algorithm implementation.
//!
//! This module provides an implementation of the Levenberg-Marquardt
//! algorithm for nonlinear least-squares optimization: a damped Gauss-Newton
//! iteration that solves (J^T J + λ diag) δ = J^T r and adapts the damping λ
//! based on whether a step decreases the cost.

pub mod algorithm;
pub mod config;

pub use algorithm::{LevenbergMarquardt, LmResult};
pub use config::LmConfig;
