//! Parameter definition and implementation.
//!
//! This module provides the Parameter struct, the fundamental building block
//! of the parameter system. A parameter couples a name to its current value,
//! remembers the value it was created with, and carries the standard error
//! assigned after a fit.

use serde::{Deserialize, Serialize};

/// A named parameter of a model function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    /// Name of the parameter
    name: String,

    /// Current value of the parameter
    value: f64,

    /// Initial value when created (the guess the fit started from)
    init_value: f64,

    /// Standard error of the parameter (set after fitting)
    pub stderr: Option<f64>,
}

impl Parameter {
    /// Create a new parameter with the given name and value.
    ///
    /// # Examples
    ///
    /// ```
    /// use curvefit_rs::parameters::Parameter;
    ///
    /// let param = Parameter::new("slope", 2.0);
    /// assert_eq!(param.name(), "slope");
    /// assert_eq!(param.value(), 2.0);
    /// assert!(param.stderr.is_none());
    /// ```
    pub fn new(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            value,
            init_value: value,
            stderr: None,
        }
    }

    /// Get the name of the parameter.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the current value of the parameter.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Set the current value of the parameter.
    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    /// Get the initial value the parameter was created with.
    pub fn init_value(&self) -> f64 {
        self.init_value
    }
}
