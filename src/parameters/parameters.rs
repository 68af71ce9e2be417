//! Ordered collection of named parameters.
//!
//! A `Parameters` collection is the structured form of an initial guess:
//! each guess value is bound to the parameter name it seeds, and the
//! insertion order defines the layout of the optimizer's parameter vector
//! and of the covariance matrix.

use crate::error::{FitError, Result};
use crate::parameters::parameter::Parameter;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// An ordered collection of named parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Parameters {
    params: Vec<Parameter>,
}

impl Parameters {
    /// Create an empty parameter collection.
    pub fn new() -> Self {
        Self { params: Vec::new() }
    }

    /// Create a parameter collection with every value initialized to 1.0.
    ///
    /// This is the conventional default guess when a caller has no better
    /// starting point.
    ///
    /// # Examples
    ///
    /// ```
    /// use curvefit_rs::parameters::Parameters;
    ///
    /// let params = Parameters::ones(&["slope", "intercept"]).unwrap();
    /// assert_eq!(params.value("slope").unwrap(), 1.0);
    /// assert_eq!(params.value("intercept").unwrap(), 1.0);
    /// ```
    pub fn ones(names: &[&str]) -> Result<Self> {
        let mut params = Self::new();
        for name in names {
            params.add_param(name, 1.0)?;
        }
        Ok(params)
    }

    /// Add a parameter with the given name and initial value.
    ///
    /// Fails if a parameter with the same name already exists.
    pub fn add_param(&mut self, name: &str, value: f64) -> Result<()> {
        if self.get(name).is_some() {
            return Err(FitError::ParameterError(format!(
                "Parameter '{}' already exists",
                name
            )));
        }
        self.params.push(Parameter::new(name, value));
        Ok(())
    }

    /// Get a reference to a parameter by name.
    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name() == name)
    }

    /// Get a mutable reference to a parameter by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Parameter> {
        self.params.iter_mut().find(|p| p.name() == name)
    }

    /// Get the current value of a parameter by name.
    ///
    /// This is the lookup model functions use, so a misspelled name surfaces
    /// as an error instead of silently reading another parameter.
    pub fn value(&self, name: &str) -> Result<f64> {
        self.get(name)
            .map(|p| p.value())
            .ok_or_else(|| FitError::ParameterNotFound(name.to_string()))
    }

    /// Number of parameters in the collection.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Parameter names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.name()).collect()
    }

    /// Iterate over the parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    /// Extract the parameter values as an array, in insertion order.
    pub fn to_array(&self) -> Array1<f64> {
        Array1::from_iter(self.params.iter().map(|p| p.value()))
    }

    /// Set all parameter values from an array, in insertion order.
    pub fn set_from_array(&mut self, values: &Array1<f64>) -> Result<()> {
        if values.len() != self.params.len() {
            return Err(FitError::ShapeMismatch(format!(
                "Expected {} parameter values, got {}",
                self.params.len(),
                values.len()
            )));
        }

        for (param, &value) in self.params.iter_mut().zip(values.iter()) {
            param.set_value(value);
        }
        Ok(())
    }

    /// Serialize the parameter collection to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize a parameter collection from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_add_and_get() {
        let mut params = Parameters::new();
        params.add_param("slope", 2.0).unwrap();
        params.add_param("intercept", -1.0).unwrap();

        assert_eq!(params.len(), 2);
        assert_eq!(params.value("slope").unwrap(), 2.0);
        assert_eq!(params.value("intercept").unwrap(), -1.0);
        assert_eq!(params.names(), vec!["slope", "intercept"]);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut params = Parameters::new();
        params.add_param("a", 1.0).unwrap();

        match params.add_param("a", 2.0) {
            Err(FitError::ParameterError(_)) => (),
            other => panic!("Expected ParameterError, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_name() {
        let params = Parameters::ones(&["a", "b"]).unwrap();

        match params.value("c") {
            Err(FitError::ParameterNotFound(name)) => assert_eq!(name, "c"),
            other => panic!("Expected ParameterNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_array_round_trip() {
        let mut params = Parameters::new();
        params.add_param("a", 1.0).unwrap();
        params.add_param("b", 2.0).unwrap();

        assert_eq!(params.to_array(), array![1.0, 2.0]);

        params.set_from_array(&array![3.0, 4.0]).unwrap();
        assert_eq!(params.value("a").unwrap(), 3.0);
        assert_eq!(params.value("b").unwrap(), 4.0);

        // Initial values are untouched by updates
        assert_eq!(params.get("a").unwrap().init_value(), 1.0);
    }

    #[test]
    fn test_set_from_array_wrong_length() {
        let mut params = Parameters::ones(&["a", "b"]).unwrap();

        match params.set_from_array(&array![1.0]) {
            Err(FitError::ShapeMismatch(_)) => (),
            other => panic!("Expected ShapeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_json_round_trip() {
        let mut params = Parameters::new();
        params.add_param("amplitude", 5.0).unwrap();
        params.add_param("rate", 0.3).unwrap();

        let json = params.to_json().unwrap();
        let restored = Parameters::from_json(&json).unwrap();

        assert_eq!(restored.names(), vec!["amplitude", "rate"]);
        assert_eq!(restored.to_array(), params.to_array());
    }
}
