//! Interpolation algorithms and their registry.
//!
//! Algorithms see only flat tables: `x_table` holds sample offsets in seconds,
//! `y_table` holds one block of `stride` (or `stride * (order + 1)`) values per
//! sample, and results are written into a caller-owned buffer.

pub mod functions;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::SampledError;

pub use functions::{
    HermitePolynomialApproximation, LagrangePolynomialApproximation, LinearApproximation,
};

/// Interpolation capability driven by a sampled property.
pub trait InterpolationAlgorithm: Send + Sync {
    /// Identity of the algorithm, compared by property equality.
    fn name(&self) -> &str;

    /// Number of samples needed for `degree`, given samples carrying derivatives up to
    /// `derivative_order`.
    fn required_point_count(&self, degree: usize, derivative_order: usize) -> usize;

    /// Interpolate values only. Writes `stride` elements into `result`.
    fn interpolate_order_zero(
        &self,
        x: f64,
        x_table: &[f64],
        y_table: &[f64],
        stride: usize,
        result: &mut Vec<f64>,
    );

    /// Whether [`InterpolationAlgorithm::interpolate`] consumes derivative data.
    #[inline]
    fn supports_derivatives(&self) -> bool {
        false
    }

    /// Interpolate from samples carrying `input_order` derivatives, producing the value
    /// and `output_order` derivatives (`stride * (output_order + 1)` elements).
    #[allow(clippy::too_many_arguments)]
    fn interpolate(
        &self,
        x: f64,
        x_table: &[f64],
        y_table: &[f64],
        stride: usize,
        input_order: usize,
        _output_order: usize,
        result: &mut Vec<f64>,
    ) {
        self.interpolate_order_zero(x, x_table, y_table, stride * (input_order + 1), result);
    }
}

impl fmt::Debug for dyn InterpolationAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("InterpolationAlgorithm")
            .field(&self.name())
            .finish()
    }
}

/// Name → algorithm lookup used when building properties from configuration.
#[derive(Debug)]
pub struct AlgorithmRegistry {
    algorithms: HashMap<String, Arc<dyn InterpolationAlgorithm>>,
}

impl AlgorithmRegistry {
    /// Create a registry holding the built-in algorithms.
    pub fn new() -> Self {
        let mut registry = Self {
            algorithms: HashMap::new(),
        };
        registry.register(Arc::new(LinearApproximation));
        registry.register(Arc::new(LagrangePolynomialApproximation));
        registry.register(Arc::new(HermitePolynomialApproximation));
        registry
    }

    /// Register an algorithm under its own name, replacing any previous entry.
    #[inline]
    pub fn register(&mut self, algorithm: Arc<dyn InterpolationAlgorithm>) {
        self.algorithms
            .insert(algorithm.name().to_string(), algorithm);
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<Arc<dyn InterpolationAlgorithm>> {
        self.algorithms.get(name).cloned()
    }

    /// Like [`AlgorithmRegistry::get`], failing with `AlgorithmNotFound`.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn InterpolationAlgorithm>, SampledError> {
        self.get(name)
            .ok_or_else(|| SampledError::AlgorithmNotFound {
                name: name.to_string(),
            })
    }

    /// List all registered algorithm names
    #[inline]
    pub fn names(&self) -> Vec<&str> {
        self.algorithms.keys().map(|k| k.as_str()).collect()
    }
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_registered() {
        let registry = AlgorithmRegistry::new();
        let mut names = registry.names();
        names.sort_unstable();
        assert_eq!(names, vec!["hermite", "lagrange", "linear"]);
        assert_eq!(registry.resolve("linear").unwrap().name(), "linear");
    }

    #[test]
    fn unknown_name_fails() {
        let registry = AlgorithmRegistry::default();
        let err = registry.resolve("spline").unwrap_err();
        assert_eq!(
            err,
            SampledError::AlgorithmNotFound {
                name: "spline".into()
            }
        );
    }
}
