//! Sampled property configuration.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::interp::InterpolationAlgorithm;

/// Behavior for query times outside the sampled range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtrapolationType {
    /// No value outside the range.
    None,
    /// Hold the boundary sample.
    Hold,
    /// Evaluate the interpolation window anchored at the boundary.
    #[default]
    Extrapolate,
}

/// Serializable description of a sampled property.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Requested interpolation degree.
    pub degree: usize,
    /// Registry name of the interpolation algorithm.
    pub algorithm: String,
    /// Highest derivative order stored with every sample, if any.
    pub derivative_order: Option<usize>,

    pub forward_extrapolation: ExtrapolationType,
    /// Seconds past the last sample that still produce a value (0 = unbounded).
    pub forward_extrapolation_duration: f64,
    pub backward_extrapolation: ExtrapolationType,
    /// Seconds before the first sample that still produce a value (0 = unbounded).
    pub backward_extrapolation_duration: f64,

    /// Initial capacity hint for the sample store.
    pub initial_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            degree: 1,
            algorithm: "linear".to_string(),
            derivative_order: None,
            forward_extrapolation: ExtrapolationType::Extrapolate,
            forward_extrapolation_duration: 0.0,
            backward_extrapolation: ExtrapolationType::Extrapolate,
            backward_extrapolation_duration: 0.0,
            initial_capacity: 0,
        }
    }
}

/// Partial interpolation update; `None` fields keep their current setting.
#[derive(Clone, Debug, Default)]
pub struct InterpolationOptions {
    pub algorithm: Option<Arc<dyn InterpolationAlgorithm>>,
    pub degree: Option<usize>,
}

impl InterpolationOptions {
    pub fn degree(degree: usize) -> Self {
        Self {
            algorithm: None,
            degree: Some(degree),
        }
    }

    pub fn algorithm(algorithm: Arc<dyn InterpolationAlgorithm>) -> Self {
        Self {
            algorithm: Some(algorithm),
            degree: None,
        }
    }

    pub fn with_degree(mut self, degree: usize) -> Self {
        self.degree = Some(degree);
        self
    }
}
