//! Sampled property: a value reconstructed over time from discrete samples.
//!
//! Queries at a stored time return that sample as-is. Other times are interpolated
//! from a window of neighbouring samples; outside the sampled range the per-side
//! extrapolation setting decides between no value, holding the boundary sample, or
//! evaluating the boundary window. Every mutation raises a [`PropertyEvent`].

use std::sync::Arc;

use crate::codec::ValueCodec;
use crate::config::{Config, ExtrapolationType, InterpolationOptions};
use crate::error::SampledError;
use crate::events::{ChangeNotifier, PropertyEvent};
use crate::ids::SubscriptionId;
use crate::interp::{AlgorithmRegistry, InterpolationAlgorithm, LinearApproximation};
use crate::store::{MergeReport, SampleStore};
use crate::time::{OrderedTime, PackedEntry};
use crate::window::{WindowRequest, WindowSelector};
use crate::Result;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Extrapolation {
    kind: ExtrapolationType,
    /// Seconds past the boundary that still produce a value (0 = unbounded).
    duration: f64,
}

impl Extrapolation {
    fn allows(&self, distance: f64) -> bool {
        self.kind != ExtrapolationType::None && (self.duration == 0.0 || distance <= self.duration)
    }
}

/// Time-keyed samples of `C::Value` with windowed interpolation.
#[derive(Debug)]
pub struct SampledProperty<T, C: ValueCodec> {
    codec: C,
    store: SampleStore<T>,
    selector: WindowSelector,
    algorithm: Arc<dyn InterpolationAlgorithm>,
    degree: usize,
    derivative_order: Option<usize>,
    interpolation_block_len: usize,
    forward: Extrapolation,
    backward: Extrapolation,
    notifier: ChangeNotifier,
}

impl<T: OrderedTime, C: ValueCodec> SampledProperty<T, C> {
    /// Linear, degree 1, no derivatives, extrapolating on both sides.
    pub fn new(codec: C) -> Result<Self> {
        Self::build(codec, Arc::new(LinearApproximation), &Config::default())
    }

    /// Samples carry `derivative_order` derivatives after the value, each packed
    /// with the same codec.
    pub fn with_derivatives(codec: C, derivative_order: usize) -> Result<Self> {
        let config = Config {
            derivative_order: Some(derivative_order),
            ..Config::default()
        };
        Self::build(codec, Arc::new(LinearApproximation), &config)
    }

    /// Build from a serializable configuration, resolving the algorithm by name.
    pub fn from_config(codec: C, config: &Config, registry: &AlgorithmRegistry) -> Result<Self> {
        let algorithm = registry.resolve(&config.algorithm)?;
        Self::build(codec, algorithm, config)
    }

    fn build(
        codec: C,
        algorithm: Arc<dyn InterpolationAlgorithm>,
        config: &Config,
    ) -> Result<Self> {
        let packed_length = codec.packed_length();
        if packed_length == 0 {
            return Err(SampledError::configuration(format!(
                "value type '{}' has a zero packed length",
                codec.type_name()
            )));
        }
        if let Some(order) = config.derivative_order {
            if order == 0 {
                return Err(SampledError::configuration(
                    "derivative order must be at least 1",
                ));
            }
            if C::CUSTOM_INTERPOLATION {
                return Err(SampledError::configuration(format!(
                    "value type '{}' is converted for interpolation and cannot carry derivatives",
                    codec.type_name()
                )));
            }
        }
        let forward = Self::extrapolation(
            config.forward_extrapolation,
            config.forward_extrapolation_duration,
        )?;
        let backward = Self::extrapolation(
            config.backward_extrapolation,
            config.backward_extrapolation_duration,
        )?;

        let blocks = config.derivative_order.unwrap_or(0) + 1;
        Ok(Self {
            store: SampleStore::with_capacity(packed_length * blocks, config.initial_capacity),
            interpolation_block_len: codec.packed_interpolation_length() * blocks,
            codec,
            selector: WindowSelector::new(),
            algorithm,
            degree: config.degree,
            derivative_order: config.derivative_order,
            forward,
            backward,
            notifier: ChangeNotifier::new(),
        })
    }

    // ----- queries -----

    /// Value at `time`, or `None` when the samples cannot produce one.
    pub fn get_value(&mut self, time: &T) -> Option<C::Value> {
        let len = self.store.len();
        if len == 0 {
            return None;
        }

        let center = match self.store.find(time) {
            Ok(index) => return Some(self.unpack_sample(index)),
            Err(insertion) => insertion,
        };

        if center == 0 {
            let distance = T::seconds_between(time, &self.store.times()[0]);
            if !self.backward.allows(distance) {
                return None;
            }
            if self.backward.kind == ExtrapolationType::Hold {
                return Some(self.unpack_sample(0));
            }
        }
        if center >= len {
            let distance = T::seconds_between(&self.store.times()[len - 1], time);
            if !self.forward.allows(distance) {
                return None;
            }
            if self.forward.kind == ExtrapolationType::Hold {
                return Some(self.unpack_sample(len - 1));
            }
        }

        let request = WindowRequest {
            algorithm: self.algorithm.as_ref(),
            degree: self.degree,
            derivative_order: self.derivative_order,
            interpolation_block_len: self.interpolation_block_len,
        };
        self.selector
            .evaluate(&self.store, &self.codec, &request, time, center)
    }

    #[inline]
    fn unpack_sample(&self, index: usize) -> C::Value {
        self.codec
            .unpack(self.store.values(), index * self.store.block_len())
    }

    /// True while no samples have been added.
    #[inline]
    pub fn is_constant(&self) -> bool {
        self.store.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Time of the sample at `index`.
    #[inline]
    pub fn get_sample(&self, index: usize) -> Option<T> {
        self.store.times().get(index).copied()
    }

    #[inline]
    pub fn times(&self) -> &[T] {
        self.store.times()
    }

    /// Flat sample blocks (value followed by derivatives, if any).
    #[inline]
    pub fn values(&self) -> &[f64] {
        self.store.values()
    }

    #[inline]
    pub fn codec(&self) -> &C {
        &self.codec
    }

    #[inline]
    pub fn interpolation_degree(&self) -> usize {
        self.degree
    }

    #[inline]
    pub fn interpolation_algorithm(&self) -> &Arc<dyn InterpolationAlgorithm> {
        &self.algorithm
    }

    #[inline]
    pub fn derivative_order(&self) -> Option<usize> {
        self.derivative_order
    }

    #[inline]
    pub fn forward_extrapolation(&self) -> (ExtrapolationType, f64) {
        (self.forward.kind, self.forward.duration)
    }

    #[inline]
    pub fn backward_extrapolation(&self) -> (ExtrapolationType, f64) {
        (self.backward.kind, self.backward.duration)
    }

    // ----- mutation -----

    pub fn add_sample(&mut self, time: T, value: &C::Value) -> Result<MergeReport> {
        self.add_sample_with_derivatives(time, value, &[])
    }

    /// Add one sample; `derivatives` must hold exactly `derivative_order` values.
    pub fn add_sample_with_derivatives(
        &mut self,
        time: T,
        value: &C::Value,
        derivatives: &[C::Value],
    ) -> Result<MergeReport> {
        self.check_derivatives(derivatives.len())?;
        let mut values = Vec::with_capacity(self.store.block_len());
        self.pack_block(value, derivatives, &mut values);
        self.merge(&[time], &values)
    }

    /// Add parallel sequences of times and values.
    pub fn add_samples(&mut self, times: &[T], values: &[C::Value]) -> Result<MergeReport> {
        if times.len() != values.len() {
            return Err(SampledError::LengthMismatch {
                times: times.len(),
                values: values.len(),
            });
        }
        self.check_derivatives(0)?;
        let mut packed = Vec::with_capacity(times.len() * self.store.block_len());
        for value in values {
            self.pack_block(value, &[], &mut packed);
        }
        self.merge(times, &packed)
    }

    /// Add parallel sequences of times, values and per-sample derivative lists.
    pub fn add_samples_with_derivatives(
        &mut self,
        times: &[T],
        values: &[C::Value],
        derivatives: &[Vec<C::Value>],
    ) -> Result<MergeReport> {
        if times.len() != values.len() || times.len() != derivatives.len() {
            return Err(SampledError::LengthMismatch {
                times: times.len(),
                values: if times.len() != values.len() {
                    values.len()
                } else {
                    derivatives.len()
                },
            });
        }
        for sample_derivatives in derivatives {
            self.check_derivatives(sample_derivatives.len())?;
        }
        let mut packed = Vec::with_capacity(times.len() * self.store.block_len());
        for (value, sample_derivatives) in values.iter().zip(derivatives) {
            self.pack_block(value, sample_derivatives, &mut packed);
        }
        self.merge(times, &packed)
    }

    /// Add interleaved `(time, block...)` tuples. Numeric times are seconds from `epoch`.
    pub fn add_samples_packed_array(
        &mut self,
        packed: &[PackedEntry<T>],
        epoch: Option<&T>,
    ) -> Result<MergeReport> {
        let report = self.store.merge(epoch, packed)?;
        self.samples_changed(report);
        Ok(report)
    }

    fn check_derivatives(&self, actual: usize) -> Result<()> {
        let expected = self.derivative_order.unwrap_or(0);
        if actual != expected {
            return Err(SampledError::DerivativeCount { expected, actual });
        }
        Ok(())
    }

    fn pack_block(&self, value: &C::Value, derivatives: &[C::Value], dest: &mut Vec<f64>) {
        let offset = dest.len();
        let packed_length = self.codec.packed_length();
        dest.resize(offset + self.store.block_len(), 0.0);
        self.codec.pack(value, dest, offset);
        for (k, derivative) in derivatives.iter().enumerate() {
            self.codec
                .pack(derivative, dest, offset + (k + 1) * packed_length);
        }
    }

    fn merge(&mut self, times: &[T], values: &[f64]) -> Result<MergeReport> {
        let report = self.store.merge_samples(times, values)?;
        self.samples_changed(report);
        Ok(report)
    }

    fn samples_changed(&mut self, report: MergeReport) {
        self.selector.invalidate();
        self.notifier.raise(&PropertyEvent::SamplesMerged {
            inserted: report.inserted,
            overwritten: report.overwritten,
            len: self.store.len(),
        });
    }

    /// Apply the provided fields. Notifies only when the algorithm or degree changed.
    pub fn set_interpolation_options(&mut self, options: InterpolationOptions) {
        let mut changed = false;
        if let Some(degree) = options.degree {
            if degree != self.degree {
                self.degree = degree;
                changed = true;
            }
        }
        if let Some(algorithm) = options.algorithm {
            if algorithm.name() != self.algorithm.name() {
                self.algorithm = algorithm;
                changed = true;
            }
        }
        if !changed {
            return;
        }

        log::debug!(
            "interpolation set to {} degree {}",
            self.algorithm.name(),
            self.degree
        );
        self.selector.invalidate();
        self.notifier.raise(&PropertyEvent::InterpolationChanged {
            algorithm: self.algorithm.name().to_string(),
            degree: self.degree,
        });
    }

    /// Behavior after the last sample; `duration` of 0 means unbounded.
    pub fn set_forward_extrapolation(
        &mut self,
        kind: ExtrapolationType,
        duration: f64,
    ) -> Result<()> {
        let next = Self::extrapolation(kind, duration)?;
        if next != self.forward {
            self.forward = next;
            self.extrapolation_changed();
        }
        Ok(())
    }

    /// Behavior before the first sample; `duration` of 0 means unbounded.
    pub fn set_backward_extrapolation(
        &mut self,
        kind: ExtrapolationType,
        duration: f64,
    ) -> Result<()> {
        let next = Self::extrapolation(kind, duration)?;
        if next != self.backward {
            self.backward = next;
            self.extrapolation_changed();
        }
        Ok(())
    }

    fn extrapolation(kind: ExtrapolationType, duration: f64) -> Result<Extrapolation> {
        if !(duration >= 0.0 && duration.is_finite()) {
            return Err(SampledError::configuration(format!(
                "extrapolation duration must be a non-negative number of seconds, got {duration}"
            )));
        }
        Ok(Extrapolation { kind, duration })
    }

    fn extrapolation_changed(&mut self) {
        log::debug!(
            "extrapolation set to forward {:?}/{}s, backward {:?}/{}s",
            self.forward.kind,
            self.forward.duration,
            self.backward.kind,
            self.backward.duration
        );
        self.notifier.raise(&PropertyEvent::ExtrapolationChanged {
            forward: self.forward.kind,
            forward_duration: self.forward.duration,
            backward: self.backward.kind,
            backward_duration: self.backward.duration,
        });
    }

    // ----- notifications -----

    /// Register a listener for definition changes.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&PropertyEvent) + Send + 'static,
    {
        self.notifier.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    // ----- equality -----

    /// Same samples, value type, degree and algorithm.
    pub fn equals(&self, other: &Self) -> bool {
        let times_equal = self.store.len() == other.store.len()
            && self
                .store
                .times()
                .iter()
                .zip(other.store.times())
                .all(|(a, b)| a.time_eq(b));

        times_equal
            && self.store.values() == other.store.values()
            && self.codec == other.codec
            && self.degree == other.degree
            && self.algorithm.name() == other.algorithm.name()
    }
}

impl<T: OrderedTime, C: ValueCodec> PartialEq for SampledProperty<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{QuatCodec, ScalarCodec};
    use crate::time::SceneTime;

    #[test]
    fn zero_length_codec_is_rejected() {
        #[derive(Debug, PartialEq)]
        struct Empty;
        impl ValueCodec for Empty {
            type Value = ();
            fn type_name(&self) -> &'static str {
                "empty"
            }
            fn packed_length(&self) -> usize {
                0
            }
            fn pack(&self, _: &(), _: &mut [f64], _: usize) {}
            fn unpack(&self, _: &[f64], _: usize) {}
        }

        let err = SampledProperty::<SceneTime, _>::new(Empty).unwrap_err();
        assert_eq!(err.category(), "configuration");
    }

    #[test]
    fn converting_codec_cannot_carry_derivatives() {
        let quat = SampledProperty::<SceneTime, _>::with_derivatives(QuatCodec, 1);
        assert!(quat.is_err());
        let zero_order = SampledProperty::<SceneTime, _>::with_derivatives(ScalarCodec, 0);
        assert!(zero_order.is_err());
        let second_order = SampledProperty::<SceneTime, _>::with_derivatives(ScalarCodec, 2);
        assert!(second_order.is_ok());
    }

    #[test]
    fn point_count_is_cached_until_invalidated() {
        let mut p = SampledProperty::<SceneTime, _>::new(ScalarCodec).unwrap();
        p.add_samples(&[SceneTime::from(0.0), SceneTime::from(10.0)], &[0.0, 10.0])
            .unwrap();
        assert_eq!(p.get_value(&SceneTime::from(5.0)), Some(5.0));
        assert!(!p.selector_is_dirty());
        p.set_interpolation_options(InterpolationOptions::degree(1));
        assert!(!p.selector_is_dirty());
        p.set_interpolation_options(InterpolationOptions::degree(3));
        assert!(p.selector_is_dirty());
    }

    impl<T: OrderedTime, C: ValueCodec> SampledProperty<T, C> {
        fn selector_is_dirty(&self) -> bool {
            self.selector.is_dirty()
        }
    }
}
