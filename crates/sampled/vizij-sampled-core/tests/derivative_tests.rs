use std::sync::{Arc, Mutex};

use approx::assert_relative_eq;
use vizij_sampled_core::{
    HermitePolynomialApproximation, InterpolationAlgorithm, InterpolationOptions, SampledError,
    SampledProperty, ScalarCodec, SceneTime, Vec3Codec,
};

fn t(seconds: f64) -> SceneTime {
    SceneTime::from(seconds)
}

#[derive(Debug, Clone, PartialEq)]
struct Call {
    x: f64,
    x_table: Vec<f64>,
    y_len: usize,
    stride: usize,
    orders: Option<(usize, usize)>,
}

/// Records how it was invoked and returns zeros.
struct Recording {
    derivatives: bool,
    calls: Mutex<Vec<Call>>,
}

impl Recording {
    fn new(derivatives: bool) -> Arc<Self> {
        Arc::new(Self {
            derivatives,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn last_call(&self) -> Call {
        self.calls.lock().unwrap().last().cloned().unwrap()
    }
}

impl InterpolationAlgorithm for Recording {
    fn name(&self) -> &str {
        "recording"
    }

    fn required_point_count(&self, degree: usize, _derivative_order: usize) -> usize {
        degree + 1
    }

    fn interpolate_order_zero(
        &self,
        x: f64,
        x_table: &[f64],
        y_table: &[f64],
        stride: usize,
        result: &mut Vec<f64>,
    ) {
        self.calls.lock().unwrap().push(Call {
            x,
            x_table: x_table.to_vec(),
            y_len: y_table.len(),
            stride,
            orders: None,
        });
        result.clear();
        result.resize(stride, 0.0);
    }

    fn supports_derivatives(&self) -> bool {
        self.derivatives
    }

    fn interpolate(
        &self,
        x: f64,
        x_table: &[f64],
        y_table: &[f64],
        stride: usize,
        input_order: usize,
        output_order: usize,
        result: &mut Vec<f64>,
    ) {
        self.calls.lock().unwrap().push(Call {
            x,
            x_table: x_table.to_vec(),
            y_len: y_table.len(),
            stride,
            orders: Some((input_order, output_order)),
        });
        result.clear();
        result.resize(stride * (output_order + 1), 0.0);
    }
}

fn position_velocity_property(
    algorithm: Arc<dyn InterpolationAlgorithm>,
    degree: usize,
) -> SampledProperty<SceneTime, Vec3Codec> {
    let mut p = SampledProperty::with_derivatives(Vec3Codec::default(), 1).unwrap();
    let options = InterpolationOptions::algorithm(algorithm).with_degree(degree);
    p.set_interpolation_options(options);
    let times = [t(0.0), t(10.0), t(20.0)];
    let positions = [[0.0, 0.0, 1.0], [100.0, 10.0, 1.0], [400.0, 20.0, 1.0]];
    let velocities = vec![
        vec![[0.0, 1.0, 0.0]],
        vec![[20.0, 1.0, 0.0]],
        vec![[40.0, 1.0, 0.0]],
    ];
    p.add_samples_with_derivatives(&times, &positions, &velocities)
        .unwrap();
    p
}

#[test]
fn hermite_uses_velocities() {
    // x = t^2, y = t, z = 1; a cubic Hermite segment reproduces all three exactly
    let mut p = position_velocity_property(Arc::new(HermitePolynomialApproximation), 3);
    for query in [2.5, 5.0, 13.0] {
        let v = p.get_value(&t(query)).unwrap();
        assert_relative_eq!(v[0], query * query, epsilon = 1e-9);
        assert_relative_eq!(v[1], query, epsilon = 1e-9);
        assert_relative_eq!(v[2], 1.0, epsilon = 1e-12);
    }
}

#[test]
fn exact_match_returns_value_part_of_block() {
    let mut p = position_velocity_property(Arc::new(HermitePolynomialApproximation), 3);
    assert_eq!(p.get_value(&t(10.0)), Some([100.0, 10.0, 1.0]));
    assert_eq!(p.values().len(), 3 * 6);
    assert_eq!(&p.values()[6..12], &[100.0, 10.0, 1.0, 20.0, 1.0, 0.0]);
}

#[test]
fn derivative_aware_dispatch_passes_stride_and_orders() {
    let recording = Recording::new(true);
    let mut p = position_velocity_property(recording.clone(), 1);
    p.get_value(&t(12.0)).unwrap();

    assert_eq!(
        recording.last_call(),
        Call {
            x: -8.0,
            x_table: vec![-10.0, 0.0],
            y_len: 12,
            stride: 3,
            orders: Some((1, 1)),
        }
    );
}

#[test]
fn algorithms_without_derivatives_see_whole_blocks() {
    let recording = Recording::new(false);
    let mut p = position_velocity_property(recording.clone(), 2);
    p.get_value(&t(25.0)).unwrap();

    assert_eq!(
        recording.last_call(),
        Call {
            x: 5.0,
            x_table: vec![-20.0, -10.0, 0.0],
            y_len: 18,
            stride: 6,
            orders: None,
        }
    );
}

#[test]
fn scalar_properties_dispatch_order_zero() {
    let recording = Recording::new(true);
    let mut p = SampledProperty::<SceneTime, _>::new(ScalarCodec).unwrap();
    p.set_interpolation_options(InterpolationOptions::algorithm(recording.clone()));
    p.add_samples(&[t(0.0), t(4.0)], &[0.0, 4.0]).unwrap();
    p.get_value(&t(1.0)).unwrap();
    assert_eq!(recording.last_call().orders, None);
    assert_eq!(recording.last_call().stride, 1);
}

#[test]
fn derivative_counts_are_validated() {
    let mut p = SampledProperty::<SceneTime, _>::with_derivatives(ScalarCodec, 2).unwrap();
    assert_eq!(
        p.add_sample(t(0.0), &1.0),
        Err(SampledError::DerivativeCount {
            expected: 2,
            actual: 0
        })
    );
    assert_eq!(
        p.add_sample_with_derivatives(t(0.0), &1.0, &[0.5]),
        Err(SampledError::DerivativeCount {
            expected: 2,
            actual: 1
        })
    );
    assert!(p.is_constant());

    p.add_sample_with_derivatives(t(0.0), &1.0, &[0.5, 0.25])
        .unwrap();
    assert_eq!(p.values(), &[1.0, 0.5, 0.25]);

    let mismatch = p.add_samples_with_derivatives(&[t(1.0)], &[2.0], &[]);
    assert_eq!(
        mismatch,
        Err(SampledError::LengthMismatch {
            times: 1,
            values: 0
        })
    );
}
