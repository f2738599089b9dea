//! Built-in interpolation algorithms:
//! - linear (two-point)
//! - lagrange (polynomial through every window sample)
//! - hermite (polynomial matching values and derivatives)

use super::InterpolationAlgorithm;

/// Two-point linear interpolation. Extrapolates along the same line outside the pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearApproximation;

impl InterpolationAlgorithm for LinearApproximation {
    fn name(&self) -> &str {
        "linear"
    }

    #[inline]
    fn required_point_count(&self, _degree: usize, _derivative_order: usize) -> usize {
        2
    }

    fn interpolate_order_zero(
        &self,
        x: f64,
        x_table: &[f64],
        y_table: &[f64],
        stride: usize,
        result: &mut Vec<f64>,
    ) {
        result.clear();
        let (x0, x1) = (x_table[0], x_table[1]);
        let span = x1 - x0;
        for i in 0..stride {
            let y0 = y_table[i];
            let y1 = y_table[i + stride];
            result.push(((y1 - y0) * x + x1 * y0 - x0 * y1) / span);
        }
    }
}

/// Lagrange polynomial of degree `points - 1` through the window.
#[derive(Debug, Clone, Copy, Default)]
pub struct LagrangePolynomialApproximation;

impl InterpolationAlgorithm for LagrangePolynomialApproximation {
    fn name(&self) -> &str {
        "lagrange"
    }

    #[inline]
    fn required_point_count(&self, degree: usize, _derivative_order: usize) -> usize {
        (degree + 1).max(2)
    }

    fn interpolate_order_zero(
        &self,
        x: f64,
        x_table: &[f64],
        y_table: &[f64],
        stride: usize,
        result: &mut Vec<f64>,
    ) {
        result.clear();
        result.resize(stride, 0.0);
        for (i, xi) in x_table.iter().enumerate() {
            let mut coefficient = 1.0;
            for (j, xj) in x_table.iter().enumerate() {
                if j != i {
                    coefficient *= (x - xj) / (xi - xj);
                }
            }
            let block = &y_table[i * stride..(i + 1) * stride];
            for (out, y) in result.iter_mut().zip(block) {
                *out += coefficient * y;
            }
        }
    }
}

/// Hermite polynomial interpolation.
///
/// Each sample contributes `input_order + 1` conditions (value and derivatives), so
/// the polynomial degree is `points * (input_order + 1) - 1`. Built from Newton
/// divided differences over repeated nodes and evaluated with a Horner recurrence
/// that also yields the first `output_order` derivatives.
#[derive(Debug, Clone, Copy, Default)]
pub struct HermitePolynomialApproximation;

impl InterpolationAlgorithm for HermitePolynomialApproximation {
    fn name(&self) -> &str {
        "hermite"
    }

    #[inline]
    fn required_point_count(&self, degree: usize, derivative_order: usize) -> usize {
        ((degree + 1) / (derivative_order + 1)).max(2)
    }

    fn interpolate_order_zero(
        &self,
        x: f64,
        x_table: &[f64],
        y_table: &[f64],
        stride: usize,
        result: &mut Vec<f64>,
    ) {
        self.interpolate(x, x_table, y_table, stride, 0, 0, result);
    }

    #[inline]
    fn supports_derivatives(&self) -> bool {
        true
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
        let per_node = input_order + 1;
        let nodes = x_table.len() * per_node;
        let block = stride * per_node;

        result.clear();
        result.resize(stride * (output_order + 1), 0.0);

        let mut column = vec![0.0; nodes];
        let mut coefficients = vec![0.0; nodes];
        let mut evaluated = vec![0.0; output_order + 1];

        for component in 0..stride {
            for (k, slot) in column.iter_mut().enumerate() {
                *slot = y_table[(k / per_node) * block + component];
            }
            coefficients[0] = column[0];

            // Divided differences, one order per pass; repeated nodes take f^(j) / j!.
            let mut factorial = 1.0;
            for order in 1..nodes {
                factorial *= order as f64;
                for k in 0..nodes - order {
                    let lo = k / per_node;
                    let hi = (k + order) / per_node;
                    column[k] = if lo == hi {
                        y_table[lo * block + order * stride + component] / factorial
                    } else {
                        (column[k + 1] - column[k]) / (x_table[hi] - x_table[lo])
                    };
                }
                coefficients[order] = column[0];
            }

            evaluated.fill(0.0);
            for k in (0..nodes).rev() {
                let dx = x - x_table[k / per_node];
                for d in (1..=output_order).rev() {
                    evaluated[d] = evaluated[d] * dx + d as f64 * evaluated[d - 1];
                }
                evaluated[0] = evaluated[0] * dx + coefficients[k];
            }

            for (d, value) in evaluated.iter().enumerate() {
                result[d * stride + component] = *value;
            }
        }
    }
}
