//! Quaternion codec (x, y, z, w).
//!
//! Quaternions are stored as four components but interpolated as rotation vectors
//! (axis * angle) relative to the last sample of the window, which keeps the
//! interpolated rotation on the shortest arc. The interpolated rotation vector is
//! turned back into a quaternion and re-applied to that last sample.

use super::ValueCodec;

const IDENTITY_EPSILON: f64 = 1e-6;

#[inline]
fn conjugate(q: [f64; 4]) -> [f64; 4] {
    [-q[0], -q[1], -q[2], q[3]]
}

/// Hamilton product `a * b`.
#[inline]
pub fn multiply(a: [f64; 4], b: [f64; 4]) -> [f64; 4] {
    let [ax, ay, az, aw] = a;
    let [bx, by, bz, bw] = b;
    [
        aw * bx + ax * bw + ay * bz - az * by,
        aw * by - ax * bz + ay * bw + az * bx,
        aw * bz + ax * by - ay * bx + az * bw,
        aw * bw - ax * bx - ay * by - az * bz,
    ]
}

/// Unit quaternion rotating by `angle` radians about `axis` (normalized here).
pub fn from_axis_angle(axis: [f64; 3], angle: f64) -> [f64; 4] {
    let len = (axis[0] * axis[0] + axis[1] * axis[1] + axis[2] * axis[2]).sqrt();
    if len == 0.0 {
        return [0.0, 0.0, 0.0, 1.0];
    }
    let half = angle * 0.5;
    let s = half.sin() / len;
    [axis[0] * s, axis[1] * s, axis[2] * s, half.cos()]
}

/// Rotation vector (axis scaled by angle) of a unit quaternion with `w >= 0`.
fn rotation_vector(q: [f64; 4]) -> [f64; 3] {
    let w = q[3].clamp(-1.0, 1.0);
    if (w - 1.0).abs() < IDENTITY_EPSILON {
        return [0.0, 0.0, 0.0];
    }
    let angle = 2.0 * w.acos();
    let scale = angle / (1.0 - w * w).sqrt();
    [q[0] * scale, q[1] * scale, q[2] * scale]
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuatCodec;

impl QuatCodec {
    #[inline]
    fn read(values: &[f64], index: usize) -> [f64; 4] {
        let o = index * 4;
        [values[o], values[o + 1], values[o + 2], values[o + 3]]
    }
}

impl ValueCodec for QuatCodec {
    type Value = [f64; 4];

    const CUSTOM_INTERPOLATION: bool = true;

    fn type_name(&self) -> &'static str {
        "quat"
    }

    #[inline]
    fn packed_length(&self) -> usize {
        4
    }

    #[inline]
    fn packed_interpolation_length(&self) -> usize {
        3
    }

    #[inline]
    fn pack(&self, value: &[f64; 4], dest: &mut [f64], offset: usize) {
        dest[offset..offset + 4].copy_from_slice(value);
    }

    #[inline]
    fn unpack(&self, src: &[f64], offset: usize) -> [f64; 4] {
        [
            src[offset],
            src[offset + 1],
            src[offset + 2],
            src[offset + 3],
        ]
    }

    fn convert_for_interpolation(
        &self,
        values: &[f64],
        first: usize,
        last: usize,
        out: &mut Vec<f64>,
    ) {
        let reference = conjugate(Self::read(values, last));
        for index in first..=last {
            let mut relative = multiply(Self::read(values, index), reference);
            if relative[3] < 0.0 {
                relative = [-relative[0], -relative[1], -relative[2], -relative[3]];
            }
            out.extend_from_slice(&rotation_vector(relative));
        }
    }

    fn unpack_interpolation_result(
        &self,
        result: &[f64],
        values: &[f64],
        _first: usize,
        last: usize,
    ) -> [f64; 4] {
        let rotation = [result[0], result[1], result[2]];
        let magnitude = rotation.iter().map(|c| c * c).sum::<f64>().sqrt();
        let delta = if magnitude == 0.0 {
            [0.0, 0.0, 0.0, 1.0]
        } else {
            from_axis_angle(rotation, magnitude)
        };
        multiply(delta, Self::read(values, last))
    }
}
