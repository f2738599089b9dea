//! Value codecs: flat `f64` encodings of sampled value types.
//!
//! A codec is chosen once when a property is built. Codecs whose interpolation
//! representation differs from their storage form set `CUSTOM_INTERPOLATION` and
//! override the two conversion hooks.

pub mod quat;

use std::fmt;

pub use quat::QuatCodec;

/// Converts a value type to and from a fixed-length numeric block.
pub trait ValueCodec: fmt::Debug + PartialEq {
    type Value;

    /// True when `convert_for_interpolation` / `unpack_interpolation_result` must be
    /// used instead of a contiguous block copy and `unpack`.
    const CUSTOM_INTERPOLATION: bool = false;

    /// Stable identity of the value type, compared by property equality.
    fn type_name(&self) -> &'static str;

    /// Number of `f64` elements in one packed value.
    fn packed_length(&self) -> usize;

    /// Number of elements one value contributes to an interpolation table.
    #[inline]
    fn packed_interpolation_length(&self) -> usize {
        self.packed_length()
    }

    /// Write `value` into `dest[offset..offset + packed_length]`.
    fn pack(&self, value: &Self::Value, dest: &mut [f64], offset: usize);

    /// Read a value from `src[offset..offset + packed_length]`.
    fn unpack(&self, src: &[f64], offset: usize) -> Self::Value;

    /// Append the interpolation form of samples `first..=last` of `values` to `out`.
    fn convert_for_interpolation(
        &self,
        values: &[f64],
        first: usize,
        last: usize,
        out: &mut Vec<f64>,
    ) {
        let len = self.packed_length();
        out.extend_from_slice(&values[first * len..(last + 1) * len]);
    }

    /// Decode an interpolated block; `values`, `first` and `last` describe the window
    /// the result was computed from.
    fn unpack_interpolation_result(
        &self,
        result: &[f64],
        _values: &[f64],
        _first: usize,
        _last: usize,
    ) -> Self::Value {
        self.unpack(result, 0)
    }
}

/// Scalar samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScalarCodec;

impl ValueCodec for ScalarCodec {
    type Value = f64;

    fn type_name(&self) -> &'static str {
        "scalar"
    }

    #[inline]
    fn packed_length(&self) -> usize {
        1
    }

    #[inline]
    fn pack(&self, value: &f64, dest: &mut [f64], offset: usize) {
        dest[offset] = *value;
    }

    #[inline]
    fn unpack(&self, src: &[f64], offset: usize) -> f64 {
        src[offset]
    }
}

/// Fixed-size numeric arrays (vectors, colors, packed tuples).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArrayCodec<const N: usize>;

/// 2D vectors.
pub type Vec2Codec = ArrayCodec<2>;
/// 3D vectors such as positions and velocities.
pub type Vec3Codec = ArrayCodec<3>;
/// RGBA colors and 4D vectors.
pub type Vec4Codec = ArrayCodec<4>;

impl<const N: usize> ValueCodec for ArrayCodec<N> {
    type Value = [f64; N];

    fn type_name(&self) -> &'static str {
        match N {
            2 => "vec2",
            3 => "vec3",
            4 => "vec4",
            _ => "array",
        }
    }

    #[inline]
    fn packed_length(&self) -> usize {
        N
    }

    #[inline]
    fn pack(&self, value: &[f64; N], dest: &mut [f64], offset: usize) {
        dest[offset..offset + N].copy_from_slice(value);
    }

    #[inline]
    fn unpack(&self, src: &[f64], offset: usize) -> [f64; N] {
        let mut out = [0.0; N];
        out.copy_from_slice(&src[offset..offset + N]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_codec_reads_at_offset() {
        let codec = Vec3Codec::default();
        let mut buf = vec![0.0; 7];
        codec.pack(&[1.0, 2.0, 3.0], &mut buf, 4);
        assert_eq!(buf, vec![0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0]);
        assert_eq!(codec.unpack(&buf, 4), [1.0, 2.0, 3.0]);
        assert_eq!(codec.type_name(), "vec3");
    }

    #[test]
    fn default_conversion_copies_window() {
        let codec = Vec2Codec::default();
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let mut out = Vec::new();
        codec.convert_for_interpolation(&values, 1, 2, &mut out);
        assert_eq!(out, vec![2.0, 3.0, 4.0, 5.0]);
    }
}
