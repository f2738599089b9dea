//! Interpolation window selection and algorithm dispatch.
//!
//! For a query time without an exact sample, pick `point_count` consecutive samples
//! centered on the query's insertion point. Near either end of the data the window
//! slides inward so it keeps its full width. Offsets are measured in seconds from the
//! window's last sample, both for the table and for the query.

use crate::codec::ValueCodec;
use crate::interp::InterpolationAlgorithm;
use crate::scratch::InterpolationScratch;
use crate::store::SampleStore;
use crate::time::OrderedTime;

/// Inclusive sample index range used for one interpolation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub first: usize,
    pub last: usize,
}

impl Window {
    /// Full-width window of `point_count` samples around `center`, kept inside
    /// `0..=last_index`. Requires `point_count <= last_index + 1`; a zero count is
    /// treated as one.
    pub fn centered(center: usize, point_count: usize, last_index: usize) -> Self {
        let degree = point_count.saturating_sub(1);
        let center = center.min(last_index);
        let mut first = center.saturating_sub(degree / 2 + 1).min(last_index);
        let mut last = first + degree;
        if last > last_index {
            last = last_index;
            first = last.saturating_sub(degree);
        }
        Self { first, last }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.last - self.first + 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.last < self.first
    }
}

/// Interpolation settings for one query.
#[derive(Clone, Copy)]
pub struct WindowRequest<'a> {
    pub algorithm: &'a dyn InterpolationAlgorithm,
    pub degree: usize,
    pub derivative_order: Option<usize>,
    /// Elements per sample in the interpolation tables.
    pub interpolation_block_len: usize,
}

/// Owns the interpolation scratch and turns windows into interpolated values.
#[derive(Debug, Default)]
pub struct WindowSelector {
    scratch: InterpolationScratch,
}

impl WindowSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force the point count to be recomputed on the next query.
    #[inline]
    pub fn invalidate(&mut self) {
        self.scratch.invalidate();
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.scratch.dirty
    }

    /// Samples per window, recomputed only after [`WindowSelector::invalidate`].
    pub fn point_count<T: OrderedTime>(
        &mut self,
        store: &SampleStore<T>,
        request: &WindowRequest<'_>,
    ) -> usize {
        if self.scratch.dirty {
            let required = request
                .algorithm
                .required_point_count(request.degree, request.derivative_order.unwrap_or(0));
            let point_count = required.min(store.len());
            log::trace!(
                "{} degree {} needs {} point(s), {} available",
                request.algorithm.name(),
                request.degree,
                required,
                store.len()
            );
            self.scratch
                .set_point_count(point_count, request.interpolation_block_len);
        }
        self.scratch.point_count
    }

    /// Interpolate at `query`, whose insertion point in the store is `center`.
    ///
    /// Returns `None` when fewer than two samples can take part.
    pub fn evaluate<T: OrderedTime, C: ValueCodec>(
        &mut self,
        store: &SampleStore<T>,
        codec: &C,
        request: &WindowRequest<'_>,
        query: &T,
        center: usize,
    ) -> Option<C::Value> {
        let point_count = self.point_count(store, request);
        if point_count < 2 {
            return None;
        }

        let window = Window::centered(center, point_count, store.len() - 1);
        log::trace!(
            "window {}..={} for query {:?}",
            window.first,
            window.last,
            query
        );

        let times = store.times();
        let values = store.values();
        let anchor = &times[window.last];

        let scratch = &mut self.scratch;
        scratch.begin_query();
        scratch.x_table.extend(
            times[window.first..=window.last]
                .iter()
                .map(|t| T::seconds_between(anchor, t)),
        );
        if C::CUSTOM_INTERPOLATION {
            codec.convert_for_interpolation(
                values,
                window.first,
                window.last,
                &mut scratch.y_table,
            );
        } else {
            let block = store.block_len();
            scratch
                .y_table
                .extend_from_slice(&values[window.first * block..(window.last + 1) * block]);
        }

        let x = T::seconds_between(anchor, query);
        match request.derivative_order {
            Some(order) if request.algorithm.supports_derivatives() => {
                let stride = request.interpolation_block_len / (order + 1);
                request.algorithm.interpolate(
                    x,
                    &scratch.x_table,
                    &scratch.y_table,
                    stride,
                    order,
                    order,
                    &mut scratch.result,
                );
            }
            _ => request.algorithm.interpolate_order_zero(
                x,
                &scratch.x_table,
                &scratch.y_table,
                request.interpolation_block_len,
                &mut scratch.result,
            ),
        }

        Some(if C::CUSTOM_INTERPOLATION {
            codec.unpack_interpolation_result(&scratch.result, values, window.first, window.last)
        } else {
            codec.unpack(&scratch.result, 0)
        })
    }

    /// Offsets of the most recent window, relative to its last sample.
    #[inline]
    pub fn x_table(&self) -> &[f64] {
        &self.scratch.x_table
    }

    /// Interpolation-form values of the most recent window.
    #[inline]
    pub fn y_table(&self) -> &[f64] {
        &self.scratch.y_table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ScalarCodec;
    use crate::interp::LinearApproximation;
    use crate::time::SceneTime;

    #[test]
    fn interior_window_is_centered() {
        // insertion point 5 with 4 points: samples 3..=6 surround the query
        assert_eq!(Window::centered(5, 4, 9), Window { first: 3, last: 6 });
        // two points bracket the query
        assert_eq!(Window::centered(5, 2, 9), Window { first: 4, last: 5 });
    }

    #[test]
    fn window_slides_inward_at_boundaries() {
        assert_eq!(Window::centered(0, 4, 9), Window { first: 0, last: 3 });
        assert_eq!(Window::centered(1, 4, 9), Window { first: 0, last: 3 });
        assert_eq!(Window::centered(10, 4, 9), Window { first: 6, last: 9 });
        assert_eq!(Window::centered(9, 3, 9), Window { first: 7, last: 9 });
    }

    #[test]
    fn zero_point_window_collapses_to_center() {
        assert_eq!(Window::centered(3, 0, 9), Window { first: 2, last: 2 });
    }

    #[test]
    fn tables_hold_offsets_from_window_end() {
        let mut store = SampleStore::new(1);
        let times: Vec<SceneTime> = [0.0, 10.0, 20.0, 40.0]
            .iter()
            .map(|s| SceneTime::from(*s))
            .collect();
        let values = [1.0, 2.0, 3.0, 5.0];
        store.merge_samples(&times, &values).unwrap();

        let request = WindowRequest {
            algorithm: &LinearApproximation,
            degree: 1,
            derivative_order: None,
            interpolation_block_len: 1,
        };
        let mut selector = WindowSelector::new();
        let query = SceneTime::from(30.0);
        let value = selector.evaluate(&store, &ScalarCodec, &request, &query, 3);

        assert_eq!(value, Some(4.0));
        assert_eq!(selector.point_count(&store, &request), 2);
        assert_eq!(selector.x_table(), &[-20.0, 0.0]);
        assert_eq!(selector.y_table(), &[3.0, 5.0]);
    }

    #[test]
    fn single_sample_yields_no_value() {
        let mut store = SampleStore::new(1);
        let times = [SceneTime::from(1.0)];
        store.merge_samples(&times, &[7.0]).unwrap();
        let request = WindowRequest {
            algorithm: &LinearApproximation,
            degree: 1,
            derivative_order: None,
            interpolation_block_len: 1,
        };
        let mut selector = WindowSelector::new();
        let query = SceneTime::from(2.0);
        assert_eq!(
            selector.evaluate(&store, &ScalarCodec, &request, &query, 1),
            None
        );
        assert!(selector.x_table().is_empty());
    }

    #[test]
    fn window_covers_all_samples_when_point_count_matches() {
        let w = Window::centered(2, 5, 4);
        assert_eq!(w, Window { first: 0, last: 4 });
        assert_eq!(w.len(), 5);
    }
}
