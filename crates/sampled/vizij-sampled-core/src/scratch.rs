//! Reusable buffers owned by a single property.
//!
//! Buffers keep their capacity between calls; contents are only meaningful for the
//! duration of the call that filled them.

/// Interpolation tables and the cached window size.
#[derive(Debug)]
pub struct InterpolationScratch {
    /// Samples per window, valid while `dirty` is false.
    pub point_count: usize,
    pub dirty: bool,
    pub x_table: Vec<f64>,
    pub y_table: Vec<f64>,
    pub result: Vec<f64>,
}

impl InterpolationScratch {
    pub fn new() -> Self {
        Self {
            point_count: 0,
            dirty: true,
            x_table: Vec::new(),
            y_table: Vec::new(),
            result: Vec::new(),
        }
    }

    #[inline]
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Store a recomputed point count and size the tables for it.
    pub fn set_point_count(&mut self, point_count: usize, interpolation_block_len: usize) {
        self.point_count = point_count;
        self.dirty = false;
        self.x_table.reserve(point_count);
        self.y_table.reserve(point_count * interpolation_block_len);
    }

    /// Clear table contents before a query, keeping capacity.
    #[inline]
    pub fn begin_query(&mut self) {
        self.x_table.clear();
        self.y_table.clear();
    }
}

impl Default for InterpolationScratch {
    fn default() -> Self {
        Self::new()
    }
}

/// Staging buffers for one contiguous run during a merge.
#[derive(Debug)]
pub struct MergeStaging<T> {
    pub times: Vec<T>,
    pub values: Vec<f64>,
}

impl<T> MergeStaging<T> {
    pub fn new() -> Self {
        Self {
            times: Vec::new(),
            values: Vec::new(),
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.times.clear();
        self.values.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

impl<T> Default for MergeStaging<T> {
    fn default() -> Self {
        Self::new()
    }
}
