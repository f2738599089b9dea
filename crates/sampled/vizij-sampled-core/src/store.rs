//! Time-ordered sample storage with batched merge-insertion.
//!
//! Model:
//! - `times` is strictly ascending; `values` holds one `block_len` block per time.
//! - A merge walks the new samples once. Exact time matches overwrite in place.
//!   Otherwise the longest strictly increasing run that fits before the existing
//!   successor is staged and inserted with a single tail shift.
//! - A run ends at the first sample that is not strictly after the previous staged
//!   time or not strictly before the successor; that sample goes back through the
//!   binary search on the next pass (overwrite or a new run).

use std::cmp::Ordering;

use crate::error::SampledError;
use crate::scratch::MergeStaging;
use crate::time::{OrderedTime, PackedEntry};

/// Counts describing what a merge did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// New samples inserted.
    pub inserted: usize,
    /// Existing samples whose value block was replaced.
    pub overwritten: usize,
    /// Bulk insertions performed (one per contiguous run).
    pub runs: usize,
}

impl MergeReport {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inserted == 0 && self.overwritten == 0
    }
}

/// Insert `items` into `buffer` at `at`, shifting the tail right once.
///
/// The buffer grows by `items.len()`, elements from `at` onwards move back by that
/// many slots (overlap-safe, tail first), then the gap is filled.
pub fn insert_run<E: Copy>(buffer: &mut Vec<E>, at: usize, items: &[E]) {
    debug_assert!(at <= buffer.len(), "insertion point past end of buffer");
    if items.is_empty() {
        return;
    }
    let old_len = buffer.len();
    let count = items.len();
    buffer.extend_from_slice(items);
    buffer.copy_within(at..old_len, at + count);
    buffer[at..at + count].copy_from_slice(items);
}

/// Ascending time keys with a parallel flat value buffer.
#[derive(Debug)]
pub struct SampleStore<T> {
    times: Vec<T>,
    values: Vec<f64>,
    block_len: usize,
    staging: MergeStaging<T>,
}

impl<T: OrderedTime> SampleStore<T> {
    pub fn new(block_len: usize) -> Self {
        Self::with_capacity(block_len, 0)
    }

    pub fn with_capacity(block_len: usize, capacity: usize) -> Self {
        Self {
            times: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity * block_len),
            block_len,
            staging: MergeStaging::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Elements per sample block.
    #[inline]
    pub fn block_len(&self) -> usize {
        self.block_len
    }

    #[inline]
    pub fn times(&self) -> &[T] {
        &self.times
    }

    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value block of the sample at `index`.
    #[inline]
    pub fn block(&self, index: usize) -> &[f64] {
        &self.values[index * self.block_len..(index + 1) * self.block_len]
    }

    /// Binary search: `Ok(index)` on an exact match, `Err(insertion_point)` otherwise.
    #[inline]
    pub fn find(&self, time: &T) -> Result<usize, usize> {
        self.times.binary_search_by(|probe| probe.compare(time))
    }

    /// Merge an interleaved packed array of `(time token, value block)` tuples.
    ///
    /// Every token is resolved and every value slot checked before the store is
    /// touched, so a failed merge leaves the samples unchanged.
    pub fn merge(
        &mut self,
        epoch: Option<&T>,
        packed: &[PackedEntry<T>],
    ) -> Result<MergeReport, SampledError> {
        let stride = self.block_len + 1;
        if packed.len() % stride != 0 {
            return Err(SampledError::MalformedPackedArray {
                len: packed.len(),
                stride,
            });
        }

        let tuples = packed.len() / stride;
        let mut times = Vec::with_capacity(tuples);
        let mut values = Vec::with_capacity(tuples * self.block_len);
        for (tuple, chunk) in packed.chunks_exact(stride).enumerate() {
            let base = tuple * stride;
            times.push(chunk[0].as_time_token().resolve(epoch, base)?);
            for (offset, entry) in chunk[1..].iter().enumerate() {
                let value = entry.as_number().ok_or(SampledError::NonNumericValue {
                    index: base + 1 + offset,
                })?;
                values.push(value);
            }
        }

        self.merge_samples(&times, &values)
    }

    /// Merge resolved samples; `values` holds one block per entry of `times`.
    ///
    /// A value buffer of any other length is rejected before the store is touched.
    pub fn merge_samples(
        &mut self,
        times: &[T],
        values: &[f64],
    ) -> Result<MergeReport, SampledError> {
        let len = self.block_len;
        let expected = times.len() * len;
        if values.len() != expected {
            return Err(SampledError::ValueBufferLength {
                times: times.len(),
                expected,
                actual: values.len(),
            });
        }

        let mut report = MergeReport::default();
        let mut cursor = 0;
        while cursor < times.len() {
            match self.find(&times[cursor]) {
                Ok(index) => {
                    self.values[index * len..(index + 1) * len]
                        .copy_from_slice(&values[cursor * len..(cursor + 1) * len]);
                    report.overwritten += 1;
                    cursor += 1;
                }
                Err(at) => {
                    let successor = self.times.get(at).copied();
                    self.staging.clear();
                    while cursor < times.len() {
                        let current = times[cursor];
                        let after_previous = self
                            .staging
                            .times
                            .last()
                            .map_or(true, |prev| prev.compare(&current) == Ordering::Less);
                        let before_successor = successor
                            .map_or(true, |next| current.compare(&next) == Ordering::Less);
                        if !(after_previous && before_successor) {
                            break;
                        }
                        self.staging.times.push(current);
                        self.staging
                            .values
                            .extend_from_slice(&values[cursor * len..(cursor + 1) * len]);
                        cursor += 1;
                    }

                    if !self.staging.is_empty() {
                        insert_run(&mut self.times, at, &self.staging.times);
                        insert_run(&mut self.values, at * len, &self.staging.values);
                        report.inserted += self.staging.times.len();
                        report.runs += 1;
                    }
                }
            }
        }

        log::debug!(
            "merged {} samples: {} inserted in {} run(s), {} overwritten, {} stored",
            times.len(),
            report.inserted,
            report.runs,
            report.overwritten,
            self.times.len()
        );
        Ok(report)
    }
}
