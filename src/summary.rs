use crate::buffer::Buffer;
use crate::collapse::{collapse_if_needed, Jitter};
use crate::interpolate::interpolate;
use crate::params::Parameters;

/// A mergeable, bounded-memory approximate quantile summary.
///
/// Implements the Manku-Rajagopalan-Lindsay "New Algorithm": elements are
/// ingested one at a time via [`add_input`](Summary::add_input), independent
/// summaries built over shards of the input can be combined with
/// [`merge`](Summary::merge), and a fixed-size sorted list of approximate
/// quantiles is produced on demand by
/// [`extract_output`](Summary::extract_output).
///
/// `Summary` is a plain value: no operation here blocks, allocates unbounded
/// memory, or performs I/O. It is not internally synchronized; callers
/// sharding work across threads own one `Summary` per thread and combine
/// them with `merge`.
#[derive(Debug, Clone)]
pub struct Summary<T> {
    pub(crate) params: Parameters,
    pub(crate) min: Option<T>,
    pub(crate) max: Option<T>,
    /// Insertion-ordered tail not yet folded into a level-0 buffer. Always
    /// shorter than `buffer_size` at rest.
    pub(crate) unbuffered: Vec<T>,
    /// Kept sorted ascending by `level` at every quiescent point.
    pub(crate) buffers: Vec<Buffer<T>>,
    pub(crate) jitter: Jitter,
}

impl<T: Ord + Clone> Summary<T> {
    /// Create a new, empty summary under the given parameters.
    pub fn new(params: Parameters) -> Self {
        Summary {
            params,
            min: None,
            max: None,
            unbuffered: Vec::new(),
            buffers: Vec::new(),
            jitter: Jitter::new(),
        }
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.unbuffered.is_empty() && self.buffers.is_empty()
    }

    /// Number of buffers currently held. Always `<= params().num_buffers()`
    /// at every point between calls into the summary.
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Number of elements represented by the summary so far (input count,
    /// not the number of stored samples).
    pub fn len(&self) -> u64 {
        let buffered: u64 = self
            .buffers
            .iter()
            .map(|b| self.params.buffer_size() * b.weight)
            .sum();
        self.unbuffered.len() as u64 + buffered
    }

    /// Ingest a single element.
    pub fn add_input(&mut self, value: T) {
        match (&self.min, &self.max) {
            (None, None) => {
                self.min = Some(value.clone());
                self.max = Some(value.clone());
            }
            _ => {
                if Some(&value) < self.min.as_ref() {
                    self.min = Some(value.clone());
                }
                if Some(&value) > self.max.as_ref() {
                    self.max = Some(value.clone());
                }
            }
        }

        self.unbuffered.push(value);
        if self.unbuffered.len() as u64 == self.params.buffer_size() {
            let mut flushed = std::mem::take(&mut self.unbuffered);
            flushed.sort();
            self.insert_buffer(Buffer::level_zero(flushed));
            self.collapse_if_needed();
        }
    }

    /// Merge another summary into this one. A no-op if `other` is empty.
    ///
    /// `other`'s unbuffered tail is replayed through [`add_input`] *before*
    /// its buffers are absorbed, so extrema are updated consistently and the
    /// final collapse pass sees the whole, merged set of buffers.
    ///
    /// [`add_input`]: Summary::add_input
    pub fn merge(&mut self, other: Summary<T>) {
        if other.is_empty() {
            return;
        }

        if let Some(other_min) = &other.min {
            if self.min.is_none() || Some(other_min) < self.min.as_ref() {
                self.min = Some(other_min.clone());
            }
        }
        if let Some(other_max) = &other.max {
            if self.max.is_none() || Some(other_max) > self.max.as_ref() {
                self.max = Some(other_max.clone());
            }
        }

        for value in other.unbuffered {
            self.add_input(value);
        }

        for buffer in other.buffers {
            self.insert_buffer(buffer);
        }
        self.collapse_if_needed();
    }

    /// Produce the approximate quantile list: empty if the summary is
    /// empty, otherwise exactly `num_quantiles` values, sorted
    /// non-decreasing, with the exact minimum and maximum at the ends.
    pub fn extract_output(&self) -> Vec<T> {
        let (min, max) = match (&self.min, &self.max) {
            (Some(min), Some(max)) => (min, max),
            _ => return Vec::new(),
        };

        let buffered: u64 = self
            .buffers
            .iter()
            .map(|b| self.params.buffer_size() * b.weight)
            .sum();
        let total_count = self.unbuffered.len() as u64 + buffered;

        let remainder;
        let all: Vec<&Buffer<T>> = if self.unbuffered.is_empty() {
            self.buffers.iter().collect()
        } else {
            let mut sorted_tail = self.unbuffered.clone();
            sorted_tail.sort();
            remainder = Buffer::level_zero(sorted_tail);
            self.buffers.iter().chain(std::iter::once(&remainder)).collect()
        };

        let num_quantiles = self.params.num_quantiles() as usize;
        let count = num_quantiles - 2;
        let step = total_count as f64 / (num_quantiles - 1) as f64;
        let offset = (total_count - 1) as f64 / (num_quantiles - 1) as f64;

        let interior = interpolate(all, count, step, offset);

        let mut output = Vec::with_capacity(num_quantiles);
        output.push(min.clone());
        output.extend(interior);
        output.push(max.clone());
        output
    }

    /// Reconstruct a summary from its decoded parts (see
    /// [`crate::codec`]). Not part of the public API: callers only ever
    /// reach this through `Summary::decode`.
    pub(crate) fn from_decoded(
        params: Parameters,
        min: T,
        max: T,
        unbuffered: Vec<T>,
        buffers: Vec<Buffer<T>>,
    ) -> Self {
        Summary {
            params,
            min: Some(min),
            max: Some(max),
            unbuffered,
            buffers,
            jitter: Jitter::new(),
        }
    }

    fn insert_buffer(&mut self, buffer: Buffer<T>) {
        let pos = self
            .buffers
            .iter()
            .position(|b| b.level >= buffer.level)
            .unwrap_or(self.buffers.len());
        self.buffers.insert(pos, buffer);
    }

    fn collapse_if_needed(&mut self) {
        collapse_if_needed(
            &mut self.buffers,
            self.params.buffer_size() as usize,
            self.params.num_buffers() as usize,
            &mut self.jitter,
        );
    }

    #[cfg(test)]
    pub(crate) fn buffer_levels(&self) -> Vec<u32> {
        self.buffers.iter().map(|b| b.level).collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::params::Parameters;

    fn small_params(num_quantiles: u32, buffer_size: u64, num_buffers: u32) -> Parameters {
        // Pick (epsilon, max_num_elements) that derive exactly the requested
        // (buffer_size, num_buffers) so unit tests can drive collapses with
        // small, readable inputs. See `derive_buffer_layout` for the formula
        // this inverts.
        let max_num_elements = buffer_size * 2u64.pow(num_buffers - 1);
        let epsilon = ((num_buffers - 2) as f64 * 2f64.powi(num_buffers as i32 - 2) + 1.0)
            / max_num_elements as f64;
        Parameters::new(num_quantiles)
            .epsilon(epsilon)
            .max_num_elements(max_num_elements)
            .build()
            .unwrap()
    }

    #[test]
    fn empty_summary_extracts_empty() {
        let summary: Summary<i32> = Summary::new(Parameters::new(5).build().unwrap());
        assert!(summary.extract_output().is_empty());
    }

    #[test]
    fn small_input_returns_sorted_values_with_padded_endpoints() {
        // S1: numQuantiles = 5, input [1,2,3,4,5]
        let mut summary: Summary<i32> = Summary::new(Parameters::new(5).build().unwrap());
        for v in [1, 2, 3, 4, 5] {
            summary.add_input(v);
        }
        assert_eq!(summary.extract_output(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn single_element_repeats_endpoints() {
        // S2: numQuantiles = 3, input [7]
        let mut summary: Summary<i32> = Summary::new(Parameters::new(3).build().unwrap());
        summary.add_input(7);
        assert_eq!(summary.extract_output(), vec![7, 7, 7]);
    }

    #[test]
    fn flushing_keeps_buffer_budget() {
        let params = small_params(5, 4, 2);
        let mut summary: Summary<i32> = Summary::new(params);
        for v in 0..16 {
            summary.add_input(v);
            assert!(summary.buffer_levels().len() as u32 <= params.num_buffers());
        }
    }

    #[test]
    fn extrema_are_exact_under_collapse() {
        let params = small_params(5, 4, 2);
        let mut summary: Summary<i32> = Summary::new(params);
        let values: Vec<i32> = (0..97).rev().collect();
        for &v in &values {
            summary.add_input(v);
        }
        let out = summary.extract_output();
        assert_eq!(out.first(), Some(&0));
        assert_eq!(out.last(), Some(&96));
        assert_eq!(out.len(), 5);
        assert!(out.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn merge_of_empty_is_noop() {
        let params = Parameters::new(5).build().unwrap();
        let mut a: Summary<i32> = Summary::new(params);
        a.add_input(1);
        a.add_input(2);
        let before = a.extract_output();
        a.merge(Summary::new(params));
        assert_eq!(a.extract_output(), before);
    }

    #[test]
    fn merge_combines_extrema_and_count() {
        // S4 shape: two disjoint ranges merged
        let params = small_params(5, 4, 2);
        let mut a: Summary<i32> = Summary::new(params);
        let mut b: Summary<i32> = Summary::new(params);
        for v in 1..=50 {
            a.add_input(v);
        }
        for v in 51..=100 {
            b.add_input(v);
        }
        a.merge(b);
        let out = a.extract_output();
        assert_eq!(out.first(), Some(&1));
        assert_eq!(out.last(), Some(&100));
        assert_eq!(a.len(), 100);
    }
}
