use crate::buffer::Buffer;
use crate::interpolate::interpolate;

/// Rounding-bias jitter alternated across even-weight collapses.
///
/// A fixed floor or ceil on every even-weight collapse would introduce a
/// systematic rank bias in one direction; alternating between offset `0` and
/// offset `2` cancels it out over many collapses. Starts at `0` so that the
/// *first* even-weight collapse flips it to `2`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Jitter(u64);

impl Jitter {
    pub fn new() -> Self {
        Jitter(0)
    }

    /// Compute `offset(new_weight)` (see the module-level algorithm), mutating
    /// the alternation state on even weights.
    fn offset_for(&mut self, new_weight: u64) -> u64 {
        if new_weight % 2 == 1 {
            (new_weight + 1) / 2
        } else {
            self.0 = 2 - self.0;
            (new_weight + self.0) / 2
        }
    }
}

/// Collapse equal-level buffer groups until `buffers.len() <= num_buffers`.
///
/// `buffers` must be sorted ascending by `level` on entry, and is kept sorted
/// ascending by `level` on return.
pub fn collapse_if_needed<T: Ord + Clone>(
    buffers: &mut Vec<Buffer<T>>,
    buffer_size: usize,
    num_buffers: usize,
    jitter: &mut Jitter,
) {
    while buffers.len() > num_buffers {
        collapse_once(buffers, buffer_size, jitter);
    }
}

fn collapse_once<T: Ord + Clone>(buffers: &mut Vec<Buffer<T>>, buffer_size: usize, jitter: &mut Jitter) {
    debug_assert!(buffers.len() >= 2);

    // `buffers` is sorted ascending by level; the group is b1, b2 and every
    // following buffer sharing b2's level.
    let b1 = buffers.remove(0);
    let b2 = buffers.remove(0);
    let min_level = b2.level;
    let mut group = vec![b1, b2];
    while buffers.first().map(|b| b.level) == Some(min_level) {
        group.push(buffers.remove(0));
    }

    let new_level = group.iter().map(|b| b.level + 1).max().expect("group is non-empty");
    let new_weight: u64 = group.iter().map(|b| b.weight).sum();
    let offset = jitter.offset_for(new_weight);

    let elements = interpolate(&group, buffer_size, new_weight as f64, offset as f64);
    debug_assert_eq!(elements.len(), buffer_size);

    tracing::trace!(
        group_size = group.len(),
        input_levels = ?group.iter().map(|b| b.level).collect::<Vec<_>>(),
        new_level,
        new_weight,
        "collapsed buffer group"
    );

    let insert_at = buffers.iter().position(|b| b.level >= new_level).unwrap_or(buffers.len());
    buffers.insert(insert_at, Buffer::new(new_level, new_weight, elements));
}
