//! A mergeable, bounded-memory approximate quantile summary implementing
//! Manku, Rajagopalan and Lindsay's "New Algorithm" for approximate medians
//! and quantiles in one pass with limited memory (MRL98).
//!
//! A [`Summary`] ingests elements one at a time via
//! [`Summary::add_input`], can be combined with independently built
//! summaries from other shards via [`Summary::merge`], and on demand
//! produces a fixed-size sorted list of approximate quantiles via
//! [`Summary::extract_output`]. It is serializable ([`Summary::encode`] /
//! [`Summary::decode`]) so it can be shipped between workers of a
//! distributed aggregation framework.
//!
//! This crate covers only the summary itself: the enclosing
//! dataflow/pipeline surface (sharding, windowing, scheduling) and the
//! element codec are the caller's responsibility (see [`codec`]).
//!
//! ```
//! use mrl_quantiles::{Parameters, Summary};
//!
//! let params = Parameters::new(5).build().unwrap();
//! let mut summary = Summary::new(params);
//! for v in 1..=5 {
//!     summary.add_input(v);
//! }
//! assert_eq!(summary.extract_output(), vec![1, 2, 3, 4, 5]);
//! ```

mod buffer;
mod codec;
mod collapse;
mod error;
mod interpolate;
mod params;
mod summary;
mod weighted;

pub use buffer::Buffer;
pub use codec::{BigEndianCodec, ElementCodec};
pub use error::Error;
pub use params::{Parameters, ParametersBuilder};
pub use summary::Summary;
pub use weighted::WeightedElement;

#[cfg(feature = "quantile-generator")]
pub mod quantile_generator;

/// Convert from quantile to the rank, where `0 <= quantile <= 1` and `1 <= rank <= num`.
///
/// # Example
/// For num = 4:
///
/// quantile   | rank
/// -----------|---
/// [0, 1/4]   | 1
/// (1/4, 2/4] | 2
/// (2/4, 3/4] | 3
/// (3/4, 1]   | 4
///
/// ```
/// use mrl_quantiles::quantile_to_rank;
/// // [0, 1/4] -> 1
/// assert_eq!(quantile_to_rank(0., 4), 1);
/// assert_eq!(quantile_to_rank(1./4. - 1e-10, 4), 1);
/// // (1/4, 2/4] | 2
/// assert_eq!(quantile_to_rank(1./4. + 1e-10, 4), 2);
/// assert_eq!(quantile_to_rank(2./4. - 1e-10, 4), 2);
/// // (2/4, 3/4] | 3
/// assert_eq!(quantile_to_rank(2./4. + 1e-10, 4), 3);
/// assert_eq!(quantile_to_rank(3./4. - 1e-10, 4), 3);
/// // (3/4, 1]   | 4
/// assert_eq!(quantile_to_rank(3./4. + 1e-10, 4), 4);
/// assert_eq!(quantile_to_rank(1., 4), 4);
/// ```
///
/// # Panics
/// This call will panic if `quantile` is out of range
pub fn quantile_to_rank(quantile: f64, num: u64) -> u64 {
    assert!(
        quantile >= 0. && quantile <= 1.,
        "Invalid quantile {}: out of range",
        quantile
    );
    ((quantile * num as f64).ceil() as u64).max(1)
}

/// Convert from rank to the quantile, where `0 <= quantile <= 1` and `1 <= rank <= num`.
///
/// # Example
/// For num = 4:
///
/// quantile   | rank
/// -----------|---
/// [0, 1/4]   | 1
/// (1/4, 2/4] | 2
/// (2/4, 3/4] | 3
/// (3/4, 1]   | 4
///
/// ```
/// use mrl_quantiles::rank_to_quantile;
/// assert_eq!(rank_to_quantile(1, 4), 0.);
/// assert_eq!(rank_to_quantile(2, 4), 2./4.);
/// assert_eq!(rank_to_quantile(3, 4), 3./4.);
/// assert_eq!(rank_to_quantile(4, 4), 1.);
/// ```
///
/// # Panics
/// This call will panic if `rank` is out of range
pub fn rank_to_quantile(rank: u64, num: u64) -> f64 {
    assert!(
        rank > 0 && rank <= num,
        "Invalid rank {}: out of range",
        rank
    );
    if rank == 1 {
        0.
    } else {
        rank as f64 / num as f64
    }
}
