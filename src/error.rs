use thiserror::Error;

/// Errors surfaced by this crate.
///
/// Per the crate's contract, only construction-time (`Parameters::build`) and
/// decode-time (`Summary::decode`) operations can fail; `add_input`, `merge`
/// and `extract_output` over an already-valid `Summary` never return a
/// `Result`.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised by [`crate::params::Parameters::build`] when the requested
    /// `(num_quantiles, epsilon, max_num_elements)` fail to derive a valid
    /// `(buffer_size, num_buffers)` pair.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Raised by [`crate::codec::decode`] on a malformed byte stream: a
    /// negative buffer count, a truncated length-prefixed list, or an
    /// element-codec failure.
    #[error("codec error: {0}")]
    Codec(String),

    /// An underlying `Read`/`Write` failure while encoding or decoding.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
