use crate::error::Error;

/// Immutable configuration for a [`crate::summary::Summary`]: the output
/// list size, the requested error bound, and the derived in-memory buffer
/// layout.
///
/// Build one with [`Parameters::new`], optionally tune it with
/// [`ParametersBuilder::epsilon`] / [`ParametersBuilder::max_num_elements`],
/// then call [`ParametersBuilder::build`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    num_quantiles: u32,
    epsilon: f64,
    max_num_elements: u64,
    buffer_size: u64,
    num_buffers: u32,
}

impl Parameters {
    /// Start building parameters for an output list of `num_quantiles`
    /// values (including both endpoints).
    pub fn new(num_quantiles: u32) -> ParametersBuilder {
        ParametersBuilder {
            num_quantiles,
            epsilon: None,
            max_num_elements: None,
        }
    }

    pub fn num_quantiles(&self) -> u32 {
        self.num_quantiles
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn max_num_elements(&self) -> u64 {
        self.max_num_elements
    }

    pub fn buffer_size(&self) -> u64 {
        self.buffer_size
    }

    pub fn num_buffers(&self) -> u32 {
        self.num_buffers
    }
}

/// Builder for [`Parameters`], mirroring the default-then-override shape of
/// the source combiner's constructors (`withMaxInputSize` etc.), but keeping
/// `epsilon` and `max_num_elements` as independent knobs.
pub struct ParametersBuilder {
    num_quantiles: u32,
    epsilon: Option<f64>,
    max_num_elements: Option<u64>,
}

impl ParametersBuilder {
    /// Override the default error bound (`1 / num_quantiles`).
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = Some(epsilon);
        self
    }

    /// Override the default maximum input size (`10^9`).
    pub fn max_num_elements(mut self, max_num_elements: u64) -> Self {
        self.max_num_elements = Some(max_num_elements);
        self
    }

    /// Validate and derive `(buffer_size, num_buffers)`.
    pub fn build(self) -> Result<Parameters, Error> {
        if self.num_quantiles < 2 {
            return Err(Error::InvalidParameters(format!(
                "num_quantiles must be >= 2, got {}",
                self.num_quantiles
            )));
        }

        let epsilon = self.epsilon.unwrap_or(1.0 / self.num_quantiles as f64);
        let max_num_elements = self.max_num_elements.unwrap_or(1_000_000_000);

        if !(epsilon > 0.0) {
            return Err(Error::InvalidParameters(format!(
                "epsilon must be > 0, got {}",
                epsilon
            )));
        }
        if max_num_elements < 1 {
            return Err(Error::InvalidParameters(
                "max_num_elements must be >= 1".to_string(),
            ));
        }

        let (num_buffers, buffer_size) = derive_buffer_layout(epsilon, max_num_elements);

        if buffer_size < 2 {
            return Err(Error::InvalidParameters(format!(
                "derived buffer_size must be >= 2, got {}",
                buffer_size
            )));
        }
        if num_buffers < 2 {
            return Err(Error::InvalidParameters(format!(
                "derived num_buffers must be >= 2, got {}",
                num_buffers
            )));
        }

        tracing::debug!(
            epsilon,
            max_num_elements,
            buffer_size,
            num_buffers,
            "derived quantile summary parameters"
        );

        Ok(Parameters {
            num_quantiles: self.num_quantiles,
            epsilon,
            max_num_elements,
            buffer_size,
            num_buffers,
        })
    }
}

/// Derive `(num_buffers, buffer_size)` from `(epsilon, max_num_elements)`.
///
/// The `while ... then decrement once` shape below is not a simplification
/// of "smallest b such that (b-2)*2^(b-2) >= epsilon*max_num_elements" — it
/// deliberately lands one below that, reproducing an off-by-one present in
/// the algorithm this crate implements. A `num_buffers < 2` guard is applied
/// afterwards since the unguarded arithmetic can otherwise reach `1` when
/// `epsilon * max_num_elements` rounds down to zero.
fn derive_buffer_layout(epsilon: f64, max_num_elements: u64) -> (u32, u64) {
    let target = epsilon * max_num_elements as f64;

    let mut b: u32 = 2;
    while (b as f64 - 2.0) * 2f64.powi(b as i32 - 2) < target {
        b += 1;
    }
    b -= 1;
    let b = b.max(2);

    let k = ((max_num_elements as f64 / 2f64.powi(b as i32 - 1)).ceil() as u64).max(2);

    (b, k)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults() {
        let params = Parameters::new(5).build().unwrap();
        assert_eq!(params.num_quantiles(), 5);
        assert_eq!(params.epsilon(), 0.2);
        assert_eq!(params.max_num_elements(), 1_000_000_000);
        assert!(params.buffer_size() >= 2);
        assert!(params.num_buffers() >= 2);
    }

    #[test]
    fn explicit_overrides() {
        let params = Parameters::new(101)
            .epsilon(0.01)
            .max_num_elements(1_000_000)
            .build()
            .unwrap();
        assert_eq!(params.epsilon(), 0.01);
        assert_eq!(params.max_num_elements(), 1_000_000);
    }

    #[test]
    fn rejects_too_few_quantiles() {
        assert!(Parameters::new(1).build().is_err());
    }

    #[test]
    fn rejects_non_positive_epsilon() {
        assert!(Parameters::new(5).epsilon(0.0).build().is_err());
        assert!(Parameters::new(5).epsilon(-0.1).build().is_err());
    }

    #[test]
    fn rejects_zero_max_num_elements() {
        assert!(Parameters::new(5).max_num_elements(0).build().is_err());
    }

    #[test]
    fn small_inputs_never_derive_below_the_floor() {
        // epsilon * max_num_elements close to zero exercises the b=max(b,2)
        // and k=max(k,2) guards documented on derive_buffer_layout.
        let params = Parameters::new(2)
            .epsilon(1e-12)
            .max_num_elements(1)
            .build()
            .unwrap();
        assert!(params.num_buffers() >= 2);
        assert!(params.buffer_size() >= 2);
    }
}
