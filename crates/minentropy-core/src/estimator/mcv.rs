//! Most common value estimate.

use log::debug;

use super::{EntropyEstimator, Estimate, require_len};
use crate::bounds::{entropy_from_probability, upper_bound_probability};
use crate::error::Result;
use crate::sample::{Alphabet, validate_symbols};

/// Bounds the probability of the single most frequent symbol.
#[derive(Debug, Clone, Copy, Default)]
pub struct McvEstimator;

impl EntropyEstimator for McvEstimator {
    fn name(&self) -> &'static str {
        "Most Common Value Estimate"
    }

    fn estimate(&self, data: &[u8], alphabet: Alphabet) -> Result<Estimate> {
        require_len(self.name(), data, 2)?;
        validate_symbols(data, alphabet)?;

        let mut counts = [0usize; 256];
        for &s in data {
            counts[s as usize] += 1;
        }
        let max_count = counts.iter().copied().max().unwrap_or(0);
        let n = data.len();
        let p_hat = max_count as f64 / n as f64;
        let p_u = upper_bound_probability(p_hat, n);
        debug!("MCV: max_count={max_count}, p_hat={p_hat:.6}, p_u={p_u:.6}");

        Ok(Estimate {
            name: self.name(),
            min_entropy: entropy_from_probability(p_u, alphabet.max_entropy()),
            details: format!("mode count={max_count}, p_hat={p_hat:.6}, p_u={p_u:.6}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::testutil::{random_bits, random_bytes};

    #[test]
    fn test_constant_sample_has_no_entropy() {
        let est = McvEstimator.estimate(&[3u8; 10_000], Alphabet::Byte).unwrap();
        assert_eq!(est.min_entropy, 0.0);
    }

    #[test]
    fn test_random_bytes_near_eight_bits() {
        let data = random_bytes(100_000, 1);
        let est = McvEstimator.estimate(&data, Alphabet::Byte).unwrap();
        assert!(est.min_entropy > 7.0, "got {}", est.min_entropy);
        assert!(est.min_entropy <= 8.0);
    }

    #[test]
    fn test_random_bits_near_one_bit() {
        let data = random_bits(100_000, 2);
        let est = McvEstimator.estimate(&data, Alphabet::Binary).unwrap();
        assert!(est.min_entropy > 0.95 && est.min_entropy <= 1.0);
    }

    #[test]
    fn test_short_input_is_rejected() {
        assert!(McvEstimator.estimate(&[1], Alphabet::Byte).is_err());
        assert!(McvEstimator.estimate(&[0, 1, 2], Alphabet::Binary).is_err());
    }
}
