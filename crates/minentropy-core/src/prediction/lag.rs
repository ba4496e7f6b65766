//! Lag prediction estimate: sub-predictor `d` guesses the symbol seen `d`
//! steps back, for `d` in `1..=128`.

use super::{Predictor, predict_entropy};
use crate::error::Result;
use crate::estimator::{EntropyEstimator, Estimate};
use crate::sample::{Alphabet, validate_symbols};

pub const MAX_LAG: usize = 128;

#[derive(Debug, Clone, Copy)]
pub struct Lag {
    lags: usize,
}

impl Lag {
    pub fn new(lags: usize) -> Self {
        Self { lags }
    }
}

impl Default for Lag {
    fn default() -> Self {
        Self::new(MAX_LAG)
    }
}

impl Predictor for Lag {
    fn width(&self) -> usize {
        self.lags
    }

    fn first_prediction(&self) -> usize {
        1
    }

    fn predict(&mut self, history: &[u8], out: &mut [Option<u8>]) {
        for (slot, &symbol) in out.iter_mut().zip(history.iter().rev()) {
            *slot = Some(symbol);
        }
    }

    // The history slice is the lag buffer.
    fn observe(&mut self, _history: &[u8], _symbol: u8) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LagEstimator;

impl EntropyEstimator for LagEstimator {
    fn name(&self) -> &'static str {
        "Lag Prediction Estimate"
    }

    fn estimate(&self, data: &[u8], alphabet: Alphabet) -> Result<Estimate> {
        validate_symbols(data, alphabet)?;
        predict_entropy(self.name(), &mut Lag::default(), data, alphabet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::testutil::random_bytes;

    #[test]
    fn test_predicts_lagged_symbols() {
        let mut lag = Lag::new(3);
        let mut out = [None; 3];
        lag.predict(&[4, 5], &mut out);
        assert_eq!(out, [Some(5), Some(4), None]);
    }

    #[test]
    fn test_periodic_sample_is_predictable() {
        let period = random_bytes(37, 61);
        let data: Vec<u8> = period.iter().cycle().take(50_000).copied().collect();
        let est = LagEstimator.estimate(&data, Alphabet::Byte).unwrap();
        assert!(est.min_entropy < 0.05, "got {}", est.min_entropy);
    }

    #[test]
    fn test_random_bytes_score_high() {
        let data = random_bytes(100_000, 62);
        let est = LagEstimator.estimate(&data, Alphabet::Byte).unwrap();
        assert!(est.min_entropy > 7.0, "got {}", est.min_entropy);
    }
}
