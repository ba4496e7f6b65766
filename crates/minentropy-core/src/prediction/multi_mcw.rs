//! Multi most-common-in-window prediction estimate.

use std::collections::VecDeque;

use super::{Predictor, predict_entropy};
use crate::error::Result;
use crate::estimator::{EntropyEstimator, Estimate};
use crate::sample::{Alphabet, validate_symbols};

pub const WINDOW_SIZES: [usize; 4] = [63, 255, 1023, 4095];

/// Most common symbol among the last `size` observations. Ties go to the
/// symbol seen most recently.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    size: usize,
    window: VecDeque<u8>,
    counts: Vec<usize>,
    mode: u8,
    mode_count: usize,
}

impl SlidingWindow {
    pub fn new(size: usize, alphabet_size: usize) -> Self {
        Self {
            size,
            window: VecDeque::with_capacity(size + 1),
            counts: vec![0; alphabet_size],
            mode: 0,
            mode_count: 0,
        }
    }

    /// `None` until the window is full.
    pub fn mode(&self) -> Option<u8> {
        (self.window.len() == self.size).then_some(self.mode)
    }

    pub fn push(&mut self, symbol: u8) {
        self.window.push_back(symbol);
        self.counts[symbol as usize] += 1;

        if self.window.len() > self.size {
            if let Some(head) = self.window.pop_front() {
                self.counts[head as usize] -= 1;
                if head == self.mode {
                    self.rescan();
                }
            }
        }

        if self.counts[symbol as usize] >= self.mode_count {
            self.mode = symbol;
            self.mode_count = self.counts[symbol as usize];
        }
    }

    fn rescan(&mut self) {
        self.mode_count = self.counts.iter().copied().max().unwrap_or(0);
        if let Some(&s) = self
            .window
            .iter()
            .rev()
            .find(|&&s| self.counts[s as usize] == self.mode_count)
        {
            self.mode = s;
        }
    }
}

/// Four sliding windows of increasing size competing on one scoreboard.
#[derive(Debug, Clone)]
pub struct MultiMcw {
    windows: Vec<SlidingWindow>,
}

impl MultiMcw {
    pub fn new(alphabet_size: usize) -> Self {
        Self {
            windows: WINDOW_SIZES
                .iter()
                .map(|&w| SlidingWindow::new(w, alphabet_size))
                .collect(),
        }
    }
}

impl Predictor for MultiMcw {
    fn width(&self) -> usize {
        self.windows.len()
    }

    fn first_prediction(&self) -> usize {
        WINDOW_SIZES[0]
    }

    fn predict(&mut self, _history: &[u8], out: &mut [Option<u8>]) {
        for (slot, window) in out.iter_mut().zip(&self.windows) {
            *slot = window.mode();
        }
    }

    fn observe(&mut self, _history: &[u8], symbol: u8) {
        for window in &mut self.windows {
            window.push(symbol);
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MultiMcwEstimator;

impl EntropyEstimator for MultiMcwEstimator {
    fn name(&self) -> &'static str {
        "MultiMCW Prediction Estimate"
    }

    fn estimate(&self, data: &[u8], alphabet: Alphabet) -> Result<Estimate> {
        validate_symbols(data, alphabet)?;
        let mut predictor = MultiMcw::new(alphabet.size());
        predict_entropy(self.name(), &mut predictor, data, alphabet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::testutil::{random_bits, random_bytes};

    fn naive_mode(window: &[u8]) -> u8 {
        let mut counts = [0usize; 256];
        for &s in window {
            counts[s as usize] += 1;
        }
        let max = counts.iter().copied().max().unwrap_or(0);
        *window
            .iter()
            .rev()
            .find(|&&s| counts[s as usize] == max)
            .unwrap()
    }

    #[test]
    fn test_window_matches_naive_mode() {
        let data: Vec<u8> = random_bytes(2_000, 51).into_iter().map(|b| b % 5).collect();
        let mut window = SlidingWindow::new(17, 256);
        for (i, &s) in data.iter().enumerate() {
            window.push(s);
            if i + 1 >= 17 {
                assert_eq!(window.mode(), Some(naive_mode(&data[i + 1 - 17..=i])), "at {i}");
            } else {
                assert_eq!(window.mode(), None);
            }
        }
    }

    #[test]
    fn test_recent_symbol_wins_ties() {
        let mut window = SlidingWindow::new(4, 256);
        for s in [1, 2, 2, 1] {
            window.push(s);
        }
        assert_eq!(window.mode(), Some(1));
    }

    #[test]
    fn test_constant_sample_has_no_entropy() {
        let est = MultiMcwEstimator.estimate(&[9u8; 10_000], Alphabet::Byte).unwrap();
        assert_eq!(est.min_entropy, 0.0);
    }

    #[test]
    fn test_random_bytes_near_eight_bits() {
        let data = random_bytes(100_000, 52);
        let est = MultiMcwEstimator.estimate(&data, Alphabet::Byte).unwrap();
        assert!(est.min_entropy > 7.0, "got {}", est.min_entropy);
    }

    #[test]
    fn test_random_bits_near_one_bit() {
        let data = random_bits(100_000, 53);
        let est = MultiMcwEstimator.estimate(&data, Alphabet::Binary).unwrap();
        assert!(est.min_entropy > 0.9, "got {}", est.min_entropy);
    }

    #[test]
    fn test_periodic_runs_are_predictable() {
        // Runs of 500 identical symbols: every window follows the run.
        let data: Vec<u8> = (0..20_000).map(|i| ((i / 500) % 2) as u8).collect();
        let est = MultiMcwEstimator.estimate(&data, Alphabet::Binary).unwrap();
        assert!(est.min_entropy < 0.2, "got {}", est.min_entropy);
    }

    #[test]
    fn test_too_short() {
        assert!(MultiMcwEstimator.estimate(&[0u8; 64], Alphabet::Byte).is_err());
    }
}
