//! LZ78Y prediction estimate.
//!
//! Sixteen dictionaries share one rolling 16-symbol window; dictionary `j`
//! is keyed by the last `j` symbols of that window. All dictionaries draw
//! new entries from a single budget. The family's guess is the prediction
//! backed by the highest count, preferring longer contexts on ties.

use super::context::{ContextDictionary, ContextTable, DenseTable, EntryBudget, SparseTable};
use super::{Predictor, Scoreboard, predict_entropy};
use crate::error::Result;
use crate::estimator::{EntropyEstimator, Estimate};
use crate::sample::{Alphabet, validate_symbols};

pub const WINDOW: usize = 16;

/// Contexts all sixteen dictionaries may create together.
pub const MAX_ENTRIES: usize = 65_536;

#[derive(Debug, Clone)]
pub struct Lz78y<T> {
    dictionary: ContextDictionary<T>,
    budget: EntryBudget,
    /// Count behind `predictions[j]` from the last `predict` call.
    counts: [u32; WINDOW],
}

impl<T: ContextTable> Lz78y<T> {
    pub fn new() -> Self {
        Self {
            dictionary: ContextDictionary::new(WINDOW),
            budget: EntryBudget::new(MAX_ENTRIES),
            counts: [0; WINDOW],
        }
    }

    pub fn dictionary(&self) -> &ContextDictionary<T> {
        &self.dictionary
    }

    pub fn budget(&self) -> EntryBudget {
        self.budget
    }
}

impl<T: ContextTable> Default for Lz78y<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ContextTable> Predictor for Lz78y<T> {
    fn width(&self) -> usize {
        WINDOW
    }

    fn first_prediction(&self) -> usize {
        WINDOW + 1
    }

    fn predict(&mut self, history: &[u8], out: &mut [Option<u8>]) {
        let idx = history.len();
        self.counts = [0; WINDOW];
        for j in 1..=WINDOW.min(idx) {
            if let Some(tracker) = self.dictionary.get(&history[idx - j..]) {
                out[j - 1] = Some(tracker.mode());
                self.counts[j - 1] = tracker.mode_count();
            }
        }
    }

    fn select(&self, predictions: &[Option<u8>], _board: &Scoreboard) -> Option<u8> {
        let mut best = None;
        let mut best_count = 0;
        for j in (0..WINDOW).rev() {
            if predictions[j].is_some() && self.counts[j] > best_count {
                best = predictions[j];
                best_count = self.counts[j];
            }
        }
        best
    }

    fn observe(&mut self, history: &[u8], symbol: u8) {
        let idx = history.len();
        if idx < WINDOW {
            return;
        }
        for j in (1..=WINDOW).rev() {
            self.dictionary
                .observe(&history[idx - j..], symbol, &mut self.budget);
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Lz78yEstimator;

impl EntropyEstimator for Lz78yEstimator {
    fn name(&self) -> &'static str {
        "LZ78Y Prediction Estimate"
    }

    fn estimate(&self, data: &[u8], alphabet: Alphabet) -> Result<Estimate> {
        validate_symbols(data, alphabet)?;
        match alphabet {
            Alphabet::Binary => {
                predict_entropy(self.name(), &mut Lz78y::<DenseTable>::new(), data, alphabet)
            }
            Alphabet::Byte => {
                predict_entropy(self.name(), &mut Lz78y::<SparseTable>::new(), data, alphabet)
            }
        }
    }
}
