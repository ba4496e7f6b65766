//! Multi Markov-model-with-counting prediction estimate.
//!
//! Sixteen Markov chains of order 1 to 16 each predict the most common
//! successor of their trailing context. A context absent at order `d` is
//! absent at every higher order as well, so prediction stops at the first
//! miss.

use super::context::{ContextDictionary, ContextTable, DenseTable, EntryBudget, SparseTable};
use super::{Predictor, predict_entropy};
use crate::error::Result;
use crate::estimator::{EntropyEstimator, Estimate};
use crate::sample::{Alphabet, validate_symbols};

pub const MAX_ORDER: usize = 16;

/// Contexts each chain may create.
pub const MAX_ENTRIES_PER_ORDER: usize = 100_000;

#[derive(Debug, Clone)]
pub struct MultiMmc<T> {
    chains: ContextDictionary<T>,
    budgets: Vec<EntryBudget>,
}

impl<T: ContextTable> MultiMmc<T> {
    pub fn new() -> Self {
        Self {
            chains: ContextDictionary::new(MAX_ORDER),
            budgets: vec![EntryBudget::new(MAX_ENTRIES_PER_ORDER); MAX_ORDER],
        }
    }

    pub fn chains(&self) -> &ContextDictionary<T> {
        &self.chains
    }
}

impl<T: ContextTable> Default for MultiMmc<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ContextTable> Predictor for MultiMmc<T> {
    fn width(&self) -> usize {
        MAX_ORDER
    }

    fn first_prediction(&self) -> usize {
        2
    }

    fn predict(&mut self, history: &[u8], out: &mut [Option<u8>]) {
        let idx = history.len();
        for d in 1..=MAX_ORDER.min(idx) {
            match self.chains.get(&history[idx - d..]) {
                Some(tracker) => out[d - 1] = Some(tracker.mode()),
                None => break,
            }
        }
    }

    fn observe(&mut self, history: &[u8], symbol: u8) {
        let idx = history.len();
        for d in 1..=MAX_ORDER.min(idx) {
            self.chains
                .observe(&history[idx - d..], symbol, &mut self.budgets[d - 1]);
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MultiMmcEstimator;

impl EntropyEstimator for MultiMmcEstimator {
    fn name(&self) -> &'static str {
        "MultiMMC Prediction Estimate"
    }

    fn estimate(&self, data: &[u8], alphabet: Alphabet) -> Result<Estimate> {
        validate_symbols(data, alphabet)?;
        match alphabet {
            Alphabet::Binary => {
                let mut predictor = MultiMmc::<DenseTable>::new();
                predict_entropy(self.name(), &mut predictor, data, alphabet)
            }
            Alphabet::Byte => {
                let mut predictor = MultiMmc::<SparseTable>::new();
                predict_entropy(self.name(), &mut predictor, data, alphabet)
            }
        }
    }
}
