//! Prediction estimates.
//!
//! A family of competing sub-predictors walks the sample once. At every step
//! each sub-predictor guesses the next symbol, the current winner's guess (or
//! the family's own [`Predictor::select`] rule) is scored against the real
//! symbol, and every sub-predictor then observes that symbol. The hit rate
//! and the longest run of hits are turned into two probability bounds; the
//! largest of those and `1/k` gives the min-entropy.
//!
//! ```text
//!   history ──► predict ──► select ──► RunStatistics ──► global / local bound
//!      ▲                      │
//!      └──── observe ◄────────┴──► Scoreboard
//! ```

pub mod context;
pub mod lag;
pub mod lz78y;
pub mod mcv_tracker;
pub mod multi_mcw;
pub mod multi_mmc;

pub use context::{ContextDictionary, ContextTable, DenseTable, EntryBudget, SparseTable};
pub use lag::LagEstimator;
pub use lz78y::Lz78yEstimator;
pub use mcv_tracker::McvTracker;
pub use multi_mcw::MultiMcwEstimator;
pub use multi_mmc::MultiMmcEstimator;

use log::{debug, warn};
use serde::Serialize;

use crate::bounds::{entropy_from_probability, upper_bound_probability};
use crate::error::{Error, Result};
use crate::estimator::Estimate;
use crate::root_finder::find_root;
use crate::sample::Alphabet;

/// A set of competing sub-predictors driven by [`run_predictions`].
pub trait Predictor {
    /// Number of sub-predictors.
    fn width(&self) -> usize;

    /// Index of the first symbol that is predicted and scored.
    fn first_prediction(&self) -> usize;

    /// Fill `out[j]` with sub-predictor `j`'s guess for `history.len()`.
    fn predict(&mut self, history: &[u8], out: &mut [Option<u8>]);

    /// The family's final guess. Defaults to the scoreboard winner.
    fn select(&self, predictions: &[Option<u8>], board: &Scoreboard) -> Option<u8> {
        predictions[board.winner()]
    }

    /// Learn that `symbol` followed `history`. Called for every index,
    /// including those before [`first_prediction`](Self::first_prediction).
    fn observe(&mut self, history: &[u8], symbol: u8);
}

/// Running correct-prediction count per sub-predictor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scoreboard {
    scores: Vec<usize>,
    winner: usize,
}

impl Scoreboard {
    pub fn new(width: usize) -> Self {
        Self {
            scores: vec![0; width],
            winner: 0,
        }
    }

    pub fn winner(&self) -> usize {
        self.winner
    }

    pub fn scores(&self) -> &[usize] {
        &self.scores
    }

    /// Credit every sub-predictor that guessed `symbol`. A sub-predictor
    /// takes the lead as soon as it matches the winner's score; indices are
    /// scanned in ascending order.
    pub fn update(&mut self, predictions: &[Option<u8>], symbol: u8) {
        for (j, prediction) in predictions.iter().enumerate() {
            if *prediction == Some(symbol) {
                self.scores[j] += 1;
                if self.scores[j] >= self.scores[self.winner] {
                    self.winner = j;
                }
            }
        }
    }
}

/// Accuracy statistics of one prediction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStatistics {
    pub predictions: usize,
    pub correct: usize,
    pub longest_run: usize,
    pub current_run: usize,
}

impl RunStatistics {
    pub fn record(&mut self, hit: bool) {
        self.predictions += 1;
        if hit {
            self.correct += 1;
            self.current_run += 1;
        } else {
            self.longest_run = self.longest_run.max(self.current_run);
            self.current_run = 0;
        }
    }

    /// Close the trailing run.
    pub fn finish(&mut self) {
        self.longest_run = self.longest_run.max(self.current_run);
        self.current_run = 0;
    }
}

/// Drive `predictor` over `data` and collect its statistics.
pub fn run_predictions<P: Predictor + ?Sized>(predictor: &mut P, data: &[u8]) -> RunStatistics {
    let mut board = Scoreboard::new(predictor.width());
    let mut stats = RunStatistics::default();
    let mut predictions = vec![None; predictor.width()];
    let start = predictor.first_prediction();

    for (idx, &symbol) in data.iter().enumerate() {
        let history = &data[..idx];
        if idx >= start {
            predictions.fill(None);
            predictor.predict(history, &mut predictions);
            let guess = predictor.select(&predictions, &board);
            stats.record(guess == Some(symbol));
            board.update(&predictions, symbol);
        }
        predictor.observe(history, symbol);
    }

    stats.finish();
    stats
}

/// Final bounds of a prediction pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionOutcome {
    pub predictions: usize,
    pub correct: usize,
    pub longest_run: usize,
    pub p_global: f64,
    pub p_local: f64,
    pub min_entropy: f64,
}

/// Upper bound on the per-prediction success probability from the hit rate.
pub fn global_bound(predictions: usize, correct: usize) -> f64 {
    let n = predictions as f64;
    if correct == 0 {
        1.0 - 0.01f64.powf(1.0 / n)
    } else {
        upper_bound_probability(correct as f64 / n, predictions)
    }
}

/// Probability that `n` trials with success probability `p` contain no run
/// of `r` successes, in log form, using ten fixed-point iterations for the
/// root `x` of the run-length generating function.
fn log_no_run_probability(p: f64, r: f64, n: f64) -> f64 {
    let q = 1.0 - p;
    let mut x = 1.0f64;
    for _ in 0..10 {
        x = 1.0 + q * p.powf(r) * x.powf(r + 1.0);
    }
    (1.0 - p * x).ln() - ((r + 1.0 - r * x) * q).ln() - (n + 1.0) * x.ln()
}

/// Largest success probability under which a longest run of `longest_run`
/// hits is still plausible at 99% confidence. Falls back to 1 when the
/// equation cannot be solved.
pub fn local_bound(predictions: usize, longest_run: usize) -> Result<f64> {
    let r = (longest_run + 1) as f64;
    let n = predictions as f64;
    match find_root(|p| log_no_run_probability(p, r, n), 0.99f64.ln(), 0.0, 1.0) {
        Ok(p) => Ok(p),
        Err(e) if e.is_recoverable() => {
            warn!("local prediction bound: {e}; assuming p = 1");
            Ok(1.0)
        }
        Err(e) => Err(e),
    }
}

/// Combine the uniform, global and local bounds into a min-entropy.
pub fn bound_statistics(stats: &RunStatistics, alphabet: Alphabet) -> Result<PredictionOutcome> {
    let p_global = global_bound(stats.predictions, stats.correct);
    let p_local = local_bound(stats.predictions, stats.longest_run)?;
    let p_max = (1.0 / alphabet.size() as f64).max(p_global).max(p_local);

    Ok(PredictionOutcome {
        predictions: stats.predictions,
        correct: stats.correct,
        longest_run: stats.longest_run,
        p_global,
        p_local,
        min_entropy: entropy_from_probability(p_max, alphabet.max_entropy()),
    })
}

/// Run a predictor family over `data` and report its estimate.
pub(crate) fn predict_entropy<P: Predictor + ?Sized>(
    name: &'static str,
    predictor: &mut P,
    data: &[u8],
    alphabet: Alphabet,
) -> Result<Estimate> {
    let needed = predictor.first_prediction() + 2;
    if data.len() < needed {
        return Err(Error::InsufficientData {
            estimator: name,
            needed,
            got: data.len(),
        });
    }

    let stats = run_predictions(predictor, data);
    let outcome = bound_statistics(&stats, alphabet)?;
    debug!(
        "{name}: N'={}, C={}, r={}, p_global={:.6}, p_local={:.6}",
        outcome.predictions, outcome.correct, outcome.longest_run, outcome.p_global, outcome.p_local
    );

    Ok(Estimate {
        name,
        min_entropy: outcome.min_entropy,
        details: format!(
            "N'={}, C={}, r={}, p_global={:.6}, p_local={:.6}",
            outcome.predictions,
            outcome.correct,
            outcome.longest_run,
            outcome.p_global,
            outcome.p_local
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Always guesses the previous symbol, with a silent second slot.
    struct Echo;

    impl Predictor for Echo {
        fn width(&self) -> usize {
            2
        }

        fn first_prediction(&self) -> usize {
            1
        }

        fn predict(&mut self, history: &[u8], out: &mut [Option<u8>]) {
            out[0] = history.last().copied();
        }

        fn observe(&mut self, _history: &[u8], _symbol: u8) {}
    }

    #[test]
    fn test_scoreboard_ties_move_the_winner() {
        let mut board = Scoreboard::new(3);
        board.update(&[Some(1), Some(0), Some(1)], 1);
        assert_eq!(board.scores(), &[1, 0, 1]);
        assert_eq!(board.winner(), 2);
        board.update(&[Some(1), None, Some(0)], 1);
        assert_eq!(board.winner(), 0);
    }

    #[test]
    fn test_run_statistics_track_longest_run() {
        let mut stats = RunStatistics::default();
        for hit in [true, true, false, true, true, true] {
            stats.record(hit);
        }
        assert_eq!(stats.longest_run, 2);
        stats.finish();
        assert_eq!(stats.longest_run, 3);
        assert_eq!(stats.correct, 5);
        assert_eq!(stats.predictions, 6);
    }

    #[test]
    fn test_driver_scores_from_first_prediction() {
        let data = [0u8, 0, 0, 1, 1, 0];
        let stats = run_predictions(&mut Echo, &data);
        assert_eq!(stats.predictions, 5);
        // hits at 1, 2, 4
        assert_eq!(stats.correct, 3);
        assert_eq!(stats.longest_run, 2);
    }

    #[test]
    fn test_global_bound_without_hits() {
        let p = global_bound(1000, 0);
        assert!((p - (1.0 - 0.01f64.powf(1.0 / 1000.0))).abs() < 1e-15);
        assert_eq!(global_bound(1000, 1000), 1.0);
    }

    #[test]
    fn test_local_bound_grows_with_run_length() {
        let short = local_bound(100_000, 2).unwrap();
        let long = local_bound(100_000, 20).unwrap();
        assert!(short < long, "{short} vs {long}");
        assert!(short > 0.0 && long < 1.0);
    }

    #[test]
    fn test_local_bound_solves_its_equation() {
        let p = local_bound(10_000, 5).unwrap();
        let residual = log_no_run_probability(p, 6.0, 10_000.0) - 0.99f64.ln();
        assert!(residual.abs() < 1e-9, "residual {residual}");
    }

    #[test]
    fn test_perfect_prediction_has_no_entropy() {
        let stats = RunStatistics {
            predictions: 1000,
            correct: 1000,
            longest_run: 1000,
            current_run: 0,
        };
        let outcome = bound_statistics(&stats, Alphabet::Byte).unwrap();
        assert_eq!(outcome.min_entropy, 0.0);
    }
}
