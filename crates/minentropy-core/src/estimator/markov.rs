//! Markov estimate (binary samples).
//!
//! Fits a first-order Markov chain to the bit sequence and bounds the
//! probability of the most likely 128-bit output among six extreme paths.

use log::debug;

use super::{EntropyEstimator, Estimate, require_binary, require_len};
use crate::bounds::clamp_entropy;
use crate::error::Result;
use crate::sample::Alphabet;

const PATH_LENGTH: i32 = 128;

/// Fitted chain: initial probabilities and transition matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkovModel {
    pub p0: f64,
    pub p1: f64,
    /// `transitions[a][b]` = P(next = b | current = a).
    pub transitions: [[f64; 2]; 2],
}

impl MarkovModel {
    pub fn fit(bits: &[u8]) -> Self {
        let n = bits.len();
        let ones = bits.iter().filter(|&&b| b == 1).count();
        let p1 = ones as f64 / n as f64;

        let mut pairs = [[0usize; 2]; 2];
        for w in bits.windows(2) {
            pairs[w[0] as usize][w[1] as usize] += 1;
        }

        let mut transitions = [[0.0; 2]; 2];
        for (from, row) in pairs.iter().enumerate() {
            let total = row[0] + row[1];
            if total > 0 {
                transitions[from][0] = row[0] as f64 / total as f64;
                transitions[from][1] = row[1] as f64 / total as f64;
            }
        }

        Self {
            p0: 1.0 - p1,
            p1,
            transitions,
        }
    }

    /// Probabilities of the six candidate most-likely 128-bit sequences:
    /// all zeros, 0101.., 0111.., 1000.., 1010.., all ones.
    pub fn path_probabilities(&self) -> [f64; 6] {
        let [[p00, p01], [p10, p11]] = self.transitions;
        let half = PATH_LENGTH / 2;
        [
            self.p0 * p00.powi(PATH_LENGTH - 1),
            self.p0 * p01.powi(half) * p10.powi(half - 1),
            self.p0 * p01 * p11.powi(PATH_LENGTH - 2),
            self.p1 * p10 * p00.powi(PATH_LENGTH - 2),
            self.p1 * p10.powi(half) * p01.powi(half - 1),
            self.p1 * p11.powi(PATH_LENGTH - 1),
        ]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkovEstimator;

impl EntropyEstimator for MarkovEstimator {
    fn name(&self) -> &'static str {
        "Markov Estimate"
    }

    fn estimate(&self, data: &[u8], alphabet: Alphabet) -> Result<Estimate> {
        require_binary(self.name(), data, alphabet)?;
        require_len(self.name(), data, 2)?;

        let model = MarkovModel::fit(data);
        let p_max = model
            .path_probabilities()
            .into_iter()
            .fold(0.0f64, f64::max);
        let entropy = -p_max.log2() / PATH_LENGTH as f64;
        debug!("Markov: P0={:.6}, P1={:.6}, p_max={p_max:e}", model.p0, model.p1);

        Ok(Estimate {
            name: self.name(),
            min_entropy: clamp_entropy(entropy, alphabet.max_entropy()),
            details: format!("P0={:.6}, P1={:.6}, p_max={p_max:e}", model.p0, model.p1),
        })
    }
}
