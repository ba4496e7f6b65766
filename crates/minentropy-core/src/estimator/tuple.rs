//! t-Tuple estimate.
//!
//! For every tuple length `i`, `Q[i]` is the number of occurrences of the
//! most frequent length-`i` substring. Lengths up to the last one whose most
//! common tuple still occurs at least [`TUPLE_THRESHOLD`] times contribute a
//! per-symbol probability `(Q[i] / (N - i))^(1/i)`.

use log::debug;

use super::{EntropyEstimator, Estimate, require_len};
use crate::algorithm::{LcpArray, SuffixArray};
use crate::bounds::{entropy_from_probability, upper_bound_probability};
use crate::error::Result;
use crate::sample::{Alphabet, validate_symbols};

/// Minimum occurrence count for a tuple length to be statistically usable.
pub const TUPLE_THRESHOLD: usize = 35;

/// `Q[i]` for `i` in `0..=max(lcp.max(), 1)`; a length never repeated has
/// count 1.
pub fn max_tuple_counts(lcp: &LcpArray) -> Vec<usize> {
    let mut q = vec![1usize; lcp.max().max(1) + 1];
    lcp.for_each_interval(|floor, depth, count| {
        // Q is non-increasing in the length.
        for t in (floor + 1..=depth).rev() {
            if q[t] >= count {
                break;
            }
            q[t] = count;
        }
    });
    q
}

/// Largest length whose most common tuple meets the threshold, or 1.
pub fn largest_frequent_length(q: &[usize]) -> usize {
    (1..q.len())
        .rev()
        .find(|&i| q[i] >= TUPLE_THRESHOLD)
        .unwrap_or(1)
}

/// `max over i in 1..=t of (Q[i] / (n - i))^(1/i)`.
pub fn max_symbol_probability(q: &[usize], t: usize, n: usize) -> f64 {
    (1..=t)
        .map(|i| (q[i] as f64 / (n - i) as f64).powf(1.0 / i as f64))
        .fold(0.0, f64::max)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TupleEstimator;

impl TupleEstimator {
    fn from_lcp(&self, data: &[u8], alphabet: Alphabet, lcp: &LcpArray) -> Result<Estimate> {
        let n = data.len();
        let q = max_tuple_counts(lcp);
        let t = largest_frequent_length(&q);

        let p_max = max_symbol_probability(&q, t, n);
        let p_u = upper_bound_probability(p_max, n);
        debug!("t-Tuple: t={t}, Q[1]={}, p_max={p_max:.6}, p_u={p_u:.6}", q[1]);

        Ok(Estimate {
            name: self.name(),
            min_entropy: entropy_from_probability(p_u, alphabet.max_entropy()),
            details: format!("t={t}, p_max={p_max:.6}, p_u={p_u:.6}"),
        })
    }
}

impl EntropyEstimator for TupleEstimator {
    fn name(&self) -> &'static str {
        "t-Tuple Estimate"
    }

    fn estimate(&self, data: &[u8], alphabet: Alphabet) -> Result<Estimate> {
        require_len(self.name(), data, 2)?;
        validate_symbols(data, alphabet)?;
        let lcp = LcpArray::new(data, &SuffixArray::new(data));
        self.from_lcp(data, alphabet, &lcp)
    }

    fn uses_lcp(&self) -> bool {
        true
    }

    fn estimate_with_lcp(
        &self,
        data: &[u8],
        alphabet: Alphabet,
        lcp: &LcpArray,
    ) -> Result<Estimate> {
        require_len(self.name(), data, 2)?;
        validate_symbols(data, alphabet)?;
        self.from_lcp(data, alphabet, lcp)
    }
}
