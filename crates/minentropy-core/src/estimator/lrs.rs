//! Longest repeated substring estimate.
//!
//! Works on the lengths too long for the t-Tuple estimate: from the first
//! length `u` whose most common tuple occurs fewer than 35 times up to the
//! longest repeat `v`, it counts colliding pairs of equal `W`-tuples.

use log::debug;

use super::tuple::{TUPLE_THRESHOLD, max_tuple_counts};
use super::{EntropyEstimator, Estimate, require_len};
use crate::algorithm::{LcpArray, SuffixArray};
use crate::bounds::{entropy_from_probability, upper_bound_probability};
use crate::error::Result;
use crate::sample::{Alphabet, validate_symbols};

fn pairs(k: u64) -> u64 {
    k * k.saturating_sub(1) / 2
}

/// `S[W]`: number of pairs of positions whose `W`-tuples are equal, for
/// `W` in `u..=max`. Entries below `u` stay zero.
pub fn collision_pair_counts(lcp: &LcpArray, u: usize) -> Vec<u64> {
    let mut s = vec![0u64; lcp.max() + 1];
    lcp.for_each_interval(|floor, depth, count| {
        let from = floor.max(u.saturating_sub(1)) + 1;
        for w in from..=depth {
            s[w] += pairs(count as u64);
        }
    });
    s
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LrsEstimator;

impl LrsEstimator {
    fn from_lcp(&self, data: &[u8], alphabet: Alphabet, lcp: &LcpArray) -> Result<Estimate> {
        let n = data.len();
        let q = max_tuple_counts(lcp);
        let u = (1..q.len())
            .find(|&i| q[i] < TUPLE_THRESHOLD)
            .unwrap_or(q.len());
        let v = lcp.max();

        if u > v {
            debug!("LRS: u={u} > v={v}, no lengths to test");
            return Ok(Estimate {
                name: self.name(),
                min_entropy: alphabet.max_entropy(),
                details: format!("u={u}, v={v}: no repeated substring below threshold"),
            });
        }

        let s = collision_pair_counts(lcp, u);
        let mut p_max = 0.0f64;
        for w in u..=v {
            let total = pairs((n - w + 1) as u64) as f64;
            let p = (s[w] as f64 / total).powf(1.0 / w as f64);
            p_max = p_max.max(p);
        }
        let p_u = upper_bound_probability(p_max, n);
        debug!("LRS: u={u}, v={v}, p_max={p_max:.6}, p_u={p_u:.6}");

        Ok(Estimate {
            name: self.name(),
            min_entropy: entropy_from_probability(p_u, alphabet.max_entropy()),
            details: format!("u={u}, v={v}, p_max={p_max:.6}, p_u={p_u:.6}"),
        })
    }
}

impl EntropyEstimator for LrsEstimator {
    fn name(&self) -> &'static str {
        "LRS Estimate"
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
