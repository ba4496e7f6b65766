//! Compression estimate (binary samples).
//!
//! A variant of Maurer's universal statistic: the sample is cut into 6-bit
//! blocks, the first 1000 prime a table of last-seen positions, and every
//! later block contributes `log2` of the distance to its previous
//! occurrence. The lower-bounded mean is inverted through the expected value
//! of that statistic for a source whose likeliest block has probability `p`.

use log::{debug, warn};

use super::{EntropyEstimator, Estimate, require_binary, require_len};
use crate::bounds::{clamp_entropy, lower_bound_mean};
use crate::error::Result;
use crate::root_finder::find_root;
use crate::sample::Alphabet;

pub const BLOCK_BITS: usize = 6;
pub const INIT_BLOCKS: usize = 1000;

/// Scales the sample standard deviation of the statistic, which is
/// overestimated by the dependence between successive distances.
const STD_DEV_CORRECTION: f64 = 0.5907;

/// Expected value of the compression statistic for per-block probability `z`.
struct ExpectedStatistic {
    /// `log2(t)` for `t` in `0..=blocks`; entry 0 unused.
    log2: Vec<f64>,
    blocks: usize,
    test_blocks: usize,
}

impl ExpectedStatistic {
    fn new(blocks: usize) -> Self {
        let log2 = (0..=blocks).map(|t| (t as f64).log2()).collect();
        Self {
            log2,
            blocks,
            test_blocks: blocks - INIT_BLOCKS,
        }
    }

    /// `G(z) = 1/v Σ_{i=d+1..L} Σ_{u=1..i} log2(u) F(z, i, u)` with
    /// `F = z²(1-z)^(u-1)` for `u < i` and `z(1-z)^(i-1)` for `u = i`,
    /// regrouped so that every `log2(u)(1-z)^(u-1)` term is computed once.
    fn g(&self, z: f64) -> f64 {
        let q = 1.0 - z;
        let mut pow_q = 1.0;

        let mut inner = 0.0;
        for u in 1..=INIT_BLOCKS {
            inner += self.log2[u] * pow_q;
            pow_q *= q;
        }
        inner *= self.test_blocks as f64;

        let mut last = 0.0;
        for t in INIT_BLOCKS + 1..=self.blocks {
            let term = self.log2[t] * pow_q;
            inner += (self.blocks - t) as f64 * term;
            last += term;
            pow_q *= q;
        }

        (z * z * inner + z * last) / self.test_blocks as f64
    }

    /// Expected statistic when one block value has probability `p` and the
    /// others share the rest evenly.
    fn eval(&self, p: f64) -> f64 {
        let others = ((1usize << BLOCK_BITS) - 1) as f64;
        self.g(p) + others * self.g((1.0 - p) / others)
    }
}

fn block_value(bits: &[u8]) -> usize {
    bits.iter().fold(0usize, |acc, &b| (acc << 1) | b as usize)
}

/// Mean and corrected standard deviation of `log2(distance)` over the test
/// blocks.
fn distance_statistics(data: &[u8], blocks: usize) -> (f64, f64) {
    let mut last_seen = vec![0usize; 1 << BLOCK_BITS];
    let mut chunks = data.chunks_exact(BLOCK_BITS);

    for (i, block) in chunks.by_ref().take(INIT_BLOCKS).enumerate() {
        last_seen[block_value(block)] = i + 1;
    }

    let mut sum = 0.0;
    let mut squares = 0.0;
    for (i, block) in chunks.enumerate() {
        let position = INIT_BLOCKS + i + 1;
        let value = block_value(block);
        let x = ((position - last_seen[value]) as f64).log2();
        sum += x;
        squares += x * x;
        last_seen[value] = position;
    }

    let v = (blocks - INIT_BLOCKS) as f64;
    let mean = sum / v;
    let spread = (squares / (v - 1.0) - mean * mean).max(0.0);
    (mean, STD_DEV_CORRECTION * spread.sqrt())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CompressionEstimator;

impl EntropyEstimator for CompressionEstimator {
    fn name(&self) -> &'static str {
        "Compression Estimate"
    }

    fn estimate(&self, data: &[u8], alphabet: Alphabet) -> Result<Estimate> {
        require_binary(self.name(), data, alphabet)?;
        require_len(self.name(), data, (INIT_BLOCKS + 2) * BLOCK_BITS)?;

        let blocks = data.len() / BLOCK_BITS;
        let test_blocks = blocks - INIT_BLOCKS;
        let (mean, std_dev) = distance_statistics(data, blocks);
        let mean_lb = lower_bound_mean(mean, std_dev, test_blocks);
        let stats = format!("v={test_blocks}, X={mean:.6}, sigma={std_dev:.6}, X'={mean_lb:.6}");
        debug!("Compression: {stats}");

        let expected = ExpectedStatistic::new(blocks);
        let lo = 1.0 / (1usize << BLOCK_BITS) as f64;
        // A statistic at or above what a uniform source produces has no
        // solution and aborts the estimate.
        let entropy = match find_root(|p| expected.eval(p), mean_lb, lo, 1.0) {
            Ok(p) => -p.log2() / BLOCK_BITS as f64,
            Err(e) if e.is_recoverable() => {
                warn!("Compression: {e}; assuming p = 1");
                0.0
            }
            Err(e) => return Err(e),
        };

        Ok(Estimate {
            name: self.name(),
            min_entropy: clamp_entropy(entropy, alphabet.max_entropy()),
            details: stats,
        })
    }
}
