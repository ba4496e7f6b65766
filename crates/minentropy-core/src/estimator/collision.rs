//! Collision estimate (binary samples).
//!
//! Walks the sample in steps that each end at the first repeated value: two
//! symbols when the next one equals the current, otherwise three, since a
//! binary triple always contains a collision. The mean step length is
//! inverted into the bias of the most likely bit.

use log::{debug, warn};

use super::{EntropyEstimator, Estimate, require_binary, require_len};
use crate::bounds::{clamp_entropy, lower_bound_mean};
use crate::error::Result;
use crate::root_finder::find_root;
use crate::sample::Alphabet;

/// Expected collision time of a binary source whose likelier bit has
/// probability `p`.
///
/// The general expression
/// `p/q² · (1 + (1/p - 1/q)/2) · F(q) - p/q · (1/p - 1/q)/2` with
/// `F(q) = q(2q² + 2q + 1)` reduces to `2 + 2pq` for two symbols.
pub fn expected_collision_time(p: f64) -> f64 {
    2.0 + 2.0 * p * (1.0 - p)
}

/// Collision step statistics: (number of collisions, mean, sample std dev).
fn collision_steps(data: &[u8]) -> (usize, f64, f64) {
    let n = data.len();
    let mut index = 0usize;
    let mut count = 0usize;
    let mut squares = 0usize;

    while index + 1 < n {
        let step = if data[index] == data[index + 1] {
            2
        } else if index + 2 < n {
            3
        } else {
            break;
        };
        index += step;
        squares += step * step;
        count += 1;
    }

    let mean = index as f64 / count as f64;
    let variance = (squares as f64 - index as f64 * mean) / (count as f64 - 1.0);
    (count, mean, variance.max(0.0).sqrt())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionEstimator;

impl EntropyEstimator for CollisionEstimator {
    fn name(&self) -> &'static str {
        "Collision Estimate"
    }

    fn estimate(&self, data: &[u8], alphabet: Alphabet) -> Result<Estimate> {
        require_binary(self.name(), data, alphabet)?;
        // Six bits always hold at least two collisions.
        require_len(self.name(), data, 6)?;

        let (count, mean, std_dev) = collision_steps(data);
        let mean_lb = lower_bound_mean(mean, std_dev, count);
        let stats = format!("v={count}, X={mean:.6}, sigma={std_dev:.6}, X'={mean_lb:.6}");
        debug!("Collision: {stats}");

        // A mean at or above the unbiased collision time has no solution and
        // aborts the estimate.
        let p = match find_root(expected_collision_time, mean_lb, 0.5, 1.0) {
            Ok(p) => p,
            Err(e) if e.is_recoverable() => {
                warn!("Collision: {e}; assuming p = 1");
                1.0
            }
            Err(e) => return Err(e),
        };

        Ok(Estimate {
            name: self.name(),
            min_entropy: clamp_entropy(-p.log2(), alphabet.max_entropy()),
            details: format!("{stats}, p={p:.6}"),
        })
    }
}
