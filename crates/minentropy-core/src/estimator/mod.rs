//! Min-entropy estimators.
//!
//! Every estimator implements [`EntropyEstimator`]. Implementations are
//! stateless: all working storage lives inside one `estimate` call, so a
//! single instance can be shared across threads and repeated runs over the
//! same data return identical results.

pub mod collision;
pub mod compression;
pub mod lrs;
pub mod markov;
pub mod mcv;
pub mod tuple;

pub use collision::CollisionEstimator;
pub use compression::CompressionEstimator;
pub use lrs::LrsEstimator;
pub use markov::MarkovEstimator;
pub use mcv::McvEstimator;
pub use tuple::TupleEstimator;

use serde::Serialize;

use crate::algorithm::LcpArray;
use crate::error::{Error, Result};
use crate::sample::{Alphabet, validate_symbols};

/// Result of one estimator run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    pub name: &'static str,
    /// Bits of min-entropy per symbol, in `[0, log2(alphabet size)]`.
    pub min_entropy: f64,
    /// Intermediate statistics for the audit trail.
    pub details: String,
}

/// A min-entropy estimator over a symbol sequence.
pub trait EntropyEstimator: Send + Sync {
    /// Human-readable name.
    fn name(&self) -> &'static str;

    /// Estimate min-entropy per symbol of `data` drawn from `alphabet`.
    fn estimate(&self, data: &[u8], alphabet: Alphabet) -> Result<Estimate>;

    /// Whether the estimator works on substring statistics, so a caller
    /// holding an [`LcpArray`] for the data can pass it in.
    fn uses_lcp(&self) -> bool {
        false
    }

    /// Same as [`estimate`](Self::estimate) but reusing a prebuilt LCP array
    /// of `data`.
    fn estimate_with_lcp(
        &self,
        data: &[u8],
        alphabet: Alphabet,
        _lcp: &LcpArray,
    ) -> Result<Estimate> {
        self.estimate(data, alphabet)
    }

    /// Variant taking a raw alphabet size (2 or 256).
    fn estimate_with_size(&self, data: &[u8], alphabet_size: usize) -> Result<Estimate> {
        self.estimate(data, Alphabet::try_from(alphabet_size)?)
    }
}

/// Reject non-binary input for the binary-only estimators.
pub(crate) fn require_binary(name: &str, data: &[u8], alphabet: Alphabet) -> Result<()> {
    if alphabet != Alphabet::Binary {
        return Err(Error::InvalidArgument(format!(
            "{name} requires a binary alphabet, got {} symbols",
            alphabet.size()
        )));
    }
    validate_symbols(data, alphabet)
}

pub(crate) fn require_len(estimator: &'static str, data: &[u8], needed: usize) -> Result<()> {
    if data.len() < needed {
        return Err(Error::InsufficientData {
            estimator,
            needed,
            got: data.len(),
        });
    }
    Ok(())
}
