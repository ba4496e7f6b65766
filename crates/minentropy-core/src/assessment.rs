//! The estimator battery: every configured estimator over one sample.
//!
//! Estimators share nothing but the immutable sample and, for t-Tuple and
//! LRS, one LCP array built up front. With `parallel` set, each estimator
//! runs on its own scoped thread. A failing estimator is recorded and left
//! out of the minimum; it never stops the others.

use std::time::Instant;

use log::{info, warn};
use serde::Serialize;

use crate::algorithm::{LcpArray, SuffixArray};
use crate::config::{AssessmentConfig, EstimatorKind};
use crate::error::Result;
use crate::estimator::{EntropyEstimator, Estimate};
use crate::sample::{Alphabet, validate_symbols};

/// Outcome of one estimator within the battery.
#[derive(Debug, Clone, Serialize)]
pub struct EstimatorReport {
    pub kind: EstimatorKind,
    pub name: &'static str,
    /// The estimate, or the error text if the estimator failed.
    pub result: std::result::Result<Estimate, String>,
    pub elapsed_secs: f64,
}

impl EstimatorReport {
    pub fn min_entropy(&self) -> Option<f64> {
        self.result.as_ref().ok().map(|e| e.min_entropy)
    }
}

/// Battery results, in configuration order.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentReport {
    pub alphabet: Alphabet,
    pub symbols: usize,
    pub estimators: Vec<EstimatorReport>,
    /// Minimum over the successful estimators.
    pub min_entropy: Option<f64>,
}

impl AssessmentReport {
    /// The estimator that produced the minimum.
    pub fn limiting_estimator(&self) -> Option<&EstimatorReport> {
        self.estimators
            .iter()
            .filter_map(|r| r.min_entropy().map(|h| (h, r)))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, r)| r)
    }

    pub fn failures(&self) -> usize {
        self.estimators.iter().filter(|r| r.result.is_err()).count()
    }
}

fn run_one(
    kind: EstimatorKind,
    estimator: &dyn EntropyEstimator,
    data: &[u8],
    alphabet: Alphabet,
    lcp: Option<&LcpArray>,
) -> EstimatorReport {
    let start = Instant::now();
    let result = match lcp {
        Some(lcp) if estimator.uses_lcp() => estimator.estimate_with_lcp(data, alphabet, lcp),
        _ => estimator.estimate(data, alphabet),
    };
    let elapsed_secs = start.elapsed().as_secs_f64();
    if let Err(e) = &result {
        warn!("{}: {e}", estimator.name());
    }
    EstimatorReport {
        kind,
        name: estimator.name(),
        result: result.map_err(|e| e.to_string()),
        elapsed_secs,
    }
}

/// Run the configured battery over `data`.
///
/// Symbols outside `alphabet` are rejected before any estimator runs.
/// Binary-only estimators are skipped for byte samples.
pub fn assess(
    data: &[u8],
    alphabet: Alphabet,
    config: &AssessmentConfig,
) -> Result<AssessmentReport> {
    validate_symbols(data, alphabet)?;
    let data = match config.max_symbols {
        Some(max) if max < data.len() => &data[..max],
        _ => data,
    };

    let estimators: Vec<(EstimatorKind, Box<dyn EntropyEstimator>)> = config
        .estimators
        .iter()
        .copied()
        .filter(|kind| alphabet == Alphabet::Binary || !kind.binary_only())
        .map(|kind| (kind, kind.build()))
        .collect();

    info!(
        "assessing {} {alphabet} symbols with {} estimators",
        data.len(),
        estimators.len()
    );

    let lcp = estimators
        .iter()
        .any(|(_, e)| e.uses_lcp())
        .then(|| LcpArray::new(data, &SuffixArray::new(data)));
    let lcp = lcp.as_ref();

    let reports: Vec<EstimatorReport> = if config.parallel {
        std::thread::scope(|s| {
            let handles: Vec<_> = estimators
                .iter()
                .map(|(kind, estimator)| {
                    let handle =
                        s.spawn(move || run_one(*kind, estimator.as_ref(), data, alphabet, lcp));
                    (*kind, estimator.name(), handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(kind, name, handle)| match handle.join() {
                    Ok(report) => report,
                    Err(_) => EstimatorReport {
                        kind,
                        name,
                        result: Err("estimator panicked".to_string()),
                        elapsed_secs: 0.0,
                    },
                })
                .collect()
        })
    } else {
        estimators
            .iter()
            .map(|(kind, estimator)| run_one(*kind, estimator.as_ref(), data, alphabet, lcp))
            .collect()
    };

    let min_entropy = reports
        .iter()
        .filter_map(EstimatorReport::min_entropy)
        .reduce(f64::min);
    info!(
        "assessment done: min-entropy {}",
        min_entropy.map_or_else(|| "n/a".to_string(), |h| format!("{h:.6}"))
    );

    Ok(AssessmentReport {
        alphabet,
        symbols: data.len(),
        estimators: reports,
        min_entropy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimator::testutil::{random_bits, random_bytes};

    #[test]
    fn test_byte_samples_skip_binary_only_estimators() {
        let data = random_bytes(20_000, 91);
        let report = assess(&data, Alphabet::Byte, &AssessmentConfig::default()).unwrap();
        assert_eq!(report.estimators.len(), 7);
        assert!(report.estimators.iter().all(|r| !r.kind.binary_only()));
    }

    #[test]
    fn test_minimum_over_successes() {
        let data = random_bits(20_000, 92);
        let report = assess(&data, Alphabet::Binary, &AssessmentConfig::default()).unwrap();
        assert_eq!(report.estimators.len(), 10);
        assert_eq!(report.failures(), 0);
        let min = report.min_entropy.unwrap();
        for r in &report.estimators {
            assert!(r.min_entropy().unwrap() >= min);
        }
        let limiting = report.limiting_estimator().unwrap();
        assert_eq!(limiting.min_entropy(), Some(min));
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let data = random_bits(20_000, 93);
        let parallel = assess(&data, Alphabet::Binary, &AssessmentConfig::default()).unwrap();
        let config = AssessmentConfig {
            parallel: false,
            ..AssessmentConfig::default()
        };
        let sequential = assess(&data, Alphabet::Binary, &config).unwrap();
        for (a, b) in parallel.estimators.iter().zip(&sequential.estimators) {
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.result, b.result);
        }
    }

    #[test]
    fn test_failures_are_recorded_not_fatal() {
        // Too short for compression and the prediction estimators.
        let data = random_bits(100, 94);
        let report = assess(&data, Alphabet::Binary, &AssessmentConfig::default()).unwrap();
        assert!(report.failures() > 0);
        assert!(report.min_entropy.is_some());
    }

    #[test]
    fn test_unsolvable_estimate_is_left_out_of_minimum() {
        let data: Vec<u8> = (0..10_000).map(|i| (i % 2) as u8).collect();
        let config = AssessmentConfig {
            estimators: vec![EstimatorKind::Collision, EstimatorKind::Markov],
            parallel: false,
            max_symbols: None,
        };
        let report = assess(&data, Alphabet::Binary, &config).unwrap();
        assert_eq!(report.failures(), 1);
        let collision = &report.estimators[0];
        assert!(collision.result.as_ref().is_err_and(|e| e.contains("invalid argument")));
        assert_eq!(report.min_entropy, report.estimators[1].min_entropy());
    }

    #[test]
    fn test_truncates_to_max_symbols() {
        let data = random_bytes(5_000, 95);
        let config = AssessmentConfig {
            estimators: vec![EstimatorKind::Mcv],
            parallel: false,
            max_symbols: Some(1_000),
        };
        let report = assess(&data, Alphabet::Byte, &config).unwrap();
        assert_eq!(report.symbols, 1_000);
    }

    #[test]
    fn test_rejects_out_of_alphabet_symbols() {
        assert!(assess(&[0, 1, 2], Alphabet::Binary, &AssessmentConfig::default()).is_err());
    }
}
