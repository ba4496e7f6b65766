//! # minentropy-core
//!
//! **How much unpredictability is really in your noise source?**
//!
//! `minentropy-core` estimates the min-entropy per symbol of a raw sample
//! without assuming the samples are independent. It runs a battery of ten
//! estimators in the style of NIST SP 800-90B and reports the most
//! conservative one.
//!
//! ## Quick Start
//!
//! ```no_run
//! use minentropy_core::{Alphabet, AssessmentConfig, SampleReader, assess};
//!
//! let mut reader = SampleReader::open("noise.bin").unwrap();
//! let sample = reader.read_bytes(1_000_000).unwrap();
//!
//! let report = assess(sample.bits(), Alphabet::Binary, &AssessmentConfig::default()).unwrap();
//! for r in &report.estimators {
//!     println!("{:<32} {:?}", r.name, r.min_entropy());
//! }
//! println!("min-entropy: {:?} bits/symbol", report.min_entropy);
//! ```
//!
//! ## Architecture
//!
//! Sample → {SuffixArray → LcpArray → t-Tuple, LRS} | {MCV, Collision, Markov,
//! Compression} | {MultiMCW, Lag, MultiMMC, LZ78Y predictors} → minimum
//!
//! Every estimator implements [`EntropyEstimator`]. Estimators that have no
//! closed-form inverse for their statistic solve for a probability with the
//! bounded bisection in [`root_finder`]; a numerical failure there degrades
//! the estimate to the worst case instead of aborting the battery.

pub mod algorithm;
pub mod assessment;
pub mod bounds;
pub mod config;
pub mod error;
pub mod estimator;
pub mod prediction;
pub mod root_finder;
pub mod sample;

pub use algorithm::{LcpArray, SuffixArray};
pub use assessment::{AssessmentReport, EstimatorReport, assess};
pub use bounds::{Z_ALPHA, lower_bound_mean, upper_bound_probability};
pub use config::{AssessmentConfig, EstimatorKind, load_config_from_path};
pub use error::{Error, Result};
pub use estimator::{
    CollisionEstimator, CompressionEstimator, EntropyEstimator, Estimate, LrsEstimator,
    MarkovEstimator, McvEstimator, TupleEstimator,
};
pub use prediction::{
    LagEstimator, Lz78yEstimator, MultiMcwEstimator, MultiMmcEstimator, PredictionOutcome,
    Predictor, RunStatistics, Scoreboard, run_predictions,
};
pub use root_finder::find_root;
pub use sample::{Alphabet, Sample, SampleReader, validate_symbols};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
