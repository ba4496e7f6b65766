//! Battery configuration, loadable from JSON.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::estimator::{
    CollisionEstimator, CompressionEstimator, EntropyEstimator, LrsEstimator, MarkovEstimator,
    McvEstimator, TupleEstimator,
};
use crate::prediction::{LagEstimator, Lz78yEstimator, MultiMcwEstimator, MultiMmcEstimator};

/// Identifier of one estimator in the battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorKind {
    Mcv,
    Collision,
    Markov,
    Compression,
    TTuple,
    Lrs,
    MultiMcw,
    Lag,
    MultiMmc,
    Lz78y,
}

impl EstimatorKind {
    pub const ALL: [EstimatorKind; 10] = [
        Self::Mcv,
        Self::Collision,
        Self::Markov,
        Self::Compression,
        Self::TTuple,
        Self::Lrs,
        Self::MultiMcw,
        Self::Lag,
        Self::MultiMmc,
        Self::Lz78y,
    ];

    pub fn build(self) -> Box<dyn EntropyEstimator> {
        match self {
            Self::Mcv => Box::new(McvEstimator),
            Self::Collision => Box::new(CollisionEstimator),
            Self::Markov => Box::new(MarkovEstimator),
            Self::Compression => Box::new(CompressionEstimator),
            Self::TTuple => Box::new(TupleEstimator),
            Self::Lrs => Box::new(LrsEstimator),
            Self::MultiMcw => Box::new(MultiMcwEstimator),
            Self::Lag => Box::new(LagEstimator),
            Self::MultiMmc => Box::new(MultiMmcEstimator),
            Self::Lz78y => Box::new(Lz78yEstimator),
        }
    }

    /// Estimators defined only for bit samples.
    pub fn binary_only(self) -> bool {
        matches!(self, Self::Collision | Self::Markov | Self::Compression)
    }

    /// Configuration key, e.g. `t_tuple`.
    pub fn key(self) -> &'static str {
        match self {
            Self::Mcv => "mcv",
            Self::Collision => "collision",
            Self::Markov => "markov",
            Self::Compression => "compression",
            Self::TTuple => "t_tuple",
            Self::Lrs => "lrs",
            Self::MultiMcw => "multi_mcw",
            Self::Lag => "lag",
            Self::MultiMmc => "multi_mmc",
            Self::Lz78y => "lz78y",
        }
    }
}

impl std::fmt::Display for EstimatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for EstimatorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.key() == key)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown estimator '{s}'")))
    }
}

/// Which estimators to run and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentConfig {
    pub estimators: Vec<EstimatorKind>,
    /// Run estimators on scoped worker threads.
    pub parallel: bool,
    /// Truncate the sample to this many symbols.
    pub max_symbols: Option<usize>,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            estimators: EstimatorKind::ALL.to_vec(),
            parallel: true,
            max_symbols: None,
        }
    }
}

/// Load an [`AssessmentConfig`] from a JSON file. Missing fields take their
/// defaults.
pub fn load_config_from_path(path: &Path) -> Result<AssessmentConfig> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str::<AssessmentConfig>(&raw)?)
}
