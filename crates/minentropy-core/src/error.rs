//! Error type shared by every estimator and by the assessment battery.

use thiserror::Error;

/// Errors produced while reading samples or estimating min-entropy.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad input: wrong alphabet, out-of-range symbol, or a root-finder
    /// target that the function cannot reach from its lower bound.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Bisection left its bracket or ran out of iterations.
    #[error("root finder did not converge in [{low}, {high}]")]
    NonConvergence { low: f64, high: f64 },

    /// Bisection collapsed onto the lower end of the domain.
    #[error("root finder underflowed to {0}")]
    Underflow(f64),

    #[error("{estimator}: insufficient data: need {needed} symbols, got {got}")]
    InsufficientData {
        estimator: &'static str,
        needed: usize,
        got: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// Numerical failures a caller may replace with a worst-case value.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::NonConvergence { .. } | Error::Underflow(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
