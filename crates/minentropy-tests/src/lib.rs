//! NIST SP 800-22 style pass/fail randomness tests.
//!
//! Four closed-form tests over a bit sequence (one bit per element, values
//! 0 or 1): monobit, frequency within a block, runs, and longest run of ones
//! in a block. Each returns a [`TestResult`] with a p-value, a pass/fail
//! determination at 0.01 and a letter grade (A through F).

use statrs::distribution::{ChiSquared, ContinuousCDF};
use statrs::function::erf::erfc;

// ═══════════════════════════════════════════════════════════════════════════════
// Core types
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of a single randomness test.
#[derive(Debug, Clone)]
pub struct TestResult {
    pub name: String,
    /// Compact label for tabular output, e.g. `Blk.Freq.`.
    pub short_name: String,
    /// Test parameter, e.g. `m = 128`; empty when the test has none.
    pub parameter: String,
    pub passed: bool,
    pub p_value: Option<f64>,
    pub statistic: f64,
    pub details: String,
    pub grade: char,
}

impl TestResult {
    /// Assign a letter grade based on p-value.
    ///
    /// - A: p >= 0.1
    /// - B: p >= 0.01
    /// - C: p >= 0.001
    /// - D: p >= 0.0001
    /// - F: otherwise or None
    pub fn grade_from_p(p: Option<f64>) -> char {
        match p {
            Some(p) if p >= 0.1 => 'A',
            Some(p) if p >= 0.01 => 'B',
            Some(p) if p >= 0.001 => 'C',
            Some(p) if p >= 0.0001 => 'D',
            _ => 'F',
        }
    }

    /// Determine pass/fail from p-value against a threshold (default 0.01).
    pub fn pass_from_p(p: Option<f64>, threshold: f64) -> bool {
        match p {
            Some(p) => p >= threshold,
            None => false,
        }
    }

    /// `short_name (parameter)`, or just the short name.
    pub fn label(&self) -> String {
        if self.parameter.is_empty() {
            self.short_name.clone()
        } else {
            format!("{} ({})", self.short_name, self.parameter)
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════════════

/// Unpack a byte slice into individual bits (MSB first per byte).
pub fn to_bits(data: &[u8]) -> Vec<u8> {
    let mut bits = Vec::with_capacity(data.len() * 8);
    for &byte in data {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1);
        }
    }
    bits
}

struct TestId {
    name: &'static str,
    short_name: &'static str,
    parameter: String,
}

impl TestId {
    fn result(self, p: Option<f64>, statistic: f64, details: String) -> TestResult {
        TestResult {
            name: self.name.to_string(),
            short_name: self.short_name.to_string(),
            parameter: self.parameter,
            passed: TestResult::pass_from_p(p, 0.01),
            p_value: p,
            statistic,
            details,
            grade: TestResult::grade_from_p(p),
        }
    }

    /// Failing result when data is too short.
    fn insufficient(self, needed: usize, got: usize) -> TestResult {
        self.result(None, 0.0, format!("Insufficient data: need {needed}, got {got}"))
    }
}

/// Upper regularized incomplete gamma `Q(df/2, x/2)`, i.e. the chi-squared
/// survival function.
fn chi_squared_sf(df: f64, x: f64) -> Option<f64> {
    ChiSquared::new(df).ok().map(|dist| dist.sf(x))
}

fn ones(bits: &[u8]) -> usize {
    bits.iter().filter(|&&b| b == 1).count()
}

fn longest_run_of_ones(bits: &[u8]) -> usize {
    let mut longest = 0;
    let mut run = 0;
    for &bit in bits {
        if bit == 1 {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    longest
}

// ═══════════════════════════════════════════════════════════════════════════════
// 1. FREQUENCY TESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Monobit: proportion of ones should be ~50%.
pub fn monobit(bits: &[u8]) -> TestResult {
    let id = TestId {
        name: "Monobit test",
        short_name: "Monobit",
        parameter: String::new(),
    };
    let n = bits.len();
    if n < 100 {
        return id.insufficient(100, n);
    }
    let s = 2 * ones(bits) as i64 - n as i64;
    let s_obs = (s as f64).abs() / (n as f64).sqrt();
    let p = erfc(s_obs / 2.0_f64.sqrt());
    id.result(Some(p), s_obs, format!("S={s}, n={n}"))
}

/// Frequency within `block_size`-bit blocks. Chi-squared test.
pub fn block_frequency(bits: &[u8], block_size: usize) -> TestResult {
    let id = TestId {
        name: "Frequency test within a block",
        short_name: "Blk.Freq.",
        parameter: format!("m = {block_size}"),
    };
    let n = bits.len();
    let num_blocks = if block_size == 0 { 0 } else { n / block_size };
    if num_blocks < 1 {
        return id.insufficient(block_size.max(1), n);
    }
    let squares: f64 = bits
        .chunks_exact(block_size)
        .map(|block| {
            let proportion = ones(block) as f64 / block_size as f64;
            (proportion - 0.5) * (proportion - 0.5)
        })
        .sum();
    let chi2 = 4.0 * block_size as f64 * squares;
    let p = chi_squared_sf(num_blocks as f64, chi2);
    id.result(p, chi2, format!("blocks={num_blocks}, chi2={chi2:.4}"))
}

// ═══════════════════════════════════════════════════════════════════════════════
// 2. RUNS TESTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Runs: number of uninterrupted runs of 0s or 1s.
pub fn runs(bits: &[u8]) -> TestResult {
    let id = TestId {
        name: "Runs test",
        short_name: "Runs",
        parameter: String::new(),
    };
    let n = bits.len();
    if n < 100 {
        return id.insufficient(100, n);
    }
    let prop = ones(bits) as f64 / n as f64;
    if (prop - 0.5).abs() >= 2.0 / (n as f64).sqrt() {
        return id.result(
            Some(0.0),
            0.0,
            format!("Pre-test failed: proportion={prop:.4}"),
        );
    }
    let v_obs = 1 + bits.windows(2).filter(|w| w[0] != w[1]).count();
    let spread = prop * (1.0 - prop);
    let numerator = (v_obs as f64 - 2.0 * n as f64 * spread).abs();
    let denominator = 2.0 * (2.0 * n as f64).sqrt() * spread;
    let p = erfc(numerator / denominator);
    id.result(
        Some(p),
        v_obs as f64,
        format!("V_obs={v_obs}, pi={prop:.4}"),
    )
}

/// Block length, class boundaries and class probabilities for the
/// longest-run test, chosen by sequence length.
struct LongestRunTable {
    block_size: usize,
    /// Longest run of the first class (`<=`) and last class (`>=`); classes
    /// in between hold one run length each.
    low: usize,
    high: usize,
    probabilities: &'static [f64],
}

fn longest_run_table(n: usize) -> Option<LongestRunTable> {
    if n >= 750_000 {
        Some(LongestRunTable {
            block_size: 10_000,
            low: 10,
            high: 16,
            probabilities: &[0.0882, 0.2092, 0.2483, 0.1933, 0.1208, 0.0675, 0.0727],
        })
    } else if n >= 6272 {
        Some(LongestRunTable {
            block_size: 128,
            low: 4,
            high: 9,
            probabilities: &[0.1174, 0.2430, 0.2493, 0.1752, 0.1027, 0.1124],
        })
    } else if n >= 128 {
        Some(LongestRunTable {
            block_size: 8,
            low: 1,
            high: 4,
            probabilities: &[0.2148, 0.3672, 0.2305, 0.1875],
        })
    } else {
        None
    }
}

/// Longest run of ones within blocks, chi-squared against the class
/// probabilities for the block length.
pub fn longest_run(bits: &[u8]) -> TestResult {
    let n = bits.len();
    let Some(table) = longest_run_table(n) else {
        return TestId {
            name: "Longest run of ones in a block test",
            short_name: "Longest Run",
            parameter: String::new(),
        }
        .insufficient(128, n);
    };
    let id = TestId {
        name: "Longest run of ones in a block test",
        short_name: "Longest Run",
        parameter: format!("M = {}", table.block_size),
    };

    let mut observed = vec![0usize; table.probabilities.len()];
    for block in bits.chunks_exact(table.block_size) {
        let longest = longest_run_of_ones(block).clamp(table.low, table.high);
        observed[longest - table.low] += 1;
    }

    let num_blocks = n / table.block_size;
    let chi2: f64 = observed
        .iter()
        .zip(table.probabilities)
        .map(|(&obs, &pi)| {
            let expected = num_blocks as f64 * pi;
            (obs as f64 - expected).powi(2) / expected
        })
        .sum();
    let k = (table.probabilities.len() - 1) as f64;
    let p = chi_squared_sf(k, chi2);
    id.result(p, chi2, format!("blocks={num_blocks}, classes={observed:?}"))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Test battery
// ═══════════════════════════════════════════════════════════════════════════════

/// Run the four-test battery on a bit sequence.
pub fn run_battery(bits: &[u8]) -> Vec<TestResult> {
    let tests: Vec<fn(&[u8]) -> TestResult> = vec![
        monobit,
        |bits| block_frequency(bits, 128),
        runs,
        longest_run,
    ];

    tests
        .iter()
        .map(|test_fn| {
            match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| test_fn(bits))) {
                Ok(result) => result,
                Err(_) => TestResult {
                    name: "Unknown".to_string(),
                    short_name: "Unknown".to_string(),
                    parameter: String::new(),
                    passed: false,
                    p_value: None,
                    statistic: 0.0,
                    details: "Test panicked".to_string(),
                    grade: 'F',
                },
            }
        })
        .collect()
}

/// Calculate overall quality score (0-100) from test results.
///
/// Each grade maps to a score: A=100, B=75, C=50, D=25, F=0.
/// Returns the average across all tests.
pub fn calculate_quality_score(results: &[TestResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let total: f64 = results
        .iter()
        .map(|r| match r.grade {
            'A' => 100.0,
            'B' => 75.0,
            'C' => 50.0,
            'D' => 25.0,
            _ => 0.0,
        })
        .sum();
    total / results.len() as f64
}
