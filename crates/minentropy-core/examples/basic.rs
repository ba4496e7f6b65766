//! Basic min-entropy assessment example.
//!
//! Generates a uniform byte sample and a biased bit sample, runs the
//! estimator battery on both and prints each estimate.
//!
//! Run: `cargo run --example basic`

use minentropy_core::{Alphabet, AssessmentConfig, AssessmentReport, Sample, assess};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

fn print_report(title: &str, report: &AssessmentReport) {
    println!("{title} ({} {} symbols)", report.symbols, report.alphabet);
    for r in &report.estimators {
        match &r.result {
            Ok(est) => println!(
                "  {:<32} {:>8.4}  {:>7.2}s  {}",
                r.name, est.min_entropy, r.elapsed_secs, est.details
            ),
            Err(e) => println!("  {:<32}   failed: {e}", r.name),
        }
    }
    match report.min_entropy {
        Some(h) => println!("  min-entropy: {h:.4} bits/symbol\n"),
        None => println!("  no estimator succeeded\n"),
    }
}

fn main() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut bytes = vec![0u8; 200_000];
    rng.fill_bytes(&mut bytes);
    let sample = Sample::from_bytes(&bytes);

    let config = AssessmentConfig::default();
    match assess(sample.bytes(), Alphabet::Byte, &config) {
        Ok(report) => print_report("Uniform bytes", &report),
        Err(e) => eprintln!("assessment failed: {e}"),
    }

    // Ones with probability ~0.75.
    let biased: Vec<u8> = bytes
        .chunks_exact(2)
        .map(|pair| u8::from(pair[0] & 1 == 1 || pair[1] & 1 == 1))
        .collect();
    match assess(&biased, Alphabet::Binary, &config) {
        Ok(report) => print_report("Biased bits", &report),
        Err(e) => eprintln!("assessment failed: {e}"),
    }
}
