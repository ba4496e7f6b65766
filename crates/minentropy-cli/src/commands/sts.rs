use std::path::Path;

use minentropy_core::{Alphabet, Result};

pub fn run(path: &Path, max_bits: Option<usize>) -> Result<()> {
    let sample = super::read_sample(path, Alphabet::Binary, max_bits)?;
    let bits = sample.bits();
    println!("Testing {} bits from {}\n", bits.len(), path.display());

    let results = minentropy_tests::run_battery(bits);
    for r in &results {
        match r.p_value {
            Some(p) => println!(
                "{}: P-value = {p:.6} {}",
                r.label(),
                if r.passed { "PASS" } else { "FAIL" }
            ),
            None => println!("{}: {} FAIL", r.label(), r.details),
        }
    }

    let passed = results.iter().filter(|r| r.passed).count();
    println!(
        "\n{passed}/{} passed, quality score {:.0}/100",
        results.len(),
        minentropy_tests::calculate_quality_score(&results)
    );
    Ok(())
}
