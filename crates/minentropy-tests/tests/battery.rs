//! Battery behaviour on structured and pseudo-random bit streams.

use minentropy_tests::{block_frequency, longest_run, monobit, run_battery, runs, to_bits};

/// xorshift64 bytes, unpacked MSB first.
fn xorshift_bits(bytes: usize) -> Vec<u8> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    let data: Vec<u8> = (0..bytes)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 56) as u8
        })
        .collect();
    to_bits(&data)
}

#[test]
fn alternating_bits_fail_runs_but_pass_monobit() {
    let bits: Vec<u8> = (0..10_000).map(|i| (i % 2) as u8).collect();
    assert!(monobit(&bits).passed);
    assert!(!runs(&bits).passed, "too many runs must be flagged");
    assert!(!longest_run(&bits).passed);
}

#[test]
fn biased_blocks_fail_block_frequency() {
    // Half the blocks all ones, half all zeros: globally balanced.
    let bits: Vec<u8> = (0..128 * 100).map(|i| ((i / 128) % 2) as u8).collect();
    assert!(monobit(&bits).passed);
    assert!(!block_frequency(&bits, 128).passed);
}

#[test]
fn runs_pretest_failure_reports_zero() {
    let mut bits = vec![1u8; 800];
    bits.extend(vec![0u8; 200]);
    let result = runs(&bits);
    assert_eq!(result.p_value, Some(0.0));
    assert!(result.details.contains("Pre-test"));
}

#[test]
fn longest_run_uses_largest_block_for_long_sequences() {
    let bits = xorshift_bits(100_000);
    let result = longest_run(&bits);
    assert_eq!(result.parameter, "M = 10000");
    assert!(result.p_value.is_some());
}

#[test]
fn xorshift_stream_passes_most_tests() {
    let results = run_battery(&xorshift_bits(20_000));
    assert_eq!(results.len(), 4);
    for r in &results {
        assert!(r.p_value.is_some(), "{} returned no p-value", r.name);
    }
    let passed = results.iter().filter(|r| r.passed).count();
    assert!(passed >= 3, "only {passed}/4 passed");
}
