//! One-sided 99% confidence bounds shared by the estimators.

/// Standard normal quantile for a one-sided 99% confidence level.
pub const Z_ALPHA: f64 = 2.5758293035489008;

/// Upper confidence bound on a probability estimated from `n` observations,
/// capped at 1.
pub fn upper_bound_probability(p: f64, n: usize) -> f64 {
    if n <= 1 {
        return 1.0;
    }
    let spread = Z_ALPHA * (p * (1.0 - p) / (n as f64 - 1.0)).sqrt();
    (p + spread).min(1.0)
}

/// Lower confidence bound on a mean from `n` observations with sample
/// standard deviation `std_dev`.
pub fn lower_bound_mean(mean: f64, std_dev: f64, n: usize) -> f64 {
    mean - Z_ALPHA * std_dev / (n as f64).sqrt()
}

/// Min-entropy of a probability, clamped to `[0, max_entropy]`.
pub fn entropy_from_probability(p: f64, max_entropy: f64) -> f64 {
    clamp_entropy(-p.log2(), max_entropy)
}

/// Clamp an entropy estimate into `[0, max_entropy]`; NaN maps to 0.
pub fn clamp_entropy(h: f64, max_entropy: f64) -> f64 {
    if h.is_nan() || h <= 0.0 {
        return 0.0;
    }
    h.min(max_entropy)
}
