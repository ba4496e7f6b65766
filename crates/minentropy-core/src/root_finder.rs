//! Bounded bisection for inverting decreasing functions.
//!
//! The collision, compression and prediction estimators all need `p` such
//! that `f(p) = target` for an `f` with no closed-form inverse. [`find_root`]
//! bisects `[lo, hi]`, tracking the function values seen at each end of the
//! bracket, and gives up as soon as the bracket stops behaving like a
//! decreasing function.

use crate::error::{Error, Result};

/// Target precision on `|f(p) - target|`.
pub const EPSILON: f64 = 4.0 * f64::EPSILON;

/// Enough halvings to exhaust double precision over any finite interval.
pub const MAX_ITERATIONS: usize = 1076;

fn outside_closed(value: f64, a: f64, b: f64) -> bool {
    value < a.min(b) || value > a.max(b)
}

fn outside_open(value: f64, a: f64, b: f64) -> bool {
    value <= a.min(b) || value >= a.max(b)
}

/// Solve `f(p) = target` for `p` in `[lo, hi]`, assuming `f` decreases.
///
/// # Errors
///
/// - [`Error::InvalidArgument`] if `target >= f(lo)`.
/// - [`Error::NonConvergence`] if a bracket end leaves the domain, the target
///   falls outside the values already observed, or the iteration cap is hit.
/// - [`Error::Underflow`] if the result collapses onto `lo`.
pub fn find_root<F>(f: F, target: f64, lo: f64, hi: f64) -> Result<f64>
where
    F: Fn(f64) -> f64,
{
    let at_lo = f(lo);
    if target >= at_lo {
        return Err(Error::InvalidArgument(format!(
            "target {target} is not below f({lo}) = {at_lo}"
        )));
    }

    let mut lbound = lo;
    let mut hbound = hi;
    let mut lvalue = f64::INFINITY;
    let mut hvalue = f64::NEG_INFINITY;

    let mut p = (lbound + hbound) / 2.0;
    let mut eval = f(p);
    let mut converged = false;

    for _ in 0..MAX_ITERATIONS {
        if (eval - target).abs() < EPSILON {
            converged = true;
            break;
        }

        if target < eval {
            lbound = p;
            lvalue = eval;
        } else {
            hbound = p;
            hvalue = eval;
        }

        if lbound >= hbound {
            p = lbound.max(hbound).min(hi);
            converged = true;
            break;
        }

        if outside_closed(lbound, lo, hi) || outside_closed(hbound, lo, hi) {
            return Err(Error::NonConvergence {
                low: lbound,
                high: hbound,
            });
        }

        if outside_closed(target, lvalue, hvalue) {
            return Err(Error::NonConvergence {
                low: lbound,
                high: hbound,
            });
        }

        let prev = p;
        p = (lbound + hbound) / 2.0;

        // Bracket is as tight as f64 allows.
        if outside_open(p, lbound, hbound) || prev == p {
            p = hbound;
            converged = true;
            break;
        }

        eval = f(p);

        if outside_closed(eval, lvalue, hvalue) {
            p = hbound;
            converged = true;
            break;
        }
    }

    if !converged {
        return Err(Error::NonConvergence {
            low: lbound,
            high: hbound,
        });
    }
    if p <= lo {
        return Err(Error::Underflow(p));
    }
    Ok(p)
}
