//! Test utilities for Spate development.
//!
//! Float assertions plus the grids and fields the test suites share
//! (see [`fixtures`]).

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

/// Assert `|actual - expected| <= tol`.
#[track_caller]
pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected} ± {tol}, got {actual} (off by {})",
        (actual - expected).abs()
    );
}

/// Largest minus smallest value.
pub fn spread(values: &[f64]) -> f64 {
    let (lo, hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        });
    hi - lo
}

/// Assert every value is finite.
#[track_caller]
pub fn assert_all_finite(values: &[f64]) {
    if let Some(i) = values.iter().position(|x| !x.is_finite()) {
        panic!("value {i} is {}", values[i]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spread_of_constant_is_zero() {
        assert_eq!(spread(&[2.0, 2.0, 2.0]), 0.0);
        assert_eq!(spread(&[1.0, -3.0, 4.0]), 7.0);
    }

    #[test]
    #[should_panic(expected = "value 1 is NaN")]
    fn assert_all_finite_reports_index() {
        assert_all_finite(&[0.0, f64::NAN]);
    }
}
