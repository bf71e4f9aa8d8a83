//! End-to-end tests for the top-level `factor::factor` escalation ladder.

use factorengine::bigint::Number;
use factorengine::factor::{factor, FactorConfig};

fn factor_decimal(s: &str) -> Vec<String> {
    let n = Number::parse_decimal(s).unwrap();
    let mut out: Vec<String> = factor(&n, &FactorConfig::default()).iter().map(|f| f.to_decimal()).collect();
    out.sort();
    out
}

#[test]
fn factors_a_product_of_two_small_primes_via_trial_division() {
    assert_eq!(factor_decimal("91"), vec!["13".to_string(), "7".to_string()]);
}

#[test]
fn factors_a_product_of_two_mid_size_primes_via_trial_division() {
    assert_eq!(factor_decimal("2047"), vec!["23".to_string(), "89".to_string()]);
}

#[test]
fn reports_a_prime_as_a_single_factor() {
    assert_eq!(factor_decimal("1000003"), vec!["1000003".to_string()]);
}

/// `100000007 * 100999993`, a 54-bit semiprime. Both factors are well past
/// `miller_rabin::TRIAL_DIVISION_BOUND_MULTI_LIMB`/the single-limb
/// exhaustive-trial-division threshold, so this value only factors by
/// reaching Pollard's rho — the smaller factor is 8 digits, well within
/// rho's expected `O(sqrt(p)) ~ 10^4` iterations against a 1,000,000
/// iteration budget.
#[test]
fn factors_a_semiprime_too_large_for_trial_division_via_pollard_rho() {
    assert_eq!(factor_decimal("10100000006999951"), vec!["100000007".to_string(), "100999993".to_string()]);
}

#[test]
fn factors_a_perfect_square_of_a_prime() {
    assert_eq!(factor_decimal("9409"), vec!["97".to_string(), "97".to_string()]);
}
