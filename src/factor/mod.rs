//! Top-level factorization orchestrator: escalates from cheap, exact
//! methods to progressively more expensive probabilistic ones, peeling off
//! one factor at a time until only a probable prime remains.
//!
//! Ported from `Factorization/factor.h`'s `factor()`. The escalation order
//! is fixed: primality check, trial division, Pollard rho, then a ladder of
//! `(B1, curveCount)` pairs each tried first as Pollard p-1 and then as ECM
//! over a twisted Edwards curve.

pub mod miller_rabin;
pub mod pminus1;
pub mod pollard_rho;
pub mod trial;

use crate::bigint::arb::BignumArb;
use crate::bigint::montgomery::MontgomeryCtx;
use crate::bigint::Number;
use crate::ecm::{self, CurveForm, EcmConfig, EcmOutcome};
use std::cmp::Ordering;

/// The ladder `factor()` climbs once Pollard rho gives up: pairs of `B1`
/// and curve count, in increasing cost order, each tried as Pollard p-1
/// before ECM (p-1 is far cheaper per curve when it happens to hit).
/// Comments give the rough digit size of cofactor each rung is tuned to
/// catch, matching the original table.
const B1_CURVE_PAIRS: &[(u64, u32)] = &[
    (1_629, 10),       // 40
    (4_537, 10),       // 45
    (12_322, 9),       // 50
    (21_905, 21),      // 60
    (32_918, 66),       // 70
    (183_849, 219),     // 90
    (3_071_166, 649),   // 120
    (9_267_681, 2_399), // 140
    (35_158_748, 6_076),  // 160
    (491_130_495, 29_584), // 200
];

/// How many Pollard rho iterations to spend before falling back to the
/// `B1_CURVE_PAIRS` ladder.
const POLLARD_RHO_MAX_ITER: u64 = 1_000_000;

#[derive(Clone, Copy, Debug, Default)]
pub struct FactorConfig {
    pub write_debug: bool,
}

/// Fully factors `n`, returning its prime factors (with multiplicity) in
/// the order they were found. `n` must be at least 2.
pub fn factor(n: &Number, config: &FactorConfig) -> Vec<Number> {
    let mut factors = Vec::new();
    let mut n = n.clone();

    if config.write_debug {
        tracing::debug!(%n, "started factorization");
    }

    loop {
        let arb = n.to_arb();
        let (prime, trial_factor) = miller_rabin::is_probably_prime(&arb);
        if prime {
            if config.write_debug {
                tracing::debug!(%n, "remaining number is probably prime");
            }
            factors.push(n);
            return factors;
        }

        if let Some(f) = trial_factor {
            let factor_num = Number::from_u64(f);
            if config.write_debug {
                tracing::debug!(factor = f, %n, "found factor via trial division");
            }
            n = n.div_rem(&factor_num).0;
            factors.push(factor_num);
            continue;
        }

        let ctx = MontgomeryCtx::new(arb.limbs());
        let one = BignumArb::from_u64(1);

        let mut rho_params = pollard_rho::PollardRhoParams::new(0, POLLARD_RHO_MAX_ITER);
        if config.write_debug {
            tracing::debug!(max_iter = POLLARD_RHO_MAX_ITER, "running Pollard rho");
        }
        let mut found = pollard_rho::pollard_rho_brent(&ctx, &mut rho_params);

        if found.cmp_value(&one) == Ordering::Equal {
            for &(b1, curve_count) in B1_CURVE_PAIRS {
                if config.write_debug {
                    tracing::debug!(b1, b2 = b1, "running Pollard p-1");
                }
                found = pminus1::p_minus_1(&ctx, b1, b1);
                if found.cmp_value(&one) != Ordering::Equal {
                    break;
                }

                if config.write_debug {
                    tracing::debug!(b1, b2 = b1, curve_count, "running ECM");
                }
                let mut ecm_config = EcmConfig::new(b1, b1, curve_count, CurveForm::TwistedEdwards);
                ecm_config.method = crate::ecm::stage1::MulMethod::Naf;
                if let EcmOutcome::Factor(f) = ecm::run(&ctx, &ecm_config) {
                    found = f.to_arb();
                    break;
                }
            }
        }

        let factor_num = Number::Arb(found).fit_to_size();
        debug_assert!(
            factor_num.cmp_value(&Number::from_u64(1)) != Ordering::Equal,
            "exhausted the entire B1/curve ladder without finding a factor"
        );
        if config.write_debug {
            tracing::debug!(factor = %factor_num, %n, "found factor");
        }
        n = n.div_rem(&factor_num).0;
        factors.push(factor_num);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factor_decimal(s: &str) -> Vec<String> {
        let n = Number::parse_decimal(s).unwrap();
        let mut out: Vec<String> = factor(&n, &FactorConfig::default()).iter().map(|f| f.to_decimal()).collect();
        out.sort();
        out
    }

    #[test]
    fn factors_a_product_of_two_small_primes() {
        assert_eq!(factor_decimal("91"), vec!["13".to_string(), "7".to_string()]);
    }

    #[test]
    fn factors_a_product_of_two_mid_size_primes() {
        assert_eq!(factor_decimal("2047"), vec!["23".to_string(), "89".to_string()]);
    }

    #[test]
    fn reports_a_prime_as_a_single_factor() {
        assert_eq!(factor_decimal("1000003"), vec!["1000003".to_string()]);
    }
}
