//! Integration tests for the ECM driver across all three curve forms.

use factorengine::bigint::montgomery::MontgomeryCtx;
use factorengine::ecm::{run, CurveForm, EcmConfig, EcmConfigError, EcmOutcome};

fn ctx_for(n: u64) -> MontgomeryCtx {
    MontgomeryCtx::new(&[n])
}

fn expect_factor_of(n: u64, config: &EcmConfig) -> u64 {
    let ctx = ctx_for(n);
    match run(&ctx, config) {
        EcmOutcome::Factor(f) => f.to_decimal().parse::<u64>().unwrap(),
        EcmOutcome::Exhausted { curves_run } => {
            panic!("ECM should have found a factor of {n} within {curves_run} curves")
        }
    }
}

#[test]
fn twisted_edwards_factors_the_textbook_small_semiprime() {
    // 455839 = 599 * 761.
    let config = EcmConfig::new(1_000, 1_000, 50, CurveForm::TwistedEdwards);
    let f = expect_factor_of(455839, &config);
    assert!(f == 599 || f == 761, "unexpected factor {f}");
}

#[test]
fn short_weierstrass_factors_the_same_semiprime() {
    let config = EcmConfig::new(2_000, 2_000, 50, CurveForm::ShortWeierstrass);
    let f = expect_factor_of(455839, &config);
    assert!(f == 599 || f == 761, "unexpected factor {f}");
}

#[test]
fn montgomery_prac_factors_the_same_semiprime() {
    let config = EcmConfig::new(2_000, 2_000, 50, CurveForm::Montgomery);
    let f = expect_factor_of(455839, &config);
    assert!(f == 599 || f == 761, "unexpected factor {f}");
}

#[test]
fn stage_2_extends_reach_beyond_a_stage_1_only_run() {
    // 455839 = 599 * 761 again, but at a bound neither factor is B1-smooth
    // at on its own: 598 = 2*13*23 and 760 = 2^3*5*19, so with B1 = 15
    // Stage 1 alone never hits either one. Stage 2 picks up the single
    // remaining prime factor (23 or 19) as long as it falls at or below B2.
    let config = EcmConfig::new(15, 50, 300, CurveForm::TwistedEdwards);
    let f = expect_factor_of(455839, &config);
    assert!(f == 599 || f == 761, "unexpected factor {f}");
}

#[test]
fn validate_rejects_a_stage_2_bound_below_stage_1() {
    let mut config = EcmConfig::new(100, 100, 10, CurveForm::TwistedEdwards);
    config.b2 = 50;
    assert!(matches!(config.validate(), Err(EcmConfigError::B2BelowB1)));
}

#[test]
fn validate_rejects_zero_curves() {
    let config = EcmConfig::new(100, 100, 0, CurveForm::TwistedEdwards);
    assert!(matches!(config.validate(), Err(EcmConfigError::NoCurves)));
}

#[test]
fn validate_accepts_a_well_formed_config() {
    let config = EcmConfig::new(100, 200, 10, CurveForm::Montgomery);
    assert!(config.validate().is_ok());
}
