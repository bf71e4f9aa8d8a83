//! Top-level ECM driver: runs a batch of curves at a fixed `(B1, B2)` pair
//! against one modulus, stopping the instant a nontrivial factor turns up.
//!
//! Ported from `ecm_` in the original's `Factorization/Ecm/ecm.h`: pick a
//! curve form, compile Stage 1 once (it only depends on `B1`, the multiplier
//! strategy and the cascade strategy — never on the curve itself), then for
//! each curve initialize a fresh curve and point, run Stage 1, check
//! `gcd(z, n)`, optionally run Stage 2, and move on to the next seed.

pub mod stage1;
pub mod stage2;

use crate::bigint::arb::BignumArb;
use crate::bigint::expr::ModContext;
use crate::bigint::limbs;
use crate::bigint::Number;
use crate::bytecode::vm;
use crate::curves::generate;
use crate::curves::{SwPoint, TePoint};
use crate::ecm::stage1::{CascadeStrategy, CompiledStage1, MulMethod};
use crate::scalarmul::CurveGroup;
use std::cmp::Ordering;

/// Which curve family to run ECM over. Montgomery `(X:Z)` points have no
/// `add`, so they can only ever be driven through [`MulMethod::Prac`]; the
/// other two forms support the full [`CurveGroup`] interface and so accept
/// any of the remaining multiplier strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurveForm {
    ShortWeierstrass,
    TwistedEdwards,
    Montgomery,
}

impl CurveForm {
    /// The multiplier strategy the original reaches for by default on this
    /// form: Montgomery always runs PRAC, the group-law forms default to
    /// the cost-adaptive dynamic NAF.
    pub fn default_method(self) -> MulMethod {
        match self {
            CurveForm::Montgomery => MulMethod::Prac,
            CurveForm::ShortWeierstrass | CurveForm::TwistedEdwards => MulMethod::DynamicNaf,
        }
    }

    /// `(dblCost, addCost, intermediateDblCost, intermediateAddCost)`,
    /// mirroring the constants [`CurveGroup::naf_cost_params`] reports for
    /// each form — duplicated here (rather than instantiating a throwaway
    /// curve) because Stage 1 is compiled once, before any curve exists.
    fn cost_params(self) -> (i32, i32, i32, i32) {
        match self {
            CurveForm::ShortWeierstrass => (12, 14, 12, 14),
            CurveForm::TwistedEdwards => (8, 8, 8, 8),
            CurveForm::Montgomery => (0, 0, 0, 0), // unused: Montgomery only ever runs Prac
        }
    }
}

/// Configuration for one [`run`] call.
#[derive(Clone, Debug)]
pub struct EcmConfig {
    pub b1: u64,
    pub b2: u64,
    pub curve_count: u32,
    pub curve_form: CurveForm,
    pub method: MulMethod,
    pub cascade: CascadeStrategy,
    /// Starting curve seed; `None` uses the form's default
    /// (`short_weierstrass_default_seed`/`twisted_edwards_default_seed`/
    /// `montgomery_default_seed`), incrementing by one per curve tried.
    pub initial_curve_seed: Option<u64>,
}

/// Errors a [`EcmConfig`] can fail [`EcmConfig::validate`] with.
#[derive(Debug)]
pub enum EcmConfigError {
    /// `b2 < b1`: Stage 2 cannot extend a smoothness bound backwards.
    B2BelowB1,
    /// `curve_count == 0`: there would be nothing to run.
    NoCurves,
}

impl EcmConfig {
    pub fn new(b1: u64, b2: u64, curve_count: u32, curve_form: CurveForm) -> Self {
        Self {
            b1,
            b2,
            curve_count,
            method: curve_form.default_method(),
            cascade: CascadeStrategy::Separate,
            initial_curve_seed: None,
            curve_form,
        }
    }

    pub fn validate(&self) -> Result<(), EcmConfigError> {
        if self.b2 < self.b1 {
            return Err(EcmConfigError::B2BelowB1);
        }
        if self.curve_count == 0 {
            return Err(EcmConfigError::NoCurves);
        }
        Ok(())
    }
}

/// Outcome of a full ECM run against one modulus.
#[derive(Debug)]
pub enum EcmOutcome {
    Factor(Number),
    Exhausted { curves_run: u32 },
}

/// `1 < g < n`: `g` is a usable factor rather than the trivial `gcd`
/// results `1` (no luck yet) or `n` (Stage 1 ran the point to the identity,
/// a "bad" curve that must be discarded rather than reported).
fn is_nontrivial_factor(g: &[u64], modulus: &[u64]) -> bool {
    let g = BignumArb::from_limbs(g.to_vec());
    let n = BignumArb::from_limbs(modulus.to_vec());
    let one = BignumArb::from_u64(1);
    g.cmp_value(&one) == Ordering::Greater && g.cmp_value(&n) == Ordering::Less
}

/// Runs ECM per `config` against the modulus `ctx` was built for.
pub fn run(ctx: &dyn ModContext, config: &EcmConfig) -> EcmOutcome {
    debug_assert_eq!(
        config.method.is_prac(),
        config.curve_form == CurveForm::Montgomery,
        "Prac only drives a Montgomery curve; every other form needs a CurveGroup-compatible method"
    );

    let compiled = stage1::compile_stage1(
        config.b1,
        config.method,
        config.cascade,
        config.curve_form.cost_params(),
        ctx.width(),
    );

    match config.curve_form {
        CurveForm::Montgomery => run_montgomery(ctx, config, &compiled),
        CurveForm::ShortWeierstrass => {
            let seed = config.initial_curve_seed.unwrap_or_else(generate::short_weierstrass_default_seed);
            run_group_form(
                ctx,
                config,
                &compiled,
                seed,
                |s| generate::short_weierstrass_initialize(ctx, s),
                |p: &SwPoint| p.z.clone(),
            )
        }
        CurveForm::TwistedEdwards => {
            let seed = config.initial_curve_seed.unwrap_or_else(generate::twisted_edwards_default_seed);
            run_group_form(
                ctx,
                config,
                &compiled,
                seed,
                |s| {
                    let point = generate::twisted_edwards_curve_point(ctx, s);
                    let curve = generate::derive_twisted_edwards_curve(ctx, &point);
                    (curve, point)
                },
                |p: &TePoint| p.z.clone(),
            )
        }
    }
}

/// Drives every "can add" curve form (short Weierstrass, twisted Edwards)
/// through the same Stage-1/gcd/Stage-2 loop, parameterised only by how a
/// fresh curve and point are generated from a seed and how a point's `z`
/// is read out.
fn run_group_form<C, P>(
    ctx: &dyn ModContext,
    config: &EcmConfig,
    compiled: &CompiledStage1,
    mut seed: u64,
    mut make_curve_point: impl FnMut(u64) -> (C, P),
    z_of: impl Fn(&P) -> Vec<u64>,
) -> EcmOutcome
where
    C: CurveGroup<P>,
    P: Clone,
{
    for _ in 0..config.curve_count {
        let (curve, mut point) = make_curve_point(seed);
        seed = seed.wrapping_add(1);

        if let Some(preamble) = &compiled.preamble {
            point = vm::run_group(&curve, ctx, &point, preamble);
        }
        for block in &compiled.blocks {
            point = vm::run_group(&curve, ctx, &point, block);
        }

        let g = limbs::gcd(&z_of(&point), ctx.modulus());
        if is_nontrivial_factor(&g, ctx.modulus()) {
            return EcmOutcome::Factor(Number::Arb(BignumArb::from_limbs(g)).fit_to_size());
        }

        if config.b2 > config.b1 {
            let width = ctx.width();
            let running = stage2::run(
                &curve,
                ctx,
                &mut point,
                config.b1,
                config.b2,
                config.method,
                |p| z_of(p),
                |a, b| {
                    let mut r = vec![0u64; width];
                    ctx.mul(&mut r, a, b);
                    r
                },
            );
            let g2 = limbs::gcd(&running, ctx.modulus());
            if is_nontrivial_factor(&g2, ctx.modulus()) {
                return EcmOutcome::Factor(Number::Arb(BignumArb::from_limbs(g2)).fit_to_size());
            }
        }
    }
    EcmOutcome::Exhausted { curves_run: config.curve_count }
}

/// Drives the Montgomery form through the same loop, minus Stage 2 — the
/// original's stage-2 walk `debugAssert(false)`s the instant it would need
/// to add two `(X:Z)` points without a known difference, so a Montgomery
/// curve here never gets offered one (see [`stage2::run`]'s doc comment).
fn run_montgomery(ctx: &dyn ModContext, config: &EcmConfig, compiled: &CompiledStage1) -> EcmOutcome {
    let mut seed = config.initial_curve_seed.unwrap_or_else(generate::montgomery_default_seed);

    for _ in 0..config.curve_count {
        let (curve, mut point) = generate::montgomery_initialize(ctx, seed);
        seed = seed.wrapping_add(1);

        if let Some(preamble) = &compiled.preamble {
            point = vm::run_prac(&curve, ctx, &point, preamble);
        }
        for block in &compiled.blocks {
            point = vm::run_prac(&curve, ctx, &point, block);
        }

        let g = limbs::gcd(&point.z, ctx.modulus());
        if is_nontrivial_factor(&g, ctx.modulus()) {
            return EcmOutcome::Factor(Number::Arb(BignumArb::from_limbs(g)).fit_to_size());
        }
    }
    EcmOutcome::Exhausted { curves_run: config.curve_count }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bigint::montgomery::MontgomeryCtx;

    #[test]
    fn factors_a_small_semiprime_with_twisted_edwards() {
        // 455839 = 599 * 761, the textbook small ECM example.
        let n = vec![455839u64];
        let ctx = MontgomeryCtx::new(&n);
        let config = EcmConfig::new(2_000, 2_000, 50, CurveForm::TwistedEdwards);
        match run(&ctx, &config) {
            EcmOutcome::Factor(f) => {
                let f = f.to_decimal().parse::<u64>().unwrap();
                assert!(f == 599 || f == 761, "unexpected factor {f}");
            }
            EcmOutcome::Exhausted { .. } => panic!("ECM should have found a factor of 455839"),
        }
    }

    #[test]
    fn montgomery_prac_runs_without_panicking() {
        let n = vec![1_000_003u64 * 1_009u64];
        let ctx = MontgomeryCtx::new(&n);
        let config = EcmConfig::new(200, 200, 20, CurveForm::Montgomery);
        run(&ctx, &config);
    }
}
