//! Integration tests for curve/point generation and the basic group-law
//! identities each form's `add`/`dbl` must satisfy.

use factorengine::bigint::expr::ModContext;
use factorengine::bigint::montgomery::MontgomeryCtx;
use factorengine::curves::{generate, SwPoint, TePoint};

fn ctx_for(n: u64) -> MontgomeryCtx {
    MontgomeryCtx::new(&[n])
}

/// `x1*z2 == x2*z1` and `y1*z2 == y2*z1`: projective equality for
/// short Weierstrass points, without ever dividing by `z`.
fn sw_eq(ctx: &MontgomeryCtx, p: &SwPoint, q: &SwPoint) -> bool {
    let w = ctx.width();
    let mut lhs = vec![0u64; w];
    let mut rhs = vec![0u64; w];
    ctx.mul(&mut lhs, &p.x, &q.z);
    ctx.mul(&mut rhs, &q.x, &p.z);
    if lhs != rhs {
        return false;
    }
    ctx.mul(&mut lhs, &p.y, &q.z);
    ctx.mul(&mut rhs, &q.y, &p.z);
    lhs == rhs
}

fn te_eq(ctx: &MontgomeryCtx, p: &TePoint, q: &TePoint) -> bool {
    let w = ctx.width();
    let mut lhs = vec![0u64; w];
    let mut rhs = vec![0u64; w];
    ctx.mul(&mut lhs, &p.x, &q.z);
    ctx.mul(&mut rhs, &q.x, &p.z);
    if lhs != rhs {
        return false;
    }
    ctx.mul(&mut lhs, &p.y, &q.z);
    ctx.mul(&mut rhs, &q.y, &p.z);
    lhs == rhs
}

#[test]
fn short_weierstrass_doubling_matches_self_addition() {
    let ctx = ctx_for(1_000_003 * 1_009);
    let (curve, p) = generate::short_weierstrass_initialize(&ctx, generate::short_weierstrass_default_seed());
    let doubled = curve.dbl(&ctx, &p);
    let added = curve.add(&ctx, &p, &p);
    assert!(sw_eq(&ctx, &doubled, &added));
}

#[test]
fn short_weierstrass_adding_the_identity_is_a_no_op() {
    let ctx = ctx_for(1_000_003 * 1_009);
    let (curve, p) = generate::short_weierstrass_initialize(&ctx, generate::short_weierstrass_default_seed());
    let identity = SwPoint::identity(&ctx);
    let sum = curve.add(&ctx, &p, &identity);
    assert!(sw_eq(&ctx, &sum, &p));
}

#[test]
fn short_weierstrass_subtracting_a_point_from_itself_gives_the_identity() {
    let ctx = ctx_for(1_000_003 * 1_009);
    let (curve, p) = generate::short_weierstrass_initialize(&ctx, generate::short_weierstrass_default_seed());
    let diff = curve.sub(&ctx, &p, &p);
    assert!(diff.is_identity());
}

#[test]
fn twisted_edwards_doubling_matches_self_addition() {
    let ctx = ctx_for(1_000_003 * 1_009);
    let point = generate::twisted_edwards_initialize(&ctx, generate::twisted_edwards_default_seed());
    let curve = generate::derive_twisted_edwards_curve(&ctx, &point);
    let doubled = curve.dbl(&ctx, &point);
    let added = curve.add(&ctx, &point, &point);
    assert!(te_eq(&ctx, &doubled, &added));
}

#[test]
fn twisted_edwards_tripling_matches_double_then_add() {
    let ctx = ctx_for(1_000_003 * 1_009);
    let point = generate::twisted_edwards_initialize(&ctx, generate::twisted_edwards_default_seed());
    let curve = generate::derive_twisted_edwards_curve(&ctx, &point);
    let tripled = curve.tpl(&ctx, &point);
    let doubled = curve.dbl(&ctx, &point);
    let via_add = curve.add(&ctx, &doubled, &point);
    assert!(te_eq(&ctx, &tripled, &via_add));
}

#[test]
fn twisted_edwards_adding_the_identity_is_a_no_op() {
    let ctx = ctx_for(1_000_003 * 1_009);
    let point = generate::twisted_edwards_initialize(&ctx, generate::twisted_edwards_default_seed());
    let curve = generate::derive_twisted_edwards_curve(&ctx, &point);
    let identity = TePoint::identity(&ctx);
    let sum = curve.add(&ctx, &point, &identity);
    assert!(te_eq(&ctx, &sum, &point));
}

#[test]
fn montgomery_point_generation_succeeds_for_several_seeds() {
    let ctx = ctx_for(1_000_003 * 1_009);
    for sigma in 6..12u64 {
        let (curve, point) = generate::montgomery_initialize(&ctx, sigma);
        let doubled = curve.dbl(&ctx, &point);
        assert_eq!(doubled.x.len(), ctx.width());
    }
}
