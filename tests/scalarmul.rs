//! Cross-checks between scalar multiplication strategies: every chain-based
//! multiplier on a "can add" curve form must agree on the same scalar, and
//! PRAC's Lucas-chain walk over a Montgomery curve must land on the same
//! `(X:Z)` ratio as a plain binary ladder built from the same differential
//! primitives.

use factorengine::bigint::expr::ModContext;
use factorengine::bigint::montgomery::MontgomeryCtx;
use factorengine::curves::generate;
use factorengine::curves::XzPoint;
use factorengine::scalarmul::{double_and_add, dynamic_naf, naf, prac, wnaf};

fn ctx_for(n: u64) -> MontgomeryCtx {
    MontgomeryCtx::new(&[n])
}

/// Projective equality for `(X:Z)` points: `x1*z2 == x2*z1`, without ever
/// inverting `z`.
fn xz_eq(ctx: &dyn ModContext, p: &XzPoint, q: &XzPoint) -> bool {
    let w = ctx.width();
    let mut lhs = vec![0u64; w];
    let mut rhs = vec![0u64; w];
    ctx.mul(&mut lhs, &p.x, &q.z);
    ctx.mul(&mut rhs, &q.x, &p.z);
    lhs == rhs
}

/// The classic RFC 7748-style Montgomery ladder: `R0 = P`, `R1 = 2P`, then
/// for every remaining bit from the second-highest down to the lowest,
/// a fused `ladder_step` either keeps or swaps which register leads.
/// Built directly from `diff_add`/`dbl` rather than through `CurveGroup`,
/// since an `(X:Z)`-only point has no `add` independent of a known
/// difference.
fn montgomery_ladder(
    curve: &factorengine::curves::montgomery_xz::MontgomeryXz,
    ctx: &dyn ModContext,
    base: &XzPoint,
    k: u64,
) -> XzPoint {
    assert!(k >= 2, "this ladder assumes at least one bit below the leading one");
    let bits = 64 - k.leading_zeros();
    let mut r0 = base.clone();
    let mut r1 = curve.dbl(ctx, base);
    for i in (0..bits - 1).rev() {
        let bit = (k >> i) & 1;
        if bit == 1 {
            let (new_r1, new_r0) = curve.ladder_step(ctx, &r1, &r0, base);
            r1 = new_r1;
            r0 = new_r0;
        } else {
            let (new_r0, new_r1) = curve.ladder_step(ctx, &r0, &r1, base);
            r0 = new_r0;
            r1 = new_r1;
        }
    }
    r0
}

#[test]
fn prac_matches_a_classic_montgomery_ladder() {
    let ctx = ctx_for(10403);
    let (curve, base) = generate::montgomery_initialize(&ctx, 6);

    let via_prac = prac::mul(&curve, &ctx, &base, 19);
    let via_ladder = montgomery_ladder(&curve, &ctx, &base, 19);

    assert!(xz_eq(&ctx, &via_prac, &via_ladder), "PRAC and the binary ladder disagree on 19*P");
}

#[test]
fn prac_matches_the_ladder_across_several_scalars() {
    let ctx = ctx_for(1_000_003 * 1_009);
    let (curve, base) = generate::montgomery_initialize(&ctx, generate::montgomery_default_seed());

    for k in [3u64, 7, 11, 17, 31, 97, 255] {
        let via_prac = prac::mul(&curve, &ctx, &base, k);
        let via_ladder = montgomery_ladder(&curve, &ctx, &base, k);
        assert!(xz_eq(&ctx, &via_prac, &via_ladder), "PRAC and the ladder disagree on {k}*P");
    }
}

#[test]
fn double_and_add_naf_and_wnaf_agree_on_short_weierstrass() {
    let ctx = ctx_for(1_000_003 * 1_009);
    let (curve, p) = generate::short_weierstrass_initialize(&ctx, generate::short_weierstrass_default_seed());

    for n in [5u64, 19, 97, 12345] {
        let baseline = double_and_add::mul(&curve, &ctx, &p, n);
        let via_naf = naf::mul(&curve, &ctx, &p, n);
        let via_wnaf3 = wnaf::mul(&curve, &ctx, &p, n, 3);
        let via_wnaf5 = wnaf::mul(&curve, &ctx, &p, n, 5);
        let via_dynamic = dynamic_naf::mul(&curve, &ctx, &p, n);

        assert!(sw_eq(&ctx, &baseline, &via_naf), "naf disagrees at n={n}");
        assert!(sw_eq(&ctx, &baseline, &via_wnaf3), "w=3 wnaf disagrees at n={n}");
        assert!(sw_eq(&ctx, &baseline, &via_wnaf5), "w=5 wnaf disagrees at n={n}");
        assert!(sw_eq(&ctx, &baseline, &via_dynamic), "dynamic naf disagrees at n={n}");
    }
}

#[test]
fn double_and_add_naf_and_wnaf_agree_on_twisted_edwards() {
    let ctx = ctx_for(1_000_003 * 1_009);
    let point = generate::twisted_edwards_initialize(&ctx, generate::twisted_edwards_default_seed());
    let curve = generate::derive_twisted_edwards_curve(&ctx, &point);

    for n in [5u64, 19, 97, 12345] {
        let baseline = double_and_add::mul(&curve, &ctx, &point, n);
        let via_naf = naf::mul(&curve, &ctx, &point, n);
        let via_wnaf4 = wnaf::mul(&curve, &ctx, &point, n, 4);
        let via_dynamic = dynamic_naf::mul(&curve, &ctx, &point, n);

        assert!(te_eq(&ctx, &baseline, &via_naf), "naf disagrees at n={n}");
        assert!(te_eq(&ctx, &baseline, &via_wnaf4), "w=4 wnaf disagrees at n={n}");
        assert!(te_eq(&ctx, &baseline, &via_dynamic), "dynamic naf disagrees at n={n}");
    }
}

#[test]
fn double_and_add_handles_the_zero_and_one_scalars() {
    let ctx = ctx_for(1_000_003 * 1_009);
    let (curve, p) = generate::short_weierstrass_initialize(&ctx, generate::short_weierstrass_default_seed());

    let zero = double_and_add::mul(&curve, &ctx, &p, 0);
    assert!(zero.is_identity());

    let one = double_and_add::mul(&curve, &ctx, &p, 1);
    assert!(sw_eq(&ctx, &one, &p));
}

fn sw_eq(ctx: &dyn ModContext, p: &factorengine::curves::SwPoint, q: &factorengine::curves::SwPoint) -> bool {
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

fn te_eq(ctx: &dyn ModContext, p: &factorengine::curves::TePoint, q: &factorengine::curves::TePoint) -> bool {
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
