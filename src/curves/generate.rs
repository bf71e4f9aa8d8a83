//! Curve and starting-point generation for each supported form.
//!
//! Both generators below turn a single integer seed into a curve plus a
//! point guaranteed to lie on it, without ever computing a square root —
//! the standard trick ECM implementations use to avoid needing the
//! Tonelli-Shanks machinery a general "pick a random point" approach would
//! require.

use crate::bigint::expr::ModContext;
use crate::curves::montgomery_xz::MontgomeryXz;
use crate::curves::sw::ShortWeierstrass;
use crate::curves::{SwPoint, XzPoint};
use crate::scalarmul::double_and_add;

/// Brent-Suyama parametrization of a Montgomery curve from a single
/// parameter `sigma`: `u = sigma^2 - 5`, `v = 4*sigma`,
/// `a = (v-u)^3 (3u+v) / (4 u^3 v)`, `a24 = (a+2)/4`, starting point
/// `(u^3 : v^3)`. Ported from `generateCurvePoint` in the original's
/// `montgomery.h` — the `a24 = a >> 2` there is exact because the formula
/// there computes `a + 2` directly rather than `a` followed by a
/// subtraction.
pub fn montgomery_curve_point(ctx: &dyn ModContext, sigma: &[u64]) -> (Vec<u64>, XzPoint) {
    let c5 = ctx.get_constant(5);

    let mut u = vec![0u64; ctx.width()];
    {
        let mut sigma_sq = vec![0u64; ctx.width()];
        ctx.sqr(&mut sigma_sq, sigma);
        ctx.sub(&mut u, &sigma_sq, &c5);
    }

    let mut v = vec![0u64; ctx.width()];
    {
        let mut two_sigma = vec![0u64; ctx.width()];
        ctx.dbl(&mut two_sigma, sigma);
        ctx.dbl(&mut v, &two_sigma);
    }

    let mut v_minus_u = vec![0u64; ctx.width()];
    ctx.sub(&mut v_minus_u, &v, &u);

    let mut three_u_plus_v = vec![0u64; ctx.width()];
    {
        let mut two_u = vec![0u64; ctx.width()];
        ctx.dbl(&mut two_u, &u);
        let mut three_u = vec![0u64; ctx.width()];
        ctx.add(&mut three_u, &two_u, &u);
        ctx.add(&mut three_u_plus_v, &three_u, &v);
    }

    let mut u3 = vec![0u64; ctx.width()];
    {
        let mut u_sq = vec![0u64; ctx.width()];
        ctx.sqr(&mut u_sq, &u);
        ctx.mul(&mut u3, &u_sq, &u);
    }

    // 1 / (4 u^3 v)
    let mut inv_4u3v = vec![0u64; ctx.width()];
    {
        let mut four_u3 = vec![0u64; ctx.width()];
        {
            let mut two_u3 = vec![0u64; ctx.width()];
            ctx.dbl(&mut two_u3, &u3);
            ctx.dbl(&mut four_u3, &two_u3);
        }
        let mut four_u3_v = vec![0u64; ctx.width()];
        ctx.mul(&mut four_u3_v, &four_u3, &v);
        ctx.inv(&mut inv_4u3v, &four_u3_v);
    }

    // a + 2 = (v-u)^3 (3u+v) / (4u^3 v)
    let mut a_plus_2 = vec![0u64; ctx.width()];
    {
        let mut vmu_sq = vec![0u64; ctx.width()];
        ctx.sqr(&mut vmu_sq, &v_minus_u);
        let mut vmu_cubed = vec![0u64; ctx.width()];
        ctx.mul(&mut vmu_cubed, &vmu_sq, &v_minus_u);
        let mut numerator = vec![0u64; ctx.width()];
        ctx.mul(&mut numerator, &vmu_cubed, &three_u_plus_v);
        ctx.mul(&mut a_plus_2, &numerator, &inv_4u3v);
    }

    // a24 = (a+2) / 4 mod n. The original shifts the in-register value
    // right by two bits, which is valid there because its modular integer
    // type's `>>=` operator is a modular halving (multiply by the inverse
    // of 2), not a bit truncation — n is always odd, so 4 is invertible.
    let mut a24 = vec![0u64; ctx.width()];
    {
        let c4 = ctx.get_constant(4);
        let mut inv4 = vec![0u64; ctx.width()];
        ctx.inv(&mut inv4, &c4);
        ctx.mul(&mut a24, &a_plus_2, &inv4);
    }

    let mut px = vec![0u64; ctx.width()];
    px.copy_from_slice(&u3);
    let mut pz = vec![0u64; ctx.width()];
    {
        let mut v_sq = vec![0u64; ctx.width()];
        ctx.sqr(&mut v_sq, &v);
        ctx.mul(&mut pz, &v_sq, &v);
    }

    (a24, XzPoint { x: px, z: pz })
}

/// The auxiliary short Weierstrass curve and generator point the twisted
/// Edwards generator multiplies by the seed before applying the birational
/// map: `a = -9747`, `P = (15 : 378 : 1)`, matching
/// `ShortWeierstrassProjective`'s defaults in the original.
fn auxiliary_curve(ctx: &dyn ModContext) -> (ShortWeierstrass, SwPoint) {
    let curve = ShortWeierstrass { a: fixed_sw_a(ctx) };
    let point = SwPoint {
        x: ctx.get_constant(15),
        y: ctx.get_constant(378),
        z: ctx.get_constant(1),
    };
    (curve, point)
}

fn fixed_sw_a(ctx: &dyn ModContext) -> Vec<u64> {
    let n = ctx.get_constant(9747);
    let mut neg = vec![0u64; ctx.width()];
    ctx.neg(&mut neg, &n);
    neg
}

/// Seed ECM starts a short Weierstrass curve search from, matching the
/// convention of the other two forms (a small integer, incremented by one
/// to try the next curve).
pub fn short_weierstrass_default_seed() -> u64 {
    2
}

/// Generates a short Weierstrass curve and point from seed `k`.
///
/// `ShortWeierstrass::add`/`dbl` never reference `b` (see `curves::sw`'s
/// doc comment) — the curve equation's `b` is whatever value makes `(x, y,
/// 1)` consistent, and it never needs to be computed, since the group law
/// only reads `a`. This generator keeps the original's fixed `a = -9747`
/// (the same constant it uses as its twisted-Edwards auxiliary curve, see
/// [`auxiliary_curve`]) and varies the point's `(x, y)` with the seed, the
/// standard "random curve" ECM strategy: the resulting curves differ in
/// their implicit `b`, hence in group order, while keeping the single
/// curve-dependent coefficient the formulas actually use fixed. The
/// original's own source was not found pairing a *generic* short
/// Weierstrass form with ECM (only the Suyama Montgomery and an Edwards
/// birational map); this is the supplemented generator for that form.
pub fn short_weierstrass_initialize(ctx: &dyn ModContext, seed: u64) -> (ShortWeierstrass, SwPoint) {
    let curve = ShortWeierstrass { a: fixed_sw_a(ctx) };
    let point = SwPoint {
        x: ctx.get_constant(seed),
        y: ctx.get_constant(seed.wrapping_add(1)),
        z: ctx.get_constant(1),
    };
    (curve, point)
}

/// Generates a twisted Edwards curve point from seed `k` (`k != 0`).
///
/// Ported from `twistedEdwardsGenerateCurvePoint`'s `Old` parametrization:
/// walk `k * (15, 378, 1)` on the auxiliary curve `a = -9747`, then apply a
/// fixed birational map built from the constants `9747, 15, 378, 1, 144,
/// 2985984 (= 144^3), 96, 5`. `d2` (the caller-visible `2d` curve constant)
/// is not produced here — the original only ever uses this to seed curves
/// whose `d` is implied by context, so callers that need `TwistedEdwards`
/// must supply `d2` separately.
pub fn twisted_edwards_curve_point(ctx: &dyn ModContext, k: u64) -> crate::curves::TePoint {
    debug_assert!(k != 0);

    let (aux_curve, aux_point) = auxiliary_curve(ctx);
    let t = double_and_add::mul(&aux_curve, ctx, &aux_point, k);

    let c144 = ctx.get_constant(144);
    let c2985984 = ctx.get_constant(2_985_984);
    let c96 = ctx.get_constant(96);
    let c5 = ctx.get_constant(5);

    let w = ctx.width();

    let u_coord = {
        let mut three_tz = vec![0u64; w];
        {
            let mut two_tz = vec![0u64; w];
            ctx.dbl(&mut two_tz, &t.z);
            ctx.add(&mut three_tz, &two_tz, &t.z);
        }
        let mut sum = vec![0u64; w];
        ctx.add(&mut sum, &t.x, &three_tz);
        let mut out = vec![0u64; w];
        ctx.mul(&mut out, &sum, &c144);
        out
    };
    let v_coord = t.y.clone();
    let w_coord = {
        let mut out = vec![0u64; w];
        ctx.mul(&mut out, &c2985984, &t.z);
        out
    };

    let r0 = {
        let mut out = vec![0u64; w];
        ctx.mul(&mut out, &c96, &u_coord);
        out
    };
    let r1 = {
        let mut out = vec![0u64; w];
        ctx.sub(&mut out, &w_coord, &r0);
        out
    };
    let r2 = {
        let mut out = vec![0u64; w];
        ctx.sqr(&mut out, &r1);
        out
    };
    let r3 = {
        let mut out = vec![0u64; w];
        ctx.sqr(&mut out, &r0);
        out
    };
    let r7 = {
        let mut two_r1 = vec![0u64; w];
        ctx.dbl(&mut two_r1, &r1);
        let mut out = vec![0u64; w];
        ctx.dbl(&mut out, &two_r1);
        out
    };

    let mut tx_new = vec![0u64; w];
    ctx.sub(&mut tx_new, &r1, &r0);
    {
        let mut five_r0 = vec![0u64; w];
        ctx.mul(&mut five_r0, &c5, &r0);
        let mut factor = vec![0u64; w];
        ctx.add(&mut factor, &five_r0, &r1);
        let mut out = vec![0u64; w];
        ctx.mul(&mut out, &tx_new, &factor);
        tx_new = out;
    }

    let five_r3 = {
        let mut out = vec![0u64; w];
        ctx.mul(&mut out, &c5, &r3);
        out
    };
    let mut ty_new = vec![0u64; w];
    ctx.sub(&mut ty_new, &r2, &five_r3);
    {
        let mut factor = vec![0u64; w];
        ctx.add(&mut factor, &five_r3, &r2);
        let mut out = vec![0u64; w];
        ctx.mul(&mut out, &tx_new, &factor);
        tx_new = out;
    }
    {
        let mut ty_sq = vec![0u64; w];
        ctx.sqr(&mut ty_sq, &ty_new);
        let mut out = vec![0u64; w];
        ctx.mul(&mut out, &ty_new, &ty_sq);
        ty_new = out;
    }

    let tt = {
        let mut r7r0 = vec![0u64; w];
        ctx.mul(&mut r7r0, &r7, &r0);
        let mut sq = vec![0u64; w];
        ctx.sqr(&mut sq, &r7r0);
        let mut out = vec![0u64; w];
        ctx.mul(&mut out, &sq, &r7r0);
        out
    };

    let scale_z = {
        let mut u_sq = vec![0u64; w];
        ctx.sqr(&mut u_sq, &u_coord);
        let mut out = vec![0u64; w];
        ctx.mul(&mut out, &u_sq, &tx_new);
        out
    };

    let scale_x = {
        let s2 = {
            let mut out = vec![0u64; w];
            ctx.mul(&mut out, &r3, &r0);
            out
        };
        let mut r1_final = vec![0u64; w];
        ctx.mul(&mut r1_final, &r1, &s2);
        let mut tmp = vec![0u64; w];
        ctx.mul(&mut tmp, &r1_final, &v_coord);
        ctx.mul(&mut r1_final, &tmp, &w_coord);
        let mut doubled = vec![0u64; w];
        ctx.dbl(&mut doubled, &r1_final);
        doubled
    };

    let pz_pre = {
        let mut out = vec![0u64; w];
        ctx.add(&mut out, &ty_new, &tt);
        out
    };
    let py_pre = {
        let mut out = vec![0u64; w];
        ctx.sub(&mut out, &ty_new, &tt);
        out
    };

    let mut x = vec![0u64; w];
    ctx.mul(&mut x, &pz_pre, &scale_x);
    let mut y = vec![0u64; w];
    ctx.mul(&mut y, &py_pre, &scale_z);
    let mut z = vec![0u64; w];
    ctx.mul(&mut z, &pz_pre, &scale_z);
    let mut tcoord = vec![0u64; w];
    ctx.mul(&mut tcoord, &py_pre, &scale_x);

    crate::curves::TePoint { x, y, z, t: tcoord }
}

/// Seed ECM starts a Montgomery curve search from, matching
/// `MontgomeryXZ::defaultSeed`.
pub fn montgomery_default_seed() -> u64 {
    6
}

/// Builds the curve and starting point for seed `sigma`.
pub fn montgomery_initialize(ctx: &dyn ModContext, sigma: u64) -> (MontgomeryXz, XzPoint) {
    let sigma_residue = ctx.get_constant(sigma);
    let (a24, point) = montgomery_curve_point(ctx, &sigma_residue);
    (MontgomeryXz { a24 }, point)
}

/// Seed ECM starts a twisted Edwards curve search from. The original's
/// per-form `initializeCurveAndPoint`/`generateNewCurveAndPoint` struct for
/// this form was not found alongside `twistedEdwardsGenerateCurvePoint`
/// (only the short Weierstrass and Montgomery ones were); this mirrors the
/// short Weierstrass convention (`ShortWeierstrassProjective::defaultSeed`
/// returns 2, each regeneration adds 1) since both walk an integer seed
/// through a fixed generator point rather than sampling randomly.
pub fn twisted_edwards_default_seed() -> u64 {
    2
}

/// Builds the curve point for seed `k`; `d2` must be supplied by the caller
/// to assemble a [`crate::curves::te::TwistedEdwards`] (see
/// [`twisted_edwards_curve_point`]'s doc comment).
pub fn twisted_edwards_initialize(ctx: &dyn ModContext, k: u64) -> crate::curves::TePoint {
    twisted_edwards_curve_point(ctx, k)
}

/// Recovers the curve parameter `d2 = 2d mod n` that the point generated by
/// [`twisted_edwards_curve_point`] actually lies on, from the extended-
/// coordinate equation `-X^2 Z^2 + Y^2 Z^2 = Z^4 + d X^2 Y^2`.
///
/// The birational map in the original's `twistedEdwardsGenerateCurvePoint`
/// produces a point without separately returning the `d` its curve uses
/// (unlike the Montgomery and short-Weierstrass generators, which hand back
/// `a24`/`a` alongside the point) — `_twistedEdwardsAddsub` in
/// `twistedEdwards.h` folds `d` into the point's own `Z`/`T` cross terms
/// instead of taking it as a curve constant. [`crate::curves::te`] is
/// ported from the explicit-`d2` formulas in `ed25519::group` instead, so
/// this solves for the `d2` those formulas need directly from the point's
/// own coordinates: exactly one curve-defining equation, one unknown.
pub fn derive_twisted_edwards_curve(ctx: &dyn ModContext, point: &crate::curves::TePoint) -> crate::curves::te::TwistedEdwards {
    let w = ctx.width();

    let mut x2 = vec![0u64; w];
    ctx.sqr(&mut x2, &point.x);
    let mut y2 = vec![0u64; w];
    ctx.sqr(&mut y2, &point.y);
    let mut z2 = vec![0u64; w];
    ctx.sqr(&mut z2, &point.z);
    let mut z4 = vec![0u64; w];
    ctx.sqr(&mut z4, &z2);

    let mut y2z2 = vec![0u64; w];
    ctx.mul(&mut y2z2, &y2, &z2);
    let mut x2z2 = vec![0u64; w];
    ctx.mul(&mut x2z2, &x2, &z2);

    let mut numerator = vec![0u64; w];
    {
        let mut tmp = vec![0u64; w];
        ctx.sub(&mut tmp, &y2z2, &x2z2);
        ctx.sub(&mut numerator, &tmp, &z4);
    }

    let mut denominator = vec![0u64; w];
    ctx.mul(&mut denominator, &x2, &y2);
    let mut inv_denominator = vec![0u64; w];
    ctx.inv(&mut inv_denominator, &denominator);

    let mut d = vec![0u64; w];
    ctx.mul(&mut d, &numerator, &inv_denominator);
    let mut d2 = vec![0u64; w];
    ctx.dbl(&mut d2, &d);

    crate::curves::te::TwistedEdwards { d2 }
}
