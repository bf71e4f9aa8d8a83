//! PRAC: Montgomery's 1992 Lucas-chain addition chain for curves that can
//! only be walked differentially (`diffAdd`/`dbl`, no plain `add`).
//!
//! Ported from `lucasCost`/`prac`. `val[0..10]` are the golden-ratio-family
//! constants from the original (continued fractions of all 1s except a 2 in
//! one place); `lucas_cost` estimates the chain length for each candidate so
//! `prac` can pick whichever produces the fewest Montgomery multiplications
//! for this particular scalar, the same per-call tuning the original does
//! before walking Table 4's nine chain-step rules.

use crate::bigint::expr::ModContext;
use crate::curves::montgomery_xz::MontgomeryXz;
use crate::curves::XzPoint;

const MONTGOMERY_ADD_COST: f64 = 6.0;
const MONTGOMERY_DBL_COST: f64 = 5.0;

pub(crate) const VAL: [f64; 10] = [
    0.61803398874989485,
    0.72360679774997897,
    0.58017872829546410,
    0.63283980608870629,
    0.61242994950949500,
    0.62018198080741576,
    0.61721461653440386,
    0.61834711965622806,
    0.61791440652881789,
    0.61807966846989581,
];

pub(crate) fn lucas_cost(n: u64, v: f64) -> f64 {
    let mut d = n;
    let mut r = (d as f64 * v + 0.5) as u64;
    if r >= n {
        return MONTGOMERY_ADD_COST * n as f64;
    }
    d = n - r;
    let mut e = 2 * r - n;
    let mut c = MONTGOMERY_DBL_COST + MONTGOMERY_ADD_COST;

    while d != e {
        if d < e {
            std::mem::swap(&mut d, &mut e);
        }
        if d - e <= e / 4 && (d + e) % 3 == 0 {
            let new_d = (2 * d - e) / 3;
            e = (e - new_d) / 2;
            d = new_d;
            c += 3.0 * MONTGOMERY_ADD_COST;
        } else if d - e <= e / 4 && (d - e) % 6 == 0 {
            d = (d - e) / 2;
            c += MONTGOMERY_ADD_COST + MONTGOMERY_DBL_COST;
        } else if (d + 3) / 4 <= e {
            d -= e;
            c += MONTGOMERY_ADD_COST;
        } else if (d + e) % 2 == 0 {
            d = (d - e) / 2;
            c += MONTGOMERY_ADD_COST + MONTGOMERY_DBL_COST;
        } else if d % 2 == 0 {
            d /= 2;
            c += MONTGOMERY_ADD_COST + MONTGOMERY_DBL_COST;
        } else if d % 3 == 0 {
            d = d / 3 - e;
            c += 3.0 * MONTGOMERY_ADD_COST + MONTGOMERY_DBL_COST;
        } else if (d + e) % 3 == 0 {
            d = (d - 2 * e) / 3;
            c += 3.0 * MONTGOMERY_ADD_COST + MONTGOMERY_DBL_COST;
        } else if (d - e) % 3 == 0 {
            d = (d - e) / 3;
            c += 3.0 * MONTGOMERY_ADD_COST + MONTGOMERY_DBL_COST;
        } else {
            e /= 2;
            c += MONTGOMERY_ADD_COST + MONTGOMERY_DBL_COST;
        }
    }
    c
}

/// Picks the golden-ratio-family constant that minimises `lucas_cost` for
/// this `k`, the same per-call tuning `prac` does before walking the chain,
/// and returns the resulting starting `(d, e)` pair.
pub(crate) fn initial_d_e(k: u64, width: usize) -> (u64, u64) {
    let nv = (VAL.len() as u64).min(width as u64) as usize;
    let mut best_i = 0;
    if nv > 1 {
        let mut cmin = MONTGOMERY_ADD_COST * k as f64;
        for (d, &v) in VAL.iter().take(nv).enumerate() {
            let c = lucas_cost(k, v);
            if c < cmin {
                cmin = c;
                best_i = d;
            }
        }
    }

    let r = (k as f64 * VAL[best_i] + 0.5) as u64;
    (k - r, 2 * r - k)
}

/// Computes `k * p` via a Lucas addition chain. `k` must be greater than 2 —
/// callers pre-double past small factors of two before switching to PRAC,
/// exactly as the original's stage-1 driver does.
pub fn mul(curve: &MontgomeryXz, ctx: &dyn ModContext, p: &XzPoint, k: u64) -> XzPoint {
    debug_assert!(k > 2);

    let (mut d, mut e) = initial_d_e(k, ctx.width());

    let mut a = p.clone();
    let mut b = p.clone();
    let mut c = p.clone();

    a = curve.dbl(ctx, &a);

    while d != e {
        if d < e {
            std::mem::swap(&mut d, &mut e);
            std::mem::swap(&mut a, &mut b);
        }
        if d - e <= e / 4 && (d + e) % 3 == 0 {
            let new_d = (2 * d - e) / 3;
            e = (e - new_d) / 2;
            d = new_d;
            let t = curve.diff_add(ctx, &a, &b, &c);
            let u = curve.diff_add(ctx, &t, &a, &b);
            b = curve.diff_add(ctx, &b, &t, &a);
            a = u;
        } else if d - e <= e / 4 && (d - e) % 6 == 0 {
            d = (d - e) / 2;
            b = curve.diff_add(ctx, &a, &b, &c);
            a = curve.dbl(ctx, &a);
        } else if (d + 3) / 4 <= e {
            d -= e;
            let t = curve.diff_add(ctx, &b, &a, &c);
            // circular permutation (B, T, C): B <- T, C <- old B, T discarded
            c = std::mem::replace(&mut b, t);
        } else if (d + e) % 2 == 0 {
            d = (d - e) / 2;
            b = curve.diff_add(ctx, &b, &a, &c);
            a = curve.dbl(ctx, &a);
        } else if d % 2 == 0 {
            d /= 2;
            c = curve.diff_add(ctx, &c, &a, &b);
            a = curve.dbl(ctx, &a);
        } else if d % 3 == 0 {
            d = d / 3 - e;
            let t = curve.dbl(ctx, &a);
            let u = curve.diff_add(ctx, &a, &b, &c);
            let a_new = curve.diff_add(ctx, &t, &a, &a);
            let t2 = curve.diff_add(ctx, &t, &u, &c);
            a = a_new;
            // circular permutation (C, B, T): C <- old B, B <- T, T discarded
            c = std::mem::replace(&mut b, t2);
        } else if (d + e) % 3 == 0 {
            d = (d - 2 * e) / 3;
            let t = curve.diff_add(ctx, &a, &b, &c);
            b = curve.diff_add(ctx, &t, &a, &b);
            let t2 = curve.dbl(ctx, &a);
            a = curve.diff_add(ctx, &a, &t2, &a);
        } else if (d - e) % 3 == 0 {
            d = (d - e) / 3;
            let t = curve.diff_add(ctx, &a, &b, &c);
            c = curve.diff_add(ctx, &c, &a, &b);
            b = t;
            let t2 = curve.dbl(ctx, &a);
            a = curve.diff_add(ctx, &a, &t2, &a);
        } else {
            e /= 2;
            c = curve.diff_add(ctx, &c, &b, &a);
            b = curve.dbl(ctx, &b);
        }
    }
    curve.diff_add(ctx, &a, &b, &c)
}
