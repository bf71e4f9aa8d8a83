//! Dynamic NAF: picks the window width (2 through 6) that minimises the
//! estimated multiplication count for this particular scalar, then defers
//! to plain NAF or windowed NAF. Ported from `getBestWNaf`/`dnafMul`.

use crate::bigint::expr::ModContext;
use crate::scalarmul::naf::{naf_cost, wnaf};
use crate::scalarmul::{naf, wnaf as wnaf_mul, CurveGroup};

pub(crate) fn best_width(n: u64, dbl_cost: i32, add_cost: i32, inter_dbl_cost: i32, inter_add_cost: i32) -> u32 {
    let mut best_w = 2;
    let mut best_cost = i32::MAX;
    for w in 2..=6u32 {
        let form = wnaf(n, w);
        let cost = naf_cost(&form, dbl_cost, add_cost, inter_dbl_cost, inter_add_cost);
        if cost < best_cost {
            best_cost = cost;
            best_w = w;
        }
    }
    best_w
}

/// Computes `n * p`, choosing the cheapest NAF window width for this curve
/// form and scalar.
pub fn mul<C, P: Clone>(curve: &C, ctx: &dyn ModContext, p: &P, n: u64) -> P
where
    C: CurveGroup<P>,
{
    if n == 0 {
        return curve.identity(ctx);
    }
    if n == 1 {
        return p.clone();
    }

    let (dbl_cost, add_cost, inter_dbl_cost, inter_add_cost) = curve.naf_cost_params();
    let w = best_width(n, dbl_cost, add_cost, inter_dbl_cost, inter_add_cost);
    if w == 2 {
        naf::mul(curve, ctx, p, n)
    } else {
        wnaf_mul::mul(curve, ctx, p, n, w)
    }
}
