//! Windowed NAF scalar multiplication with a precomputed odd-multiple table.
//!
//! Ported from `wnafMul`: builds a table of `P, 3P, 5P, ...` up to the
//! largest digit magnitude the chosen window width can produce, then walks
//! the digits top to bottom, doubling every step and adding/subtracting the
//! table entry for nonzero digits. Relies on the non-adjacent property of
//! `wnaf` output (no two consecutive nonzero digits) to skip the slot right
//! below the leading digit when that digit is exactly `1`.

use crate::bigint::expr::ModContext;
use crate::scalarmul::naf::{absolute_max_naf, wnaf};
use crate::scalarmul::CurveGroup;

/// Computes `n * p` via a width-`w` NAF chain. `w` must be 3, 4, 5 or 6.
pub fn mul<C, P: Clone>(curve: &C, ctx: &dyn ModContext, p: &P, n: u64, w: u32) -> P
where
    C: CurveGroup<P>,
{
    debug_assert!((3..=6).contains(&w));
    if n == 0 {
        return curve.identity(ctx);
    }
    if n == 1 {
        return p.clone();
    }

    let naf_form = wnaf(n, w);
    let table_size = ((absolute_max_naf(&naf_form) + 1) / 2) as usize;

    let mut table: Vec<P> = Vec::with_capacity(table_size);
    table.push(p.clone());
    let mut doubled = curve.dbl(ctx, p);
    for i in 1..table_size {
        table.push(curve.add(ctx, &table[i - 1], &doubled));
    }

    let last = *naf_form.last().unwrap();
    let mut start = naf_form.len() as isize - 3;
    let mut acc = if last != 1 {
        start += 1;
        table[((last - 1) / 2) as usize].clone()
    } else {
        std::mem::replace(&mut doubled, p.clone())
    };

    let mut i = start;
    while i >= 0 {
        acc = curve.dbl(ctx, &acc);
        let d = naf_form[i as usize];
        if d > 0 {
            acc = curve.add(ctx, &acc, &table[((d - 1) / 2) as usize]);
        } else if d < 0 {
            acc = curve.sub(ctx, &acc, &table[((-d - 1) / 2) as usize]);
        }
        i -= 1;
    }
    acc
}
