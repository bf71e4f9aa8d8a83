//! ECM Stage 2: the giant-step continuation that looks for a cofactor prime
//! between `B1` and `B2` without spending a whole scalar multiplication per
//! candidate prime.
//!
//! Ported from `ecm_`'s stage-2 block in `ecm.h`. Requires a curve form that
//! supports plain `add` ([`crate::scalarmul::CurveGroup`]); Montgomery `(X:Z)`
//! points cannot differentiate `add` from `sub` without a known difference,
//! so the original's stage-2 walk `debugAssert(false)`s the instant
//! `mulMethod == Prac` reaches it — [`run`] below simply isn't offered a
//! Montgomery curve to call it with (see `ecm::mod`'s dispatch).

use crate::bigint::expr::ModContext;
use crate::ecm::stage1::MulMethod;
use crate::scalarmul::CurveGroup;
use crate::tables::sieve_primes;
use crate::scalarmul::{double_and_add, dynamic_naf, naf, wnaf as wnaf_mul};

/// Advances `point` by the scalar `n` using whichever strategy Stage 1 was
/// configured with, same as `cascadeMulDoMultiplication`'s single-scalar
/// case. Never called with [`MulMethod::Prac`] — the caller only reaches
/// Stage 2 with a curve form that supports [`CurveGroup::add`].
fn advance<C, P: Clone>(curve: &C, ctx: &dyn ModContext, point: &P, n: u64, method: MulMethod) -> P
where
    C: CurveGroup<P>,
{
    match method {
        MulMethod::DoubleAndAdd => double_and_add::mul(curve, ctx, point, n),
        MulMethod::Naf => naf::mul(curve, ctx, point, n),
        MulMethod::WNaf3 => wnaf_mul::mul(curve, ctx, point, n, 3),
        MulMethod::WNaf4 => wnaf_mul::mul(curve, ctx, point, n, 4),
        MulMethod::DynamicNaf => dynamic_naf::mul(curve, ctx, point, n),
        MulMethod::Prac => unreachable!("Stage 2 cannot drive a Montgomery curve through Prac"),
    }
}

/// Runs Stage 2 starting from `point` (already advanced through Stage 1),
/// returning the accumulated product of every step's `z`-coordinate so the
/// caller can take one batched `gcd` against the modulus.
pub fn run<C, P, Z>(
    curve: &C,
    ctx: &dyn ModContext,
    point: &mut P,
    b1: u64,
    b2: u64,
    method: MulMethod,
    z_of: impl Fn(&P) -> Z,
    mul_z: impl Fn(&Z, &Z) -> Z,
) -> Z
where
    C: CurveGroup<P>,
    P: Clone,
{
    let primes = sieve_primes(b2);
    let mut i = primes.iter().position(|&p| p > b1).expect("B2 must exceed the largest Stage-1 prime");

    let first_prime = primes[i];
    let mut prev_prime = first_prime;
    i += 1;
    let mut diffs = Vec::new();
    while i < primes.len() && primes[i] <= b2 {
        diffs.push(primes[i] - prev_prime);
        prev_prime = primes[i];
        i += 1;
    }
    let max_diff = *diffs.iter().max().unwrap_or(&0) as usize;
    debug_assert!(max_diff % 2 == 0, "consecutive odd primes differ by an even amount");

    let mut diff_table: Vec<P> = Vec::with_capacity(max_diff / 2);
    diff_table.push(curve.dbl(ctx, point));
    if max_diff / 2 > 1 {
        diff_table.push(curve.dbl(ctx, &diff_table[0]));
    }
    for j in 2..max_diff / 2 {
        diff_table.push(curve.add(ctx, &diff_table[j - 1], &diff_table[0]));
    }

    *point = advance(curve, ctx, point, first_prime, method);

    let mut running = z_of(point);
    for diff in diffs {
        *point = curve.add(ctx, point, &diff_table[(diff / 2 - 1) as usize]);
        running = mul_z(&running, &z_of(point));
    }
    running
}
