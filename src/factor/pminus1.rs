//! Pollard's p-1, two stages: find a prime `p | n` whose `p - 1` is
//! B1-smooth directly, then extend the search to primes whose `p - 1` has
//! exactly one prime factor between `B1` and `B2`.
//!
//! Ported from `Factorization/Pminus1.h`. Both stages work entirely in
//! residue space and only convert back to a raw value to feed `gcd`,
//! mirroring the original's `T`/`BigIntValueType<ModType>` split between
//! "value the modulus arithmetic understands" and "value `gcd` understands".

use crate::bigint::arb::BignumArb;
use crate::bigint::expr::{mod_pow, ModContext};
use crate::tables::sieve_primes;
use std::cmp::Ordering;

/// How many primes' worth of `gcd`s Stage 2 batches before actually paying
/// for one, the same trade-off as [`crate::factor::pollard_rho`]'s batching
/// but on a fixed schedule rather than a dynamic one (Stage 2's per-step
/// cost is already one multiplication, so there's no ramp-up to do).
const GCD_INTERVAL: u32 = 100;

fn raw(ctx: &dyn ModContext, residue: &[u64]) -> BignumArb {
    BignumArb::from_limbs(ctx.from_residue(residue))
}

fn gcd_with_modulus(ctx: &dyn ModContext, residue: &[u64]) -> BignumArb {
    let n = BignumArb::from_limbs(ctx.modulus().to_vec());
    raw(ctx, residue).gcd(&n)
}

/// `x := x^n`, in residue space. `n` always fits a `u64` here (a prime power
/// at most `B1`), so this is just [`mod_pow`] with `x` standing in for both
/// the base and the exponentiation target.
fn square_and_multiply(ctx: &dyn ModContext, x: &mut Vec<u64>, n: u64) {
    *x = mod_pow(ctx, x, &[n]);
}

/// Runs Pollard p-1 against the modulus `ctx` was built for, returning `1`
/// (no factor), a nontrivial factor, or (rarely) `n` itself if the running
/// value happened to collapse to `0 mod n` exactly.
pub fn p_minus_1(ctx: &dyn ModContext, b1: u64, b2: u64) -> BignumArb {
    let one = BignumArb::from_u64(1);
    let one_const = ctx.get_constant(1);

    // Stage 1: x := 2^(product of prime powers <= B1).
    let mut x = ctx.get_constant(2);
    let primes = sieve_primes(b2.max(b1));
    let mut i = 0;
    while i < primes.len() && primes[i] <= b1 {
        let p = primes[i];
        let mut q = p;
        loop {
            let next = q.checked_mul(p);
            match next {
                Some(v) if v <= b1 => q = v,
                _ => break,
            }
        }
        square_and_multiply(ctx, &mut x, q);
        i += 1;
    }

    let mut xm1 = vec![0u64; ctx.width()];
    ctx.sub(&mut xm1, &x, &one_const);
    if raw(ctx, &xm1).is_zero() {
        return one;
    }
    let a = gcd_with_modulus(ctx, &xm1);
    if a.cmp_value(&one) != Ordering::Equal || b1 >= b2 {
        return a;
    }

    // Stage 2: extend by every prime in (B1, B2] via a precomputed
    // difference table, batching the gcd check every GCD_INTERVAL primes.
    if i >= primes.len() {
        return one;
    }
    let first_prime = primes[i];
    let mut prev_prime = first_prime;
    i += 1;
    let mut diffs = Vec::new();
    while i < primes.len() && primes[i] <= b2 {
        diffs.push(primes[i] - prev_prime);
        prev_prime = primes[i];
        i += 1;
    }
    if diffs.is_empty() {
        return one;
    }
    let max_diff = *diffs.iter().max().unwrap() as usize;
    debug_assert!(max_diff % 2 == 0, "consecutive odd primes differ by an even amount");

    let mut diff_table: Vec<Vec<u64>> = Vec::with_capacity(max_diff / 2);
    let mut d0 = vec![0u64; ctx.width()];
    ctx.sqr(&mut d0, &x);
    diff_table.push(d0);
    if max_diff / 2 > 1 {
        let mut d1 = vec![0u64; ctx.width()];
        ctx.sqr(&mut d1, &diff_table[0]);
        diff_table.push(d1);
    }
    for j in 2..max_diff / 2 {
        let mut dj = vec![0u64; ctx.width()];
        ctx.mul(&mut dj, &diff_table[j - 1], &diff_table[0]);
        diff_table.push(dj);
    }

    square_and_multiply(ctx, &mut x, first_prime);
    let mut running = x.clone();
    let mut gcd_count = 0u32;
    for diff in diffs {
        let mut next_x = vec![0u64; ctx.width()];
        ctx.mul(&mut next_x, &x, &diff_table[(diff / 2 - 1) as usize]);
        x = next_x;
        let mut next_running = vec![0u64; ctx.width()];
        ctx.mul(&mut next_running, &running, &x);
        running = next_running;

        if gcd_count == GCD_INTERVAL {
            let mut diff_xm1 = vec![0u64; ctx.width()];
            ctx.sub(&mut diff_xm1, &running, &one_const);
            if !raw(ctx, &diff_xm1).is_zero() {
                let a = gcd_with_modulus(ctx, &diff_xm1);
                if a.cmp_value(&one) != Ordering::Equal {
                    return a;
                }
            }
            gcd_count = 0;
        } else {
            gcd_count += 1;
        }
    }

    let mut final_xm1 = vec![0u64; ctx.width()];
    ctx.sub(&mut final_xm1, &running, &one_const);
    if raw(ctx, &final_xm1).is_zero() {
        return one;
    }
    gcd_with_modulus(ctx, &final_xm1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bigint::montgomery::MontgomeryCtx;

    #[test]
    fn finds_a_factor_whose_predecessor_is_smooth() {
        // 1009 - 1 = 1008 = 2^4 * 3^2 * 7, B1=20 is more than enough.
        let n = vec![1009u64 * 1013u64];
        let ctx = MontgomeryCtx::new(&n);
        let g = p_minus_1(&ctx, 20, 20);
        let v = g.to_decimal().parse::<u64>().unwrap();
        assert!(v == 1009 || v == 1013, "unexpected factor {v}");
    }

    #[test]
    fn stage_2_extends_reach_beyond_b1() {
        // 2503 - 1 = 2502 = 2 * 3 * 3 * 139; B1=50 misses the 139 factor,
        // but B2=200 catches it via Stage 2.
        let n = vec![2503u64 * 2609u64];
        let ctx = MontgomeryCtx::new(&n);
        let g = p_minus_1(&ctx, 50, 200);
        let v = g.to_decimal().parse::<u64>().unwrap();
        assert!(v == 2503 || v == 2609, "unexpected factor {v}");
    }
}
