//! Miller-Rabin probable-primality test, and the combined
//! trial-division-then-Miller-Rabin decision the rest of the pipeline
//! calls to tell "probably prime" from "definitely composite".
//!
//! Ported from `PrimalityTesting/millerRabin.h` and `isProbablyPrime.h`.

use crate::bigint::arb::BignumArb;
use crate::bigint::expr::{mod_pow, ModContext};
use crate::bigint::montgomery::MontgomeryCtx;
use crate::factor::trial;
use crate::rng::Csprng;
use std::cmp::Ordering;

/// Independent witness rounds `isProbablyPrime` always runs; a false
/// positive needs all 24 to happen to agree, at most `4^-24` likely.
pub const DEFAULT_ROUNDS: u32 = 24;

/// 1-limb values below this switch from Miller-Rabin to exhaustive trial
/// division, which is cheaper and exact at this size.
pub const TRIAL_DIVISION_THRESHOLD_1_LIMB: u64 = 1 << 48;

/// Multi-limb values only trial-divide up to this bound before falling
/// back to Miller-Rabin — full trial division would never finish.
pub const TRIAL_DIVISION_BOUND_MULTI_LIMB: u64 = 1 << 14;

/// Draws a uniformly random witness in `[2, n-2]` from the crate's
/// ChaCha20 CSPRNG, rejecting out-of-range draws.
fn random_witness(n: &BignumArb) -> BignumArb {
    let width = n.real_size().max(1);
    let two = BignumArb::from_u64(2);
    let (n_minus_2, _) = n.sub(&two);

    let mut csprng = Csprng::new();
    loop {
        let mut limbs = vec![0u64; width];
        for limb in limbs.iter_mut() {
            let mut buf = [0u8; 8];
            csprng.fill_bytes(&mut buf);
            *limb = u64::from_le_bytes(buf);
        }
        let candidate = BignumArb::from_limbs(limbs);
        if candidate.cmp_value(&two) != Ordering::Less && candidate.cmp_value(&n_minus_2) != Ordering::Greater {
            return candidate;
        }
    }
}

/// One Miller-Rabin round: `true` means `n` survived this witness (still
/// probably prime), `false` is a definite composite witness.
fn round(ctx: &MontgomeryCtx, n_minus_1: &[u64], d: &BignumArb, witness: &BignumArb) -> bool {
    let one = ctx.get_constant(1);
    let nm1 = ctx.to_residue(n_minus_1);
    let witness_residue = ctx.to_residue(witness.limbs());

    let mut x = mod_pow(ctx, &witness_residue, d.limbs());
    if x == one || x == nm1 {
        return true;
    }

    let n_minus_1_val = BignumArb::from_limbs(n_minus_1.to_vec());
    let mut d = d.clone();
    while d.cmp_value(&n_minus_1_val) != Ordering::Equal {
        let mut sq = vec![0u64; ctx.width()];
        ctx.sqr(&mut sq, &x);
        x = sq;
        d = d.shl(1);
        if x == one {
            return false;
        }
        if x == nm1 {
            return true;
        }
    }
    false
}

/// Runs `rounds` independent Miller-Rabin witnesses against `n`. Handles
/// the small fixed cases (`n` even, `0`, `1`, `2`, `3`) the same way the
/// original's wrapper does before reaching for a witness at all.
pub fn miller_rabin_test(n: &BignumArb, rounds: u32) -> bool {
    let two = BignumArb::from_u64(2);
    let three = BignumArb::from_u64(3);
    if n.cmp_value(&two) == Ordering::Equal || n.cmp_value(&three) == Ordering::Equal {
        return true;
    }
    if n.is_zero() || n.cmp_value(&BignumArb::from_u64(1)) == Ordering::Equal || n.limbs()[0] % 2 == 0 {
        return false;
    }

    let (n_minus_1, _) = n.sub(&BignumArb::from_u64(1));
    let mut d = n_minus_1.clone();
    while d.limbs()[0] == 0 {
        d = d.shr(64);
    }
    let tz = d.limbs()[0].trailing_zeros();
    d = d.shr(tz);

    let ctx = MontgomeryCtx::new(n.limbs());
    for _ in 0..rounds {
        let witness = random_witness(n);
        if !round(&ctx, n_minus_1.limbs(), &d, &witness) {
            return false;
        }
    }
    true
}

/// Decides whether `n` is probably prime, the same tiered strategy
/// `isProbablyPrime` uses: trial-divide up to a size-dependent bound
/// first (exact and cheap for values that size), only then fall back to
/// Miller-Rabin. Returns the small factor trial division turned up, if
/// any — `None` when `n` passed every check this function ran.
pub fn is_probably_prime(n: &BignumArb) -> (bool, Option<u64>) {
    if n.real_size() <= 1 {
        let v = n.limbs().first().copied().unwrap_or(0);
        if v < TRIAL_DIVISION_THRESHOLD_1_LIMB {
            let found = trial::trial_division(v);
            return (found == v, if found != v { Some(found) } else { None });
        }
        return (miller_rabin_test(n, DEFAULT_ROUNDS), None);
    }

    if let Some(factor) = trial::trial_division_bounded(n, TRIAL_DIVISION_BOUND_MULTI_LIMB) {
        return (false, Some(factor));
    }
    (miller_rabin_test(n, DEFAULT_ROUNDS), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifies_known_primes_and_composites() {
        assert!(miller_rabin_test(&BignumArb::from_u64(1_000_003), DEFAULT_ROUNDS));
        assert!(!miller_rabin_test(&BignumArb::from_u64(1_000_005), DEFAULT_ROUNDS));
        assert!(miller_rabin_test(&BignumArb::from_u64(2), DEFAULT_ROUNDS));
        assert!(!miller_rabin_test(&BignumArb::from_u64(1), DEFAULT_ROUNDS));
    }

    #[test]
    fn is_probably_prime_reports_small_trial_division_factors() {
        let (prime, factor) = is_probably_prime(&BignumArb::from_u64(91));
        assert!(!prime);
        assert_eq!(factor, Some(7));
    }
}
