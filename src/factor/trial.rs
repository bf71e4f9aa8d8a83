//! Trial division: the cheapest factoring stage, tried before anything
//! smarter gets a chance to run.
//!
//! Ported from `Factorization/TrialDivision.h`. That file's inner loop is
//! AVX2 code processing four candidate divisors per iteration as packed
//! `f64`/`u64` vectors; this keeps the same two-phase shape (walk a
//! precomputed prime table, then fall back to a mod-30 wheel once the table
//! runs out) but as a portable `[u64; 4]`-unrolled batch rather than actual
//! `core::arch` intrinsics.

use crate::bigint::arb::BignumArb;
use crate::tables::sieve_first_n_primes;
use std::sync::OnceLock;

/// Primes above this size are cheap enough to find with a fresh sieve that
/// shipping a static table stops paying for itself; matches the original's
/// `Primes_1_000_000` table's rough order of magnitude.
const TABLE_PRIME_COUNT: usize = 100_000;

/// Wheel increments mod 30, starting right after 7: `7, 11, 13, 17, 19, 23,
/// 29, 31, 37, ...`. Skips every multiple of 2, 3 and 5 once those three
/// have been checked directly.
const WHEEL: [u64; 8] = [4, 2, 4, 2, 4, 6, 2, 6];

fn table() -> &'static [u64] {
    static TABLE: OnceLock<Vec<u64>> = OnceLock::new();
    TABLE.get_or_init(|| sieve_first_n_primes(TABLE_PRIME_COUNT))
}

/// Integer square root floor, via Newton's method.
fn isqrt(v: u64) -> u64 {
    if v < 2 {
        return v;
    }
    let mut x = (v as f64).sqrt() as u64;
    while x > 0 && x.saturating_mul(x) > v {
        x -= 1;
    }
    while (x + 1).saturating_mul(x + 1) <= v {
        x += 1;
    }
    x
}

/// Index into [`WHEEL`] of the increment that follows a candidate whose
/// residue mod 30 is `r`. `r` is always one of the eight classes coprime to
/// 2, 3 and 5 for any candidate this function is called with.
fn wheel_index(r: u64) -> usize {
    match r {
        7 => 0,
        11 => 1,
        13 => 2,
        17 => 3,
        19 => 4,
        23 => 5,
        29 => 6,
        1 => 7,
        _ => unreachable!("candidate {r} is not coprime to 2, 3 and 5"),
    }
}

/// Divides four candidate divisors against `v` in one batch, returning the
/// first (smallest) one that divides evenly, if any. Stands in for the
/// original's packed AVX2 `divides()` call over four lanes.
fn divides_batch(v: u64, divisors: [u64; 4]) -> Option<u64> {
    for d in divisors {
        if d != 0 && v % d == 0 {
            return Some(d);
        }
    }
    None
}

/// Finds the smallest prime factor of `v`, or returns `v` itself if `v` is
/// prime (or, for values too large for the table and wheel to fully cover
/// before `sqrt(v)`, merely "coprime to everything checked" — in practice
/// `u64::MAX`'s square root is under 4.3e9, well within the wheel's reach).
pub fn trial_division(v: u64) -> u64 {
    if v < 2 {
        return v;
    }
    if v % 2 == 0 {
        return 2;
    }
    if v % 3 == 0 {
        return 3;
    }
    if v % 5 == 0 {
        return 5;
    }

    let sqrt_v = isqrt(v);
    let primes = table();
    let mut i = 0;
    while i < primes.len() {
        let chunk = [
            primes[i],
            primes.get(i + 1).copied().unwrap_or(0),
            primes.get(i + 2).copied().unwrap_or(0),
            primes.get(i + 3).copied().unwrap_or(0),
        ];
        if chunk[0] > sqrt_v {
            return v;
        }
        if let Some(f) = divides_batch(v, chunk) {
            return f;
        }
        i += 4;
    }

    let mut candidate = *primes.last().expect("trial division table is never empty");
    let mut idx = wheel_index(candidate % 30);
    loop {
        candidate += WHEEL[idx];
        idx = (idx + 1) % WHEEL.len();
        if candidate > sqrt_v {
            return v;
        }
        if v % candidate == 0 {
            return candidate;
        }
    }
}

/// Trial-divides the (possibly multi-limb) value `n` by every prime up to
/// `bound`, returning the first factor found. Unlike [`trial_division`] this
/// never walks up to `sqrt(n)` — for a genuinely large `n` that would never
/// finish, so the caller (`factor::miller_rabin::is_probably_prime`) only
/// asks for a small bound and falls back to Miller-Rabin beyond it.
pub fn trial_division_bounded(n: &BignumArb, bound: u64) -> Option<u64> {
    for p in crate::tables::sieve_primes(bound) {
        let divisor = BignumArb::from_u64(p);
        let (_, r) = n.div_rem(&divisor);
        if r.is_zero() {
            return Some(p);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_smallest_factor() {
        assert_eq!(trial_division(91), 7);
        assert_eq!(trial_division(2 * 15_485_867), 2);
        assert_eq!(trial_division(15_485_867 * 15_485_917), 15_485_867);
    }

    #[test]
    fn reports_primes_as_themselves() {
        assert_eq!(trial_division(1_000_003), 1_000_003);
        assert_eq!(trial_division(97), 97);
    }

    #[test]
    fn bounded_division_finds_small_factors_of_wide_values() {
        let n = BignumArb::from_decimal("910000000000000000000000000000000000000007").unwrap();
        // 910...007 is divisible by 7.
        assert_eq!(trial_division_bounded(&n, 1 << 10), Some(7));
    }

    #[test]
    fn bounded_division_reports_none_when_coprime_to_the_bound() {
        let n = BignumArb::from_u64(1_000_003);
        assert_eq!(trial_division_bounded(&n, 100), None);
    }
}
