//! Precomputed-table support.
//!
//! The original ships `Primes_1_000_000.dat`/`100_first_primes_up_to_64_bits.dat`
//! and friends as binary blobs produced once, offline, by a generator and
//! loaded at process start (see `PrecomputedTables/primeTable.h`). This crate
//! keeps the same split between "generate" and "use": [`format`] is the
//! on-disk layout `tools/gen_tables.rs` writes and [`format::read`] reads
//! back; [`sieve_primes`] is the generator itself, also usable directly by
//! callers (trial division, Pollard p-1) that would rather sieve once at
//! startup than ship a multi-megabyte table with the crate.
//!
//! Ported from `PrecomputedTables/primeTable.h`'s generation pass (itself a
//! plain sieve of Eratosthenes) and `generalUtils.h`'s bit-length helpers.

pub mod format;

/// Sieves every prime up to and including `limit`.
pub fn sieve_primes(limit: u64) -> Vec<u64> {
    if limit < 2 {
        return Vec::new();
    }
    let limit = limit as usize;
    let mut is_composite = vec![false; limit + 1];
    let mut primes = Vec::new();
    for n in 2..=limit {
        if !is_composite[n] {
            primes.push(n as u64);
            let mut m = n * n;
            while m <= limit {
                is_composite[m] = true;
                m += n;
            }
        }
    }
    primes
}

/// Sieves the first `count` primes, growing the search bound geometrically
/// until enough have been found. Mirrors what the original's generator does
/// once, offline, to produce `Primes_1_000_000.dat`.
pub fn sieve_first_n_primes(count: usize) -> Vec<u64> {
    if count == 0 {
        return Vec::new();
    }
    // Dusart's bound: the count-th prime is below n*(ln n + ln ln n) for n >= 6.
    let n = count as f64;
    let mut bound = if count < 6 { 15 } else { (n * (n.ln() + n.ln().ln())).ceil() as u64 + 10 };
    loop {
        let primes = sieve_primes(bound);
        if primes.len() >= count {
            let mut primes = primes;
            primes.truncate(count);
            return primes;
        }
        bound *= 2;
    }
}

/// The first 100 primes whose bit length (`64 - leading_zeros`) equals `bits`,
/// supplementing the original's per-bit-length prime tables used to seed
/// Miller-Rabin/Pollard rho starting points sized to a modulus's bit length.
pub fn first_primes_for_bit_length(bits: u8) -> Vec<u64> {
    assert!((1..=63).contains(&bits), "bit length must fit a u64 candidate with room for a sign-free compare");
    let low = if bits == 1 { 1u64 } else { 1u64 << (bits - 1) };
    let high = (1u64 << bits).saturating_sub(1);

    let mut found = Vec::with_capacity(100);
    let mut candidate = low | 1;
    if low == 1 {
        candidate = 2;
    }
    while found.len() < 100 && candidate <= high {
        if is_prime_trial(candidate) {
            found.push(candidate);
        }
        candidate += if candidate == 2 { 1 } else { 2 };
    }
    found
}

fn is_prime_trial(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3u64;
    while d.saturating_mul(d) <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sieve_matches_known_primes() {
        assert_eq!(sieve_primes(30), vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn first_n_primes_starts_correctly() {
        let primes = sieve_first_n_primes(10);
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn bit_length_primes_are_in_range() {
        let primes = first_primes_for_bit_length(8);
        assert!(primes.iter().all(|&p| (128..=255).contains(&p)));
        assert!(primes.windows(2).all(|w| w[0] < w[1]));
    }
}
