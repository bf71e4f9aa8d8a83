//! Fast reduction of an arbitrarily wide value against a single 32-bit
//! prime modulus.
//!
//! This is the workhorse for trial division and for building Stage-2
//! prime tables: the same small prime is checked against thousands of
//! candidates, so the one-time cost of a multiplicative-inverse constant
//! pays for itself immediately. Turning `a mod m` into a multiply-and-shift
//! avoids the hardware divider entirely, the same trick the teacher's
//! `rng`/field-arithmetic code uses for fixed moduli, generalised here to
//! an arbitrary runtime prime.

/// Reduction context for one 32-bit prime `m`.
///
/// `inv` is `floor(2^(64+l-1) / m)` where `l = bit_length(m)`; multiplying
/// a limb by `inv` and shifting right by `64+l-1` bits recovers `limb / m`
/// without a division instruction. `powers[i]` holds `(2^64 mod m)^(i+1) mod
/// m`, so that reducing an `n`-limb value is a dot product of limbs against
/// `powers` followed by one final small-value reduction.
#[derive(Clone, Debug)]
pub struct SmallModCtx {
    m: u32,
    l: u32,
    inv: u64,
    powers: Vec<u32>,
}

const MAX_LIMBS: usize = 64;

impl SmallModCtx {
    pub fn new(m: u32) -> Self {
        assert!(m > 1, "small modulus must be at least 2");
        let l = 32 - m.leading_zeros();
        let inv = (1u128 << (64 + l - 1)) / m as u128;
        let inv = inv as u64;

        let two_pow_64_mod_m = (1u128 << 64) % m as u128;
        let mut powers = Vec::with_capacity(MAX_LIMBS);
        let mut cur = two_pow_64_mod_m;
        for _ in 0..MAX_LIMBS {
            powers.push(cur as u32);
            cur = (cur * two_pow_64_mod_m) % m as u128;
        }

        Self { m, l, inv, powers }
    }

    pub fn modulus(&self) -> u32 {
        self.m
    }

    /// `limb mod m` for a single 64-bit limb, via the precomputed inverse.
    fn reduce_limb(&self, limb: u64) -> u32 {
        let q = ((limb as u128 * self.inv as u128) >> (64 + self.l - 1)) as u64;
        let mut r = limb.wrapping_sub(q.wrapping_mul(self.m as u64));
        while r >= self.m as u64 {
            r -= self.m as u64;
        }
        r as u32
    }

    /// Reduces a multi-limb value `a` (little-endian) modulo `m`.
    ///
    /// Each limb is reduced independently, then weighted by the
    /// precomputed power-of-`2^64` table and summed mod `m` — equivalent
    /// to Horner's rule but without a division per limb.
    pub fn reduce(&self, a: &[u64]) -> u32 {
        let n = super::limbs::real_size(a);
        if n == 0 {
            return 0;
        }
        assert!(n <= MAX_LIMBS + 1, "value too wide for the precomputed power table");

        let mut acc: u64 = self.reduce_limb(a[0]) as u64;
        for (i, &limb) in a[1..n].iter().enumerate() {
            let weight = self.powers[i] as u64;
            let reduced = self.reduce_limb(limb) as u64;
            acc = (acc + reduced * weight) % self.m as u64;
        }
        acc as u32
    }

    pub fn mulmod(&self, a: u32, b: u32) -> u32 {
        ((a as u64 * b as u64) % self.m as u64) as u32
    }

    pub fn addmod(&self, a: u32, b: u32) -> u32 {
        let s = a as u64 + b as u64;
        (if s >= self.m as u64 { s - self.m as u64 } else { s }) as u32
    }

    pub fn submod(&self, a: u32, b: u32) -> u32 {
        if a >= b { a - b } else { self.m - (b - a) }
    }

    /// `a^e mod m` by square-and-multiply.
    pub fn powmod(&self, mut a: u32, mut e: u64) -> u32 {
        let mut result = 1u32 % self.m;
        a %= self.m;
        while e > 0 {
            if e & 1 == 1 {
                result = self.mulmod(result, a);
            }
            a = self.mulmod(a, a);
            e >>= 1;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduce_limb_matches_hardware_division() {
        let ctx = SmallModCtx::new(1_000_003);
        for limb in [0u64, 1, 999_999, u64::MAX, 1_000_003, 1_000_004, 123_456_789_012_345] {
            assert_eq!(ctx.reduce_limb(limb) as u64, limb % 1_000_003);
        }
    }

    #[test]
    fn reduce_multi_limb_matches_bignum_semantics() {
        let ctx = SmallModCtx::new(998_244_353);
        // 2^64 + 12345, reduced limb-by-limb should equal (2^64 + 12345) mod m.
        let a = [12345u64, 1u64];
        let expected = ((1u128 << 64) + 12345) % 998_244_353u128;
        assert_eq!(ctx.reduce(&a) as u128, expected);
    }

    #[test]
    fn powmod_matches_repeated_multiplication() {
        let ctx = SmallModCtx::new(101);
        assert_eq!(ctx.powmod(2, 10), 1024 % 101);
    }
}
