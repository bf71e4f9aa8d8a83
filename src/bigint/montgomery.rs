//! Montgomery modular-reduction contexts.
//!
//! Mirrors `createMontgomeryReductionMod`/`montgomeryMult` from the C++
//! original's `BigInt/kernels.h`: the context precomputes `k`, the
//! modulus-specific constant satisfying `R*R^-1 - k*n = 1` where
//! `R = 2^(64*b)`, once per modulus and reuses it for every reduction.
//!
//! `k`'s computation is lazy (an Ed25519-style `OnceCell`, not eager in the
//! constructor): building a context for a modulus that turns out never to
//! be used for an actual multiply never pays for the extended-GCD call.

use super::limbs;
use std::cell::OnceCell;

/// Precomputed Montgomery reduction data for one modulus `n`.
///
/// `n` must be odd (`gcd(n, 2) == 1`); this is a programmer contract, not
/// a runtime error — debug builds assert it, release builds trust the
/// caller, per the crate's error taxonomy.
#[derive(Clone)]
pub struct MontgomeryCtx {
    modulus: Vec<u64>,
    b: usize,
    k: OnceCell<Vec<u64>>,
}

impl MontgomeryCtx {
    /// Builds a context for `n`. `n` is trimmed to its real size; that size
    /// is `b`, the limb width `R = 2^(64*b)` is defined over.
    pub fn new(n: &[u64]) -> Self {
        let b = limbs::real_size(n).max(1);
        debug_assert_eq!(n[0] & 1, 1, "Montgomery modulus must be odd");
        Self { modulus: n[..b].to_vec(), b, k: OnceCell::new() }
    }

    pub fn modulus(&self) -> &[u64] {
        &self.modulus
    }

    pub fn limb_width(&self) -> usize {
        self.b
    }

    /// The lazily-computed constant `k`. First access triggers
    /// `R mod n` + an extended-GCD inverse + one exact division; later
    /// accesses are a cache hit.
    fn k(&self) -> &[u64] {
        self.k.get_or_init(|| Self::compute_k(&self.modulus, self.b))
    }

    fn compute_k(n: &[u64], b: usize) -> Vec<u64> {
        // R = 2^(64b), represented as a (b+1)-limb value with a single set bit.
        let mut r_val = vec![0u64; b + 1];
        r_val[b] = 1;

        let mut r_mod_n = vec![0u64; b];
        limbs::modulus(&mut r_mod_n, &r_val, n);

        let r_inv =
            limbs::mod_inv(&r_mod_n, n).expect("Montgomery modulus must be coprime to R=2^(64b)");

        let mut r_rinv = vec![0u64; r_val.len() + r_inv.len()];
        limbs::mul(&mut r_rinv, &r_val, &r_inv);

        let mut one = vec![0u64; r_rinv.len()];
        one[0] = 1;
        let mut r_rinv_minus_one = vec![0u64; r_rinv.len()];
        let borrowed = limbs::sub(&mut r_rinv_minus_one, &r_rinv, &one);
        debug_assert!(!borrowed, "R*R^-1 must be at least 1");

        let mut q = vec![0u64; r_rinv_minus_one.len() + 1];
        let mut rem = vec![0u64; b];
        limbs::divmod(&mut q, &mut rem, &r_rinv_minus_one, n);
        debug_assert_eq!(limbs::real_size(&rem), 0, "R*R^-1 - 1 must divide n exactly");

        q.truncate(b);
        q
    }

    /// `a -> a*R mod n`: converts a raw residue into Montgomery form.
    pub fn to_montgomery(&self, a: &[u64]) -> Vec<u64> {
        let mut wide = vec![0u64; self.b + a.len()];
        wide[self.b..].copy_from_slice(a);
        let mut out = vec![0u64; self.b];
        limbs::modulus(&mut out, &wide, &self.modulus);
        out
    }

    /// `a -> a*R^-1 mod n`: converts a Montgomery-form residue back to raw,
    /// via a single Montgomery reduction with the implicit operand 1.
    pub fn from_montgomery(&self, a: &[u64]) -> Vec<u64> {
        let mut one = vec![0u64; self.b];
        one[0] = 1;
        let mut out = vec![0u64; self.b];
        self.mul(&mut out, a, &one);
        out
    }

    /// Reduces the small literal `v` mod `n`, then converts to Montgomery form.
    pub fn get_constant(&self, v: u64) -> Vec<u64> {
        let mut lit = vec![0u64; self.b];
        lit[0] = v;
        if limbs::cmp(&lit, &self.modulus) != std::cmp::Ordering::Less {
            let mut reduced = vec![0u64; self.b];
            limbs::modulus(&mut reduced, &lit, &self.modulus);
            lit = reduced;
        }
        self.to_montgomery(&lit)
    }

    pub fn mul(&self, r: &mut [u64], a: &[u64], b: &[u64]) {
        limbs::mont_mul(r, a, b, &self.modulus, self.k());
    }

    pub fn sqr(&self, r: &mut [u64], a: &[u64]) {
        limbs::mont_sqr(r, a, &self.modulus, self.k());
    }

    pub fn add(&self, r: &mut [u64], a: &[u64], b: &[u64]) {
        let mut wide = vec![0u64; self.b + 1];
        let carry = limbs::add(&mut wide[..self.b], a, b);
        wide[self.b] = carry;
        if limbs::cmp(&wide, &self.modulus) != std::cmp::Ordering::Less {
            let mut tmp = vec![0u64; self.b + 1];
            limbs::sub(&mut tmp, &wide, &self.modulus);
            r.copy_from_slice(&tmp[..self.b]);
        } else {
            r.copy_from_slice(&wide[..self.b]);
        }
    }

    pub fn sub(&self, r: &mut [u64], a: &[u64], b: &[u64]) {
        let negative = limbs::sub(r, a, b);
        if negative {
            let mut tmp = vec![0u64; self.b];
            limbs::sub(&mut tmp, &self.modulus, r);
            r.copy_from_slice(&tmp);
        }
    }

    pub fn neg(&self, r: &mut [u64], a: &[u64]) {
        if limbs::real_size(a) == 0 {
            r.fill(0);
        } else {
            limbs::sub(r, &self.modulus, a);
        }
    }

    pub fn dbl(&self, r: &mut [u64], a: &[u64]) {
        let a = a.to_vec();
        self.add(r, &a, &a);
    }

    /// Modular inverse of a Montgomery-form residue, itself returned in
    /// Montgomery form: converts out, inverts in the raw domain, converts
    /// back in.
    pub fn inv(&self, r: &mut [u64], a: &[u64]) {
        let raw = self.from_montgomery(a);
        let raw_inv = limbs::mod_inv(&raw, &self.modulus)
            .expect("modular expression inverted a non-invertible residue");
        let mont = self.to_montgomery(&raw_inv);
        r.copy_from_slice(&mont);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn k_satisfies_r_rinv_identity() {
        let n = vec![1000000007u64];
        let ctx = MontgomeryCtx::new(&n);
        let round = ctx.from_montgomery(&ctx.to_montgomery(&[5]));
        assert_eq!(round, vec![5]);
    }
}
