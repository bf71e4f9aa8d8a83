//! Arbitrary-precision natural numbers.
//!
//! `BignumArb` is the escape hatch for values too wide for any
//! `FixedInt<S>` (`S <= 8`, i.e. beyond 512 bits) — the `Number` facade in
//! `mod.rs` falls back to this variant once a value no longer fits a fixed
//! width. Limbs live in a `Vec<u64>`; ownership is exclusive, `Clone`
//! duplicates the buffer, and moves are the ordinary Rust move (the source
//! is inert afterwards, matching the "zero the source" contract of the
//! original without needing to do it by hand).

use super::limbs;
use std::cmp::Ordering;
use std::fmt;

/// An arbitrary-precision unsigned integer.
///
/// The limb vector may carry trailing zero limbs above the significant
/// part; call [`BignumArb::trim`] to drop them. `negative` is only ever set
/// by [`BignumArb::sub`], which returns the absolute difference together
/// with a sign flag rather than mutating in place — the type itself has no
/// persistent sign.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BignumArb {
    limbs: Vec<u64>,
}

impl BignumArb {
    pub fn zero() -> Self {
        Self { limbs: vec![0] }
    }

    pub fn from_u64(v: u64) -> Self {
        Self { limbs: vec![v] }
    }

    pub fn from_limbs(limbs: Vec<u64>) -> Self {
        let mut v = Self { limbs };
        v.trim();
        v
    }

    pub fn limbs(&self) -> &[u64] {
        &self.limbs
    }

    /// Drops trailing zero limbs above the significant part, keeping at
    /// least one limb. Capacity is left untouched (`realloc`-style in-place
    /// growth is handled by [`BignumArb::grow_to`], not by this).
    pub fn trim(&mut self) {
        let rs = limbs::real_size(&self.limbs).max(1);
        self.limbs.truncate(rs);
    }

    pub fn real_size(&self) -> usize {
        limbs::real_size(&self.limbs)
    }

    pub fn is_zero(&self) -> bool {
        self.real_size() == 0
    }

    /// Grows the backing buffer in place (by appending zero limbs) so it
    /// has at least `n` limbs, without reallocating if already large enough.
    pub fn grow_to(&mut self, n: usize) {
        if self.limbs.len() < n {
            self.limbs.resize(n, 0);
        }
    }

    pub fn cmp_value(&self, other: &Self) -> Ordering {
        limbs::cmp(&self.limbs, &other.limbs)
    }

    pub fn add(&self, other: &Self) -> Self {
        let n = self.limbs.len().max(other.limbs.len());
        let mut r = vec![0u64; n];
        let carry = limbs::add(&mut r, &self.limbs, &other.limbs);
        if carry != 0 {
            r.push(carry);
        }
        Self::from_limbs(r)
    }

    /// `|self - other|`; returns the magnitude and whether `self < other`.
    pub fn sub(&self, other: &Self) -> (Self, bool) {
        let n = self.limbs.len().max(other.limbs.len());
        let mut r = vec![0u64; n];
        let negative = limbs::sub(&mut r, &self.limbs, &other.limbs);
        (Self::from_limbs(r), negative)
    }

    pub fn mul(&self, other: &Self) -> Self {
        let n = self.limbs.len() + other.limbs.len();
        let mut r = vec![0u64; n];
        limbs::mul(&mut r, &self.limbs, &other.limbs);
        Self::from_limbs(r)
    }

    pub fn sqr(&self) -> Self {
        let n = 2 * self.limbs.len();
        let mut r = vec![0u64; n];
        limbs::sqr(&mut r, &self.limbs);
        Self::from_limbs(r)
    }

    pub fn shl(&self, bits: u32) -> Self {
        let extra_limbs = (bits as usize).div_ceil(64) + 1;
        let n = self.limbs.len() + extra_limbs;
        let mut wide = vec![0u64; n];
        wide[..self.limbs.len()].copy_from_slice(&self.limbs);
        let mut r = vec![0u64; n];
        limbs::shl(&mut r, &wide, bits);
        Self::from_limbs(r)
    }

    pub fn shr(&self, bits: u32) -> Self {
        let mut r = vec![0u64; self.limbs.len()];
        limbs::shr(&mut r, &self.limbs, bits);
        Self::from_limbs(r)
    }

    pub fn div_rem(&self, other: &Self) -> (Self, Self) {
        assert!(!other.is_zero(), "division by zero");
        let mut q = vec![0u64; self.limbs.len() + 1];
        let mut r = vec![0u64; other.real_size().max(1)];
        limbs::divmod(&mut q, &mut r, &self.limbs, &other.limbs);
        (Self::from_limbs(q), Self::from_limbs(r))
    }

    pub fn gcd(&self, other: &Self) -> Self {
        Self::from_limbs(limbs::gcd(&self.limbs, &other.limbs))
    }

    pub fn mod_inv(&self, modulus: &Self) -> Option<Self> {
        limbs::mod_inv(&self.limbs, &modulus.limbs).map(Self::from_limbs)
    }

    /// Parses a decimal string into a `BignumArb`.
    pub fn from_decimal(s: &str) -> Result<Self, super::ParseError> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(super::ParseError::InvalidDigits);
        }
        let ten = Self::from_u64(10);
        let mut acc = Self::zero();
        for byte in s.bytes() {
            let digit = Self::from_u64((byte - b'0') as u64);
            acc = acc.mul(&ten).add(&digit);
        }
        Ok(acc)
    }

    /// Renders the value back to a decimal string (repeated divide-by-10^19
    /// chunks, matching the 19-digits-per-limb-ish sizing used for variant
    /// selection in `mod.rs`).
    pub fn to_decimal(&self) -> String {
        if self.is_zero() {
            return "0".to_string();
        }
        let chunk = Self::from_u64(10_000_000_000_000_000_000);
        let mut chunks = Vec::new();
        let mut cur = self.clone();
        while !cur.is_zero() {
            let (q, r) = cur.div_rem(&chunk);
            chunks.push(r.limbs.first().copied().unwrap_or(0));
            cur = q;
        }
        let mut s = chunks.pop().unwrap_or(0).to_string();
        for chunk in chunks.into_iter().rev() {
            s.push_str(&format!("{chunk:019}"));
        }
        s
    }
}

impl fmt::Display for BignumArb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal())
    }
}
