//! Fixed-width natural numbers backed by an exact `S`-limb array.
//!
//! Mirrors the teacher's `U256`/`U512` in spirit — a small, explicit value
//! type with no surprise allocation — but little-endian and parameterised
//! over the limb count so the `Number` facade (`mod.rs`) can hold one
//! variant per width instead of duplicating this type by hand nine times.
//!
//! Operations act on the full width and assume the caller has sized `S`
//! generously enough that the true result does not overflow; see
//! `crate::bigint::limbs` for the exact semantics of each kernel.

use super::limbs;
use std::cmp::Ordering;
use std::fmt;

/// An `S`-limb fixed-width unsigned integer, `S` in `1..=8`.
///
/// Equality compares the full backing array, independent of
/// [`FixedInt::real_size`] — two values with the same limbs are equal even
/// if a caller treats one as "not yet fit to size".
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FixedInt<const S: usize>(pub [u64; S]);

impl<const S: usize> FixedInt<S> {
    pub const ZERO: Self = Self([0u64; S]);

    pub fn from_u64(v: u64) -> Self {
        let mut limbs = [0u64; S];
        limbs[0] = v;
        Self(limbs)
    }

    /// Index one past the highest non-zero limb (0 for the zero value).
    pub fn real_size(&self) -> usize {
        limbs::real_size(&self.0)
    }

    pub fn is_zero(&self) -> bool {
        self.real_size() == 0
    }

    pub fn cmp_value(&self, other: &Self) -> Ordering {
        limbs::cmp(&self.0, &other.0)
    }

    /// `self + other`, ignoring carry out of the top limb (caller-guaranteed
    /// no overflow, per the type's contract).
    pub fn add(&self, other: &Self) -> Self {
        let mut r = [0u64; S];
        let _carry = limbs::add(&mut r, &self.0, &other.0);
        debug_assert_eq!(_carry, 0, "FixedInt<{S}> addition overflowed");
        Self(r)
    }

    /// `|self - other|`; returns the magnitude and whether `self < other`.
    pub fn sub(&self, other: &Self) -> (Self, bool) {
        let mut r = [0u64; S];
        let negative = limbs::sub(&mut r, &self.0, &other.0);
        (Self(r), negative)
    }

    /// Full-width product, truncated to the low `S` limbs (caller-guaranteed
    /// no overflow).
    pub fn mul_trunc(&self, other: &Self) -> Self {
        let mut wide = vec![0u64; 2 * S];
        limbs::mul(&mut wide, &self.0, &other.0);
        debug_assert_eq!(
            limbs::real_size(&wide[S..]),
            0,
            "FixedInt<{S}> multiplication overflowed"
        );
        let mut r = [0u64; S];
        r.copy_from_slice(&wide[..S]);
        Self(r)
    }

    pub fn shl(&self, bits: u32) -> Self {
        let mut r = [0u64; S];
        limbs::shl(&mut r, &self.0, bits);
        Self(r)
    }

    pub fn shr(&self, bits: u32) -> Self {
        let mut r = [0u64; S];
        limbs::shr(&mut r, &self.0, bits);
        Self(r)
    }

    pub fn div_rem(&self, other: &Self) -> (Self, Self) {
        let mut q = [0u64; S];
        let mut r = [0u64; S];
        limbs::divmod(&mut q, &mut r, &self.0, &other.0);
        (Self(q), Self(r))
    }

    pub fn gcd(&self, other: &Self) -> Self {
        let g = limbs::gcd(&self.0, &other.0);
        let mut r = [0u64; S];
        r[..g.len().min(S)].copy_from_slice(&g[..g.len().min(S)]);
        Self(r)
    }

    pub fn mod_inv(&self, modulus: &Self) -> Option<Self> {
        let inv = limbs::mod_inv(&self.0, &modulus.0)?;
        let mut r = [0u64; S];
        r.copy_from_slice(&inv[..S]);
        Some(Self(r))
    }
}

impl<const S: usize> Default for FixedInt<S> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const S: usize> PartialOrd for FixedInt<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp_value(other))
    }
}

impl<const S: usize> Ord for FixedInt<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_value(other)
    }
}

impl<const S: usize> fmt::Display for FixedInt<S> {
    /// Renders as lowercase hex, most significant limb first, zero-padded.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, limb) in self.0.iter().enumerate().rev() {
            if i == self.0.len() - 1 {
                write!(f, "{limb:x}")?;
            } else {
                write!(f, "{limb:016x}")?;
            }
        }
        Ok(())
    }
}
