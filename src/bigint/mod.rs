//! Polymorphic big-integer layer.
//!
//! Switches between fixed-size limb arrays (`FixedInt<1..8>`, i.e. 64 to
//! 512 bits) and an arbitrary-precision representation (`BignumArb`),
//! dispatched through the [`Number`] tagged sum. Everything here is built
//! on the width-agnostic kernels in [`limbs`]; `FixedInt` and `BignumArb`
//! are both thin slice-shaped wrappers around the same carry chains.
//!
//! Modular reduction contexts ([`montgomery`], [`barrett`]) are layered on
//! top and precompute their reduction constants once per modulus.

pub mod arb;
pub mod barrett;
pub mod expr;
pub mod fixed;
pub mod limbs;
pub mod montgomery;
pub mod smallmod;

pub use arb::BignumArb;
pub use fixed::FixedInt;

use std::cmp::Ordering;
use std::fmt;

/// Parse failure at the `Number` construction boundary (§7: the only
/// programmer-facing error that crosses an API boundary as a `Result`
/// rather than a debug assertion or an in-band sentinel value).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Input was empty or contained a non-digit byte.
    InvalidDigits,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidDigits => write!(f, "expected a non-empty decimal digit string"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Worst-case decimal digits a `FixedInt<S>` can hold without risking
/// overflow during parsing (`S` 64-bit limbs hold at most `19*S` decimal
/// digits safely, since `10^19 < 2^64 < 10^20`).
const fn max_decimal_digits(limb_count: usize) -> usize {
    19 * limb_count
}

/// Tagged sum over `{BignumArb, FixedInt<1>, ..., FixedInt<8>}`.
///
/// Construction from a decimal string or integer literal picks the
/// smallest variant that can hold the value; [`Number::fit_to_size`]
/// re-homes a value to its smallest sufficient variant after a mutation
/// that may have shrunk it (e.g. a subtraction or a `div`). Matching on the
/// variant directly is the "visitation" the original described — there is
/// no hidden representation to unwrap through an accessor.
#[derive(Clone, Debug)]
pub enum Number {
    Fixed1(FixedInt<1>),
    Fixed2(FixedInt<2>),
    Fixed3(FixedInt<3>),
    Fixed4(FixedInt<4>),
    Fixed5(FixedInt<5>),
    Fixed6(FixedInt<6>),
    Fixed7(FixedInt<7>),
    Fixed8(FixedInt<8>),
    Arb(BignumArb),
}

impl Number {
    pub fn zero() -> Self {
        Number::Fixed1(FixedInt::ZERO)
    }

    pub fn from_u64(v: u64) -> Self {
        Number::Fixed1(FixedInt::from_u64(v))
    }

    /// Parses a decimal string, selecting the smallest variant whose
    /// worst-case digit capacity suffices.
    pub fn parse_decimal(s: &str) -> Result<Self, ParseError> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidDigits);
        }
        let digits = s.trim_start_matches('0').len().max(1);

        macro_rules! try_fixed {
            ($s:literal, $variant:ident) => {
                if digits <= max_decimal_digits($s) {
                    let arb = BignumArb::from_decimal(s)?;
                    return Ok(Number::$variant(arb_to_fixed::<$s>(&arb)));
                }
            };
        }
        try_fixed!(1, Fixed1);
        try_fixed!(2, Fixed2);
        try_fixed!(3, Fixed3);
        try_fixed!(4, Fixed4);
        try_fixed!(5, Fixed5);
        try_fixed!(6, Fixed6);
        try_fixed!(7, Fixed7);
        try_fixed!(8, Fixed8);

        Ok(Number::Arb(BignumArb::from_decimal(s)?))
    }

    pub fn to_decimal(&self) -> String {
        self.to_arb().to_decimal()
    }

    /// Converts to the arbitrary-precision representation, regardless of
    /// the current variant. Used as the common ground for cross-variant
    /// arithmetic and for [`Number::fit_to_size`].
    pub fn to_arb(&self) -> BignumArb {
        match self {
            Number::Fixed1(x) => BignumArb::from_limbs(x.0.to_vec()),
            Number::Fixed2(x) => BignumArb::from_limbs(x.0.to_vec()),
            Number::Fixed3(x) => BignumArb::from_limbs(x.0.to_vec()),
            Number::Fixed4(x) => BignumArb::from_limbs(x.0.to_vec()),
            Number::Fixed5(x) => BignumArb::from_limbs(x.0.to_vec()),
            Number::Fixed6(x) => BignumArb::from_limbs(x.0.to_vec()),
            Number::Fixed7(x) => BignumArb::from_limbs(x.0.to_vec()),
            Number::Fixed8(x) => BignumArb::from_limbs(x.0.to_vec()),
            Number::Arb(x) => x.clone(),
        }
    }

    /// Migrates to the smallest variant that can hold the current value.
    pub fn fit_to_size(&self) -> Self {
        let arb = self.to_arb();
        let limbs = arb.real_size();
        macro_rules! try_fixed {
            ($s:literal, $variant:ident) => {
                if limbs <= $s {
                    return Number::$variant(arb_to_fixed::<$s>(&arb));
                }
            };
        }
        try_fixed!(1, Fixed1);
        try_fixed!(2, Fixed2);
        try_fixed!(3, Fixed3);
        try_fixed!(4, Fixed4);
        try_fixed!(5, Fixed5);
        try_fixed!(6, Fixed6);
        try_fixed!(7, Fixed7);
        try_fixed!(8, Fixed8);
        Number::Arb(arb)
    }

    pub fn is_zero(&self) -> bool {
        self.to_arb().is_zero()
    }

    pub fn cmp_value(&self, other: &Self) -> Ordering {
        self.to_arb().cmp_value(&other.to_arb())
    }

    pub fn add(&self, other: &Self) -> Self {
        Number::Arb(self.to_arb().add(&other.to_arb())).fit_to_size()
    }

    /// `|self - other|`; returns the magnitude and whether `self < other`.
    pub fn sub(&self, other: &Self) -> (Self, bool) {
        let (mag, negative) = self.to_arb().sub(&other.to_arb());
        (Number::Arb(mag).fit_to_size(), negative)
    }

    pub fn mul(&self, other: &Self) -> Self {
        Number::Arb(self.to_arb().mul(&other.to_arb())).fit_to_size()
    }

    pub fn div_rem(&self, other: &Self) -> (Self, Self) {
        let (q, r) = self.to_arb().div_rem(&other.to_arb());
        (Number::Arb(q).fit_to_size(), Number::Arb(r).fit_to_size())
    }

    pub fn gcd(&self, other: &Self) -> Self {
        Number::Arb(self.to_arb().gcd(&other.to_arb())).fit_to_size()
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_value(other) == Ordering::Equal
    }
}
impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp_value(other))
    }
}
impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_value(other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal())
    }
}

fn arb_to_fixed<const S: usize>(arb: &BignumArb) -> FixedInt<S> {
    let mut limbs = [0u64; S];
    let src = arb.limbs();
    let n = src.len().min(S);
    limbs[..n].copy_from_slice(&src[..n]);
    FixedInt(limbs)
}
