//! Elliptic curve arithmetic over a runtime modulus.
//!
//! Three coordinate forms coexist behind [`CurvePoint`], mirroring the
//! `GeP1`/`GeP2`/`GeP3` family in `signatures::ed25519::group` and the
//! X25519 ladder in `keys::x25519::core` — except here the modulus is the
//! number under attack, chosen once per ECM run rather than fixed at
//! compile time, so every operation takes a `&dyn ModContext` instead of
//! closing over a `FieldElement`.
//!
//! Curve constants (Weierstrass `a`/`b`, twisted Edwards `d`/`2d`,
//! Montgomery `a24`) are precomputed residues in the same modular context
//! as the points they act on.

pub mod generate;
pub mod montgomery_xz;
pub mod sw;
pub mod te;

use crate::bigint::expr::ModContext;

/// A point on a short Weierstrass curve in projective coordinates
/// `(X : Y : Z)`, `x = X/Z`, `y = Y/Z`. The identity is `(0 : 1 : 0)`.
#[derive(Clone, Debug)]
pub struct SwPoint {
    pub x: Vec<u64>,
    pub y: Vec<u64>,
    pub z: Vec<u64>,
}

/// A point on a twisted (here: `a = -1`) Edwards curve in extended
/// coordinates `(X : Y : Z : T)`, `T = XY/Z`.
#[derive(Clone, Debug)]
pub struct TePoint {
    pub x: Vec<u64>,
    pub y: Vec<u64>,
    pub z: Vec<u64>,
    pub t: Vec<u64>,
}

/// A point on a Montgomery curve tracked only by its `X`/`Z` coordinates —
/// the `y` coordinate never participates in a differential ladder, so it
/// is never computed.
#[derive(Clone, Debug)]
pub struct XzPoint {
    pub x: Vec<u64>,
    pub z: Vec<u64>,
}

fn zero(ctx: &dyn ModContext) -> Vec<u64> {
    vec![0u64; ctx.width()]
}

fn one(ctx: &dyn ModContext) -> Vec<u64> {
    ctx.get_constant(1)
}

impl SwPoint {
    /// The point at infinity, `(0 : 1 : 0)`.
    pub fn identity(ctx: &dyn ModContext) -> Self {
        Self { x: zero(ctx), y: one(ctx), z: zero(ctx) }
    }

    pub fn is_identity(&self) -> bool {
        crate::bigint::limbs::real_size(&self.z) == 0
    }
}

impl TePoint {
    /// The neutral element, `(0 : 1 : 1 : 0)`.
    pub fn identity(ctx: &dyn ModContext) -> Self {
        Self { x: zero(ctx), y: one(ctx), z: one(ctx), t: zero(ctx) }
    }
}
