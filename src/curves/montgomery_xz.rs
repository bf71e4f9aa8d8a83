//! Montgomery-form curve arithmetic, XZ coordinates only.
//!
//! `B y^2 = x^3 + A x^2 + x`, tracked as `(X : Z)` with `x = X/Z` — the `y`
//! coordinate is never computed, so there is no `add`/`sub` here, only the
//! differential primitives a Montgomery ladder or a PRAC chain needs. This
//! is the RFC 7748 ladder step from `keys::x25519::core::exchange`
//! (`xDBLADD`) split into its two named halves and generalised from the
//! fixed Curve25519 modulus to a runtime one.

use crate::bigint::expr::ModContext;
use crate::curves::XzPoint;

/// Curve constant `a24 = (a+2)/4`, already reduced into `ctx`'s residue
/// domain (the generalisation of X25519's fixed `121666`).
pub struct MontgomeryXz {
    pub a24: Vec<u64>,
}

impl MontgomeryXz {
    /// `R <- P + Q`, given the already-known difference `diff = P - Q`.
    pub fn diff_add(&self, ctx: &dyn ModContext, p: &XzPoint, q: &XzPoint, diff: &XzPoint) -> XzPoint {
        let w = ctx.width();

        let mut a = vec![0u64; w];
        ctx.add(&mut a, &p.x, &p.z);
        let mut b = vec![0u64; w];
        ctx.sub(&mut b, &p.x, &p.z);
        let mut c = vec![0u64; w];
        ctx.add(&mut c, &q.x, &q.z);
        let mut d = vec![0u64; w];
        ctx.sub(&mut d, &q.x, &q.z);

        let mut da = vec![0u64; w];
        ctx.mul(&mut da, &d, &a);
        let mut cb = vec![0u64; w];
        ctx.mul(&mut cb, &c, &b);

        let mut sum = vec![0u64; w];
        ctx.add(&mut sum, &da, &cb);
        let mut diff_dc = vec![0u64; w];
        ctx.sub(&mut diff_dc, &da, &cb);

        let mut sum_sq = vec![0u64; w];
        ctx.sqr(&mut sum_sq, &sum);
        let mut diff_sq = vec![0u64; w];
        ctx.sqr(&mut diff_sq, &diff_dc);

        let mut x3 = vec![0u64; w];
        ctx.mul(&mut x3, &diff.z, &sum_sq);
        let mut z3 = vec![0u64; w];
        ctx.mul(&mut z3, &diff.x, &diff_sq);

        XzPoint { x: x3, z: z3 }
    }

    /// `R <- 2P`.
    pub fn dbl(&self, ctx: &dyn ModContext, p: &XzPoint) -> XzPoint {
        let w = ctx.width();

        let mut a = vec![0u64; w];
        ctx.add(&mut a, &p.x, &p.z);
        let mut b = vec![0u64; w];
        ctx.sub(&mut b, &p.x, &p.z);

        let mut aa = vec![0u64; w];
        ctx.sqr(&mut aa, &a);
        let mut bb = vec![0u64; w];
        ctx.sqr(&mut bb, &b);

        let mut x2 = vec![0u64; w];
        ctx.mul(&mut x2, &aa, &bb);

        let mut e = vec![0u64; w];
        ctx.sub(&mut e, &aa, &bb);

        let mut a24e = vec![0u64; w];
        ctx.mul(&mut a24e, &self.a24, &e);
        let mut inner = vec![0u64; w];
        ctx.add(&mut inner, &bb, &a24e);
        let mut z2 = vec![0u64; w];
        ctx.mul(&mut z2, &e, &inner);

        XzPoint { x: x2, z: z2 }
    }

    /// `(R, S) <- (2P, P+Q)` given `diff = P - Q`, the fused ladder step
    /// (`xDBLADD`) used by the plain double-and-add and NAF/wNAF
    /// evaluators, which both walk the scalar one bit at a time.
    pub fn ladder_step(
        &self,
        ctx: &dyn ModContext,
        p: &XzPoint,
        q: &XzPoint,
        diff: &XzPoint,
    ) -> (XzPoint, XzPoint) {
        (self.dbl(ctx, p), self.diff_add(ctx, p, q, diff))
    }
}
