//! Short Weierstrass curve arithmetic in projective coordinates.
//!
//! `y^2 z = x^3 + a x z^2 + b z^3`, identity `(0 : 1 : 0)`. Ported from the
//! original's `ShortWeierstrassProjective::_addsub`/`dbl` (`b` never
//! appears in either formula — only `a` and the point coordinates, since
//! they already satisfy the curve equation) — generalised from in-place
//! mutation of a single scratch-backed point to functions returning a
//! fresh [`SwPoint`], the way the rest of this crate's curve code is
//! structured.

use crate::bigint::expr::ModContext;
use crate::curves::SwPoint;

/// Curve parameter `a`, already reduced into `ctx`'s residue domain. `b`
/// is not stored: neither the addition nor the doubling formula below
/// references it.
pub struct ShortWeierstrass {
    pub a: Vec<u64>,
}

impl ShortWeierstrass {
    fn addsub(&self, ctx: &dyn ModContext, p: &SwPoint, q: &SwPoint, is_add: bool) -> SwPoint {
        let w = ctx.width();

        let mut u4 = vec![0u64; w];
        if is_add {
            u4.copy_from_slice(&q.y);
        } else {
            ctx.neg(&mut u4, &q.y);
        }

        let mut u0 = vec![0u64; w]; // V = Px*Qz
        ctx.mul(&mut u0, &p.x, &q.z);
        let mut u1 = vec![0u64; w]; // U = Py*Qz
        ctx.mul(&mut u1, &p.y, &q.z);
        let mut u2 = vec![0u64; w]; // W = Pz*Qz
        ctx.mul(&mut u2, &p.z, &q.z);

        let mut u3 = vec![0u64; w]; // r = u4*Pz - U
        {
            let mut u4pz = vec![0u64; w];
            ctx.mul(&mut u4pz, &u4, &p.z);
            ctx.sub(&mut u3, &u4pz, &u1);
        }

        let mut h = vec![0u64; w]; // h = Qx*Pz - V
        {
            let mut qxpz = vec![0u64; w];
            ctx.mul(&mut qxpz, &q.x, &p.z);
            ctx.sub(&mut h, &qxpz, &u0);
        }

        let mut h2 = vec![0u64; w];
        ctx.sqr(&mut h2, &h);
        let mut v2 = vec![0u64; w]; // h2*V
        ctx.mul(&mut v2, &h2, &u0);
        let mut h3 = vec![0u64; w];
        ctx.mul(&mut h3, &h2, &h);

        let mut z_pre = vec![0u64; w]; // r^2*W - h3 - 2*v2
        {
            let mut r_sq = vec![0u64; w];
            ctx.sqr(&mut r_sq, &u3);
            let mut r_sq_w = vec![0u64; w];
            ctx.mul(&mut r_sq_w, &r_sq, &u2);
            let mut two_v2 = vec![0u64; w];
            ctx.dbl(&mut two_v2, &v2);
            let mut tmp = vec![0u64; w];
            ctx.sub(&mut tmp, &r_sq_w, &h3);
            ctx.sub(&mut z_pre, &tmp, &two_v2);
        }

        let mut u1h3 = vec![0u64; w]; // U*h3
        ctx.mul(&mut u1h3, &u1, &h3);

        let mut x3 = vec![0u64; w];
        ctx.mul(&mut x3, &h, &z_pre);

        let mut y3 = vec![0u64; w];
        {
            let mut diff = vec![0u64; w];
            ctx.sub(&mut diff, &v2, &z_pre);
            let mut left = vec![0u64; w];
            ctx.mul(&mut left, &diff, &u3);
            ctx.sub(&mut y3, &left, &u1h3);
        }

        let mut z3 = vec![0u64; w];
        ctx.mul(&mut z3, &h3, &u2);

        SwPoint { x: x3, y: y3, z: z3 }
    }

    /// `R <- P + Q`, 12M+2S+7D.
    pub fn add(&self, ctx: &dyn ModContext, p: &SwPoint, q: &SwPoint) -> SwPoint {
        self.addsub(ctx, p, q, true)
    }

    /// `R <- P - Q`: negates `Qy` and reuses the addition formula.
    pub fn sub(&self, ctx: &dyn ModContext, p: &SwPoint, q: &SwPoint) -> SwPoint {
        self.addsub(ctx, p, q, false)
    }

    /// `R <- 2P`, 6M+6S+12D.
    pub fn dbl(&self, ctx: &dyn ModContext, p: &SwPoint) -> SwPoint {
        let w = ctx.width();

        let mut u0 = vec![0u64; w]; // X^2
        ctx.sqr(&mut u0, &p.x);

        let mut u1 = vec![0u64; w]; // 2*Y*Z
        {
            let mut yz = vec![0u64; w];
            ctx.mul(&mut yz, &p.y, &p.z);
            ctx.dbl(&mut u1, &yz);
        }

        let mut u2 = vec![0u64; w]; // Y*u1
        ctx.mul(&mut u2, &p.y, &u1);

        let mut u3 = vec![0u64; w]; // u2^2
        ctx.sqr(&mut u3, &u2);

        let mut u4 = vec![0u64; w]; // a*Z^2 + 3*X^2
        {
            let mut z_sq = vec![0u64; w];
            ctx.sqr(&mut z_sq, &p.z);
            let mut a_zsq = vec![0u64; w];
            ctx.mul(&mut a_zsq, &self.a, &z_sq);
            let mut three_u0 = vec![0u64; w];
            {
                let mut two_u0 = vec![0u64; w];
                ctx.dbl(&mut two_u0, &u0);
                ctx.add(&mut three_u0, &two_u0, &u0);
            }
            ctx.add(&mut u4, &a_zsq, &three_u0);
        }

        let mut z_new = vec![0u64; w]; // (X+u2)^2 - X^2 - u3
        {
            let mut sum = vec![0u64; w];
            ctx.add(&mut sum, &p.x, &u2);
            let mut sum_sq = vec![0u64; w];
            ctx.sqr(&mut sum_sq, &sum);
            let mut tmp = vec![0u64; w];
            ctx.sub(&mut tmp, &sum_sq, &u0);
            ctx.sub(&mut z_new, &tmp, &u3);
        }

        let mut u2_new = vec![0u64; w]; // u4^2 - 2*z_new
        {
            let mut u4_sq = vec![0u64; w];
            ctx.sqr(&mut u4_sq, &u4);
            let mut two_z_new = vec![0u64; w];
            ctx.dbl(&mut two_z_new, &z_new);
            ctx.sub(&mut u2_new, &u4_sq, &two_z_new);
        }

        let mut y3 = vec![0u64; w]; // (z_new - u2_new)*u4 - 2*u3
        {
            let mut diff = vec![0u64; w];
            ctx.sub(&mut diff, &z_new, &u2_new);
            let mut prod = vec![0u64; w];
            ctx.mul(&mut prod, &diff, &u4);
            let mut two_u3 = vec![0u64; w];
            ctx.dbl(&mut two_u3, &u3);
            ctx.sub(&mut y3, &prod, &two_u3);
        }

        let mut x3 = vec![0u64; w];
        ctx.mul(&mut x3, &u2_new, &u1);

        let mut z3 = vec![0u64; w]; // u1^3
        {
            let mut u1_sq = vec![0u64; w];
            ctx.sqr(&mut u1_sq, &u1);
            ctx.mul(&mut z3, &u1_sq, &u1);
        }

        SwPoint { x: x3, y: y3, z: z3 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bigint::barrett::BarrettCtx;

    #[test]
    fn doubling_identity_stays_identity() {
        let n = vec![1_000_003u64];
        let ctx = BarrettCtx::new(&n);
        let curve = ShortWeierstrass { a: ctx.get_constant(2) };
        let id = SwPoint::identity(&ctx);
        let doubled = curve.dbl(&ctx, &id);
        assert!(doubled.is_identity());
    }
}
