//! Scalar multiplication strategies for the "can add" curve forms.
//!
//! Short Weierstrass and twisted Edwards points support a full group law
//! (`add`/`sub`/`dbl`), so any chain-based multiplier works on them through
//! the [`CurveGroup`] trait below. Montgomery `(X:Z)` points cannot be added
//! without a known difference (the original's `montgomery.h` literally
//! `debugAssert(false, "cannot add using montgomery form")` for `add`/`sub`),
//! so Montgomery curves are only ever driven through [`prac`], which walks a
//! Lucas chain using `diffAdd`/`dbl` alone.

pub mod double_and_add;
pub mod dynamic_naf;
pub mod naf;
pub mod prac;
pub mod wnaf;

use crate::bigint::expr::ModContext;
use crate::curves::sw::ShortWeierstrass;
use crate::curves::te::TwistedEdwards;
use crate::curves::{SwPoint, TePoint};

/// A curve form whose point type supports addition, subtraction and
/// doubling — the minimum a chain-based scalar multiplier needs.
pub trait CurveGroup<P> {
    fn dbl(&self, ctx: &dyn ModContext, p: &P) -> P;
    fn add(&self, ctx: &dyn ModContext, p: &P, q: &P) -> P;
    fn sub(&self, ctx: &dyn ModContext, p: &P, q: &P) -> P;
    fn identity(&self, ctx: &dyn ModContext) -> P;

    /// `(dblCost, addCost, intermediateDblCost, intermediateAddCost)` in
    /// multiplications, used by the dynamic-NAF cost model to pick a window
    /// width. Matches the constants `dnafMul` hardcodes per curve type.
    fn naf_cost_params(&self) -> (i32, i32, i32, i32);

    /// `R <- 3P`. Defaults to `dbl` then `add`; curve forms with a cheaper
    /// fused tripling formula (twisted Edwards) override this.
    fn tpl(&self, ctx: &dyn ModContext, p: &P) -> P {
        let doubled = self.dbl(ctx, p);
        self.add(ctx, &doubled, p)
    }
}

impl CurveGroup<SwPoint> for ShortWeierstrass {
    fn dbl(&self, ctx: &dyn ModContext, p: &SwPoint) -> SwPoint {
        ShortWeierstrass::dbl(self, ctx, p)
    }
    fn add(&self, ctx: &dyn ModContext, p: &SwPoint, q: &SwPoint) -> SwPoint {
        ShortWeierstrass::add(self, ctx, p, q)
    }
    fn sub(&self, ctx: &dyn ModContext, p: &SwPoint, q: &SwPoint) -> SwPoint {
        ShortWeierstrass::sub(self, ctx, p, q)
    }
    fn identity(&self, ctx: &dyn ModContext) -> SwPoint {
        SwPoint::identity(ctx)
    }
    fn naf_cost_params(&self) -> (i32, i32, i32, i32) {
        (12, 14, 12, 14)
    }
}

impl CurveGroup<TePoint> for TwistedEdwards {
    fn dbl(&self, ctx: &dyn ModContext, p: &TePoint) -> TePoint {
        TwistedEdwards::dbl(self, ctx, p)
    }
    fn add(&self, ctx: &dyn ModContext, p: &TePoint, q: &TePoint) -> TePoint {
        TwistedEdwards::add(self, ctx, p, q)
    }
    fn sub(&self, ctx: &dyn ModContext, p: &TePoint, q: &TePoint) -> TePoint {
        TwistedEdwards::sub(self, ctx, p, q)
    }
    fn identity(&self, ctx: &dyn ModContext) -> TePoint {
        TePoint::identity(ctx)
    }
    fn naf_cost_params(&self) -> (i32, i32, i32, i32) {
        (8, 8, 8, 8)
    }
    fn tpl(&self, ctx: &dyn ModContext, p: &TePoint) -> TePoint {
        TwistedEdwards::tpl(self, ctx, p)
    }
}
