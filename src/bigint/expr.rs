//! Chained modular arithmetic builder.
//!
//! The original expresses `R <- a*b + c*d`-style formulas as C++ expression
//! templates that compose at compile time and forbid the destination from
//! aliasing anything but the leftmost operand (so no hidden temporary is
//! ever needed). Rust has no equivalent compile-time trick here without a
//! proc macro, so this is the "tiny builder that assembles a sequence of
//! primitive modular ops and executes them" instead: [`ModExpr::new`] seeds
//! an accumulator from the leftmost operand, each chained call folds one
//! more primitive op into it, and the leftmost-aliasing rule becomes a
//! `debug_assert` against the operand's pointer identity.

use super::{barrett::BarrettCtx, montgomery::MontgomeryCtx};

/// The primitive modular operations a context must provide to back a
/// [`ModExpr`] chain.
pub trait ModContext {
    fn width(&self) -> usize;
    fn modulus(&self) -> &[u64];
    fn add(&self, r: &mut [u64], a: &[u64], b: &[u64]);
    fn sub(&self, r: &mut [u64], a: &[u64], b: &[u64]);
    fn mul(&self, r: &mut [u64], a: &[u64], b: &[u64]);
    fn sqr(&self, r: &mut [u64], a: &[u64]);
    fn neg(&self, r: &mut [u64], a: &[u64]);
    fn dbl(&self, r: &mut [u64], a: &[u64]);
    fn inv(&self, r: &mut [u64], a: &[u64]);
    /// Reduces the small literal `v` and converts it to this context's
    /// residue representation (Montgomery form, or raw for Barrett).
    fn get_constant(&self, v: u64) -> Vec<u64>;

    /// Reduces an arbitrary-width raw value `a` and converts it to this
    /// context's residue representation. The general form of
    /// [`ModContext::get_constant`], for operands too wide for a `u64`
    /// literal (e.g. a primality witness, or `n - 1` itself).
    fn to_residue(&self, a: &[u64]) -> Vec<u64>;

    /// Converts a residue back to a raw value less than the modulus.
    fn from_residue(&self, a: &[u64]) -> Vec<u64>;
}

impl ModContext for MontgomeryCtx {
    fn width(&self) -> usize {
        self.limb_width()
    }
    fn modulus(&self) -> &[u64] {
        MontgomeryCtx::modulus(self)
    }
    fn add(&self, r: &mut [u64], a: &[u64], b: &[u64]) {
        MontgomeryCtx::add(self, r, a, b)
    }
    fn sub(&self, r: &mut [u64], a: &[u64], b: &[u64]) {
        MontgomeryCtx::sub(self, r, a, b)
    }
    fn mul(&self, r: &mut [u64], a: &[u64], b: &[u64]) {
        MontgomeryCtx::mul(self, r, a, b)
    }
    fn sqr(&self, r: &mut [u64], a: &[u64]) {
        MontgomeryCtx::sqr(self, r, a)
    }
    fn neg(&self, r: &mut [u64], a: &[u64]) {
        MontgomeryCtx::neg(self, r, a)
    }
    fn dbl(&self, r: &mut [u64], a: &[u64]) {
        MontgomeryCtx::dbl(self, r, a)
    }
    fn inv(&self, r: &mut [u64], a: &[u64]) {
        MontgomeryCtx::inv(self, r, a)
    }
    fn get_constant(&self, v: u64) -> Vec<u64> {
        MontgomeryCtx::get_constant(self, v)
    }
    fn to_residue(&self, a: &[u64]) -> Vec<u64> {
        self.to_montgomery(a)
    }
    fn from_residue(&self, a: &[u64]) -> Vec<u64> {
        self.from_montgomery(a)
    }
}

impl ModContext for BarrettCtx {
    fn width(&self) -> usize {
        self.limb_width()
    }
    fn modulus(&self) -> &[u64] {
        BarrettCtx::modulus(self)
    }
    fn add(&self, r: &mut [u64], a: &[u64], b: &[u64]) {
        BarrettCtx::add(self, r, a, b)
    }
    fn sub(&self, r: &mut [u64], a: &[u64], b: &[u64]) {
        BarrettCtx::sub(self, r, a, b)
    }
    fn mul(&self, r: &mut [u64], a: &[u64], b: &[u64]) {
        BarrettCtx::mul(self, r, a, b)
    }
    fn sqr(&self, r: &mut [u64], a: &[u64]) {
        BarrettCtx::sqr(self, r, a)
    }
    fn neg(&self, r: &mut [u64], a: &[u64]) {
        BarrettCtx::neg(self, r, a)
    }
    fn dbl(&self, r: &mut [u64], a: &[u64]) {
        BarrettCtx::dbl(self, r, a)
    }
    fn inv(&self, r: &mut [u64], a: &[u64]) {
        BarrettCtx::inv(self, r, a)
    }
    fn get_constant(&self, v: u64) -> Vec<u64> {
        BarrettCtx::get_constant(self, v)
    }
    fn to_residue(&self, a: &[u64]) -> Vec<u64> {
        let mut out = vec![0u64; self.limb_width()];
        super::limbs::modulus(&mut out, a, self.modulus());
        out
    }
    fn from_residue(&self, a: &[u64]) -> Vec<u64> {
        let mut out = vec![0u64; self.limb_width()];
        let n = a.len().min(out.len());
        out[..n].copy_from_slice(&a[..n]);
        out
    }
}

/// `base^exp mod n`, residues in and out, by square-and-multiply over
/// `exp`'s bits from the top down. Ported from the original's `modPow`,
/// which the primality tester and Pollard p-1's Stage 1 both call directly
/// on a raw exponent rather than through an expression chain.
pub fn mod_pow(ctx: &dyn ModContext, base: &[u64], exp: &[u64]) -> Vec<u64> {
    let bits = super::limbs::bit_length(exp);
    let mut acc = ctx.get_constant(1);
    for i in (0..bits).rev() {
        let mut sq = vec![0u64; ctx.width()];
        ctx.sqr(&mut sq, &acc);
        acc = sq;

        let limb = (i / 64) as usize;
        let bit = i % 64;
        if (exp[limb] >> bit) & 1 == 1 {
            let mut m = vec![0u64; ctx.width()];
            ctx.mul(&mut m, &acc, base);
            acc = m;
        }
    }
    acc
}

/// A chain of modular operations folded left-to-right into a running
/// accumulator, seeded from the leftmost operand of the expression.
///
/// `R <- a*b + c` reads as `ModExpr::new(ctx, a).mul(b).add(c).eval()`.
pub struct ModExpr<'a, C: ModContext> {
    ctx: &'a C,
    acc: Vec<u64>,
    leftmost: *const u64,
}

impl<'a, C: ModContext> ModExpr<'a, C> {
    /// Seeds the chain from `first`, the expression's leftmost operand.
    /// No later operand (chained or plain) may alias this slice's storage.
    pub fn new(ctx: &'a C, first: &[u64]) -> Self {
        Self { ctx, acc: first.to_vec(), leftmost: first.as_ptr() }
    }

    /// Panics in debug builds if `operand` is the same buffer the chain was
    /// seeded from — mirroring `allOperandsButFirstDifferent`.
    fn check_operand(&self, operand: &[u64]) {
        debug_assert!(
            operand.is_empty() || operand.as_ptr() != self.leftmost,
            "modular expression operand aliases the leftmost operand"
        );
    }

    fn fold(mut self, f: impl FnOnce(&C, &mut [u64], &[u64])) -> Self {
        let mut r = vec![0u64; self.ctx.width()];
        f(self.ctx, &mut r, &self.acc);
        self.acc = r;
        self
    }

    pub fn add(mut self, b: &[u64]) -> Self {
        self.check_operand(b);
        let mut r = vec![0u64; self.ctx.width()];
        self.ctx.add(&mut r, &self.acc, b);
        self.acc = r;
        self
    }

    pub fn sub(mut self, b: &[u64]) -> Self {
        self.check_operand(b);
        let mut r = vec![0u64; self.ctx.width()];
        self.ctx.sub(&mut r, &self.acc, b);
        self.acc = r;
        self
    }

    pub fn mul(mut self, b: &[u64]) -> Self {
        self.check_operand(b);
        let mut r = vec![0u64; self.ctx.width()];
        self.ctx.mul(&mut r, &self.acc, b);
        self.acc = r;
        self
    }

    pub fn sqr(self) -> Self {
        self.fold(C::sqr)
    }

    pub fn neg(self) -> Self {
        self.fold(C::neg)
    }

    pub fn dbl(self) -> Self {
        self.fold(C::dbl)
    }

    pub fn inv(self) -> Self {
        self.fold(C::inv)
    }

    pub fn eval(self) -> Vec<u64> {
        self.acc
    }

    pub fn eval_into(self, dest: &mut [u64]) {
        dest.copy_from_slice(&self.acc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_computes_left_to_right() {
        let n = vec![1_000_000_007u64];
        let ctx = MontgomeryCtx::new(&n);
        let a = ctx.get_constant(3);
        let b = ctx.get_constant(5);
        let c = ctx.get_constant(7);

        // (a * b) + c  ==  3*5 + 7 == 22
        let r = ModExpr::new(&ctx, &a).mul(&b).add(&c).eval();
        let expected = ctx.get_constant(22);
        assert_eq!(r, expected);
    }

    #[test]
    #[should_panic(expected = "aliases the leftmost operand")]
    fn reusing_leftmost_operand_panics_in_debug() {
        let n = vec![97u64];
        let ctx = BarrettCtx::new(&n);
        let a = ctx.get_constant(5);
        let _ = ModExpr::new(&ctx, &a).add(&a).eval();
    }
}
