//! Pollard's rho, both the classic tortoise-and-hare form and Brent's
//! cycle-finding variant, each with batched GCDs to amortize the expensive
//! part of the loop.
//!
//! Ported from `Factorization/PollardRho.h`. `f(x) = x^2 + 1` is walked in
//! residue space the whole way through; only the running difference is
//! ever converted back to a raw value, and only when a batch's accumulated
//! product might be worth a `gcd` against the modulus.

use crate::bigint::arb::BignumArb;
use crate::bigint::expr::ModContext;
use std::cmp::Ordering;

/// Tuning and progress state for one [`pollard_rho`]/[`pollard_rho_brent`]
/// call. `batch_iter_size == 0` requests the dynamic schedule both
/// functions use by default: 1 iteration before any batching data exists,
/// then 10, then 100 after the first 100 total iterations, then 500 after
/// the first 1000.
#[derive(Clone, Debug)]
pub struct PollardRhoParams {
    pub batch_iter_size: u64,
    pub max_iter_count: u64,
    pub out_iter_count: u64,
}

impl PollardRhoParams {
    pub fn new(batch_iter_size: u64, max_iter_count: u64) -> Self {
        Self { batch_iter_size, max_iter_count, out_iter_count: 0 }
    }

    fn rescale_if_dynamic(&mut self, dynamic: bool) {
        if !dynamic {
            return;
        }
        self.batch_iter_size = if self.out_iter_count >= 1000 {
            500
        } else if self.out_iter_count >= 100 {
            100
        } else {
            10
        };
    }
}

fn raw_gcd(ctx: &dyn ModContext, residue: &[u64]) -> BignumArb {
    let raw = ctx.from_residue(residue);
    let n = BignumArb::from_limbs(ctx.modulus().to_vec());
    BignumArb::from_limbs(raw).gcd(&n)
}

fn step(ctx: &dyn ModContext, x: &mut Vec<u64>, one: &[u64]) {
    let width = ctx.width();
    let mut sq = vec![0u64; width];
    ctx.sqr(&mut sq, x);
    let mut sum = vec![0u64; width];
    ctx.add(&mut sum, &sq, one);
    *x = sum;
}

fn abs_sub(ctx: &dyn ModContext, a: &[u64], b: &[u64]) -> Vec<u64> {
    let width = ctx.width();
    let mut r = vec![0u64; width];
    ctx.sub(&mut r, a, b);
    r
}

/// Brent's variant: batches squarings in geometrically doubling run lengths
/// `r = 1, 2, 4, 8, ...` instead of the classic algorithm's fixed
/// tortoise/hare pairing, then backtracks one step at a time the moment a
/// batch gcd turns up non-trivial to pin down exactly which step produced it.
pub fn pollard_rho_brent(ctx: &dyn ModContext, params: &mut PollardRhoParams) -> BignumArb {
    let one = BignumArb::from_u64(1);
    let one_const = ctx.get_constant(1);
    let mut x = ctx.get_constant(2);
    let mut d = one_const.clone();

    params.out_iter_count = 0;
    let dynamic = params.batch_iter_size == 0;
    if dynamic {
        params.batch_iter_size = 1;
    }

    loop {
        let mut r = 1u64;
        loop {
            let y = x.clone();
            for _ in 0..r {
                step(ctx, &mut x, &one_const);
            }
            params.out_iter_count += r;

            let mut k = 0u64;
            let mut d_is_zero = false;
            loop {
                let xs = x.clone();
                let end = params.batch_iter_size.min(r - k);
                for _ in 0..end {
                    step(ctx, &mut x, &one_const);
                    let dtmp = abs_sub(ctx, &x, &y);
                    let mut prod = vec![0u64; ctx.width()];
                    ctx.mul(&mut prod, &d, &dtmp);
                    d = prod;
                }
                params.out_iter_count += end;
                params.rescale_if_dynamic(dynamic);

                d_is_zero = BignumArb::from_limbs(ctx.from_residue(&d)).is_zero();

                if !d_is_zero {
                    let g = raw_gcd(ctx, &d);
                    if g.cmp_value(&one) != Ordering::Equal {
                        return g;
                    }
                } else {
                    let mut xs = xs;
                    for _ in 0..params.batch_iter_size.saturating_sub(1) {
                        step(ctx, &mut xs, &one_const);
                        let dtmp = abs_sub(ctx, &xs, &y);
                        params.out_iter_count += 1;
                        let raw = BignumArb::from_limbs(ctx.from_residue(&dtmp));
                        if raw.is_zero() {
                            break;
                        }
                        let n = BignumArb::from_limbs(ctx.modulus().to_vec());
                        let g = raw.gcd(&n);
                        if g.cmp_value(&one) != Ordering::Equal {
                            return g;
                        }
                    }
                    if params.out_iter_count >= params.max_iter_count {
                        return one;
                    }
                    break;
                }

                if params.out_iter_count >= params.max_iter_count {
                    return one;
                }
                k += params.batch_iter_size;
                if k >= r {
                    break;
                }
            }

            if d_is_zero {
                break;
            }
            r *= 2;
        }
        let mut bumped = vec![0u64; ctx.width()];
        ctx.add(&mut bumped, &x, &one_const);
        x = bumped;
    }
}

/// The classic tortoise-and-hare: `x` advances one step per iteration, `y`
/// two, batched the same way as [`pollard_rho_brent`].
pub fn pollard_rho(ctx: &dyn ModContext, params: &mut PollardRhoParams) -> BignumArb {
    let one = BignumArb::from_u64(1);
    let one_const = ctx.get_constant(1);
    let n = BignumArb::from_limbs(ctx.modulus().to_vec());
    let mut x = ctx.get_constant(2);
    let mut d = one_const.clone();

    params.out_iter_count = 0;
    let dynamic = params.batch_iter_size == 0;
    if dynamic {
        params.batch_iter_size = 1;
    }

    loop {
        let mut y = x.clone();
        loop {
            let mut xs = x.clone();
            let mut ys = y.clone();
            for _ in 0..params.batch_iter_size {
                step(ctx, &mut x, &one_const);
                step(ctx, &mut y, &one_const);
                step(ctx, &mut y, &one_const);
                let dtmp = abs_sub(ctx, &y, &x);
                let mut prod = vec![0u64; ctx.width()];
                ctx.mul(&mut prod, &d, &dtmp);
                d = prod;
            }
            params.out_iter_count += params.batch_iter_size;
            params.rescale_if_dynamic(dynamic);

            let raw_d = BignumArb::from_limbs(ctx.from_residue(&d));
            if !raw_d.is_zero() {
                d = ctx.to_residue(raw_d.gcd(&n).limbs());
            } else {
                for _ in 0..params.batch_iter_size.saturating_sub(1) {
                    step(ctx, &mut xs, &one_const);
                    step(ctx, &mut ys, &one_const);
                    step(ctx, &mut ys, &one_const);
                    let diff = abs_sub(ctx, &ys, &xs);
                    params.out_iter_count += 1;
                    let raw = BignumArb::from_limbs(ctx.from_residue(&diff));
                    if raw.is_zero() {
                        break;
                    }
                    let g = raw.gcd(&n);
                    if g.cmp_value(&one) != Ordering::Equal {
                        return g;
                    }
                }
                if params.out_iter_count >= params.max_iter_count {
                    return one;
                }
                break;
            }

            let raw_d = BignumArb::from_limbs(ctx.from_residue(&d));
            if raw_d.cmp_value(&one) != Ordering::Equal {
                return raw_d;
            }
            if params.out_iter_count >= params.max_iter_count {
                return one;
            }
        }
        let mut bumped = vec![0u64; ctx.width()];
        ctx.add(&mut bumped, &x, &one_const);
        x = bumped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bigint::montgomery::MontgomeryCtx;

    #[test]
    fn finds_a_factor_of_a_small_semiprime() {
        let n = vec![8051u64]; // 83 * 97
        let ctx = MontgomeryCtx::new(&n);
        let mut params = PollardRhoParams::new(0, 1_000_000);
        let g = pollard_rho_brent(&ctx, &mut params);
        let v = g.to_decimal().parse::<u64>().unwrap();
        assert!(v == 83 || v == 97, "unexpected factor {v}");
    }

    #[test]
    fn classic_variant_also_finds_a_factor() {
        let n = vec![8051u64];
        let ctx = MontgomeryCtx::new(&n);
        let mut params = PollardRhoParams::new(0, 1_000_000);
        let g = pollard_rho(&ctx, &mut params);
        let v = g.to_decimal().parse::<u64>().unwrap();
        assert!(v == 83 || v == 97, "unexpected factor {v}");
    }
}
