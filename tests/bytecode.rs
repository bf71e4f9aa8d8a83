//! Stage-1 bytecode round-trip: a compiled program, replayed through the
//! VM, must move a point exactly as far as multiplying it directly by the
//! Stage-1 cofactor it was compiled for.

use factorengine::bigint::expr::ModContext;
use factorengine::bigint::montgomery::MontgomeryCtx;
use factorengine::bytecode::vm;
use factorengine::curves::generate;
use factorengine::ecm::stage1::{compile_stage1, CascadeStrategy, MulMethod};
use factorengine::scalarmul::{double_and_add, prac};
use factorengine::tables::sieve_primes;

fn ctx_for(n: u64) -> MontgomeryCtx {
    MontgomeryCtx::new(&[n])
}

/// The Stage-1 cofactor `compile_stage1` compiled for: the product of the
/// largest power of each prime up to `b1` that stays within `b1`.
fn stage1_cofactor(b1: u64) -> u64 {
    sieve_primes(b1)
        .into_iter()
        .map(|p| {
            let mut k = p;
            while let Some(next) = k.checked_mul(p) {
                if next > b1 {
                    break;
                }
                k = next;
            }
            k
        })
        .product()
}

fn sw_eq(ctx: &dyn ModContext, p: &factorengine::curves::SwPoint, q: &factorengine::curves::SwPoint) -> bool {
    let w = ctx.width();
    let mut lhs = vec![0u64; w];
    let mut rhs = vec![0u64; w];
    ctx.mul(&mut lhs, &p.x, &q.z);
    ctx.mul(&mut rhs, &q.x, &p.z);
    if lhs != rhs {
        return false;
    }
    ctx.mul(&mut lhs, &p.y, &q.z);
    ctx.mul(&mut rhs, &q.y, &p.z);
    lhs == rhs
}

fn xz_eq(ctx: &dyn ModContext, p: &factorengine::curves::XzPoint, q: &factorengine::curves::XzPoint) -> bool {
    let w = ctx.width();
    let mut lhs = vec![0u64; w];
    let mut rhs = vec![0u64; w];
    ctx.mul(&mut lhs, &p.x, &q.z);
    ctx.mul(&mut rhs, &q.x, &p.z);
    lhs == rhs
}

#[test]
fn compiled_naf_program_matches_direct_multiplication() {
    let b1 = 30;
    let ctx = ctx_for(1_000_003 * 1_009);
    let (curve, point) = generate::short_weierstrass_initialize(&ctx, generate::short_weierstrass_default_seed());

    let compiled = compile_stage1(b1, MulMethod::Naf, CascadeStrategy::Separate, (12, 14, 12, 14), ctx.width());
    assert!(compiled.preamble.is_none(), "Naf never needs a power-of-two preamble");

    let mut via_bytecode = point.clone();
    for block in &compiled.blocks {
        via_bytecode = vm::run_group(&curve, &ctx, &via_bytecode, block);
    }

    let via_direct = double_and_add::mul(&curve, &ctx, &point, stage1_cofactor(b1));
    assert!(sw_eq(&ctx, &via_bytecode, &via_direct));
}

#[test]
fn compiled_dynamic_naf_program_matches_direct_multiplication() {
    let b1 = 50;
    let ctx = ctx_for(1_000_003 * 1_009);
    let point = generate::twisted_edwards_initialize(&ctx, generate::twisted_edwards_default_seed());
    let curve = generate::derive_twisted_edwards_curve(&ctx, &point);

    let compiled = compile_stage1(b1, MulMethod::DynamicNaf, CascadeStrategy::Separate, (8, 8, 8, 8), ctx.width());

    let mut via_bytecode = point.clone();
    for block in &compiled.blocks {
        via_bytecode = vm::run_group(&curve, &ctx, &via_bytecode, block);
    }

    let via_direct = double_and_add::mul(&curve, &ctx, &point, stage1_cofactor(b1));
    assert!(factorengine_te_eq(&ctx, &via_bytecode, &via_direct));
}

fn factorengine_te_eq(ctx: &dyn ModContext, p: &factorengine::curves::TePoint, q: &factorengine::curves::TePoint) -> bool {
    let w = ctx.width();
    let mut lhs = vec![0u64; w];
    let mut rhs = vec![0u64; w];
    ctx.mul(&mut lhs, &p.x, &q.z);
    ctx.mul(&mut rhs, &q.x, &p.z);
    if lhs != rhs {
        return false;
    }
    ctx.mul(&mut lhs, &p.y, &q.z);
    ctx.mul(&mut rhs, &q.y, &p.z);
    lhs == rhs
}

#[test]
fn compiled_prac_program_including_preamble_matches_direct_multiplication() {
    let b1 = 30;
    let ctx = ctx_for(10403);
    let (curve, point) = generate::montgomery_initialize(&ctx, 6);

    let compiled = compile_stage1(b1, MulMethod::Prac, CascadeStrategy::Separate, (0, 0, 0, 0), ctx.width());
    let preamble = compiled.preamble.as_ref().expect("Prac always compiles a power-of-two preamble");

    let mut via_bytecode = vm::run_prac(&curve, &ctx, &point, preamble);
    for block in &compiled.blocks {
        via_bytecode = vm::run_prac(&curve, &ctx, &via_bytecode, block);
    }

    let via_direct = prac_mul_compound(&curve, &ctx, &point, stage1_cofactor(b1));
    assert!(xz_eq(&ctx, &via_bytecode, &via_direct));
}

/// `prac::mul` alone can't take the full Stage-1 cofactor in one call the
/// way the direct-multiplication baselines above do for the group-law
/// forms: PRAC requires `k > 2`, so when the cofactor is even (always,
/// here — `2` is always one of its prime-power factors) we peel the
/// power-of-two part off as repeated doublings first, exactly like the
/// preamble it's being checked against.
fn prac_mul_compound(
    curve: &factorengine::curves::montgomery_xz::MontgomeryXz,
    ctx: &dyn ModContext,
    point: &factorengine::curves::XzPoint,
    cofactor: u64,
) -> factorengine::curves::XzPoint {
    let mut k = cofactor;
    let mut twos = 0u32;
    while k % 2 == 0 {
        k /= 2;
        twos += 1;
    }
    let mut acc = point.clone();
    for _ in 0..twos {
        acc = curve.dbl(ctx, &acc);
    }
    if k > 2 {
        acc = prac::mul(curve, ctx, &acc, k);
    } else if k == 1 {
        // already fully consumed by the doubling chain
    } else {
        acc = curve.dbl(ctx, &acc);
    }
    acc
}
