//! Stage-1 bytecode compilation: turns the Stage-1 cofactor — the product of
//! every prime power up to `B1` — into a short sequence of compiled
//! programs, one block per prime power.
//!
//! Ported from `cascadeMultiplication.h`'s `createBytecode`/`ecmStage1Mul`.
//! The original chains several blocks into a single program; here each
//! prime power compiles to its own one-block program instead (see the
//! architecture note in `DESIGN.md`), so `bytecode::Writer`/`bytecode::vm`
//! — built earlier as a strictly one-block-per-program pair — need no
//! change to support the cascade. The running point is threaded from one
//! compiled program to the next by the caller in `ecm::run`.
//!
//! `doubleAndAddMul`/`nafMul`/`wnafMul`/`pracMul` only ever multiply by a
//! `u64`, which is exactly why the cascade exists: every individual
//! prime-power factor of the Stage-1 cofactor fits comfortably in a `u64`
//! even though their product (the true cofactor) does not.

use crate::bytecode::compiler::Writer;
use crate::scalarmul::dynamic_naf::best_width;
use crate::scalarmul::naf::wnaf;
use crate::scalarmul::prac::initial_d_e;
use crate::tables::sieve_primes;

/// Which scalar-multiplication strategy Stage 1 compiles prime powers with.
/// Mirrors `EcmMulMethod`; there is no separate `WNaf5`/`WNaf6` dispatch
/// variant, same as the original — widths above 4 only ever come from
/// [`MulMethod::DynamicNaf`]'s own cost-based search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MulMethod {
    DoubleAndAdd,
    Naf,
    WNaf3,
    WNaf4,
    DynamicNaf,
    Prac,
}

impl MulMethod {
    pub fn is_prac(self) -> bool {
        matches!(self, MulMethod::Prac)
    }
}

/// How the prime powers up to `B1` are grouped into compiled programs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CascadeStrategy {
    /// One compiled program per prime power. Always correct, the default.
    Separate,
    /// Multiplies consecutive prime powers together into a single `u64`
    /// scalar while the running product doesn't overflow, trading more
    /// compiled programs for fewer, larger ones. The original flags its
    /// own `MaxUntilOverflow`/`MaxUntil256Overflow` variants of this idea
    /// as experimental ("TODO: something is wrong here"); this is a
    /// from-scratch reimplementation of the same idea that only ever
    /// combines powers while the product provably fits in a `u64`, so it
    /// carries none of that bug, but it's still opt-in pending broader
    /// testing against [`CascadeStrategy::Separate`].
    MaxUntilOverflow,
}

/// A compiled Stage-1 program for one `B1` bound: an optional power-of-two
/// preamble (only emitted for [`MulMethod::Prac`], which cannot start from
/// an even multiplier) followed by one compiled block per remaining
/// prime-power cofactor.
pub struct CompiledStage1 {
    pub preamble: Option<Vec<u8>>,
    pub blocks: Vec<Vec<u8>>,
}

/// Ported from `doubleAndAddMul(bc, n)`: the top bit seeds the accumulator
/// implicitly, then every lower bit gets a doubling and, if set, an add.
fn compile_double_and_add(bc: &mut Writer, n: u64) {
    debug_assert!(n > 1);
    bc.naf_start();
    let mut i = if n == 0 { 0 } else { 1u64 << (63 - n.leading_zeros()) };
    i >>= 1;
    while i > 0 {
        bc.naf_dbl();
        if n & i != 0 {
            bc.naf_add(0);
        }
        i >>= 1;
    }
    bc.naf_end();
}

/// Ported from `nafMul`/the `w = 2` case: MSB-1 walk of the plain NAF form,
/// always against the point itself (no odd-multiple table).
fn compile_naf(bc: &mut Writer, n: u64) {
    debug_assert!(n > 1);
    bc.naf_start();
    let naf_form = wnaf(n, 2);
    for i in (0..naf_form.len() - 1).rev() {
        bc.naf_dbl();
        match naf_form[i] {
            1 => bc.naf_add(0),
            -1 => bc.naf_sub(0),
            _ => {}
        }
    }
    bc.naf_end();
}

/// Ported from `wnafMul`: builds an odd-multiple table sized to the widest
/// digit the chosen window can produce, then walks the digits top to
/// bottom. `w` must be 3, 4, 5 or 6.
fn compile_wnaf(bc: &mut Writer, n: u64, w: u32) {
    debug_assert!((3..=6).contains(&w));
    debug_assert!(n > 1);

    let naf_form = wnaf(n, w);
    let table_size = ((crate::scalarmul::naf::absolute_max_naf(&naf_form) + 1) / 2) as u8;
    let last = *naf_form.last().unwrap();
    let mut start = naf_form.len() as isize - 3;
    let initial_index = if last != 1 {
        start += 1;
        ((last - 1) / 2) as u8
    } else {
        0
    };

    bc.naf_start_with_table(table_size, initial_index);
    if last == 1 {
        // The leading digit folds to exactly table[0] (= P); wnafMul then
        // assumes the digit one below it is forced to 0 by the
        // non-adjacency property and skips straight to 2P instead of
        // spending an iteration to confirm it.
        bc.naf_dbl();
    }

    let mut i = start;
    while i >= 0 {
        bc.naf_dbl();
        let d = naf_form[i as usize];
        if d > 0 {
            bc.naf_add(((d - 1) / 2) as u8);
        } else if d < 0 {
            bc.naf_sub(((-d - 1) / 2) as u8);
        }
        i -= 1;
    }
    bc.naf_end();
}

/// Ported from `getBestWNaf`/`dnafMul`: tries every window width from 2
/// through 6 and defers to whichever [`compile_naf`]/[`compile_wnaf`]
/// produces the cheapest chain under this curve form's cost model.
fn compile_dynamic_naf(bc: &mut Writer, n: u64, cost_params: (i32, i32, i32, i32)) {
    let (dbl_cost, add_cost, inter_dbl_cost, inter_add_cost) = cost_params;
    let w = best_width(n, dbl_cost, add_cost, inter_dbl_cost, inter_add_cost);
    if w == 2 {
        compile_naf(bc, n);
    } else {
        compile_wnaf(bc, n, w);
    }
}

/// Ported from `pracMul`/`prac`: replays the same Lucas-chain control flow
/// as [`crate::scalarmul::prac::mul`], but only to decide which rule fires
/// at each step — the actual `diffAdd`/`dbl` calls happen later, once per
/// curve, when [`crate::bytecode::vm::run_prac`] interprets the compiled
/// block. The unconditional initial doubling `prac` performs on every call
/// is not compiled here: `run_prac` performs it unconditionally instead,
/// since it never depends on the scalar.
fn compile_prac(bc: &mut Writer, k: u64, width: usize) {
    debug_assert!(k > 2);
    let (mut d, mut e) = initial_d_e(k, width);

    bc.prac_start();
    while d != e {
        let swap_before = d < e;
        if swap_before {
            std::mem::swap(&mut d, &mut e);
        }
        if d - e <= e / 4 && (d + e) % 3 == 0 {
            let new_d = (2 * d - e) / 3;
            e = (e - new_d) / 2;
            d = new_d;
            bc.prac_rule(1, swap_before);
        } else if d - e <= e / 4 && (d - e) % 6 == 0 {
            d = (d - e) / 2;
            bc.prac_rule(2, swap_before);
        } else if (d + 3) / 4 <= e {
            d -= e;
            bc.prac_rule(3, swap_before);
        } else if (d + e) % 2 == 0 {
            d = (d - e) / 2;
            bc.prac_rule(4, swap_before);
        } else if d % 2 == 0 {
            d /= 2;
            bc.prac_rule(5, swap_before);
        } else if d % 3 == 0 {
            d = d / 3 - e;
            bc.prac_rule(6, swap_before);
        } else if (d + e) % 3 == 0 {
            d = (d - 2 * e) / 3;
            bc.prac_rule(7, swap_before);
        } else if (d - e) % 3 == 0 {
            d = (d - e) / 3;
            bc.prac_rule(8, swap_before);
        } else {
            e /= 2;
            bc.prac_rule(9, swap_before);
        }
    }
    bc.prac_end();
}

/// Compiles one prime-power scalar into a single complete program (header +
/// one block + `End`), ready for [`crate::bytecode::vm`] to replay.
fn compile_power(method: MulMethod, k: u64, b1: u64, cost_params: (i32, i32, i32, i32), width: usize) -> Vec<u8> {
    let mut bc = Writer::new();
    bc.start(b1);
    match method {
        MulMethod::DoubleAndAdd => compile_double_and_add(&mut bc, k),
        MulMethod::Naf => compile_naf(&mut bc, k),
        MulMethod::WNaf3 => compile_wnaf(&mut bc, k, 3),
        MulMethod::WNaf4 => compile_wnaf(&mut bc, k, 4),
        MulMethod::DynamicNaf => compile_dynamic_naf(&mut bc, k, cost_params),
        MulMethod::Prac => compile_prac(&mut bc, k, width),
    }
    bc.end();
    bc.into_bytes()
}

/// Largest power of `p` that does not exceed `b1`.
fn largest_power_within(p: u64, b1: u64) -> u64 {
    let mut k = p;
    while let Some(next) = k.checked_mul(p) {
        if next > b1 {
            break;
        }
        k = next;
    }
    k
}

/// Compiles the full Stage-1 schedule for bound `b1`: a `Prac`-only
/// power-of-two preamble (`dbChainSTART`/`dbChainDBL`*/`dbChainEND`, ported
/// from `createBytecode`'s handling of `EcmMulMethod::Prac`) followed by one
/// compiled program per odd prime power up to `b1`.
pub fn compile_stage1(
    b1: u64,
    method: MulMethod,
    cascade: CascadeStrategy,
    cost_params: (i32, i32, i32, i32),
    width: usize,
) -> CompiledStage1 {
    let primes = sieve_primes(b1);

    let preamble = if method.is_prac() {
        let mut bc = Writer::new();
        bc.start(b1);
        bc.db_chain_start();
        let mut r: u64 = 2;
        while r <= b1 {
            bc.db_chain_dbl();
            r *= 2;
        }
        bc.db_chain_end();
        bc.end();
        Some(bc.into_bytes())
    } else {
        None
    };

    // With a Prac preamble already walking every power of two up to B1, the
    // main cascade starts at the next prime (index 1) to avoid reprocessing
    // 2's powers a second time, exactly as `createBytecode` skips i=0.
    let start_idx = if method.is_prac() { 1 } else { 0 };
    let powers: Vec<u64> = primes[start_idx..].iter().map(|&p| largest_power_within(p, b1)).collect();

    let blocks = match cascade {
        CascadeStrategy::Separate => powers.into_iter().map(|k| compile_power(method, k, b1, cost_params, width)).collect(),
        CascadeStrategy::MaxUntilOverflow => {
            let mut blocks = Vec::new();
            let mut acc: u64 = 1;
            for k in powers {
                match acc.checked_mul(k) {
                    Some(combined) => acc = combined,
                    None => {
                        blocks.push(compile_power(method, acc, b1, cost_params, width));
                        acc = k;
                    }
                }
            }
            if acc > 1 {
                blocks.push(compile_power(method, acc, b1, cost_params, width));
            }
            blocks
        }
    };

    CompiledStage1 { preamble, blocks }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn largest_power_within_stays_under_bound() {
        assert_eq!(largest_power_within(2, 1000), 512);
        assert_eq!(largest_power_within(3, 1000), 729);
        assert_eq!(largest_power_within(997, 1000), 997);
    }

    #[test]
    fn compiled_naf_program_opens_with_naf_block() {
        let bytes = compile_power(MulMethod::Naf, 19, 100, (8, 8, 8, 8), 4);
        assert_eq!(bytes[48] & 0x0f, crate::bytecode::format::Block::Naf as u8);
    }

    #[test]
    fn compiled_prac_program_opens_with_prac_block() {
        let bytes = compile_power(MulMethod::Prac, 19, 100, (8, 8, 8, 8), 4);
        assert_eq!(bytes[48] & 0x0f, crate::bytecode::format::Block::Prac as u8);
    }
}
