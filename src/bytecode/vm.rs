//! Stage-1 bytecode interpreter.
//!
//! Walks a compiled program and replays it against a concrete curve and
//! point. `run_group` drives the "can add" curve forms (short Weierstrass,
//! twisted Edwards) through `Naf`/`DbChain` blocks; `run_prac` drives a
//! Montgomery curve through a `Prac` block using only `diffAdd`/`dbl`.
//! Ported from `bytecode::Reader` plus the block-interpretation loops
//! implicit in how the original's `runBytecode` consumes what `Writer`
//! produces.

use super::format::{Block, NafOpCode, PracOpCode};
use crate::bigint::expr::ModContext;
use crate::curves::montgomery_xz::MontgomeryXz;
use crate::curves::XzPoint;
use crate::scalarmul::CurveGroup;

struct Reader<'a> {
    buffer: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buffer: &'a [u8], start: usize) -> Self {
        Self { buffer, pos: start }
    }

    fn peek(&self) -> u8 {
        self.buffer[self.pos]
    }

    fn next_byte(&mut self) -> u8 {
        let b = self.buffer[self.pos];
        self.pos += 1;
        b
    }
}

/// Length, in bytes, of the `size(8) | B1(8) | OperationCounts(32)` program
/// header every compiled program opens with.
const HEADER_LEN: usize = 48;

/// Executes a `Naf` or `DbChain` block against `point`, returning the
/// result. `table` holds the auxiliary odd-multiple points the block's
/// table-size byte promised; index 0 is always `point` itself.
pub fn run_group<C, P: Clone>(curve: &C, ctx: &dyn ModContext, point: &P, program: &[u8]) -> P
where
    C: CurveGroup<P>,
{
    let mut reader = Reader::new(program, HEADER_LEN);
    let block = Block::from_nibble(reader.peek());

    match block {
        Block::Naf => run_naf(curve, ctx, point, &mut reader),
        Block::DbChain => run_db_chain(curve, ctx, point, &mut reader),
        other => panic!("block {other:?} cannot drive a point-group curve"),
    }
}

fn build_table<C, P: Clone>(curve: &C, ctx: &dyn ModContext, point: &P, table_size: u8, doubled_seed: &P) -> Vec<P>
where
    C: CurveGroup<P>,
{
    let mut table = vec![point.clone()];
    let mut prev = point.clone();
    for _ in 1..table_size {
        prev = curve.add(ctx, &prev, doubled_seed);
        table.push(prev.clone());
    }
    table
}

fn run_naf<C, P: Clone>(curve: &C, ctx: &dyn ModContext, point: &P, reader: &mut Reader) -> P
where
    C: CurveGroup<P>,
{
    let header = reader.next_byte();
    let table_size = header >> 4;

    let (mut acc, table) = if table_size > 1 {
        let initial_index = reader.next_byte();
        let doubled = curve.dbl(ctx, point);
        let table = build_table(curve, ctx, point, table_size, &doubled);
        (table[initial_index as usize].clone(), table)
    } else {
        (point.clone(), vec![point.clone()])
    };

    loop {
        let op_byte = reader.next_byte();
        let op = NafOpCode::from_nibble(op_byte);
        match op {
            NafOpCode::End => break,
            NafOpCode::DblSmall => {
                acc = curve.dbl(ctx, &acc);
            }
            NafOpCode::Dbl => {
                acc = curve.dbl(ctx, &acc);
                let arg_byte = reader.next_byte();
                let index = (arg_byte >> 4) as usize;
                let follow_up = NafOpCode::from_nibble(arg_byte);
                match follow_up {
                    NafOpCode::AddSmall => acc = curve.add(ctx, &acc, &table[index]),
                    NafOpCode::SubSmall => acc = curve.sub(ctx, &acc, &table[index]),
                    other => panic!("expected an add/sub continuation byte, got {other:?}"),
                }
            }
            other => panic!("unexpected standalone opcode {other:?}"),
        }
    }
    acc
}

fn run_db_chain<C, P: Clone>(curve: &C, ctx: &dyn ModContext, point: &P, reader: &mut Reader) -> P
where
    C: CurveGroup<P>,
{
    let header = reader.next_byte();
    let table_size = header >> 4;

    let (mut acc, table) = if table_size > 0 {
        let initial_index = reader.next_byte();
        let doubled = curve.dbl(ctx, point);
        let table = build_table(curve, ctx, point, table_size.max(1), &doubled);
        (table[initial_index as usize].clone(), table)
    } else {
        (point.clone(), vec![point.clone()])
    };

    loop {
        let start_byte = reader.next_byte();
        if start_byte == Block::End as u8 {
            break;
        }
        let has_tpl = start_byte >> 7 != 0;
        let is_sub = (start_byte & 0x10) != 0;
        let is_final = (start_byte & 0x20) != 0;
        let skip_add = (start_byte & 0x40) != 0;
        let index = (start_byte & 0x0f) as usize;

        let dbl_count = reader.next_byte();
        let tpl_count = if has_tpl { reader.next_byte() } else { 0 };

        for _ in 0..dbl_count {
            acc = curve.dbl(ctx, &acc);
        }
        for _ in 0..tpl_count {
            acc = curve.tpl(ctx, &acc);
        }
        if !skip_add {
            acc = if is_sub { curve.sub(ctx, &acc, &table[index]) } else { curve.add(ctx, &acc, &table[index]) };
        }
        if is_final {
            break;
        }
    }
    acc
}

/// Executes a `Prac` or power-of-two-preamble `DbChain` block against a
/// Montgomery `(X:Z)` point. The preamble `createBytecode` emits ahead of a
/// `Prac` cascade (see [`crate::ecm::stage1::compile_stage1`]) is itself
/// written as a `DbChain` block, since it is produced by the same
/// `db_chain_*` writer calls the group-law curve forms use for theirs — it
/// just never opens a table or emits an add, since a Montgomery point can't
/// do either without a known difference.
pub fn run_prac(curve: &MontgomeryXz, ctx: &dyn ModContext, point: &XzPoint, program: &[u8]) -> XzPoint {
    let mut reader = Reader::new(program, HEADER_LEN);
    let block = Block::from_nibble(reader.peek());
    match block {
        Block::Prac => run_prac_block(curve, ctx, point, &mut reader),
        Block::DbChain => run_db_chain_doublings(curve, ctx, point, &mut reader),
        other => panic!("block {other:?} cannot drive a Montgomery curve"),
    }
}

/// A pure doubling chain: `db_chain_start`/`db_chain_dbl`*/`db_chain_end`
/// with no table and no add, exactly what the `Prac` preamble compiles to.
fn run_db_chain_doublings(curve: &MontgomeryXz, ctx: &dyn ModContext, point: &XzPoint, reader: &mut Reader) -> XzPoint {
    let header = reader.next_byte();
    let table_size = header >> 4;
    assert_eq!(table_size, 0, "a Montgomery curve has no group add, so its DbChain preamble cannot carry a table");

    let mut acc = point.clone();
    loop {
        let start_byte = reader.next_byte();
        if start_byte == Block::End as u8 {
            break;
        }
        let has_tpl = start_byte >> 7 != 0;
        let skip_add = (start_byte & 0x40) != 0;
        let is_final = (start_byte & 0x20) != 0;
        assert!(!has_tpl, "a Montgomery curve has no tripling formula");
        assert!(skip_add, "a Montgomery curve cannot add without a known difference");

        let dbl_count = reader.next_byte();
        for _ in 0..dbl_count {
            acc = curve.dbl(ctx, &acc);
        }

        if is_final {
            break;
        }
    }
    acc
}

fn run_prac_block(curve: &MontgomeryXz, ctx: &dyn ModContext, point: &XzPoint, reader: &mut Reader) -> XzPoint {
    reader.next_byte();

    let mut a = point.clone();
    let b_init = point.clone();
    let c_init = point.clone();
    a = curve.dbl(ctx, &a);
    let mut b = b_init;
    let mut c = c_init;

    loop {
        let byte = reader.next_byte();
        if (byte & 0x0f) == PracOpCode::End as u8 {
            break;
        }
        let swap_before = (byte & 0x10) != 0;
        let rule = PracOpCode::from_rule(byte & 0x0f);
        let rep = ((byte & 0b1110_0000) >> 5) + 1;

        for _ in 0..rep {
            if swap_before {
                std::mem::swap(&mut a, &mut b);
            }
            apply_prac_rule(curve, ctx, rule, &mut a, &mut b, &mut c);
        }
    }

    curve.diff_add(ctx, &a, &b, &c)
}

fn apply_prac_rule(curve: &MontgomeryXz, ctx: &dyn ModContext, rule: PracOpCode, a: &mut XzPoint, b: &mut XzPoint, c: &mut XzPoint) {
    match rule {
        PracOpCode::Rule1 => {
            let t = curve.diff_add(ctx, a, b, c);
            let u = curve.diff_add(ctx, &t, a, b);
            *b = curve.diff_add(ctx, b, &t, a);
            *a = u;
        }
        PracOpCode::Rule2 => {
            *b = curve.diff_add(ctx, a, b, c);
            *a = curve.dbl(ctx, a);
        }
        PracOpCode::Rule3 => {
            let t = curve.diff_add(ctx, b, a, c);
            *c = std::mem::replace(b, t);
        }
        PracOpCode::Rule4 => {
            *b = curve.diff_add(ctx, b, a, c);
            *a = curve.dbl(ctx, a);
        }
        PracOpCode::Rule5 => {
            *c = curve.diff_add(ctx, c, a, b);
            *a = curve.dbl(ctx, a);
        }
        PracOpCode::Rule6 => {
            let t = curve.dbl(ctx, a);
            let u = curve.diff_add(ctx, a, b, c);
            let a_new = curve.diff_add(ctx, &t, a, a);
            let t2 = curve.diff_add(ctx, &t, &u, c);
            *a = a_new;
            *c = std::mem::replace(b, t2);
        }
        PracOpCode::Rule7 => {
            let t = curve.diff_add(ctx, a, b, c);
            *b = curve.diff_add(ctx, &t, a, b);
            let t2 = curve.dbl(ctx, a);
            *a = curve.diff_add(ctx, a, &t2, a);
        }
        PracOpCode::Rule8 => {
            let t = curve.diff_add(ctx, a, b, c);
            *c = curve.diff_add(ctx, c, a, b);
            *b = t;
            let t2 = curve.dbl(ctx, a);
            *a = curve.diff_add(ctx, a, &t2, a);
        }
        PracOpCode::Rule9 => {
            *c = curve.diff_add(ctx, c, b, a);
            *b = curve.dbl(ctx, b);
        }
        PracOpCode::End => unreachable!(),
    }
}
