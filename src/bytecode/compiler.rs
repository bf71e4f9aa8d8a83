//! Stage-1 bytecode compiler.
//!
//! Assembles one ECM Stage-1 schedule per prime-power product into the wire
//! format `vm.rs` executes. Ported from `bytecode::Writer`: each multiplier
//! strategy gets its own block-writing entry points (`naf_*`, `db_chain_*`,
//! `prac_*`), framed by a per-program header recording the byte length and
//! Stage-1 bound `B1` plus the running [`OperationCounts`] (kept for
//! diagnostics, never read back by the VM).

use super::format::OperationCounts;

pub struct Writer {
    buffer: Vec<u8>,
    prac_last_byte_pos: Option<usize>,
    cur_dbl_count: u8,
    cur_tpl_count: u8,
    last_instruction_pos: usize,
    size_position: usize,
    pub counts: OperationCounts,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(4096),
            prac_last_byte_pos: None,
            cur_dbl_count: 0,
            cur_tpl_count: 0,
            last_instruction_pos: 0,
            size_position: 0,
            counts: OperationCounts::default(),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    fn push(&mut self, b: u8) {
        self.buffer.push(b);
    }

    fn push32(&mut self, n: u32) {
        self.buffer.extend_from_slice(&n.to_le_bytes());
    }

    fn push64(&mut self, n: u64) {
        self.buffer.extend_from_slice(&n.to_le_bytes());
    }

    fn write32_at(&mut self, pos: usize, n: u32) {
        self.buffer[pos..pos + 4].copy_from_slice(&n.to_le_bytes());
    }

    /// Opens a program for Stage-1 bound `b1`.
    pub fn start(&mut self, b1: u64) {
        self.prac_last_byte_pos = None;
        self.cur_dbl_count = 0;
        self.cur_tpl_count = 0;
        self.last_instruction_pos = 0;
        self.counts = OperationCounts::default();

        self.size_position = self.buffer.len();
        self.push64(0); // total size, patched in `end`
        self.push64(b1);
        self.buffer.extend(std::iter::repeat(0u8).take(32)); // op-count slots, patched in `end`
    }

    /// Closes the program opened by [`Self::start`].
    pub fn end(&mut self) {
        self.push(super::format::Block::End as u8);
        let total = (self.buffer.len() - self.size_position) as u32;
        self.write32_at(self.size_position, total);
        let base = self.size_position + 16;
        self.write32_at(base, self.counts.dbl);
        self.write32_at(base + 4, self.counts.dbln);
        self.write32_at(base + 8, self.counts.tpl);
        self.write32_at(base + 12, self.counts.tpln);
        self.write32_at(base + 16, self.counts.add);
        self.write32_at(base + 20, self.counts.addn);
        self.write32_at(base + 24, self.counts.dadd);
        self.write32_at(base + 28, self.counts.ddbl);
    }

    // --- Naf block -----------------------------------------------------

    pub fn naf_start_with_table(&mut self, table_size: u8, initial_point_index: u8) {
        self.push(super::format::Block::Naf as u8 | (table_size << 4));
        if table_size > 1 {
            self.push(initial_point_index);
            self.counts.dbl += 1;
            self.counts.add += (initial_point_index - 1) as u32;
        }
    }

    pub fn naf_start(&mut self) {
        self.naf_start_with_table(0, 0);
    }

    pub fn naf_end(&mut self) {
        self.push(super::format::NafOpCode::End as u8);
    }

    pub fn naf_dbl(&mut self) {
        self.push(super::format::NafOpCode::DblSmall as u8);
        self.counts.dbln += 1;
    }

    fn naf_addsub(&mut self, arg: u8, is_sub: bool) {
        // Folds the pending small-doubling byte into a combined "dbl, then
        // add/sub table[arg]" pair: the preceding DblSmall byte gets the
        // FULL_MASK bit set (promoting it to the "an add/sub follows" form)
        // and a fresh byte carries which table entry and which operation.
        // The original encodes add and sub identically here (it always
        // emits `ADDn`, even from `nafSUB`) — this is a correction, not a
        // literal port, of what its own comment flags as unreliable.
        let last = self.buffer.len() - 1;
        self.buffer[last] |= super::format::NafOpCode::FULL_MASK;
        let tag = if is_sub { super::format::NafOpCode::SubSmall } else { super::format::NafOpCode::AddSmall };
        self.push(tag as u8 | (arg << 4));
        self.counts.addn += 1;
        self.counts.dbl += 1;
        self.counts.dbln -= 1;
    }

    pub fn naf_add(&mut self, arg: u8) {
        self.naf_addsub(arg, false);
    }

    pub fn naf_sub(&mut self, arg: u8) {
        self.naf_addsub(arg, true);
    }

    // --- DbChain block ---------------------------------------------------

    pub fn db_chain_start_with_table(&mut self, table_size: u8, initial_point_index: u8) {
        self.push(super::format::Block::DbChain as u8 | (table_size << 4));
        if table_size > 0 {
            self.push(initial_point_index);
            self.counts.dbl += 1;
            self.counts.add += initial_point_index as u32;
        }
    }

    pub fn db_chain_start(&mut self) {
        self.db_chain_start_with_table(0, 0);
    }

    pub fn db_chain_end(&mut self) {
        if self.cur_dbl_count != 0 || self.cur_tpl_count != 0 {
            self.db_chain_instruction(0, 0);
            self.buffer[self.last_instruction_pos] |= 0x40;
            self.counts.addn -= 1;
        }
        self.buffer[self.last_instruction_pos] |= 0x20;
        self.counts.addn -= 1;
        self.counts.add += 1;
    }

    pub fn db_chain_dbl(&mut self) {
        self.cur_dbl_count += 1;
    }

    pub fn db_chain_tpl(&mut self) {
        self.cur_tpl_count += 1;
    }

    pub fn db_chain_add(&mut self, arg: u8) {
        self.db_chain_instruction(arg, 0);
    }

    pub fn db_chain_sub(&mut self, arg: u8) {
        self.db_chain_instruction(arg, 1);
    }

    /// `0kfsnnnn dddddddd` or, when a tripling count is pending,
    /// `1kfsnnnn dddddddd tttttttt`.
    fn db_chain_instruction(&mut self, arg: u8, sign_bit: u8) {
        debug_assert!(arg <= 15);
        let start_byte = (((self.cur_tpl_count > 0) as u8) << 7) | (sign_bit << 4) | arg;
        self.push(start_byte);
        self.last_instruction_pos = self.buffer.len() - 1;
        self.push(self.cur_dbl_count);
        if self.cur_tpl_count > 0 {
            self.push(self.cur_tpl_count);
        }

        self.counts.addn += 1;
        if self.cur_dbl_count > 0 {
            self.counts.tpln += self.cur_tpl_count as u32;
            self.counts.dbln += self.cur_dbl_count as u32 - 1;
            self.counts.dbl += 1;
        } else {
            self.counts.tpln += self.cur_tpl_count as u32 - 1;
            self.counts.tpl += 1;
        }
        self.cur_dbl_count = 0;
        self.cur_tpl_count = 0;
    }

    // --- Prac block ------------------------------------------------------

    pub fn prac_start(&mut self) {
        self.push(super::format::Block::Prac as u8);
        self.prac_last_byte_pos = None;
    }

    pub fn prac_end(&mut self) {
        self.push(super::format::PracOpCode::End as u8);
    }

    /// Appends one Lucas-chain step. Repeats of the same `(rule, swap)`
    /// pair fold into a run-length count in the top three bits of the
    /// previous byte, rather than emitting a fresh byte each time.
    pub fn prac_rule(&mut self, rule_nr: u8, swap_before: bool) {
        let byte = ((swap_before as u8) << 4) | rule_nr;
        let can_extend = self
            .prac_last_byte_pos
            .map(|pos| (self.buffer[pos] & 0x1f) == byte && self.buffer[pos] < 0b1110_0000)
            .unwrap_or(false);
        if can_extend {
            let pos = self.prac_last_byte_pos.unwrap();
            self.buffer[pos] += 0b0010_0000;
        } else {
            self.push(byte);
            self.prac_last_byte_pos = Some(self.buffer.len() - 1);
        }

        const ADD_COUNTS: [u32; 9] = [3, 1, 1, 1, 1, 3, 3, 3, 1];
        const DBL_COUNTS: [u32; 9] = [0, 1, 0, 1, 1, 1, 1, 1, 1];
        self.counts.dadd += ADD_COUNTS[(rule_nr - 1) as usize];
        self.counts.ddbl += DBL_COUNTS[(rule_nr - 1) as usize];
    }
}
