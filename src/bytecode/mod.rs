//! Compiled ECM Stage-1 schedules: a small bytecode that records, once per
//! distinct `B1` bound and multiplier strategy, the exact sequence of
//! curve-group operations needed to multiply a point by the Stage-1
//! cofactor. Compiling once and replaying many times (once per curve) is
//! what makes running thousands of curves at a given `B1` affordable.
//!
//! Ported from the original's `bytecode.h`: [`format`] is the wire layout,
//! [`compiler`] is `bytecode::Writer`, [`vm`] is the interpreter that walks
//! what `Writer` produces.

pub mod compiler;
pub mod format;
pub mod vm;
