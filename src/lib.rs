//! A general-purpose integer factorization engine.
//!
//! Factors arbitrary-precision integers by escalating through a ladder of
//! methods of increasing cost: trial division and a probable-primality
//! test first, then Pollard's rho, then alternating rounds of Pollard's
//! p-1 and the elliptic curve method (ECM) at growing smoothness bounds.
//! ECM itself compiles each curve's Stage 1 schedule into a small bytecode
//! program once per `(B1, method)` pair and replays it against every curve
//! tried at that bound, rather than re-deriving the addition chain per
//! curve.
//!
//! # Module overview
//!
//! - `bigint`
//!   The polymorphic big-integer layer everything else is built on:
//!   fixed-width limb arrays for common sizes, an arbitrary-precision
//!   fallback, and the Montgomery/Barrett reduction contexts that let the
//!   rest of the crate do modular arithmetic without naming a representation.
//!
//! - `curves`
//!   The three elliptic curve forms ECM runs on (short Weierstrass, twisted
//!   Edwards, Montgomery `(X:Z)`-only), and curve/point generation from a
//!   seed.
//!
//! - `scalarmul`
//!   Scalar multiplication strategies (double-and-add, NAF, windowed NAF,
//!   cost-adaptive dynamic NAF, PRAC) shared by the group-law curve forms
//!   and the Montgomery ladder.
//!
//! - `bytecode`
//!   The compiler and interpreter for ECM Stage 1's per-modulus schedule: a
//!   compact op stream describing a sequence of curve doublings, additions
//!   and PRAC steps, compiled once per `(B1, method, cascade)` triple and
//!   replayed against every curve at that bound.
//!
//! - `ecm`
//!   The ECM driver itself: curve-form dispatch, Stage 1/Stage 2 orchestration,
//!   cascading strategies for splitting work across several schedules.
//!
//! - `factor`
//!   The top-level orchestrator and its supporting pipeline: trial division,
//!   Pollard's rho, Pollard's p-1, and the Miller-Rabin probable-primality
//!   test, tied together by `factor::factor`'s escalation ladder.
//!
//! - `tables`
//!   Precomputed-table generation and on-disk layout for the prime tables
//!   trial division and Pollard p-1 draw on.
//!
//! - `rng`
//!   A ChaCha20-based CSPRNG used to draw Miller-Rabin witnesses and ECM
//!   curve seeds.
//!
//! # Design goals
//!
//! - Portable: no SIMD intrinsics, no inline assembly, no hand-rolled
//!   Montgomery multiply in machine code — everything here compiles for any
//!   target the Rust toolchain supports.
//! - Explicit about representation: callers choose Montgomery or Barrett
//!   reduction, fixed or arbitrary width, rather than having one picked for
//!   them behind an opaque type.
//! - No network, filesystem or process dependencies in the core factoring
//!   path; `tools/gen_tables` is the only piece that writes to disk.

pub(crate) mod os;

pub mod bigint;
pub mod bytecode;
pub mod curves;
pub mod ecm;
pub mod factor;
pub mod rng;
pub mod scalarmul;
pub mod tables;
