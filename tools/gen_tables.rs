//! Offline generator for the prime tables trial division and Pollard p-1
//! sieve once at build time rather than re-sieving on every process start.
//!
//! Ported from `gen_table.rs`'s role in the original crate it was lifted
//! from: a small standalone binary that sieves a requested count of primes
//! and writes them out in the runtime loader's format, rather than hand
//! generating a source-embedded table. This one writes
//! [`factorengine::tables::format`]'s binary layout instead of a literal
//! Rust array.
//!
//! ```text
//! cargo run --release --bin gen_tables -- <count> <output-path>
//! ```

use factorengine::tables::{format, sieve_first_n_primes};
use std::env;
use std::fs::File;
use std::io::BufWriter;
use std::process::ExitCode;

const DEFAULT_COUNT: usize = 1_000_000;
const DEFAULT_PATH: &str = "primes_1_000_000.dat";

fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let count: usize = match args.next() {
        Some(s) => match s.parse() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("gen_tables: expected a prime count, got {s:?}");
                return ExitCode::FAILURE;
            }
        },
        None => DEFAULT_COUNT,
    };
    let path = args.next().unwrap_or_else(|| DEFAULT_PATH.to_string());

    eprintln!("gen_tables: sieving the first {count} primes...");
    let primes = sieve_first_n_primes(count);

    let file = match File::create(&path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("gen_tables: could not create {path}: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = format::write(BufWriter::new(file), &primes) {
        eprintln!("gen_tables: could not write {path}: {e}");
        return ExitCode::FAILURE;
    }

    eprintln!("gen_tables: wrote {} primes (largest: {}) to {path}", primes.len(), primes.last().unwrap_or(&0));
    ExitCode::SUCCESS
}
