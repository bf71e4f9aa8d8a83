use factorengine::bigint::Number;
use factorengine::factor::{factor, FactorConfig};

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

/// RSA-150, the 150-digit semiprime from the RSA Factoring Challenge —
/// large enough to exercise the full B1/curve-count ladder rather than
/// stopping at trial division or Pollard rho.
const RSA_150: &str = "155089812478348440509606754370011861770654545830995430655466945774312632703463465954363335027577729025391453996787414027003501631772186840890795964683";

fn bench_small_semiprime(c: &mut Criterion) {
    let n = Number::parse_decimal("455839").unwrap();
    c.bench_function("factor 455839 (textbook ECM example)", |b| {
        b.iter(|| factor(black_box(&n), &FactorConfig::default()))
    });
}

fn bench_pollard_rho_range(c: &mut Criterion) {
    // 100000007 * 100999993: both factors sit well past the trial-division
    // threshold, so this only factors by reaching Pollard's rho.
    let n = Number::parse_decimal("10100000006999951").unwrap();
    c.bench_function("factor 10100000006999951 (Pollard rho range)", |b| {
        b.iter(|| factor(black_box(&n), &FactorConfig::default()))
    });
}

fn bench_rsa_150(c: &mut Criterion) {
    let n = Number::parse_decimal(RSA_150).unwrap();
    let mut group = c.benchmark_group("factor rsa-150");
    group.sample_size(10);
    group.bench_function("factor", |b| b.iter(|| factor(black_box(&n), &FactorConfig::default())));
    group.finish();
}

criterion_group!(benches, bench_small_semiprime, bench_pollard_rho_range, bench_rsa_150);
criterion_main!(benches);
