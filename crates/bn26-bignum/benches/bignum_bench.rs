//! Big number benchmarks.
//!
//! Run with: cargo bench -p bn26-bignum

use bn26_bignum::{BigNum, MulStrategy, ReductionContext};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

fn ones(bits: usize) -> BigNum {
    BigNum::from_bytes_be(&vec![0xFFu8; bits / 8])
}

// -------------------------------------------------------
// Multiplication: schoolbook vs FFT
// -------------------------------------------------------
fn bench_mul(c: &mut Criterion) {
    let mut group = c.benchmark_group("mul");

    for bits in [256, 2048, 16384, 65536] {
        let a = ones(bits);
        let b = ones(bits);

        group.bench_with_input(BenchmarkId::new("schoolbook", bits), &bits, |bench, _| {
            bench.iter(|| a.mul_with(&b, MulStrategy::Schoolbook));
        });
        group.bench_with_input(BenchmarkId::new("fft", bits), &bits, |bench, _| {
            bench.iter(|| a.mul_with(&b, MulStrategy::Fft));
        });
    }

    group.finish();
}

// -------------------------------------------------------
// Addition and division
// -------------------------------------------------------
fn bench_add_div(c: &mut Criterion) {
    let mut group = c.benchmark_group("bignum");

    for bits in [256, 1024, 4096] {
        let a = ones(bits);
        let b = ones(bits / 2).addn(12345);

        group.bench_with_input(BenchmarkId::new("add", bits), &bits, |bench, _| {
            bench.iter(|| a.add(&b));
        });
        group.bench_with_input(BenchmarkId::new("div_rem", bits), &bits, |bench, _| {
            bench.iter(|| a.div_rem(&b));
        });
    }

    group.finish();
}

// -------------------------------------------------------
// Reduction contexts
// -------------------------------------------------------
fn bench_red(c: &mut Criterion) {
    let mut group = c.benchmark_group("red_mul");

    let k256 = ReductionContext::prime("k256").unwrap();
    let p = k256.modulus().clone();
    let mont = ReductionContext::mont(&p).unwrap();
    let plain = ReductionContext::new(&p).unwrap();
    let x = p.subn(12345);
    let y = p.ushrn(3);

    for (name, ctx) in [("k256", &k256), ("mont", &mont), ("plain", &plain)] {
        let xr = x.to_red(ctx).unwrap();
        let yr = y.to_red(ctx).unwrap();
        group.bench_function(name, |bench| {
            bench.iter(|| xr.red_mul(&yr).unwrap());
        });
    }

    group.finish();
}

// -------------------------------------------------------
// Text conversion
// -------------------------------------------------------
fn bench_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("text");

    for bits in [256, 4096] {
        let a = ones(bits);
        let dec = a.to_str_radix(10).unwrap();
        group.bench_with_input(BenchmarkId::new("to_dec", bits), &bits, |bench, _| {
            bench.iter(|| a.to_str_radix(10).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("from_dec", bits), &bits, |bench, _| {
            bench.iter(|| BigNum::from_str_radix(&dec, 10).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_mul, bench_add_div, bench_red, bench_text);
criterion_main!(benches);
