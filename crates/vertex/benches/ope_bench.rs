//! Benchmarks for the OPE engine.
//!
//! Includes:
//! - Derivative rules on the Virasoro algebra
//! - Composite OPEs of the Sugawara field
//! - Jacobi identity checks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use vertex::prelude::*;

fn virasoro() -> (OpeRegistry, LocalOperator) {
    let t = BasisOperator::bosonic("T").with_weight(Rational::from(2));
    let field: LocalOperator = t.clone().into();
    let mut registry = OpeRegistry::new();
    registry
        .define(
            &t,
            &t,
            OpeData::from_list([
                LocalOperator::scalar(Scalar::var("c") / Rational::from(2)),
                LocalOperator::zero(),
                2 * field.clone(),
                field.derivative(1),
            ]),
        )
        .unwrap();
    (registry, field)
}

fn current() -> (OpeRegistry, LocalOperator) {
    let j = BasisOperator::bosonic("J").with_weight(Rational::from(1));
    let mut registry = OpeRegistry::new();
    registry
        .define(&j, &j, OpeData::from_list([LocalOperator::from(1), LocalOperator::zero()]))
        .unwrap();
    (registry, j.into())
}

/// Benchmark OPEs of higher derivatives.
fn bench_derivatives(c: &mut Criterion) {
    let mut group = c.benchmark_group("virasoro_derivatives");
    let (registry, t) = virasoro();

    for order in [1u32, 3, 5] {
        let dt = t.derivative(order);
        group.bench_with_input(BenchmarkId::new("d^n T x d^n T", order), &order, |b, _| {
            b.iter(|| {
                // Fresh engine so the cache does not short-circuit the work
                let engine = OpeEngine::new(&registry);
                black_box(engine.ope(&dt, &dt).unwrap())
            });
        });
    }

    group.finish();
}

/// Benchmark nested normal-ordered products of a free boson.
fn bench_composites(c: &mut Criterion) {
    let mut group = c.benchmark_group("sugawara");
    let (registry, j) = current();

    let mut field = j.clone();
    for depth in 1..=3 {
        field = normal_order(&j, &field);
        let current = field.clone();
        group.bench_with_input(BenchmarkId::new("NO depth", depth), &depth, |b, _| {
            b.iter(|| {
                let engine = OpeEngine::new(&registry);
                black_box(engine.ope(&current, &current).unwrap())
            });
        });
    }

    let cached = OpeEngine::new(&registry);
    let l = normal_order(&j, &j).scale_rational(&Rational::from_i64(1, 2));
    group.bench_function("cached L x L", |b| {
        b.iter(|| black_box(cached.ope(&l, &l).unwrap()));
    });

    group.finish();
}

/// Benchmark the Virasoro Jacobi check.
fn bench_jacobi(c: &mut Criterion) {
    let (registry, t) = virasoro();

    c.bench_function("jacobi TTT", |b| {
        b.iter(|| {
            let engine = OpeEngine::new(&registry);
            black_box(check_jacobi_identity(&engine, &t, &t, &t).unwrap())
        });
    });
}

criterion_group!(benches, bench_derivatives, bench_composites, bench_jacobi);
criterion_main!(benches);
