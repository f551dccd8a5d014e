//! Benchmarks for breakpoint analysis over the built-in stat table.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use matchup_master::breakpoint::{analyze, ranked};
use matchup_master::catalog::StatTable;

fn bench_ranking(c: &mut Criterion) {
    let stats = StatTable::builtin().unwrap();

    c.bench_function("ranked_all", |b| {
        b.iter(|| black_box(ranked(&stats, "").unwrap()));
    });

    c.bench_function("ranked_search", |b| {
        b.iter(|| black_box(ranked(&stats, black_box("or")).unwrap()));
    });
}

fn bench_analyze(c: &mut Criterion) {
    let stats = StatTable::builtin().unwrap();

    c.bench_function("analyze_mountain", |b| {
        b.iter(|| black_box(analyze(&stats, black_box("Mountain")).unwrap()));
    });
}

criterion_group!(benches, bench_ranking, bench_analyze);
criterion_main!(benches);
