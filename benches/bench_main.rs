#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rpncalc::parser::tokenize;
use rpncalc::Machine;

const SIMPLE: &str = "3 4 +";
const CHAIN: &str = "2 10 ^ sqrt ln 4 x round";
const USER_CMDS: &str = "( sq dup x ) ( quad sq sq ) 7 quad drop 9 quad";
const MAP_PIPELINE: &str = "( _ dup x ) 20 io map sum";

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("Tokenize");

    group.bench_function("Simple", |b| b.iter(|| tokenize(black_box(SIMPLE))));
    group.bench_function("Chain", |b| b.iter(|| tokenize(black_box(CHAIN))));
    group.bench_function("Map Pipeline", |b| {
        b.iter(|| tokenize(black_box(MAP_PIPELINE)))
    });

    group.finish();
}

fn bench_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Evaluation");

    let simple = tokenize(SIMPLE);
    let chain = tokenize(CHAIN);
    let user_cmds = tokenize(USER_CMDS);
    let map_pipeline = tokenize(MAP_PIPELINE);

    group.bench_function("Eval Simple", |b| {
        b.iter(|| Machine::new().evaluate(black_box(&simple), Vec::new()))
    });

    group.bench_function("Eval Chain", |b| {
        b.iter(|| Machine::new().evaluate(black_box(&chain), Vec::new()))
    });

    group.bench_function("Eval User Commands", |b| {
        b.iter(|| Machine::new().evaluate(black_box(&user_cmds), Vec::new()))
    });

    group.bench_function("Eval Map Pipeline", |b| {
        b.iter(|| Machine::new().evaluate(black_box(&map_pipeline), Vec::new()))
    });

    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_evaluation);
criterion_main!(benches);
