use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dice_lang::roll::OutcomeTable;
use dice_lang::{parse, probability, roll_with, Limits};
use rand::{rngs::StdRng, SeedableRng};

pub fn benchmark_parsing(c: &mut Criterion) {
    c.bench_function("parse single throw", |b| b.iter(|| parse(black_box("999d444"))));
    c.bench_function("parse colour groups", |b| {
        b.iter(|| parse(black_box("roll (8d6+10)*2+5 mundane + 6d8/2 fire, 4d6-L1 ice")))
    });
    c.bench_function("parse numerals and blocks", |b| {
        b.iter(|| {
            parse(black_box(
                "if twenty-one d six >= four hundred two { 2d6 fire } else { 1d4 rep three }",
            ))
        })
    });
}

pub fn benchmark_rolling(c: &mut Criterion) {
    c.bench_function("roll cursed dice", |b| {
        b.iter(|| {
            let rng = StdRng::seed_from_u64(1);
            roll_with(black_box("999d444"), rng, Limits::default())
        })
    });
}

pub fn benchmark_probability(c: &mut Criterion) {
    c.bench_function("probability 4d6-L1", |b| {
        b.iter(|| probability(black_box(4), black_box(6), 0, 1))
    });
    c.bench_function("probability 20d20-H5-L5", |b| {
        b.iter(|| probability(black_box(20), black_box(20), 5, 5))
    });
    c.bench_function("probability shared table", |b| {
        let mut table = OutcomeTable::new();
        b.iter(|| table.probability(black_box(20), black_box(20), 5, 5))
    });
}

criterion_group!(benches, benchmark_parsing, benchmark_rolling, benchmark_probability);
criterion_main!(benches);
