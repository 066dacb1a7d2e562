//! # Tunelist Performance Benchmarks
//!
//! ## Benchmark Categories
//!
//! - **Query Parsing**: Turning tokens into a query
//! - **Filtering**: Searching tables of different sizes
//! - **Weights**: Weighted key draws in both directions
//! - **Set Generation**: Whole sets around a seed tune
//!
//! ## Running Benchmarks
//!
//! ```bash
//! cargo bench
//! cargo bench filter
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::hint::black_box;
use tunelist::error::Phase;
use tunelist::filter::{filter, Criteria};
use tunelist::query::parse_query;
use tunelist::tune::ColumnLayout;
use tunelist::{SetGenerator, SetOptions, TransitionWeights, TuneTable};

const DANCES: [&str; 4] = ["reel", "jig", "hornpipe", "polka"];
const KEYS: [&str; 8] = ["d", "dmaj", "g", "a", "em", "edor", "bm", "amin"];

/// Helper building a table of `count` synthetic tunes
fn create_table(count: usize) -> TuneTable {
    let rows: Vec<Vec<String>> = (0..count)
        .map(|i| {
            vec![
                DANCES[i % DANCES.len()].to_string(),
                format!("tune number {i}"),
                KEYS[i % KEYS.len()].to_string(),
                "fiddle".to_string(),
                "*".repeat(1 + i % 4),
            ]
        })
        .collect();
    TuneTable::from_rows("benchmark", rows, &ColumnLayout::default()).expect("valid benchmark table")
}

fn benchmark_query_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("query_parsing");

    group.bench_function("dance_only", |b| b.iter(|| parse_query(black_box(&["reel"]))));
    group.bench_function("dance_key_difficulty", |b| {
        b.iter(|| parse_query(black_box(&["reel", "in", "edor", "*l3"])))
    });

    group.finish();
}

fn benchmark_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");

    for size in [100, 1_000, 10_000].iter() {
        let table = create_table(*size);
        let criteria = Criteria::from(parse_query(&["reel", "in", "d", "*g1"]).expect("valid query"));

        group.bench_with_input(BenchmarkId::new("dance_key_difficulty", size), &table, |b, table| {
            b.iter(|| filter(black_box(table), black_box(&criteria)).len())
        });
    }

    group.finish();
}

fn benchmark_weights(c: &mut Criterion) {
    let mut group = c.benchmark_group("weights");
    let weights = TransitionWeights::builtin();
    let mut rng = StdRng::seed_from_u64(7);

    group.bench_function("forward_draw", |b| {
        b.iter(|| weights.draw(&mut rng, Phase::Forward, black_box("d")))
    });
    group.bench_function("backward_draw", |b| {
        b.iter(|| weights.draw(&mut rng, Phase::Backward, black_box("em")))
    });

    group.finish();
}

fn benchmark_set_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_generation");
    let weights = TransitionWeights::builtin();

    for size in [100, 1_000].iter() {
        let table = create_table(*size);
        let seed = table.get(0).expect("seed tune").clone();
        let generator = SetGenerator::new(&table, weights);

        for length in [3, 6] {
            let options = SetOptions { length, position: Some(1), ..SetOptions::default() };
            let mut rng = StdRng::seed_from_u64(42);
            group.bench_function(BenchmarkId::new(format!("length_{length}"), size), |b| {
                b.iter(|| generator.generate(&mut rng, black_box(&seed), &options))
            });
        }
    }

    group.finish();
}

// Group all benchmarks
criterion_group!(
    benches,
    benchmark_query_parsing,
    benchmark_filtering,
    benchmark_weights,
    benchmark_set_generation
);

criterion_main!(benches);
