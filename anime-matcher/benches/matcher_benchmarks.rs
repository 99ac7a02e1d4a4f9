//! Criterion benchmarks for the matcher.
//!
//! Measures matching time for growing target layers against a fixed source
//! layer, sequentially and on the rayon pool.
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench --package anime-matcher
//! ```

// Criterion macros generate code that triggers missing_docs warnings.
#![allow(missing_docs, reason = "Criterion macros generate undocumented code")]

use anime_core::SpatialIndex;
use anime_matcher::{MatchConfig, Matcher};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};


use bench_support::{BENCHMARK_SEED, generate_segments};

/// Target layer sizes to benchmark.
const TARGET_SIZES: &[usize] = &[1_000, 10_000, 50_000];

/// Number of indexed source features.
const SOURCE_COUNT: usize = 20_000;

fn bench_match_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_all");
    let sources = generate_segments(SOURCE_COUNT, 0, BENCHMARK_SEED);
    let index = SpatialIndex::build(&sources).expect("non-empty sources");

    for &size in TARGET_SIZES {
        let targets = generate_segments(size, 1_000_000, BENCHMARK_SEED + 1);
        group.throughput(Throughput::Elements(u64::try_from(size).unwrap_or(u64::MAX)));

        for (label, n_threads) in [("sequential", 1), ("pool", 0)] {
            let config = MatchConfig::new(3, 100.0)
                .expect("valid config")
                .with_threads(n_threads);
            let matcher = Matcher::new(config).expect("valid config");
            group.bench_with_input(BenchmarkId::new(label, size), &targets, |b, targets| {
                b.iter(|| {
                    #[expect(
                        clippy::let_underscore_must_use,
                        reason = "Benchmarking match performance, result is intentionally discarded"
                    )]
                    let _ = matcher.match_all(targets, &index);
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_match_all);
criterion_main!(benches);
