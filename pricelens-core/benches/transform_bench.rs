//! Criterion benchmarks for the per-symbol hot paths.
//!
//! Benchmarks:
//! 1. Series transform (sort, diff, rescale) over growing inputs
//! 2. CSV + JSON export of a transformed series

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pricelens_core::data::synthetic::generate_bars;
use pricelens_core::{transform, NullLog, OutputLayout, SeriesWriter};
use std::sync::Arc;

// ── Helpers ──────────────────────────────────────────────────────────

fn bars_for_days(days: i64) -> Vec<pricelens_core::data::RawBar> {
    let end = chrono::NaiveDate::from_ymd_opt(2024, 6, 28).unwrap();
    let mut bars = generate_bars("BENCH", end - chrono::Duration::days(days), end);
    bars.reverse();
    bars
}

// ── Benchmarks ───────────────────────────────────────────────────────

fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");
    for days in [30_i64, 365, 1095, 3650] {
        let bars = bars_for_days(days);
        group.bench_with_input(BenchmarkId::from_parameter(days), &bars, |b, bars| {
            b.iter(|| transform(black_box(bars.clone())))
        });
    }
    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let tmp = tempfile::tempdir().unwrap();
    let writer = SeriesWriter::new(OutputLayout::new(tmp.path()), Arc::new(NullLog));
    let series = transform(bars_for_days(1095)).unwrap();

    c.bench_function("export_3y", |b| {
        b.iter(|| writer.write(black_box(&series), "BENCH", "3y"))
    });
}

criterion_group!(benches, bench_transform, bench_export);
criterion_main!(benches);
