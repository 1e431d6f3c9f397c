use std::hint::black_box;
use std::sync::Arc;

use anonguard_core::engine::{class_sizes, suppress};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;

// Service-request shaped table: 3-digit zip prefix, ward, rounded latitude.
fn create_table(size: usize) -> RecordBatch {
    let zips: StringArray = (0..size).map(|i| Some(format!("60{}", i % 7))).collect();
    let wards = Int64Array::from_iter_values((0..size).map(|i| (i % 50) as i64));
    let latitudes =
        Float64Array::from_iter_values((0..size).map(|i| 41.6 + (i % 600) as f64 / 1000.));
    let schema = Schema::new(vec![
        Field::new("ZIP_CODE", DataType::Utf8, true),
        Field::new("WARD", DataType::Int64, false),
        Field::new("LATITUDE", DataType::Float64, false),
    ]);
    RecordBatch::try_new(
        Arc::new(schema),
        vec![Arc::new(zips), Arc::new(wards), Arc::new(latitudes)],
    )
    .unwrap()
}

static PREBUILT_TABLES: Lazy<Vec<(usize, RecordBatch)>> = Lazy::new(|| {
    [10_000usize, 100_000, 1_000_000]
        .iter()
        .map(|&size| (size, create_table(size)))
        .collect()
});

static QUASI_IDENTIFIERS: Lazy<Vec<String>> =
    Lazy::new(|| vec!["ZIP_CODE".to_string(), "WARD".to_string()]);

fn bench_class_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("class_sizes");
    for (size, table) in PREBUILT_TABLES.iter() {
        group.throughput(criterion::Throughput::Elements(*size as u64));
        group.bench_with_input(format!("rows_{}", size), table, |b, table| {
            b.iter(|| black_box(class_sizes(table, &QUASI_IDENTIFIERS).unwrap()));
        });
    }
    group.finish();
}

fn bench_high_cardinality(c: &mut Criterion) {
    let mut group = c.benchmark_group("class_sizes_high_cardinality");
    let qis = vec!["ZIP_CODE".to_string(), "LATITUDE".to_string()];
    for (size, table) in PREBUILT_TABLES.iter() {
        group.throughput(criterion::Throughput::Elements(*size as u64));
        group.bench_with_input(format!("rows_{}", size), table, |b, table| {
            b.iter(|| black_box(class_sizes(table, &qis).unwrap()));
        });
    }
    group.finish();
}

fn bench_suppress(c: &mut Criterion) {
    let mut group = c.benchmark_group("suppress");
    let qis = vec!["ZIP_CODE".to_string(), "LATITUDE".to_string()];
    for (size, table) in PREBUILT_TABLES.iter() {
        let classes = class_sizes(table, &qis).unwrap();
        group.throughput(criterion::Throughput::Elements(*size as u64));
        group.bench_with_input(format!("rows_{}", size), table, |b, table| {
            b.iter(|| black_box(suppress(table, &classes, 5).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_class_sizes,
    bench_high_cardinality,
    bench_suppress
);
criterion_main!(benches);
