use std::sync::Arc;

use chrono::{TimeZone, Utc};
use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use futures::io::Cursor;
use pricefeed::prelude::*;
use tokio::runtime::Runtime;

/// Generate a `product;price` feed cycling over `num_products` names
fn generate_feed(num_rows: usize, num_products: usize) -> Vec<u8> {
    let mut feed = String::with_capacity(num_rows * 16);
    for i in 0..num_rows {
        feed.push_str(&format!("product-{};{}\n", i % num_products, 100 + i % 997));
    }
    feed.into_bytes()
}

async fn run_import(feed: Vec<u8>, chunk_size: usize) {
    let store = Arc::new(ConcurrentPriceStore::new());
    let rows = PriceRowStream::new(Cursor::new(feed), DEFAULT_DELIMITER);
    let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let result = ChunkStreamProcessor::new(PriceImporter::new(Arc::clone(&store)))
        .with_chunk_size(chunk_size)
        .process(&CancellationToken::new(), rows, timestamp)
        .await;
    black_box(result).unwrap();
    black_box(store.snapshot_count());
}

/// Benchmark the full pipeline with different feed sizes
fn bench_feed_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("import_feed_sizes");
    let runtime = Runtime::new().unwrap();

    for (size_name, num_rows) in [("small_1k", 1_000), ("medium_10k", 10_000), ("large_100k", 100_000)] {
        group.bench_with_input(BenchmarkId::from_parameter(size_name), &num_rows, |b, &num_rows| {
            b.to_async(&runtime).iter_batched(
                || generate_feed(num_rows, 500),
                |feed| run_import(feed, DEFAULT_CHUNK_SIZE),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark chunk size against a fixed feed
fn bench_chunk_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("import_chunk_sizes");
    let runtime = Runtime::new().unwrap();

    for chunk_size in [3, 100, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(chunk_size), &chunk_size, |b, &chunk_size| {
            b.to_async(&runtime).iter_batched(
                || generate_feed(10_000, 500),
                |feed| run_import(feed, chunk_size),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Benchmark product fan-out: few products with long price lists vs many small groups
fn bench_product_distribution(c: &mut Criterion) {
    let mut group = c.benchmark_group("import_product_distribution");
    let runtime = Runtime::new().unwrap();

    for (dist_name, num_products) in [("single_product", 1), ("products_100", 100), ("products_10000", 10_000)] {
        group.bench_with_input(BenchmarkId::from_parameter(dist_name), &num_products, |b, &num_products| {
            b.to_async(&runtime).iter_batched(
                || generate_feed(10_000, num_products),
                |feed| run_import(feed, 1_000),
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_feed_sizes, bench_chunk_sizes, bench_product_distribution);
criterion_main!(benches);
