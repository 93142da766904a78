//! Benchmarks for cache key derivation and context assembly

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use codementor::domain::models::Submission;
use codementor::services::cache_key::key_for;
use codementor::services::{build_cache_key, build_context, truncate_context};

fn submission(code_lines: usize) -> Submission {
    let code = (0..code_lines)
        .map(|i| format!("    total += values[{i}] * {i}"))
        .collect::<Vec<_>>()
        .join("\n");
    Submission::new("bench-user", "1352C", code, "Wrong Answer")
        .with_category("math")
        .with_language("python")
        .with_error_type("off-by-one")
}

/// Benchmark key derivation for growing code sizes
fn bench_cache_key(c: &mut Criterion) {
    let mut group = c.benchmark_group("cache_key");

    for &lines in &[10, 100, 1000] {
        let sub = submission(lines);
        let payload = sub.cache_payload();
        group.throughput(Throughput::Bytes(sub.code.len() as u64));

        group.bench_function(format!("build_{lines}_lines"), |b| {
            b.iter(|| black_box(build_cache_key(black_box("learning"), &payload)));
        });
        group.bench_function(format!("key_for_{lines}_lines"), |b| {
            b.iter(|| black_box(key_for(black_box("difficulty"), &sub)));
        });
    }

    group.finish();
}

/// Benchmark context building with truncation
fn bench_context(c: &mut Criterion) {
    let sub = submission(400);
    let memory: Vec<String> = (0..3)
        .map(|i| format!("[math] 13{i}A: forgot the boundary case n = {i}"))
        .collect();

    c.bench_function("build_and_truncate_context", |b| {
        b.iter(|| {
            let context = build_context(&sub, &memory, None, None);
            black_box(truncate_context(&context, 3500))
        });
    });
}

criterion_group!(benches, bench_cache_key, bench_context);
criterion_main!(benches);
