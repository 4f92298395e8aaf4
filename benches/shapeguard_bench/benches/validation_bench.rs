//! Validation throughput benchmarks
//!
//! Measures rule chain evaluation, structural recursion and combinator
//! fan-out on representative payloads.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;
use shapeguard::prelude::*;

fn user_schema() -> Schema {
    object(
        Shape::new()
            .field("id", number().integer().positive())
            .field("email", string().email())
            .field("name", string().min(2).max(64))
            .field("tags", array(string().not_empty()).max(16).unique().optional())
            .field("role", string().valid(["admin", "member", "guest"])),
    )
    .to_schema()
}

/// Benchmark primitive rule chains
fn bench_primitives(c: &mut Criterion) {
    let mut group = c.benchmark_group("primitives");

    let bounded = number().integer().gte(0.0).lte(100.0);
    let valid = Value::from(42);
    let invalid = Value::from(2.5);
    group.bench_function("number_valid", |b| {
        b.iter(|| validate(&bounded, black_box(&valid)))
    });
    group.bench_function("number_short_circuit", |b| {
        b.iter(|| validate(&bounded, black_box(&invalid)))
    });

    let email = string().min(3).email();
    let address = Value::from("someone@example.com");
    group.bench_function("string_email", |b| {
        b.iter(|| validate(&email, black_box(&address)))
    });

    group.finish();
}

/// Benchmark nested object validation
fn bench_objects(c: &mut Criterion) {
    let mut group = c.benchmark_group("objects");
    let schema = user_schema();

    let valid = Value::from(json!({
        "id": 7,
        "email": "user@example.com",
        "name": "Ada",
        "tags": ["a", "b", "c"],
        "role": "admin",
    }));
    let missing = Value::from(json!({"id": 7}));

    group.bench_function("valid_user", |b| {
        b.iter(|| validate(&schema, black_box(&valid)))
    });
    group.bench_function("missing_key", |b| {
        b.iter(|| validate(&schema, black_box(&missing)))
    });
    group.bench_function("export_metadata", |b| {
        b.iter(|| export_metadata(black_box(&schema)))
    });

    group.finish();
}

/// Benchmark array validation as the element count grows
fn bench_arrays(c: &mut Criterion) {
    let mut group = c.benchmark_group("arrays");
    let schema = array(number().integer()).unique();

    for size in [10usize, 100, 1000] {
        let items = Value::array((0..size).map(|i| Value::from(i as f64)));
        group.bench_with_input(BenchmarkId::new("unique_integers", size), &items, |b, items| {
            b.iter(|| validate(&schema, black_box(items)))
        });
    }

    group.finish();
}

/// Benchmark combinators, which evaluate every branch
fn bench_combinators(c: &mut Criterion) {
    let mut group = c.benchmark_group("combinators");

    let either = one_of([string().to_schema(), number().to_schema()]);
    let any = any_of([
        string().min(3).to_schema(),
        number().gt(10.0).to_schema(),
        boolean().to_schema(),
    ]);
    let matched = Value::from("abc");
    let unmatched = Value::Null;

    group.bench_function("one_of_match", |b| {
        b.iter(|| validate(&either, black_box(&matched)))
    });
    group.bench_function("any_of_total_failure", |b| {
        b.iter(|| validate(&any, black_box(&unmatched)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_primitives,
    bench_objects,
    bench_arrays,
    bench_combinators
);
criterion_main!(benches);
