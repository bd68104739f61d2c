use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sieve::prelude::*;
use sieve::sieve_validation::{NameCache, parse_rule_set};
use std::sync::Arc;

fn bench_rule_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("rule_parsing");

    group.bench_function("short_spec", |b| {
        b.iter(|| parse_rule_set(black_box("required|string|min:3|max:20"), &mut NameCache::new()))
    });

    group.bench_function("long_spec", |b| {
        let spec = "required_with:other|string|min:3|max:20|regex:/^[a-z]+$/i|in:alpha,beta,gamma|different:other";
        b.iter(|| parse_rule_set(black_box(spec), &mut NameCache::new()))
    });

    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");
    let catalog = Arc::new(RuleCatalog::new());

    let payload = json!({
        "user": {"name": "John Doe", "email": "john@example.com", "age": "42"},
        "password": "correct horse",
        "password_confirmation": "correct horse",
        "tags": ["a", "b", "c"],
    });
    let rules = [
        ("user.name", "required|string|min:3|max:40"),
        ("user.email", "required|email"),
        ("user.age", "integer|range:18,99"),
        ("password_confirmation", "required|confirm:password"),
        ("tags", "array|max:5"),
        ("missing", "string|min:3"),
    ];

    group.bench_function("valid_payload", |b| {
        b.iter(|| {
            let mut validator =
                Validator::from_value(Arc::clone(&catalog), black_box(payload.clone()), rules)
                    .unwrap();
            validator.validate().unwrap()
        })
    });

    let invalid = json!({
        "user": {"name": "J", "email": "nope", "age": "old"},
        "password": "a",
        "password_confirmation": "b",
        "tags": "none",
    });

    group.bench_function("invalid_payload", |b| {
        b.iter(|| {
            let mut validator =
                Validator::from_value(Arc::clone(&catalog), black_box(invalid.clone()), rules)
                    .unwrap();
            validator.validate().unwrap()
        })
    });

    group.finish();
}

fn bench_extensions(c: &mut Criterion) {
    let mut group = c.benchmark_group("extensions");
    let catalog = Arc::new(RuleCatalog::new().with_extension(
        "even",
        |_, value, _, _| value.as_i64().is_some_and(|n| n % 2 == 0),
        false,
    ));

    group.bench_function("closure_rule", |b| {
        b.iter(|| {
            let mut validator = Validator::from_value(
                Arc::clone(&catalog),
                black_box(json!({"n": 4})),
                [("n", "integer|even")],
            )
            .unwrap();
            validator.validate().unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_rule_parsing, bench_validation, bench_extensions);
criterion_main!(benches);
