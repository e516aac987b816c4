//! Query decoding and compilation benchmarks
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sift::query::{WildcardQuery, parse_query};
use sift::search::{MemoryIndex, SearchContext, collect_doc_ids};

/// In-memory index with a few thousand generated documents
fn create_benchmark_index() -> MemoryIndex {
    let mut index = MemoryIndex::new("body");
    for i in 0..5_000u32 {
        let body = format!(
            "function_{i} returns value {v} test text token{m} struct{s}",
            v = i * 2,
            m = i % 97,
            s = i % 13
        );
        let title = format!("file {} section {}", i % 50, i % 7);
        index.add_document(i, &[("body", &body), ("title", &title)]);
    }
    index
}

fn bench_decoding(c: &mut Criterion) {
    let queries = vec![
        ("wildcard", r#"{"wildcard": "te*t"}"#),
        ("wildcard_full", r#"{"wildcard": "a.b*c?d", "field": "title", "boost": 2.0}"#),
        (
            "conjunction",
            r#"{"conjuncts": [{"wildcard": "te*t"}, {"wildcard": "struct?", "field": "body"}]}"#,
        ),
        (
            "nested",
            r#"{"conjuncts": [{"wildcard": "*"}, {"conjuncts": [{"wildcard": "token1?"}, {"conjuncts": [{"wildcard": "file"}]}]}]}"#,
        ),
    ];

    let mut group = c.benchmark_group("decoding");
    for (name, text) in queries {
        group.bench_with_input(BenchmarkId::from_parameter(name), &text, |b, &t| {
            b.iter(|| parse_query(black_box(t)))
        });
    }
    group.finish();
}

fn bench_pattern_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern_compile");

    group.bench_function("cold", |b| {
        b.iter(|| WildcardQuery::new(black_box("func*_1?3")).compiled())
    });

    group.bench_function("cached", |b| {
        let query = WildcardQuery::new("func*_1?3");
        b.iter(|| black_box(&query).compiled())
    });

    group.finish();
}

fn bench_compile_and_drain(c: &mut Criterion) {
    let index = create_benchmark_index();
    let ctx = SearchContext::new(&index, &index);

    let mut group = c.benchmark_group("compile_and_drain");

    group.bench_function("wildcard", |b| {
        let query = parse_query(r#"{"wildcard": "token1*"}"#).unwrap();
        b.iter(|| {
            let mut searcher = query.searcher(black_box(&ctx)).unwrap();
            let ids = collect_doc_ids(searcher.as_mut()).unwrap();
            searcher.close().unwrap();
            ids
        })
    });

    group.bench_function("conjunction", |b| {
        let query = parse_query(
            r#"{"conjuncts": [{"wildcard": "token1*"}, {"wildcard": "struct?"}, {"wildcard": "sect*", "field": "title"}]}"#,
        )
        .unwrap();
        b.iter(|| {
            let mut searcher = query.searcher(black_box(&ctx)).unwrap();
            let ids = collect_doc_ids(searcher.as_mut()).unwrap();
            searcher.close().unwrap();
            ids
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_decoding,
    bench_pattern_compile,
    bench_compile_and_drain,
);

criterion_main!(benches);
