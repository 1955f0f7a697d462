use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use sparqlbench::core::complexity::estimate_complexity;
use sparqlbench::{ResultAggregator, RunRecord};
use std::hint::black_box;

fn generate_records(queries: usize, iterations: u32) -> Vec<RunRecord> {
    let mut records = Vec::with_capacity(queries * iterations as usize * 2);
    for q in 0..queries {
        for (engine, base) in [("Virtuoso", 0.05), ("Jena Fuseki", 0.08)] {
            for iteration in 1..=iterations {
                let jitter = ((q as u32 * 7 + iteration * 13) % 10) as f64 / 1000.0;
                records.push(RunRecord {
                    engine: engine.to_string(),
                    query_name: format!("Query {}", q),
                    iteration,
                    execution_time: base + jitter,
                    cpu_usage: jitter * 100.0,
                    memory_usage: jitter * 10.0,
                    success: iteration % 17 != 0,
                    result_count: 100,
                    error: String::new(),
                });
            }
        }
    }
    records
}

fn bench_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation/summarize");

    for queries in [10, 50, 200].iter() {
        let records = generate_records(*queries, 20);
        group.bench_with_input(BenchmarkId::from_parameter(queries), queries, |b, _| {
            b.iter(|| ResultAggregator::summarize(black_box(&records)));
        });
    }

    group.finish();
}

fn bench_insights(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation/insights");

    for queries in [10, 50, 200].iter() {
        let records = generate_records(*queries, 20);
        group.bench_with_input(BenchmarkId::from_parameter(queries), queries, |b, _| {
            b.iter(|| {
                ResultAggregator::insights(black_box(&records));
                ResultAggregator::performance_gaps(black_box(&records), "Virtuoso", "Jena Fuseki")
            });
        });
    }

    group.finish();
}

fn bench_complexity(c: &mut Criterion) {
    let query = r#"
        SELECT ?x (COUNT(?y) AS ?n) WHERE {
            { SELECT ?x WHERE { ?x a ?t } }
            OPTIONAL { ?x ?p ?y }
            FILTER(?n > 1)
        } GROUP BY ?x ORDER BY DESC(?n)
    "#;

    c.bench_function("complexity/estimate", |b| {
        b.iter(|| estimate_complexity(black_box(query)));
    });
}

criterion_group!(benches, bench_summarize, bench_insights, bench_complexity);
criterion_main!(benches);
