//! Benchmarks for trigger lookup and a full recompute pass over a deep
//! dependency chain.

use std::collections::HashSet;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fieldflow_core::{engine, Computation, ComputationGraph, MapRecord, Record};
use serde_json::json;

const CHAIN_LEN: usize = 100;

/// step_0 reads `seed`, step_n reads step_{n-1}.
fn chain_graph() -> ComputationGraph {
    let mut graph = ComputationGraph::new();
    for i in 0..CHAIN_LEN {
        let source = if i == 0 {
            "seed".to_string()
        } else {
            format!("step_{}", i - 1)
        };
        graph
            .insert(
                Computation::new(format!("step_{i}"), [source], |values| {
                    Ok(json!(values[0].as_f64().unwrap_or(0.0) + 1.0))
                })
                .unwrap(),
            )
            .unwrap();
    }
    graph
}

fn bench_triggered_by(c: &mut Criterion) {
    let graph = chain_graph();
    let changed = HashSet::from(["seed".to_string()]);

    c.bench_function("triggered_by_chain_100", |b| {
        b.iter(|| black_box(graph.computations_triggered_by(black_box(&changed))))
    });
}

fn bench_recompute_pass(c: &mut Criterion) {
    let graph = chain_graph();

    c.bench_function("recompute_chain_100", |b| {
        b.iter(|| {
            let mut record: MapRecord = [("seed", json!(0.0))].into_iter().collect();
            engine::recompute_changed(&graph, &mut record).unwrap();
            black_box(record.get(&format!("step_{}", CHAIN_LEN - 1)))
        })
    });
}

criterion_group!(benches, bench_triggered_by, bench_recompute_pass);
criterion_main!(benches);
