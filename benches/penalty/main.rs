use std::collections::HashMap;

use criterion::{black_box as bb, criterion_group, criterion_main, Criterion};

use maxgap::{generate_ising, EdgeKey, Graph};

fn and_gate_chimera_tile() -> Graph<u32> {
    let nodes: Vec<u32> = (0..8).collect();
    let mut edges = Vec::new();
    for u in 0..4u32 {
        for v in 4..8u32 {
            edges.push((u, v));
        }
    }
    Graph::new(nodes, edges).unwrap()
}

fn run(graph: &Graph<u32>, min_classical_gap: f64) -> f64 {
    let decision_variables = [0u32, 1, 2];
    let configurations: HashMap<Vec<i8>, f64> = [
        (vec![-1, -1, -1], 0.0),
        (vec![-1, 1, -1], 0.0),
        (vec![1, -1, -1], 0.0),
        (vec![1, 1, 1], 0.0),
    ]
    .into_iter()
    .collect();

    let linear_ranges: HashMap<u32, (f64, f64)> = graph.nodes().map(|&v| (v, (-2.0, 2.0))).collect();
    let quadratic_ranges: HashMap<EdgeKey<u32>, (f64, f64)> =
        graph.edges().map(|(&u, &v)| (EdgeKey(u, v), (-1.0, 1.0))).collect();

    let model = generate_ising(
        graph,
        &configurations,
        &decision_variables,
        &linear_ranges,
        &quadratic_ranges,
        min_classical_gap,
        None,
    )
    .unwrap();

    model.gap
}

fn declare_benchmarks(c: &mut Criterion) {
    let graph = and_gate_chimera_tile();

    c.bench_function("and_gate_penalty_model", |b| b.iter(|| run(&graph, bb(2.0))));
}

criterion_group!(benches, declare_benchmarks);
criterion_main!(benches);
