//! Building a penalty model for an AND gate on a chimera unit cell.
//!
//! A chimera-(1,1,4) tile is a bipartite `K_{4,4}` graph: two shores of four
//! nodes each, every left node connected to every right node. We pick three
//! of its nodes as decision variables (`a`, `b`, `out`) and ask for a
//! quadratic model whose ground states are exactly the AND truth table.

use std::collections::HashMap;

use maxgap::{generate_ising, EdgeKey, Graph};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let nodes: Vec<u32> = (0..8).collect();
    let mut edges = Vec::new();
    for u in 0..4u32 {
        for v in 4..8u32 {
            edges.push((u, v));
        }
    }
    let graph = Graph::new(nodes, edges).unwrap();

    // `a`, `b`, `out`: the AND gate's inputs and output.
    let decision_variables = [0u32, 1, 2];

    // `(a, b, out) -> relative offset`, encoding `out = a AND b` in spins.
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
        &graph,
        &configurations,
        &decision_variables,
        &linear_ranges,
        &quadratic_ranges,
        2.0,
        None,
    )
    .unwrap();

    println!("linear biases:    {:?}", model.h);
    println!("quadratic biases: {:?}", model.j);
    println!("offset:           {}", model.offset);
    println!("gap:              {}", model.gap);
}
