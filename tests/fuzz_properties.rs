//! Property-based fuzzing over small random relations: every call either
//! returns a model honoring range containment and the requested gap, or
//! reports that none exists.

use std::collections::HashMap;

use maxgap::{generate_ising, EdgeKey, Error, Graph};
use proptest::prelude::*;

const MAX_NODES: u32 = 8;
const MAX_DECISION: usize = 4;

fn arb_graph_and_decision() -> impl Strategy<Value = (Graph<u32>, Vec<u32>)> {
    (3..=MAX_NODES).prop_flat_map(|n| {
        let nodes: Vec<u32> = (0..n).collect();
        let all_pairs: Vec<(u32, u32)> = nodes
            .iter()
            .flat_map(|&u| nodes.iter().filter(move |&&v| v > u).map(move |&v| (u, v)))
            .collect();

        let edge_mask = prop::collection::vec(any::<bool>(), all_pairs.len());
        let decision_count = 1..=MAX_DECISION.min(n as usize);

        (Just(nodes), Just(all_pairs), edge_mask, decision_count).prop_map(
            move |(nodes, all_pairs, mask, k)| {
                let edges: Vec<(u32, u32)> = all_pairs
                    .into_iter()
                    .zip(mask)
                    .filter_map(|(edge, keep)| keep.then_some(edge))
                    .collect();
                let graph = Graph::new(nodes.clone(), edges).unwrap();
                let decision_variables = nodes.into_iter().take(k).collect();
                (graph, decision_variables)
            },
        )
    })
}

fn arb_configurations(k: usize) -> impl Strategy<Value = HashMap<Vec<i8>, f64>> {
    let total = 1usize << k;
    prop::collection::vec(any::<bool>(), total).prop_map(move |keep_mask| {
        let mut configurations = HashMap::new();
        for (bits, keep) in keep_mask.into_iter().enumerate() {
            if !keep {
                continue;
            }
            let tuple: Vec<i8> = (0..k).map(|i| if (bits >> i) & 1 == 0 { -1 } else { 1 }).collect();
            configurations.insert(tuple, 0.0);
        }
        if configurations.is_empty() {
            configurations.insert(vec![-1; k], 0.0);
        }
        configurations
    })
}

fn arb_case() -> impl Strategy<Value = (Graph<u32>, Vec<u32>, HashMap<Vec<i8>, f64>)> {
    arb_graph_and_decision().prop_flat_map(|(graph, decision_variables)| {
        let k = decision_variables.len();
        arb_configurations(k)
            .prop_map(move |configurations| (graph.clone(), decision_variables.clone(), configurations))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn generator_either_succeeds_within_bounds_or_reports_impossible(
        (graph, decision_variables, configurations) in arb_case(),
        g_min in -2.0..3.0f64,
    ) {
        let linear_ranges: HashMap<u32, (f64, f64)> =
            graph.nodes().map(|&v| (v, (-2.0, 2.0))).collect();
        let quadratic_ranges: HashMap<EdgeKey<u32>, (f64, f64)> = graph
            .edges()
            .map(|(&u, &v)| (EdgeKey(u, v), (-1.0, 1.0)))
            .collect();

        let result = generate_ising(
            &graph,
            &configurations,
            &decision_variables,
            &linear_ranges,
            &quadratic_ranges,
            g_min,
            None,
        );

        match result {
            Ok(model) => {
                prop_assert!(model.gap >= g_min.max(0.0) - 1e-6);
                for (v, &bias) in &model.h {
                    let (lo, hi) = linear_ranges[v];
                    prop_assert!(bias >= lo - 1e-6 && bias <= hi + 1e-6);
                }
                for (key, &bias) in &model.j {
                    let (lo, hi) = quadratic_ranges[key];
                    prop_assert!(bias >= lo - 1e-6 && bias <= hi + 1e-6);
                }
            }
            Err(Error::ImpossiblePenaltyModel) => {}
            Err(other) => prop_assert!(false, "unexpected error: {other:?}"),
        }
    }
}
