//! Gap Maximizer: binary search over the gap `G`, driving repeated SMT
//! queries through a single reused `push`/`pop` scope.

pub mod engine;

use std::hash::Hash;

use z3::{Context, Solver};

use crate::config::GeneratorConfig;
use crate::encode::Encoded;
use crate::error::Error;
use crate::graph::Graph;
use crate::solution::{classical_gap, feasible_ground, PenaltyModel};
use crate::vars::{linear_range_or_default, quadratic_range_or_default};

use self::engine::{check_gap, ExtractedBiases, Step};

/// Upper bound on any achievable gap: twice the sum, over every node and
/// edge in `graph`, of the larger-magnitude end of its bias range.
fn upper_bound<V>(
    graph: &Graph<V>,
    linear_ranges: &std::collections::HashMap<V, (f64, f64)>,
    quadratic_ranges: &std::collections::HashMap<crate::graph::EdgeKey<V>, (f64, f64)>,
) -> f64
where
    V: Clone + Eq + Hash,
{
    let mut spread = 0.0;

    for v in graph.nodes() {
        let (lo, hi) = linear_range_or_default(linear_ranges, v);
        spread += lo.abs().max(hi.abs());
    }

    for (u, v) in graph.edges() {
        let key = crate::graph::EdgeKey(u.clone(), v.clone());
        let (lo, hi) = quadratic_range_or_default(quadratic_ranges, &key);
        spread += lo.abs().max(hi.abs());
    }

    2.0 * spread
}

/// Drive the bisection search to the largest `G` the encoded constraints can
/// support, then recompute the gap classically from the winning biases.
///
/// # Errors
///
/// Returns [`Error::ImpossiblePenaltyModel`] if no model exists at
/// `G = max(min_classical_gap, 0)`, and [`Error::SolverError`] if the
/// initial feasibility check times out rather than deciding — unlike a
/// later bisection step timing out, which this loop treats as "candidate
/// not reached" and keeps narrowing from, a timeout on the very first check
/// leaves no known-feasible gap to report at all.
#[tracing::instrument(skip_all, fields(min_classical_gap))]
pub fn maximize_gap<'ctx, V>(
    ctx: &'ctx Context,
    solver: &Solver<'ctx>,
    graph: &Graph<V>,
    decision_variables: &[V],
    feasible_configurations: &std::collections::HashMap<Vec<crate::energy::Spin>, f64>,
    linear_ranges: &std::collections::HashMap<V, (f64, f64)>,
    quadratic_ranges: &std::collections::HashMap<crate::graph::EdgeKey<V>, (f64, f64)>,
    encoded: &Encoded<'ctx, V>,
    min_classical_gap: f64,
    config: &GeneratorConfig,
) -> Result<PenaltyModel<V>, Error>
where
    V: Clone + Eq + Hash + std::fmt::Debug,
{
    let mut low = min_classical_gap.max(0.0);
    let high_bound = upper_bound(graph, linear_ranges, quadratic_ranges);

    if config.is_cancelled() {
        return Err(Error::ImpossiblePenaltyModel);
    }

    let mut best = match check_gap(ctx, solver, graph, encoded, low)? {
        Step::Sat(biases) => biases,
        Step::Unsat => return Err(Error::ImpossiblePenaltyModel),
        Step::Unknown => {
            return Err(Error::SolverError(format!(
                "solver could not decide the initial feasibility check at gap {low} within its timeout"
            )))
        }
    };

    let mut high = high_bound;
    let epsilon = config.epsilon_or_default();

    while high - low >= epsilon {
        if config.is_cancelled() {
            break;
        }

        let mid = low + (high - low) / 2.0;

        match check_gap(ctx, solver, graph, encoded, mid)? {
            Step::Sat(biases) => {
                low = mid;
                best = biases;
            }
            Step::Unsat | Step::Unknown => {
                high = mid;
            }
        }

        tracing::debug!(low, high, "bisection bracket narrowed");
    }

    Ok(finish(graph, decision_variables, feasible_configurations, best))
}

/// Derive the reported `offset` and `gap` from the winning biases: `offset`
/// is the negation of [`feasible_ground`], shifting the realized floor to
/// `0` in the full `h, J, offset` energy; `gap` is [`classical_gap`], the
/// same difference either way since `offset` cancels out of it.
fn finish<V>(
    graph: &Graph<V>,
    decision_variables: &[V],
    feasible_configurations: &std::collections::HashMap<Vec<crate::energy::Spin>, f64>,
    biases: ExtractedBiases<V>,
) -> PenaltyModel<V>
where
    V: Clone + Eq + Hash,
{
    let ground = feasible_ground(graph, decision_variables, feasible_configurations, &biases.h, &biases.j);
    let gap = classical_gap(graph, decision_variables, feasible_configurations, &biases.h, &biases.j);

    PenaltyModel {
        h: biases.h,
        j: biases.j,
        offset: -ground,
        gap,
    }
}
