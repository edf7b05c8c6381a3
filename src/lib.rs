//! Maximum-gap penalty-model generator for Ising-style binary quadratic
//! models.
//!
//! Given an interaction graph, a relation over a handful of decision
//! variables (expressed as a set of feasible spin tuples), and per-node/edge
//! bias ranges, [`generate_ising`] searches for linear biases `h`, quadratic
//! biases `J`, and a constant `offset` such that every feasible tuple attains
//! a shared ground energy and every infeasible tuple is separated from it by
//! the largest gap the ranges allow, subject to a caller-supplied minimum.
//!
//! The search is encoded into quantifier-free linear real arithmetic and
//! driven through [`z3`] via repeated `push`/`pop` scopes; see [`search`] for
//! the bisection loop itself.

pub mod config;
pub mod encode;
pub mod energy;
pub mod error;
pub mod graph;
pub mod search;
pub mod solution;
pub mod vars;


use std::collections::HashMap;
use std::hash::Hash;

pub use config::GeneratorConfig;
pub use energy::Spin;
pub use error::{Error, Result};
pub use graph::{EdgeKey, Graph};
pub use solution::PenaltyModel;

/// Generate a maximum-gap penalty model with default [`GeneratorConfig`].
///
/// See [`generate_ising_with_config`] for the full parameter description.
///
/// # Errors
///
/// See [`generate_ising_with_config`].
#[tracing::instrument(skip_all)]
pub fn generate_ising<V>(
    graph: &Graph<V>,
    feasible_configurations: &HashMap<Vec<Spin>, f64>,
    decision_variables: &[V],
    linear_energy_ranges: &HashMap<V, (f64, f64)>,
    quadratic_energy_ranges: &HashMap<EdgeKey<V>, (f64, f64)>,
    min_classical_gap: f64,
    smt_solver_name: Option<&str>,
) -> Result<PenaltyModel<V>>
where
    V: Clone + Eq + Hash + std::fmt::Debug,
{
    generate_ising_with_config(
        graph,
        feasible_configurations,
        decision_variables,
        linear_energy_ranges,
        quadratic_energy_ranges,
        min_classical_gap,
        smt_solver_name,
        &GeneratorConfig::default(),
    )
}

/// Generate a maximum-gap penalty model, with explicit ambient configuration.
///
/// # Arguments
///
/// - `graph` — the interaction graph; decision variables and auxiliaries are
///   both drawn from its node set.
/// - `feasible_configurations` — non-empty map from `{-1,+1}^k` decision
///   tuples to a relative ground-energy offset (usually `0.0`).
/// - `decision_variables` — the ordered `k`-tuple of graph nodes that indexes
///   `feasible_configurations`; every other node is a free auxiliary.
/// - `linear_energy_ranges` / `quadratic_energy_ranges` — per-node/edge bias
///   bounds; entries absent here default to `[-2, 2]` and `[-1, 1]`.
/// - `min_classical_gap` — the minimum acceptable gap; may be zero or
///   negative, in which case the generator still reports the maximum
///   achievable gap.
/// - `smt_solver_name` — `None` selects the only backend this crate
///   implements (`z3`); any other name is rejected.
/// - `config` — numeric tolerance, optional solver timeout, optional
///   cooperative cancellation flag.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for a malformed graph, decision-variable
/// list, or configuration map; [`Error::ImpossiblePenaltyModel`] if no model
/// exists at `gap >= max(min_classical_gap, 0)` within the given ranges; and
/// [`Error::SolverError`] for an unsupported backend name or a backend
/// failure on the initial feasibility check.
#[tracing::instrument(skip_all, fields(min_classical_gap))]
pub fn generate_ising_with_config<V>(
    graph: &Graph<V>,
    feasible_configurations: &HashMap<Vec<Spin>, f64>,
    decision_variables: &[V],
    linear_energy_ranges: &HashMap<V, (f64, f64)>,
    quadratic_energy_ranges: &HashMap<EdgeKey<V>, (f64, f64)>,
    min_classical_gap: f64,
    smt_solver_name: Option<&str>,
    config: &GeneratorConfig,
) -> Result<PenaltyModel<V>>
where
    V: Clone + Eq + Hash + std::fmt::Debug,
{
    if let Some(name) = smt_solver_name {
        if name != "z3" {
            return Err(Error::SolverError(format!("unsupported SMT backend: {name}")));
        }
    }

    let ctx = z3::Context::new(&z3::Config::new());
    let solver = z3::Solver::new(&ctx);

    if let Some(timeout_ms) = config.timeout_ms {
        let mut params = z3::Params::new(&ctx);
        params.set_u32("timeout", timeout_ms);
        solver.set_params(&params);
    }

    let encoded = encode::encode(
        &ctx,
        &solver,
        graph,
        decision_variables,
        feasible_configurations,
        linear_energy_ranges,
        quadratic_energy_ranges,
    )?;

    search::maximize_gap(
        &ctx,
        &solver,
        graph,
        decision_variables,
        feasible_configurations,
        linear_energy_ranges,
        quadratic_energy_ranges,
        &encoded,
        min_classical_gap,
        config,
    )
}
