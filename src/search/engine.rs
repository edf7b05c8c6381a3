//! Single bisection step: assert a candidate gap, check, extract, retract.

use std::hash::Hash;

use z3::ast::Ast;
use z3::{Context, SatResult, Solver};

use crate::encode::Encoded;
use crate::error::Error;
use crate::graph::Graph;
use crate::solution::extract_biases;
use crate::vars::real_from_f64;

/// Biases read back from a `Sat` step, before the classical gap and the
/// reported constant offset have been derived (that happens once, after the
/// search concludes).
pub struct ExtractedBiases<V> {
    /// Linear bias per node.
    pub h: std::collections::HashMap<V, f64>,
    /// Quadratic bias per edge.
    pub j: std::collections::HashMap<crate::graph::EdgeKey<V>, f64>,
}

/// Outcome of testing one candidate gap value.
pub enum Step<V> {
    /// The candidate gap is achievable; here are the biases that achieve it.
    Sat(ExtractedBiases<V>),
    /// The candidate gap is not achievable.
    Unsat,
    /// The solver could not decide within its configured timeout.
    Unknown,
}

/// Push a scope, assert `infeasible_energies[i] >= candidate_gap` for every
/// `i` (the ground floor is `0`, so no addition is needed), check
/// satisfiability, extract a model on `Sat`, then pop the scope so the base
/// constraints are reused unmodified by the next step.
pub fn check_gap<'ctx, V>(
    ctx: &'ctx Context,
    solver: &Solver<'ctx>,
    graph: &Graph<V>,
    encoded: &Encoded<'ctx, V>,
    candidate_gap: f64,
) -> Result<Step<V>, Error>
where
    V: Clone + Eq + Hash,
{
    solver.push();

    let bound = real_from_f64(ctx, candidate_gap);
    for energy in &encoded.infeasible_energies {
        solver.assert(&energy.ge(&bound));
    }

    let outcome = match solver.check() {
        SatResult::Sat => {
            let model = solver
                .get_model()
                .ok_or_else(|| Error::SolverError("solver reported sat with no model".into()))?;
            let (h, j) = extract_biases(&model, graph, &encoded.vars)?;
            Step::Sat(ExtractedBiases { h, j })
        }
        SatResult::Unsat => Step::Unsat,
        SatResult::Unknown => Step::Unknown,
    };

    solver.pop(1);

    Ok(outcome)
}
