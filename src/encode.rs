//! Constraint Encoder: turns validated inputs into SMT assertions.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use z3::ast::{Ast, Bool, Real};
use z3::{Context, Solver};

use crate::energy::{energy_expr, spin_assignments, Spin};
use crate::error::Error;
use crate::graph::{EdgeKey, Graph};
use crate::vars::{real_from_f64, BiasVars};

/// Auxiliary-assignment count above which enumeration is logged as expensive
/// rather than silently grinding through it.
const AUX_ENUMERATION_WARN_THRESHOLD: usize = 8;

/// Everything the Gap Maximizer needs after the base constraints have been
/// asserted: the declared bias variables, and every auxiliary-enumerated
/// energy expression for an infeasible decision tuple (the ones that must be
/// bounded below by `G`, the candidate gap re-asserted per bisection step —
/// see [`crate::search`]).
pub struct Encoded<'ctx, V> {
    /// The declared linear/quadratic reals.
    pub vars: BiasVars<'ctx, V>,
    /// One energy expression per (infeasible decision tuple, auxiliary assignment) pair.
    pub infeasible_energies: Vec<Real<'ctx>>,
}

/// Validate inputs and assert every constraint that does not depend on the
/// gap under test: bias ranges and the feasible-tuple OR/AND pair. A
/// feasible tuple's relative offset is asserted literally (the ground floor
/// is `0` by convention, with no separate free constant to shift it — see
/// [`crate::vars::BiasVars`]). Infeasible-tuple energies are returned
/// unasserted, for the maximizer to bound per bisection step.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if:
/// - `decision_variables` contains a duplicate or a label absent from `graph`,
/// - `feasible_configurations` is empty, or any key has the wrong arity,
///   contains a non-spin value, or maps to a non-finite offset,
/// - any bias range has `lo > hi` or a non-finite bound (propagated from
///   [`BiasVars::declare`]).
pub fn encode<'ctx, V>(
    ctx: &'ctx Context,
    solver: &Solver<'ctx>,
    graph: &Graph<V>,
    decision_variables: &[V],
    feasible_configurations: &HashMap<Vec<Spin>, f64>,
    linear_ranges: &HashMap<V, (f64, f64)>,
    quadratic_ranges: &HashMap<EdgeKey<V>, (f64, f64)>,
) -> Result<Encoded<'ctx, V>, Error>
where
    V: Clone + Eq + Hash + std::fmt::Debug,
{
    validate_decision_variables(graph, decision_variables)?;
    validate_feasible_configurations(decision_variables.len(), feasible_configurations)?;

    let vars = BiasVars::declare(ctx, solver, graph, linear_ranges, quadratic_ranges)?;

    let decision_set: HashSet<&V> = decision_variables.iter().collect();
    let aux: Vec<V> = graph
        .nodes()
        .filter(|v| !decision_set.contains(v))
        .cloned()
        .collect();

    if aux.len() > AUX_ENUMERATION_WARN_THRESHOLD {
        tracing::warn!(
            aux_count = aux.len(),
            "auxiliary enumeration exceeds the documented |A| <= 8 crossover; \
             encoding will build 2^|A| formulas per decision tuple",
        );
    }

    let k = decision_variables.len();
    let mut infeasible_energies = Vec::new();

    for tuple in spin_assignments(k) {
        let mut decision_assignment: HashMap<V, Spin> = decision_variables
            .iter()
            .cloned()
            .zip(tuple.iter().copied())
            .collect();

        let aux_energies: Vec<Real<'ctx>> = spin_assignments(aux.len())
            .map(|aux_tuple| {
                for (label, spin) in aux.iter().zip(aux_tuple.iter().copied()) {
                    decision_assignment.insert(label.clone(), spin);
                }
                energy_expr(ctx, graph, &vars, &decision_assignment)
            })
            .collect();

        if let Some(&relative_offset) = feasible_configurations.get(&tuple) {
            let target = real_from_f64(ctx, relative_offset);

            // At least one auxiliary assignment reaches ground energy.
            let reaches_ground: Vec<Bool<'ctx>> =
                aux_energies.iter().map(|e| e._eq(&target)).collect();
            let reaches_ground_refs: Vec<&Bool<'ctx>> = reaches_ground.iter().collect();
            solver.assert(&Bool::or(ctx, &reaches_ground_refs));

            // No auxiliary assignment goes below ground energy.
            for e in &aux_energies {
                solver.assert(&e.ge(&target));
            }
        } else {
            infeasible_energies.extend(aux_energies);
        }
    }

    Ok(Encoded {
        vars,
        infeasible_energies,
    })
}

fn validate_decision_variables<V>(graph: &Graph<V>, decision_variables: &[V]) -> Result<(), Error>
where
    V: Clone + Eq + Hash + std::fmt::Debug,
{
    let mut seen = HashSet::with_capacity(decision_variables.len());

    for v in decision_variables {
        if !graph.contains_node(v) {
            return Err(Error::InvalidInput(format!(
                "decision variable {v:?} is not a node of the graph"
            )));
        }
        if !seen.insert(v) {
            return Err(Error::InvalidInput(format!(
                "decision variable {v:?} appears more than once"
            )));
        }
    }

    Ok(())
}

fn validate_feasible_configurations(
    arity: usize,
    feasible_configurations: &HashMap<Vec<Spin>, f64>,
) -> Result<(), Error> {
    if feasible_configurations.is_empty() {
        return Err(Error::InvalidInput(
            "feasible_configurations must be non-empty".into(),
        ));
    }

    for (tuple, offset) in feasible_configurations {
        if tuple.len() != arity {
            return Err(Error::InvalidInput(format!(
                "feasible configuration {tuple:?} has arity {}, expected {arity}",
                tuple.len()
            )));
        }
        if tuple.iter().any(|&s| s != -1 && s != 1) {
            return Err(Error::InvalidInput(format!(
                "feasible configuration {tuple:?} contains a non-spin value"
            )));
        }
        if !offset.is_finite() {
            return Err(Error::InvalidInput(format!(
                "feasible configuration {tuple:?} has a non-finite offset"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_feasible_configurations() {
        let empty: HashMap<Vec<Spin>, f64> = HashMap::new();
        assert!(validate_feasible_configurations(2, &empty).is_err());
    }

    #[test]
    fn rejects_wrong_arity() {
        let mut f = HashMap::new();
        f.insert(vec![1, 1], 0.0);
        assert!(validate_feasible_configurations(3, &f).is_err());
    }

    #[test]
    fn rejects_non_spin_value() {
        let mut f = HashMap::new();
        f.insert(vec![1, 0], 0.0);
        assert!(validate_feasible_configurations(2, &f).is_err());
    }

    #[test]
    fn rejects_non_finite_offset() {
        let mut f = HashMap::new();
        f.insert(vec![1, 1], f64::NAN);
        assert!(validate_feasible_configurations(2, &f).is_err());
    }

    #[test]
    fn accepts_well_formed_configurations() {
        let mut f = HashMap::new();
        f.insert(vec![-1, 1], 0.0);
        assert!(validate_feasible_configurations(2, &f).is_ok());
    }
}
