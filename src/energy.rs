//! Build the symbolic Ising energy expression for a concrete spin assignment,
//! and enumerate auxiliary spin assignments.

use std::collections::HashMap;
use std::hash::Hash;

use z3::ast::Real;
use z3::Context;

use crate::graph::Graph;
use crate::vars::{real_from_f64, BiasVars};

/// A spin, constrained by construction to `{-1, +1}`.
pub type Spin = i8;

/// Enumerate every `{-1, +1}^n` assignment for `n` labels, in the order the
/// labels are given. The `i`-th bit of the enumeration counter selects `+1`
/// (set) or `-1` (clear) for `labels[i]`.
///
/// `n` is expected to be small (`|A| <= 8` is the tolerable range before
/// enumeration cost dominates); callers are responsible for warning on
/// larger `n` before calling this.
pub fn spin_assignments(n: usize) -> impl Iterator<Item = Vec<Spin>> {
    let total = 1u32 << n;
    (0..total).map(move |bits| (0..n).map(|i| if (bits >> i) & 1 == 0 { -1 } else { 1 }).collect())
}

/// Construct `E(sigma) = Sum_v sigma(v) H_v + Sum_{uv in E} sigma(u) sigma(v) J_uv`
/// for one full spin assignment over every node in `graph`.
///
/// # Panics
///
/// Panics if `assignment` is missing a spin for a node or edge endpoint of
/// `graph` — a programmer error in this crate, never a user-facing one, since
/// every caller builds `assignment` from `graph`'s own node/edge iterators.
pub fn energy_expr<'ctx, V>(
    ctx: &'ctx Context,
    graph: &Graph<V>,
    vars: &BiasVars<'ctx, V>,
    assignment: &HashMap<V, Spin>,
) -> Real<'ctx>
where
    V: Clone + Eq + Hash,
{
    let mut terms = Vec::with_capacity(graph.len() + graph.edges().count());

    for v in graph.nodes() {
        let spin = assignment[v];
        let h = &vars.linear[v];
        terms.push(signed(ctx, h, spin));
    }

    for (u, v) in graph.edges() {
        let spin = assignment[u] * assignment[v];
        let j = vars
            .quadratic_for(u, v)
            .expect("quadratic bias declared for every graph edge");
        terms.push(signed(ctx, j, spin));
    }

    let refs: Vec<&Real<'ctx>> = terms.iter().collect();
    Real::add(ctx, &refs)
}

/// `x` if `spin == 1`, `-x` if `spin == -1`.
fn signed<'ctx>(ctx: &'ctx Context, x: &Real<'ctx>, spin: Spin) -> Real<'ctx> {
    let coefficient = real_from_f64(ctx, f64::from(spin));
    Real::mul(ctx, &[x, &coefficient])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spin_assignments_cover_every_combination() {
        let all: Vec<_> = spin_assignments(2).collect();

        assert_eq!(all.len(), 4);
        assert!(all.contains(&vec![-1, -1]));
        assert!(all.contains(&vec![1, -1]));
        assert!(all.contains(&vec![-1, 1]));
        assert!(all.contains(&vec![1, 1]));
    }

    #[test]
    fn spin_assignments_of_zero_labels_is_the_empty_assignment() {
        let all: Vec<_> = spin_assignments(0).collect();
        assert_eq!(all, vec![Vec::<Spin>::new()]);
    }
}
