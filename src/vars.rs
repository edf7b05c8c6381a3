//! Symbolic bias domains: one `z3::ast::Real` per node/edge, each range-constrained.

use std::collections::HashMap;
use std::hash::Hash;

use z3::ast::{Ast, Real};
use z3::{Context, Solver};

use crate::error::Error;
use crate::graph::{EdgeKey, Graph};

/// Fixed-point denominator used to convert caller-supplied `f64` ranges and
/// constants into the exact rationals Z3's `QF_LRA` theory expects.
///
/// `1e6` matches the crate's default bisection tolerance (`1e-6`, see
/// [`crate::config::GeneratorConfig::DEFAULT_EPSILON`]) while keeping scaled
/// numerators well inside `i32` range for the bias magnitudes this crate
/// targets.
const FIXED_POINT_DEN: i32 = 1_000_000;

/// Convert an `f64` into an exact Z3 rational, rounding half-to-even at the
/// `1e-6` boundary.
pub fn real_from_f64<'ctx>(ctx: &'ctx Context, value: f64) -> Real<'ctx> {
    let scaled = (value * f64::from(FIXED_POINT_DEN)).round();
    let num = scaled.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32;

    Real::from_real(ctx, num, FIXED_POINT_DEN)
}

/// Convert a satisfying model's rational value back to `f64`.
#[must_use]
pub fn f64_from_real_value(num: i64, den: i64) -> f64 {
    num as f64 / den as f64
}

/// Owns every symbolic bias variable for one `generate_ising` call: linear
/// biases `H_v` and quadratic biases `J_uv`. There is no separate free
/// constant: a feasible tuple's declared relative offset is asserted
/// directly against `Σ σ(v) H_v + Σ σ(u)σ(v) J_uv` (see [`crate::encode`]),
/// so the floor a feasible tuple must reach is a literal number, not a
/// solver-chosen one. The reported `offset` field of a [`crate::solution::PenaltyModel`]
/// is derived afterward from the lowest declared relative offset, not
/// extracted from the model.
pub struct BiasVars<'ctx, V> {
    /// `H_v` per node.
    pub linear: HashMap<V, Real<'ctx>>,
    /// `J_uv` per edge, keyed order-independently.
    pub quadratic: HashMap<EdgeKey<V>, Real<'ctx>>,
}

impl<'ctx, V> BiasVars<'ctx, V>
where
    V: Clone + Eq + Hash + std::fmt::Debug,
{
    /// Declare one symbolic real per node and edge, and assert their range
    /// constraints on `solver`.
    ///
    /// Ranges absent from `linear_ranges`/`quadratic_ranges` default to
    /// `[-2, 2]` and `[-1, 1]` respectively.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if any range has `lo > hi` or contains
    /// a non-finite bound.
    pub fn declare(
        ctx: &'ctx Context,
        solver: &Solver<'ctx>,
        graph: &Graph<V>,
        linear_ranges: &HashMap<V, (f64, f64)>,
        quadratic_ranges: &HashMap<EdgeKey<V>, (f64, f64)>,
    ) -> Result<Self, Error> {
        let mut linear = HashMap::with_capacity(graph.len());

        for v in graph.nodes() {
            let (lo, hi) = linear_range_or_default(linear_ranges, v);
            check_range(lo, hi)?;

            let sym = Real::fresh_const(ctx, "h");
            assert_range(ctx, solver, &sym, lo, hi);
            linear.insert(v.clone(), sym);
        }

        let mut quadratic = HashMap::new();
        for (u, v) in graph.edges() {
            let key = EdgeKey(u.clone(), v.clone());
            let (lo, hi) = quadratic_range_or_default(quadratic_ranges, &key);
            check_range(lo, hi)?;

            let sym = Real::fresh_const(ctx, "j");
            assert_range(ctx, solver, &sym, lo, hi);
            quadratic.insert(key, sym);
        }

        Ok(Self { linear, quadratic })
    }

    /// Look up the symbolic quadratic bias for `{u, v}`, regardless of
    /// endpoint order.
    #[must_use]
    pub fn quadratic_for(&self, u: &V, v: &V) -> Option<&Real<'ctx>> {
        self.quadratic.get(&EdgeKey(u.clone(), v.clone()))
    }
}

/// Node range, defaulting to `[-2, 2]` when the caller left it unspecified.
#[must_use]
pub fn linear_range_or_default<V: Eq + Hash>(ranges: &HashMap<V, (f64, f64)>, v: &V) -> (f64, f64) {
    ranges.get(v).copied().unwrap_or((-2.0, 2.0))
}

/// Edge range, defaulting to `[-1, 1]` when the caller left it unspecified.
#[must_use]
pub fn quadratic_range_or_default<V: Eq + Hash>(
    ranges: &HashMap<EdgeKey<V>, (f64, f64)>,
    key: &EdgeKey<V>,
) -> (f64, f64) {
    ranges.get(key).copied().unwrap_or((-1.0, 1.0))
}

fn check_range(lo: f64, hi: f64) -> Result<(), Error> {
    if !lo.is_finite() || !hi.is_finite() {
        return Err(Error::InvalidInput("bias range must be finite".into()));
    }
    if lo > hi {
        return Err(Error::InvalidInput(format!(
            "bias range has lo ({lo}) > hi ({hi})"
        )));
    }
    Ok(())
}

fn assert_range<'ctx>(ctx: &'ctx Context, solver: &Solver<'ctx>, sym: &Real<'ctx>, lo: f64, hi: f64) {
    let lo = real_from_f64(ctx, lo);
    let hi = real_from_f64(ctx, hi);

    solver.assert(&sym.ge(&lo));
    solver.assert(&sym.le(&hi));
}
