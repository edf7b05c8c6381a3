//! Error types surfaced at the `generate_ising` boundary.

/// Failure modes for the maximum-gap penalty-model generator.
///
/// Three kinds, matching the three ways a request for a model can fail: the
/// model provably cannot exist, the input was malformed, or the SMT backend
/// itself failed. No other error kind is surfaced — see the crate-level docs
/// for why this is a closed set.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No quadratic model realizes the requested relation within the given
    /// bias ranges at `gap >= max(min_classical_gap, 0)`.
    #[error("no penalty model exists for the given ranges and minimum gap")]
    ImpossiblePenaltyModel,

    /// The request was malformed: a bad graph, a configuration tuple of the
    /// wrong arity, a range with `lo > hi`, a non-spin value, or a non-finite
    /// number. Rejected before any SMT call is made.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The SMT backend itself failed: an unsupported backend name, a timeout
    /// during the initial feasibility check, or an internal solver error.
    #[error("SMT solver error: {0}")]
    SolverError(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
