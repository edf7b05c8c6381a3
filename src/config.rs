//! Tunable knobs that do not change problem semantics.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Ambient configuration for a `generate_ising` call: numeric tolerance, an
/// optional solver timeout, and an optional cooperative cancellation flag.
///
/// None of these fields change *what* a valid answer looks like; they only
/// bound how hard the generator works to find one.
#[derive(Clone, Default)]
pub struct GeneratorConfig {
    /// Binary-search convergence tolerance on the gap. Defaults to `1e-6`.
    pub epsilon: f64,

    /// Optional per-call SMT solver timeout, in milliseconds. `None` means no
    /// timeout is set on the backend.
    pub timeout_ms: Option<u32>,

    /// Optional cooperative cancellation flag, checked between bisection
    /// steps. When set to `true` by the host, the maximizer stops and
    /// returns the best model found so far.
    pub cancellation: Option<Arc<AtomicBool>>,
}

impl GeneratorConfig {
    /// Default tolerance used when a caller does not build a `GeneratorConfig` by hand.
    pub const DEFAULT_EPSILON: f64 = 1e-6;

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|flag| flag.load(std::sync::atomic::Ordering::Relaxed))
    }

    /// The effective epsilon: the configured value, or the default if zero
    /// (the `Default` impl leaves `epsilon` at `0.0`, which would never
    /// terminate the bisection loop).
    #[must_use]
    pub fn epsilon_or_default(&self) -> f64 {
        if self.epsilon > 0.0 {
            self.epsilon
        } else {
            Self::DEFAULT_EPSILON
        }
    }
}
