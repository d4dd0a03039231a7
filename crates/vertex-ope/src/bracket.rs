//! Normal-ordered commutators.

use vertex_core::{normal_order, LocalOperator};

/// Computes NO(a, b) - NO(b, a).
///
/// The result is left unreduced; [`OpeEngine::commutator`] rewrites it in
/// registry order.
///
/// [`OpeEngine::commutator`]: crate::OpeEngine::commutator
#[must_use]
pub fn commutator(a: &LocalOperator, b: &LocalOperator) -> LocalOperator {
    normal_order(a, b) - normal_order(b, a)
}

/// Computes NO(a, b) + NO(b, a).
#[must_use]
pub fn anticommutator(a: &LocalOperator, b: &LocalOperator) -> LocalOperator {
    normal_order(a, b) + normal_order(b, a)
}
