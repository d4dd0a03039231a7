//! Error types for OPE computations.

use thiserror::Error;

use crate::parity::Parity;

/// Errors raised at the construction and declaration boundaries.
///
/// The recursive engine assumes well-formed input, so every variant here
/// is reported where the malformed value is first built or declared.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum OpeError {
    /// A pole order below 1 was passed to a mutator.
    #[error("pole order must be at least 1, got {0}")]
    InvalidPoleOrder(u32),

    /// A derivative order below 1 was requested.
    #[error("derivative order must be at least 1, got {0}")]
    InvalidDerivativeOrder(u32),

    /// An operator was registered twice with different statistics.
    #[error("{operator} is already registered as {declared}, cannot register it as {requested}")]
    ParityConflict {
        /// The operator being registered.
        operator: String,
        /// The parity recorded earlier.
        declared: Parity,
        /// The parity of the rejected registration.
        requested: Parity,
    },

    /// A value does not carry the statistics its context requires.
    #[error("parity mismatch in {context}: expected {expected}, found {found}")]
    ParityMismatch {
        /// Where the mismatch was detected.
        context: String,
        /// The parity the context requires.
        expected: Parity,
        /// The parity actually found.
        found: Parity,
    },

    /// A linear combination mixes bosonic and fermionic terms.
    #[error("{0} mixes bosonic and fermionic terms")]
    MixedParity(String),

    /// Strict mode met a pair of basis operators with no declared OPE.
    #[error("no OPE declared between {left} and {right}")]
    UndeclaredOpe {
        /// Left operator of the pair.
        left: String,
        /// Right operator of the pair.
        right: String,
    },
}

/// Result alias for OPE computations.
pub type OpeResult<T> = Result<T, OpeError>;
