//! # vertex-poly
//!
//! The coefficient algebra for OPE computations.
//!
//! Pole coefficients of an OPE are linear combinations of local operators
//! whose scalar factors may depend on free parameters of the algebra, such
//! as the central charge `c` of the Virasoro algebra or the level `k` of a
//! current algebra. This crate provides:
//! - Named parameters (`Symbol`)
//! - Monomials over those parameters (`Monomial`)
//! - Sparse polynomials over the rationals (`Scalar`) kept in expanded,
//!   canonical form, so that structural equality is algebraic equality
//!
//! ## Canonical Form
//!
//! Every `Scalar` stores its terms in a sorted map with no zero
//! coefficients. Cancellations are therefore visible immediately after
//! any arithmetic operation and `is_zero` is an exact zero test.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod monomial;
pub mod scalar;
pub mod symbol;

#[cfg(test)]
mod proptests;

pub use monomial::Monomial;
pub use scalar::Scalar;
pub use symbol::Symbol;
