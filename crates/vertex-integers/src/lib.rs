//! # vertex-integers
//!
//! Exact rational arithmetic for OPE coefficients.
//!
//! This crate wraps `dashu` to provide:
//! - Arbitrary precision rationals (`Rational`)
//! - The integer combinatorics used by the derivative and commutation
//!   rules: factorials, binomials, Pochhammer symbols and sign powers
//!
//! All quantities are exact. Pole orders in practice stay small, but the
//! binomial sums of nested composite OPEs grow quickly, so nothing here
//! is allowed to overflow.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod combinatorics;
pub mod rational;

#[cfg(test)]
mod proptests;

pub use combinatorics::{binomial, factorial, pochhammer, sign_power};
pub use rational::Rational;
