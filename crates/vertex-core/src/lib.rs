//! # vertex-core
//!
//! The operator model of a vertex operator algebra.
//!
//! This crate provides:
//! - Boson/fermion statistics (`Parity`)
//! - Primitive fields (`BasisOperator`), their derivatives
//!   (`DerivativeOperator`) and normal-ordered products
//!   (`NormalOrderedOperator`), closed under the `Operator` sum type
//! - Linear combinations of operators with polynomial coefficients
//!   (`LocalOperator`)
//! - The singular part of an operator product (`OpeData`)
//! - The error type shared by the whole workspace (`OpeError`)
//!
//! ## Canonical Form
//!
//! Operators are plain values with derived structural equality. Every
//! constructor that can produce redundant structure normalizes it away:
//! derivative orders accumulate, the derivative of a normal-ordered
//! product is expanded by the Leibniz rule, the unit operator is
//! eliminated from normal-ordered products and zero coefficients are
//! dropped. Two linear combinations are therefore algebraically equal
//! exactly when they are structurally equal.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod local;
pub mod ope_data;
pub mod operator;
pub mod parity;

#[cfg(test)]
mod proptests;

pub use error::{OpeError, OpeResult};
pub use local::{normal_order, LocalOperator};
pub use ope_data::OpeData;
pub use operator::{delta, BasisOperator, DerivativeOperator, NormalOrderedOperator, Operator};
pub use parity::Parity;
