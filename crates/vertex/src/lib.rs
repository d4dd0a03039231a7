//! # Vertex
//!
//! Operator product expansions for vertex operator algebras.
//!
//! Declare the OPEs between the primitive fields of an algebra once, then
//! compute the OPE of any composite built from them: derivatives,
//! normal-ordered products and linear combinations with coefficients that
//! may depend on free parameters such as the central charge.
//!
//! ## Features
//!
//! - **Exact Coefficients**: Arbitrary precision rationals and polynomials
//!   in symbolic parameters, kept in canonical form
//! - **Fermions**: Z2-graded statistics with the correct exchange signs
//! - **Composite Fields**: Derivative and normal-ordering rules reduce every
//!   OPE to declared ones
//! - **Consistency Checks**: The Jacobi identity on a grid of pole orders
//!
//! ## Quick Start
//!
//! ```rust
//! use vertex::prelude::*;
//!
//! let t = BasisOperator::bosonic("T");
//! let tt: LocalOperator = t.clone().into();
//! let c = Scalar::var("c");
//!
//! let mut registry = OpeRegistry::new();
//! registry.bosonic(&[t.clone()]).unwrap();
//! registry
//!     .define(
//!         &t,
//!         &t,
//!         OpeData::from_list([
//!             LocalOperator::scalar(c / Rational::from(2)),
//!             LocalOperator::zero(),
//!             2 * tt.clone(),
//!             tt.derivative(1),
//!         ]),
//!     )
//!     .unwrap();
//!
//! let engine = OpeEngine::new(&registry);
//! assert!(verify_jacobi_identity(&engine, &tt, &tt, &tt).unwrap());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use vertex_core as core;
pub use vertex_integers as integers;
pub use vertex_ope as ope;
pub use vertex_poly as poly;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use num_traits::Zero;
    pub use vertex_core::{
        delta, normal_order, BasisOperator, DerivativeOperator, LocalOperator, NormalOrderedOperator, OpeData,
        OpeError, OpeResult, Operator, Parity,
    };
    pub use vertex_integers::Rational;
    pub use vertex_ope::{
        anticommutator, check_jacobi_identity, commutator, commute_ope, verify_jacobi_identity, EngineOptions,
        JacobiGrid, OpeEngine, OpeRegistry,
    };
    pub use vertex_poly::{Scalar, Symbol};
}
