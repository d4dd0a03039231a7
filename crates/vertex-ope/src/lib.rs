//! # vertex-ope
//!
//! The recursive OPE engine.
//!
//! Given a small set of declared OPEs between primitive fields, this crate
//! computes the OPE of any pair of composite operators built from them:
//! derivatives, normal-ordered products and linear combinations. It
//! provides:
//! - The declaration context (`OpeRegistry`)
//! - The engine (`OpeEngine`) with its options (`EngineOptions`) and
//!   memoization (`OpeCache`)
//! - The commutation formula as a pure function (`commute_ope`)
//! - Mode brackets (`bracket`, `commutator`, `anticommutator`)
//! - Reordering of normal-ordered products into registry order
//!   (`OpeEngine::simplify`)
//! - The Jacobi identity check (`check_jacobi_identity`)
//!
//! ## Example
//!
//! ```
//! use vertex_core::{BasisOperator, LocalOperator, OpeData};
//! use vertex_ope::{OpeEngine, OpeRegistry};
//! use vertex_poly::Scalar;
//!
//! let j = BasisOperator::bosonic("J");
//! let mut registry = OpeRegistry::new();
//! registry.bosonic(&[j.clone()]).unwrap();
//! registry
//!     .define(&j, &j, OpeData::from_list([LocalOperator::scalar(Scalar::var("k")), LocalOperator::from(0)]))
//!     .unwrap();
//!
//! let engine = OpeEngine::new(&registry);
//! let ope = engine.ope(&j.clone().into(), &j.into()).unwrap();
//! assert_eq!(ope.max_pole(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bracket;
pub mod cache;
pub mod commutation;
pub mod engine;
pub mod jacobi;
pub mod options;
pub mod registry;
pub mod simplify;

#[cfg(test)]
mod proptests;

pub use bracket::{anticommutator, commutator};
pub use cache::{CacheStats, OpeCache};
pub use commutation::commute_ope;
pub use engine::OpeEngine;
pub use jacobi::{check_jacobi_identity, verify_jacobi_identity, JacobiGrid};
pub use options::EngineOptions;
pub use registry::OpeRegistry;
