//! Reordering normal-ordered products into registry order.
//!
//! Normal ordering is not commutative. For fields A and B with exchange
//! sign s, quasi-commutativity gives
//!
//! NO(B, A) = s NO(A, B) + Σ_{n≥1} (-1)^(n+1) / n! ∂^n [BA]_n
//!
//! so every product of two fields (basis fields or their derivatives) can
//! be written with the earlier-registered field on the left, at the price
//! of derivative terms read off OPE(B, A). Fields of the same base are
//! ordered by derivative order.

use log::trace;
use num_traits::Zero;
use std::cmp::Ordering;

use vertex_core::{normal_order, BasisOperator, LocalOperator, OpeData, OpeResult, Operator, Parity};
use vertex_integers::{factorial, sign_power};

use crate::engine::OpeEngine;

/// The base field and derivative order of a basis or derivative operator.
fn field_key(op: &Operator) -> Option<(&BasisOperator, u32)> {
    match op {
        Operator::Basis(x) => Some((x, 0)),
        Operator::Derivative(d) => Some((d.base(), d.order())),
        Operator::Identity | Operator::NormalOrdered(_) => None,
    }
}

impl OpeEngine<'_> {
    /// Compares two fields by registration order, then derivative order.
    ///
    /// Returns `None` unless both are basis fields or derivatives of one.
    #[must_use]
    pub fn compare_fields(&self, a: &Operator, b: &Operator) -> Option<Ordering> {
        let (xa, na) = field_key(a)?;
        let (xb, nb) = field_key(b)?;
        Some(self.registry().compare_operators(xa, xb).then(na.cmp(&nb)))
    }

    /// Rewrites `x` so that every product of two fields is in registry
    /// order.
    ///
    /// Products nested inside other products are simplified first and the
    /// result is rebuilt bilinearly. Correction terms are simplified in
    /// turn.
    ///
    /// # Errors
    ///
    /// Fails like [`ope`](Self::ope) when an exchange needs an OPE the
    /// engine cannot compute.
    pub fn simplify(&self, x: &LocalOperator) -> OpeResult<LocalOperator> {
        let mut out = LocalOperator::zero();
        for (op, coeff) in x.terms() {
            out = out + self.simplify_operator(op)?.scale(coeff);
        }
        Ok(out)
    }

    /// Simplifies every pole coefficient of `ope`.
    ///
    /// # Errors
    ///
    /// Fails like [`simplify`](Self::simplify).
    pub fn simplify_ope(&self, ope: &OpeData) -> OpeResult<OpeData> {
        let mut out = OpeData::new();
        for (n, coeff) in ope.poles() {
            out.add_to_pole(n, self.simplify(coeff)?)?;
        }
        Ok(out)
    }

    /// Computes NO(a, b) with the factors put in registry order.
    ///
    /// # Errors
    ///
    /// Fails like [`simplify`](Self::simplify).
    pub fn canonical_normal_order(&self, a: &LocalOperator, b: &LocalOperator) -> OpeResult<LocalOperator> {
        self.simplify(&normal_order(a, b))
    }

    /// Computes NO(a, b) - NO(b, a) in registry order.
    ///
    /// # Errors
    ///
    /// Fails like [`simplify`](Self::simplify).
    pub fn commutator(&self, a: &LocalOperator, b: &LocalOperator) -> OpeResult<LocalOperator> {
        self.simplify(&crate::bracket::commutator(a, b))
    }

    /// Computes NO(a, b) + NO(b, a) in registry order.
    ///
    /// # Errors
    ///
    /// Fails like [`simplify`](Self::simplify).
    pub fn anticommutator(&self, a: &LocalOperator, b: &LocalOperator) -> OpeResult<LocalOperator> {
        self.simplify(&crate::bracket::anticommutator(a, b))
    }

    fn simplify_operator(&self, op: &Operator) -> OpeResult<LocalOperator> {
        let Operator::NormalOrdered(no) = op else {
            return Ok(LocalOperator::from_operator(op.clone()));
        };

        let left = self.simplify_operator(no.left())?;
        let right = self.simplify_operator(no.right())?;

        let mut out = LocalOperator::zero();
        for (l, cl) in left.terms() {
            for (r, cr) in right.terms() {
                out = out + self.order_pair(l, r)?.scale(&(cl * cr));
            }
        }
        Ok(out)
    }

    fn order_pair(&self, b: &Operator, a: &Operator) -> OpeResult<LocalOperator> {
        let lhs = LocalOperator::from_operator(b.clone());
        let rhs = LocalOperator::from_operator(a.clone());
        if self.compare_fields(b, a) != Some(Ordering::Greater) {
            return Ok(normal_order(&lhs, &rhs));
        }

        trace!("reordering NO({b}, {a})");
        let sign = Parity::swap_sign(a.parity(), b.parity());
        let swapped = normal_order(&rhs, &lhs).scale_rational(&sign);

        let ba = self.ope_operators(b, a)?;
        let mut correction = LocalOperator::zero();
        for (n, coeff) in ba.poles() {
            let weight = &sign_power(n + 1) / &factorial(n);
            correction = correction + coeff.derivative(n).scale_rational(&weight);
        }
        Ok(swapped + self.simplify(&correction)?)
    }
}
