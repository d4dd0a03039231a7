//! Linear combinations of operators.
//!
//! A [`LocalOperator`] is a finite sum Σ cᵢ·Oᵢ of distinct [`Operator`]s
//! with non-zero [`Scalar`] coefficients. It is the value type the OPE
//! engine consumes and produces: pole coefficients, operands and normal
//! ordered products are all `LocalOperator`s.

use num_traits::{One, Zero};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use vertex_integers::{binomial, Rational};
use vertex_poly::{Scalar, Symbol};

use crate::error::{OpeError, OpeResult};
use crate::operator::{BasisOperator, DerivativeOperator, NormalOrderedOperator, Operator};
use crate::parity::Parity;

/// A linear combination of operators with polynomial coefficients.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct LocalOperator {
    terms: BTreeMap<Operator, Scalar>,
}

impl LocalOperator {
    /// Creates the combination consisting of a single operator.
    #[must_use]
    pub fn from_operator(op: Operator) -> Self {
        Self::term(op, Scalar::one())
    }

    /// Creates `coeff * op`.
    #[must_use]
    pub fn term(op: Operator, coeff: Scalar) -> Self {
        let mut terms = BTreeMap::new();
        if !coeff.is_zero() {
            terms.insert(op, coeff);
        }
        Self { terms }
    }

    /// Creates the unit operator.
    #[must_use]
    pub fn identity() -> Self {
        Self::from_operator(Operator::Identity)
    }

    /// Creates a multiple of the unit operator.
    #[must_use]
    pub fn scalar(c: Scalar) -> Self {
        Self::term(Operator::Identity, c)
    }

    /// Returns the number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true for the zero combination.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the (operator, coefficient) pairs in operator order.
    pub fn terms(&self) -> impl Iterator<Item = (&Operator, &Scalar)> {
        self.terms.iter()
    }

    /// Returns the coefficient of an operator (zero if absent).
    #[must_use]
    pub fn coefficient(&self, op: &Operator) -> Scalar {
        self.terms.get(op).cloned().unwrap_or_else(Scalar::zero)
    }

    /// Returns the bare operator of a single term with unit coefficient.
    #[must_use]
    pub fn as_single(&self) -> Option<&Operator> {
        match self.terms.iter().next() {
            Some((op, c)) if self.terms.len() == 1 && c.is_one() => Some(op),
            _ => None,
        }
    }

    /// Returns the coefficient if this is a multiple of the unit operator.
    #[must_use]
    pub fn as_scalar(&self) -> Option<Scalar> {
        if self.is_zero() {
            return Some(Scalar::zero());
        }
        if self.terms.len() == 1 {
            self.terms.get(&Operator::Identity).cloned()
        } else {
            None
        }
    }

    fn accumulate(terms: &mut BTreeMap<Operator, Scalar>, op: Operator, c: Scalar) {
        if c.is_zero() {
            return;
        }
        match terms.entry(op) {
            Entry::Vacant(slot) => {
                slot.insert(c);
            }
            Entry::Occupied(mut slot) => {
                let sum = &*slot.get() + &c;
                if sum.is_zero() {
                    slot.remove();
                } else {
                    *slot.get_mut() = sum;
                }
            }
        }
    }

    /// Adds `coeff * op` in place.
    pub fn add_term(&mut self, op: Operator, coeff: Scalar) {
        Self::accumulate(&mut self.terms, op, coeff);
    }

    /// Multiplies every coefficient by a scalar.
    #[must_use]
    pub fn scale(&self, c: &Scalar) -> Self {
        let mut terms = BTreeMap::new();
        for (op, x) in &self.terms {
            Self::accumulate(&mut terms, op.clone(), x * c);
        }
        Self { terms }
    }

    /// Multiplies every coefficient by a rational constant.
    #[must_use]
    pub fn scale_rational(&self, c: &Rational) -> Self {
        if c.is_zero() {
            return Self::zero();
        }
        Self {
            terms: self.terms.iter().map(|(op, x)| (op.clone(), x.scale(c))).collect(),
        }
    }

    /// Substitutes a polynomial for a parameter in every coefficient.
    #[must_use]
    pub fn substitute(&self, symbol: &Symbol, value: &Scalar) -> Self {
        let mut terms = BTreeMap::new();
        for (op, x) in &self.terms {
            Self::accumulate(&mut terms, op.clone(), x.substitute(symbol, value));
        }
        Self { terms }
    }

    /// Computes ∂^order, with ∂^0 the identity map.
    #[must_use]
    pub fn derivative(&self, order: u32) -> Self {
        if order == 0 {
            return self.clone();
        }
        let mut out = Self::zero();
        for (op, c) in &self.terms {
            out = out + op.derivative(order).scale(c);
        }
        out
    }

    /// Computes ∂^order, rejecting order zero.
    ///
    /// # Errors
    ///
    /// Returns `OpeError::InvalidDerivativeOrder` if `order` is zero.
    pub fn derivative_checked(&self, order: u32) -> OpeResult<Self> {
        if order == 0 {
            return Err(OpeError::InvalidDerivativeOrder(order));
        }
        Ok(self.derivative(order))
    }

    /// Computes NO(self, other).
    #[must_use]
    pub fn normal_order(&self, other: &Self) -> Self {
        normal_order(self, other)
    }

    /// Returns the common parity of the terms.
    ///
    /// The zero combination is bosonic.
    ///
    /// # Errors
    ///
    /// Returns `OpeError::MixedParity` if the terms disagree.
    pub fn parity(&self) -> OpeResult<Parity> {
        let mut parities = self.terms.keys().map(Operator::parity);
        let Some(first) = parities.next() else {
            return Ok(Parity::Even);
        };
        if parities.all(|p| p == first) {
            Ok(first)
        } else {
            Err(OpeError::MixedParity(self.to_string()))
        }
    }

    /// Returns the common conformal weight of the terms.
    ///
    /// `None` if some term has no weight or the terms disagree.
    #[must_use]
    pub fn weight(&self) -> Option<Rational> {
        let mut weights = self.terms.keys().map(Operator::weight);
        let first = weights.next()??;
        for w in weights {
            if w? != first {
                return None;
            }
        }
        Some(first)
    }
}

impl Operator {
    /// Computes ∂^order of a single operator.
    ///
    /// The unit operator differentiates to zero and derivatives of normal
    /// ordered products are expanded by the Leibniz rule, so the result is
    /// a combination in general.
    #[must_use]
    pub fn derivative(&self, order: u32) -> LocalOperator {
        if order == 0 {
            return LocalOperator::from_operator(self.clone());
        }
        match self {
            Operator::Identity => LocalOperator::zero(),
            Operator::Basis(b) => {
                LocalOperator::from_operator(Operator::Derivative(DerivativeOperator::of(b.clone(), order)))
            }
            Operator::Derivative(d) => LocalOperator::from_operator(Operator::Derivative(d.raised(order))),
            Operator::NormalOrdered(no) => {
                // ∂^n NO(A, B) = Σ_k C(n, k) NO(∂^k A, ∂^(n-k) B)
                let mut out = LocalOperator::zero();
                for k in 0..=order {
                    let left = no.left().derivative(k);
                    let right = no.right().derivative(order - k);
                    out = out + normal_order(&left, &right).scale_rational(&binomial(order, k));
                }
                out
            }
        }
    }
}

/// Computes the normal-ordered product NO(a, b).
///
/// The product is bilinear and the unit operator is its two-sided identity.
#[must_use]
pub fn normal_order(a: &LocalOperator, b: &LocalOperator) -> LocalOperator {
    let mut terms = BTreeMap::new();
    for (oa, ca) in &a.terms {
        for (ob, cb) in &b.terms {
            let op = match (oa, ob) {
                (Operator::Identity, _) => ob.clone(),
                (_, Operator::Identity) => oa.clone(),
                _ => Operator::NormalOrdered(NormalOrderedOperator::new(oa.clone(), ob.clone())),
            };
            LocalOperator::accumulate(&mut terms, op, ca * cb);
        }
    }
    LocalOperator { terms }
}

impl Zero for LocalOperator {
    fn zero() -> Self {
        Self { terms: BTreeMap::new() }
    }

    fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }
}

impl fmt::Debug for LocalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocalOperator({self})")
    }
}

impl fmt::Display for LocalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }

        for (i, (op, c)) in self.terms.iter().enumerate() {
            let negative = c.len() == 1 && c.terms().all(|(_, r)| r.is_negative());
            let coeff = if negative { -c } else { c.clone() };

            if i > 0 {
                f.write_str(if negative { " - " } else { " + " })?;
            } else if negative {
                f.write_str("-")?;
            }

            let compound = coeff.len() > 1;
            match (op, compound) {
                (Operator::Identity, false) => write!(f, "{coeff}")?,
                (Operator::Identity, true) => write!(f, "({coeff})")?,
                (_, _) if coeff.is_one() => write!(f, "{op}")?,
                (_, false) => write!(f, "{coeff}·{op}")?,
                (_, true) => write!(f, "({coeff})·{op}")?,
            }
        }
        Ok(())
    }
}

impl Add for LocalOperator {
    type Output = LocalOperator;

    fn add(mut self, rhs: Self) -> Self::Output {
        for (op, c) in rhs.terms {
            Self::accumulate(&mut self.terms, op, c);
        }
        self
    }
}

impl Add for &LocalOperator {
    type Output = LocalOperator;

    fn add(self, rhs: Self) -> Self::Output {
        self.clone() + rhs.clone()
    }
}

impl Sub for LocalOperator {
    type Output = LocalOperator;

    fn sub(self, rhs: Self) -> Self::Output {
        self + (-rhs)
    }
}

impl Sub for &LocalOperator {
    type Output = LocalOperator;

    fn sub(self, rhs: Self) -> Self::Output {
        self.clone() - rhs.clone()
    }
}

impl Neg for LocalOperator {
    type Output = LocalOperator;

    fn neg(self) -> Self::Output {
        Self {
            terms: self.terms.into_iter().map(|(op, c)| (op, -c)).collect(),
        }
    }
}

impl Neg for &LocalOperator {
    type Output = LocalOperator;

    fn neg(self) -> Self::Output {
        -self.clone()
    }
}

impl Mul<LocalOperator> for Scalar {
    type Output = LocalOperator;

    fn mul(self, rhs: LocalOperator) -> Self::Output {
        rhs.scale(&self)
    }
}

impl Mul<LocalOperator> for &Scalar {
    type Output = LocalOperator;

    fn mul(self, rhs: LocalOperator) -> Self::Output {
        rhs.scale(self)
    }
}

impl Mul<&LocalOperator> for &Scalar {
    type Output = LocalOperator;

    fn mul(self, rhs: &LocalOperator) -> Self::Output {
        rhs.scale(self)
    }
}

impl Mul<LocalOperator> for Rational {
    type Output = LocalOperator;

    fn mul(self, rhs: LocalOperator) -> Self::Output {
        rhs.scale_rational(&self)
    }
}

impl Mul<&LocalOperator> for &Rational {
    type Output = LocalOperator;

    fn mul(self, rhs: &LocalOperator) -> Self::Output {
        rhs.scale_rational(self)
    }
}

impl Mul<LocalOperator> for i64 {
    type Output = LocalOperator;

    fn mul(self, rhs: LocalOperator) -> Self::Output {
        rhs.scale_rational(&Rational::from(self))
    }
}

impl From<Operator> for LocalOperator {
    fn from(op: Operator) -> Self {
        Self::from_operator(op)
    }
}

impl From<BasisOperator> for LocalOperator {
    fn from(b: BasisOperator) -> Self {
        Self::from_operator(Operator::Basis(b))
    }
}

impl From<DerivativeOperator> for LocalOperator {
    fn from(d: DerivativeOperator) -> Self {
        Self::from_operator(Operator::Derivative(d))
    }
}

impl From<NormalOrderedOperator> for LocalOperator {
    fn from(no: NormalOrderedOperator) -> Self {
        Self::from_operator(Operator::NormalOrdered(no))
    }
}

impl From<Scalar> for LocalOperator {
    fn from(c: Scalar) -> Self {
        Self::scalar(c)
    }
}

impl From<Rational> for LocalOperator {
    fn from(c: Rational) -> Self {
        Self::scalar(Scalar::constant(c))
    }
}

impl From<i64> for LocalOperator {
    fn from(n: i64) -> Self {
        Self::scalar(Scalar::from(n))
    }
}

impl From<&BasisOperator> for LocalOperator {
    fn from(b: &BasisOperator) -> Self {
        Self::from(b.clone())
    }
}

impl From<&LocalOperator> for LocalOperator {
    fn from(op: &LocalOperator) -> Self {
        op.clone()
    }
}
