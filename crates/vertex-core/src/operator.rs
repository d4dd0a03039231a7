//! The operator sum type.
//!
//! An [`Operator`] is a single field: the unit operator, a primitive field,
//! a derivative of a primitive field, or a normal-ordered product of two
//! operators. Linear combinations live one level up, in
//! [`LocalOperator`](crate::LocalOperator).

use num_traits::{One, Zero};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use vertex_integers::Rational;
use vertex_poly::Scalar;

use crate::error::{OpeError, OpeResult};
use crate::parity::Parity;

/// A named primitive field.
///
/// Identity is by (name, parity, indices). The conformal weight is carried
/// along for downstream consumers but takes no part in equality, hashing or
/// ordering.
#[derive(Clone, Debug)]
pub struct BasisOperator {
    name: Arc<str>,
    parity: Parity,
    indices: SmallVec<[i64; 2]>,
    weight: Option<Rational>,
}

impl BasisOperator {
    /// Creates a primitive field with the given statistics.
    #[must_use]
    pub fn new(name: &str, parity: Parity) -> Self {
        Self {
            name: Arc::from(name),
            parity,
            indices: SmallVec::new(),
            weight: None,
        }
    }

    /// Creates a bosonic primitive field.
    #[must_use]
    pub fn bosonic(name: &str) -> Self {
        Self::new(name, Parity::Even)
    }

    /// Creates a fermionic primitive field.
    #[must_use]
    pub fn fermionic(name: &str) -> Self {
        Self::new(name, Parity::Odd)
    }

    /// Sets the conformal weight.
    #[must_use]
    pub fn with_weight(mut self, weight: Rational) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Replaces the index tuple, producing a member of an indexed family.
    ///
    /// Members of a family share the base name and differ by indices.
    #[must_use]
    pub fn indexed(&self, indices: impl IntoIterator<Item = i64>) -> Self {
        Self {
            indices: indices.into_iter().collect(),
            ..self.clone()
        }
    }

    /// Appends a single index.
    #[must_use]
    pub fn index(&self, i: i64) -> Self {
        let mut out = self.clone();
        out.indices.push(i);
        out
    }

    /// Returns the base name shared by every member of the family.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the statistics.
    #[must_use]
    pub fn parity(&self) -> Parity {
        self.parity
    }

    /// Returns the index tuple (empty for an unindexed field).
    #[must_use]
    pub fn indices(&self) -> &[i64] {
        &self.indices
    }

    /// Returns the conformal weight, if one was given.
    #[must_use]
    pub fn weight(&self) -> Option<&Rational> {
        self.weight.as_ref()
    }

    fn key(&self) -> (&str, Parity, &[i64]) {
        (&self.name, self.parity, &self.indices)
    }
}

impl PartialEq for BasisOperator {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for BasisOperator {}

impl Hash for BasisOperator {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for BasisOperator {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BasisOperator {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for BasisOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.indices.is_empty() {
            f.write_str("[")?;
            for (i, idx) in self.indices.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{idx}")?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

/// The n-th derivative of a primitive field.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DerivativeOperator {
    base: BasisOperator,
    order: u32,
}

impl DerivativeOperator {
    /// Creates ∂^order of a primitive field.
    ///
    /// # Errors
    ///
    /// Returns `OpeError::InvalidDerivativeOrder` if `order` is zero.
    pub fn new(base: BasisOperator, order: u32) -> OpeResult<Self> {
        if order == 0 {
            return Err(OpeError::InvalidDerivativeOrder(order));
        }
        Ok(Self { base, order })
    }

    /// Creates ∂^order for an order already known to be positive.
    pub(crate) fn of(base: BasisOperator, order: u32) -> Self {
        debug_assert!(order > 0);
        Self { base, order }
    }

    /// Returns the differentiated field.
    #[must_use]
    pub fn base(&self) -> &BasisOperator {
        &self.base
    }

    /// Returns the derivative order (at least 1).
    #[must_use]
    pub fn order(&self) -> u32 {
        self.order
    }

    /// Returns the statistics, which derivatives preserve.
    #[must_use]
    pub fn parity(&self) -> Parity {
        self.base.parity()
    }

    /// Returns the base weight plus the order.
    #[must_use]
    pub fn weight(&self) -> Option<Rational> {
        self.base.weight().map(|w| w + &Rational::from(self.order))
    }

    /// Adds to the derivative order.
    #[must_use]
    pub(crate) fn raised(&self, by: u32) -> Self {
        Self {
            base: self.base.clone(),
            order: self.order + by,
        }
    }
}

impl fmt::Display for DerivativeOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.order == 1 {
            write!(f, "∂{}", self.base)
        } else {
            write!(f, "∂^{}{}", self.order, self.base)
        }
    }
}

/// The normal-ordered product NO(left, right).
///
/// The pair is ordered: NO(A, B) and NO(B, A) are different values.
/// [`normal_order`](crate::normal_order) is the canonical constructor; it
/// drops unit factors, which this raw constructor keeps.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalOrderedOperator {
    left: Arc<Operator>,
    right: Arc<Operator>,
}

impl NormalOrderedOperator {
    /// Creates NO(left, right) without simplification.
    #[must_use]
    pub fn new(left: Operator, right: Operator) -> Self {
        Self {
            left: Arc::new(left),
            right: Arc::new(right),
        }
    }

    /// Returns the left factor.
    #[must_use]
    pub fn left(&self) -> &Operator {
        &self.left
    }

    /// Returns the right factor.
    #[must_use]
    pub fn right(&self) -> &Operator {
        &self.right
    }

    /// Returns the sum of the factors' parities.
    #[must_use]
    pub fn parity(&self) -> Parity {
        self.left.parity() + self.right.parity()
    }

    /// Returns the sum of the factors' weights.
    #[must_use]
    pub fn weight(&self) -> Option<Rational> {
        Some(self.left.weight()? + self.right.weight()?)
    }
}

impl fmt::Display for NormalOrderedOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NO({}, {})", self.left, self.right)
    }
}

/// A single field.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operator {
    /// The unit operator `1`.
    Identity,
    /// A primitive field.
    Basis(BasisOperator),
    /// A derivative of a primitive field.
    Derivative(DerivativeOperator),
    /// A normal-ordered product.
    NormalOrdered(NormalOrderedOperator),
}

impl Operator {
    /// Returns the statistics of this field.
    #[must_use]
    pub fn parity(&self) -> Parity {
        match self {
            Operator::Identity => Parity::Even,
            Operator::Basis(b) => b.parity(),
            Operator::Derivative(d) => d.parity(),
            Operator::NormalOrdered(no) => no.parity(),
        }
    }

    /// Returns the conformal weight, if every primitive involved has one.
    #[must_use]
    pub fn weight(&self) -> Option<Rational> {
        match self {
            Operator::Identity => Some(Rational::zero()),
            Operator::Basis(b) => b.weight().cloned(),
            Operator::Derivative(d) => d.weight(),
            Operator::NormalOrdered(no) => no.weight(),
        }
    }

    /// Returns true for the unit operator.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        matches!(self, Operator::Identity)
    }

    /// Returns the primitive field, if this is one.
    #[must_use]
    pub fn as_basis(&self) -> Option<&BasisOperator> {
        match self {
            Operator::Basis(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the nesting depth of normal-ordered products.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Operator::NormalOrdered(no) => 1 + no.left().depth().max(no.right().depth()),
            _ => 0,
        }
    }
}

impl From<BasisOperator> for Operator {
    fn from(b: BasisOperator) -> Self {
        Operator::Basis(b)
    }
}

impl From<DerivativeOperator> for Operator {
    fn from(d: DerivativeOperator) -> Self {
        Operator::Derivative(d)
    }
}

impl From<NormalOrderedOperator> for Operator {
    fn from(no: NormalOrderedOperator) -> Self {
        Operator::NormalOrdered(no)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Identity => f.write_str("1"),
            Operator::Basis(b) => write!(f, "{b}"),
            Operator::Derivative(d) => write!(f, "{d}"),
            Operator::NormalOrdered(no) => write!(f, "{no}"),
        }
    }
}

/// The Kronecker delta as a coefficient.
#[must_use]
pub fn delta(i: i64, j: i64) -> Scalar {
    if i == j {
        Scalar::one()
    } else {
        Scalar::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_ignores_weight() {
        let t1 = BasisOperator::bosonic("T").with_weight(Rational::from(2));
        let t2 = BasisOperator::bosonic("T");
        assert_eq!(t1, t2);
        assert_ne!(t2, BasisOperator::fermionic("T"));
    }

    #[test]
    fn test_indexed_family() {
        let j = BasisOperator::bosonic("J");
        let j1 = j.index(1);
        let j12 = j.indexed([1, 2]);
        assert_eq!(j1.name(), "J");
        assert_eq!(j1.indices(), &[1]);
        assert_ne!(j1, j);
        assert_eq!(j12.to_string(), "J[1,2]");
        assert_eq!(j12, j1.index(2));
    }

    #[test]
    fn test_derivative_order() {
        let t = BasisOperator::bosonic("T").with_weight(Rational::from(2));
        assert_eq!(
            DerivativeOperator::new(t.clone(), 0),
            Err(OpeError::InvalidDerivativeOrder(0))
        );
        let d = DerivativeOperator::new(t, 3).unwrap();
        assert_eq!(d.order(), 3);
        assert_eq!(d.weight(), Some(Rational::from(5)));
        assert_eq!(d.to_string(), "∂^3T");
        assert_eq!(d.raised(1).order(), 4);
    }

    #[test]
    fn test_normal_ordered() {
        let g = Operator::from(BasisOperator::fermionic("G").with_weight(Rational::from_i64(3, 2)));
        let t = Operator::from(BasisOperator::bosonic("T").with_weight(Rational::from(2)));
        let no = NormalOrderedOperator::new(g.clone(), t.clone());
        assert_eq!(no.parity(), Parity::Odd);
        assert_eq!(no.weight(), Some(Rational::from_i64(7, 2)));
        assert_ne!(no, NormalOrderedOperator::new(t, g));
        assert_eq!(no.to_string(), "NO(G, T)");
        assert_eq!(Operator::from(no).depth(), 1);
    }

    #[test]
    fn test_unknown_weight() {
        let a = Operator::from(BasisOperator::bosonic("a"));
        assert_eq!(a.weight(), None);
        assert_eq!(Operator::Identity.weight(), Some(Rational::zero()));
        assert_eq!(Operator::Identity.parity(), Parity::Even);
    }

    #[test]
    fn test_delta() {
        assert!(delta(1, 1).is_one());
        assert!(delta(1, 2).is_zero());
    }
}
