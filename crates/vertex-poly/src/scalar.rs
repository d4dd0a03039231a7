//! Sparse polynomial coefficients.
//!
//! A `Scalar` is a polynomial with rational coefficients in a set of named
//! parameters. It is the coefficient ring of every linear combination of
//! local operators.

use num_traits::{One, Zero};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use vertex_integers::Rational;

use crate::monomial::Monomial;
use crate::symbol::Symbol;

/// A sparse multivariate polynomial over the rationals.
///
/// Terms are stored as (monomial, coefficient) pairs in a sorted map with
/// no zero coefficients, so every value has exactly one representation.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Scalar {
    terms: BTreeMap<Monomial, Rational>,
}

impl Scalar {
    /// Creates a constant polynomial.
    #[must_use]
    pub fn constant(c: Rational) -> Self {
        let mut terms = BTreeMap::new();
        if !c.is_zero() {
            terms.insert(Monomial::one(), c);
        }
        Self { terms }
    }

    /// Creates the rational constant `num/den`.
    ///
    /// # Panics
    ///
    /// Panics if the denominator is zero.
    #[must_use]
    pub fn ratio(num: i64, den: i64) -> Self {
        Self::constant(Rational::from_i64(num, den))
    }

    /// Creates the polynomial consisting of a single parameter.
    #[must_use]
    pub fn symbol(symbol: &Symbol) -> Self {
        Self::term(Monomial::var(symbol.clone()), Rational::one())
    }

    /// Creates a parameter from its name.
    #[must_use]
    pub fn var(name: &str) -> Self {
        Self::symbol(&Symbol::new(name))
    }

    /// Creates a single term `coeff * monomial`.
    #[must_use]
    pub fn term(monomial: Monomial, coeff: Rational) -> Self {
        let mut terms = BTreeMap::new();
        if !coeff.is_zero() {
            terms.insert(monomial, coeff);
        }
        Self { terms }
    }

    /// Returns the number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if there are no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns the terms in monomial order.
    pub fn terms(&self) -> impl Iterator<Item = (&Monomial, &Rational)> {
        self.terms.iter()
    }

    /// Returns true if no parameter occurs.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.terms.keys().all(Monomial::is_one)
    }

    /// Returns the value of a constant polynomial.
    #[must_use]
    pub fn as_rational(&self) -> Option<Rational> {
        if self.is_constant() {
            Some(self.terms.values().next().cloned().unwrap_or_else(Rational::zero))
        } else {
            None
        }
    }

    /// Returns the parameters occurring in this polynomial, in order.
    #[must_use]
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut out: Vec<Symbol> = self
            .terms
            .keys()
            .flat_map(|m| m.factors().map(|(s, _)| s.clone()))
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// Computes the total degree (0 for the zero polynomial).
    #[must_use]
    pub fn total_degree(&self) -> u32 {
        self.terms.keys().map(Monomial::total_degree).max().unwrap_or(0)
    }

    fn accumulate(terms: &mut BTreeMap<Monomial, Rational>, m: Monomial, c: Rational) {
        if c.is_zero() {
            return;
        }
        match terms.entry(m) {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(c);
            }
            std::collections::btree_map::Entry::Occupied(mut slot) => {
                let sum = slot.get().clone() + c;
                if sum.is_zero() {
                    slot.remove();
                } else {
                    *slot.get_mut() = sum;
                }
            }
        }
    }

    /// Multiplies by a rational constant.
    #[must_use]
    pub fn scale(&self, c: &Rational) -> Self {
        if c.is_zero() {
            return Self::zero();
        }

        Self {
            terms: self.terms.iter().map(|(m, x)| (m.clone(), x * c)).collect(),
        }
    }

    /// Computes self^n.
    #[must_use]
    pub fn pow(&self, n: u32) -> Self {
        let mut result = Self::one();
        let mut base = self.clone();
        let mut exp = n;

        while exp > 0 {
            if exp & 1 == 1 {
                result = &result * &base;
            }
            base = &base * &base;
            exp >>= 1;
        }

        result
    }

    /// Differentiates with respect to a parameter.
    #[must_use]
    pub fn derivative(&self, symbol: &Symbol) -> Self {
        let mut terms = BTreeMap::new();
        for (m, c) in &self.terms {
            if let Some((exp, reduced)) = m.derivative(symbol) {
                Self::accumulate(&mut terms, reduced, c * &Rational::from(exp));
            }
        }
        Self { terms }
    }

    /// Substitutes a polynomial for a parameter.
    #[must_use]
    pub fn substitute(&self, symbol: &Symbol, value: &Scalar) -> Self {
        let mut result = Self::zero();
        for (m, c) in &self.terms {
            let (exp, rest) = m.split(symbol);
            let term = Self::term(rest, c.clone());
            result = result + if exp == 0 { term } else { &term * &value.pow(exp) };
        }
        result
    }

    /// Evaluates the polynomial once every parameter is bound.
    ///
    /// Returns `None` if some occurring parameter has no binding.
    #[must_use]
    pub fn evaluate(&self, bindings: &[(Symbol, Rational)]) -> Option<Rational> {
        let mut acc = Rational::zero();
        for (m, c) in &self.terms {
            let mut value = c.clone();
            for (s, e) in m.factors() {
                let (_, x) = bindings.iter().find(|(b, _)| b == s)?;
                value = value * x.pow(e);
            }
            acc = acc + value;
        }
        Some(acc)
    }
}

impl Zero for Scalar {
    fn zero() -> Self {
        Self { terms: BTreeMap::new() }
    }

    fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }
}

impl One for Scalar {
    fn one() -> Self {
        Self::constant(Rational::one())
    }

    fn is_one(&self) -> bool {
        self.terms.len() == 1
            && self.terms.get(&Monomial::one()).is_some_and(One::is_one)
    }
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scalar({self})")
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }

        for (i, (m, c)) in self.terms.iter().enumerate() {
            let negative = c.is_negative();
            let magnitude = c.abs();

            if i == 0 {
                if negative {
                    f.write_str("-")?;
                }
            } else if negative {
                f.write_str(" - ")?;
            } else {
                f.write_str(" + ")?;
            }

            if m.is_one() {
                write!(f, "{magnitude}")?;
            } else if magnitude.is_one() {
                write!(f, "{m}")?;
            } else if magnitude.is_integer() {
                write!(f, "{magnitude}*{m}")?;
            } else if magnitude.recip().is_integer() {
                write!(f, "{m}/{}", magnitude.denominator())?;
            } else {
                // 2/3*c reads better as 2*c/3
                write!(f, "{}*{m}/{}", magnitude.numerator(), magnitude.denominator())?;
            }
        }
        Ok(())
    }
}

impl Add for &Scalar {
    type Output = Scalar;

    fn add(self, rhs: Self) -> Self::Output {
        let mut terms = self.terms.clone();
        for (m, c) in &rhs.terms {
            Scalar::accumulate(&mut terms, m.clone(), c.clone());
        }
        Scalar { terms }
    }
}

impl Add for Scalar {
    type Output = Scalar;

    fn add(mut self, rhs: Self) -> Self::Output {
        for (m, c) in rhs.terms {
            Scalar::accumulate(&mut self.terms, m, c);
        }
        self
    }
}

impl Sub for &Scalar {
    type Output = Scalar;

    fn sub(self, rhs: Self) -> Self::Output {
        self + &(-rhs)
    }
}

impl Sub for Scalar {
    type Output = Scalar;

    fn sub(self, rhs: Self) -> Self::Output {
        self + (-rhs)
    }
}

impl Mul for &Scalar {
    type Output = Scalar;

    fn mul(self, rhs: Self) -> Self::Output {
        let mut terms = BTreeMap::new();
        for (m1, c1) in &self.terms {
            for (m2, c2) in &rhs.terms {
                Scalar::accumulate(&mut terms, m1.mul(m2), c1 * c2);
            }
        }
        Scalar { terms }
    }
}

impl Mul for Scalar {
    type Output = Scalar;

    fn mul(self, rhs: Self) -> Self::Output {
        &self * &rhs
    }
}

impl Div<&Rational> for &Scalar {
    type Output = Scalar;

    /// # Panics
    ///
    /// Panics if the divisor is zero.
    fn div(self, rhs: &Rational) -> Self::Output {
        self.scale(&rhs.recip())
    }
}

impl Div<Rational> for Scalar {
    type Output = Scalar;

    fn div(self, rhs: Rational) -> Self::Output {
        &self / &rhs
    }
}

impl Neg for &Scalar {
    type Output = Scalar;

    fn neg(self) -> Self::Output {
        Scalar {
            terms: self.terms.iter().map(|(m, c)| (m.clone(), -c)).collect(),
        }
    }
}

impl Neg for Scalar {
    type Output = Scalar;

    fn neg(self) -> Self::Output {
        Scalar {
            terms: self.terms.into_iter().map(|(m, c)| (m, -c)).collect(),
        }
    }
}

impl From<Rational> for Scalar {
    fn from(c: Rational) -> Self {
        Self::constant(c)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Self::constant(Rational::from(n))
    }
}

impl From<i32> for Scalar {
    fn from(n: i32) -> Self {
        Self::constant(Rational::from(n))
    }
}

impl From<&Symbol> for Scalar {
    fn from(symbol: &Symbol) -> Self {
        Self::symbol(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c() -> Scalar {
        Scalar::var("c")
    }

    fn k() -> Scalar {
        Scalar::var("k")
    }

    #[test]
    fn test_cancellation() {
        // (c/2) + (c/2) - c = 0
        let half_c = c() / Rational::from_i64(2, 1);
        let sum = &(&half_c + &half_c) - &c();
        assert!(sum.is_zero());
    }

    #[test]
    fn test_expansion() {
        // (c + k)^2 - c^2 - k^2 = 2ck
        let ck = &c() + &k();
        let lhs = &(&ck.pow(2) - &c().pow(2)) - &k().pow(2);
        let rhs = Scalar::from(2) * c() * k();
        assert_eq!(lhs, rhs);
        assert_eq!(lhs.total_degree(), 2);
    }

    #[test]
    fn test_constants() {
        let x = Scalar::ratio(3, 2);
        assert!(x.is_constant());
        assert_eq!(x.as_rational(), Some(Rational::from_i64(3, 2)));
        assert_eq!(Scalar::zero().as_rational(), Some(Rational::zero()));
        assert_eq!(c().as_rational(), None);
        assert!(Scalar::one().is_one());
        assert!(!c().is_one());
    }

    #[test]
    fn test_derivative() {
        // d/dc (c^3/3 + 2ck + 5) = c^2 + 2k
        let c_sym = Symbol::new("c");
        let p = &(&(c().pow(3) / Rational::from(3)) + &(Scalar::from(2) * c() * k())) + &Scalar::from(5);
        let dp = p.derivative(&c_sym);
        assert_eq!(dp, &c().pow(2) + &(Scalar::from(2) * k()));
        assert!(Scalar::from(7).derivative(&c_sym).is_zero());
    }

    #[test]
    fn test_substitute_and_evaluate() {
        let c_sym = Symbol::new("c");
        // c^2 + c with c -> k + 1 gives k^2 + 3k + 2
        let p = &c().pow(2) + &c();
        let q = p.substitute(&c_sym, &(&k() + &Scalar::one()));
        let expected = &(&k().pow(2) + &(Scalar::from(3) * k())) + &Scalar::from(2);
        assert_eq!(q, expected);

        let k_sym = Symbol::new("k");
        assert_eq!(q.evaluate(&[(k_sym, Rational::from(2))]), Some(Rational::from(12)));
        assert_eq!(q.evaluate(&[]), None);
    }

    #[test]
    fn test_symbols() {
        let p = &(c() * k()) + &c();
        assert_eq!(p.symbols(), vec![Symbol::new("c"), Symbol::new("k")]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Scalar::zero().to_string(), "0");
        assert_eq!(Scalar::ratio(-3, 2).to_string(), "-3/2");
        assert_eq!((c() / Rational::from(2)).to_string(), "c/2");
        assert_eq!((Scalar::ratio(2, 3) * c()).to_string(), "2*c/3");
        assert_eq!((&Scalar::from(1) - &c()).to_string(), "1 - c");
    }
}
