//! Monomials over named parameters.
//!
//! A monomial is stored as a list of (symbol, exponent) pairs sorted by
//! symbol, with every exponent strictly positive. Algebras rarely carry
//! more than two parameters, so the list lives inline.

use smallvec::SmallVec;
use std::fmt;

use crate::symbol::Symbol;

/// A product of parameter powers, e.g. `c^2*k`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Monomial(SmallVec<[(Symbol, u32); 2]>);

impl Monomial {
    /// Creates the monomial 1 (all exponents zero).
    #[must_use]
    pub fn one() -> Self {
        Self(SmallVec::new())
    }

    /// Creates the monomial consisting of a single parameter.
    #[must_use]
    pub fn var(symbol: Symbol) -> Self {
        let mut factors = SmallVec::new();
        factors.push((symbol, 1));
        Self(factors)
    }

    /// Creates a monomial from (symbol, exponent) pairs.
    ///
    /// Repeated symbols are combined and zero exponents dropped.
    #[must_use]
    pub fn from_factors(factors: impl IntoIterator<Item = (Symbol, u32)>) -> Self {
        factors
            .into_iter()
            .fold(Self::one(), |acc, (s, e)| acc.mul(&Self::power(s, e)))
    }

    fn power(symbol: Symbol, exp: u32) -> Self {
        if exp == 0 {
            Self::one()
        } else {
            let mut factors = SmallVec::new();
            factors.push((symbol, exp));
            Self(factors)
        }
    }

    /// Returns true if this is the monomial 1.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the exponent of the given symbol.
    #[must_use]
    pub fn exponent(&self, symbol: &Symbol) -> u32 {
        self.0
            .binary_search_by(|(s, _)| s.cmp(symbol))
            .map_or(0, |i| self.0[i].1)
    }

    /// Returns the (symbol, exponent) pairs in symbol order.
    pub fn factors(&self) -> impl Iterator<Item = (&Symbol, u32)> {
        self.0.iter().map(|(s, e)| (s, *e))
    }

    /// Computes the total degree.
    #[must_use]
    pub fn total_degree(&self) -> u32 {
        self.0.iter().map(|(_, e)| e).sum()
    }

    /// Multiplies two monomials (adds exponents).
    #[must_use]
    pub fn mul(&self, other: &Self) -> Self {
        let mut out: SmallVec<[(Symbol, u32); 2]> = SmallVec::with_capacity(self.0.len() + other.0.len());
        let (mut i, mut j) = (0, 0);

        // Merge of two sorted lists
        while i < self.0.len() && j < other.0.len() {
            let (a, ea) = &self.0[i];
            let (b, eb) = &other.0[j];
            match a.cmp(b) {
                std::cmp::Ordering::Less => {
                    out.push((a.clone(), *ea));
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    out.push((b.clone(), *eb));
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    out.push((a.clone(), ea + eb));
                    i += 1;
                    j += 1;
                }
            }
        }
        out.extend(self.0[i..].iter().cloned());
        out.extend(other.0[j..].iter().cloned());

        Self(out)
    }

    /// Differentiates with respect to a parameter.
    ///
    /// Returns the exponent that comes down and the reduced monomial, or
    /// `None` if the parameter does not occur.
    #[must_use]
    pub fn derivative(&self, symbol: &Symbol) -> Option<(u32, Self)> {
        let i = self.0.binary_search_by(|(s, _)| s.cmp(symbol)).ok()?;
        let exp = self.0[i].1;
        let mut reduced = self.0.clone();
        if exp == 1 {
            reduced.remove(i);
        } else {
            reduced[i].1 = exp - 1;
        }
        Some((exp, Self(reduced)))
    }

    /// Splits off the power of a parameter.
    ///
    /// Returns the exponent of `symbol` and the monomial with that factor
    /// removed.
    #[must_use]
    pub fn split(&self, symbol: &Symbol) -> (u32, Self) {
        match self.0.binary_search_by(|(s, _)| s.cmp(symbol)) {
            Ok(i) => {
                let mut rest = self.0.clone();
                let (_, exp) = rest.remove(i);
                (exp, Self(rest))
            }
            Err(_) => (0, self.clone()),
        }
    }
}

impl fmt::Debug for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Monomial({self})")
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_one() {
            return f.write_str("1");
        }

        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(s, e)| if *e == 1 { s.to_string() } else { format!("{s}^{e}") })
            .collect();
        f.write_str(&parts.join("*"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c() -> Symbol {
        Symbol::new("c")
    }

    fn k() -> Symbol {
        Symbol::new("k")
    }

    #[test]
    fn test_mul() {
        let ck = Monomial::var(c()).mul(&Monomial::var(k()));
        assert_eq!(ck.exponent(&c()), 1);
        assert_eq!(ck.exponent(&k()), 1);

        let c2k = ck.mul(&Monomial::var(c()));
        assert_eq!(c2k.exponent(&c()), 2);
        assert_eq!(c2k.total_degree(), 3);

        // Factor order does not matter
        let kc = Monomial::var(k()).mul(&Monomial::var(c()));
        assert_eq!(ck, kc);
    }

    #[test]
    fn test_from_factors() {
        let m = Monomial::from_factors([(k(), 1), (c(), 2), (k(), 0), (c(), 1)]);
        assert_eq!(m.exponent(&c()), 3);
        assert_eq!(m.exponent(&k()), 1);
        assert_eq!(m.to_string(), "c^3*k");
    }

    #[test]
    fn test_derivative() {
        let m = Monomial::from_factors([(c(), 3), (k(), 1)]);
        let (e, dm) = m.derivative(&c()).unwrap();
        assert_eq!(e, 3);
        assert_eq!(dm, Monomial::from_factors([(c(), 2), (k(), 1)]));

        let (e, dm) = m.derivative(&k()).unwrap();
        assert_eq!(e, 1);
        assert_eq!(dm, Monomial::from_factors([(c(), 3)]));

        assert!(Monomial::one().derivative(&c()).is_none());
    }

    #[test]
    fn test_split() {
        let m = Monomial::from_factors([(c(), 2), (k(), 1)]);
        assert_eq!(m.split(&c()), (2, Monomial::var(k())));
        assert_eq!(m.split(&Symbol::new("h")), (0, m.clone()));
    }
}
