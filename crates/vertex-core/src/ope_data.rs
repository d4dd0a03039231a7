//! The singular part of an operator product.
//!
//! An OPE A(z)B(w) ~ Σ_{n≥1} [AB]_n / (z-w)^n is stored as a sparse map from
//! pole order n to the coefficient [AB]_n. Only positive orders are stored;
//! the regular part is not represented.

use num_traits::Zero;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Neg, Sub};

use vertex_integers::Rational;
use vertex_poly::{Scalar, Symbol};

use crate::error::{OpeError, OpeResult};
use crate::local::LocalOperator;

/// The pole terms of an OPE, keyed by pole order.
///
/// The map never holds a zero coefficient.
#[derive(Clone, Default)]
pub struct OpeData {
    poles: BTreeMap<u32, LocalOperator>,
}

impl OpeData {
    /// Creates the empty (fully regular) OPE.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an OPE from coefficients listed from the highest pole down.
    ///
    /// A list of length k assigns its entries to poles k, k-1, ..., 1.
    #[must_use]
    pub fn from_list<I, T>(coefficients: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<LocalOperator>,
    {
        let coefficients: Vec<LocalOperator> = coefficients.into_iter().map(Into::into).collect();
        let poles = coefficients
            .into_iter()
            .rev()
            .zip(1u32..)
            .filter(|(c, _)| !c.is_zero())
            .map(|(c, n)| (n, c))
            .collect();
        Self { poles }
    }

    /// Creates an OPE from explicit (order, coefficient) pairs.
    ///
    /// Repeated orders are summed.
    ///
    /// # Errors
    ///
    /// Returns `OpeError::InvalidPoleOrder` if some order is zero.
    pub fn from_poles(poles: impl IntoIterator<Item = (u32, LocalOperator)>) -> OpeResult<Self> {
        let mut out = Self::new();
        for (n, c) in poles {
            out.add_to_pole(n, c)?;
        }
        Ok(out)
    }

    /// Returns the coefficient of pole `n`.
    ///
    /// Orders that are absent, including 0, give zero.
    #[must_use]
    pub fn pole(&self, n: u32) -> LocalOperator {
        self.poles.get(&n).cloned().unwrap_or_else(LocalOperator::zero)
    }

    /// Returns a reference to the coefficient of pole `n`, if non-zero.
    #[must_use]
    pub fn get(&self, n: u32) -> Option<&LocalOperator> {
        self.poles.get(&n)
    }

    /// Sets the coefficient of pole `n`, removing it when `value` is zero.
    ///
    /// # Errors
    ///
    /// Returns `OpeError::InvalidPoleOrder` if `n` is zero.
    pub fn set_pole(&mut self, n: u32, value: LocalOperator) -> OpeResult<()> {
        if n == 0 {
            return Err(OpeError::InvalidPoleOrder(n));
        }
        if value.is_zero() {
            self.poles.remove(&n);
        } else {
            self.poles.insert(n, value);
        }
        Ok(())
    }

    /// Adds `value` to the coefficient of pole `n`.
    ///
    /// # Errors
    ///
    /// Returns `OpeError::InvalidPoleOrder` if `n` is zero.
    pub fn add_to_pole(&mut self, n: u32, value: LocalOperator) -> OpeResult<()> {
        if n == 0 {
            return Err(OpeError::InvalidPoleOrder(n));
        }
        if value.is_zero() {
            return Ok(());
        }
        match self.poles.entry(n) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => {
                let sum = slot.get().clone() + value;
                if sum.is_zero() {
                    slot.remove();
                } else {
                    *slot.get_mut() = sum;
                }
            }
        }
        Ok(())
    }

    /// Returns the highest pole order, or 0 for a regular OPE.
    #[must_use]
    pub fn max_pole(&self) -> u32 {
        self.poles.keys().next_back().copied().unwrap_or(0)
    }

    /// Returns the number of non-zero poles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.poles.len()
    }

    /// Returns true if there are no poles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.poles.is_empty()
    }

    /// Returns the (order, coefficient) pairs in increasing order.
    pub fn poles(&self) -> impl DoubleEndedIterator<Item = (u32, &LocalOperator)> {
        self.poles.iter().map(|(n, c)| (*n, c))
    }

    /// Multiplies every coefficient by a scalar.
    #[must_use]
    pub fn scale(&self, c: &Scalar) -> Self {
        self.map_coefficients(|x| x.scale(c))
    }

    /// Multiplies every coefficient by a rational constant.
    #[must_use]
    pub fn scale_rational(&self, c: &Rational) -> Self {
        self.map_coefficients(|x| x.scale_rational(c))
    }

    /// Substitutes a polynomial for a parameter in every coefficient.
    #[must_use]
    pub fn substitute(&self, symbol: &Symbol, value: &Scalar) -> Self {
        self.map_coefficients(|x| x.substitute(symbol, value))
    }

    /// Applies a map to every coefficient, dropping those that vanish.
    #[must_use]
    pub fn map_coefficients(&self, mut f: impl FnMut(&LocalOperator) -> LocalOperator) -> Self {
        let poles = self
            .poles
            .iter()
            .filter_map(|(n, c)| {
                let mapped = f(c);
                (!mapped.is_zero()).then_some((*n, mapped))
            })
            .collect();
        Self { poles }
    }
}

impl Zero for OpeData {
    fn zero() -> Self {
        Self::new()
    }

    fn is_zero(&self) -> bool {
        self.poles.is_empty()
    }
}

impl PartialEq for OpeData {
    fn eq(&self, other: &Self) -> bool {
        (self - other).is_zero()
    }
}

impl Eq for OpeData {}

impl Add for OpeData {
    type Output = OpeData;

    fn add(mut self, rhs: Self) -> Self::Output {
        for (n, c) in rhs.poles {
            match self.poles.entry(n) {
                Entry::Vacant(slot) => {
                    slot.insert(c);
                }
                Entry::Occupied(mut slot) => {
                    let sum = slot.get().clone() + c;
                    if sum.is_zero() {
                        slot.remove();
                    } else {
                        *slot.get_mut() = sum;
                    }
                }
            }
        }
        self
    }
}

impl Add for &OpeData {
    type Output = OpeData;

    fn add(self, rhs: Self) -> Self::Output {
        self.clone() + rhs.clone()
    }
}

impl Sub for OpeData {
    type Output = OpeData;

    fn sub(self, rhs: Self) -> Self::Output {
        self + (-rhs)
    }
}

impl Sub for &OpeData {
    type Output = OpeData;

    fn sub(self, rhs: Self) -> Self::Output {
        self.clone() - rhs.clone()
    }
}

impl Neg for OpeData {
    type Output = OpeData;

    fn neg(self) -> Self::Output {
        Self {
            poles: self.poles.into_iter().map(|(n, c)| (n, -c)).collect(),
        }
    }
}

impl Neg for &OpeData {
    type Output = OpeData;

    fn neg(self) -> Self::Output {
        -self.clone()
    }
}

impl fmt::Debug for OpeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpeData({self})")
    }
}

impl fmt::Display for OpeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }

        for (i, (n, c)) in self.poles.iter().rev().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            if *n == 1 {
                write!(f, "({c})/(z-w)")?;
            } else {
                write!(f, "({c})/(z-w)^{n}")?;
            }
        }
        Ok(())
    }
}
