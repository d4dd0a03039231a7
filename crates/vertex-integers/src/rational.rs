//! Exact rational coefficients.
//!
//! Every number the OPE recursion produces is a ratio of integers: pole
//! orders, factorials, binomials and the coefficients users declare. The
//! [`Rational`] newtype keeps them exact on top of `dashu`'s `RBig`.

use dashu::base::{Abs, Inverse, Sign};
use dashu::integer::{IBig, UBig};
use dashu::rational::RBig;
use num_traits::{One, Zero};
use std::fmt;
use std::iter::{Product, Sum};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// An arbitrary precision rational number in lowest terms.
///
/// The denominator is always positive, so equal values have equal
/// representations and the derived `Eq`, `Hash` and `Ord` are exact.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Rational(RBig);

impl Rational {
    /// Creates `numerator / denominator`.
    ///
    /// # Panics
    ///
    /// Panics if the denominator is zero.
    #[must_use]
    pub fn from_i64(numerator: i64, denominator: i64) -> Self {
        assert!(denominator != 0, "denominator cannot be zero");
        let mut num = IBig::from(numerator);
        if denominator < 0 {
            num = -num;
        }
        Self(RBig::from_parts(num, UBig::from(denominator.unsigned_abs())))
    }

    /// Creates an integer-valued rational.
    #[must_use]
    pub fn from_ibig(n: IBig) -> Self {
        Self(RBig::from(n))
    }

    /// Returns the numerator (carries the sign).
    #[must_use]
    pub fn numerator(&self) -> &IBig {
        self.0.numerator()
    }

    /// Returns the positive denominator.
    #[must_use]
    pub fn denominator(&self) -> &UBig {
        self.0.denominator()
    }

    /// Returns true if the denominator is 1.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.denominator().is_one()
    }

    /// Returns the value as an `i64` when it is an integer in range.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        self.is_integer()
            .then(|| i64::try_from(self.numerator().clone()).ok())
            .flatten()
    }

    /// Returns |self|.
    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.clone().abs())
    }

    /// Returns 1/self.
    ///
    /// # Panics
    ///
    /// Panics if `self` is zero.
    #[must_use]
    pub fn recip(&self) -> Self {
        assert!(!self.is_zero(), "cannot take reciprocal of zero");
        Self(self.0.clone().inv())
    }

    /// Returns -1, 0 or 1.
    #[must_use]
    pub fn signum(&self) -> i8 {
        match (self.is_zero(), self.0.sign()) {
            (true, _) => 0,
            (false, Sign::Positive) => 1,
            (false, Sign::Negative) => -1,
        }
    }

    /// Returns true for values below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.signum() < 0
    }

    /// Computes self^exp.
    #[must_use]
    pub fn pow(&self, exp: u32) -> Self {
        Self(self.0.pow(exp as usize))
    }
}

impl Zero for Rational {
    fn zero() -> Self {
        Self(RBig::ZERO)
    }

    fn is_zero(&self) -> bool {
        self.0 == RBig::ZERO
    }
}

impl One for Rational {
    fn one() -> Self {
        Self(RBig::ONE)
    }

    fn is_one(&self) -> bool {
        self.0 == RBig::ONE
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rational({self})")
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.numerator())?;
        if !self.is_integer() {
            write!(f, "/{}", self.denominator())?;
        }
        Ok(())
    }
}

/// Implements a binary operator for every owned/borrowed operand pairing.
macro_rules! forward_binop {
    ($trait:ident, $method:ident, $check:ident) => {
        impl $trait<&Rational> for &Rational {
            type Output = Rational;

            fn $method(self, rhs: &Rational) -> Rational {
                $check(rhs);
                Rational($trait::$method(&self.0, &rhs.0))
            }
        }

        impl $trait<Rational> for Rational {
            type Output = Rational;

            fn $method(self, rhs: Rational) -> Rational {
                $check(&rhs);
                Rational($trait::$method(self.0, rhs.0))
            }
        }

        impl $trait<&Rational> for Rational {
            type Output = Rational;

            fn $method(self, rhs: &Rational) -> Rational {
                $check(rhs);
                Rational($trait::$method(self.0, &rhs.0))
            }
        }

        impl $trait<Rational> for &Rational {
            type Output = Rational;

            fn $method(self, rhs: Rational) -> Rational {
                $check(&rhs);
                Rational($trait::$method(&self.0, rhs.0))
            }
        }
    };
}

fn any_operand(_: &Rational) {}

fn nonzero_divisor(rhs: &Rational) {
    assert!(!rhs.is_zero(), "division by zero");
}

forward_binop!(Add, add, any_operand);
forward_binop!(Sub, sub, any_operand);
forward_binop!(Mul, mul, any_operand);
forward_binop!(Div, div, nonzero_divisor);

impl Neg for Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational(-self.0)
    }
}

impl Neg for &Rational {
    type Output = Rational;

    fn neg(self) -> Rational {
        Rational(-&self.0)
    }
}

impl Sum for Rational {
    fn sum<I: Iterator<Item = Rational>>(iter: I) -> Self {
        iter.fold(Rational::zero(), |acc, x| acc + x)
    }
}

impl Product for Rational {
    fn product<I: Iterator<Item = Rational>>(iter: I) -> Self {
        iter.fold(Rational::one(), |acc, x| acc * x)
    }
}

impl From<IBig> for Rational {
    fn from(n: IBig) -> Self {
        Self::from_ibig(n)
    }
}

impl From<i64> for Rational {
    fn from(n: i64) -> Self {
        Self::from_ibig(IBig::from(n))
    }
}

impl From<i32> for Rational {
    fn from(n: i32) -> Self {
        Self::from_ibig(IBig::from(n))
    }
}

impl From<u32> for Rational {
    fn from(n: u32) -> Self {
        Self::from_ibig(IBig::from(n))
    }
}
