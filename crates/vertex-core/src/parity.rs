//! Boson/fermion statistics.

use std::fmt;
use std::ops::Add;

use vertex_integers::Rational;

/// The Z2 grading of an operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Parity {
    /// Bosonic (grade 0).
    #[default]
    Even,
    /// Fermionic (grade 1).
    Odd,
}

impl Parity {
    /// Creates a parity from the low bit of an integer grade.
    #[must_use]
    pub fn from_bit(bit: u32) -> Self {
        if bit & 1 == 0 {
            Self::Even
        } else {
            Self::Odd
        }
    }

    /// Returns the grade as 0 or 1.
    #[must_use]
    pub fn bit(self) -> u32 {
        match self {
            Self::Even => 0,
            Self::Odd => 1,
        }
    }

    /// Returns the opposite parity.
    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            Self::Even => Self::Odd,
            Self::Odd => Self::Even,
        }
    }

    /// Returns true for fermionic statistics.
    #[must_use]
    pub fn is_fermionic(self) -> bool {
        self == Self::Odd
    }

    /// Returns true for bosonic statistics.
    #[must_use]
    pub fn is_bosonic(self) -> bool {
        self == Self::Even
    }

    /// The sign picked up when exchanging operators of parities `a` and `b`.
    ///
    /// This is (-1)^(|a||b|): -1 when both are fermionic, +1 otherwise.
    #[must_use]
    pub fn swap_sign(a: Self, b: Self) -> Rational {
        if a.is_fermionic() && b.is_fermionic() {
            Rational::from(-1)
        } else {
            Rational::from(1)
        }
    }
}

impl Add for Parity {
    type Output = Parity;

    fn add(self, rhs: Self) -> Self::Output {
        Self::from_bit(self.bit() + rhs.bit())
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Even => f.write_str("bosonic"),
            Self::Odd => f.write_str("fermionic"),
        }
    }
}
