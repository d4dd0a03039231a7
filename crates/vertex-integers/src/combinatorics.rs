//! Exact combinatorial coefficients.
//!
//! The OPE recursion multiplies pole coefficients by factorials, binomials
//! and rising factorials of pole orders. Everything is computed with
//! arbitrary precision integers and returned as a [`Rational`] so it can be
//! folded straight into coefficient arithmetic.

use dashu::integer::IBig;
use num_traits::One;

use crate::Rational;

/// Computes n!.
#[must_use]
pub fn factorial(n: u32) -> Rational {
    let mut acc = IBig::ONE;
    for k in 2..=n {
        acc *= IBig::from(k);
    }
    Rational::from_ibig(acc)
}

/// Computes the binomial coefficient C(n, k).
///
/// Returns zero when `k > n`.
#[must_use]
pub fn binomial(n: u32, k: u32) -> Rational {
    if k > n {
        return Rational::from(0);
    }

    // Multiplicative formula over the shorter side; every partial product
    // C(n, i) is an integer, so the division below is exact.
    let k = k.min(n - k);
    let mut acc = IBig::ONE;
    for i in 0..k {
        acc *= IBig::from(n - i);
        acc /= IBig::from(i + 1);
    }
    Rational::from_ibig(acc)
}

/// Computes the Pochhammer symbol (rising factorial) x(x+1)...(x+n-1).
///
/// `pochhammer(x, 0)` is 1 for every x.
#[must_use]
pub fn pochhammer(x: i64, n: u32) -> Rational {
    let mut acc = IBig::ONE;
    for i in 0..i64::from(n) {
        acc *= IBig::from(x + i);
    }
    Rational::from_ibig(acc)
}

/// Computes (-1)^n.
#[must_use]
pub fn sign_power(n: u32) -> Rational {
    if n % 2 == 0 {
        Rational::one()
    } else {
        -Rational::one()
    }
}
