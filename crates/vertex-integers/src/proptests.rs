//! Property-based tests for exact arithmetic.

#[cfg(test)]
mod tests {
    use dashu::integer::IBig;
    use num_traits::{One, Zero};
    use proptest::prelude::*;

    use crate::{binomial, factorial, pochhammer, sign_power, Rational};

    /// Fractions with small numerator and non-zero denominator.
    fn rational() -> impl Strategy<Value = Rational> {
        (-500i64..500, 1i64..60, any::<bool>())
            .prop_map(|(n, d, neg)| Rational::from_i64(n, if neg { -d } else { d }))
    }

    fn nonzero_rational() -> impl Strategy<Value = Rational> {
        rational().prop_filter("non-zero", |q| !q.is_zero())
    }

    proptest! {
        #[test]
        fn ring_laws(a in rational(), b in rational(), c in rational()) {
            prop_assert_eq!(&a + &b, &b + &a);
            prop_assert_eq!(&a * &b, &b * &a);
            prop_assert_eq!(&(&a + &b) + &c, &a + &(&b + &c));
            prop_assert_eq!(&a * &(&b + &c), &(&a * &b) + &(&a * &c));
            prop_assert!((&a - &a).is_zero());
        }

        #[test]
        fn division_undoes_multiplication(a in rational(), b in nonzero_rational()) {
            prop_assert_eq!(&(&a * &b) / &b, a);
            prop_assert!((&b * &b.recip()).is_one());
        }

        #[test]
        fn numerator_over_denominator(q in rational()) {
            let den = Rational::from_ibig(IBig::from(q.denominator().clone()));
            prop_assert_eq!(&q * &den, Rational::from_ibig(q.numerator().clone()));
        }

        #[test]
        fn binomial_pascal(n in 1u32..40, k in 1u32..40) {
            prop_assert_eq!(binomial(n, k), binomial(n - 1, k - 1) + binomial(n - 1, k));
        }

        #[test]
        fn binomial_via_factorials(n in 0u32..25, k in 0u32..25) {
            prop_assume!(k <= n);
            prop_assert_eq!(binomial(n, k) * factorial(k) * factorial(n - k), factorial(n));
        }

        #[test]
        fn pochhammer_recurrence(x in -20i64..20, n in 1u32..12) {
            prop_assert_eq!(pochhammer(x, n), Rational::from(x) * pochhammer(x + 1, n - 1));
        }

        #[test]
        fn pochhammer_of_one_is_factorial(n in 0u32..30) {
            prop_assert_eq!(pochhammer(1, n), factorial(n));
        }

        #[test]
        fn sign_power_is_multiplicative(i in 0u32..50, j in 0u32..50) {
            prop_assert_eq!(sign_power(i + j), sign_power(i) * sign_power(j));
        }
    }
}
