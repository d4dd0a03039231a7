//! Property-based tests for polynomial coefficients.

#[cfg(test)]
mod tests {
    use num_traits::Zero;
    use proptest::prelude::*;

    use crate::{Scalar, Symbol};
    use vertex_integers::Rational;

    // Strategy for small polynomials in c and k: a*c^i*k^j + b
    fn small_scalar() -> impl Strategy<Value = Scalar> {
        (-20i64..20, 0u32..3, 0u32..3, -20i64..20, 1i64..5).prop_map(|(a, i, j, b, d)| {
            let lead = Scalar::var("c").pow(i) * Scalar::var("k").pow(j);
            &lead.scale(&Rational::from_i64(a, d)) + &Scalar::from(b)
        })
    }

    proptest! {
        #[test]
        fn add_commutative(a in small_scalar(), b in small_scalar()) {
            prop_assert_eq!(&a + &b, &b + &a);
        }

        #[test]
        fn mul_distributive(a in small_scalar(), b in small_scalar(), c in small_scalar()) {
            let lhs = &a * &(&b + &c);
            let rhs = &(&a * &b) + &(&a * &c);
            prop_assert_eq!(lhs, rhs);
        }

        #[test]
        fn sub_self_is_zero(a in small_scalar()) {
            prop_assert!((&a - &a).is_zero());
        }

        #[test]
        fn derivative_leibniz(a in small_scalar(), b in small_scalar()) {
            let c = Symbol::new("c");
            let lhs = (&a * &b).derivative(&c);
            let rhs = &(&a.derivative(&c) * &b) + &(&a * &b.derivative(&c));
            prop_assert_eq!(lhs, rhs);
        }

        #[test]
        fn evaluate_is_homomorphism(a in small_scalar(), b in small_scalar(), x in -5i64..5, y in -5i64..5) {
            let bindings = [
                (Symbol::new("c"), Rational::from(x)),
                (Symbol::new("k"), Rational::from(y)),
            ];
            let lhs = (&a * &b).evaluate(&bindings);
            let rhs = a.evaluate(&bindings).zip(b.evaluate(&bindings)).map(|(p, q)| p * q);
            prop_assert_eq!(lhs, rhs);
        }
    }
}
