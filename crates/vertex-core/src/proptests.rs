//! Property-based tests for operators and OPE data.

#[cfg(test)]
mod tests {
    use num_traits::Zero;
    use proptest::prelude::*;

    use crate::{normal_order, BasisOperator, LocalOperator, OpeData};
    use vertex_integers::Rational;
    use vertex_poly::Scalar;

    fn field(i: usize) -> LocalOperator {
        let names = ["T", "J", "W"];
        BasisOperator::bosonic(names[i % names.len()]).into()
    }

    // Strategy for a small combination a*X + b*∂^d Y + e*c*1
    fn small_local() -> impl Strategy<Value = LocalOperator> {
        (-5i64..5, 0usize..3, -5i64..5, 0usize..3, 0u32..3, -5i64..5).prop_map(|(a, x, b, y, d, e)| {
            let lhs = a * field(x);
            let rhs = b * field(y).derivative(d);
            let unit = LocalOperator::scalar(Scalar::from(e) * Scalar::var("c"));
            &(&lhs + &rhs) + &unit
        })
    }

    fn small_ope() -> impl Strategy<Value = OpeData> {
        prop::collection::vec(small_local(), 0..5).prop_map(|coeffs: Vec<LocalOperator>| OpeData::from_list(coeffs))
    }

    proptest! {
        #[test]
        fn ope_add_sub_inverse(x in small_ope(), y in small_ope()) {
            prop_assert_eq!(&(&x + &y) - &y, x);
        }

        #[test]
        fn ope_zero_scale(x in small_ope()) {
            prop_assert!(x.scale(&Scalar::zero()).is_zero());
        }

        #[test]
        fn from_list_round_trip(coeffs in prop::collection::vec(small_local(), 1..6)) {
            let ope = OpeData::from_list(coeffs.clone());
            let k = coeffs.len();
            for (i, c) in coeffs.iter().enumerate() {
                let order = u32::try_from(k - i).unwrap();
                prop_assert_eq!(&ope.pole(order), c);
            }
            prop_assert!(ope.pole(0).is_zero());
            prop_assert!(ope.pole(u32::try_from(k + 1).unwrap()).is_zero());
        }

        #[test]
        fn set_pole_zero_idempotent(x in small_ope(), n in 1u32..6) {
            let mut once = x.clone();
            once.set_pole(n, LocalOperator::zero()).unwrap();
            let mut twice = once.clone();
            twice.set_pole(n, LocalOperator::zero()).unwrap();
            prop_assert!(once.get(n).is_none());
            prop_assert_eq!(once.len(), twice.len());
            prop_assert_eq!(once.is_zero(), once.poles().next().is_none());
        }

        #[test]
        fn normal_order_distributes(a in small_local(), b in small_local(), c in small_local()) {
            let lhs = normal_order(&a, &(&b + &c));
            let rhs = &normal_order(&a, &b) + &normal_order(&a, &c);
            prop_assert_eq!(lhs, rhs);
        }

        #[test]
        fn derivative_is_linear(a in small_local(), b in small_local(), n in 1u32..3) {
            let lhs = (&a + &b).derivative(n);
            let rhs = &a.derivative(n) + &b.derivative(n);
            prop_assert_eq!(lhs, rhs);
        }

        #[test]
        fn derivative_of_normal_order_is_leibniz(a in small_local(), b in small_local()) {
            let lhs = normal_order(&a, &b).derivative(1);
            let rhs = &normal_order(&a.derivative(1), &b) + &normal_order(&a, &b.derivative(1));
            prop_assert_eq!(lhs, rhs);
        }

        #[test]
        fn scaling_commutes_with_normal_order(a in small_local(), b in small_local(), k in -4i64..4) {
            let k = Rational::from(k);
            prop_assert_eq!(
                normal_order(&a.scale_rational(&k), &b),
                normal_order(&a, &b).scale_rational(&k)
            );
        }
    }
}
