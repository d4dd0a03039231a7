//! Property-based tests for the engine.

#[cfg(test)]
mod tests {
    use num_traits::Zero;
    use proptest::prelude::*;

    use crate::{commute_ope, OpeEngine, OpeRegistry};
    use vertex_core::{normal_order, BasisOperator, LocalOperator, OpeData, Parity};
    use vertex_integers::Rational;
    use vertex_poly::Scalar;

    fn t() -> LocalOperator {
        BasisOperator::bosonic("T").into()
    }

    fn j() -> LocalOperator {
        BasisOperator::bosonic("J").into()
    }

    fn registry() -> OpeRegistry {
        let c = Scalar::var("c");
        let mut reg = OpeRegistry::new();
        reg.define(
            &BasisOperator::bosonic("T"),
            &BasisOperator::bosonic("T"),
            OpeData::from_list([
                LocalOperator::scalar(c / Rational::from(2)),
                LocalOperator::zero(),
                2 * t(),
                t().derivative(1),
            ]),
        )
        .unwrap();
        reg.define(
            &BasisOperator::bosonic("T"),
            &BasisOperator::bosonic("J"),
            OpeData::from_list([j(), j().derivative(1)]),
        )
        .unwrap();
        reg.define(
            &BasisOperator::bosonic("J"),
            &BasisOperator::bosonic("J"),
            OpeData::from_list([LocalOperator::scalar(Scalar::var("k")), LocalOperator::zero()]),
        )
        .unwrap();
        reg
    }

    // Strategy for a*T + b*∂^d J + e*NO(J, J)
    fn small_field() -> impl Strategy<Value = LocalOperator> {
        (-3i64..3, -3i64..3, 0u32..2, -2i64..2).prop_map(|(a, b, d, e)| {
            let jj = normal_order(&j(), &j());
            &(&(a * t()) + &(b * j().derivative(d))) + &(e * jj)
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn ope_is_additive_on_the_right(a in small_field(), b in small_field(), c in small_field()) {
            let reg = registry();
            let engine = OpeEngine::new(&reg);
            let lhs = engine.ope(&a, &(&b + &c)).unwrap();
            let rhs = &engine.ope(&a, &b).unwrap() + &engine.ope(&a, &c).unwrap();
            prop_assert_eq!(lhs, rhs);
        }

        #[test]
        fn ope_is_additive_on_the_left(a in small_field(), b in small_field(), c in small_field()) {
            let reg = registry();
            let engine = OpeEngine::new(&reg);
            let lhs = engine.ope(&(&a + &b), &c).unwrap();
            let rhs = &engine.ope(&a, &c).unwrap() + &engine.ope(&b, &c).unwrap();
            prop_assert_eq!(lhs, rhs);
        }

        #[test]
        fn scalars_factor_out(a in small_field(), b in small_field(), n in -4i64..4) {
            let reg = registry();
            let engine = OpeEngine::new(&reg);
            let s = Scalar::from(n) * Scalar::var("c");
            let base = engine.ope(&a, &b).unwrap();
            prop_assert_eq!(engine.ope(&a.scale(&s), &b).unwrap(), base.scale(&s));
            prop_assert_eq!(engine.ope(&a, &b.scale(&s)).unwrap(), base.scale(&s));
        }

        #[test]
        fn exchange_of_declared_fields_is_involutive(d in 0u32..3, e in 0u32..3) {
            let reg = registry();
            let engine = OpeEngine::new(&reg);
            let x = t().derivative(d);
            let y = j().derivative(e);
            let xy = engine.ope(&x, &y).unwrap();
            let yx = engine.ope(&y, &x).unwrap();
            prop_assert_eq!(commute_ope(&xy, Parity::Even, Parity::Even), yx.clone());
            prop_assert_eq!(commute_ope(&yx, Parity::Even, Parity::Even), xy);
        }
    }
}
