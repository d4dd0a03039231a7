//! Exchanging the two operators of an OPE.
//!
//! Writing B(z)A(w) as A(w)B(z) and Taylor expanding the coefficients
//! around w gives
//!
//! [BA]_q = s · Σ_{l≥q} (-1)^l / (l-q)! · ∂^(l-q) [AB]_l
//!
//! with s = -1 when both operators are fermionic and +1 otherwise.

use num_traits::Zero;

use vertex_core::{LocalOperator, OpeData, Parity};
use vertex_integers::{factorial, sign_power};

/// Computes OPE(B, A) from OPE(A, B).
///
/// `parity_a` and `parity_b` are the statistics of A and B.
#[must_use]
pub fn commute_ope(ope: &OpeData, parity_a: Parity, parity_b: Parity) -> OpeData {
    let sign = Parity::swap_sign(parity_a, parity_b);
    let max = ope.max_pole();

    let coefficients: Vec<LocalOperator> = (1..=max)
        .rev()
        .map(|q| {
            let mut acc = LocalOperator::zero();
            for (l, c) in ope.poles().filter(|(l, _)| *l >= q) {
                let weight = &sign_power(l) / &factorial(l - q);
                acc = acc + c.derivative(l - q).scale_rational(&weight);
            }
            acc.scale_rational(&sign)
        })
        .collect();

    OpeData::from_list(coefficients)
}
