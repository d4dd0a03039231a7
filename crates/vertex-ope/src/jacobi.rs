//! The Jacobi identity as a consistency check.
//!
//! For operators A, B, C the identity
//!
//! [A [BC]_m]_n - (-1)^(|A||B|) [B [AC]_n]_m
//!     = Σ_{p=1}^{n} C(n-1, p-1) [[AB]_p C]_{m+n-p}
//!
//! must hold for all m, n ≥ 1. A set of declared OPEs defines an algebra
//! only if every residual vanishes, which makes this the check of choice
//! for both declarations and the engine itself.

use num_traits::Zero;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fmt;

use vertex_core::{LocalOperator, OpeData, OpeResult, Parity};
use vertex_integers::binomial;

use crate::engine::OpeEngine;

/// Residuals of the Jacobi identity on a grid of pole orders.
///
/// Entry (m, n) is stored for 1 ≤ m ≤ rows and 1 ≤ n ≤ cols.
#[derive(Clone, Debug)]
pub struct JacobiGrid {
    rows: u32,
    cols: u32,
    entries: Vec<LocalOperator>,
}

impl JacobiGrid {
    /// Returns (rows, cols), the ranges of m and n.
    #[must_use]
    pub fn shape(&self) -> (u32, u32) {
        (self.rows, self.cols)
    }

    /// Returns the residual at (m, n), or `None` outside the grid.
    #[must_use]
    pub fn get(&self, m: u32, n: u32) -> Option<&LocalOperator> {
        if m == 0 || n == 0 || m > self.rows || n > self.cols {
            return None;
        }
        self.entries.get(self.index(m, n))
    }

    /// Returns true if every residual vanishes.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.entries.iter().all(Zero::is_zero)
    }

    /// Returns the non-vanishing residuals as (m, n, value).
    #[must_use]
    pub fn nonzero_entries(&self) -> Vec<(u32, u32, &LocalOperator)> {
        let mut out = Vec::new();
        for m in 1..=self.rows {
            for n in 1..=self.cols {
                if let Some(x) = self.get(m, n).filter(|x| !x.is_zero()) {
                    out.push((m, n, x));
                }
            }
        }
        out
    }

    fn index(&self, m: u32, n: u32) -> usize {
        ((m - 1) * self.cols + (n - 1)) as usize
    }
}

impl fmt::Display for JacobiGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nonzero = self.nonzero_entries();
        if nonzero.is_empty() {
            return write!(f, "{}x{} grid, all zero", self.rows, self.cols);
        }
        write!(f, "{}x{} grid, {} non-zero:", self.rows, self.cols, nonzero.len())?;
        for (m, n, x) in nonzero {
            write!(f, "\n  ({m}, {n}): {x}")?;
        }
        Ok(())
    }
}

/// Applies `f` to every pole coefficient of `ope`, keyed by pole order.
///
/// The calls are independent and run on the rayon pool once there are at
/// least `parallel_threshold` of them.
fn nested<F>(engine: &OpeEngine<'_>, ope: &OpeData, f: F) -> OpeResult<BTreeMap<u32, OpeData>>
where
    F: Fn(&LocalOperator) -> OpeResult<OpeData> + Send + Sync,
{
    let poles: Vec<(u32, &LocalOperator)> = ope.poles().collect();
    if poles.len() < engine.options().parallel_threshold {
        poles.into_iter().map(|(k, coeff)| Ok((k, f(coeff)?))).collect()
    } else {
        poles.into_par_iter().map(|(k, coeff)| Ok((k, f(coeff)?))).collect()
    }
}

fn max_nested(table: &BTreeMap<u32, OpeData>) -> u32 {
    table.values().map(OpeData::max_pole).max().unwrap_or(0)
}

fn nested_pole(table: &BTreeMap<u32, OpeData>, k: u32, n: u32) -> LocalOperator {
    table.get(&k).map(|ope| ope.pole(n)).unwrap_or_else(LocalOperator::zero)
}

/// Computes the Jacobi residuals of (a, b, c).
///
/// # Errors
///
/// Returns `OpeError::MixedParity` if `a` or `b` mixes statistics, and
/// fails like [`OpeEngine::ope`] otherwise.
pub fn check_jacobi_identity(
    engine: &OpeEngine<'_>,
    a: &LocalOperator,
    b: &LocalOperator,
    c: &LocalOperator,
) -> OpeResult<JacobiGrid> {
    let sign = Parity::swap_sign(a.parity()?, b.parity()?);

    let ab = engine.ope(a, b)?;
    let ac = engine.ope(a, c)?;
    let bc = engine.ope(b, c)?;

    // [A [BC]_k], [B [AC]_k] and [[AB]_k C]
    let a_bc = nested(engine, &bc, |x| engine.ope(a, x))?;
    let b_ac = nested(engine, &ac, |x| engine.ope(b, x))?;
    let ab_c = nested(engine, &ab, |x| engine.ope(x, c))?;

    let cols = max_nested(&a_bc).max(ac.max_pole()).max(ab.max_pole());
    let rows = bc.max_pole().max(max_nested(&b_ac)).max(max_nested(&ab_c));

    let mut entries = Vec::with_capacity((rows * cols) as usize);
    for m in 1..=rows {
        for n in 1..=cols {
            let mut residual = nested_pole(&a_bc, m, n) - nested_pole(&b_ac, n, m).scale_rational(&sign);
            for p in 1..=n {
                let term = nested_pole(&ab_c, p, m + n - p).scale_rational(&binomial(n - 1, p - 1));
                residual = residual - term;
            }
            entries.push(residual);
        }
    }

    Ok(JacobiGrid { rows, cols, entries })
}

/// Returns true if every Jacobi residual of (a, b, c) vanishes.
///
/// # Errors
///
/// Fails like [`check_jacobi_identity`].
pub fn verify_jacobi_identity(
    engine: &OpeEngine<'_>,
    a: &LocalOperator,
    b: &LocalOperator,
    c: &LocalOperator,
) -> OpeResult<bool> {
    Ok(check_jacobi_identity(engine, a, b, c)?.is_zero())
}
