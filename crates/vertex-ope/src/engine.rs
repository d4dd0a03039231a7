//! The recursive OPE engine.
//!
//! OPEs of composite operators are reduced to declared OPEs of primitive
//! fields. The reduction works on single operators; linear combinations
//! are handled by bilinearity before dispatch.
//!
//! Writing [AB]_q for the coefficient of (z-w)^-q in A(z)B(w):
//!
//! - Left derivative: [∂^i A, B]_{p+i} = (-1)^i (p)_i [AB]_p
//! - Right derivative: [A, ∂^i B]_{p+k} gets C(i,k) (p)_k ∂^(i-k) [AB]_p
//!   for k = 0..=i
//! - Right composite, with s the exchange sign of A and B:
//!   [A NO(B,C)]_q = s NO(B, [AC]_q) + NO([AB]_q, C)
//!   + Σ_{k=1}^{q-1} C(q-1,k-1) [[AB]_k C]_{q-k}
//! - Left composite, with s the exchange sign of A and B:
//!   [NO(A,B) C]_q = Σ_l NO(∂^l A, [BC]_{q+l}) / l!
//!   + s Σ_l NO(∂^l B, [AC]_{q+l}) / l!
//!   + s Σ_{k=1}^{q-1} [B [AC]_k]_{q-k}
//!
//! where (p)_i is the rising factorial.

use log::{trace, warn};
use num_traits::Zero;
use std::cmp::Ordering;

use vertex_core::{
    normal_order, BasisOperator, DerivativeOperator, LocalOperator, NormalOrderedOperator, OpeData, OpeError,
    OpeResult, Operator, Parity,
};
use vertex_integers::{binomial, factorial, pochhammer, sign_power, Rational};

use crate::cache::{CacheStats, OpeCache};
use crate::commutation::commute_ope;
use crate::options::EngineOptions;
use crate::registry::OpeRegistry;

/// Computes OPEs against a registry of declarations.
///
/// The engine only reads the registry. Results of operator pairs are
/// memoized unless caching is disabled in the options.
#[derive(Debug)]
pub struct OpeEngine<'r> {
    registry: &'r OpeRegistry,
    options: EngineOptions,
    cache: OpeCache,
}

impl<'r> OpeEngine<'r> {
    /// Creates an engine with default options.
    #[must_use]
    pub fn new(registry: &'r OpeRegistry) -> Self {
        Self::with_options(registry, EngineOptions::default())
    }

    /// Creates an engine with the given options.
    #[must_use]
    pub fn with_options(registry: &'r OpeRegistry, options: EngineOptions) -> Self {
        Self::with_cache(registry, options, OpeCache::new())
    }

    /// Creates an engine reusing a cache from an earlier engine.
    ///
    /// The cache is cleared if the registry changed since it was filled.
    #[must_use]
    pub fn with_cache(registry: &'r OpeRegistry, options: EngineOptions, cache: OpeCache) -> Self {
        cache.sync_generation(registry.generation());
        Self {
            registry,
            options,
            cache,
        }
    }

    /// Returns the registry.
    #[must_use]
    pub fn registry(&self) -> &'r OpeRegistry {
        self.registry
    }

    /// Returns the options.
    #[must_use]
    pub fn options(&self) -> EngineOptions {
        self.options
    }

    /// Returns the cache counters.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Gives back the cache for reuse.
    #[must_use]
    pub fn into_cache(self) -> OpeCache {
        self.cache
    }

    /// Computes OPE(a, b).
    ///
    /// # Errors
    ///
    /// In strict mode, returns `OpeError::UndeclaredOpe` when the reduction
    /// reaches a pair of primitive fields with no declaration.
    pub fn ope(&self, a: &LocalOperator, b: &LocalOperator) -> OpeResult<OpeData> {
        let mut out = OpeData::new();
        for (oa, ca) in a.terms() {
            for (ob, cb) in b.terms() {
                let coeff = ca * cb;
                let atom = self.ope_operators(oa, ob)?;
                out = out + atom.scale(&coeff);
            }
        }
        Ok(out)
    }

    /// Computes OPE(a, b) for single operators.
    ///
    /// # Errors
    ///
    /// Fails like [`ope`](Self::ope).
    pub fn ope_operators(&self, a: &Operator, b: &Operator) -> OpeResult<OpeData> {
        if self.options.cache {
            if let Some(hit) = self.cache.get(a, b) {
                return Ok((*hit).clone());
            }
        }

        let result = self.dispatch(a, b)?;

        if self.options.cache {
            self.cache.insert(a.clone(), b.clone(), result.clone());
        }
        Ok(result)
    }

    /// Returns pole `n` of OPE(a, b), or NO(a, b) for `n = 0`.
    ///
    /// # Errors
    ///
    /// Fails like [`ope`](Self::ope).
    pub fn bracket(&self, a: &LocalOperator, b: &LocalOperator, n: u32) -> OpeResult<LocalOperator> {
        if n == 0 {
            return Ok(normal_order(a, b));
        }
        Ok(self.ope(a, b)?.pole(n))
    }

    /// Computes NO(a, b).
    #[must_use]
    pub fn normal_order(&self, a: &LocalOperator, b: &LocalOperator) -> LocalOperator {
        normal_order(a, b)
    }

    fn dispatch(&self, a: &Operator, b: &Operator) -> OpeResult<OpeData> {
        match (a, b) {
            (Operator::Identity, _) | (_, Operator::Identity) => {
                trace!("OPE({a}, {b}): unit operator, regular");
                Ok(OpeData::new())
            }
            (Operator::Derivative(d), _) => self.left_derivative(d, b),
            (_, Operator::Derivative(d)) => self.right_derivative(a, d),
            (Operator::Basis(x), Operator::Basis(y)) => self.base_lookup(x, y),
            (_, Operator::NormalOrdered(no)) => self.right_composite(a, no),
            (Operator::NormalOrdered(no), _) => self.left_composite(no, b),
        }
    }

    fn left_derivative(&self, d: &DerivativeOperator, b: &Operator) -> OpeResult<OpeData> {
        trace!("OPE({d}, {b}): left derivative rule");
        let i = d.order();
        let base = self.ope_operators(&Operator::Basis(d.base().clone()), b)?;
        let sign = sign_power(i);

        let mut out = OpeData::new();
        for (p, c) in base.poles() {
            let coeff = &sign * &pochhammer(i64::from(p), i);
            out.add_to_pole(p + i, c.scale_rational(&coeff))?;
        }
        Ok(out)
    }

    fn right_derivative(&self, a: &Operator, d: &DerivativeOperator) -> OpeResult<OpeData> {
        trace!("OPE({a}, {d}): right derivative rule");
        let i = d.order();
        let base = self.ope_operators(a, &Operator::Basis(d.base().clone()))?;

        let mut out = OpeData::new();
        for (p, c) in base.poles() {
            for k in 0..=i {
                let coeff = &binomial(i, k) * &pochhammer(i64::from(p), k);
                out.add_to_pole(p + k, c.derivative(i - k).scale_rational(&coeff))?;
            }
        }
        Ok(out)
    }

    fn base_lookup(&self, x: &BasisOperator, y: &BasisOperator) -> OpeResult<OpeData> {
        let forward = self.registry.lookup(x, y);
        let reverse = self.registry.lookup(y, x);
        let in_order = self.registry.compare_operators(x, y) != Ordering::Greater;
        let commuted = |r: &OpeData| commute_ope(r, y.parity(), x.parity());

        match (in_order, forward, reverse) {
            (true, Some(f), _) | (false, Some(f), None) => {
                trace!("OPE({x}, {y}): declared");
                Ok(f.clone())
            }
            (true, None, Some(r)) | (false, _, Some(r)) => {
                trace!("OPE({x}, {y}): commuted from OPE({y}, {x})");
                Ok(commuted(r))
            }
            (_, None, None) => self.undeclared(x, y),
        }
    }

    fn undeclared(&self, x: &BasisOperator, y: &BasisOperator) -> OpeResult<OpeData> {
        if self.options.strict {
            return Err(OpeError::UndeclaredOpe {
                left: x.to_string(),
                right: y.to_string(),
            });
        }
        if self.registry.is_registered(x) && self.registry.is_registered(y) {
            warn!("no OPE declared between {x} and {y}; treating it as regular");
        } else {
            trace!("OPE({x}, {y}): undeclared, regular");
        }
        Ok(OpeData::new())
    }

    fn right_composite(&self, a: &Operator, no: &NormalOrderedOperator) -> OpeResult<OpeData> {
        trace!("OPE({a}, {no}): right composite rule");
        let b = LocalOperator::from_operator(no.left().clone());
        let c = LocalOperator::from_operator(no.right().clone());
        let sign = Parity::swap_sign(a.parity(), no.left().parity());

        let ab = self.ope_operators(a, no.left())?;
        let ac = self.ope_operators(a, no.right())?;

        // [[AB]_k C] for every pole k of OPE(A, B)
        let mut nested = Vec::with_capacity(ab.len());
        for (k, coeff) in ab.poles() {
            nested.push((k, self.ope(coeff, &c)?));
        }

        let max_q = nested
            .iter()
            .map(|(k, ope)| k + ope.max_pole())
            .chain([ab.max_pole(), ac.max_pole()])
            .max()
            .unwrap_or(0);

        let mut out = OpeData::new();
        for q in 1..=max_q {
            let mut acc = normal_order(&b, &ac.pole(q)).scale_rational(&sign);
            acc = acc + normal_order(&ab.pole(q), &c);
            for (k, ope) in &nested {
                if *k < q {
                    acc = acc + ope.pole(q - k).scale_rational(&binomial(q - 1, k - 1));
                }
            }
            out.add_to_pole(q, acc)?;
        }
        Ok(out)
    }

    fn left_composite(&self, no: &NormalOrderedOperator, c: &Operator) -> OpeResult<OpeData> {
        let a = no.left();
        let b = no.right();
        let bc = self.ope_operators(b, c)?;
        let ac = self.ope_operators(a, c)?;

        if bc.is_zero() && ac.is_zero() {
            trace!("OPE({no}, {c}): both factors regular with {c}");
            return Ok(OpeData::new());
        }
        trace!("OPE({no}, {c}): left composite rule");

        let sign = Parity::swap_sign(a.parity(), b.parity());
        let mut out = OpeData::new();

        // Both factors see C, with Taylor terms of the spectator
        add_spectator_terms(&mut out, a, &bc, &Rational::from(1))?;
        add_spectator_terms(&mut out, b, &ac, &sign)?;

        // [B [AC]_k]_j lands on pole k + j
        let b_local = LocalOperator::from_operator(b.clone());
        for (k, coeff) in ac.poles() {
            let inner = self.ope(&b_local, coeff)?;
            for (j, x) in inner.poles() {
                out.add_to_pole(k + j, x.scale_rational(&sign))?;
            }
        }
        Ok(out)
    }
}

/// Adds scale · Σ_q Σ_l NO(∂^l spectator, [ope]_{q+l}) / l! to `out`.
fn add_spectator_terms(
    out: &mut OpeData,
    spectator: &Operator,
    ope: &OpeData,
    scale: &Rational,
) -> OpeResult<()> {
    let max = ope.max_pole();
    for l in 0..max {
        let shifted = spectator.derivative(l).scale_rational(&(scale / &factorial(l)));
        if shifted.is_zero() {
            continue;
        }
        for q in 1..=max - l {
            out.add_to_pole(q, normal_order(&shifted, &ope.pole(q + l)))?;
        }
    }
    Ok(())
}
