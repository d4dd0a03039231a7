//! The declaration context.
//!
//! A registry records the statistics of each primitive field, the order in
//! which fields were introduced and the OPEs the user declared between
//! them. It is filled during setup and read by the engine.

use log::{debug, warn};
use rustc_hash::FxHashMap;
use std::cmp::Ordering;

use vertex_core::{BasisOperator, OpeData, OpeError, OpeResult, Parity};

/// Parity and position of a registered field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Registration {
    parity: Parity,
    position: usize,
}

/// Declared statistics and OPEs of an algebra.
#[derive(Clone, Debug, Default)]
pub struct OpeRegistry {
    /// Registration data by field.
    fields: FxHashMap<BasisOperator, Registration>,
    /// Fields in registration order.
    order: Vec<BasisOperator>,
    /// Declared OPEs by ordered pair.
    opes: FxHashMap<(BasisOperator, BasisOperator), OpeData>,
    /// Bumped on every mutation.
    generation: u64,
}

impl OpeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a field with the given statistics.
    ///
    /// Registering the same field again with the same parity is a no-op.
    /// Returns the field's position in registration order.
    ///
    /// # Errors
    ///
    /// Returns `OpeError::ParityMismatch` if `parity` disagrees with the
    /// field's own statistics, and `OpeError::ParityConflict` if a field
    /// with the same name and indices was registered with the other parity.
    pub fn register(&mut self, op: &BasisOperator, parity: Parity) -> OpeResult<usize> {
        if op.parity() != parity {
            return Err(OpeError::ParityMismatch {
                context: format!("registration of {op}"),
                expected: op.parity(),
                found: parity,
            });
        }

        if let Some(existing) = self.fields.get(op) {
            return Ok(existing.position);
        }

        // Same name and indices but other statistics
        if let Some(other) = self
            .order
            .iter()
            .find(|o| o.name() == op.name() && o.indices() == op.indices())
        {
            return Err(OpeError::ParityConflict {
                operator: op.to_string(),
                declared: other.parity(),
                requested: parity,
            });
        }

        let position = self.order.len();
        self.fields.insert(op.clone(), Registration { parity, position });
        self.order.push(op.clone());
        self.generation += 1;
        debug!("registered {op} as {parity} at position {position}");
        Ok(position)
    }

    /// Registers a batch of bosonic fields.
    ///
    /// # Errors
    ///
    /// Fails like [`register`](Self::register) on the first bad field.
    pub fn bosonic(&mut self, ops: &[BasisOperator]) -> OpeResult<()> {
        for op in ops {
            self.register(op, Parity::Even)?;
        }
        Ok(())
    }

    /// Registers a batch of fermionic fields.
    ///
    /// # Errors
    ///
    /// Fails like [`register`](Self::register) on the first bad field.
    pub fn fermionic(&mut self, ops: &[BasisOperator]) -> OpeResult<()> {
        for op in ops {
            self.register(op, Parity::Odd)?;
        }
        Ok(())
    }

    /// Returns the declared parity, or bosonic for an unregistered field.
    #[must_use]
    pub fn get_parity(&self, op: &BasisOperator) -> Parity {
        self.fields.get(op).map_or(Parity::Even, |r| r.parity)
    }

    /// Returns the registration position.
    #[must_use]
    pub fn position(&self, op: &BasisOperator) -> Option<usize> {
        self.fields.get(op).map(|r| r.position)
    }

    /// Returns true if the field was registered.
    #[must_use]
    pub fn is_registered(&self, op: &BasisOperator) -> bool {
        self.fields.contains_key(op)
    }

    /// Returns the number of registered fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no field is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns the registered fields in registration order.
    pub fn operators(&self) -> impl Iterator<Item = &BasisOperator> {
        self.order.iter()
    }

    /// Returns the number of declared OPEs.
    #[must_use]
    pub fn ope_count(&self) -> usize {
        self.opes.len()
    }

    /// Declares OPE(a, b).
    ///
    /// Fields not yet registered are registered with their own statistics.
    /// A second declaration for the same ordered pair replaces the first.
    ///
    /// # Errors
    ///
    /// Returns `OpeError::ParityMismatch` if some pole coefficient does not
    /// have parity |a| + |b|, and `OpeError::MixedParity` if a coefficient
    /// mixes statistics.
    pub fn define(&mut self, a: &BasisOperator, b: &BasisOperator, data: OpeData) -> OpeResult<()> {
        let expected = a.parity() + b.parity();
        for (n, coeff) in data.poles() {
            let found = coeff.parity()?;
            if found != expected {
                return Err(OpeError::ParityMismatch {
                    context: format!("pole {n} of OPE({a}, {b})"),
                    expected,
                    found,
                });
            }
        }

        self.register(a, a.parity())?;
        self.register(b, b.parity())?;

        debug!("defined OPE({a}, {b}) = {data}");
        if self.opes.insert((a.clone(), b.clone()), data).is_some() {
            warn!("OPE({a}, {b}) was already declared; the new declaration replaces it");
        }
        self.generation += 1;
        Ok(())
    }

    /// Returns the OPE declared for exactly this direction.
    #[must_use]
    pub fn lookup(&self, a: &BasisOperator, b: &BasisOperator) -> Option<&OpeData> {
        self.opes.get(&(a.clone(), b.clone()))
    }

    /// Returns true if OPE(a, b) was declared in this direction.
    #[must_use]
    pub fn has_ope(&self, a: &BasisOperator, b: &BasisOperator) -> bool {
        self.lookup(a, b).is_some()
    }

    /// Orders fields by registration.
    ///
    /// Registered fields come first, by position; unregistered fields
    /// follow in their structural order.
    #[must_use]
    pub fn compare_operators(&self, a: &BasisOperator, b: &BasisOperator) -> Ordering {
        match (self.position(a), self.position(b)) {
            (Some(pa), Some(pb)) => pa.cmp(&pb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.cmp(b),
        }
    }

    /// Removes every field and declaration.
    pub fn clear(&mut self) {
        self.fields.clear();
        self.order.clear();
        self.opes.clear();
        self.generation += 1;
        debug!("cleared registry");
    }

    /// Returns a counter that changes whenever the registry does.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vertex_core::LocalOperator;

    fn t() -> BasisOperator {
        BasisOperator::bosonic("T")
    }

    fn g() -> BasisOperator {
        BasisOperator::fermionic("G")
    }

    #[test]
    fn test_register_idempotent() {
        let mut reg = OpeRegistry::new();
        assert_eq!(reg.register(&t(), Parity::Even), Ok(0));
        assert_eq!(reg.register(&g(), Parity::Odd), Ok(1));
        let generation = reg.generation();
        assert_eq!(reg.register(&t(), Parity::Even), Ok(0));
        assert_eq!(reg.generation(), generation);
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.operators().cloned().collect::<Vec<_>>(), vec![t(), g()]);
    }

    #[test]
    fn test_parity_checks() {
        let mut reg = OpeRegistry::new();
        assert!(matches!(
            reg.register(&t(), Parity::Odd),
            Err(OpeError::ParityMismatch { .. })
        ));
        assert!(reg.is_empty());

        let mut other = OpeRegistry::new();
        other.fermionic(&[g()]).unwrap();
        assert_eq!(other.get_parity(&g()), Parity::Odd);
        assert_eq!(other.get_parity(&t()), Parity::Even);
        assert!(!other.is_registered(&t()));
    }

    #[test]
    fn test_conflicting_registration() {
        let mut reg = OpeRegistry::new();
        reg.bosonic(&[BasisOperator::bosonic("G")]).unwrap();
        assert_eq!(
            reg.register(&g(), Parity::Odd),
            Err(OpeError::ParityConflict {
                operator: "G".to_string(),
                declared: Parity::Even,
                requested: Parity::Odd,
            })
        );
        assert_eq!(reg.len(), 1);

        // Other members of an indexed family are independent
        let j = BasisOperator::bosonic("J");
        reg.bosonic(&[j.index(1)]).unwrap();
        assert_eq!(reg.register(&BasisOperator::fermionic("J").index(2), Parity::Odd), Ok(2));
    }

    #[test]
    fn test_define_validates_grading() {
        let mut reg = OpeRegistry::new();
        reg.bosonic(&[t()]).unwrap();
        reg.fermionic(&[g()]).unwrap();

        // OPE(T, G) must be fermionic
        let bad = OpeData::from_list([LocalOperator::from(t())]);
        assert!(matches!(
            reg.define(&t(), &g(), bad),
            Err(OpeError::ParityMismatch { .. })
        ));

        let good = OpeData::from_list([LocalOperator::from(g())]);
        reg.define(&t(), &g(), good).unwrap();
        assert!(reg.has_ope(&t(), &g()));
        assert!(!reg.has_ope(&g(), &t()));
        assert_eq!(reg.ope_count(), 1);

        let mixed = OpeData::from_list([&LocalOperator::from(t()) + &LocalOperator::from(g())]);
        assert!(matches!(
            reg.define(&t(), &t(), mixed),
            Err(OpeError::MixedParity(_))
        ));
    }

    #[test]
    fn test_define_registers_and_overwrites() {
        let mut reg = OpeRegistry::new();
        let j = BasisOperator::bosonic("J");
        reg.define(&j, &j, OpeData::from_list([LocalOperator::from(1), LocalOperator::from(0)]))
            .unwrap();
        assert!(reg.is_registered(&j));

        reg.define(&j, &j, OpeData::from_list([LocalOperator::from(2), LocalOperator::from(0)]))
            .unwrap();
        assert_eq!(reg.lookup(&j, &j).map(|o| o.pole(2)), Some(LocalOperator::from(2)));
    }

    #[test]
    fn test_compare_operators() {
        let mut reg = OpeRegistry::new();
        reg.bosonic(&[t()]).unwrap();
        reg.fermionic(&[g()]).unwrap();
        let a = BasisOperator::bosonic("A");
        let b = BasisOperator::bosonic("B");

        assert_eq!(reg.compare_operators(&t(), &g()), Ordering::Less);
        assert_eq!(reg.compare_operators(&g(), &t()), Ordering::Greater);
        assert_eq!(reg.compare_operators(&g(), &a), Ordering::Less);
        assert_eq!(reg.compare_operators(&b, &t()), Ordering::Greater);
        assert_eq!(reg.compare_operators(&a, &b), Ordering::Less);
        assert_eq!(reg.compare_operators(&t(), &t()), Ordering::Equal);
    }

    #[test]
    fn test_clear() {
        let mut reg = OpeRegistry::new();
        reg.define(&t(), &t(), OpeData::new()).unwrap();
        let generation = reg.generation();
        reg.clear();
        assert!(reg.is_empty());
        assert_eq!(reg.ope_count(), 0);
        assert!(reg.generation() > generation);
    }
}
