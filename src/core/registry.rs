//! Interning cache for built bases, keyed by canonical descriptor
//! (SPEC_FULL §4.5).

use std::sync::{Arc, RwLock};

use rustc_hash::FxHashMap;

use crate::core::basis::Basis;
use crate::core::builder::BuildError;
use crate::core::descriptor::{Descriptor, RuleKind};

/// Owns `Basis` lifetimes and hands out shared handles keyed by descriptor.
///
/// Construction is serialised by an internal `RwLock`; reads of an
/// already-cached basis take only a read lock. If two threads race to build
/// the same descriptor, exactly one build runs and both receive the same
/// `Arc`.
#[derive(Debug, Default)]
pub struct Registry {
    bases: RwLock<FxHashMap<Descriptor, Arc<Basis>>>,
}

impl Registry {
    /// Builds an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Registry { bases: RwLock::new(FxHashMap::default()) }
    }

    /// Returns the cached basis for `descriptor`, building and caching it if
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the descriptor's basis cannot be built; the
    /// registry is left unchanged.
    pub fn fetch_or_build(&self, descriptor: &Descriptor) -> Result<Arc<Basis>, BuildError> {
        if let Some(basis) = self.bases.read().unwrap_or_else(|e| e.into_inner()).get(descriptor) {
            return Ok(Arc::clone(basis));
        }

        let mut bases = self.bases.write().unwrap_or_else(|e| e.into_inner());
        if let Some(basis) = bases.get(descriptor) {
            return Ok(Arc::clone(basis));
        }

        let basis = Arc::new(Basis::build(descriptor.clone())?);
        bases.insert(descriptor.clone(), Arc::clone(&basis));
        Ok(basis)
    }

    /// Returns a companion basis with every Hermite-family 1-D rule (cubic
    /// Hermite, Lagrange-Hermite, Hermite-Lagrange) replaced by linear
    /// Lagrange, leaving all other rules unchanged. Returns `basis` itself,
    /// unchanged, if it carries no Hermite rule. Useful to callers that need
    /// to share node connectivity across bases with differing derivative
    /// conventions.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the rewritten descriptor fails to build; an
    /// already-valid descriptor with only its Hermite rules substituted for
    /// linear Lagrange cannot fail validation, so this is unreachable in
    /// practice.
    pub fn connectivity_basis(&self, basis: &Arc<Basis>) -> Result<Arc<Basis>, BuildError> {
        let descriptor = basis.descriptor();
        let dim = descriptor.dimension();
        let mut changed = false;
        let diag: Vec<RuleKind> = (0..dim)
            .map(|k| match descriptor.rule_at(k) {
                RuleKind::CubicHermite | RuleKind::LagrangeHermite | RuleKind::HermiteLagrange => {
                    changed = true;
                    RuleKind::LinearLagrange
                }
                other => other,
            })
            .collect();

        if !changed {
            return Ok(Arc::clone(basis));
        }

        let simplex = descriptor.simplex_group().cloned();
        let polygon = descriptor.polygon_group();
        let rewritten = Descriptor::new(diag, simplex, polygon)?;
        self.fetch_or_build(&rewritten)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn fetch_or_build_returns_the_same_handle_twice() {
        let registry = Registry::new();
        let d: Descriptor = "l.Lagrange".parse().unwrap();
        let a = registry.fetch_or_build(&d).unwrap();
        let b = registry.fetch_or_build(&d).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn connectivity_basis_replaces_hermite_with_linear_lagrange() {
        let registry = Registry::new();
        let d: Descriptor = "c.Hermite".parse().unwrap();
        let basis = registry.fetch_or_build(&d).unwrap();
        let connectivity = registry.connectivity_basis(&basis).unwrap();
        assert_eq!(connectivity.descriptor().rule_at(0), RuleKind::LinearLagrange);
        assert_eq!(connectivity.parameter_count(), 2);
    }

    #[test]
    fn connectivity_basis_is_idempotent() {
        let registry = Registry::new();
        let d: Descriptor = "c.Hermite".parse().unwrap();
        let basis = registry.fetch_or_build(&d).unwrap();
        let once = registry.connectivity_basis(&basis).unwrap();
        let twice = registry.connectivity_basis(&once).unwrap();
        assert!(Arc::ptr_eq(&once, &twice));
    }

    #[test]
    fn connectivity_basis_returns_input_when_nothing_changes() {
        let registry = Registry::new();
        let d: Descriptor = "l.Lagrange".parse().unwrap();
        let basis = registry.fetch_or_build(&d).unwrap();
        let connectivity = registry.connectivity_basis(&basis).unwrap();
        assert!(Arc::ptr_eq(&basis, &connectivity));
    }
}
