//! The inference-variable store boundary.
//!
//! Inference variables are created and solved elsewhere; this engine only
//! reads bounds during simplification and adds bounds during constraint
//! closure. The narrow [`InferenceStore`] trait captures exactly that, and
//! its additions report whether the set actually changed — the constraint
//! closure's termination argument is a monotone fixpoint over these finite
//! sets and depends on that signal.

use crate::types::{InferId, InternalType};
use indexmap::IndexSet;
use rustc_hash::FxHashMap;

/// Read/write access to per-variable bound sets.
///
/// Additions must be idempotent: adding an already-present bound is a
/// no-op returning `false`. Bounds are never removed.
pub trait InferenceStore {
    fn lower_bounds(&self, id: InferId) -> Vec<InternalType>;
    fn upper_bounds(&self, id: InferId) -> Vec<InternalType>;
    /// Returns `true` iff the bound set changed.
    fn add_lower_bound(&mut self, id: InferId, bound: InternalType) -> bool;
    /// Returns `true` iff the bound set changed.
    fn add_upper_bound(&mut self, id: InferId, bound: InternalType) -> bool;
}

type BoundSet = IndexSet<InternalType, rustc_hash::FxBuildHasher>;

#[derive(Clone, Debug, Default)]
struct VarBounds {
    lower: BoundSet,
    upper: BoundSet,
}

/// Map-backed store with insertion-ordered, deduplicated bound sets.
///
/// `Clone` is cheap enough for the closure's disjunct trials
/// (clone-and-commit); embedders with their own store can do the same or
/// accept first-disjunct commitment.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    vars: FxHashMap<InferId, VarBounds>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Variables that have at least one bound.
    pub fn constrained_vars(&self) -> Vec<InferId> {
        let mut ids: Vec<InferId> = self
            .vars
            .iter()
            .filter(|(_, b)| !b.lower.is_empty() || !b.upper.is_empty())
            .map(|(&id, _)| id)
            .collect();
        ids.sort_unstable();
        ids
    }
}

impl InferenceStore for InMemoryStore {
    fn lower_bounds(&self, id: InferId) -> Vec<InternalType> {
        self.vars
            .get(&id)
            .map(|b| b.lower.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn upper_bounds(&self, id: InferId) -> Vec<InternalType> {
        self.vars
            .get(&id)
            .map(|b| b.upper.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn add_lower_bound(&mut self, id: InferId, bound: InternalType) -> bool {
        self.vars.entry(id).or_default().lower.insert(bound)
    }

    fn add_upper_bound(&mut self, id: InferId, bound: InternalType) -> bool {
        self.vars.entry(id).or_default().upper.insert(bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeId;

    #[test]
    fn additions_are_idempotent() {
        let mut store = InMemoryStore::new();
        let v = InferId(0);
        assert!(store.add_lower_bound(v, InternalType::Ty(TypeId::INT)));
        assert!(!store.add_lower_bound(v, InternalType::Ty(TypeId::INT)));
        assert_eq!(store.lower_bounds(v).len(), 1);
    }

    #[test]
    fn bounds_are_kept_per_side() {
        let mut store = InMemoryStore::new();
        let v = InferId(3);
        assert!(store.add_lower_bound(v, InternalType::Ty(TypeId::INT)));
        assert!(store.add_upper_bound(v, InternalType::Ty(TypeId::NUM)));
        assert_eq!(store.lower_bounds(v), vec![InternalType::Ty(TypeId::INT)]);
        assert_eq!(store.upper_bounds(v), vec![InternalType::Ty(TypeId::NUM)]);
    }
}
