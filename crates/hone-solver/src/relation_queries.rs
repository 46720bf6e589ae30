//! Unified relation query entrypoints.
//!
//! Thin, total, boolean-returning wrappers over the simplification engine
//! for call sites that just need a yes/no answer. None of these mutate the
//! inference store; callers that need bound registration use the
//! constraint closure directly.

use crate::disjoint::DisjointnessOracle;
use crate::goal::{CheckMode, SubtypeGoal};
use crate::hierarchy::ClassHierarchy;
use crate::intern::TypeInterner;
use crate::store::InferenceStore;
use crate::subtype::SubtypeSimplifier;
use crate::types::TypeId;

/// Relation categories supported by the unified query API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// Plain subtyping: the proposition must reduce to exactly `Valid`.
    Subtype,
    /// Union-membership subtyping: goals blocked only on inference
    /// variables resolve to true, so open types fold into existing
    /// union/intersection lists instead of staying pending.
    SubtypeForUnion,
    /// Subtyping exact with respect to known bounds only; generic
    /// parameters get no optimistic fallback.
    SubtypeIgnoringGenerics,
    /// Provable disjointness.
    Disjoint,
}

/// Result of a relation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationResult {
    pub kind: RelationKind,
    pub related: bool,
    /// A recursion limit was hit; the answer is conservative.
    pub budget_exceeded: bool,
}

impl RelationResult {
    #[inline]
    pub fn is_related(self) -> bool {
        self.related
    }
}

/// Query a relation between two types.
pub fn query_relation<H: ClassHierarchy + ?Sized>(
    db: &TypeInterner,
    hierarchy: &H,
    store: Option<&dyn InferenceStore>,
    sub: TypeId,
    sup: TypeId,
    kind: RelationKind,
) -> RelationResult {
    let (related, budget_exceeded) = match kind {
        RelationKind::Subtype => {
            let mut simplifier = simplifier(db, hierarchy, store);
            let prop = simplifier.simplify(&SubtypeGoal::new(sub, sup));
            (prop.is_valid(), simplifier.budget_exceeded())
        }
        RelationKind::SubtypeForUnion => {
            let mut simplifier = simplifier(db, hierarchy, store);
            let goal = SubtypeGoal::new(sub, sup).with_mode(CheckMode::for_union());
            let prop = simplifier.simplify(&goal);
            (prop.valid_if_open(), simplifier.budget_exceeded())
        }
        RelationKind::SubtypeIgnoringGenerics => {
            let mut simplifier = simplifier(db, hierarchy, store);
            let goal = SubtypeGoal::new(sub, sup).with_mode(CheckMode::complete());
            let prop = simplifier.simplify(&goal);
            (prop.is_valid(), simplifier.budget_exceeded())
        }
        RelationKind::Disjoint => {
            let mut oracle = DisjointnessOracle::new(db, hierarchy, store);
            (oracle.disjoint(sub, sup), false)
        }
    };
    RelationResult {
        kind,
        related,
        budget_exceeded,
    }
}

fn simplifier<'a, H: ClassHierarchy + ?Sized>(
    db: &'a TypeInterner,
    hierarchy: &'a H,
    store: Option<&'a dyn InferenceStore>,
) -> SubtypeSimplifier<'a, H> {
    let simplifier = SubtypeSimplifier::new(db, hierarchy);
    match store {
        Some(store) => simplifier.with_store(store),
        None => simplifier,
    }
}

/// `sub <: sup`, ignoring any inference-variable bounds.
pub fn is_subtype<H: ClassHierarchy + ?Sized>(
    db: &TypeInterner,
    hierarchy: &H,
    sub: TypeId,
    sup: TypeId,
) -> bool {
    query_relation(db, hierarchy, None, sub, sup, RelationKind::Subtype).is_related()
}

/// `sub <: sup` for union-folding purposes.
pub fn is_subtype_for_union<H: ClassHierarchy + ?Sized>(
    db: &TypeInterner,
    hierarchy: &H,
    store: Option<&dyn InferenceStore>,
    sub: TypeId,
    sup: TypeId,
) -> bool {
    query_relation(db, hierarchy, store, sub, sup, RelationKind::SubtypeForUnion).is_related()
}

/// `sub <: sup`, exact with respect to known generic bounds.
pub fn is_subtype_ignoring_generics<H: ClassHierarchy + ?Sized>(
    db: &TypeInterner,
    hierarchy: &H,
    sub: TypeId,
    sup: TypeId,
) -> bool {
    query_relation(db, hierarchy, None, sub, sup, RelationKind::SubtypeIgnoringGenerics)
        .is_related()
}

/// Whether `a` and `b` provably share no inhabitant.
pub fn are_disjoint<H: ClassHierarchy + ?Sized>(
    db: &TypeInterner,
    hierarchy: &H,
    store: Option<&dyn InferenceStore>,
    a: TypeId,
    b: TypeId,
) -> bool {
    query_relation(db, hierarchy, store, a, b, RelationKind::Disjoint).is_related()
}

#[cfg(test)]
#[path = "../tests/relation_queries_tests.rs"]
mod tests;
