//! Constraint closure: turning propositions into store bounds.
//!
//! `close` walks a proposition produced by the simplification engine,
//! resolves atomic `IsSubtype` assertions into bound updates on the
//! inference store, and keeps the store transitively closed: whenever a
//! *new* bound lands on a variable, every existing bound on the opposite
//! side is re-simplified against it and the result is closed recursively.
//!
//! Termination: closure only recurses when the store actually changed, the
//! idempotent inserts filter re-derived bounds, and a propagation budget
//! bounds pathological growth from adversarial hierarchies. Reaching the
//! budget is a documented trade-off, not an error: the engine simply stops
//! looking for further implied bounds.

use crate::diagnostics::{FailureSink, NullSink, SubtypeFailure};
use crate::goal::{Coercion, SubtypeGoal};
use crate::hierarchy::ClassHierarchy;
use crate::intern::TypeInterner;
use crate::prop::Prop;
use crate::store::InferenceStore;
use crate::subtype::SubtypeSimplifier;
use crate::types::{InferId, InternalType, TypeData};
use tracing::{debug, trace};

/// Default number of bound-propagation rounds per top-level goal.
pub const DEFAULT_PROPAGATION_BUDGET: u32 = 20;

/// Walks propositions and materializes bounds on the inference store.
///
/// The store type must be `Clone` so disjunct trials can run against a
/// scratch copy and commit only on success.
pub struct ConstraintCloser<'a, H: ClassHierarchy + ?Sized, S: InferenceStore + Clone> {
    db: &'a TypeInterner,
    hierarchy: &'a H,
    store: &'a mut S,
    budget: u32,
}

impl<'a, H: ClassHierarchy + ?Sized, S: InferenceStore + Clone> ConstraintCloser<'a, H, S> {
    pub fn new(db: &'a TypeInterner, hierarchy: &'a H, store: &'a mut S) -> Self {
        Self {
            db,
            hierarchy,
            store,
            budget: DEFAULT_PROPAGATION_BUDGET,
        }
    }

    pub fn with_budget(mut self, budget: u32) -> Self {
        self.budget = budget;
        self
    }

    /// Close the store under a proposition. Every failure encountered is
    /// reported to `sink`; the first one is also returned so callers can
    /// branch without consulting the sink.
    pub fn close(&mut self, prop: &Prop, sink: &mut dyn FailureSink) -> Option<SubtypeFailure> {
        match prop {
            Prop::Valid => None,
            Prop::Unsat(lazy) => {
                let failure = lazy.force();
                sink.report(failure.clone());
                Some(failure)
            }
            // Keep going past a failing conjunct to surface as many
            // failures as possible.
            Prop::Conj(props) => {
                let mut first = None;
                for p in props {
                    if let Some(failure) = self.close(p, sink) {
                        first.get_or_insert(failure);
                    }
                }
                first
            }
            Prop::Disj(fail, props) => {
                let pruned = self.prune_dominated_disjuncts(props);
                for p in &pruned {
                    let mut trial_store = self.store.clone();
                    let mut trial = ConstraintCloser {
                        db: self.db,
                        hierarchy: self.hierarchy,
                        store: &mut trial_store,
                        budget: self.budget,
                    };
                    if trial.close(p, &mut NullSink).is_none() {
                        // Commit the first disjunct that closes cleanly.
                        let remaining = trial.budget;
                        *self.store = trial_store;
                        self.budget = remaining;
                        return None;
                    }
                }
                let failure = fail.force();
                sink.report(failure.clone());
                Some(failure)
            }
            Prop::IsSubtype(coercion, a, b) => self.close_atomic(*coercion, a, b, sink),
        }
    }

    // =========================================================================
    // Atomic assertions
    // =========================================================================

    fn close_atomic(
        &mut self,
        coercion: Coercion,
        a: &InternalType,
        b: &InternalType,
        sink: &mut dyn FailureSink,
    ) -> Option<SubtypeFailure> {
        let a_var = self.as_var(a);
        let b_var = self.as_var(b);

        match (a_var, b_var) {
            (Some(v), Some(w)) if v == w => None,
            (Some(v), _) => {
                let mut first = self.register_upper(v, b.clone(), coercion, sink);
                if let Some(w) = b_var {
                    if let Some(failure) = self.register_lower(w, a.clone(), coercion, sink) {
                        first.get_or_insert(failure);
                    }
                }
                first
            }
            (None, Some(w)) => self.register_lower(w, a.clone(), coercion, sink),
            // Concrete-vs-concrete leaves do not normally occur; make
            // progress by re-simplifying.
            (None, None) => {
                let prop = self.simplify_pair(coercion, a, b);
                self.close(&prop, sink)
            }
        }
    }

    fn as_var(&self, ty: &InternalType) -> Option<InferId> {
        let id = ty.as_ty()?;
        match *self.db.lookup(id) {
            TypeData::Var(v) => Some(v),
            _ => None,
        }
    }

    /// Register `bound` as a new upper bound of `v`, then re-check every
    /// existing lower bound of `v` against it (the transitive-closure
    /// step).
    fn register_upper(
        &mut self,
        v: InferId,
        bound: InternalType,
        coercion: Coercion,
        sink: &mut dyn FailureSink,
    ) -> Option<SubtypeFailure> {
        if !self.store.add_upper_bound(v, bound.clone()) {
            return None;
        }
        trace!(?v, "new upper bound");
        if !self.spend_budget() {
            return None;
        }
        let lowers = self.store.lower_bounds(v);
        let mut first = None;
        for lower in lowers {
            let prop = self.simplify_pair(coercion, &lower, &bound);
            if let Some(failure) = self.close(&prop, sink) {
                first.get_or_insert(failure);
            }
        }
        first
    }

    /// Register `bound` as a new lower bound of `v`, then re-check it
    /// against every existing upper bound of `v`.
    fn register_lower(
        &mut self,
        v: InferId,
        bound: InternalType,
        coercion: Coercion,
        sink: &mut dyn FailureSink,
    ) -> Option<SubtypeFailure> {
        if !self.store.add_lower_bound(v, bound.clone()) {
            return None;
        }
        trace!(?v, "new lower bound");
        if !self.spend_budget() {
            return None;
        }
        let uppers = self.store.upper_bounds(v);
        let mut first = None;
        for upper in uppers {
            let prop = self.simplify_pair(coercion, &bound, &upper);
            if let Some(failure) = self.close(&prop, sink) {
                first.get_or_insert(failure);
            }
        }
        first
    }

    fn spend_budget(&mut self) -> bool {
        if self.budget == 0 {
            // Deliberate incompleteness: stop searching for implied
            // bounds rather than risking unbounded growth.
            debug!("propagation budget exhausted; skipping transitive closure step");
            return false;
        }
        self.budget -= 1;
        true
    }

    fn simplify_pair(&self, coercion: Coercion, a: &InternalType, b: &InternalType) -> Prop {
        let goal = SubtypeGoal::new(a.clone(), b.clone()).with_coercion(coercion);
        let mut simplifier =
            SubtypeSimplifier::new(self.db, self.hierarchy).with_store(&*self.store);
        simplifier.simplify(&goal)
    }

    // =========================================================================
    // Disjunction redundancy pre-pass
    // =========================================================================

    /// Drop disjuncts whose candidate bound is provably dominated by
    /// another candidate on the same variable and side.
    ///
    /// Among candidate lower bounds, a bound below another candidate is
    /// implied by it transitively; dually for upper bounds. This is purely
    /// an optimization — committing semantics never depend on it — and it
    /// is deliberately not exhaustive (nested conjunctions are left
    /// alone).
    fn prune_dominated_disjuncts(&self, disjuncts: &[Prop]) -> Vec<Prop> {
        #[derive(Copy, Clone, PartialEq, Eq)]
        enum Side {
            Lower,
            Upper,
        }

        let candidates: Vec<Option<(Side, InferId, InternalType)>> = disjuncts
            .iter()
            .map(|p| match p {
                Prop::IsSubtype(_, a, b) => match (self.as_var(a), self.as_var(b)) {
                    (None, Some(v)) => Some((Side::Lower, v, a.clone())),
                    (Some(v), None) => Some((Side::Upper, v, b.clone())),
                    _ => None,
                },
                _ => None,
            })
            .collect();

        let is_sub = |x: &InternalType, y: &InternalType| -> bool {
            let goal = SubtypeGoal::new(x.clone(), y.clone());
            let mut simplifier =
                SubtypeSimplifier::new(self.db, self.hierarchy).with_store(&*self.store);
            simplifier.simplify(&goal).is_valid()
        };

        let mut keep = vec![true; disjuncts.len()];
        for (i, candidate) in candidates.iter().enumerate() {
            let Some((side, var, ty)) = candidate else {
                continue;
            };
            let (side, var) = (*side, *var);
            for (j, other) in candidates.iter().enumerate() {
                if i == j || !keep[j] {
                    continue;
                }
                let Some((other_side, other_var, other_ty)) = other else {
                    continue;
                };
                if side != *other_side || var != *other_var || ty == other_ty {
                    continue;
                }
                let dominated = match side {
                    Side::Lower => is_sub(ty, other_ty),
                    Side::Upper => is_sub(other_ty, ty),
                };
                // On mutual domination keep the earlier disjunct.
                let mutual = match side {
                    Side::Lower => is_sub(other_ty, ty),
                    Side::Upper => is_sub(ty, other_ty),
                };
                if dominated && (!mutual || j < i) {
                    keep[i] = false;
                    break;
                }
            }
        }

        disjuncts
            .iter()
            .zip(keep.iter())
            .filter(|&(_, &k)| k)
            .map(|(p, _)| p.clone())
            .collect()
    }
}

/// Simplify a goal and immediately close the store under the result.
pub fn close_goal<H: ClassHierarchy + ?Sized, S: InferenceStore + Clone>(
    db: &TypeInterner,
    hierarchy: &H,
    store: &mut S,
    goal: &SubtypeGoal,
    sink: &mut dyn FailureSink,
) -> Option<SubtypeFailure> {
    let prop = {
        let mut simplifier = SubtypeSimplifier::new(db, hierarchy).with_store(&*store);
        simplifier.simplify(goal)
    };
    ConstraintCloser::new(db, hierarchy, store).close(&prop, sink)
}

#[cfg(test)]
#[path = "../tests/closure_tests.rs"]
mod tests;
