//! The subtype simplification engine.
//!
//! `simplify` reduces a subtype goal to a [`Prop`]: `Valid`, `Unsat` with a
//! deferred failure, a conjunction/disjunction of residual goals, or an
//! atomic `IsSubtype` assertion mentioning an inference variable. It never
//! raises for control flow and never mutates the inference store — turning
//! deferred assertions into bounds is the constraint closure's job.
//!
//! ## Dispatch
//!
//! The engine decomposes on the supertype's outermost shape first and falls
//! back to the subtype's shape when the supertype gives no leverage, with
//! one deliberate exception: a union (or nullable) *subtype* always
//! decomposes first, because `(a|b) <: u ⟺ a <: u ∧ b <: u` is sound and
//! complete while `t <: (u1|u2)` as a disjunction is merely sound.
//!
//! Rule families that need room live in `subtype_rules/`; this module owns
//! the dispatcher, the union/intersection/nullable/generic rules, and the
//! gradual-typing overlay.

use crate::diagnostics::{FailureKind, FixHint, LazyFailure, SubtypeFailure};
use crate::disjoint::DisjointnessOracle;
use crate::goal::{Coercion, SubtypeGoal};
use crate::hierarchy::ClassHierarchy;
use crate::intern::TypeInterner;
use crate::prop::Prop;
use crate::recursion::{RecursionGuard, RecursionProfile};
use crate::store::InferenceStore;
use crate::types::{InternalType, NegKind, PrimKind, TypeData, TypeId};
use crate::visited::GoalSide;
use hone_common::Atom;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::trace;

/// Red zone / growth amounts for `stacker` on the recursive descent.
const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROW: usize = 1024 * 1024;

/// The simplification engine.
///
/// Holds only shared context; all per-goal state travels inside the
/// [`SubtypeGoal`] record, so a simplifier can be reused across goals.
pub struct SubtypeSimplifier<'a, H: ClassHierarchy + ?Sized> {
    pub(crate) db: &'a TypeInterner,
    pub(crate) hierarchy: &'a H,
    /// Read-only view of the inference store, consulted by the
    /// disjointness oracle for variable bounds. Never written.
    pub(crate) store: Option<&'a dyn InferenceStore>,
    guard: RecursionGuard,
}

impl<'a, H: ClassHierarchy + ?Sized> SubtypeSimplifier<'a, H> {
    pub fn new(db: &'a TypeInterner, hierarchy: &'a H) -> Self {
        Self {
            db,
            hierarchy,
            store: None,
            guard: RecursionGuard::new(RecursionProfile::SubtypeSimplify),
        }
    }

    pub fn with_store(mut self, store: &'a dyn InferenceStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Whether a recursion limit was hit while simplifying.
    pub fn budget_exceeded(&self) -> bool {
        self.guard.is_exceeded()
    }

    // =========================================================================
    // Entry point
    // =========================================================================

    /// Reduce a goal to a proposition.
    pub fn simplify(&mut self, goal: &SubtypeGoal) -> Prop {
        if !self.guard.enter() {
            return self.invalid(goal, FailureKind::BudgetExceeded);
        }
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW, || self.simplify_inner(goal));
        self.guard.leave();
        result
    }

    fn simplify_inner(&mut self, goal: &SubtypeGoal) -> Prop {
        match (&goal.sub, &goal.sup) {
            (InternalType::Ty(sub), InternalType::Ty(sup)) => self.simplify_ty(*sub, *sup, goal),
            (InternalType::Ty(sub), InternalType::Cstr(cstr)) => {
                self.simplify_constraint_sup(*sub, cstr, goal)
            }
            (InternalType::Cstr(sub), InternalType::Cstr(sup)) => {
                if sub == sup {
                    Prop::Valid
                } else {
                    self.invalid(goal, FailureKind::ConstraintMismatch)
                }
            }
            // A constraint type is an obligation, not a value type; nothing
            // nominal or structural sits above it.
            (InternalType::Cstr(_), InternalType::Ty(_)) => {
                self.invalid(goal, FailureKind::ConstraintMismatch)
            }
        }
    }

    // =========================================================================
    // Type-vs-type dispatch
    // =========================================================================

    fn simplify_ty(&mut self, sub: TypeId, sup: TypeId, goal: &SubtypeGoal) -> Prop {
        // Physical identity. Interning makes this exact; the structural
        // rules below remain correct without it.
        if sub == sup {
            return Prop::Valid;
        }

        let sub_data = self.db.lookup(sub);
        let sup_data = self.db.lookup(sup);

        trace!(?sub, ?sup, "simplify");

        // Inference variables defer to the constraint closure.
        if let TypeData::Var(v) = *sub_data {
            if matches!(*sup_data, TypeData::Var(w) if w == v) {
                return Prop::Valid;
            }
            return Prop::IsSubtype(goal.coercion, goal.sub.clone(), goal.sup.clone());
        }
        if matches!(*sup_data, TypeData::Var(_)) {
            return Prop::IsSubtype(goal.coercion, goal.sub.clone(), goal.sup.clone());
        }

        // Top/bottom shortcuts. The slow paths below decide these goals
        // identically; the flag only suppresses the shortcut.
        if !goal.mode.no_top_bottom {
            if sub == TypeId::NOTHING {
                return Prop::Valid;
            }
            if sup == TypeId::MIXED {
                return Prop::Valid;
            }
        }

        // Supertype under supportdyn.
        if let TypeData::SupportsDynamic(inner) = *sup_data {
            return self.simplify_supportdyn_sup(sub, inner, goal);
        }

        // Union-ish on the left: sound and complete, beats every
        // supertype-side rule.
        match &*sub_data {
            TypeData::Union(members) => {
                let mut props = Vec::with_capacity(members.len());
                for &m in members {
                    props.push(self.simplify(&goal.retry(m, sup)));
                }
                return Prop::conj(props);
            }
            TypeData::Nullable(inner) => {
                return Prop::conj2(
                    self.simplify(&goal.retry(TypeId::NULL, sup)),
                    self.simplify(&goal.retry(*inner, sup)),
                );
            }
            _ => {}
        }

        // Intersection on the right: all conjuncts must hold.
        if let TypeData::Intersection(members) = &*sup_data {
            let mut props = Vec::with_capacity(members.len());
            for &m in members {
                props.push(self.simplify(&goal.retry(sub, m)));
            }
            return Prop::conj(props);
        }

        // Subtype under supportdyn: its inhabitants are inhabitants of the
        // inner type, so strip the wrapper, remembering the dynamic
        // license.
        if let TypeData::SupportsDynamic(inner) = *sub_data {
            if sup == TypeId::DYNAMIC {
                return Prop::Valid;
            }
            let mut stripped = goal.retry(inner, sup);
            stripped.sub_supportdyn = Some(goal.sub_span);
            return self.simplify(&stripped);
        }

        // Nullable / union on the right.
        if let TypeData::Nullable(inner) = *sup_data {
            return self.simplify_nullable_sup(sub, inner, goal);
        }
        if let TypeData::Union(members) = &*sup_data {
            return self.simplify_union_sup(sub, &sub_data, members, goal);
        }

        // Intersection on the left.
        if let TypeData::Intersection(members) = &*sub_data {
            return self.simplify_intersection_sub(members, sup, goal);
        }

        // Generic parameters: explore declared bounds under the visited
        // guard.
        let sub_generic = matches!(&*sub_data, TypeData::Generic(..));
        let sup_generic = matches!(&*sup_data, TypeData::Generic(..));
        if sub_generic || sup_generic {
            return self.simplify_generic(sub, &sub_data, sup, &sup_data, goal);
        }

        // The gradual type.
        if sup == TypeId::DYNAMIC {
            return self.simplify_dynamic_sup(sub, &sub_data, goal);
        }
        if sub == TypeId::DYNAMIC {
            return self.simplify_dynamic_sub(goal);
        }

        // Nonnull.
        if sup == TypeId::NONNULL {
            return if self.ty_excludes_null(sub) {
                Prop::Valid
            } else {
                self.invalid_fix(goal, FailureKind::NullabilityMismatch, FixHint::CheckForNull)
            };
        }
        if sub == TypeId::NONNULL {
            // Every supertype that could contain all of nonnull was
            // handled above.
            return self.invalid(goal, FailureKind::Mismatch);
        }

        // Negation supertypes reduce to disjointness; negation subtypes
        // against the remaining concrete supertypes cannot hold.
        if let TypeData::Neg(kind) = *sup_data {
            return self.simplify_neg_sup(sub, kind, goal);
        }
        if matches!(*sub_data, TypeData::Neg(_)) {
            return self.invalid(goal, FailureKind::Mismatch);
        }

        // Opaque newtypes and dependent types.
        if let TypeData::Newtype(n1, args1, bound1) = &*sub_data {
            if let TypeData::Newtype(n2, args2, _) = &*sup_data {
                if n1 == n2 {
                    return self.simplify_newtype_args(*n1, args1, args2, goal);
                }
            }
            return self.simplify(&goal.retry(*bound1, sup));
        }
        if let TypeData::Newtype(n2, args2, _) = &*sup_data {
            // A case type may be transparent in this context.
            if let Some(body) = self.hierarchy.expand_newtype(*n2, args2) {
                return self.simplify(&goal.retry(sub, body));
            }
            return self.invalid(goal, FailureKind::Mismatch);
        }
        if let TypeData::Dependent(_, bound) = &*sub_data {
            return self.simplify(&goal.retry(*bound, sup));
        }
        if matches!(*sup_data, TypeData::Dependent(..)) {
            // Only identity inhabits a dependent supertype, and identity
            // was already checked.
            return self.invalid(goal, FailureKind::Mismatch);
        }

        // Concrete structural pairs.
        match (&*sub_data, &*sup_data) {
            (TypeData::Prim(a), TypeData::Prim(b)) => {
                if a.is_subtype_of(*b) {
                    Prop::Valid
                } else {
                    self.invalid(goal, FailureKind::Mismatch)
                }
            }
            (TypeData::Class(c1), TypeData::Class(c2)) => self.simplify_class(c1, sup, c2, goal),
            (TypeData::Tuple(subs), TypeData::Tuple(sups)) => self.simplify_tuple(subs, sups, goal),
            (TypeData::Shape(s1), TypeData::Shape(s2)) => self.simplify_shape(s1, s2, goal),
            (TypeData::Function(f1), TypeData::Function(f2)) => self.simplify_function(f1, f2, goal),
            _ => self.invalid(goal, FailureKind::Mismatch),
        }
    }

    // =========================================================================
    // Union / nullable / intersection rules
    // =========================================================================

    /// `sub <: ?inner`.
    fn simplify_nullable_sup(&mut self, sub: TypeId, inner: TypeId, goal: &SubtypeGoal) -> Prop {
        if sub == TypeId::NULL {
            return Prop::Valid;
        }
        if self.ty_excludes_null(sub) {
            return self.simplify(&goal.retry(sub, inner));
        }
        // Harvest mode commits to the interesting branch instead of a
        // disjunction: complete for constraint collection, possibly
        // unsound.
        if !goal.mode.require_soundness {
            return self.simplify(&goal.retry(sub, inner));
        }
        // Retain the full decomposition `sub <: null | inner`.
        let fail = self.lazy_failure(goal, FailureKind::NullabilityMismatch);
        let branches = vec![
            self.simplify(&goal.retry(sub, inner)),
            self.simplify(&goal.retry(sub, TypeId::NULL)),
        ];
        Prop::disj(fail, branches)
    }

    /// `sub <: (u1 | ... | un)` for a non-union `sub`.
    fn simplify_union_sup(
        &mut self,
        sub: TypeId,
        sub_data: &TypeData,
        members: &[TypeId],
        goal: &SubtypeGoal,
    ) -> Prop {
        // Identity membership is a cheap complete witness.
        if members.contains(&sub) {
            return Prop::Valid;
        }
        // A union that contains `dynamic` is a like type for its other
        // members: branches may push the liked flag down.
        let contains_dynamic = members.contains(&TypeId::DYNAMIC);

        let fail = self.lazy_failure(goal, FailureKind::Mismatch);
        let mut branches: SmallVec<[Prop; 4]> = SmallVec::new();
        for &m in members {
            let mut branch = goal.retry(sub, m);
            if contains_dynamic && m != TypeId::DYNAMIC {
                branch.sup_liked = true;
            }
            branches.push(self.simplify(&branch));
        }

        // Abstract subtypes additionally admit their declared bounds as
        // witnesses, and the composite primitives decompose into their
        // exact members; a member-wise match is not complete for either.
        let sup_ty = self.union_of(members);
        match sub_data {
            TypeData::Generic(name, _) => {
                for bound in self.hierarchy.generic_upper_bounds(*name) {
                    if let Some(visited) =
                        goal.visited.try_add(*name, GoalSide::Upper, &goal.sup)
                    {
                        branches.push(self.simplify(&goal.with_visited(visited).retry(bound, sup_ty)));
                    }
                }
            }
            TypeData::Newtype(_, _, bound) | TypeData::Dependent(_, bound) => {
                branches.push(self.simplify(&goal.retry(*bound, sup_ty)));
            }
            // arraykey is exactly int|string, num exactly int|float.
            TypeData::Prim(PrimKind::Arraykey) => {
                branches.push(Prop::conj2(
                    self.simplify(&goal.retry(TypeId::INT, sup_ty)),
                    self.simplify(&goal.retry(TypeId::STRING, sup_ty)),
                ));
            }
            TypeData::Prim(PrimKind::Num) => {
                branches.push(Prop::conj2(
                    self.simplify(&goal.retry(TypeId::INT, sup_ty)),
                    self.simplify(&goal.retry(TypeId::FLOAT, sup_ty)),
                ));
            }
            _ => {}
        }

        Prop::disj(fail, branches.into_vec())
    }

    fn union_of(&self, members: &[TypeId]) -> TypeId {
        self.db.union(members.to_vec())
    }

    /// `(t1 & ... & tn) <: sup`.
    fn simplify_intersection_sub(
        &mut self,
        members: &[TypeId],
        sup: TypeId,
        goal: &SubtypeGoal,
    ) -> Prop {
        // A provably uninhabited intersection is below everything.
        if self.intersection_is_empty(members) {
            return Prop::Valid;
        }

        // Sharper rewrite when a conjunct is a negation:
        // `A & ¬B <: C ⟺ A <: C | B` avoids a spurious disjunction.
        if let Some(idx) = members.iter().position(|&m| {
            matches!(&*self.db.lookup(m), TypeData::Neg(_))
        }) {
            if let TypeData::Neg(kind) = &*self.db.lookup(members[idx]) {
                let negated = self.neg_target_type(*kind);
                let mut rest: Vec<TypeId> = members.to_vec();
                rest.remove(idx);
                let rest_ty = self.db.intersection(rest);
                let widened_sup = self.db.union2(sup, negated);
                return self.simplify(&goal.retry(rest_ty, widened_sup));
            }
        }

        // Sound but incomplete: one conjunct below the supertype suffices.
        let fail = self.lazy_failure(goal, FailureKind::Mismatch);
        let mut branches = Vec::with_capacity(members.len());
        for &m in members {
            branches.push(self.simplify(&goal.retry(m, sup)));
        }
        Prop::disj(fail, branches)
    }

    pub(crate) fn intersection_is_empty(&self, members: &[TypeId]) -> bool {
        let mut oracle = DisjointnessOracle::new(self.db, self.hierarchy, self.store);
        for (i, &a) in members.iter().enumerate() {
            for &b in &members[i + 1..] {
                if oracle.disjoint(a, b) {
                    return true;
                }
            }
        }
        false
    }

    // =========================================================================
    // Generic parameters
    // =========================================================================

    fn simplify_generic(
        &mut self,
        sub: TypeId,
        sub_data: &TypeData,
        sup: TypeId,
        sup_data: &TypeData,
        goal: &SubtypeGoal,
    ) -> Prop {
        // Same parameter: higher-kinded arguments are opaque, so demand
        // mutual agreement argument-wise.
        if let (TypeData::Generic(n1, args1), TypeData::Generic(n2, args2)) = (sub_data, sup_data) {
            if n1 == n2 {
                if args1.len() != args2.len() {
                    return self.invalid(goal, FailureKind::Mismatch);
                }
                let mut props = Vec::with_capacity(args1.len() * 2);
                for (&a, &b) in args1.iter().zip(args2.iter()) {
                    props.push(self.simplify(&goal.child(a, b)));
                    props.push(self.simplify(&goal.child(b, a)));
                }
                return Prop::conj(props);
            }
        }

        // Supertype-side short-circuit: when the supertype parameter's
        // lower-bound closure already contains the bare subtype parameter,
        // the goal holds outright.
        if let (TypeData::Generic(sub_name, sub_args), TypeData::Generic(sup_name, _)) =
            (sub_data, sup_data)
        {
            if sub_args.is_empty() && self.generic_lower_closure(*sup_name).contains(sub_name) {
                return Prop::Valid;
            }
        }

        let fail = self.lazy_failure(goal, FailureKind::Mismatch);
        let mut branches: SmallVec<[Prop; 4]> = SmallVec::new();
        let mut cycle: Option<Atom> = None;

        // Subtype side: try each declared upper bound, then `mixed` as the
        // bound of last resort.
        if let TypeData::Generic(name, _) = sub_data {
            match goal.visited.try_add(*name, GoalSide::Upper, &goal.sup) {
                None => cycle = Some(*name),
                Some(visited) => {
                    let nested = goal.with_visited(visited);
                    for bound in self.hierarchy.generic_upper_bounds(*name) {
                        branches.push(self.simplify(&nested.retry(bound, sup)));
                    }
                    if !goal.mode.require_completeness {
                        branches.push(self.simplify(&nested.retry(TypeId::MIXED, sup)));
                    }
                }
            }
        }

        // Supertype side: a lower bound above the subtype is a witness.
        if let TypeData::Generic(name, _) = sup_data {
            match goal.visited.try_add(*name, GoalSide::Lower, &goal.sub) {
                None => cycle = Some(*name),
                Some(visited) => {
                    let nested = goal.with_visited(visited);
                    for bound in self.hierarchy.generic_lower_bounds(*name) {
                        branches.push(self.simplify(&nested.retry(sub, bound)));
                    }
                }
            }
        }

        if branches.is_empty() {
            if let Some(name) = cycle {
                return self.invalid(goal, FailureKind::GenericCycle(name));
            }
            return Prop::Unsat(fail);
        }
        Prop::disj(fail, branches.into_vec())
    }

    /// Transitive closure of a generic parameter's lower bounds, collecting
    /// the bare generic names it contains.
    fn generic_lower_closure(&self, name: Atom) -> FxHashSet<Atom> {
        let mut seen = FxHashSet::default();
        let mut work = vec![name];
        while let Some(current) = work.pop() {
            if !seen.insert(current) {
                continue;
            }
            for bound in self.hierarchy.generic_lower_bounds(current) {
                if let TypeData::Generic(bound_name, args) = &*self.db.lookup(bound) {
                    if args.is_empty() {
                        work.push(*bound_name);
                    }
                }
            }
        }
        seen.remove(&name);
        seen
    }

    // =========================================================================
    // Gradual overlay
    // =========================================================================

    /// `sub <: supportdyn<inner>`.
    fn simplify_supportdyn_sup(&mut self, sub: TypeId, inner: TypeId, goal: &SubtypeGoal) -> Prop {
        let (stripped, had_wrapper) = match *self.db.lookup(sub) {
            TypeData::SupportsDynamic(s) => (s, true),
            _ => (sub, false),
        };

        let dynamic_part = if had_wrapper || goal.sub_supportdyn.is_some() {
            Prop::Valid
        } else {
            self.simplify(&goal.retry(sub, TypeId::DYNAMIC))
        };

        let mut inner_goal = goal.retry(stripped, inner);
        inner_goal.sup_supportdyn = true;
        if had_wrapper {
            inner_goal.sub_supportdyn = Some(goal.sub_span);
        }
        let inner_part = self.simplify(&inner_goal);

        Prop::conj2(dynamic_part, inner_part)
    }

    /// `sub <: dynamic` for a concrete, non-variable `sub`.
    fn simplify_dynamic_sup(&mut self, sub: TypeId, sub_data: &TypeData, goal: &SubtypeGoal) -> Prop {
        if goal.coercion == Coercion::ToDynamic || goal.sub_supportdyn.is_some() {
            return Prop::Valid;
        }
        match sub_data {
            TypeData::Prim(_) => Prop::Valid,
            TypeData::Tuple(elements) => {
                let mut props = Vec::with_capacity(elements.len());
                for &e in elements {
                    props.push(self.simplify(&goal.retry(e, TypeId::DYNAMIC)));
                }
                Prop::conj(props)
            }
            TypeData::Shape(shape) => {
                let mut props = Vec::with_capacity(shape.fields.len() + 1);
                for field in &shape.fields {
                    props.push(self.simplify(&goal.retry(field.ty, TypeId::DYNAMIC)));
                }
                if let Some(open) = shape.open {
                    props.push(self.simplify(&goal.retry(open, TypeId::DYNAMIC)));
                }
                Prop::conj(props)
            }
            TypeData::Class(class) => {
                if self.hierarchy.class_supports_dynamic(class.name) {
                    let mut props = Vec::with_capacity(class.args.len());
                    for &arg in &class.args {
                        props.push(self.simplify(&goal.retry(arg, TypeId::DYNAMIC)));
                    }
                    Prop::conj(props)
                } else {
                    self.invalid_fix(goal, FailureKind::DynamicNotSupported, FixHint::WrapSupportdyn)
                }
            }
            TypeData::Newtype(_, _, bound) | TypeData::Dependent(_, bound) => {
                self.simplify(&goal.retry(*bound, TypeId::DYNAMIC))
            }
            _ => self.invalid(goal, FailureKind::DynamicNotSupported),
        }
    }

    /// `dynamic <: sup` for a concrete, non-dynamic `sup`.
    fn simplify_dynamic_sub(&mut self, goal: &SubtypeGoal) -> Prop {
        if goal.coercion == Coercion::FromDynamic {
            return Prop::Valid;
        }
        // Capability positions accept dynamic outright: a dynamic call
        // carries no coeffect discipline to enforce.
        if goal.mode.is_coeffect {
            return Prop::Valid;
        }
        // A liked supertype (or a supertype position under supportdyn)
        // absorbs dynamic by construction.
        if goal.sup_liked || goal.sup_supportdyn {
            return Prop::Valid;
        }
        self.invalid(goal, FailureKind::DynamicCoercionRequired)
    }

    // =========================================================================
    // Negation
    // =========================================================================

    fn simplify_neg_sup(&mut self, sub: TypeId, kind: NegKind, goal: &SubtypeGoal) -> Prop {
        let negated = self.neg_target_type(kind);
        let mut oracle = DisjointnessOracle::new(self.db, self.hierarchy, self.store);
        if oracle.disjoint(sub, negated) {
            Prop::Valid
        } else {
            self.invalid(goal, FailureKind::NegationOverlap)
        }
    }

    pub(crate) fn neg_target_type(&self, kind: NegKind) -> TypeId {
        match kind {
            NegKind::Prim(p) => self.db.prim(p),
            NegKind::Class(name) => self.db.class(name, crate::types::Exactness::Nonexact, Vec::new()),
        }
    }

    // =========================================================================
    // Null exclusion
    // =========================================================================

    /// Syntactic check that a type provably has no `null` inhabitant,
    /// descending through bounded abstract types.
    pub(crate) fn ty_excludes_null(&self, ty: TypeId) -> bool {
        let mut seen = FxHashSet::default();
        self.excludes_null_rec(ty, &mut seen)
    }

    fn excludes_null_rec(&self, ty: TypeId, seen: &mut FxHashSet<Atom>) -> bool {
        match &*self.db.lookup(ty) {
            TypeData::Prim(crate::types::PrimKind::Null) => false,
            TypeData::Prim(_) => true,
            TypeData::Nonnull => true,
            TypeData::Dynamic => false,
            TypeData::Nullable(_) => false,
            TypeData::Union(members) => members.iter().all(|&m| self.excludes_null_rec(m, seen)),
            TypeData::Intersection(members) => {
                members.iter().any(|&m| self.excludes_null_rec(m, seen))
            }
            TypeData::Tuple(_)
            | TypeData::Shape(_)
            | TypeData::Function(_)
            | TypeData::Class(_) => true,
            TypeData::Neg(NegKind::Prim(crate::types::PrimKind::Null)) => true,
            TypeData::Neg(_) => false,
            TypeData::Generic(name, _) => {
                if !seen.insert(*name) {
                    return false;
                }
                self.hierarchy
                    .generic_upper_bounds(*name)
                    .iter()
                    .any(|&b| self.excludes_null_rec(b, seen))
            }
            TypeData::Newtype(_, _, bound) | TypeData::Dependent(_, bound) => {
                self.excludes_null_rec(*bound, seen)
            }
            TypeData::SupportsDynamic(inner) => self.excludes_null_rec(*inner, seen),
            TypeData::Var(_) => false,
        }
    }

    // =========================================================================
    // Failure construction
    // =========================================================================

    pub(crate) fn lazy_failure(&self, goal: &SubtypeGoal, kind: FailureKind) -> LazyFailure {
        let sub = goal.sub.clone();
        let sup = goal.sup.clone();
        let spans = (goal.sub_span, goal.sup_span);
        LazyFailure::new(move || SubtypeFailure::new(kind.clone(), sub.clone(), sup.clone(), spans))
    }

    pub(crate) fn invalid(&self, goal: &SubtypeGoal, kind: FailureKind) -> Prop {
        Prop::Unsat(self.lazy_failure(goal, kind))
    }

    pub(crate) fn invalid_fix(&self, goal: &SubtypeGoal, kind: FailureKind, fix: FixHint) -> Prop {
        let sub = goal.sub.clone();
        let sup = goal.sup.clone();
        let spans = (goal.sub_span, goal.sup_span);
        Prop::Unsat(LazyFailure::new(move || {
            SubtypeFailure::new(kind.clone(), sub.clone(), sup.clone(), spans).with_fix(fix.clone())
        }))
    }
}

#[cfg(test)]
#[path = "../tests/subtype_tests.rs"]
mod tests;
#[cfg(test)]
#[path = "../tests/dynamic_tests.rs"]
mod dynamic_tests;
