//! The disjointness oracle.
//!
//! `disjoint(t1, t2)` decides whether two types can have no common
//! inhabitant. It is conservative in the `false` direction: `false` means
//! "maybe not disjoint", while `true` is a proof. Negation-type and
//! type-switch reasoning in the simplification engine rely on that
//! one-sided guarantee.
//!
//! Abstract types (generic parameters, inference variables) recurse onto
//! their concrete upper bounds from the hierarchy/store under a visited
//! set, mirroring the simplification engine's own cycle protection.

use crate::hierarchy::{ClassHierarchy, ClassKind, ContainerKind};
use crate::intern::TypeInterner;
use crate::recursion::{RecursionGuard, RecursionProfile};
use crate::store::InferenceStore;
use crate::types::{ClassData, Exactness, InferId, NegKind, ShapeData, TypeData, TypeId};
use hone_common::Atom;
use rustc_hash::FxHashSet;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum VisitKey {
    Generic(Atom),
    Var(InferId),
}

/// Decides provable disjointness of two types.
pub struct DisjointnessOracle<'a, H: ClassHierarchy + ?Sized> {
    db: &'a TypeInterner,
    hierarchy: &'a H,
    store: Option<&'a dyn InferenceStore>,
    visited: FxHashSet<VisitKey>,
    guard: RecursionGuard,
}

impl<'a, H: ClassHierarchy + ?Sized> DisjointnessOracle<'a, H> {
    pub fn new(
        db: &'a TypeInterner,
        hierarchy: &'a H,
        store: Option<&'a dyn InferenceStore>,
    ) -> Self {
        Self {
            db,
            hierarchy,
            store,
            visited: FxHashSet::default(),
            guard: RecursionGuard::new(RecursionProfile::Disjointness),
        }
    }

    /// Whether `a` and `b` provably share no inhabitant.
    pub fn disjoint(&mut self, a: TypeId, b: TypeId) -> bool {
        if !self.guard.enter() {
            return false;
        }
        let result = self.disjoint_inner(a, b);
        self.guard.leave();
        result
    }

    fn disjoint_inner(&mut self, a: TypeId, b: TypeId) -> bool {
        if a == b {
            // A type overlaps itself unless it is empty.
            return a == TypeId::NOTHING;
        }

        let da = self.db.lookup(a);
        let db_ = self.db.lookup(b);

        // Composite decomposition, either side.
        match &*da {
            TypeData::Union(members) => return members.iter().all(|&m| self.disjoint(m, b)),
            TypeData::Nullable(inner) => {
                return self.disjoint(TypeId::NULL, b) && self.disjoint(*inner, b);
            }
            TypeData::Intersection(members) => {
                return members.iter().any(|&m| self.disjoint(m, b));
            }
            _ => {}
        }
        match &*db_ {
            TypeData::Union(members) => return members.iter().all(|&m| self.disjoint(a, m)),
            TypeData::Nullable(inner) => {
                return self.disjoint(a, TypeId::NULL) && self.disjoint(a, *inner);
            }
            TypeData::Intersection(members) => {
                return members.iter().any(|&m| self.disjoint(a, m));
            }
            _ => {}
        }

        // The gradual type overlaps everything.
        if matches!(*da, TypeData::Dynamic) || matches!(*db_, TypeData::Dynamic) {
            return false;
        }

        // Abstract types: recurse onto concrete upper bounds.
        if let Some(result) = self.abstract_disjoint(&da, b) {
            return result;
        }
        if let Some(result) = self.abstract_disjoint(&db_, a) {
            return result;
        }

        // Opaque wrappers shrink their inhabitant set, so the bound/inner
        // type over-approximates them.
        match &*da {
            TypeData::Newtype(_, _, bound) | TypeData::Dependent(_, bound) => {
                return self.disjoint(*bound, b);
            }
            TypeData::SupportsDynamic(inner) => return self.disjoint(*inner, b),
            _ => {}
        }
        match &*db_ {
            TypeData::Newtype(_, _, bound) | TypeData::Dependent(_, bound) => {
                return self.disjoint(a, *bound);
            }
            TypeData::SupportsDynamic(inner) => return self.disjoint(a, *inner),
            _ => {}
        }

        // Negations: ¬t is disjoint exactly from the types inside t.
        if let TypeData::Neg(kind) = *da {
            return self.neg_disjoint(kind, &db_);
        }
        if let TypeData::Neg(kind) = *db_ {
            return self.neg_disjoint(kind, &da);
        }

        // Nonnull misses only null.
        if matches!(*da, TypeData::Nonnull) {
            return b == TypeId::NULL;
        }
        if matches!(*db_, TypeData::Nonnull) {
            return a == TypeId::NULL;
        }

        // Structural containers: normalize to the closest nominal
        // container supertype before the general case.
        let da = self.normalize_container(&da);
        let db_ = self.normalize_container(&db_);

        match (&da, &db_) {
            (TypeData::Prim(p), TypeData::Prim(q)) => p.disjoint_from(*q),
            (TypeData::Prim(_), _) | (_, TypeData::Prim(_)) => true,
            (TypeData::Class(c), TypeData::Class(d)) => self.class_disjoint(c, d),
            (TypeData::Tuple(xs), TypeData::Tuple(ys)) => {
                xs.len() != ys.len()
                    || xs.iter().zip(ys.iter()).any(|(&x, &y)| self.disjoint(x, y))
            }
            (TypeData::Shape(s), TypeData::Shape(t)) => self.shape_disjoint(s, t),
            // Tuples, shapes, and functions are distinct runtime forms.
            (TypeData::Tuple(_), TypeData::Shape(_) | TypeData::Function(_))
            | (TypeData::Shape(_), TypeData::Tuple(_) | TypeData::Function(_))
            | (TypeData::Function(_), TypeData::Tuple(_) | TypeData::Shape(_)) => true,
            (TypeData::Function(_), TypeData::Function(_)) => false,
            // A structural value is never an instance of a class unless a
            // container supertype says so, and that was handled above.
            (TypeData::Class(_), TypeData::Tuple(_) | TypeData::Shape(_) | TypeData::Function(_))
            | (TypeData::Tuple(_) | TypeData::Shape(_) | TypeData::Function(_), TypeData::Class(_)) => {
                true
            }
            _ => false,
        }
    }

    /// Generic parameters and inference variables: disjoint if any
    /// concrete upper bound is disjoint. Returns `None` when the type is
    /// not abstract.
    fn abstract_disjoint(&mut self, data: &TypeData, other: TypeId) -> Option<bool> {
        match data {
            TypeData::Generic(name, _) => {
                if !self.visited.insert(VisitKey::Generic(*name)) {
                    return Some(false);
                }
                let bounds = self.hierarchy.generic_upper_bounds(*name);
                Some(bounds.iter().any(|&bound| self.disjoint(bound, other)))
            }
            TypeData::Var(id) => {
                if !self.visited.insert(VisitKey::Var(*id)) {
                    return Some(false);
                }
                let Some(store) = self.store else {
                    return Some(false);
                };
                let bounds = store.upper_bounds(*id);
                Some(bounds.iter().any(|bound| match bound.as_ty() {
                    Some(ty) => self.disjoint(ty, other),
                    None => false,
                }))
            }
            _ => None,
        }
    }

    fn neg_disjoint(&mut self, kind: NegKind, other: &TypeData) -> bool {
        match (kind, other) {
            (NegKind::Prim(q), TypeData::Prim(p)) => p.is_subtype_of(q),
            (NegKind::Class(c), TypeData::Class(d)) => self.is_ancestor_name(d.name, c),
            _ => false,
        }
    }

    fn normalize_container(&self, data: &TypeData) -> TypeData {
        let kind = match data {
            TypeData::Tuple(_) => ContainerKind::Tuple,
            TypeData::Shape(_) => ContainerKind::Shape,
            _ => return data.clone(),
        };
        match self.hierarchy.container_class(kind) {
            Some(name) => TypeData::Class(std::sync::Arc::new(ClassData {
                name,
                exact: Exactness::Nonexact,
                args: Vec::new(),
                refinement: None,
            })),
            None => data.clone(),
        }
    }

    /// Two nominal classes are disjoint iff neither is a (possibly
    /// final-forced) ancestor of the other and at least one side is not an
    /// interface/trait — interfaces and traits can always be jointly
    /// implemented by a third class, unless finality forbids it.
    fn class_disjoint(&mut self, c: &ClassData, d: &ClassData) -> bool {
        if self.is_ancestor_name(c.name, d.name) || self.is_ancestor_name(d.name, c.name) {
            return false;
        }

        let interface_like = |kind: Option<ClassKind>| {
            matches!(kind, Some(ClassKind::Interface | ClassKind::Trait))
        };
        let sealed = |kind: Option<ClassKind>, name: Atom, this: &Self| {
            matches!(kind, Some(ClassKind::Enum)) || this.hierarchy.is_final(name)
        };

        let kind_c = self.hierarchy.kind(c.name);
        let kind_d = self.hierarchy.kind(d.name);

        match (interface_like(kind_c), interface_like(kind_d)) {
            (true, true) => false,
            // An interface against a sealed class is forced: the class's
            // ancestry is closed and does not include the interface.
            (true, false) => sealed(kind_d, d.name, self),
            (false, true) => sealed(kind_c, c.name, self),
            (false, false) => true,
        }
    }

    /// Whether `ancestor` is reachable from `name` through the ancestor
    /// relation (reflexive).
    fn is_ancestor_name(&self, name: Atom, ancestor: Atom) -> bool {
        let mut seen = FxHashSet::default();
        let mut work = vec![name];
        while let Some(current) = work.pop() {
            if current == ancestor {
                return true;
            }
            if !seen.insert(current) {
                continue;
            }
            for link in self.hierarchy.ancestors(current) {
                work.push(link.name);
            }
        }
        false
    }

    /// Shapes are disjoint when some field both declare required has
    /// provably disjoint types, or a field required on one side cannot
    /// exist on the other (closed) side.
    fn shape_disjoint(&mut self, s: &ShapeData, t: &ShapeData) -> bool {
        for field in &s.fields {
            if field.optional {
                continue;
            }
            match t.field(field.name) {
                Some(other) => {
                    if !other.optional && self.disjoint(field.ty, other.ty) {
                        return true;
                    }
                }
                None => {
                    if !t.is_open() {
                        return true;
                    }
                }
            }
        }
        for field in &t.fields {
            if !field.optional && s.field(field.name).is_none() && !s.is_open() {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
#[path = "../tests/disjoint_tests.rs"]
mod tests;
