//! Type interning.
//!
//! Every type term is stored exactly once; `TypeId` equality is therefore
//! physical identity. The subtype engine leans on this for its identity
//! fast path, but structural rules never *depend* on canonical interning:
//! two extensionally equal unions built in different orders still compare
//! equal through the rules, just without the shortcut.
//!
//! The interner is internally synchronized so one instance can be shared
//! immutably across the checker; the solver itself is single-threaded.

use crate::types::{
    ClassData, ClassRefinement, DependentKind, Exactness, FunctionData, InferId, NegKind, PrimKind,
    ShapeData, ShapeField, TypeData, TypeId,
};
use rustc_hash::FxHashMap;
use std::sync::{Arc, RwLock};

struct InternerState {
    map: FxHashMap<Arc<TypeData>, TypeId>,
    list: Vec<Arc<TypeData>>,
}

/// Append-only store of interned type terms.
pub struct TypeInterner {
    state: RwLock<InternerState>,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    /// Create an interner with the well-known types pre-seeded so the
    /// `TypeId` constants are valid.
    pub fn new() -> Self {
        let interner = Self {
            state: RwLock::new(InternerState {
                map: FxHashMap::default(),
                list: Vec::new(),
            }),
        };
        // Seeding order must match the TypeId constants.
        let seeded = [
            TypeData::Union(Vec::new()),
            TypeData::Nonnull,
            TypeData::Dynamic,
            TypeData::Prim(PrimKind::Null),
            TypeData::Prim(PrimKind::Int),
            TypeData::Prim(PrimKind::Bool),
            TypeData::Prim(PrimKind::Float),
            TypeData::Prim(PrimKind::String),
            TypeData::Prim(PrimKind::Num),
            TypeData::Prim(PrimKind::Arraykey),
            TypeData::Prim(PrimKind::Resource),
            TypeData::Nullable(TypeId::NONNULL),
        ];
        for (index, data) in seeded.into_iter().enumerate() {
            let id = interner.intern(data);
            debug_assert_eq!(id.0, index as u32);
        }
        debug_assert_eq!(
            interner.state.read().expect("interner lock poisoned").list.len() as u32,
            TypeId::WELL_KNOWN_COUNT
        );
        interner
    }

    /// Intern a term, returning its stable id.
    pub fn intern(&self, data: TypeData) -> TypeId {
        {
            let state = self.state.read().expect("interner lock poisoned");
            if let Some(&id) = state.map.get(&data) {
                return id;
            }
        }
        let mut state = self.state.write().expect("interner lock poisoned");
        if let Some(&id) = state.map.get(&data) {
            return id;
        }
        let id = TypeId(state.list.len() as u32);
        let data = Arc::new(data);
        state.list.push(Arc::clone(&data));
        state.map.insert(data, id);
        id
    }

    /// Resolve an id back to its term.
    pub fn lookup(&self, id: TypeId) -> Arc<TypeData> {
        let state = self.state.read().expect("interner lock poisoned");
        Arc::clone(&state.list[id.0 as usize])
    }

    // =========================================================================
    // Constructors
    // =========================================================================

    pub fn prim(&self, kind: PrimKind) -> TypeId {
        match kind {
            PrimKind::Null => TypeId::NULL,
            PrimKind::Int => TypeId::INT,
            PrimKind::Bool => TypeId::BOOL,
            PrimKind::Float => TypeId::FLOAT,
            PrimKind::String => TypeId::STRING,
            PrimKind::Num => TypeId::NUM,
            PrimKind::Arraykey => TypeId::ARRAYKEY,
            PrimKind::Resource => TypeId::RESOURCE,
        }
    }

    /// `?t`, collapsing the cases where the wrapper adds nothing.
    pub fn nullable(&self, inner: TypeId) -> TypeId {
        if inner == TypeId::MIXED || inner == TypeId::NULL {
            return inner;
        }
        if inner == TypeId::NOTHING {
            return TypeId::NULL;
        }
        if matches!(*self.lookup(inner), TypeData::Nullable(_)) {
            return inner;
        }
        self.intern(TypeData::Nullable(inner))
    }

    /// Union of the given members. The list is sorted and deduplicated for
    /// interning hits only; the engine tolerates duplicates.
    pub fn union(&self, mut members: Vec<TypeId>) -> TypeId {
        members.sort_unstable();
        members.dedup();
        match members.len() {
            0 => TypeId::NOTHING,
            1 => members[0],
            _ => self.intern(TypeData::Union(members)),
        }
    }

    pub fn union2(&self, a: TypeId, b: TypeId) -> TypeId {
        self.union(vec![a, b])
    }

    pub fn intersection(&self, mut members: Vec<TypeId>) -> TypeId {
        members.sort_unstable();
        members.dedup();
        match members.len() {
            0 => TypeId::MIXED,
            1 => members[0],
            _ => self.intern(TypeData::Intersection(members)),
        }
    }

    pub fn tuple(&self, elements: Vec<TypeId>) -> TypeId {
        self.intern(TypeData::Tuple(elements))
    }

    /// A shape from unsorted fields. Field names must be distinct.
    pub fn shape(&self, mut fields: Vec<ShapeField>, open: Option<TypeId>) -> TypeId {
        fields.sort_by(|a, b| a.name.cmp(&b.name));
        debug_assert!(fields.windows(2).all(|w| w[0].name != w[1].name));
        self.intern(TypeData::Shape(ShapeData { fields, open }))
    }

    pub fn function(&self, data: FunctionData) -> TypeId {
        self.intern(TypeData::Function(Arc::new(data)))
    }

    pub fn class(&self, name: hone_common::Atom, exact: Exactness, args: Vec<TypeId>) -> TypeId {
        self.intern(TypeData::Class(Arc::new(ClassData {
            name,
            exact,
            args,
            refinement: None,
        })))
    }

    pub fn class_refined(
        &self,
        name: hone_common::Atom,
        args: Vec<TypeId>,
        refinement: ClassRefinement,
    ) -> TypeId {
        self.intern(TypeData::Class(Arc::new(ClassData {
            name,
            exact: Exactness::Nonexact,
            args,
            refinement: Some(refinement),
        })))
    }

    pub fn generic(&self, name: hone_common::Atom) -> TypeId {
        self.intern(TypeData::Generic(name, Vec::new()))
    }

    pub fn generic_applied(&self, name: hone_common::Atom, args: Vec<TypeId>) -> TypeId {
        self.intern(TypeData::Generic(name, args))
    }

    pub fn newtype(&self, name: hone_common::Atom, args: Vec<TypeId>, bound: TypeId) -> TypeId {
        self.intern(TypeData::Newtype(name, args, bound))
    }

    pub fn dependent(&self, kind: DependentKind, bound: TypeId) -> TypeId {
        self.intern(TypeData::Dependent(kind, bound))
    }

    pub fn neg(&self, kind: NegKind) -> TypeId {
        self.intern(TypeData::Neg(kind))
    }

    /// `supportdyn<t>`, collapsing nested wrappers and `dynamic` itself.
    pub fn supports_dynamic(&self, inner: TypeId) -> TypeId {
        if inner == TypeId::DYNAMIC {
            return inner;
        }
        if matches!(*self.lookup(inner), TypeData::SupportsDynamic(_)) {
            return inner;
        }
        self.intern(TypeData::SupportsDynamic(inner))
    }

    pub fn var(&self, id: InferId) -> TypeId {
        self.intern(TypeData::Var(id))
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod tests;
