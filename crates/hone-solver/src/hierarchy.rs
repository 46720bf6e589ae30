//! The class/typedef database boundary.
//!
//! The solver never owns class declarations. Everything nominal —
//! ancestor links, variance, finality, member types, generic bounds in
//! scope — is consumed through the [`ClassHierarchy`] trait. The
//! surrounding checker implements it over its symbol tables;
//! [`SimpleHierarchy`] is the map-backed implementation used by tests and
//! small embedders.

use crate::instantiate::{TypeSubstitution, instantiate_type};
use crate::intern::TypeInterner;
use crate::types::{RefinedBounds, TypeId, TypeParamInfo};
use hone_common::Atom;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Kind of a nominal declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
    Trait,
    Enum,
}

/// One step up the ancestor relation.
///
/// In [`ClassHierarchy::ancestors`] the `args` are declared over the
/// child's type parameters; the engine substitutes the child's actual
/// arguments before retrying the goal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AncestorEntry {
    pub name: Atom,
    pub args: Vec<TypeId>,
}

/// Structural container kinds the disjointness oracle may normalize to a
/// nominal supertype.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ContainerKind {
    Tuple,
    Shape,
}

/// Read-only view of the external class/typedef database.
///
/// Every method has a conservative default so embedders implement only
/// what their world contains; the solver treats "don't know" as "no
/// leverage", never as success.
pub trait ClassHierarchy {
    /// Direct bases of `class` (extends + implements + uses), with type
    /// arguments over the child's parameters.
    fn ancestors(&self, class: Atom) -> Vec<AncestorEntry>;

    /// Upper bounds a trait/interface declares on its eventual implementor
    /// (require-extends / require-implements).
    fn requirements(&self, _class: Atom) -> Vec<AncestorEntry> {
        Vec::new()
    }

    /// Declared type parameters, in order, with variance. Also consulted
    /// for newtypes.
    fn type_params(&self, class: Atom) -> Vec<TypeParamInfo>;

    fn kind(&self, class: Atom) -> Option<ClassKind>;

    fn is_final(&self, _class: Atom) -> bool {
        false
    }

    /// Expand a newtype/case-type to its definition where the current
    /// context is allowed to see through it.
    fn expand_newtype(&self, _name: Atom, _args: &[TypeId]) -> Option<TypeId> {
        None
    }

    /// Declared "as" bounds of a generic parameter in scope.
    fn generic_upper_bounds(&self, _name: Atom) -> Vec<TypeId> {
        Vec::new()
    }

    /// Declared "super" bounds of a generic parameter in scope.
    fn generic_lower_bounds(&self, _name: Atom) -> Vec<TypeId> {
        Vec::new()
    }

    /// Type of an instance member, instantiated at `args`.
    fn member_type(&self, _class: Atom, _args: &[TypeId], _member: Atom) -> Option<TypeId> {
        None
    }

    /// Declared bounds of an abstract type member.
    fn type_member_bounds(&self, _class: Atom, _member: Atom) -> Option<RefinedBounds> {
        None
    }

    /// `(key, value)` types if instances of `class` can be indexed.
    fn index_types(&self, _class: Atom, _args: &[TypeId]) -> Option<(TypeId, TypeId)> {
        None
    }

    /// `(key, value)` types if instances of `class` can be iterated.
    fn traverse_types(
        &self,
        _class: Atom,
        _args: &[TypeId],
        _is_async: bool,
    ) -> Option<(TypeId, TypeId)> {
        None
    }

    /// Whether instances of `class` may be treated as `dynamic`.
    fn class_supports_dynamic(&self, _class: Atom) -> bool {
        false
    }

    /// Closest nominal container supertype of a structural container, if
    /// the embedder's world declares one.
    fn container_class(&self, _kind: ContainerKind) -> Option<Atom> {
        None
    }
}

// =============================================================================
// SimpleHierarchy
// =============================================================================

/// Declaration of one class for [`SimpleHierarchy`].
#[derive(Clone, Debug)]
pub struct ClassDecl {
    pub kind: ClassKind,
    pub is_final: bool,
    pub type_params: Vec<TypeParamInfo>,
    /// Bases with args over `type_params`.
    pub extends: Vec<AncestorEntry>,
    pub requires: Vec<AncestorEntry>,
    /// Members with types over `type_params`.
    pub members: Vec<(Atom, TypeId)>,
    pub type_members: Vec<(Atom, RefinedBounds)>,
    /// `(key, value)` over `type_params`.
    pub index: Option<(TypeId, TypeId)>,
    pub traverse: Option<(TypeId, TypeId)>,
    pub supports_dynamic: bool,
}

impl ClassDecl {
    pub fn new(kind: ClassKind) -> Self {
        Self {
            kind,
            is_final: false,
            type_params: Vec::new(),
            extends: Vec::new(),
            requires: Vec::new(),
            members: Vec::new(),
            type_members: Vec::new(),
            index: None,
            traverse: None,
            supports_dynamic: false,
        }
    }
}

#[derive(Clone, Debug)]
struct NewtypeDecl {
    type_params: Vec<TypeParamInfo>,
    /// Transparent-in-context body, if expansion is permitted.
    body: Option<TypeId>,
}

/// Map-backed [`ClassHierarchy`] for tests and embedders without a
/// symbol database.
pub struct SimpleHierarchy {
    db: Arc<TypeInterner>,
    classes: FxHashMap<Atom, ClassDecl>,
    newtypes: FxHashMap<Atom, NewtypeDecl>,
    generic_upper: FxHashMap<Atom, Vec<TypeId>>,
    generic_lower: FxHashMap<Atom, Vec<TypeId>>,
    containers: FxHashMap<&'static str, Atom>,
}

impl SimpleHierarchy {
    pub fn new(db: Arc<TypeInterner>) -> Self {
        Self {
            db,
            classes: FxHashMap::default(),
            newtypes: FxHashMap::default(),
            generic_upper: FxHashMap::default(),
            generic_lower: FxHashMap::default(),
            containers: FxHashMap::default(),
        }
    }

    pub fn add_class(&mut self, name: Atom, decl: ClassDecl) {
        self.classes.insert(name, decl);
    }

    pub fn add_newtype(&mut self, name: Atom, type_params: Vec<TypeParamInfo>, body: Option<TypeId>) {
        self.newtypes.insert(name, NewtypeDecl { type_params, body });
    }

    pub fn add_generic_upper_bound(&mut self, name: Atom, bound: TypeId) {
        self.generic_upper.entry(name).or_default().push(bound);
    }

    pub fn add_generic_lower_bound(&mut self, name: Atom, bound: TypeId) {
        self.generic_lower.entry(name).or_default().push(bound);
    }

    pub fn set_container_class(&mut self, kind: ContainerKind, class: Atom) {
        let key = match kind {
            ContainerKind::Tuple => "tuple",
            ContainerKind::Shape => "shape",
        };
        self.containers.insert(key, class);
    }

    fn subst_for(&self, params: &[TypeParamInfo], args: &[TypeId]) -> TypeSubstitution {
        TypeSubstitution::from_params(params, args)
    }
}

impl ClassHierarchy for SimpleHierarchy {
    fn ancestors(&self, class: Atom) -> Vec<AncestorEntry> {
        self.classes
            .get(&class)
            .map(|decl| decl.extends.clone())
            .unwrap_or_default()
    }

    fn requirements(&self, class: Atom) -> Vec<AncestorEntry> {
        self.classes
            .get(&class)
            .map(|decl| decl.requires.clone())
            .unwrap_or_default()
    }

    fn type_params(&self, class: Atom) -> Vec<TypeParamInfo> {
        if let Some(decl) = self.classes.get(&class) {
            return decl.type_params.clone();
        }
        self.newtypes
            .get(&class)
            .map(|decl| decl.type_params.clone())
            .unwrap_or_default()
    }

    fn kind(&self, class: Atom) -> Option<ClassKind> {
        self.classes.get(&class).map(|decl| decl.kind)
    }

    fn is_final(&self, class: Atom) -> bool {
        self.classes.get(&class).is_some_and(|decl| decl.is_final)
    }

    fn expand_newtype(&self, name: Atom, args: &[TypeId]) -> Option<TypeId> {
        let decl = self.newtypes.get(&name)?;
        let body = decl.body?;
        let subst = self.subst_for(&decl.type_params, args);
        Some(instantiate_type(&self.db, &subst, body))
    }

    fn generic_upper_bounds(&self, name: Atom) -> Vec<TypeId> {
        self.generic_upper.get(&name).cloned().unwrap_or_default()
    }

    fn generic_lower_bounds(&self, name: Atom) -> Vec<TypeId> {
        self.generic_lower.get(&name).cloned().unwrap_or_default()
    }

    fn member_type(&self, class: Atom, args: &[TypeId], member: Atom) -> Option<TypeId> {
        let decl = self.classes.get(&class)?;
        let declared = decl
            .members
            .iter()
            .find(|(name, _)| *name == member)
            .map(|(_, ty)| *ty);
        match declared {
            Some(ty) => {
                let subst = self.subst_for(&decl.type_params, args);
                Some(instantiate_type(&self.db, &subst, ty))
            }
            // Not declared here: look through the bases.
            None => decl.extends.iter().find_map(|base| {
                let subst = self.subst_for(&decl.type_params, args);
                let base_args: Vec<TypeId> = base
                    .args
                    .iter()
                    .map(|&a| instantiate_type(&self.db, &subst, a))
                    .collect();
                self.member_type(base.name, &base_args, member)
            }),
        }
    }

    fn type_member_bounds(&self, class: Atom, member: Atom) -> Option<RefinedBounds> {
        let decl = self.classes.get(&class)?;
        decl.type_members
            .iter()
            .find(|(name, _)| *name == member)
            .map(|(_, bounds)| *bounds)
    }

    fn index_types(&self, class: Atom, args: &[TypeId]) -> Option<(TypeId, TypeId)> {
        let decl = self.classes.get(&class)?;
        let (key, value) = decl.index?;
        let subst = self.subst_for(&decl.type_params, args);
        Some((
            instantiate_type(&self.db, &subst, key),
            instantiate_type(&self.db, &subst, value),
        ))
    }

    fn traverse_types(&self, class: Atom, args: &[TypeId], _is_async: bool) -> Option<(TypeId, TypeId)> {
        let decl = self.classes.get(&class)?;
        let (key, value) = decl.traverse?;
        let subst = self.subst_for(&decl.type_params, args);
        Some((
            instantiate_type(&self.db, &subst, key),
            instantiate_type(&self.db, &subst, value),
        ))
    }

    fn class_supports_dynamic(&self, class: Atom) -> bool {
        self.classes
            .get(&class)
            .is_some_and(|decl| decl.supports_dynamic)
    }

    fn container_class(&self, kind: ContainerKind) -> Option<Atom> {
        let key = match kind {
            ContainerKind::Tuple => "tuple",
            ContainerKind::Shape => "shape",
        };
        self.containers.get(key).copied()
    }
}
