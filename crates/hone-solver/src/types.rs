//! Structural type representation for the solver.
//!
//! This module defines the closed type grammar (`TypeData`) plus the second
//! grammar of non-nominal obligations (`ConstraintType`). Both are pure
//! data: every operation on them lives in the simplification engine, the
//! disjointness oracle, or the constraint closure.
//!
//! Types are interned (see `intern.rs`); `TypeId` comparison is `O(1)` and
//! doubles as the physical-identity fast path of the subtype engine.

use hone_common::interner::Atom;
use serde::Serialize;
use std::sync::Arc;

// =============================================================================
// TypeId - Interned type handle
// =============================================================================

/// Interned type identifier.
///
/// Equality of `TypeId`s means physical identity of the interned terms.
/// Well-known types are pre-seeded by `TypeInterner::new` in this order, so
/// the constants below are valid for every interner instance.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub u32);

impl TypeId {
    /// The bottom type: the empty union.
    pub const NOTHING: Self = Self(0);
    /// Everything except `null`.
    pub const NONNULL: Self = Self(1);
    /// The gradual type.
    pub const DYNAMIC: Self = Self(2);
    pub const NULL: Self = Self(3);
    pub const INT: Self = Self(4);
    pub const BOOL: Self = Self(5);
    pub const FLOAT: Self = Self(6);
    pub const STRING: Self = Self(7);
    pub const NUM: Self = Self(8);
    pub const ARRAYKEY: Self = Self(9);
    pub const RESOURCE: Self = Self(10);
    /// The top type: `?nonnull`.
    pub const MIXED: Self = Self(11);

    /// Number of pre-seeded well-known types.
    pub(crate) const WELL_KNOWN_COUNT: u32 = 12;
}

/// Inference variable identifier, owned by the external inference store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct InferId(pub u32);

// =============================================================================
// Primitives
// =============================================================================

/// Primitive type tags.
///
/// The subtype lattice over primitives is fixed:
/// `int <: num`, `float <: num`, `int <: arraykey`, `string <: arraykey`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PrimKind {
    Null,
    Int,
    Bool,
    Float,
    String,
    Num,
    Arraykey,
    Resource,
}

impl PrimKind {
    /// Fixed primitive subtype lattice (reflexive closure included).
    pub fn is_subtype_of(self, other: PrimKind) -> bool {
        use PrimKind::*;
        self == other
            || matches!(
                (self, other),
                (Int, Num) | (Float, Num) | (Int, Arraykey) | (String, Arraykey)
            )
    }

    /// Whether two primitive types share no inhabitant.
    ///
    /// Conservative only in the trivial sense: the table is total, so every
    /// answer is exact.
    pub fn disjoint_from(self, other: PrimKind) -> bool {
        !self.is_subtype_of(other) && !other.is_subtype_of(self)
    }
}

// =============================================================================
// Shapes
// =============================================================================

/// One field of a shape type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ShapeField {
    pub name: Atom,
    pub optional: bool,
    pub ty: TypeId,
}

/// A structural shape: named fields plus openness.
///
/// Fields are sorted by name so shapes intern canonically and field lookup
/// can binary-search. `open` is `None` for a closed shape; for an open
/// shape it carries the declared type of unknown fields.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ShapeData {
    pub fields: Vec<ShapeField>,
    pub open: Option<TypeId>,
}

impl ShapeData {
    pub fn field(&self, name: Atom) -> Option<&ShapeField> {
        self.fields
            .binary_search_by(|f| f.name.cmp(&name))
            .ok()
            .map(|idx| &self.fields[idx])
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }
}

// =============================================================================
// Functions
// =============================================================================

bitflags::bitflags! {
    /// Function attribute flags compared by hard yes/no rules rather than
    /// recursive type comparison.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FnFlags: u8 {
        const READONLY_THIS = 1 << 0;
        const READONLY_RETURN = 1 << 1;
        const RETURNS_DISPOSABLE = 1 << 2;
        const CROSS_PACKAGE = 1 << 3;
    }
}

impl Serialize for FnFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

/// Parameter calling mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ParamMode {
    Normal,
    /// Passed by reference both ways; the parameter type is invariant.
    Inout,
}

/// One function parameter.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ParamInfo {
    pub ty: TypeId,
    pub mode: ParamMode,
    pub readonly: bool,
    pub name: Option<Atom>,
}

impl ParamInfo {
    pub const fn positional(ty: TypeId) -> Self {
        Self {
            ty,
            mode: ParamMode::Normal,
            readonly: false,
            name: None,
        }
    }
}

/// A function type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct FunctionData {
    pub params: Vec<ParamInfo>,
    /// Variadic tail accepting zero or more extra arguments.
    pub variadic: Option<ParamInfo>,
    pub ret: TypeId,
    pub flags: FnFlags,
    /// Implicit capability (coeffect) parameter. `None` means the function
    /// requires nothing from its calling context.
    pub capability: Option<TypeId>,
}

impl FunctionData {
    /// Smallest number of arguments a call must supply.
    pub fn min_arity(&self) -> usize {
        self.params.len()
    }

    /// Largest number of arguments a call may supply, `None` if unbounded.
    pub fn max_arity(&self) -> Option<usize> {
        if self.variadic.is_some() {
            None
        } else {
            Some(self.params.len())
        }
    }
}

// =============================================================================
// Classes
// =============================================================================

/// Whether a class type denotes exactly that class or any subclass.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Exactness {
    Exact,
    Nonexact,
}

/// Bounds on an abstract type member, attached to a non-exact class type by
/// a refinement (`C with { type T as ... super ... }`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct RefinedBounds {
    pub lower: TypeId,
    pub upper: TypeId,
}

/// Type-member refinement on a class type. Members are sorted by name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ClassRefinement {
    pub members: Vec<(Atom, RefinedBounds)>,
}

impl ClassRefinement {
    pub fn member(&self, name: Atom) -> Option<RefinedBounds> {
        self.members
            .binary_search_by(|(n, _)| n.cmp(&name))
            .ok()
            .map(|idx| self.members[idx].1)
    }
}

/// A nominal class instantiation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ClassData {
    pub name: Atom,
    pub exact: Exactness,
    pub args: Vec<TypeId>,
    /// Only meaningful on non-exact class types.
    pub refinement: Option<ClassRefinement>,
}

/// Variance of a class/newtype type parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Variance {
    Invariant,
    Covariant,
    Contravariant,
}

/// Declared type parameter of a class, newtype, or typedef.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TypeParamInfo {
    pub name: Atom,
    pub variance: Variance,
}

// =============================================================================
// Remaining shapes of the grammar
// =============================================================================

/// Kind of a dependent type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DependentKind {
    /// The late-static-bound `this` type.
    This,
    /// A type keyed to a particular expression occurrence.
    Expr(u32),
}

/// What a negation type negates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum NegKind {
    Prim(PrimKind),
    Class(Atom),
}

/// The closed recursive type grammar. All positions are invariant unless a
/// rule in the simplification engine says otherwise.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TypeData {
    Prim(PrimKind),
    Nonnull,
    Dynamic,
    Nullable(TypeId),
    /// Semantically unordered; `Union(vec![])` is the bottom type.
    Union(Vec<TypeId>),
    /// `Intersection(vec![])` is the top type.
    Intersection(Vec<TypeId>),
    Tuple(Vec<TypeId>),
    Shape(ShapeData),
    Function(Arc<FunctionData>),
    Class(Arc<ClassData>),
    /// A generic parameter in scope. Args exist only for higher-kinded-like
    /// generics and are otherwise opaque.
    Generic(Atom, Vec<TypeId>),
    /// An opaque alias: name, args, and the declared upper bound.
    Newtype(Atom, Vec<TypeId>, TypeId),
    Dependent(DependentKind, TypeId),
    Neg(NegKind),
    /// Simultaneously below `dynamic` and below the inner type.
    SupportsDynamic(TypeId),
    Var(InferId),
}

// =============================================================================
// Constraint types
// =============================================================================

/// Kind of a destructuring obligation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DestructureKind {
    /// `list(...)`-style positional destructuring.
    ListDestructure,
    /// Argument splat at a call site.
    Splat,
}

/// Predicate of a type-switch obligation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TypeSwitchPredicate {
    IsNull,
    IsPrim(PrimKind),
    IsClass(Atom),
}

/// Non-nominal capability obligations.
///
/// These arise from how a value is *used* (member access, iteration,
/// destructuring) rather than from a declared type shape. They appear only
/// on the supertype side of goals and as upper bounds on inference
/// variables.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ConstraintType {
    /// The subtype must expose a member `name` of type `ty`.
    HasMember {
        name: Atom,
        ty: TypeId,
        /// Class the member access was observed on, if known.
        class_hint: Option<Atom>,
    },
    /// The subtype must expose an abstract type member within the bounds.
    HasTypeMember {
        name: Atom,
        lower: TypeId,
        upper: TypeId,
    },
    /// The subtype must destructure into the given components.
    Destructure {
        required: Vec<TypeId>,
        optional: Vec<TypeId>,
        variadic: Option<TypeId>,
        kind: DestructureKind,
    },
    /// The subtype must support indexing.
    CanIndex { key: TypeId, value: TypeId },
    /// The subtype must support (async) iteration.
    CanTraverse {
        key: Option<TypeId>,
        value: TypeId,
        is_async: bool,
    },
    /// The subtype, split by the predicate, must satisfy both branches.
    TypeSwitch {
        predicate: TypeSwitchPredicate,
        true_ty: TypeId,
        false_ty: TypeId,
    },
}

// =============================================================================
// Internal types
// =============================================================================

/// Either an ordinary type or a constraint type.
///
/// Goals, propositions, and inference-variable bounds all range over this
/// union.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum InternalType {
    Ty(TypeId),
    Cstr(Arc<ConstraintType>),
}

impl InternalType {
    pub const fn as_ty(&self) -> Option<TypeId> {
        match self {
            Self::Ty(id) => Some(*id),
            Self::Cstr(_) => None,
        }
    }

    pub const fn is_constraint(&self) -> bool {
        matches!(self, Self::Cstr(_))
    }
}

impl From<TypeId> for InternalType {
    fn from(id: TypeId) -> Self {
        Self::Ty(id)
    }
}

impl From<ConstraintType> for InternalType {
    fn from(cstr: ConstraintType) -> Self {
        Self::Cstr(Arc::new(cstr))
    }
}

#[cfg(test)]
#[path = "../tests/types_tests.rs"]
mod tests;
