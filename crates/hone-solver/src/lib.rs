//! Subtype and constraint solver for the Hone type checker.
//!
//! Given two type expressions, this engine decides whether the first may
//! be used where the second is expected — and when the answer depends on
//! not-yet-resolved inference variables, it produces a logical proposition
//! capturing the residual obligations instead of failing outright.
//!
//! It reasons about a mixed structural/nominal grammar (classes with
//! variance, shapes, tuples, unions/intersections, nullable and negation
//! types, function types, opaque newtypes, a supports-dynamic gradual
//! overlay) while guaranteeing termination on cyclic generic bounds, and
//! is usable in two modes: sound-but-possibly-incomplete for real type
//! checking, and complete-but-possibly-unsound for harvesting constraints
//! on generic parameters.
//!
//! Key pieces:
//! - **Interned type model** (`types`, `intern`): `O(1)` identity via
//!   `TypeId`, pure data, no behavior.
//! - **Proposition algebra** (`prop`): `Valid` / `Unsat` / `Conj` / `Disj`
//!   / deferred `IsSubtype` atoms.
//! - **Simplification engine** (`subtype`, `subtype_rules`): the recursive
//!   decision procedure, one case family per type shape.
//! - **Disjointness oracle** (`disjoint`): conservative no-common-
//!   inhabitant proofs for negation and refinement reasoning.
//! - **Constraint closure** (`closure`): resolves deferred assertions into
//!   inference-store bounds and keeps them transitively closed.
//! - **Decision API** (`relation_queries`): boolean wrappers for callers
//!   that just need yes/no.

pub mod closure;
pub mod diagnostics;
pub mod disjoint;
pub mod goal;
pub mod hierarchy;
pub mod instantiate;
mod intern;
pub mod prop;
pub mod recursion;
pub mod relation_queries;
pub mod store;
mod subtype;
mod subtype_rules;
pub mod types;
pub mod visited;

pub use closure::{ConstraintCloser, DEFAULT_PROPAGATION_BUDGET, close_goal};
pub use diagnostics::{
    FailureCollector, FailureKind, FailureSink, FixHint, LazyFailure, NullSink, SubtypeFailure,
};
pub use disjoint::DisjointnessOracle;
pub use goal::{CheckMode, Coercion, SubtypeGoal};
pub use hierarchy::{
    AncestorEntry, ClassDecl, ClassHierarchy, ClassKind, ContainerKind, SimpleHierarchy,
};
pub use instantiate::{TypeSubstitution, instantiate_type};
pub use intern::TypeInterner;
pub use prop::Prop;
pub use recursion::{RecursionGuard, RecursionProfile};
pub use relation_queries::{
    RelationKind, RelationResult, are_disjoint, is_subtype, is_subtype_for_union,
    is_subtype_ignoring_generics, query_relation,
};
pub use store::{InMemoryStore, InferenceStore};
pub use subtype::SubtypeSimplifier;
pub use types::{
    ClassData, ClassRefinement, ConstraintType, DependentKind, DestructureKind, Exactness,
    FnFlags, FunctionData, InferId, InternalType, NegKind, ParamInfo, ParamMode, PrimKind,
    RefinedBounds, ShapeData, ShapeField, TypeData, TypeId, TypeParamInfo, TypeSwitchPredicate,
    Variance,
};
pub use visited::{GoalSide, VisitedGoals};

#[cfg(test)]
#[path = "../tests/test_support.rs"]
pub(crate) mod test_support;
