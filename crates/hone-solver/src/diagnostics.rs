//! Structured failure descriptors for subtype checking.
//!
//! The solver never formats user-facing text. A failed goal carries a
//! `SubtypeFailure`: the failure kind, both offending sides, their source
//! spans, and an optional machine-readable fix hint. The surrounding
//! checker renders messages and quickfixes from this data.
//!
//! ## Laziness
//!
//! Failure descriptors are built through `LazyFailure` thunks. On the
//! success path (and in tentative contexts like disjunct trials) a thunk is
//! never forced, so the descriptor is never constructed. This is the same
//! economy the deferred-reason closure pattern buys in hot subtype checks:
//! the cost of describing a failure is paid only when a failure is
//! actually reported.

use crate::types::InternalType;
use hone_common::{Atom, Span};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// Failure kinds
// =============================================================================

/// What went wrong, in machine-readable form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    /// General structural mismatch with no sharper description.
    Mismatch,
    /// The subtype admits `null` but the supertype does not.
    NullabilityMismatch,
    /// A required field of the supertype shape is absent in the subtype.
    MissingShapeField(Atom),
    /// A field required by the supertype is only optional in the subtype.
    OptionalShapeField(Atom),
    /// The subtype shape has a field the closed supertype shape forbids.
    UnexpectedShapeField(Atom),
    /// An open shape can never satisfy a closed shape.
    OpenShapeToClosed,
    TupleArity {
        sub_len: usize,
        sup_len: usize,
    },
    /// The subtype function requires more arguments than the supertype
    /// guarantees, or accepts fewer than the supertype allows.
    FunctionArity {
        sub_min: usize,
        sup_min: usize,
    },
    /// The supertype is variadic but the subtype is not.
    FunctionVariadicMissing,
    ParamModeMismatch {
        index: usize,
    },
    ParamReadonlyMismatch {
        index: usize,
    },
    ReadonlyThisMismatch,
    ReadonlyReturnMismatch,
    ReturnsDisposableMismatch,
    CrossPackageMismatch,
    /// Named variadic overriding an unnamed one (legacy rule, one
    /// direction only).
    VariadicNameMismatch,
    /// A generic-parameter goal repeated under the visited set.
    GenericCycle(Atom),
    /// The subtype does not support being treated as `dynamic`.
    DynamicNotSupported,
    /// `dynamic` flowed into a non-dynamic supertype without coercion.
    DynamicCoercionRequired,
    /// The subtype overlaps the negated type.
    NegationOverlap,
    /// The class type is not exact but the supertype demands exactness.
    ExactnessMismatch,
    MissingMember(Atom),
    MissingTypeMember(Atom),
    NotTraversable,
    NotIndexable,
    NotDestructurable,
    /// A constraint type appeared where only ordinary types can satisfy it.
    ConstraintMismatch,
    /// The recursion guard gave up; answered conservatively.
    BudgetExceeded,
}

/// Machine-readable quickfix suggestion attached to a failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum FixHint {
    AddShapeField(Atom),
    MakeShapeFieldRequired(Atom),
    CheckForNull,
    WrapSupportdyn,
}

// =============================================================================
// SubtypeFailure
// =============================================================================

/// A fully materialized subtype failure.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubtypeFailure {
    pub kind: FailureKind,
    pub sub: InternalType,
    pub sup: InternalType,
    /// Source spans of the subtype and supertype expressions.
    pub spans: (Span, Span),
    pub fix: Option<FixHint>,
}

impl SubtypeFailure {
    pub fn new(kind: FailureKind, sub: InternalType, sup: InternalType, spans: (Span, Span)) -> Self {
        Self {
            kind,
            sub,
            sup,
            spans,
            fix: None,
        }
    }

    pub fn with_fix(mut self, fix: FixHint) -> Self {
        self.fix = Some(fix);
        self
    }
}

// =============================================================================
// LazyFailure
// =============================================================================

/// A deferred failure descriptor.
///
/// Cloning shares the underlying thunk. `force` may be called any number of
/// times; construction cost is paid per call, which is fine because forcing
/// only happens on the reporting path.
#[derive(Clone)]
pub struct LazyFailure(Arc<dyn Fn() -> SubtypeFailure + Send + Sync>);

impl LazyFailure {
    pub fn new(thunk: impl Fn() -> SubtypeFailure + Send + Sync + 'static) -> Self {
        Self(Arc::new(thunk))
    }

    /// Build the descriptor.
    pub fn force(&self) -> SubtypeFailure {
        (self.0)()
    }
}

impl fmt::Debug for LazyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LazyFailure(<deferred>)")
    }
}

// =============================================================================
// Failure sink
// =============================================================================

/// Consumer of materialized failures.
///
/// The constraint closure reports every failure it cannot recover from;
/// callers decide whether a failure becomes a hard error or a downgrade to
/// a permissive type.
pub trait FailureSink {
    fn report(&mut self, failure: SubtypeFailure);
}

/// Vec-backed sink.
#[derive(Debug, Default)]
pub struct FailureCollector {
    failures: Vec<SubtypeFailure>,
}

impl FailureCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failures(&self) -> &[SubtypeFailure] {
        &self.failures
    }

    pub fn take(&mut self) -> Vec<SubtypeFailure> {
        std::mem::take(&mut self.failures)
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }
}

impl FailureSink for FailureCollector {
    fn report(&mut self, failure: SubtypeFailure) {
        self.failures.push(failure);
    }
}

/// Sink that drops everything. Used for trial closes of disjuncts, where
/// failures are expected and must not reach the caller.
#[derive(Debug, Default)]
pub struct NullSink;

impl FailureSink for NullSink {
    fn report(&mut self, _failure: SubtypeFailure) {}
}
