//! Subtype goals: the immutable record handed to the simplification engine.

use crate::types::InternalType;
use crate::visited::VisitedGoals;
use hone_common::Span;
use serde::Serialize;

/// Coercion direction for the gradual type.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Coercion {
    /// `dynamic` relates only to itself and the types that support it.
    #[default]
    None,
    /// Treat `dynamic` as a top type: everything coerces to it.
    ToDynamic,
    /// Treat `dynamic` as a bottom type: it coerces to everything.
    FromDynamic,
}

/// Mode flags of a goal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CheckMode {
    /// Sound-but-possibly-incomplete: the default for real type checking.
    pub require_soundness: bool,
    /// Complete-but-possibly-unsound: the answer must be exact with
    /// respect to known bounds; optimistic fallbacks are suppressed.
    pub require_completeness: bool,
    /// Suppress the universal shortcuts for top/bottom and unresolved
    /// types.
    pub no_top_bottom: bool,
    /// Comparing implicit capabilities rather than value types. The
    /// algorithm is identical apart from a couple of capability-specific
    /// rules and alternate rendering downstream.
    pub is_coeffect: bool,
}

impl Default for CheckMode {
    fn default() -> Self {
        Self {
            require_soundness: true,
            require_completeness: false,
            no_top_bottom: false,
            is_coeffect: false,
        }
    }
}

impl CheckMode {
    /// Exact-with-respect-to-known-bounds mode.
    pub fn complete() -> Self {
        Self {
            require_completeness: true,
            ..Self::default()
        }
    }

    /// Union-membership mode: no universal top/bottom shortcuts.
    pub fn for_union() -> Self {
        Self {
            no_top_bottom: true,
            ..Self::default()
        }
    }
}

/// A pending question: "is `sub` usable where `sup` is expected?".
#[derive(Clone, Debug)]
pub struct SubtypeGoal {
    pub sub: InternalType,
    pub sup: InternalType,
    /// Provenance of a `supportdyn` wrapper stripped from the subtype;
    /// `Some` means the subtype is additionally known to be below
    /// `dynamic`.
    pub sub_supportdyn: Option<Span>,
    /// The supertype position sits under a `supportdyn` wrapper.
    pub sup_supportdyn: bool,
    /// The supertype was produced by the like operator (`~T`), licensing
    /// like-pushing into covariant components.
    pub sup_liked: bool,
    pub mode: CheckMode,
    pub coercion: Coercion,
    pub sub_span: Span,
    pub sup_span: Span,
    pub visited: VisitedGoals,
}

impl SubtypeGoal {
    pub fn new(sub: impl Into<InternalType>, sup: impl Into<InternalType>) -> Self {
        Self {
            sub: sub.into(),
            sup: sup.into(),
            sub_supportdyn: None,
            sup_supportdyn: false,
            sup_liked: false,
            mode: CheckMode::default(),
            coercion: Coercion::None,
            sub_span: Span::ZERO,
            sup_span: Span::ZERO,
            visited: VisitedGoals::new(),
        }
    }

    pub fn with_coercion(mut self, coercion: Coercion) -> Self {
        self.coercion = coercion;
        self
    }

    pub fn with_mode(mut self, mode: CheckMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_spans(mut self, sub_span: Span, sup_span: Span) -> Self {
        self.sub_span = sub_span;
        self.sup_span = sup_span;
        self
    }

    pub fn liked(mut self) -> Self {
        self.sup_liked = true;
        self
    }

    // -------------------------------------------------------------------------
    // Derived goals
    // -------------------------------------------------------------------------

    /// Same goal position, new endpoints: keeps every flag. Used when a
    /// side is rewritten in place (bound lookup, ancestor walk, stripping
    /// a wrapper).
    pub(crate) fn retry(
        &self,
        sub: impl Into<InternalType>,
        sup: impl Into<InternalType>,
    ) -> Self {
        Self {
            sub: sub.into(),
            sup: sup.into(),
            ..self.clone()
        }
    }

    /// Structural component goal: coercion and the gradual-overlay flags
    /// reset, mode and visited set carry over.
    pub(crate) fn child(
        &self,
        sub: impl Into<InternalType>,
        sup: impl Into<InternalType>,
    ) -> Self {
        Self {
            sub: sub.into(),
            sup: sup.into(),
            sub_supportdyn: None,
            sup_supportdyn: false,
            sup_liked: false,
            coercion: Coercion::None,
            ..self.clone()
        }
    }

    /// Covariant component goal: like `child`, but the liked flag is
    /// pushed down (like-pushing is only sound along covariant
    /// positions).
    pub(crate) fn child_covariant(
        &self,
        sub: impl Into<InternalType>,
        sup: impl Into<InternalType>,
    ) -> Self {
        Self {
            sup_liked: self.sup_liked,
            ..self.child(sub, sup)
        }
    }

    pub(crate) fn with_visited(&self, visited: VisitedGoals) -> Self {
        Self {
            visited,
            ..self.clone()
        }
    }
}
