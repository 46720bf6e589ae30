//! Proposition algebra over subtype assertions.
//!
//! `simplify` reduces a goal to a `Prop`: a tiny boolean algebra whose only
//! atoms are `Valid`, `Unsat`, and deferred `IsSubtype` assertions. The
//! invariant maintained by the engine is that an `IsSubtype` leaf always
//! mentions an inference variable on at least one side; concrete goals are
//! fully reduced before they escape.
//!
//! The smart constructors perform the obvious collapses (`Valid` is the
//! unit of conjunction, `Unsat` absorbs it; dually for disjunction) so the
//! engine can build propositions without worrying about trivial nesting.

use crate::diagnostics::LazyFailure;
use crate::goal::Coercion;
use crate::types::InternalType;

/// Result of (partially) deciding a subtype goal.
#[derive(Clone, Debug)]
pub enum Prop {
    Valid,
    /// Definitely unsatisfiable, with a deferred failure descriptor.
    Unsat(LazyFailure),
    /// All must hold.
    Conj(Vec<Prop>),
    /// At least one must hold; the carried failure is reported when every
    /// disjunct fails.
    Disj(LazyFailure, Vec<Prop>),
    /// Deferred atomic assertion; at least one side is an inference
    /// variable.
    IsSubtype(Coercion, InternalType, InternalType),
}

impl Prop {
    /// Conjunction of `props`, flattened and collapsed.
    ///
    /// `Unsat` absorbs: the first failing conjunct decides the result, so
    /// later branches are dropped unforced (their failure thunks never
    /// run).
    pub fn conj(props: Vec<Prop>) -> Prop {
        let mut flat = Vec::with_capacity(props.len());
        for prop in props {
            match prop {
                Prop::Valid => {}
                unsat @ Prop::Unsat(_) => return unsat,
                Prop::Conj(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Prop::Valid,
            1 => flat.swap_remove(0),
            _ => Prop::Conj(flat),
        }
    }

    pub fn conj2(a: Prop, b: Prop) -> Prop {
        Self::conj(vec![a, b])
    }

    /// Disjunction of `props`, collapsed.
    ///
    /// `Valid` absorbs; `Unsat` branches are dropped. When every branch is
    /// unsatisfiable the carried `fail` — not any branch failure — is the
    /// result, so the reported failure describes the whole goal rather
    /// than an arbitrary alternative.
    pub fn disj(fail: LazyFailure, props: Vec<Prop>) -> Prop {
        let mut remaining = Vec::with_capacity(props.len());
        for prop in props {
            match prop {
                Prop::Valid => return Prop::Valid,
                Prop::Unsat(_) => {}
                Prop::Disj(_, inner) => remaining.extend(inner),
                other => remaining.push(other),
            }
        }
        if remaining.is_empty() {
            Prop::Unsat(fail)
        } else {
            Prop::Disj(fail, remaining)
        }
    }

    /// `self`, unless it is unsatisfiable, in which case the fallback.
    pub fn if_unsat(self, fallback: impl FnOnce() -> Prop) -> Prop {
        if self.is_unsat() { fallback() } else { self }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Prop::Valid)
    }

    pub fn is_unsat(&self) -> bool {
        matches!(self, Prop::Unsat(_))
    }

    /// Whether the proposition holds under the optimistic assumption that
    /// every deferred `IsSubtype` leaf will be satisfied.
    ///
    /// This is the semantics of the union-membership decision query: a goal
    /// blocked only on unresolved inference variables counts as true.
    pub fn valid_if_open(&self) -> bool {
        match self {
            Prop::Valid => true,
            Prop::Unsat(_) => false,
            Prop::Conj(props) => props.iter().all(Prop::valid_if_open),
            Prop::Disj(_, props) => props.iter().any(Prop::valid_if_open),
            Prop::IsSubtype(..) => true,
        }
    }
}

#[cfg(test)]
#[path = "../tests/prop_tests.rs"]
mod tests;
