//! Cycle protection for generic-parameter goals.
//!
//! Exploring the declared bounds of a generic parameter can recurse back
//! into a goal for the same parameter. Distinct opposite-side types still
//! admit useful unfolding, so the guard is keyed on the exact
//! (parameter name, opposite-side type) pair: only an identical repeat
//! implies a fixpoint and is refused.

use crate::types::InternalType;
use hone_common::Atom;
use rustc_hash::{FxHashMap, FxHashSet};

/// Which bound set of the generic parameter a goal consulted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GoalSide {
    /// The parameter appeared on the supertype side; its lower bounds are
    /// being explored.
    Lower,
    /// The parameter appeared on the subtype side; its upper bounds are
    /// being explored.
    Upper,
}

/// Per-goal memory of generic-parameter goals already entered.
///
/// Goals are immutable records, so extension is copy-on-write: `try_add`
/// returns a new map for the nested goal and leaves the current one
/// untouched.
#[derive(Clone, Debug, Default)]
pub struct VisitedGoals {
    entries: FxHashMap<Atom, (FxHashSet<InternalType>, FxHashSet<InternalType>)>,
}

impl VisitedGoals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a goal against `name`'s bounds with opposite side
    /// `other` is being entered. Returns `None` if the exact pair has been
    /// seen before (a fixpoint has been reached).
    pub fn try_add(&self, name: Atom, side: GoalSide, other: &InternalType) -> Option<VisitedGoals> {
        if let Some((lower, upper)) = self.entries.get(&name) {
            let seen = match side {
                GoalSide::Lower => lower,
                GoalSide::Upper => upper,
            };
            if seen.contains(other) {
                return None;
            }
        }
        let mut extended = self.clone();
        let (lower, upper) = extended.entries.entry(name).or_default();
        let seen = match side {
            GoalSide::Lower => lower,
            GoalSide::Upper => upper,
        };
        seen.insert(other.clone());
        Some(extended)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeId;

    #[test]
    fn repeat_pair_is_refused() {
        let visited = VisitedGoals::new();
        let name = Atom(1);
        let other = InternalType::Ty(TypeId::INT);

        let extended = visited.try_add(name, GoalSide::Upper, &other).expect("fresh pair");
        assert!(extended.try_add(name, GoalSide::Upper, &other).is_none());
        // A different opposite side is still admissible.
        assert!(
            extended
                .try_add(name, GoalSide::Upper, &InternalType::Ty(TypeId::NUM))
                .is_some()
        );
        // So is the other bound direction for the same pair.
        assert!(extended.try_add(name, GoalSide::Lower, &other).is_some());
    }

    #[test]
    fn try_add_is_copy_on_write() {
        let visited = VisitedGoals::new();
        let name = Atom(7);
        let other = InternalType::Ty(TypeId::STRING);
        let _extended = visited.try_add(name, GoalSide::Lower, &other).expect("fresh");
        // The original is untouched.
        assert!(visited.try_add(name, GoalSide::Lower, &other).is_some());
    }
}
