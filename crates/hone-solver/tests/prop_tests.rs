use super::*;
use crate::diagnostics::{FailureKind, LazyFailure, SubtypeFailure};
use crate::goal::Coercion;
use crate::types::{InternalType, TypeId};
use hone_common::Span;

fn dummy_fail() -> LazyFailure {
    LazyFailure::new(|| {
        SubtypeFailure::new(
            FailureKind::Mismatch,
            InternalType::Ty(TypeId::INT),
            InternalType::Ty(TypeId::STRING),
            (Span::ZERO, Span::ZERO),
        )
    })
}

fn leaf() -> Prop {
    Prop::IsSubtype(
        Coercion::None,
        InternalType::Ty(TypeId::INT),
        InternalType::Ty(TypeId::STRING),
    )
}

#[test]
fn conj_of_nothing_is_valid() {
    assert!(Prop::conj(vec![]).is_valid());
    assert!(Prop::conj(vec![Prop::Valid, Prop::Valid]).is_valid());
}

#[test]
fn unsat_absorbs_conjunction() {
    let prop = Prop::conj(vec![Prop::Valid, Prop::Unsat(dummy_fail()), leaf()]);
    assert!(prop.is_unsat());
}

#[test]
fn conj_flattens_nested_conjunctions() {
    let inner = Prop::Conj(vec![leaf(), leaf()]);
    match Prop::conj(vec![inner, leaf()]) {
        Prop::Conj(props) => assert_eq!(props.len(), 3),
        other => panic!("expected flat conjunction, got {other:?}"),
    }
}

#[test]
fn valid_absorbs_disjunction() {
    let prop = Prop::disj(dummy_fail(), vec![Prop::Unsat(dummy_fail()), Prop::Valid]);
    assert!(prop.is_valid());
}

#[test]
fn empty_disjunction_carries_the_goal_failure() {
    let prop = Prop::disj(dummy_fail(), vec![Prop::Unsat(dummy_fail())]);
    match prop {
        Prop::Unsat(fail) => assert_eq!(fail.force().kind, FailureKind::Mismatch),
        other => panic!("expected unsat, got {other:?}"),
    }
}

#[test]
fn if_unsat_falls_back_only_on_unsat() {
    let kept = Prop::Valid.if_unsat(|| leaf());
    assert!(kept.is_valid());

    let replaced = Prop::Unsat(dummy_fail()).if_unsat(|| Prop::Valid);
    assert!(replaced.is_valid());
}

#[test]
fn valid_if_open_treats_leaves_as_satisfied() {
    assert!(leaf().valid_if_open());
    assert!(Prop::Conj(vec![Prop::Valid, leaf()]).valid_if_open());
    assert!(!Prop::Conj(vec![Prop::Unsat(dummy_fail()), leaf()]).valid_if_open());
    assert!(Prop::Disj(dummy_fail(), vec![Prop::Unsat(dummy_fail()), leaf()]).valid_if_open());
    assert!(!Prop::Unsat(dummy_fail()).valid_if_open());
}
