use super::*;
use crate::diagnostics::FailureKind;
use crate::prop::Prop;
use crate::test_support::Fixture;
use crate::types::{FnFlags, FunctionData, ParamInfo, ParamMode, TypeId};

fn func(params: Vec<TypeId>, ret: TypeId) -> FunctionData {
    FunctionData {
        params: params.into_iter().map(ParamInfo::positional).collect(),
        variadic: None,
        ret,
        flags: FnFlags::empty(),
        capability: None,
    }
}

fn named_variadic(f: &Fixture, ty: TypeId, name: Option<&str>) -> ParamInfo {
    ParamInfo {
        ty,
        mode: ParamMode::Normal,
        readonly: false,
        name: name.map(|n| f.atom(n)),
    }
}

fn unsat_kind(prop: Prop) -> FailureKind {
    match prop {
        Prop::Unsat(fail) => fail.force().kind,
        other => panic!("expected unsat, got {other:?}"),
    }
}

#[test]
fn contravariant_params_covariant_return() {
    let f = Fixture::new();
    let sub = f.db.function(func(vec![TypeId::NUM], TypeId::INT));
    let sup = f.db.function(func(vec![TypeId::INT], TypeId::NUM));
    assert!(f.holds(sub, sup));
    assert!(f.fails(sup, sub));
}

#[test]
fn subtype_may_not_require_more_arguments() {
    let f = Fixture::new();
    let two = f.db.function(func(vec![TypeId::INT, TypeId::INT], TypeId::INT));
    let one = f.db.function(func(vec![TypeId::INT], TypeId::INT));
    let kind = unsat_kind(f.simplify(two, one));
    assert!(matches!(kind, FailureKind::FunctionArity { sub_min: 2, sup_min: 1 }));
}

#[test]
fn fewer_params_without_variadic_cannot_cover_supertype_arity() {
    let f = Fixture::new();
    let one = f.db.function(func(vec![TypeId::INT], TypeId::INT));
    let two = f.db.function(func(vec![TypeId::INT, TypeId::INT], TypeId::INT));
    let kind = unsat_kind(f.simplify(one, two));
    assert!(matches!(kind, FailureKind::FunctionArity { .. }));
}

#[test]
fn variadic_tail_absorbs_extra_parameters() {
    let f = Fixture::new();
    let mut sub = func(vec![TypeId::NUM], TypeId::INT);
    sub.variadic = Some(ParamInfo::positional(TypeId::NUM));
    let sub = f.db.function(sub);
    let sup = f.db.function(func(vec![TypeId::INT, TypeId::INT, TypeId::INT], TypeId::NUM));
    assert!(f.holds(sub, sup));
}

#[test]
fn variadic_supertype_requires_variadic_subtype() {
    let f = Fixture::new();
    let plain = f.db.function(func(vec![TypeId::INT], TypeId::INT));
    let mut variadic = func(vec![TypeId::INT], TypeId::INT);
    variadic.variadic = Some(ParamInfo::positional(TypeId::INT));
    let variadic = f.db.function(variadic);
    let kind = unsat_kind(f.simplify(plain, variadic));
    assert_eq!(kind, FailureKind::FunctionVariadicMissing);
}

#[test]
fn variadic_name_rule_is_one_directional() {
    let f = Fixture::new();

    let mut named = func(vec![], TypeId::INT);
    named.variadic = Some(named_variadic(&f, TypeId::INT, Some("rest")));
    let named = f.db.function(named);

    let mut unnamed = func(vec![], TypeId::INT);
    unnamed.variadic = Some(named_variadic(&f, TypeId::INT, None));
    let unnamed = f.db.function(unnamed);

    // Named overriding unnamed is the legacy error...
    let kind = unsat_kind(f.simplify(named, unnamed));
    assert_eq!(kind, FailureKind::VariadicNameMismatch);
    // ...while the reverse direction is accepted.
    assert!(f.holds(unnamed, named));
}

#[test]
fn inout_parameters_are_invariant() {
    let f = Fixture::new();
    let inout = |ty| ParamInfo {
        ty,
        mode: ParamMode::Inout,
        readonly: false,
        name: None,
    };

    let sub = f.db.function(FunctionData {
        params: vec![inout(TypeId::NUM)],
        variadic: None,
        ret: TypeId::INT,
        flags: FnFlags::empty(),
        capability: None,
    });
    let sup_wider = f.db.function(FunctionData {
        params: vec![inout(TypeId::INT)],
        variadic: None,
        ret: TypeId::INT,
        flags: FnFlags::empty(),
        capability: None,
    });
    let sup_same = f.db.function(FunctionData {
        params: vec![inout(TypeId::NUM)],
        variadic: None,
        ret: TypeId::INT,
        flags: FnFlags::empty(),
        capability: None,
    });

    // Contravariance alone would accept this; inout demands both ways.
    assert!(f.fails(sub, sup_wider));
    assert!(f.holds(sub, sup_same));
}

#[test]
fn inout_against_normal_parameter_is_a_mode_error() {
    let f = Fixture::new();
    let sub = f.db.function(func(vec![TypeId::INT], TypeId::INT));
    let sup = f.db.function(FunctionData {
        params: vec![ParamInfo {
            ty: TypeId::INT,
            mode: ParamMode::Inout,
            readonly: false,
            name: None,
        }],
        variadic: None,
        ret: TypeId::INT,
        flags: FnFlags::empty(),
        capability: None,
    });
    let kind = unsat_kind(f.simplify(sub, sup));
    assert!(matches!(kind, FailureKind::ParamModeMismatch { index: 0 }));
}

#[test]
fn readonly_flags_are_checked_before_recursion() {
    let f = Fixture::new();
    let plain = f.db.function(func(vec![], TypeId::INT));
    let mut readonly_this = func(vec![], TypeId::INT);
    readonly_this.flags = FnFlags::READONLY_THIS;
    let readonly_this = f.db.function(readonly_this);

    // A supertype promising readonly-this calls need a subtype that
    // tolerates them.
    let kind = unsat_kind(f.simplify(plain, readonly_this));
    assert_eq!(kind, FailureKind::ReadonlyThisMismatch);
    assert!(f.holds(readonly_this, plain));

    let mut readonly_ret = func(vec![], TypeId::INT);
    readonly_ret.flags = FnFlags::READONLY_RETURN;
    let readonly_ret = f.db.function(readonly_ret);
    let kind = unsat_kind(f.simplify(readonly_ret, plain));
    assert_eq!(kind, FailureKind::ReadonlyReturnMismatch);
    assert!(f.holds(plain, readonly_ret));
}

#[test]
fn cross_package_must_agree() {
    let f = Fixture::new();
    let plain = f.db.function(func(vec![], TypeId::INT));
    let mut tagged = func(vec![], TypeId::INT);
    tagged.flags = FnFlags::CROSS_PACKAGE;
    let tagged = f.db.function(tagged);

    assert_eq!(unsat_kind(f.simplify(plain, tagged)), FailureKind::CrossPackageMismatch);
    assert_eq!(unsat_kind(f.simplify(tagged, plain)), FailureKind::CrossPackageMismatch);
}

#[test]
fn disposable_returns_must_be_declared_upward() {
    let f = Fixture::new();
    let plain = f.db.function(func(vec![], TypeId::INT));
    let mut disposable = func(vec![], TypeId::INT);
    disposable.flags = FnFlags::RETURNS_DISPOSABLE;
    let disposable = f.db.function(disposable);

    assert_eq!(
        unsat_kind(f.simplify(disposable, plain)),
        FailureKind::ReturnsDisposableMismatch
    );
    assert!(f.holds(plain, disposable));
}

#[test]
fn capability_is_contravariant() {
    let f = Fixture::new();
    // Capabilities are modeled as types; a wider capability demand is a
    // stronger requirement on the calling context.
    let mut needs_num = func(vec![], TypeId::INT);
    needs_num.capability = Some(TypeId::NUM);
    let needs_num = f.db.function(needs_num);

    let mut needs_int = func(vec![], TypeId::INT);
    needs_int.capability = Some(TypeId::INT);
    let needs_int = f.db.function(needs_int);

    // Contexts calling through the supertype provide num; num does not
    // satisfy the int demand, so the int-demander cannot stand in.
    assert!(f.fails(needs_int, needs_num));
    // Contexts providing int do satisfy a num demand (int <: num).
    assert!(f.holds(needs_num, needs_int));
}

#[test]
fn missing_capability_requires_nothing() {
    let f = Fixture::new();
    let mut demanding = func(vec![], TypeId::INT);
    demanding.capability = Some(TypeId::INT);
    let demanding = f.db.function(demanding);
    let pure = f.db.function(func(vec![], TypeId::INT));

    // A function requiring nothing fits anywhere.
    assert!(f.holds(pure, demanding));
    // A demanding function cannot stand where none was promised.
    assert!(f.fails(demanding, pure));
}
