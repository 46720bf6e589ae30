use super::*;
use crate::diagnostics::FailureKind;
use crate::prop::Prop;
use crate::test_support::Fixture;
use crate::types::{
    ConstraintType, Exactness, InferId, InternalType, ShapeField, TypeId, TypeSwitchPredicate,
};

fn unsat_kind(prop: Prop) -> FailureKind {
    match prop {
        Prop::Unsat(fail) => fail.force().kind,
        other => panic!("expected unsat, got {other:?}"),
    }
}

#[test]
fn has_member_resolves_through_the_hierarchy() {
    let mut f = Fixture::new();
    let point = f.atom("Point");
    let x = f.atom("x");
    let mut decl = crate::hierarchy::ClassDecl::new(crate::hierarchy::ClassKind::Class);
    decl.members = vec![(x, TypeId::INT)];
    f.hierarchy.add_class(point, decl);

    let point_ty = f.db.class(point, Exactness::Nonexact, vec![]);
    let wants_num = ConstraintType::HasMember {
        name: x,
        ty: TypeId::NUM,
        class_hint: None,
    };
    assert!(f.simplify(point_ty, wants_num).is_valid());

    let wants_string = ConstraintType::HasMember {
        name: x,
        ty: TypeId::STRING,
        class_hint: None,
    };
    assert!(f.simplify(point_ty, wants_string).is_unsat());

    let missing = ConstraintType::HasMember {
        name: f.atom("y"),
        ty: TypeId::INT,
        class_hint: None,
    };
    let kind = unsat_kind(f.simplify(point_ty, missing));
    assert_eq!(kind, FailureKind::MissingMember(f.atom("y")));
}

#[test]
fn has_member_is_inherited_from_bases() {
    let mut f = Fixture::new();
    let base = f.atom("Base");
    let x = f.atom("x");
    let mut base_decl = crate::hierarchy::ClassDecl::new(crate::hierarchy::ClassKind::Class);
    base_decl.members = vec![(x, TypeId::INT)];
    f.hierarchy.add_class(base, base_decl);
    let child = f.add_simple_class("Child", &["Base"]);

    let child_ty = f.db.class(child, Exactness::Nonexact, vec![]);
    let wants = ConstraintType::HasMember {
        name: x,
        ty: TypeId::NUM,
        class_hint: None,
    };
    assert!(f.simplify(child_ty, wants).is_valid());
}

#[test]
fn dynamic_satisfies_capability_obligations() {
    let f = Fixture::new();
    let wants = ConstraintType::HasMember {
        name: f.atom("anything"),
        ty: TypeId::STRING,
        class_hint: None,
    };
    assert!(f.simplify(TypeId::DYNAMIC, wants).is_valid());

    let traverse = ConstraintType::CanTraverse {
        key: None,
        value: TypeId::INT,
        is_async: false,
    };
    assert!(f.simplify(TypeId::DYNAMIC, traverse).is_valid());
}

#[test]
fn has_type_member_checks_the_demanded_interval() {
    let mut f = Fixture::new();
    let cls = f.atom("Collection");
    let elem = f.atom("Elem");
    let mut decl = crate::hierarchy::ClassDecl::new(crate::hierarchy::ClassKind::Class);
    decl.type_members = vec![(
        elem,
        crate::types::RefinedBounds {
            lower: TypeId::INT,
            upper: TypeId::INT,
        },
    )];
    f.hierarchy.add_class(cls, decl);
    let cls_ty = f.db.class(cls, Exactness::Nonexact, vec![]);

    let within = ConstraintType::HasTypeMember {
        name: elem,
        lower: TypeId::NOTHING,
        upper: TypeId::NUM,
    };
    assert!(f.simplify(cls_ty, within).is_valid());

    let outside = ConstraintType::HasTypeMember {
        name: elem,
        lower: TypeId::NOTHING,
        upper: TypeId::STRING,
    };
    assert!(f.simplify(cls_ty, outside).is_unsat());
}

#[test]
fn tuple_destructures_positionally() {
    let f = Fixture::new();
    let pair = f.db.tuple(vec![TypeId::INT, TypeId::STRING]);

    let fits = ConstraintType::Destructure {
        required: vec![TypeId::NUM, TypeId::ARRAYKEY],
        optional: vec![],
        variadic: None,
        kind: crate::types::DestructureKind::ListDestructure,
    };
    assert!(f.simplify(pair, fits).is_valid());

    let too_few_targets = ConstraintType::Destructure {
        required: vec![TypeId::NUM],
        optional: vec![],
        variadic: None,
        kind: crate::types::DestructureKind::ListDestructure,
    };
    let kind = unsat_kind(f.simplify(pair, too_few_targets));
    assert_eq!(kind, FailureKind::NotDestructurable);

    let with_variadic = ConstraintType::Destructure {
        required: vec![TypeId::NUM],
        optional: vec![],
        variadic: Some(TypeId::ARRAYKEY),
        kind: crate::types::DestructureKind::Splat,
    };
    assert!(f.simplify(pair, with_variadic).is_valid());
}

#[test]
fn traversable_class_destructures_through_its_element_type() {
    let mut f = Fixture::new();
    let vec_name = f.atom("Vector");
    let t = f.atom("T");
    let mut decl = crate::hierarchy::ClassDecl::new(crate::hierarchy::ClassKind::Class);
    decl.type_params = vec![crate::types::TypeParamInfo {
        name: t,
        variance: crate::types::Variance::Covariant,
    }];
    decl.traverse = Some((TypeId::INT, f.db.generic(t)));
    f.hierarchy.add_class(vec_name, decl);

    let vec_int = f.db.class(vec_name, Exactness::Nonexact, vec![TypeId::INT]);
    let destructure = ConstraintType::Destructure {
        required: vec![TypeId::NUM, TypeId::NUM],
        optional: vec![],
        variadic: None,
        kind: crate::types::DestructureKind::ListDestructure,
    };
    assert!(f.simplify(vec_int, destructure).is_valid());
}

#[test]
fn can_index_checks_key_and_value() {
    let mut f = Fixture::new();
    let dict = f.atom("Dict");
    let tk = f.atom("Tk");
    let tv = f.atom("Tv");
    let mut decl = crate::hierarchy::ClassDecl::new(crate::hierarchy::ClassKind::Class);
    decl.type_params = vec![
        crate::types::TypeParamInfo {
            name: tk,
            variance: crate::types::Variance::Invariant,
        },
        crate::types::TypeParamInfo {
            name: tv,
            variance: crate::types::Variance::Covariant,
        },
    ];
    decl.index = Some((f.db.generic(tk), f.db.generic(tv)));
    f.hierarchy.add_class(dict, decl);

    let dict_ty = f.db.class(dict, Exactness::Nonexact, vec![TypeId::ARRAYKEY, TypeId::INT]);
    let good = ConstraintType::CanIndex {
        key: TypeId::STRING,
        value: TypeId::NUM,
    };
    assert!(f.simplify(dict_ty, good).is_valid());

    let bad_value = ConstraintType::CanIndex {
        key: TypeId::STRING,
        value: TypeId::BOOL,
    };
    assert!(f.simplify(dict_ty, bad_value).is_unsat());

    let kind = unsat_kind(f.simplify(
        TypeId::INT,
        ConstraintType::CanIndex {
            key: TypeId::INT,
            value: TypeId::MIXED,
        },
    ));
    assert_eq!(kind, FailureKind::NotIndexable);
}

#[test]
fn tuples_and_shapes_traverse_their_members() {
    let f = Fixture::new();
    let pair = f.db.tuple(vec![TypeId::INT, TypeId::STRING]);
    let traverse = ConstraintType::CanTraverse {
        key: Some(TypeId::ARRAYKEY),
        value: TypeId::ARRAYKEY,
        is_async: false,
    };
    assert!(f.simplify(pair, traverse.clone()).is_valid());

    let shape = f.db.shape(
        vec![ShapeField {
            name: f.atom("a"),
            optional: false,
            ty: TypeId::INT,
        }],
        None,
    );
    assert!(f.simplify(shape, traverse).is_valid());

    let narrow = ConstraintType::CanTraverse {
        key: None,
        value: TypeId::BOOL,
        is_async: false,
    };
    assert!(f.simplify(pair, narrow).is_unsat());
}

#[test]
fn type_switch_splits_through_the_predicate() {
    let f = Fixture::new();
    // An int is never null: the null branch is vacuous, the other branch
    // must hold at int.
    let switch = ConstraintType::TypeSwitch {
        predicate: TypeSwitchPredicate::IsNull,
        true_ty: TypeId::NULL,
        false_ty: TypeId::NUM,
    };
    assert!(f.simplify(TypeId::INT, switch).is_valid());

    let wrong_false_branch = ConstraintType::TypeSwitch {
        predicate: TypeSwitchPredicate::IsNull,
        true_ty: TypeId::NULL,
        false_ty: TypeId::STRING,
    };
    assert!(f.simplify(TypeId::INT, wrong_false_branch).is_unsat());
}

#[test]
fn union_subtype_distributes_over_obligations() {
    let mut f = Fixture::new();
    let a = f.atom("Account");
    let b = f.atom("Badge");
    let id = f.atom("id");
    for name in [a, b] {
        let mut decl = crate::hierarchy::ClassDecl::new(crate::hierarchy::ClassKind::Class);
        decl.members = vec![(id, TypeId::INT)];
        f.hierarchy.add_class(name, decl);
    }
    let union = f.db.union(vec![
        f.db.class(a, Exactness::Nonexact, vec![]),
        f.db.class(b, Exactness::Nonexact, vec![]),
    ]);
    let wants = ConstraintType::HasMember {
        name: id,
        ty: TypeId::NUM,
        class_hint: None,
    };
    assert!(f.simplify(union, wants).is_valid());
}

#[test]
fn variable_against_an_obligation_defers() {
    let f = Fixture::new();
    let v = f.db.var(InferId(0));
    let wants = ConstraintType::HasMember {
        name: f.atom("x"),
        ty: TypeId::INT,
        class_hint: None,
    };
    match f.simplify(v, wants) {
        Prop::IsSubtype(_, sub, sup) => {
            assert_eq!(sub, InternalType::Ty(v));
            assert!(sup.is_constraint());
        }
        other => panic!("expected deferred leaf, got {other:?}"),
    }
}

#[test]
fn constraints_compare_only_by_identity() {
    let f = Fixture::new();
    let a = ConstraintType::CanIndex {
        key: TypeId::INT,
        value: TypeId::STRING,
    };
    let b = ConstraintType::CanIndex {
        key: TypeId::INT,
        value: TypeId::STRING,
    };
    let c = ConstraintType::CanIndex {
        key: TypeId::INT,
        value: TypeId::BOOL,
    };
    assert!(f.simplify(a.clone(), b).is_valid());
    let kind = unsat_kind(f.simplify(a, c));
    assert_eq!(kind, FailureKind::ConstraintMismatch);
}
