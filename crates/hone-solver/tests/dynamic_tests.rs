//! Gradual-typing overlay: dynamic, supportdyn, like-pushing, coercion.

use super::*;
use crate::goal::{Coercion, SubtypeGoal};
use crate::test_support::Fixture;
use crate::types::{Exactness, FnFlags, FunctionData, ParamInfo, TypeId, Variance};

#[test]
fn primitives_support_dynamic() {
    let f = Fixture::new();
    assert!(f.holds(TypeId::INT, TypeId::DYNAMIC));
    assert!(f.holds(TypeId::NULL, TypeId::DYNAMIC));
    assert!(f.holds(TypeId::STRING, TypeId::DYNAMIC));
}

#[test]
fn dynamic_is_not_below_concrete_types_by_default() {
    let f = Fixture::new();
    assert!(f.fails(TypeId::DYNAMIC, TypeId::INT));
    assert!(f.holds(TypeId::DYNAMIC, TypeId::DYNAMIC));
    assert!(f.holds(TypeId::DYNAMIC, TypeId::MIXED));
}

#[test]
fn coercion_makes_dynamic_a_bottom_or_top() {
    let f = Fixture::new();
    let from = SubtypeGoal::new(TypeId::DYNAMIC, TypeId::INT).with_coercion(Coercion::FromDynamic);
    assert!(f.simplify_goal(&from).is_valid());

    // A function type does not support dynamic, unless the goal coerces
    // towards it.
    let func = f.db.function(FunctionData {
        params: vec![ParamInfo::positional(TypeId::INT)],
        variadic: None,
        ret: TypeId::INT,
        flags: FnFlags::empty(),
        capability: None,
    });
    assert!(f.fails(func, TypeId::DYNAMIC));
    let to = SubtypeGoal::new(func, TypeId::DYNAMIC).with_coercion(Coercion::ToDynamic);
    assert!(f.simplify_goal(&to).is_valid());
}

#[test]
fn supportdyn_sits_below_dynamic_and_its_inner_type() {
    let f = Fixture::new();
    let sd_int = f.db.supports_dynamic(TypeId::INT);
    assert!(f.holds(sd_int, TypeId::DYNAMIC));
    assert!(f.holds(sd_int, TypeId::INT));
    assert!(f.holds(sd_int, TypeId::NUM));
    assert!(f.fails(sd_int, TypeId::STRING));
}

#[test]
fn entering_supportdyn_needs_both_halves() {
    let f = Fixture::new();
    let sd_num = f.db.supports_dynamic(TypeId::NUM);
    // int supports dynamic and is below num.
    assert!(f.holds(TypeId::INT, sd_num));
    // string supports dynamic but is not below num.
    assert!(f.fails(TypeId::STRING, sd_num));

    // A wrapped subtype carries its dynamic half for free.
    let sd_int = f.db.supports_dynamic(TypeId::INT);
    assert!(f.holds(sd_int, sd_num));
}

#[test]
fn class_needs_declared_dynamic_support() {
    use crate::hierarchy::{ClassDecl, ClassKind};
    use crate::types::TypeParamInfo;

    let mut f = Fixture::new();
    let box_name = f.add_class_1p("Box", Variance::Covariant);
    // Only Vector opts into dynamic.
    let vec_name = f.atom("Vector");
    let mut decl = ClassDecl::new(ClassKind::Class);
    decl.type_params = vec![TypeParamInfo {
        name: f.atom("T"),
        variance: Variance::Covariant,
    }];
    decl.supports_dynamic = true;
    f.hierarchy.add_class(vec_name, decl);

    let vec_int = f.db.class(vec_name, Exactness::Nonexact, vec![TypeId::INT]);
    let box_int = f.db.class(box_name, Exactness::Nonexact, vec![TypeId::INT]);
    assert!(f.holds(vec_int, TypeId::DYNAMIC));
    assert!(f.fails(box_int, TypeId::DYNAMIC));
}

#[test]
fn like_pushing_distributes_over_covariant_components() {
    let mut f = Fixture::new();
    let vec_name = f.add_class_1p("Vector", Variance::Covariant);
    let vec_dynamic = f.db.class(vec_name, Exactness::Nonexact, vec![TypeId::DYNAMIC]);
    let vec_int = f.db.class(vec_name, Exactness::Nonexact, vec![TypeId::INT]);

    // ~Vector<int> is dynamic | Vector<int>. The whole aggregate is not
    // below either disjunct, but pushing the like onto the covariant
    // element accepts it.
    let like_vec_int = f.db.union(vec![TypeId::DYNAMIC, vec_int]);
    assert!(f.holds(vec_dynamic, like_vec_int));

    // Without the dynamic member there is no license.
    assert!(f.fails(vec_dynamic, vec_int));
}

#[test]
fn liked_supertype_accepts_dynamic_directly() {
    let f = Fixture::new();
    let goal = SubtypeGoal::new(TypeId::DYNAMIC, TypeId::INT).liked();
    assert!(f.simplify_goal(&goal).is_valid());
}
