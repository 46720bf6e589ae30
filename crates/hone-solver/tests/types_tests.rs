use super::*;

#[test]
fn primitive_lattice() {
    use PrimKind::*;
    assert!(Int.is_subtype_of(Int));
    assert!(Int.is_subtype_of(Num));
    assert!(Float.is_subtype_of(Num));
    assert!(Int.is_subtype_of(Arraykey));
    assert!(String.is_subtype_of(Arraykey));

    assert!(!Num.is_subtype_of(Int));
    assert!(!Arraykey.is_subtype_of(String));
    assert!(!Bool.is_subtype_of(Num));
}

#[test]
fn primitive_disjointness_table() {
    use PrimKind::*;
    assert!(Int.disjoint_from(String));
    assert!(!Int.disjoint_from(Num));
    assert!(!Num.disjoint_from(Int));
    assert!(!String.disjoint_from(Arraykey));
    assert!(Null.disjoint_from(Int));
    assert!(!Int.disjoint_from(Int));
}

#[test]
fn shape_field_lookup_is_by_name() {
    let fields = vec![
        ShapeField {
            name: hone_common::Atom(1),
            optional: false,
            ty: TypeId::INT,
        },
        ShapeField {
            name: hone_common::Atom(2),
            optional: true,
            ty: TypeId::STRING,
        },
    ];
    let shape = ShapeData { fields, open: None };
    assert_eq!(shape.field(hone_common::Atom(1)).map(|f| f.ty), Some(TypeId::INT));
    assert!(shape.field(hone_common::Atom(2)).is_some_and(|f| f.optional));
    assert!(shape.field(hone_common::Atom(3)).is_none());
    assert!(!shape.is_open());
}

#[test]
fn function_arity_bounds() {
    let f = FunctionData {
        params: vec![ParamInfo::positional(TypeId::INT)],
        variadic: None,
        ret: TypeId::STRING,
        flags: FnFlags::empty(),
        capability: None,
    };
    assert_eq!(f.min_arity(), 1);
    assert_eq!(f.max_arity(), Some(1));

    let variadic = FunctionData {
        variadic: Some(ParamInfo::positional(TypeId::INT)),
        ..f
    };
    assert_eq!(variadic.max_arity(), None);
}

#[test]
fn internal_type_conversions() {
    let ty: InternalType = TypeId::INT.into();
    assert_eq!(ty.as_ty(), Some(TypeId::INT));
    assert!(!ty.is_constraint());

    let cstr: InternalType = ConstraintType::CanIndex {
        key: TypeId::INT,
        value: TypeId::STRING,
    }
    .into();
    assert!(cstr.is_constraint());
    assert_eq!(cstr.as_ty(), None);
}
