//! Generic type instantiation.
//!
//! Substitutes generic parameters by actual type arguments. Used when
//! walking the ancestor relation (a base's type arguments are declared
//! over the child's parameters) and when expanding newtype bodies.

use crate::intern::TypeInterner;
use crate::types::{
    ClassData, ClassRefinement, FunctionData, ParamInfo, RefinedBounds, ShapeData, ShapeField,
    TypeData, TypeId, TypeParamInfo,
};
use hone_common::Atom;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Mapping from generic parameter names to actual types.
#[derive(Clone, Debug, Default)]
pub struct TypeSubstitution {
    map: FxHashMap<Atom, TypeId>,
}

impl TypeSubstitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair up declared parameters with actual arguments. Surplus on
    /// either side is ignored; arity errors are the caller's concern.
    pub fn from_params(params: &[TypeParamInfo], args: &[TypeId]) -> Self {
        let mut subst = Self::new();
        for (param, &arg) in params.iter().zip(args.iter()) {
            subst.map.insert(param.name, arg);
        }
        subst
    }

    pub fn insert(&mut self, name: Atom, ty: TypeId) {
        self.map.insert(name, ty);
    }

    pub fn get(&self, name: Atom) -> Option<TypeId> {
        self.map.get(&name).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Substitute through a type. Interned types are acyclic, so the walk
/// terminates without a guard.
pub fn instantiate_type(db: &TypeInterner, subst: &TypeSubstitution, ty: TypeId) -> TypeId {
    if subst.is_empty() {
        return ty;
    }
    match &*db.lookup(ty) {
        TypeData::Prim(_)
        | TypeData::Nonnull
        | TypeData::Dynamic
        | TypeData::Neg(_)
        | TypeData::Var(_) => ty,
        TypeData::Nullable(inner) => {
            let inner = instantiate_type(db, subst, *inner);
            db.nullable(inner)
        }
        TypeData::Union(members) => {
            let members = instantiate_list(db, subst, members);
            db.union(members)
        }
        TypeData::Intersection(members) => {
            let members = instantiate_list(db, subst, members);
            db.intersection(members)
        }
        TypeData::Tuple(elements) => {
            let elements = instantiate_list(db, subst, elements);
            db.tuple(elements)
        }
        TypeData::Shape(shape) => {
            let fields = shape
                .fields
                .iter()
                .map(|f| ShapeField {
                    name: f.name,
                    optional: f.optional,
                    ty: instantiate_type(db, subst, f.ty),
                })
                .collect();
            let open = shape.open.map(|t| instantiate_type(db, subst, t));
            db.intern(TypeData::Shape(ShapeData { fields, open }))
        }
        TypeData::Function(func) => {
            let params = func
                .params
                .iter()
                .map(|p| ParamInfo {
                    ty: instantiate_type(db, subst, p.ty),
                    ..p.clone()
                })
                .collect();
            let variadic = func.variadic.as_ref().map(|p| ParamInfo {
                ty: instantiate_type(db, subst, p.ty),
                ..p.clone()
            });
            db.function(FunctionData {
                params,
                variadic,
                ret: instantiate_type(db, subst, func.ret),
                flags: func.flags,
                capability: func.capability.map(|c| instantiate_type(db, subst, c)),
            })
        }
        TypeData::Class(class) => {
            let args = instantiate_list(db, subst, &class.args);
            let refinement = class.refinement.as_ref().map(|r| ClassRefinement {
                members: r
                    .members
                    .iter()
                    .map(|(name, bounds)| {
                        (
                            *name,
                            RefinedBounds {
                                lower: instantiate_type(db, subst, bounds.lower),
                                upper: instantiate_type(db, subst, bounds.upper),
                            },
                        )
                    })
                    .collect(),
            });
            db.intern(TypeData::Class(Arc::new(ClassData {
                name: class.name,
                exact: class.exact,
                args,
                refinement,
            })))
        }
        TypeData::Generic(name, args) => {
            if args.is_empty() {
                subst.get(*name).unwrap_or(ty)
            } else {
                // Higher-kinded application: the head stays opaque, only
                // the arguments are substituted.
                let args = instantiate_list(db, subst, args);
                db.generic_applied(*name, args)
            }
        }
        TypeData::Newtype(name, args, bound) => {
            let args = instantiate_list(db, subst, args);
            let bound = instantiate_type(db, subst, *bound);
            db.newtype(*name, args, bound)
        }
        TypeData::Dependent(kind, bound) => {
            let bound = instantiate_type(db, subst, *bound);
            db.dependent(*kind, bound)
        }
        TypeData::SupportsDynamic(inner) => {
            let inner = instantiate_type(db, subst, *inner);
            db.supports_dynamic(inner)
        }
    }
}

fn instantiate_list(db: &TypeInterner, subst: &TypeSubstitution, list: &[TypeId]) -> Vec<TypeId> {
    list.iter().map(|&t| instantiate_type(db, subst, t)).collect()
}

#[cfg(test)]
#[path = "../tests/instantiate_tests.rs"]
mod tests;
