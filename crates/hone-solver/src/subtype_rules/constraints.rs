//! Constraint-type goals: capability obligations on the supertype side.
//!
//! Constraint types arise from use sites (member access, iteration,
//! destructuring, indexing, type switches) rather than declared shapes.
//! The subtype side decomposes exactly as for ordinary goals; a concrete
//! subtype is then checked against the specific obligation, consulting the
//! hierarchy where the obligation is nominal. `dynamic` satisfies the
//! structural capability obligations outright.

use crate::diagnostics::FailureKind;
use crate::goal::SubtypeGoal;
use crate::hierarchy::ClassHierarchy;
use crate::prop::Prop;
use crate::subtype::SubtypeSimplifier;
use crate::types::{
    ClassData, ConstraintType, Exactness, InternalType, ShapeData, TypeData, TypeId,
    TypeSwitchPredicate,
};
use crate::visited::GoalSide;
use std::sync::Arc;

impl<'a, H: ClassHierarchy + ?Sized> SubtypeSimplifier<'a, H> {
    pub(crate) fn simplify_constraint_sup(
        &mut self,
        sub: TypeId,
        cstr: &Arc<ConstraintType>,
        goal: &SubtypeGoal,
    ) -> Prop {
        let sub_data = self.db.lookup(sub);
        let sup = InternalType::Cstr(Arc::clone(cstr));

        match &*sub_data {
            TypeData::Var(_) => {
                return Prop::IsSubtype(goal.coercion, goal.sub.clone(), goal.sup.clone());
            }
            TypeData::Union(members) => {
                let mut props = Vec::with_capacity(members.len());
                for &m in members {
                    props.push(self.simplify(&goal.retry(m, sup.clone())));
                }
                return Prop::conj(props);
            }
            TypeData::Nullable(inner) => {
                return Prop::conj2(
                    self.simplify(&goal.retry(TypeId::NULL, sup.clone())),
                    self.simplify(&goal.retry(*inner, sup)),
                );
            }
            TypeData::Intersection(members) => {
                if self.intersection_is_empty(members) {
                    return Prop::Valid;
                }
                let fail = self.lazy_failure(goal, FailureKind::ConstraintMismatch);
                let mut branches = Vec::with_capacity(members.len());
                for &m in members {
                    branches.push(self.simplify(&goal.retry(m, sup.clone())));
                }
                return Prop::disj(fail, branches);
            }
            TypeData::Generic(name, _) => {
                match goal.visited.try_add(*name, GoalSide::Upper, &goal.sup) {
                    None => return self.invalid(goal, FailureKind::GenericCycle(*name)),
                    Some(visited) => {
                        let nested = goal.with_visited(visited);
                        let fail = self.lazy_failure(goal, FailureKind::ConstraintMismatch);
                        let mut branches = Vec::new();
                        for bound in self.hierarchy.generic_upper_bounds(*name) {
                            branches.push(self.simplify(&nested.retry(bound, sup.clone())));
                        }
                        return Prop::disj(fail, branches);
                    }
                }
            }
            TypeData::Newtype(_, _, bound) | TypeData::Dependent(_, bound) => {
                return self.simplify(&goal.retry(*bound, sup));
            }
            TypeData::SupportsDynamic(inner) => {
                let mut stripped = goal.retry(*inner, sup);
                stripped.sub_supportdyn = Some(goal.sub_span);
                return self.simplify(&stripped);
            }
            TypeData::Dynamic => return Prop::Valid,
            _ => {}
        }

        match &**cstr {
            ConstraintType::HasMember { name, ty, .. } => {
                self.check_has_member(&sub_data, *name, *ty, goal)
            }
            ConstraintType::HasTypeMember { name, lower, upper } => {
                self.check_has_type_member(&sub_data, *name, *lower, *upper, goal)
            }
            ConstraintType::Destructure {
                required,
                optional,
                variadic,
                ..
            } => self.check_destructure(&sub_data, required, optional, *variadic, goal),
            ConstraintType::CanIndex { key, value } => {
                self.check_can_index(&sub_data, *key, *value, goal)
            }
            ConstraintType::CanTraverse {
                key,
                value,
                is_async,
            } => self.check_can_traverse(&sub_data, *key, *value, *is_async, goal),
            ConstraintType::TypeSwitch {
                predicate,
                true_ty,
                false_ty,
            } => self.check_type_switch(sub, *predicate, *true_ty, *false_ty, goal),
        }
    }

    fn check_has_member(
        &mut self,
        sub_data: &TypeData,
        name: hone_common::Atom,
        expected: TypeId,
        goal: &SubtypeGoal,
    ) -> Prop {
        match sub_data {
            TypeData::Class(class) => {
                match self.hierarchy.member_type(class.name, &class.args, name) {
                    Some(member) => self.simplify(&goal.child_covariant(member, expected)),
                    None => self.invalid(goal, FailureKind::MissingMember(name)),
                }
            }
            _ => self.invalid(goal, FailureKind::MissingMember(name)),
        }
    }

    fn check_has_type_member(
        &mut self,
        sub_data: &TypeData,
        name: hone_common::Atom,
        lower: TypeId,
        upper: TypeId,
        goal: &SubtypeGoal,
    ) -> Prop {
        match sub_data {
            TypeData::Class(class) => match self.class_type_member_bounds(class, name) {
                Some(bounds) => Prop::conj2(
                    self.simplify(&goal.child(lower, bounds.lower)),
                    self.simplify(&goal.child(bounds.upper, upper)),
                ),
                None => self.invalid(goal, FailureKind::MissingTypeMember(name)),
            },
            _ => self.invalid(goal, FailureKind::MissingTypeMember(name)),
        }
    }

    fn class_type_member_bounds(
        &self,
        class: &ClassData,
        name: hone_common::Atom,
    ) -> Option<crate::types::RefinedBounds> {
        if let Some(refinement) = &class.refinement {
            if let Some(bounds) = refinement.member(name) {
                return Some(bounds);
            }
        }
        self.hierarchy.type_member_bounds(class.name, name)
    }

    fn check_destructure(
        &mut self,
        sub_data: &TypeData,
        required: &[TypeId],
        optional: &[TypeId],
        variadic: Option<TypeId>,
        goal: &SubtypeGoal,
    ) -> Prop {
        match sub_data {
            TypeData::Tuple(elements) => {
                if elements.len() < required.len() {
                    return self.invalid(goal, FailureKind::NotDestructurable);
                }
                let mut props = Vec::with_capacity(elements.len());
                for (i, &element) in elements.iter().enumerate() {
                    let target = if i < required.len() {
                        required[i]
                    } else if i < required.len() + optional.len() {
                        optional[i - required.len()]
                    } else {
                        match variadic {
                            Some(v) => v,
                            None => return self.invalid(goal, FailureKind::NotDestructurable),
                        }
                    };
                    props.push(self.simplify(&goal.child_covariant(element, target)));
                }
                Prop::conj(props)
            }
            // A traversable class destructures element-wise: every
            // component receives the element type.
            TypeData::Class(class) => {
                match self.hierarchy.traverse_types(class.name, &class.args, false) {
                    Some((_key, value)) => {
                        let mut props = Vec::new();
                        for &target in required.iter().chain(optional.iter()) {
                            props.push(self.simplify(&goal.child_covariant(value, target)));
                        }
                        if let Some(v) = variadic {
                            props.push(self.simplify(&goal.child_covariant(value, v)));
                        }
                        Prop::conj(props)
                    }
                    None => self.invalid(goal, FailureKind::NotDestructurable),
                }
            }
            _ => self.invalid(goal, FailureKind::NotDestructurable),
        }
    }

    fn check_can_index(
        &mut self,
        sub_data: &TypeData,
        key: TypeId,
        value: TypeId,
        goal: &SubtypeGoal,
    ) -> Prop {
        match sub_data {
            TypeData::Class(class) => {
                match self.hierarchy.index_types(class.name, &class.args) {
                    Some((index_key, index_value)) => Prop::conj2(
                        // The provided key flows into the container's key.
                        self.simplify(&goal.child(key, index_key)),
                        self.simplify(&goal.child_covariant(index_value, value)),
                    ),
                    None => self.invalid(goal, FailureKind::NotIndexable),
                }
            }
            TypeData::Tuple(elements) => {
                let mut props = vec![self.simplify(&goal.child(key, TypeId::INT))];
                for &element in elements {
                    props.push(self.simplify(&goal.child_covariant(element, value)));
                }
                Prop::conj(props)
            }
            TypeData::Shape(shape) => {
                let mut props = vec![self.simplify(&goal.child(key, TypeId::ARRAYKEY))];
                props.push(self.shape_values_into(shape, value, goal));
                Prop::conj(props)
            }
            _ => self.invalid(goal, FailureKind::NotIndexable),
        }
    }

    fn check_can_traverse(
        &mut self,
        sub_data: &TypeData,
        key: Option<TypeId>,
        value: TypeId,
        is_async: bool,
        goal: &SubtypeGoal,
    ) -> Prop {
        match sub_data {
            TypeData::Class(class) => {
                match self.hierarchy.traverse_types(class.name, &class.args, is_async) {
                    Some((elem_key, elem_value)) => {
                        let mut props = Vec::with_capacity(2);
                        if let Some(key) = key {
                            props.push(self.simplify(&goal.child_covariant(elem_key, key)));
                        }
                        props.push(self.simplify(&goal.child_covariant(elem_value, value)));
                        Prop::conj(props)
                    }
                    None => self.invalid(goal, FailureKind::NotTraversable),
                }
            }
            TypeData::Tuple(elements) => {
                let mut props = Vec::with_capacity(elements.len() + 1);
                if let Some(key) = key {
                    props.push(self.simplify(&goal.child_covariant(TypeId::INT, key)));
                }
                for &element in elements {
                    props.push(self.simplify(&goal.child_covariant(element, value)));
                }
                Prop::conj(props)
            }
            TypeData::Shape(shape) => {
                let mut props = Vec::with_capacity(2);
                if let Some(key) = key {
                    props.push(self.simplify(&goal.child_covariant(TypeId::ARRAYKEY, key)));
                }
                props.push(self.shape_values_into(shape, value, goal));
                Prop::conj(props)
            }
            _ => self.invalid(goal, FailureKind::NotTraversable),
        }
    }

    fn shape_values_into(&mut self, shape: &ShapeData, value: TypeId, goal: &SubtypeGoal) -> Prop {
        let mut props = Vec::with_capacity(shape.fields.len() + 1);
        for field in &shape.fields {
            props.push(self.simplify(&goal.child_covariant(field.ty, value)));
        }
        if let Some(open) = shape.open {
            props.push(self.simplify(&goal.child_covariant(open, value)));
        }
        Prop::conj(props)
    }

    /// Split the subtype through the predicate: the matching part must
    /// satisfy the true branch, the rest the false branch. Disjointness
    /// collapses the impossible half to bottom.
    fn check_type_switch(
        &mut self,
        sub: TypeId,
        predicate: TypeSwitchPredicate,
        true_ty: TypeId,
        false_ty: TypeId,
        goal: &SubtypeGoal,
    ) -> Prop {
        let matched = self.predicate_type(predicate);
        let unmatched = self.predicate_negation(predicate);
        let true_part = self.db.intersection(vec![sub, matched]);
        let false_part = self.db.intersection(vec![sub, unmatched]);
        Prop::conj2(
            self.simplify(&goal.child(true_part, true_ty)),
            self.simplify(&goal.child(false_part, false_ty)),
        )
    }

    fn predicate_type(&self, predicate: TypeSwitchPredicate) -> TypeId {
        match predicate {
            TypeSwitchPredicate::IsNull => TypeId::NULL,
            TypeSwitchPredicate::IsPrim(p) => self.db.prim(p),
            TypeSwitchPredicate::IsClass(name) => {
                self.db.class(name, Exactness::Nonexact, Vec::new())
            }
        }
    }

    fn predicate_negation(&self, predicate: TypeSwitchPredicate) -> TypeId {
        match predicate {
            TypeSwitchPredicate::IsNull => TypeId::NONNULL,
            TypeSwitchPredicate::IsPrim(p) => self.db.neg(crate::types::NegKind::Prim(p)),
            TypeSwitchPredicate::IsClass(name) => self.db.neg(crate::types::NegKind::Class(name)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/constraint_tests.rs"]
mod tests;
