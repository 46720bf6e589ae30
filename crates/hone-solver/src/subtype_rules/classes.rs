//! Nominal subtype checking: classes, newtypes, and type-member
//! refinements.
//!
//! Same-name class goals decompose argument-wise by declared variance;
//! this is sound because class constructors are injective — distinct
//! instantiations of one class are never related except through their
//! arguments. Different-name goals walk one level up the ancestor
//! relation (with substitution) and retry, so a deep hierarchy costs one
//! step per level rather than a precomputed transitive table.

use crate::diagnostics::FailureKind;
use crate::goal::SubtypeGoal;
use crate::hierarchy::{ClassHierarchy, ClassKind};
use crate::instantiate::{TypeSubstitution, instantiate_type};
use crate::prop::Prop;
use crate::subtype::SubtypeSimplifier;
use crate::types::{ClassData, ClassRefinement, Exactness, TypeId, TypeParamInfo, Variance};
use hone_common::Atom;

impl<'a, H: ClassHierarchy + ?Sized> SubtypeSimplifier<'a, H> {
    pub(crate) fn simplify_class(
        &mut self,
        c1: &ClassData,
        sup: TypeId,
        c2: &ClassData,
        goal: &SubtypeGoal,
    ) -> Prop {
        if c1.name == c2.name {
            return self.simplify_same_class(c1, c2, goal);
        }

        // Walk one level up the ancestor relation and retry. Traits and
        // interfaces additionally promise their requirement upper bounds.
        let params = self.hierarchy.type_params(c1.name);
        let subst = TypeSubstitution::from_params(&params, &c1.args);
        let mut links = self.hierarchy.ancestors(c1.name);
        if matches!(
            self.hierarchy.kind(c1.name),
            Some(ClassKind::Interface | ClassKind::Trait)
        ) {
            links.extend(self.hierarchy.requirements(c1.name));
        }

        let fail = self.lazy_failure(goal, FailureKind::Mismatch);
        let mut branches = Vec::with_capacity(links.len());
        for link in links {
            let args: Vec<TypeId> = link
                .args
                .iter()
                .map(|&a| instantiate_type(self.db, &subst, a))
                .collect();
            // Exactness does not survive upcasting.
            let ancestor = self.db.class(link.name, Exactness::Nonexact, args);
            branches.push(self.simplify(&goal.retry(ancestor, sup)));
        }
        Prop::disj(fail, branches)
    }

    fn simplify_same_class(&mut self, c1: &ClassData, c2: &ClassData, goal: &SubtypeGoal) -> Prop {
        // An exact supertype accepts only exact subtypes.
        if c2.exact == Exactness::Exact && c1.exact != Exactness::Exact {
            return self.invalid(goal, FailureKind::ExactnessMismatch);
        }

        let refinement_prop = match &c2.refinement {
            Some(refinement) => self.check_refinement(c1, refinement, goal),
            None => Prop::Valid,
        };
        if refinement_prop.is_unsat() {
            return refinement_prop;
        }

        if c1.args.is_empty() && c2.args.is_empty() {
            return refinement_prop;
        }
        if c1.args.len() != c2.args.len() {
            return self.invalid(goal, FailureKind::Mismatch);
        }
        let params = self.hierarchy.type_params(c1.name);
        let args_prop = self.simplify_variant_args(&params, &c1.args, &c2.args, goal);
        Prop::conj2(args_prop, refinement_prop)
    }

    /// Argument-wise decomposition by declared variance. Parameters with
    /// no declared variance are treated as invariant.
    pub(crate) fn simplify_variant_args(
        &mut self,
        params: &[TypeParamInfo],
        sub_args: &[TypeId],
        sup_args: &[TypeId],
        goal: &SubtypeGoal,
    ) -> Prop {
        let mut props = Vec::with_capacity(sub_args.len());
        for (i, (&a, &b)) in sub_args.iter().zip(sup_args.iter()).enumerate() {
            let variance = params.get(i).map_or(Variance::Invariant, |p| p.variance);
            match variance {
                Variance::Covariant => props.push(self.simplify(&goal.child_covariant(a, b))),
                Variance::Contravariant => props.push(self.simplify(&goal.child(b, a))),
                Variance::Invariant => {
                    props.push(self.simplify(&goal.child(a, b)));
                    props.push(self.simplify(&goal.child(b, a)));
                }
            }
        }
        Prop::conj(props)
    }

    /// Every member the supertype refines must be guaranteed by the
    /// subtype: the subtype's bounds for that member must sit inside the
    /// demanded interval.
    fn check_refinement(
        &mut self,
        c1: &ClassData,
        refinement: &ClassRefinement,
        goal: &SubtypeGoal,
    ) -> Prop {
        let mut props = Vec::with_capacity(refinement.members.len());
        for &(name, demanded) in &refinement.members {
            let guaranteed = self.subtype_member_bounds(c1, name);
            match guaranteed {
                None => return self.invalid(goal, FailureKind::MissingTypeMember(name)),
                Some(bounds) => {
                    props.push(self.simplify(&goal.child(demanded.lower, bounds.lower)));
                    props.push(self.simplify(&goal.child(bounds.upper, demanded.upper)));
                }
            }
        }
        Prop::conj(props)
    }

    fn subtype_member_bounds(
        &self,
        c1: &ClassData,
        name: Atom,
    ) -> Option<crate::types::RefinedBounds> {
        if let Some(refinement) = &c1.refinement {
            if let Some(bounds) = refinement.member(name) {
                return Some(bounds);
            }
        }
        self.hierarchy.type_member_bounds(c1.name, name)
    }

    /// Same-name newtype goals decompose argument-wise like classes.
    pub(crate) fn simplify_newtype_args(
        &mut self,
        name: Atom,
        sub_args: &[TypeId],
        sup_args: &[TypeId],
        goal: &SubtypeGoal,
    ) -> Prop {
        if sub_args.len() != sup_args.len() {
            return self.invalid(goal, FailureKind::Mismatch);
        }
        let params = self.hierarchy.type_params(name);
        self.simplify_variant_args(&params, sub_args, sup_args, goal)
    }
}
