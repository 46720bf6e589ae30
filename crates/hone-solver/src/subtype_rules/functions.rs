//! Function subtype checking.
//!
//! Attribute checks come first and are hard yes/no decisions; only then do
//! the recursive comparisons run: parameters contravariantly (`inout`
//! parameters in both directions), the implicit capability
//! contravariantly, and finally the return type covariantly.

use crate::diagnostics::FailureKind;
use crate::goal::SubtypeGoal;
use crate::hierarchy::ClassHierarchy;
use crate::prop::Prop;
use crate::subtype::SubtypeSimplifier;
use crate::types::{FnFlags, FunctionData, ParamInfo, ParamMode, TypeId};

impl<'a, H: ClassHierarchy + ?Sized> SubtypeSimplifier<'a, H> {
    pub(crate) fn simplify_function(
        &mut self,
        f1: &FunctionData,
        f2: &FunctionData,
        goal: &SubtypeGoal,
    ) -> Prop {
        // --- Attribute checks ---------------------------------------------

        // Callers through the supertype may pass a readonly receiver.
        if f2.flags.contains(FnFlags::READONLY_THIS) && !f1.flags.contains(FnFlags::READONLY_THIS) {
            return self.invalid(goal, FailureKind::ReadonlyThisMismatch);
        }
        // A readonly result cannot flow where a mutable one is promised.
        if f1.flags.contains(FnFlags::READONLY_RETURN) && !f2.flags.contains(FnFlags::READONLY_RETURN)
        {
            return self.invalid(goal, FailureKind::ReadonlyReturnMismatch);
        }
        // A disposable result must be declared so the caller disposes it.
        if f1.flags.contains(FnFlags::RETURNS_DISPOSABLE)
            && !f2.flags.contains(FnFlags::RETURNS_DISPOSABLE)
        {
            return self.invalid(goal, FailureKind::ReturnsDisposableMismatch);
        }
        // Cross-package visibility is part of the call contract, both ways.
        if f1.flags.contains(FnFlags::CROSS_PACKAGE) != f2.flags.contains(FnFlags::CROSS_PACKAGE) {
            return self.invalid(goal, FailureKind::CrossPackageMismatch);
        }

        // --- Arity --------------------------------------------------------

        // The subtype must accept every call shape the supertype admits:
        // it may not require more positional arguments than the supertype
        // declares, and a variadic supertype needs a variadic subtype.
        if f1.params.len() > f2.params.len() {
            return self.invalid(
                goal,
                FailureKind::FunctionArity {
                    sub_min: f1.params.len(),
                    sup_min: f2.params.len(),
                },
            );
        }
        if f2.variadic.is_some() && f1.variadic.is_none() {
            return self.invalid(goal, FailureKind::FunctionVariadicMissing);
        }
        // Legacy rule, deliberately one-directional: a named variadic may
        // not override an unnamed one, while the reverse is accepted.
        if let (Some(v1), Some(v2)) = (&f1.variadic, &f2.variadic) {
            if v1.name.is_some() && v2.name.is_none() {
                return self.invalid(goal, FailureKind::VariadicNameMismatch);
            }
        }

        // --- Parameters (contravariant; inout invariant) ------------------

        let mut props = Vec::with_capacity(f2.params.len() + 2);
        for (index, sup_param) in f2.params.iter().enumerate() {
            let sub_param = match f1.params.get(index).or(f1.variadic.as_ref()) {
                Some(p) => p,
                None => {
                    return self.invalid(
                        goal,
                        FailureKind::FunctionArity {
                            sub_min: f1.params.len(),
                            sup_min: f2.params.len(),
                        },
                    );
                }
            };
            match self.check_param(index, sub_param, sup_param, goal) {
                Ok(prop) => props.push(prop),
                Err(unsat) => return unsat,
            }
        }
        if let (Some(v1), Some(v2)) = (&f1.variadic, &f2.variadic) {
            match self.check_param(f2.params.len(), v1, v2, goal) {
                Ok(prop) => props.push(prop),
                Err(unsat) => return unsat,
            }
        }

        // --- Implicit capability (contravariant, coeffect mode) -----------

        if f1.capability.is_some() || f2.capability.is_some() {
            // No declared capability means the function requires nothing
            // of its context.
            let sub_cap = f1.capability.unwrap_or(TypeId::MIXED);
            let sup_cap = f2.capability.unwrap_or(TypeId::MIXED);
            let mut cap_goal = goal.child(sup_cap, sub_cap);
            cap_goal.mode.is_coeffect = true;
            props.push(self.simplify(&cap_goal));
        }

        // --- Return type (covariant) --------------------------------------

        props.push(self.simplify(&goal.child_covariant(f1.ret, f2.ret)));

        Prop::conj(props)
    }

    /// One parameter position. Mode must match exactly; a readonly
    /// supertype parameter needs a readonly subtype parameter; `inout`
    /// positions compare in both directions.
    fn check_param(
        &mut self,
        index: usize,
        sub_param: &ParamInfo,
        sup_param: &ParamInfo,
        goal: &SubtypeGoal,
    ) -> Result<Prop, Prop> {
        if sub_param.mode != sup_param.mode {
            return Err(self.invalid(goal, FailureKind::ParamModeMismatch { index }));
        }
        if sup_param.readonly && !sub_param.readonly {
            return Err(self.invalid(goal, FailureKind::ParamReadonlyMismatch { index }));
        }
        let prop = match sup_param.mode {
            ParamMode::Inout => Prop::conj2(
                self.simplify(&goal.child(sup_param.ty, sub_param.ty)),
                self.simplify(&goal.child(sub_param.ty, sup_param.ty)),
            ),
            ParamMode::Normal => self.simplify(&goal.child(sup_param.ty, sub_param.ty)),
        };
        Ok(prop)
    }
}

#[cfg(test)]
#[path = "../../tests/function_tests.rs"]
mod tests;
