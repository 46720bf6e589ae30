//! Structural subtype checking: tuples and shapes.

use crate::diagnostics::{FailureKind, FixHint};
use crate::goal::SubtypeGoal;
use crate::hierarchy::ClassHierarchy;
use crate::prop::Prop;
use crate::subtype::SubtypeSimplifier;
use crate::types::{ShapeData, TypeId};
use hone_common::Atom;

/// Projection of a shape onto one field name.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum FieldProjection {
    Required(TypeId),
    Optional(TypeId),
    Absent,
}

fn project(shape: &ShapeData, name: Atom) -> FieldProjection {
    match shape.field(name) {
        Some(field) if field.optional => FieldProjection::Optional(field.ty),
        Some(field) => FieldProjection::Required(field.ty),
        // An open shape may contain any absent field at its declared
        // unknown-field type.
        None => match shape.open {
            Some(open_ty) => FieldProjection::Optional(open_ty),
            None => FieldProjection::Absent,
        },
    }
}

impl<'a, H: ClassHierarchy + ?Sized> SubtypeSimplifier<'a, H> {
    /// Tuples are covariant element-wise with exact arity.
    pub(crate) fn simplify_tuple(
        &mut self,
        subs: &[TypeId],
        sups: &[TypeId],
        goal: &SubtypeGoal,
    ) -> Prop {
        if subs.len() != sups.len() {
            return self.invalid(
                goal,
                FailureKind::TupleArity {
                    sub_len: subs.len(),
                    sup_len: sups.len(),
                },
            );
        }
        let mut props = Vec::with_capacity(subs.len());
        for (&a, &b) in subs.iter().zip(sups.iter()) {
            props.push(self.simplify(&goal.child_covariant(a, b)));
        }
        Prop::conj(props)
    }

    /// Shapes compare field-wise through the projection table. The only
    /// valid pairings are R≤R, R≤O, O≤O, A≤O, and A≤A; everything else
    /// fails with a field-specific reason. An open subtype can never
    /// satisfy a closed supertype, regardless of fields.
    pub(crate) fn simplify_shape(
        &mut self,
        s1: &ShapeData,
        s2: &ShapeData,
        goal: &SubtypeGoal,
    ) -> Prop {
        if s1.is_open() && !s2.is_open() {
            return self.invalid(goal, FailureKind::OpenShapeToClosed);
        }

        let mut props = Vec::with_capacity(s1.fields.len() + s2.fields.len());
        for name in field_names(s1, s2) {
            use FieldProjection::*;
            match (project(s1, name), project(s2, name)) {
                (Required(a), Required(b) | Optional(b)) | (Optional(a), Optional(b)) => {
                    props.push(self.simplify(&goal.child_covariant(a, b)));
                }
                (Absent, Optional(_) | Absent) => {}
                (Optional(_), Required(_)) => {
                    return self.invalid_fix(
                        goal,
                        FailureKind::OptionalShapeField(name),
                        FixHint::MakeShapeFieldRequired(name),
                    );
                }
                (Absent, Required(_)) => {
                    return self.invalid_fix(
                        goal,
                        FailureKind::MissingShapeField(name),
                        FixHint::AddShapeField(name),
                    );
                }
                (Required(_) | Optional(_), Absent) => {
                    return self.invalid(goal, FailureKind::UnexpectedShapeField(name));
                }
            }
        }

        // Open against open: the unknown fields themselves must agree.
        if let (Some(open1), Some(open2)) = (s1.open, s2.open) {
            props.push(self.simplify(&goal.child_covariant(open1, open2)));
        }

        Prop::conj(props)
    }
}

/// Sorted union of the field names appearing in either shape.
fn field_names(s1: &ShapeData, s2: &ShapeData) -> Vec<Atom> {
    let mut names: Vec<Atom> = s1
        .fields
        .iter()
        .chain(s2.fields.iter())
        .map(|f| f.name)
        .collect();
    names.sort_unstable();
    names.dedup();
    names
}

#[cfg(test)]
#[path = "../../tests/shape_tests.rs"]
mod tests;
