//! Shared fixtures for the solver test suites.

use crate::goal::SubtypeGoal;
use crate::hierarchy::{AncestorEntry, ClassDecl, ClassKind, SimpleHierarchy};
use crate::intern::TypeInterner;
use crate::prop::Prop;
use crate::store::InferenceStore;
use crate::subtype::SubtypeSimplifier;
use crate::types::{InternalType, TypeParamInfo, Variance};
use hone_common::{Atom, Interner};
use std::sync::Arc;

/// Opt-in `tracing` output for a test run; honors `RUST_LOG`.
#[allow(dead_code)]
pub(crate) fn init_test_logging() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub(crate) struct Fixture {
    pub db: Arc<TypeInterner>,
    pub names: Interner,
    pub hierarchy: SimpleHierarchy,
}

impl Fixture {
    pub fn new() -> Self {
        let db = Arc::new(TypeInterner::new());
        let hierarchy = SimpleHierarchy::new(Arc::clone(&db));
        Self {
            db,
            names: Interner::new(),
            hierarchy,
        }
    }

    pub fn atom(&self, name: &str) -> Atom {
        self.names.intern(name)
    }

    pub fn simplify(
        &self,
        sub: impl Into<InternalType>,
        sup: impl Into<InternalType>,
    ) -> Prop {
        self.simplify_goal(&SubtypeGoal::new(sub, sup))
    }

    pub fn simplify_goal(&self, goal: &SubtypeGoal) -> Prop {
        let mut simplifier = SubtypeSimplifier::new(&self.db, &self.hierarchy);
        simplifier.simplify(goal)
    }

    pub fn simplify_with_store(&self, goal: &SubtypeGoal, store: &dyn InferenceStore) -> Prop {
        let mut simplifier = SubtypeSimplifier::new(&self.db, &self.hierarchy).with_store(store);
        simplifier.simplify(goal)
    }

    pub fn holds(&self, sub: impl Into<InternalType>, sup: impl Into<InternalType>) -> bool {
        self.simplify(sub, sup).is_valid()
    }

    pub fn fails(&self, sub: impl Into<InternalType>, sup: impl Into<InternalType>) -> bool {
        self.simplify(sub, sup).is_unsat()
    }

    /// Declare a monomorphic class with the given direct bases.
    pub fn add_simple_class(&mut self, name: &str, extends: &[&str]) -> Atom {
        let atom = self.atom(name);
        let mut decl = ClassDecl::new(ClassKind::Class);
        decl.extends = extends
            .iter()
            .map(|base| AncestorEntry {
                name: self.atom(base),
                args: Vec::new(),
            })
            .collect();
        self.hierarchy.add_class(atom, decl);
        atom
    }

    /// Declare a class with one type parameter `T` of the given variance.
    pub fn add_class_1p(&mut self, name: &str, variance: Variance) -> Atom {
        let atom = self.atom(name);
        let mut decl = ClassDecl::new(ClassKind::Class);
        decl.type_params = vec![TypeParamInfo {
            name: self.atom("T"),
            variance,
        }];
        self.hierarchy.add_class(atom, decl);
        atom
    }
}
