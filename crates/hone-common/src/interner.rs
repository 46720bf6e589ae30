//! String interning for identifier deduplication.
//!
//! Class names, generic parameter names, and shape field names repeat
//! constantly during type checking. Interning them once turns every later
//! comparison into a `u32` compare and every hash into a `u32` hash.
//!
//! `Atom` is the interned handle; `Interner` is the shared, internally
//! synchronized store. An `Atom` is only meaningful together with the
//! `Interner` that produced it.

use dashmap::DashMap;
use serde::Serialize;
use std::sync::RwLock;

/// Interned string handle.
///
/// `Atom` comparison and hashing are `O(1)` and never touch the underlying
/// string data.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Atom(pub u32);

impl Atom {
    /// Sentinel for "no name". Never returned by `Interner::intern`.
    pub const EMPTY: Self = Self(0);
}

/// Thread-safe string interner.
///
/// Lookup by string goes through a `DashMap` shard; resolution by `Atom`
/// reads an append-only vector. Strings are never removed.
pub struct Interner {
    map: DashMap<String, Atom, rustc_hash::FxBuildHasher>,
    strings: RwLock<Vec<String>>,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    pub fn new() -> Self {
        let interner = Self {
            map: DashMap::default(),
            strings: RwLock::new(Vec::new()),
        };
        // Slot 0 is reserved for Atom::EMPTY.
        let id = interner.intern("");
        debug_assert_eq!(id, Atom::EMPTY);
        interner
    }

    /// Intern a string, returning its stable `Atom`.
    pub fn intern(&self, text: &str) -> Atom {
        if let Some(existing) = self.map.get(text) {
            return *existing;
        }
        // Allocation happens under the write lock so the atom is always
        // the index of its string; re-check the map to stay idempotent
        // against a concurrent intern of the same string.
        let mut strings = self.strings.write().expect("interner lock poisoned");
        if let Some(existing) = self.map.get(text) {
            return *existing;
        }
        let id = Atom(strings.len() as u32);
        strings.push(text.to_string());
        self.map.insert(text.to_string(), id);
        id
    }

    /// Resolve an `Atom` back to its string.
    ///
    /// Returns an owned copy; atoms are resolved rarely (diagnostics only),
    /// so the clone is not on any hot path.
    pub fn resolve(&self, atom: Atom) -> String {
        self.strings
            .read()
            .expect("interner lock poisoned")
            .get(atom.0 as usize)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of interned strings (including the empty sentinel).
    pub fn len(&self) -> usize {
        self.strings.read().expect("interner lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
