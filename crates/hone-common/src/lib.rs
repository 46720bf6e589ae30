//! Common types and utilities for the Hone type checker.
//!
//! This crate provides foundational types used across the checker crates:
//! - String interning (`Atom`, `Interner`)
//! - Source spans (`Span`, `Spanned`)

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::{Span, Spanned};
