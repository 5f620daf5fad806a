//! Lexical detectors
//!
//! Detectors work on normalized text (comments and literals removed) and
//! never fail: input they do not recognize produces empty results.
//!
//! - `java`: type kind, superclass, realized interfaces, field relationships
//! - `references`: broad efferent reference scan

pub mod java;
pub mod references;

pub use java::{JavaDetector, StructuralFacts, DEFAULT_CONTAINER_TYPES};

/// A `<...>` type-argument list, balanced up to three levels deep
pub(crate) const TYPE_ARGS_PATTERN: &str =
    r"<(?:[^<>;=(){}]|<(?:[^<>;=(){}]|<[^<>;=(){}]*>)*>)*>";
pub use references::scan_references;
