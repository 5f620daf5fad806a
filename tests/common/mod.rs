//! Common test utilities and fixtures for archlens integration tests
//!
//! This module provides:
//! - `TestRepo` builder for creating on-disk Java source trees
//! - Fixture corpora shared by several test files
//! - Custom assertions for corpus invariants and emitted diagrams

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
pub mod test_repo;

pub use assertions::*;
pub use fixtures::*;
pub use test_repo::TestRepo;
