//! Integration Tests
//!
//! Cross-crate tests driven through the root `schemastore` API:
//! - Scenarios: the documented end-to-end examples
//! - Read semantics: silent misses, forced reads, readOnce, ttl
//! - Lifecycle: attach/initialize/exit and the readiness gate
//! - Properties: namespace determinism, random keys, wire format

#[path = "../common/mod.rs"]
mod common;

mod lifecycle;
mod properties;
mod scenarios;
