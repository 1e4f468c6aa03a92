//! readiness-core
//!
//! Core library for the protocol readiness view over signature-scheme
//! benchmarks.
//!
//! This crate defines the benchmark record model, latest-record selection,
//! dependency identifier resolution, the weakest-link effective-security
//! resolver, cap explanation, and the newline-delimited record store.
//!
//! The goal is to keep all substantive logic here so it is fully testable and
//! reusable from multiple frontends (CLI, report generators, etc.).

pub mod model;
pub mod analysis;
pub mod store;
pub mod services;

/// Returns the library version as encoded at compile time.
///
/// Useful for tests and for frontends to report consistent version info.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
