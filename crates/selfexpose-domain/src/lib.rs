//! Pure analysis (no IO).
//!
//! Input: exposure records and per-file scan issues collected elsewhere, or endpoint sets.
//! Output: dependency graph queries, findings, verdict and summary data.

#![forbid(unsafe_code)]

pub mod endpoints;
pub mod fingerprint;
pub mod graph;
pub mod model;
pub mod policy;
pub mod report;
pub mod stats;

mod engine;
pub mod checks;

#[cfg(test)]
mod proptest;
#[cfg(test)]
pub(crate) mod test_support;

pub use engine::{evaluate, evaluate_endpoints};
pub use graph::DependencyGraph;
