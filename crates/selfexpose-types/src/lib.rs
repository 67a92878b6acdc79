//! Stable DTOs and IDs used across the selfexpose workspace.
//!
//! This crate is intentionally boring:
//! - the exposure record and endpoint record shapes
//! - data types for the emitted reports
//! - stable string IDs and codes
//! - canonical root-relative path handling
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod endpoint;
pub mod explain;
pub mod ids;
pub mod path;
pub mod receipt;
pub mod record;

pub use endpoint::{EndpointDiff, EndpointRecord, MethodMismatch};
pub use explain::{lookup_explanation, ExamplePair, Explanation};
pub use path::RepoPath;
pub use receipt::{
    EndpointData, EndpointReport, ExposureReport, Finding, Location, ReportEnvelope, ReportStats,
    ScanData, Severity, ToolMeta, Verdict, SCHEMA_ENDPOINTS_V1, SCHEMA_REPORT_V1,
};
pub use record::{ExposureKind, ExposureRecord, Needs, Provides, DEFAULT_KIND, DEFAULT_VERSION};
