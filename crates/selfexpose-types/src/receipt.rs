use crate::{EndpointDiff, ExposureRecord, RepoPath};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Stable schema identifiers for selfexpose reports.
pub const SCHEMA_REPORT_V1: &str = "selfexpose.report.v1";
pub const SCHEMA_ENDPOINTS_V1: &str = "selfexpose.endpoints.v1";

/// Severity is intentionally small: it maps cleanly to CI signals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    pub path: RepoPath,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Finding {
    pub severity: Severity,
    pub check_id: String,
    pub code: String,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    /// Stable identifier intended for dedup and trending: a hash of
    /// `check_id + code + subject fields`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    /// Check-specific structured payload.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: JsonValue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Warn,
    Fail,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Pass => "pass",
            Verdict::Warn => "warn",
            Verdict::Fail => "fail",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Aggregate statistics over the exposure repository and its dependency graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportStats {
    pub components: u32,
    /// Record count per declared kind.
    pub kinds: BTreeMap<String, u32>,
    /// Record count per declared version string.
    pub versions: BTreeMap<String, u32>,
    pub total_dependencies: u32,
    pub avg_dependencies: f64,
    pub total_capabilities: u32,
    pub avg_capabilities: f64,
    pub distinct_capabilities: u32,
    pub max_depth: u32,
    pub has_cycle: bool,
    pub cycles: u32,
    pub undefined_dependencies: u32,
}

/// Payload of a `selfexpose.report.v1` report.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScanData {
    pub files_considered: u32,
    pub files_with_declarations: u32,
    pub files_missing_declaration: u32,
    pub files_failed: u32,
    pub findings_total: u32,
    pub stats: ReportStats,
    #[serde(default)]
    pub records: Vec<ExposureRecord>,
}

/// Payload of a `selfexpose.endpoints.v1` report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EndpointData {
    pub frontend_files: u32,
    pub backend_files: u32,
    pub frontend_endpoints: u32,
    pub backend_endpoints: u32,
    pub findings_total: u32,
    pub diff: EndpointDiff,
}

/// A generic receipt/envelope.
///
/// Both pipelines share the outer shape and embed their own `data` payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope<TData = ScanData> {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub verdict: Verdict,
    pub findings: Vec<Finding>,
    pub data: TData,
}

pub type ExposureReport = ReportEnvelope<ScanData>;
pub type EndpointReport = ReportEnvelope<EndpointData>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finding_omits_empty_optionals() {
        let finding = Finding {
            severity: Severity::Warning,
            check_id: "graph.cycles".to_string(),
            code: "dependency_cycle".to_string(),
            message: "cycle: a -> b -> a".to_string(),
            location: None,
            help: None,
            fingerprint: None,
            data: JsonValue::Null,
        };
        let value = serde_json::to_value(&finding).expect("serialize");
        assert_eq!(
            value,
            json!({
                "severity": "warning",
                "check_id": "graph.cycles",
                "code": "dependency_cycle",
                "message": "cycle: a -> b -> a"
            })
        );
    }

    #[test]
    fn envelope_round_trips_timestamps_as_rfc3339() {
        let report = ExposureReport {
            schema: SCHEMA_REPORT_V1.to_string(),
            tool: ToolMeta {
                name: "selfexpose".to_string(),
                version: "0.1.0".to_string(),
            },
            started_at: time::macros::datetime!(2025-01-01 00:00:00 UTC),
            finished_at: time::macros::datetime!(2025-01-01 00:00:01 UTC),
            verdict: Verdict::Pass,
            findings: Vec::new(),
            data: ScanData::default(),
        };
        let text = serde_json::to_string(&report).expect("serialize");
        assert!(text.contains("\"started_at\":\"2025-01-01T00:00:00Z\""));
        let parsed: ExposureReport = serde_json::from_str(&text).expect("parse");
        assert_eq!(parsed, report);
    }
}
