use anyhow::Context;
use camino::Utf8Path;
use selfexpose_render::{
    RenderableData, RenderableEndpoint, RenderableEndpointData, RenderableEndpointReport,
    RenderableFinding, RenderableLocation, RenderableMismatch, RenderableReport,
    RenderableSeverity, RenderableVerdictStatus,
};
use selfexpose_types::{
    EndpointRecord, EndpointReport, ExposureReport, Finding, SCHEMA_REPORT_V1, Severity, Verdict,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Pretty JSON with a trailing newline.
pub fn serialize_report<T: Serialize>(report: &T) -> anyhow::Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(report).context("serialize report")?;
    bytes.push(b'\n');
    Ok(bytes)
}

pub fn write_report<T: Serialize>(path: &Utf8Path, report: &T) -> anyhow::Result<()> {
    let bytes = serialize_report(report)?;
    crate::render::write_bytes(path, &bytes)
}

/// Parse a `selfexpose.report.v1` report, e.g. for re-rendering Markdown.
pub fn parse_report_json(text: &str) -> anyhow::Result<ExposureReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unsupported report schema: {schema:?} (expected {SCHEMA_REPORT_V1})");
    }

    serde_json::from_value(value).context("parse selfexpose report")
}

pub fn to_renderable(report: &ExposureReport) -> RenderableReport {
    let data = &report.data;
    let stats = &data.stats;
    RenderableReport {
        verdict: renderable_verdict(report.verdict),
        findings: report.findings.iter().map(renderable_finding).collect(),
        data: RenderableData {
            files_considered: data.files_considered,
            files_with_declarations: data.files_with_declarations,
            files_missing_declaration: data.files_missing_declaration,
            files_failed: data.files_failed,
            findings_total: data.findings_total,
            components: stats.components,
            kinds: distribution(&stats.kinds),
            versions: distribution(&stats.versions),
            total_dependencies: stats.total_dependencies,
            avg_dependencies: stats.avg_dependencies,
            total_capabilities: stats.total_capabilities,
            avg_capabilities: stats.avg_capabilities,
            distinct_capabilities: stats.distinct_capabilities,
            max_depth: stats.max_depth,
            has_cycle: stats.has_cycle,
            cycles: stats.cycles,
            undefined_dependencies: stats.undefined_dependencies,
        },
    }
}

pub fn endpoint_to_renderable(report: &EndpointReport) -> RenderableEndpointReport {
    let data = &report.data;
    RenderableEndpointReport {
        verdict: renderable_verdict(report.verdict),
        data: RenderableEndpointData {
            frontend_files: data.frontend_files,
            backend_files: data.backend_files,
            frontend_endpoints: data.frontend_endpoints,
            backend_endpoints: data.backend_endpoints,
            missing_in_backend: data.diff.missing_in_backend.iter().map(renderable_endpoint).collect(),
            missing_in_frontend: data
                .diff
                .missing_in_frontend
                .iter()
                .map(renderable_endpoint)
                .collect(),
            method_mismatches: data
                .diff
                .method_mismatches
                .iter()
                .map(|m| RenderableMismatch {
                    path: m.path.clone(),
                    frontend_methods: m.frontend_methods.iter().cloned().collect(),
                    backend_methods: m.backend_methods.iter().cloned().collect(),
                    missing_methods: m.missing_methods.iter().cloned().collect(),
                    sources: m.source_files.iter().map(|p| p.to_string()).collect(),
                })
                .collect(),
        },
    }
}

fn renderable_verdict(verdict: Verdict) -> RenderableVerdictStatus {
    match verdict {
        Verdict::Pass => RenderableVerdictStatus::Pass,
        Verdict::Warn => RenderableVerdictStatus::Warn,
        Verdict::Fail => RenderableVerdictStatus::Fail,
    }
}

fn renderable_finding(f: &Finding) -> RenderableFinding {
    RenderableFinding {
        severity: match f.severity {
            Severity::Info => RenderableSeverity::Info,
            Severity::Warning => RenderableSeverity::Warning,
            Severity::Error => RenderableSeverity::Error,
        },
        check_id: f.check_id.clone(),
        code: f.code.clone(),
        message: f.message.clone(),
        location: f.location.as_ref().map(|loc| RenderableLocation {
            path: loc.path.as_str().to_string(),
            line: loc.line,
        }),
        help: f.help.clone(),
    }
}

fn renderable_endpoint(e: &EndpointRecord) -> RenderableEndpoint {
    RenderableEndpoint {
        path: e.path.clone(),
        methods: e.methods.iter().cloned().collect(),
        sources: e.source_files.iter().map(|p| p.to_string()).collect(),
        prefix: e.prefix,
    }
}

fn distribution(counts: &BTreeMap<String, u32>) -> Vec<(String, u32)> {
    counts.iter().map(|(k, v)| (k.clone(), *v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use selfexpose_types::{Location, RepoPath, ScanData, ToolMeta};
    use time::OffsetDateTime;

    fn sample_report() -> ExposureReport {
        let mut data = ScanData::default();
        data.stats.components = 2;
        data.stats.kinds.insert("component".to_string(), 2);
        data.findings_total = 1;
        ExposureReport {
            schema: SCHEMA_REPORT_V1.to_string(),
            tool: ToolMeta {
                name: "selfexpose".to_string(),
                version: "0.0.0".to_string(),
            },
            started_at: OffsetDateTime::UNIX_EPOCH,
            finished_at: OffsetDateTime::UNIX_EPOCH,
            verdict: Verdict::Warn,
            findings: vec![Finding {
                severity: Severity::Warning,
                check_id: "graph.cycles".to_string(),
                code: "dependency_cycle".to_string(),
                message: "dependency cycle: a -> b -> a".to_string(),
                location: Some(Location {
                    path: RepoPath::new("a.py"),
                    line: None,
                    col: None,
                }),
                help: None,
                fingerprint: None,
                data: serde_json::Value::Null,
            }],
            data,
        }
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = sample_report();
        let bytes = serialize_report(&report).expect("serialize");
        assert_eq!(bytes.last(), Some(&b'\n'));
        let text = String::from_utf8(bytes).expect("utf8");
        let parsed = parse_report_json(&text).expect("parse");
        assert_eq!(parsed, report);
    }

    #[test]
    fn rejects_foreign_schema() {
        let err = parse_report_json(r#"{"schema": "other.v1"}"#).expect_err("schema");
        assert!(err.to_string().contains("unsupported report schema"));
        assert!(parse_report_json("not json").is_err());
    }

    #[test]
    fn renderable_carries_stats_and_findings() {
        let renderable = to_renderable(&sample_report());
        assert_eq!(renderable.verdict, RenderableVerdictStatus::Warn);
        assert_eq!(renderable.data.components, 2);
        assert_eq!(renderable.data.kinds, vec![("component".to_string(), 2)]);
        assert_eq!(renderable.findings.len(), 1);
        assert_eq!(
            renderable.findings[0]
                .location
                .as_ref()
                .map(|l| l.path.as_str()),
            Some("a.py")
        );
    }
}
