//! The `scan` use case: extract declarations, evaluate compatibility and produce a report.

use anyhow::Context;
use camino::Utf8Path;
use selfexpose_repo::ExposureRepository;
use selfexpose_settings::{Overrides, ResolvedConfig};
use selfexpose_types::{ExposureReport, SCHEMA_REPORT_V1};
use time::OffsetDateTime;

/// Input for the scan use case.
#[derive(Clone, Debug)]
pub struct ScanInput<'a> {
    /// Root of the tree to scan.
    pub root: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the scan use case.
#[derive(Clone, Debug)]
pub struct ScanOutput {
    pub report: ExposureReport,
    /// Every extracted record, in discovery order.
    pub repository: ExposureRepository,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the scan use case: resolve config, walk the tree, evaluate, produce the report.
///
/// Fails when the root is missing or unreadable, or when no record could be extracted and at
/// least one candidate file failed to read or parse.
pub fn run_scan(input: ScanInput<'_>) -> anyhow::Result<ScanOutput> {
    let started_at = OffsetDateTime::now_utc();

    let resolved = crate::resolve(input.config_text, input.overrides.clone())?;

    let model = selfexpose_repo::scan_tree(input.root, &resolved.scan)
        .with_context(|| format!("scan {}", input.root))?;

    let failed = model.files_failed();
    if model.records.is_empty() && failed > 0 {
        anyhow::bail!(
            "no declaration could be extracted: {failed} of {} candidate files failed",
            model.files_considered
        );
    }

    let domain_report = selfexpose_domain::evaluate(&model, &resolved.effective);
    let finished_at = OffsetDateTime::now_utc();

    tracing::info!(
        verdict = domain_report.verdict.as_str(),
        errors = domain_report.counts.error,
        warnings = domain_report.counts.warning,
        infos = domain_report.counts.info,
        "compatibility report ready"
    );

    let report = ExposureReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: crate::tool_meta(),
        started_at,
        finished_at,
        verdict: domain_report.verdict,
        findings: domain_report.findings,
        data: domain_report.data,
    };

    Ok(ScanOutput {
        report,
        repository: ExposureRepository::new(model.records),
        resolved_config: resolved,
    })
}
