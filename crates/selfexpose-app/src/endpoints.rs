//! The `endpoints` use case: reconcile front-end call sites against back-end routes.

use anyhow::Context;
use camino::Utf8Path;
use selfexpose_settings::{Overrides, ResolvedConfig};
use selfexpose_types::{EndpointReport, SCHEMA_ENDPOINTS_V1};
use time::OffsetDateTime;

#[derive(Clone, Debug)]
pub struct EndpointsInput<'a> {
    pub frontend_root: &'a Utf8Path,
    pub backend_root: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    pub overrides: Overrides,
}

#[derive(Clone, Debug)]
pub struct EndpointsOutput {
    pub report: EndpointReport,
    pub resolved_config: ResolvedConfig,
}

pub fn run_endpoints(input: EndpointsInput<'_>) -> anyhow::Result<EndpointsOutput> {
    let started_at = OffsetDateTime::now_utc();

    let resolved = crate::resolve(input.config_text, input.overrides.clone())?;

    let scan = selfexpose_repo::scan_endpoints(
        input.frontend_root,
        input.backend_root,
        &resolved.endpoints,
        &resolved.scan.skip_dirs,
    )
    .context("scan endpoints")?;

    let domain_report = selfexpose_domain::evaluate_endpoints(
        &scan.frontend,
        &scan.backend,
        (scan.frontend_files, scan.backend_files),
        &resolved.effective,
    );
    let finished_at = OffsetDateTime::now_utc();

    let report = EndpointReport {
        schema: SCHEMA_ENDPOINTS_V1.to_string(),
        tool: crate::tool_meta(),
        started_at,
        finished_at,
        verdict: domain_report.verdict,
        findings: domain_report.findings,
        data: domain_report.data,
    };

    Ok(EndpointsOutput {
        report,
        resolved_config: resolved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use selfexpose_types::{Verdict, ids};

    fn write(root: &Utf8Path, rel: &str, text: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create dirs");
        }
        std::fs::write(path, text).expect("write");
    }

    #[test]
    fn reports_differences_as_findings() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let root = camino::Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path");
        write(
            &root,
            "web/app.js",
            "fetch('/api/status');\nfetch('/api/chat', { method: 'POST' });\nfetch('/api/gone');\n",
        );
        write(
            &root,
            "srv/server.py",
            "def do_GET(self):\n    if self.path == '/api/status':\n        pass\n    elif self.path == '/api/chat':\n        pass\n    elif self.path == '/api/unused':\n        pass\n",
        );

        let output = run_endpoints(EndpointsInput {
            frontend_root: &root.join("web"),
            backend_root: &root.join("srv"),
            config_text: "",
            overrides: Overrides::default(),
        })
        .expect("run_endpoints");

        let report = output.report;
        assert_eq!(report.schema, SCHEMA_ENDPOINTS_V1);
        assert_ne!(report.verdict, Verdict::Pass);
        let diff = &report.data.diff;
        assert_eq!(diff.missing_in_backend.len(), 1);
        assert_eq!(diff.missing_in_backend[0].path, "/api/gone");
        assert_eq!(diff.missing_in_frontend.len(), 1);
        assert_eq!(diff.missing_in_frontend[0].path, "/api/unused");
        assert_eq!(diff.method_mismatches.len(), 1);
        assert_eq!(diff.method_mismatches[0].path, "/api/chat");

        let codes: Vec<&str> = report.findings.iter().map(|f| f.code.as_str()).collect();
        assert!(codes.contains(&ids::CODE_MISSING_IN_BACKEND));
        assert!(codes.contains(&ids::CODE_MISSING_IN_FRONTEND));
        assert!(codes.contains(&ids::CODE_METHOD_MISMATCH));
    }
}
