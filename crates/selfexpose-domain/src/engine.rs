use crate::checks::{self, CheckInput};
use crate::endpoints::{EndpointSet, reconcile};
use crate::graph::DependencyGraph;
use crate::model::ScanModel;
use crate::policy::EffectiveConfig;
use crate::report::{DomainReport, EndpointDomainReport, Evaluation};
use crate::stats::compute_stats;
use selfexpose_types::{EndpointData, Finding, ScanData, Severity};

/// Run every enabled record, graph and scan check over one scanned tree.
pub fn evaluate(model: &ScanModel, cfg: &EffectiveConfig) -> DomainReport {
    let graph = DependencyGraph::from_records(&model.records);
    let input = CheckInput {
        model,
        graph: &graph,
    };

    let mut findings: Vec<Finding> = Vec::new();
    checks::run_all(&input, cfg, &mut findings);

    // Stable: each check already emitted its findings in subject order.
    findings.sort_by(compare_findings);

    let data = ScanData {
        files_considered: model.files_considered,
        files_with_declarations: model.files_with_declarations(),
        files_missing_declaration: model.files_missing_declaration(),
        files_failed: model.files_failed(),
        findings_total: findings.len() as u32,
        stats: compute_stats(&model.records, &graph),
        records: model.records.clone(),
    };

    Evaluation::new(findings, data)
}

/// Reconcile both endpoint sets and turn the differences into findings.
pub fn evaluate_endpoints(
    frontend: &EndpointSet,
    backend: &EndpointSet,
    files: (u32, u32),
    cfg: &EffectiveConfig,
) -> EndpointDomainReport {
    let diff = reconcile(frontend, backend);

    let mut findings: Vec<Finding> = Vec::new();
    checks::run_endpoints(&diff, cfg, &mut findings);
    findings.sort_by(compare_findings);

    let data = EndpointData {
        frontend_files: files.0,
        backend_files: files.1,
        frontend_endpoints: frontend.len() as u32,
        backend_endpoints: backend.len() as u32,
        findings_total: findings.len() as u32,
        diff,
    };

    Evaluation::new(findings, data)
}

fn compare_findings(a: &Finding, b: &Finding) -> std::cmp::Ordering {
    // Ordering priority:
    // 1) severity (error -> warning -> info)
    // 2) check_id
    // Ties keep emission order.
    let severity_rank = |sev: Severity| match sev {
        Severity::Error => 0,
        Severity::Warning => 1,
        Severity::Info => 2,
    };

    severity_rank(a.severity)
        .cmp(&severity_rank(b.severity))
        .then(a.check_id.cmp(&b.check_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FileIssue, FileIssueKind};
    use crate::test_support::{all_checks_config, record, record_with_deps, scan_model};
    use selfexpose_types::{RepoPath, Verdict, ids};

    #[test]
    fn empty_model_passes_with_zero_components() {
        let report = evaluate(&ScanModel::default(), &all_checks_config());
        assert_eq!(report.verdict, Verdict::Pass);
        assert!(report.findings.is_empty());
        assert_eq!(report.data.stats.components, 0);
        assert!(report.data.records.is_empty());
    }

    #[test]
    fn single_undefined_dependency_yields_exactly_one_finding() {
        let model = scan_model(vec![record_with_deps("a", &["b"])]);
        let report = evaluate(&model, &all_checks_config());

        let undefined: Vec<_> = report
            .findings
            .iter()
            .filter(|f| f.code == ids::CODE_UNDEFINED_DEPENDENCY)
            .collect();
        assert_eq!(undefined.len(), 1);
        assert_eq!(undefined[0].data["dependent"], "a");
        assert_eq!(undefined[0].data["missing"], "b");
        assert_eq!(report.verdict, Verdict::Warn);
    }

    #[test]
    fn duplicate_id_fails_and_sorts_first() {
        let mut dup = record("a");
        dup.source_path = RepoPath::new("other/a.py");
        let model = scan_model(vec![record_with_deps("a", &["missing"]), dup]);
        let report = evaluate(&model, &all_checks_config());

        assert_eq!(report.verdict, Verdict::Fail);
        assert_eq!(report.findings[0].code, ids::CODE_DUPLICATE_ID);
        assert_eq!(report.counts.error, 1);
    }

    #[test]
    fn findings_are_ordered_by_severity_then_check_id() {
        let mut bad_version = record("v");
        bad_version.version = "v2".to_string();
        let mut model = scan_model(vec![
            record_with_deps("a", &["b"]),
            record_with_deps("b", &["a"]),
            bad_version,
        ]);
        model.issues.push(FileIssue {
            path: RepoPath::new("empty.py"),
            line: None,
            kind: FileIssueKind::MissingDeclaration,
            message: "no declaration marker".to_string(),
        });

        let report = evaluate(&model, &all_checks_config());
        let order: Vec<(&str, Severity)> = report
            .findings
            .iter()
            .map(|f| (f.check_id.as_str(), f.severity))
            .collect();
        assert_eq!(
            order,
            vec![
                (ids::CHECK_GRAPH_CYCLES, Severity::Warning),
                (ids::CHECK_RECORDS_VERSION_FORMAT, Severity::Warning),
                (ids::CHECK_SCAN_DECLARATIONS, Severity::Info),
            ]
        );
    }

    #[test]
    fn data_counts_files() {
        let mut model = scan_model(vec![record("a"), record("b")]);
        model.files_considered = 4;
        model.issues.push(FileIssue {
            path: RepoPath::new("c.py"),
            line: Some(1),
            kind: FileIssueKind::Unparseable,
            message: "invalid JSON".to_string(),
        });
        model.issues.push(FileIssue {
            path: RepoPath::new("d.py"),
            line: None,
            kind: FileIssueKind::MissingDeclaration,
            message: "no declaration marker".to_string(),
        });

        let report = evaluate(&model, &all_checks_config());
        assert_eq!(report.data.files_considered, 4);
        assert_eq!(report.data.files_with_declarations, 2);
        assert_eq!(report.data.files_failed, 1);
        assert_eq!(report.data.files_missing_declaration, 1);
        assert_eq!(report.data.findings_total, report.findings.len() as u32);
    }

    #[test]
    fn endpoint_findings_follow_diff() {
        let mut frontend = EndpointSet::new();
        frontend.insert("/api/x", "GET", &RepoPath::new("index.html"), false);
        let backend = EndpointSet::new();

        let report = evaluate_endpoints(&frontend, &backend, (1, 0), &all_checks_config());
        assert_eq!(report.verdict, Verdict::Warn);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.findings[0].code, ids::CODE_MISSING_IN_BACKEND);
        assert_eq!(report.data.frontend_endpoints, 1);
        assert_eq!(report.data.diff.missing_in_backend.len(), 1);
    }
}
