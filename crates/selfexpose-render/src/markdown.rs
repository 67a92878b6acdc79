use crate::{
    RenderableFinding, RenderableReport, RenderableSeverity, RenderableVerdictStatus,
};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();
    let data = &report.data;

    out.push_str("# Self-exposure compatibility report\n\n");
    out.push_str(&format!(
        "- Verdict: **{}**\n- Components: {}\n- Findings: {}\n\n",
        verdict_label(report.verdict),
        data.components,
        data.findings_total
    ));

    out.push_str("## Summary\n\n");
    out.push_str("| Metric | Value |\n|---|---|\n");
    let rows = [
        ("Files considered", data.files_considered.to_string()),
        ("Files with declarations", data.files_with_declarations.to_string()),
        ("Files missing a declaration", data.files_missing_declaration.to_string()),
        ("Files failed", data.files_failed.to_string()),
        ("Components", data.components.to_string()),
        (
            "Dependencies (total / avg)",
            format!("{} / {:.2}", data.total_dependencies, data.avg_dependencies),
        ),
        (
            "Capabilities (total / avg / distinct)",
            format!(
                "{} / {:.2} / {}",
                data.total_capabilities, data.avg_capabilities, data.distinct_capabilities
            ),
        ),
    ];
    for (metric, value) in rows {
        out.push_str(&format!("| {metric} | {value} |\n"));
    }
    out.push('\n');

    push_distribution(&mut out, "Kinds", "Kind", &data.kinds);
    push_distribution(&mut out, "Versions", "Version", &data.versions);

    out.push_str("## Dependency graph\n\n");
    out.push_str(&format!(
        "- Max depth: {}\n- Cycles: {}{}\n- Undefined dependencies: {}\n\n",
        data.max_depth,
        data.cycles,
        if data.has_cycle { " (graph is cyclic)" } else { "" },
        data.undefined_dependencies
    ));

    out.push_str("## Findings\n\n");
    if report.findings.is_empty() {
        out.push_str("No findings.\n");
        return out;
    }

    for (check_id, findings) in group_by_check(&report.findings) {
        out.push_str(&format!("### `{}` ({})\n\n", check_id, findings.len()));
        for f in findings {
            push_finding(&mut out, f);
        }
        out.push('\n');
    }

    // single trailing newline
    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}

fn verdict_label(verdict: RenderableVerdictStatus) -> &'static str {
    match verdict {
        RenderableVerdictStatus::Pass => "PASS",
        RenderableVerdictStatus::Warn => "WARN",
        RenderableVerdictStatus::Fail => "FAIL",
    }
}

pub(crate) fn severity_label(severity: RenderableSeverity) -> &'static str {
    match severity {
        RenderableSeverity::Info => "INFO",
        RenderableSeverity::Warning => "WARN",
        RenderableSeverity::Error => "ERROR",
    }
}

fn push_distribution(out: &mut String, title: &str, column: &str, entries: &[(String, u32)]) {
    out.push_str(&format!("## {title}\n\n"));
    if entries.is_empty() {
        out.push_str("_none_\n\n");
        return;
    }
    out.push_str(&format!("| {column} | Count |\n|---|---|\n"));
    for (label, count) in entries {
        out.push_str(&format!("| {label} | {count} |\n"));
    }
    out.push('\n');
}

/// Groups in order of first appearance, so the engine's severity ordering carries over.
fn group_by_check(findings: &[RenderableFinding]) -> Vec<(&str, Vec<&RenderableFinding>)> {
    let mut groups: Vec<(&str, Vec<&RenderableFinding>)> = Vec::new();
    for f in findings {
        match groups.iter_mut().find(|(id, _)| *id == f.check_id) {
            Some((_, list)) => list.push(f),
            None => groups.push((f.check_id.as_str(), vec![f])),
        }
    }
    groups
}

fn push_finding(out: &mut String, f: &RenderableFinding) {
    let sev = severity_label(f.severity);
    match &f.location {
        Some(loc) => match loc.line {
            Some(line) => out.push_str(&format!(
                "- [{}] `{}`: {} (`{}`:{})\n",
                sev, f.code, f.message, loc.path, line
            )),
            None => out.push_str(&format!(
                "- [{}] `{}`: {} (`{}`)\n",
                sev, f.code, f.message, loc.path
            )),
        },
        None => out.push_str(&format!("- [{}] `{}`: {}\n", sev, f.code, f.message)),
    }
    if let Some(help) = &f.help {
        out.push_str(&format!("  - help: {}\n", help));
    }
}
