use crate::checks::CheckInput;
use crate::fingerprint::fingerprint;
use crate::model::{FileIssueKind, humanize};
use crate::policy::{DEFAULT_MARKER, EffectiveConfig};
use selfexpose_types::{Finding, Location, RepoPath, Severity, ids};
use serde_json::{Value, json};

pub fn run(input: &CheckInput<'_>, cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    let Some(policy) = cfg.check_policy(ids::CHECK_SCAN_DECLARATIONS) else {
        return;
    };

    let mut issues: Vec<_> = input.model.issues.iter().collect();
    issues.sort_by(|a, b| a.path.cmp(&b.path).then(a.line.cmp(&b.line)));

    for issue in issues {
        let (code, default_severity, help) = match issue.kind {
            FileIssueKind::MissingDeclaration => (
                ids::CODE_MISSING_DECLARATION,
                Severity::Info,
                "Add a declaration near the top of the file or exclude it from the scan.",
            ),
            FileIssueKind::Unparseable => (
                ids::CODE_UNPARSEABLE_DECLARATION,
                Severity::Warning,
                "Make the text after the marker a valid JSON object.",
            ),
            FileIssueKind::Unreadable => (
                ids::CODE_UNREADABLE_FILE,
                Severity::Warning,
                "Check permissions and make sure the file is UTF-8.",
            ),
        };
        let line = issue.line.map(|l| l.to_string()).unwrap_or_default();
        let mut data = json!({ "path": issue.path.as_str() });
        let help = match issue.kind {
            FileIssueKind::MissingDeclaration => {
                let template = scaffold(&issue.path);
                let help = format!("{help} For example: {template}");
                data["scaffold"] = Value::String(template);
                help
            }
            _ => help.to_string(),
        };

        out.push(Finding {
            severity: policy.severity_or(default_severity),
            check_id: ids::CHECK_SCAN_DECLARATIONS.to_string(),
            code: code.to_string(),
            message: format!("{}: {}", issue.path, issue.message),
            location: Some(Location {
                path: issue.path.clone(),
                line: issue.line,
                col: None,
            }),
            help: Some(help),
            fingerprint: Some(fingerprint(
                ids::CHECK_SCAN_DECLARATIONS,
                code,
                &[issue.path.as_str(), &line],
            )),
            data,
        });
    }
}

/// Complete declaration comment for `path`, with the id set to the file stem.
fn scaffold(path: &RepoPath) -> String {
    let id = path.file_stem();
    let object = format!(
        r#"{{"id": {}, "name": {}, "type": "component", "version": "1.0.0", "needs": {{"deps": [], "resources": []}}, "provides": {{"capabilities": []}}}}"#,
        Value::from(id),
        Value::from(humanize(id)),
    );
    match path.extension().map(str::to_ascii_lowercase).as_deref() {
        Some("html" | "htm" | "xml" | "md") => format!("<!-- {DEFAULT_MARKER}: {object} -->"),
        Some("js" | "ts" | "jsx" | "tsx" | "rs" | "go" | "java" | "c" | "cpp" | "css") => {
            format!("// {DEFAULT_MARKER}: {object}")
        }
        _ => format!("# {DEFAULT_MARKER}: {object}"),
    }
}
