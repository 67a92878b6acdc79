use crate::checks::CheckInput;
use crate::fingerprint::fingerprint;
use crate::policy::EffectiveConfig;
use selfexpose_types::{Finding, Location, Severity, ids};
use serde_json::json;

pub fn run(input: &CheckInput<'_>, cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    let Some(policy) = cfg.check_policy(ids::CHECK_RECORDS_DECLARATION_FIELDS) else {
        return;
    };

    let mut gaps: Vec<_> = input.model.gaps.iter().collect();
    gaps.sort_by(|a, b| a.path.cmp(&b.path).then(a.line.cmp(&b.line)));

    for gap in gaps {
        let mut parts = Vec::new();
        if !gap.missing.is_empty() {
            parts.push(format!("missing {}", gap.missing.join(", ")));
        }
        if !gap.malformed.is_empty() {
            parts.push(format!("malformed {}", gap.malformed.join(", ")));
        }
        let line = gap.line.to_string();

        out.push(Finding {
            severity: policy.severity_or(Severity::Info),
            check_id: ids::CHECK_RECORDS_DECLARATION_FIELDS.to_string(),
            code: ids::CODE_INCOMPLETE_DECLARATION.to_string(),
            message: format!(
                "declaration '{}' relies on defaults: {}",
                gap.id,
                parts.join("; ")
            ),
            location: Some(Location {
                path: gap.path.clone(),
                line: Some(gap.line),
                col: None,
            }),
            help: Some("Declare the listed fields explicitly.".to_string()),
            fingerprint: Some(fingerprint(
                ids::CHECK_RECORDS_DECLARATION_FIELDS,
                ids::CODE_INCOMPLETE_DECLARATION,
                &[&gap.id, gap.path.as_str(), &line],
            )),
            data: json!({
                "id": gap.id,
                "missing": gap.missing,
                "malformed": gap.malformed,
            }),
        });
    }
}
