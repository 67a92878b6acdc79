use crate::checks::CheckInput;
use crate::fingerprint::fingerprint;
use crate::policy::EffectiveConfig;
use selfexpose_types::{Finding, Location, Severity, ids};
use serde_json::json;

pub fn run(input: &CheckInput<'_>, cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    let Some(policy) = cfg.check_policy(ids::CHECK_RECORDS_VERSION_FORMAT) else {
        return;
    };

    for record in &input.model.records {
        if is_plain_semver(&record.version) {
            continue;
        }
        out.push(Finding {
            severity: policy.severity_or(Severity::Warning),
            check_id: ids::CHECK_RECORDS_VERSION_FORMAT.to_string(),
            code: ids::CODE_INVALID_VERSION.to_string(),
            message: format!(
                "'{}' declares version '{}' (expected MAJOR.MINOR.PATCH)",
                record.id, record.version
            ),
            location: Some(Location {
                path: record.source_path.clone(),
                line: None,
                col: None,
            }),
            help: Some("Use three dot-separated integers, e.g. 1.0.0.".to_string()),
            fingerprint: Some(fingerprint(
                ids::CHECK_RECORDS_VERSION_FORMAT,
                ids::CODE_INVALID_VERSION,
                &[&record.id, record.source_path.as_str(), &record.version],
            )),
            data: json!({
                "id": record.id,
                "version": record.version,
            }),
        });
    }
}

/// `MAJOR.MINOR.PATCH`, each part one or more ASCII digits.
pub(crate) fn is_plain_semver(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
}
