use crate::checks::CheckInput;
use crate::fingerprint::fingerprint;
use crate::policy::EffectiveConfig;
use selfexpose_types::{Finding, Location, Severity, ids};
use serde_json::json;

pub fn run(input: &CheckInput<'_>, cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    let Some(policy) = cfg.check_policy(ids::CHECK_RECORDS_ID_MISMATCH) else {
        return;
    };

    for record in &input.model.records {
        let stem = record.source_path.file_stem();
        if record.id == stem {
            continue;
        }
        out.push(Finding {
            severity: policy.severity_or(Severity::Info),
            check_id: ids::CHECK_RECORDS_ID_MISMATCH.to_string(),
            code: ids::CODE_ID_FILENAME_MISMATCH.to_string(),
            message: format!("declared id '{}' differs from file name '{stem}'", record.id),
            location: Some(Location {
                path: record.source_path.clone(),
                line: None,
                col: None,
            }),
            help: Some("Rename the id or the file so they match.".to_string()),
            fingerprint: Some(fingerprint(
                ids::CHECK_RECORDS_ID_MISMATCH,
                ids::CODE_ID_FILENAME_MISMATCH,
                &[&record.id, record.source_path.as_str()],
            )),
            data: json!({
                "id": record.id,
                "file_stem": stem,
            }),
        });
    }
}
