use crate::checks::CheckInput;
use crate::fingerprint::fingerprint;
use crate::policy::EffectiveConfig;
use selfexpose_types::{Finding, Location, RepoPath, Severity, ids};
use serde_json::json;
use std::collections::BTreeMap;

pub fn run(input: &CheckInput<'_>, cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    let Some(policy) = cfg.check_policy(ids::CHECK_RECORDS_DUPLICATE_ID) else {
        return;
    };

    let mut sources: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for record in &input.model.records {
        sources
            .entry(record.id.as_str())
            .or_default()
            .push(record.source_path.as_str());
    }

    for (id, paths) in sources {
        if paths.len() < 2 {
            continue;
        }
        out.push(Finding {
            severity: policy.severity_or(Severity::Error),
            check_id: ids::CHECK_RECORDS_DUPLICATE_ID.to_string(),
            code: ids::CODE_DUPLICATE_ID.to_string(),
            message: format!(
                "id '{id}' is declared by {} records: {}",
                paths.len(),
                paths.join(", ")
            ),
            location: paths.first().map(|p| Location {
                path: RepoPath::new(p),
                line: None,
                col: None,
            }),
            help: Some("Give every declaration a unique id.".to_string()),
            fingerprint: Some(fingerprint(
                ids::CHECK_RECORDS_DUPLICATE_ID,
                ids::CODE_DUPLICATE_ID,
                &[id],
            )),
            data: json!({
                "id": id,
                "source_files": paths,
            }),
        });
    }
}
