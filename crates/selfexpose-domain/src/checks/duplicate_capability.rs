use crate::checks::CheckInput;
use crate::fingerprint::fingerprint;
use crate::policy::EffectiveConfig;
use selfexpose_types::{Finding, Severity, ids};
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};

pub fn run(input: &CheckInput<'_>, cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    let Some(policy) = cfg.check_policy(ids::CHECK_RECORDS_DUPLICATE_CAPABILITY) else {
        return;
    };

    // capability -> distinct ids providing it
    let mut providers: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for record in &input.model.records {
        for capability in record.capabilities() {
            providers
                .entry(capability.as_str())
                .or_default()
                .insert(record.id.as_str());
        }
    }

    for (capability, ids_providing) in providers {
        if ids_providing.len() < 2 {
            continue;
        }
        let id_list: Vec<&str> = ids_providing.into_iter().collect();
        out.push(Finding {
            severity: policy.severity_or(Severity::Info),
            check_id: ids::CHECK_RECORDS_DUPLICATE_CAPABILITY.to_string(),
            code: ids::CODE_DUPLICATE_CAPABILITY.to_string(),
            message: format!(
                "capability '{capability}' is provided by {} components: {}",
                id_list.len(),
                id_list.join(", ")
            ),
            location: None,
            help: Some(
                "Consolidate the providers or give each capability a more specific name."
                    .to_string(),
            ),
            fingerprint: Some(fingerprint(
                ids::CHECK_RECORDS_DUPLICATE_CAPABILITY,
                ids::CODE_DUPLICATE_CAPABILITY,
                &[capability],
            )),
            data: json!({
                "capability": capability,
                "ids": id_list,
            }),
        });
    }
}
