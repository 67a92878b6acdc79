use crate::checks::CheckInput;
use crate::fingerprint::fingerprint;
use crate::policy::EffectiveConfig;
use selfexpose_types::{Finding, Severity, ids};
use serde_json::json;

pub fn run(input: &CheckInput<'_>, cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    let Some(policy) = cfg.check_policy(ids::CHECK_GRAPH_UNDEFINED_DEPENDENCY) else {
        return;
    };

    for (dependent, missing) in input.graph.undefined_dependencies() {
        out.push(Finding {
            severity: policy.severity_or(Severity::Warning),
            check_id: ids::CHECK_GRAPH_UNDEFINED_DEPENDENCY.to_string(),
            code: ids::CODE_UNDEFINED_DEPENDENCY.to_string(),
            message: format!("'{dependent}' depends on undefined component '{missing}'"),
            location: input.location_of(&dependent),
            help: Some(
                "Fix the id in needs.deps or add a declaration for the missing component."
                    .to_string(),
            ),
            fingerprint: Some(fingerprint(
                ids::CHECK_GRAPH_UNDEFINED_DEPENDENCY,
                ids::CODE_UNDEFINED_DEPENDENCY,
                &[&dependent, &missing],
            )),
            data: json!({
                "dependent": dependent,
                "missing": missing,
            }),
        });
    }
}
