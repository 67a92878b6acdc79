use crate::checks::CheckInput;
use crate::fingerprint::fingerprint;
use crate::policy::EffectiveConfig;
use selfexpose_types::{Finding, Severity, ids};
use serde_json::json;

pub fn run(input: &CheckInput<'_>, cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    let Some(policy) = cfg.check_policy(ids::CHECK_GRAPH_CYCLES) else {
        return;
    };

    for cycle in input.graph.cycles() {
        let Some(first) = cycle.first() else { continue };
        let rendered = cycle
            .iter()
            .chain(std::iter::once(first))
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" -> ");
        let subject: Vec<&str> = cycle.iter().map(String::as_str).collect();

        out.push(Finding {
            severity: policy.severity_or(Severity::Warning),
            check_id: ids::CHECK_GRAPH_CYCLES.to_string(),
            code: ids::CODE_DEPENDENCY_CYCLE.to_string(),
            message: format!("dependency cycle: {rendered}"),
            location: input.location_of(first),
            help: Some(
                "Remove one dependency of the cycle or move the shared part into its own component."
                    .to_string(),
            ),
            fingerprint: Some(fingerprint(
                ids::CHECK_GRAPH_CYCLES,
                ids::CODE_DEPENDENCY_CYCLE,
                &subject,
            )),
            data: json!({ "cycle": cycle }),
        });
    }
}
