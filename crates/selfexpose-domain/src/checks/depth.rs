use crate::checks::CheckInput;
use crate::fingerprint::fingerprint;
use crate::policy::EffectiveConfig;
use selfexpose_types::{Finding, Severity, ids};
use serde_json::json;

pub fn run(input: &CheckInput<'_>, cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    let Some(policy) = cfg.check_policy(ids::CHECK_GRAPH_DEPTH) else {
        return;
    };

    // Smallest id among the deepest nodes.
    let deepest = input
        .graph
        .depths()
        .into_iter()
        .fold(None::<(String, u32)>, |best, (id, depth)| match best {
            Some((_, d)) if d >= depth => best,
            _ => Some((id, depth)),
        });
    let Some((id, depth)) = deepest else { return };
    if depth <= cfg.max_depth {
        return;
    }

    out.push(Finding {
        severity: policy.severity_or(Severity::Info),
        check_id: ids::CHECK_GRAPH_DEPTH.to_string(),
        code: ids::CODE_EXCESSIVE_DEPTH.to_string(),
        message: format!(
            "dependency chain from '{id}' is {depth} levels deep (max_depth = {})",
            cfg.max_depth
        ),
        location: input.location_of(&id),
        help: Some("Flatten the chain or raise [graph] max_depth.".to_string()),
        fingerprint: Some(fingerprint(
            ids::CHECK_GRAPH_DEPTH,
            ids::CODE_EXCESSIVE_DEPTH,
            &[&id],
        )),
        data: json!({
            "id": id,
            "depth": depth,
            "max_depth": cfg.max_depth,
        }),
    });
}
