use crate::fingerprint::fingerprint;
use crate::policy::EffectiveConfig;
use selfexpose_types::{EndpointDiff, EndpointRecord, Finding, Location, RepoPath, Severity, ids};
use serde_json::json;
use std::collections::BTreeSet;

pub fn run(diff: &EndpointDiff, cfg: &EffectiveConfig, out: &mut Vec<Finding>) {
    let Some(policy) = cfg.check_policy(ids::CHECK_ENDPOINTS_RECONCILE) else {
        return;
    };

    for endpoint in &diff.missing_in_backend {
        out.push(Finding {
            severity: policy.severity_or(Severity::Warning),
            check_id: ids::CHECK_ENDPOINTS_RECONCILE.to_string(),
            code: ids::CODE_MISSING_IN_BACKEND.to_string(),
            message: format!(
                "front-end calls {} {} but no back-end route serves it",
                join(&endpoint.methods),
                endpoint.path
            ),
            location: first_location(&endpoint.source_files),
            help: Some("Add a back-end route or fix the path in the call site.".to_string()),
            fingerprint: Some(fingerprint(
                ids::CHECK_ENDPOINTS_RECONCILE,
                ids::CODE_MISSING_IN_BACKEND,
                &[&endpoint.path],
            )),
            data: endpoint_data(endpoint),
        });
    }

    for endpoint in &diff.missing_in_frontend {
        out.push(Finding {
            severity: policy.severity_or(Severity::Info),
            check_id: ids::CHECK_ENDPOINTS_RECONCILE.to_string(),
            code: ids::CODE_MISSING_IN_FRONTEND.to_string(),
            message: format!(
                "back-end serves {} {} but no front-end call uses it",
                join(&endpoint.methods),
                endpoint.path
            ),
            location: first_location(&endpoint.source_files),
            help: Some("Remove the unused route or document its other callers.".to_string()),
            fingerprint: Some(fingerprint(
                ids::CHECK_ENDPOINTS_RECONCILE,
                ids::CODE_MISSING_IN_FRONTEND,
                &[&endpoint.path],
            )),
            data: endpoint_data(endpoint),
        });
    }

    for mismatch in &diff.method_mismatches {
        out.push(Finding {
            severity: policy.severity_or(Severity::Warning),
            check_id: ids::CHECK_ENDPOINTS_RECONCILE.to_string(),
            code: ids::CODE_METHOD_MISMATCH.to_string(),
            message: format!(
                "{} is called with {} but the back-end only handles {}",
                mismatch.path,
                join(&mismatch.missing_methods),
                join(&mismatch.backend_methods)
            ),
            location: first_location(&mismatch.source_files),
            help: Some("Handle the method on the back-end or change the call.".to_string()),
            fingerprint: Some(fingerprint(
                ids::CHECK_ENDPOINTS_RECONCILE,
                ids::CODE_METHOD_MISMATCH,
                &[&mismatch.path],
            )),
            data: json!({
                "path": mismatch.path,
                "frontend_methods": mismatch.frontend_methods,
                "backend_methods": mismatch.backend_methods,
                "missing_methods": mismatch.missing_methods,
            }),
        });
    }
}

fn join(methods: &BTreeSet<String>) -> String {
    methods.iter().cloned().collect::<Vec<_>>().join("/")
}

fn first_location(files: &BTreeSet<RepoPath>) -> Option<Location> {
    files.first().map(|path| Location {
        path: path.clone(),
        line: None,
        col: None,
    })
}

fn endpoint_data(endpoint: &EndpointRecord) -> serde_json::Value {
    json!({
        "path": endpoint.path,
        "methods": endpoint.methods,
        "source_files": endpoint.source_files,
    })
}
