use crate::model::ScanModel;
use crate::policy::{CheckPolicy, DEFAULT_MAX_DEPTH, EffectiveConfig};
use selfexpose_types::{ExposureKind, ExposureRecord, Needs, Provides, RepoPath, Severity};
use std::collections::BTreeMap;

/// Minimal record `id` declared in `<id>.py`.
pub fn record(id: &str) -> ExposureRecord {
    ExposureRecord {
        id: id.to_string(),
        name: id.to_string(),
        kind: ExposureKind::Component,
        version: "1.0.0".to_string(),
        needs: Needs::default(),
        provides: Provides::default(),
        source_path: RepoPath::new(format!("{id}.py")),
    }
}

pub fn record_with_deps(id: &str, deps: &[&str]) -> ExposureRecord {
    let mut r = record(id);
    r.needs.dependencies = deps.iter().map(|d| d.to_string()).collect();
    r
}

pub fn record_with_capabilities(id: &str, capabilities: &[&str]) -> ExposureRecord {
    let mut r = record(id);
    r.provides.capabilities = capabilities.iter().map(|c| c.to_string()).collect();
    r
}

pub fn scan_model(records: Vec<ExposureRecord>) -> ScanModel {
    ScanModel {
        files_considered: records.len() as u32,
        records,
        ..ScanModel::default()
    }
}

pub fn all_checks_config() -> EffectiveConfig {
    let checks = selfexpose_types::explain::all_check_ids()
        .iter()
        .map(|id| (id.to_string(), CheckPolicy::enabled()))
        .collect();
    EffectiveConfig {
        max_depth: DEFAULT_MAX_DEPTH,
        checks,
    }
}

pub fn config_with_check(check_id: &str, severity: Option<Severity>) -> EffectiveConfig {
    let mut checks = BTreeMap::new();
    checks.insert(
        check_id.to_string(),
        CheckPolicy {
            enabled: true,
            severity,
        },
    );
    EffectiveConfig {
        max_depth: DEFAULT_MAX_DEPTH,
        checks,
    }
}
