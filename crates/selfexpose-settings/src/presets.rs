use crate::resolve::ResolvedConfig;
use selfexpose_domain::policy::{
    CheckPolicy, DEFAULT_MAX_DEPTH, EffectiveConfig, EndpointRules, ScanFilter,
};
use std::collections::BTreeMap;

/// Directory names that never hold first-party declarations.
const DEFAULT_SKIP_DIRS: &[&str] = &[
    "myenv",
    "myenv_stable",
    ".venv",
    "venv",
    "__pycache__",
    "node_modules",
    ".git",
    ".idea",
    "dist",
    "build",
    "tests",
    "test",
    "backup",
    "old_tests",
];

/// Prefixes of one-off maintenance and diagnostic scripts.
const DEFAULT_SKIP_NAME_PREFIXES: &[&str] = &[
    "test_", "check_", "fix_", "analyze_", "generate_", "get_", "update_", "accurate_", "api_",
    "event_", "quantum_", "resource_", "self_", "solo_", "post_", "clear_", "rebuild_", "clean_",
];

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything project-specific goes into `selfexpose.toml`.
pub fn preset(profile: &str) -> ResolvedConfig {
    match profile {
        "permissive" => permissive_profile(),
        // default
        _ => default_profile(),
    }
}

fn default_profile() -> ResolvedConfig {
    ResolvedConfig {
        profile: "default".to_string(),
        scan: ScanFilter {
            skip_dirs: DEFAULT_SKIP_DIRS.iter().map(|s| s.to_string()).collect(),
            skip_name_prefixes: DEFAULT_SKIP_NAME_PREFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ..ScanFilter::default()
        },
        effective: EffectiveConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            checks: default_checks(),
        },
        endpoints: EndpointRules::default(),
    }
}

/// Scans every file with a known extension and keeps only VCS and dependency directories out.
fn permissive_profile() -> ResolvedConfig {
    ResolvedConfig {
        profile: "permissive".to_string(),
        scan: ScanFilter {
            skip_dirs: [".git", "node_modules", "__pycache__"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ..ScanFilter::default()
        },
        effective: EffectiveConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            checks: default_checks(),
        },
        endpoints: EndpointRules::default(),
    }
}

fn default_checks() -> BTreeMap<String, CheckPolicy> {
    selfexpose_types::explain::all_check_ids()
        .iter()
        .map(|id| (id.to_string(), CheckPolicy::enabled()))
        .collect()
}
