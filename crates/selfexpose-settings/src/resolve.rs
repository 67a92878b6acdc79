use crate::{model::SelfExposeConfigV1, presets};
use anyhow::Context;
use globset::Glob;
use selfexpose_domain::policy::{CheckPolicy, EffectiveConfig, EndpointRules, ScanFilter};
use selfexpose_types::{Severity, explain};

/// Command-line values that win over the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub max_scan_lines: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub profile: String,
    pub scan: ScanFilter,
    pub effective: EffectiveConfig,
    pub endpoints: EndpointRules,
}

pub fn resolve_config(
    cfg: SelfExposeConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "default".to_string());
    if !matches!(profile.as_str(), "default" | "permissive") {
        anyhow::bail!("unknown profile: {profile} (expected default|permissive)");
    }

    let mut resolved = presets::preset(&profile);

    // [scan]
    let scan = cfg.scan;
    if let Some(dirs) = scan.skip_dirs {
        resolved.scan.skip_dirs = dirs.into_iter().collect();
    }
    if let Some(prefixes) = scan.skip_name_prefixes {
        resolved.scan.skip_name_prefixes = prefixes;
    }
    if let Some(extensions) = scan.extensions {
        validate_extensions("scan.extensions", &extensions)?;
        resolved.scan.extensions = normalize_extensions(extensions);
    }
    if let Some(markers) = scan.markers {
        if markers.is_empty() || markers.iter().any(|m| m.trim().is_empty()) {
            anyhow::bail!("scan.markers must list at least one non-empty marker");
        }
        resolved.scan.markers = markers;
    }
    if let Some(lines) = overrides.max_scan_lines.or(scan.max_scan_lines) {
        if lines == 0 {
            anyhow::bail!("max_scan_lines must be at least 1");
        }
        resolved.scan.max_scan_lines = lines;
    }
    if let Some(len) = scan.max_declaration_len {
        if len == 0 {
            anyhow::bail!("scan.max_declaration_len must be at least 1");
        }
        resolved.scan.max_declaration_len = len;
    }

    // [graph]
    if let Some(depth) = cfg.graph.max_depth {
        resolved.effective.max_depth = depth;
    }

    // [endpoints]
    let endpoints = cfg.endpoints;
    if let Some(extensions) = endpoints.frontend_extensions {
        validate_extensions("endpoints.frontend_extensions", &extensions)?;
        resolved.endpoints.frontend_extensions = normalize_extensions(extensions);
    }
    if let Some(extensions) = endpoints.backend_extensions {
        validate_extensions("endpoints.backend_extensions", &extensions)?;
        resolved.endpoints.backend_extensions = normalize_extensions(extensions);
    }
    if let Some(prefix) = endpoints.api_prefix {
        let trimmed = prefix.trim().trim_matches('/');
        resolved.endpoints.api_prefix = (!trimmed.is_empty()).then(|| format!("/{trimmed}"));
    }
    resolved.endpoints.template_vars.extend(endpoints.template_vars);

    // per-check overrides
    for (check_id, cc) in cfg.checks.iter() {
        if !explain::all_check_ids().iter().any(|id| *id == check_id.as_str()) {
            anyhow::bail!("unknown check id in [checks]: {check_id}");
        }
        let entry = resolved
            .effective
            .checks
            .entry(check_id.clone())
            .or_insert_with(CheckPolicy::disabled);

        if let Some(enabled) = cc.enabled {
            entry.enabled = enabled;
        }
        if let Some(sev) = cc.severity.as_deref() {
            entry.severity = Some(
                parse_severity(sev).with_context(|| format!("invalid severity for {check_id}"))?,
            );
        }
    }

    Ok(resolved)
}

fn normalize_extensions(extensions: Vec<String>) -> Vec<String> {
    extensions
        .into_iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .collect()
}

fn validate_extensions(key: &str, extensions: &[String]) -> anyhow::Result<()> {
    for ext in extensions {
        let bare = ext.trim().trim_start_matches('.');
        if bare.is_empty() || bare.contains(['/', '\\']) {
            anyhow::bail!("invalid extension in {key}: {ext:?}");
        }
        Glob::new(&format!("*.{bare}"))
            .with_context(|| format!("invalid extension in {key}: {ext}"))?;
    }
    Ok(())
}

fn parse_severity(v: &str) -> anyhow::Result<Severity> {
    match v {
        "info" => Ok(Severity::Info),
        "warning" | "warn" => Ok(Severity::Warning),
        "error" => Ok(Severity::Error),
        other => anyhow::bail!("unknown severity: {other} (expected info|warning|error)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_config_toml;
    use selfexpose_types::ids;

    fn resolve(toml: &str) -> anyhow::Result<ResolvedConfig> {
        resolve_config(parse_config_toml(toml)?, Overrides::default())
    }

    #[test]
    fn empty_config_uses_default_preset() {
        let resolved = resolve("").expect("resolve");
        assert_eq!(resolved.profile, "default");
        assert!(resolved.scan.skips_dir("__pycache__"));
        assert!(resolved.scan.skips_dir("backup"));
        assert!(resolved.scan.skips_file_name("fix_imports.py"));
        assert_eq!(resolved.scan.extensions, vec!["py", "html"]);
        assert_eq!(resolved.scan.markers, vec!["@self-expose"]);
        assert_eq!(resolved.scan.max_scan_lines, 10);
        assert_eq!(resolved.effective.max_depth, 10);
        for id in explain::all_check_ids() {
            assert!(resolved.effective.check_policy(id).is_some(), "{id}");
        }
    }

    #[test]
    fn file_values_replace_preset_values() {
        let resolved = resolve(
            r#"
schema = "selfexpose.config.v1"
[scan]
skip_dirs = ["vendor"]
skip_name_prefixes = []
extensions = [".PY", "js"]
markers = ["@expose"]
max_declaration_len = 512
[graph]
max_depth = 3
[endpoints]
api_prefix = "api/"
template_vars = { apiBase = "" }
[checks."records.id_mismatch"]
enabled = false
[checks."graph.depth"]
severity = "warn"
"#,
        )
        .expect("resolve");

        assert!(resolved.scan.skips_dir("vendor"));
        assert!(!resolved.scan.skips_dir("backup"));
        assert!(!resolved.scan.skips_file_name("test_x.py"));
        assert_eq!(resolved.scan.extensions, vec!["py", "js"]);
        assert_eq!(resolved.scan.markers, vec!["@expose"]);
        assert_eq!(resolved.scan.max_declaration_len, 512);
        assert_eq!(resolved.effective.max_depth, 3);
        assert_eq!(resolved.endpoints.api_prefix.as_deref(), Some("/api"));
        assert_eq!(
            resolved.endpoints.template_vars.get("apiBase").map(String::as_str),
            Some("")
        );
        assert!(
            resolved
                .effective
                .check_policy(ids::CHECK_RECORDS_ID_MISMATCH)
                .is_none()
        );
        assert_eq!(
            resolved
                .effective
                .check_policy(ids::CHECK_GRAPH_DEPTH)
                .and_then(|p| p.severity),
            Some(Severity::Warning)
        );
    }

    #[test]
    fn overrides_win_over_file() {
        let cfg = parse_config_toml("[scan]\nmax_scan_lines = 5\n").expect("parse");
        let resolved = resolve_config(
            cfg,
            Overrides {
                profile: Some("permissive".to_string()),
                max_scan_lines: Some(20),
            },
        )
        .expect("resolve");
        assert_eq!(resolved.profile, "permissive");
        assert_eq!(resolved.scan.max_scan_lines, 20);
        assert!(!resolved.scan.skips_dir("backup"));
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(resolve("[checks.\"graph.cycles\"]\nseverity = \"fatal\"\n").is_err());
        assert!(resolve("[checks.\"no.such_check\"]\nenabled = true\n").is_err());
        assert!(resolve("[scan]\nmax_scan_lines = 0\n").is_err());
        assert!(resolve("[scan]\nextensions = [\"\"]\n").is_err());
        assert!(resolve("[scan]\nextensions = [\"a/b\"]\n").is_err());
        assert!(resolve("[scan]\nmarkers = []\n").is_err());
        assert!(resolve("profile = \"strictest\"\n").is_err());
        assert!(resolve("schema = \"other.v9\"\n").is_err());
    }

    #[test]
    fn empty_extension_list_means_all_files() {
        let resolved = resolve("[scan]\nextensions = []\n").expect("resolve");
        assert!(resolved.scan.extensions.is_empty());
    }
}
