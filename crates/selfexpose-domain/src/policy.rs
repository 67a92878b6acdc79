use selfexpose_types::Severity;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckPolicy {
    pub enabled: bool,
    /// Forced severity for every code of the check; `None` keeps each code's default.
    pub severity: Option<Severity>,
}

impl CheckPolicy {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            severity: None,
        }
    }

    pub fn with_severity(severity: Severity) -> Self {
        Self {
            enabled: true,
            severity: Some(severity),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            severity: None,
        }
    }

    pub fn severity_or(&self, default: Severity) -> Severity {
        self.severity.unwrap_or(default)
    }
}

#[derive(Clone, Debug)]
pub struct EffectiveConfig {
    /// Longest tolerated dependency chain, in edges.
    pub max_depth: u32,
    pub checks: BTreeMap<String, CheckPolicy>,
}

impl EffectiveConfig {
    pub fn check_policy(&self, check_id: &str) -> Option<&CheckPolicy> {
        self.checks.get(check_id).filter(|p| p.enabled)
    }
}

/// Declarative file filter handed once to discovery and extraction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanFilter {
    /// Directory names skipped wherever they appear in the tree.
    pub skip_dirs: BTreeSet<String>,
    /// File-name prefixes that exclude a file.
    pub skip_name_prefixes: Vec<String>,
    /// Accepted extensions without the dot. Empty accepts every file.
    pub extensions: Vec<String>,
    /// Tokens that start a declaration.
    pub markers: Vec<String>,
    /// Number of leading lines searched for a marker.
    pub max_scan_lines: usize,
    /// Upper bound, in bytes, of one declaration's brace scan.
    pub max_declaration_len: usize,
}

pub const DEFAULT_MARKER: &str = "@self-expose";
pub const DEFAULT_MAX_SCAN_LINES: usize = 10;
pub const DEFAULT_MAX_DECLARATION_LEN: usize = 16 * 1024;
pub const DEFAULT_MAX_DEPTH: u32 = 10;

impl Default for ScanFilter {
    fn default() -> Self {
        Self {
            skip_dirs: BTreeSet::new(),
            skip_name_prefixes: Vec::new(),
            extensions: vec!["py".to_string(), "html".to_string()],
            markers: vec![DEFAULT_MARKER.to_string()],
            max_scan_lines: DEFAULT_MAX_SCAN_LINES,
            max_declaration_len: DEFAULT_MAX_DECLARATION_LEN,
        }
    }
}

impl ScanFilter {
    pub fn skips_dir(&self, name: &str) -> bool {
        self.skip_dirs.contains(name)
    }

    pub fn skips_file_name(&self, name: &str) -> bool {
        self.skip_name_prefixes
            .iter()
            .any(|prefix| name.starts_with(prefix.as_str()))
    }
}

/// Inputs of the endpoint reconciler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointRules {
    pub frontend_extensions: Vec<String>,
    pub backend_extensions: Vec<String>,
    /// Prepended to every normalized path that does not already start with it.
    pub api_prefix: Option<String>,
    /// Replacement text for `${name}` template expressions.
    pub template_vars: BTreeMap<String, String>,
}

impl Default for EndpointRules {
    fn default() -> Self {
        Self {
            frontend_extensions: vec!["html".to_string(), "htm".to_string(), "js".to_string()],
            backend_extensions: vec!["py".to_string()],
            api_prefix: None,
            template_vars: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_filter_matches_dir_and_file_names() {
        let filter = ScanFilter {
            skip_dirs: ["__pycache__".to_string()].into(),
            skip_name_prefixes: vec!["test_".to_string()],
            ..ScanFilter::default()
        };
        assert!(filter.skips_dir("__pycache__"));
        assert!(!filter.skips_dir("src"));
        assert!(filter.skips_file_name("test_agent.py"));
        assert!(!filter.skips_file_name("agent_test.py"));
    }

    #[test]
    fn default_filter_scans_python_and_html() {
        let filter = ScanFilter::default();
        assert_eq!(filter.extensions, vec!["py".to_string(), "html".to_string()]);
        assert_eq!(filter.markers, vec![DEFAULT_MARKER.to_string()]);
    }

    #[test]
    fn policy_severity_falls_back_to_code_default() {
        assert_eq!(CheckPolicy::enabled().severity_or(Severity::Info), Severity::Info);
        assert_eq!(
            CheckPolicy::with_severity(Severity::Error).severity_or(Severity::Info),
            Severity::Error
        );
    }
}
