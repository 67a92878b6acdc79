use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `selfexpose.toml` schema v1.
///
/// This is a *user-facing* config model: every key is optional and falls back to the preset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SelfExposeConfigV1 {
    /// Optional schema string for tooling (`selfexpose.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Preset to start from: `default` or `permissive`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub graph: GraphConfig,

    #[serde(default)]
    pub endpoints: EndpointsConfig,

    /// Map of check_id -> config.
    #[serde(default)]
    pub checks: BTreeMap<String, CheckConfig>,
}

/// `[scan]`: which files are read and how declarations are located.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScanConfig {
    /// Directory names skipped anywhere in the tree. Replaces the preset list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_dirs: Option<Vec<String>>,

    /// File-name prefixes that exclude a file. Replaces the preset list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_name_prefixes: Option<Vec<String>>,

    /// Extensions (without the dot) of candidate files. Empty means every file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,

    /// Tokens that start a declaration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markers: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_scan_lines: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_declaration_len: Option<usize>,
}

/// `[graph]`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GraphConfig {
    /// Longest tolerated dependency chain, in edges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,
}

/// `[endpoints]`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EndpointsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontend_extensions: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_extensions: Option<Vec<String>>,

    /// Prefix prepended to normalized paths that lack it, e.g. `/api`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_prefix: Option<String>,

    /// Replacement text for `${name}` template expressions in front-end paths.
    #[serde(default)]
    pub template_vars: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CheckConfig {
    /// Override preset enable/disable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Force one severity for every code of the check: `info`, `warning`, `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
}
