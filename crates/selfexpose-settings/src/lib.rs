//! Config parsing and preset resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{CheckConfig, EndpointsConfig, GraphConfig, ScanConfig, SelfExposeConfigV1};
pub use resolve::{Overrides, ResolvedConfig};

/// Schema identifier accepted in the optional `schema` key.
pub const SCHEMA_CONFIG_V1: &str = "selfexpose.config.v1";

/// Parse `selfexpose.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<SelfExposeConfigV1> {
    let cfg: SelfExposeConfigV1 = toml::from_str(input)?;
    if let Some(schema) = cfg.schema.as_deref()
        && schema != SCHEMA_CONFIG_V1
    {
        anyhow::bail!("unsupported config schema: {schema} (expected {SCHEMA_CONFIG_V1})");
    }
    Ok(cfg)
}

/// Resolve the effective configuration (preset, then file, then overrides).
pub fn resolve_config(
    cfg: SelfExposeConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
