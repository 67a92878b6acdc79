//! Use case orchestration for selfexpose.
//!
//! This crate provides the application layer: use cases that coordinate the domain, repo, and
//! render layers. It is intentionally thin and delegates heavy lifting to the appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod endpoints;
mod explain;
mod render;
mod report;
mod scan;

pub use endpoints::{EndpointsInput, EndpointsOutput, run_endpoints};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use render::{render_endpoint_markdown, render_markdown, write_text};
pub use report::{
    endpoint_to_renderable, parse_report_json, serialize_report, to_renderable, write_report,
};
pub use scan::{ScanInput, ScanOutput, run_scan};

use selfexpose_settings::{Overrides, ResolvedConfig};
use selfexpose_types::ToolMeta;

/// Tool identity stamped into every report.
pub(crate) fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: "selfexpose".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

/// Parse config text (empty means defaults) and resolve it against the overrides.
pub(crate) fn resolve(config_text: &str, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    use anyhow::Context;

    let cfg = if config_text.trim().is_empty() {
        selfexpose_settings::SelfExposeConfigV1::default()
    } else {
        selfexpose_settings::parse_config_toml(config_text).context("parse config")?
    };
    selfexpose_settings::resolve_config(cfg, overrides).context("resolve config")
}
