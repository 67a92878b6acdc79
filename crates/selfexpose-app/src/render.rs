//! Render use cases: Markdown from in-memory reports, plus the output writers.

use anyhow::Context;
use camino::Utf8Path;
use selfexpose_render::{RenderableEndpointReport, RenderableReport};

pub fn render_markdown(report: &RenderableReport) -> String {
    selfexpose_render::render_markdown(report)
}

pub fn render_endpoint_markdown(report: &RenderableEndpointReport) -> String {
    selfexpose_render::render_endpoint_markdown(report)
}

/// Write `text` to `path`, creating parent directories.
pub fn write_text(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    write_bytes(path, text.as_bytes())
}

pub(crate) fn write_bytes(path: &Utf8Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write {path}"))
}
