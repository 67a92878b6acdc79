//! Rendering utilities for human-facing reports (Markdown).
//!
//! Renderers take their own small model so they never depend on the report wire format.

#![forbid(unsafe_code)]

mod endpoints;
mod markdown;
mod model;

pub use endpoints::render_endpoint_markdown;
pub use markdown::render_markdown;
pub use model::{
    RenderableData, RenderableEndpoint, RenderableEndpointData, RenderableEndpointReport,
    RenderableFinding, RenderableLocation, RenderableMismatch, RenderableReport,
    RenderableSeverity, RenderableVerdictStatus,
};
