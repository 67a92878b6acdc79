use crate::RepoPath;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Kind assigned when a declaration omits `kind`/`type`.
pub const DEFAULT_KIND: &str = "component";
/// Version assigned when a declaration omits `version`.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Declared role of an exposed unit.
///
/// The three well-known roles are matched case-insensitively; any other label is kept verbatim
/// so the snapshot reproduces what the file declared.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(from = "String", into = "String")]
#[schemars(with = "String")]
pub enum ExposureKind {
    #[default]
    Component,
    Service,
    Script,
    Other(String),
}

impl ExposureKind {
    pub fn parse(label: &str) -> Self {
        let label = label.trim();
        if label.is_empty() || label.eq_ignore_ascii_case("component") {
            ExposureKind::Component
        } else if label.eq_ignore_ascii_case("service") {
            ExposureKind::Service
        } else if label.eq_ignore_ascii_case("script") {
            ExposureKind::Script
        } else {
            ExposureKind::Other(label.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ExposureKind::Component => "component",
            ExposureKind::Service => "service",
            ExposureKind::Script => "script",
            ExposureKind::Other(label) => label,
        }
    }
}

impl fmt::Display for ExposureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ExposureKind {
    fn from(value: String) -> Self {
        ExposureKind::parse(&value)
    }
}

impl From<ExposureKind> for String {
    fn from(value: ExposureKind) -> Self {
        value.as_str().to_string()
    }
}

/// `needs` block of a declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Needs {
    /// Identifiers of other records this one depends on.
    #[serde(rename = "deps", default)]
    pub dependencies: BTreeSet<String>,
    /// Free-text resource requirements; never validated.
    #[serde(default)]
    pub resources: BTreeSet<String>,
}

/// `provides` block of a declaration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Provides {
    #[serde(default)]
    pub capabilities: BTreeSet<String>,
}

/// One parsed self-exposure declaration.
///
/// Field order here is the snapshot field order: `id`, `name`, `kind`, `version`, `needs`,
/// `provides`, `source_file`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExposureRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kind: ExposureKind,
    pub version: String,
    #[serde(default)]
    pub needs: Needs,
    #[serde(default)]
    pub provides: Provides,
    /// Originating file, set by the extractor.
    #[serde(rename = "source_file")]
    pub source_path: RepoPath,
}

impl ExposureRecord {
    pub fn dependencies(&self) -> &BTreeSet<String> {
        &self.needs.dependencies
    }

    pub fn resources(&self) -> &BTreeSet<String> {
        &self.needs.resources
    }

    pub fn capabilities(&self) -> &BTreeSet<String> {
        &self.provides.capabilities
    }
}
