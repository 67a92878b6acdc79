use crate::RepoPath;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One normalized HTTP path as observed on one side (front-end calls or back-end routes).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EndpointRecord {
    pub path: String,
    pub methods: BTreeSet<String>,
    pub source_files: BTreeSet<RepoPath>,
    /// Back-end route dispatched with a prefix match (`path.startswith(...)`).
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub prefix: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MethodMismatch {
    pub path: String,
    pub frontend_methods: BTreeSet<String>,
    pub backend_methods: BTreeSet<String>,
    pub missing_methods: BTreeSet<String>,
    pub source_files: BTreeSet<RepoPath>,
}

/// Result of reconciling front-end call sites against back-end routes. Every list is sorted by path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EndpointDiff {
    /// Called by the front-end, served by no back-end route.
    pub missing_in_backend: Vec<EndpointRecord>,
    /// Served by the back-end, never called by the front-end.
    pub missing_in_frontend: Vec<EndpointRecord>,
    pub method_mismatches: Vec<MethodMismatch>,
}

impl EndpointDiff {
    pub fn is_clean(&self) -> bool {
        self.missing_in_backend.is_empty()
            && self.missing_in_frontend.is_empty()
            && self.method_mismatches.is_empty()
    }
}
