//! Endpoint path normalization and front-end/back-end reconciliation.
//!
//! Normalization is a best-effort heuristic: paths assembled at runtime cannot be resolved and
//! show up as differences.

use crate::policy::EndpointRules;
use selfexpose_types::{EndpointDiff, EndpointRecord, MethodMismatch, RepoPath};
use std::collections::{BTreeMap, BTreeSet};

/// Normalize a raw path literal or template into a comparable route path.
///
/// Returns `None` when nothing path-like remains (for example a bare base-URL expression).
pub fn normalize_path(raw: &str, rules: &EndpointRules) -> Option<String> {
    let mut text = raw.trim().to_string();

    // A leading template expression is the base URL.
    if text.starts_with("${") {
        let end = text.find('}')?;
        text = text[end + 1..].to_string();
    }
    // Repeat until stable: `$${a}` only becomes `{a}` on the second pass.
    for _ in 0..=text.len() {
        let next = substitute_templates(&text, &rules.template_vars);
        if next == text {
            break;
        }
        text = next;
    }
    text = strip_scheme_and_host(&text).to_string();
    if let Some(cut) = text.find(['?', '#']) {
        text.truncate(cut);
    }

    let segments: Vec<&str> = text
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    let mut path = if segments.is_empty() {
        if !text.contains('/') {
            return None;
        }
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    };

    if let Some(prefix) = rules.api_prefix.as_deref() {
        let prefix = prefix.trim_matches('/');
        if !prefix.is_empty() {
            let prefix = format!("/{prefix}");
            if !is_segment_prefix(&prefix, &path) {
                path = if path == "/" {
                    prefix
                } else {
                    format!("{prefix}{path}")
                };
            }
        }
    }

    Some(path)
}

/// Replace `${name}` with the configured value, or `{name}` when unmapped.
fn substitute_templates(text: &str, vars: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let name = rest[start + 2..start + len].trim();
        match vars.get(name) {
            Some(value) => out.push_str(value),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &rest[start + len + 1..];
    }
    out.push_str(rest);
    out
}

fn strip_scheme_and_host(text: &str) -> &str {
    let Some(idx) = text.find("://") else {
        return text;
    };
    let scheme = &text[..idx];
    if scheme.is_empty()
        || !scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        return text;
    }
    let after = &text[idx + 3..];
    match after.find('/') {
        Some(slash) => &after[slash..],
        None => "",
    }
}

/// `/api/agents` is a segment prefix of `/api/agents` and `/api/agents/1`, not of `/api/agentsx`.
pub fn is_segment_prefix(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Endpoints observed on one side, keyed by normalized path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EndpointSet {
    endpoints: BTreeMap<String, EndpointRecord>,
}

impl EndpointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one call site or route. `path` must already be normalized.
    pub fn insert(&mut self, path: &str, method: &str, source: &RepoPath, prefix: bool) {
        let entry = self
            .endpoints
            .entry(path.to_string())
            .or_insert_with(|| EndpointRecord {
                path: path.to_string(),
                ..EndpointRecord::default()
            });
        entry.methods.insert(method.trim().to_ascii_uppercase());
        entry.source_files.insert(source.clone());
        entry.prefix |= prefix;
    }

    pub fn get(&self, path: &str) -> Option<&EndpointRecord> {
        self.endpoints.get(path)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EndpointRecord> {
        self.endpoints.values()
    }
}

/// Diff front-end call sites against back-end routes.
///
/// A call is served when a route has the same path, or a prefix route is a segment prefix of
/// the called path.
pub fn reconcile(frontend: &EndpointSet, backend: &EndpointSet) -> EndpointDiff {
    let mut diff = EndpointDiff::default();

    for call in frontend.iter() {
        let serving: Vec<&EndpointRecord> = backend
            .iter()
            .filter(|route| serves(route, &call.path))
            .collect();
        if serving.is_empty() {
            diff.missing_in_backend.push(call.clone());
            continue;
        }
        let served: BTreeSet<String> = serving
            .iter()
            .flat_map(|route| route.methods.iter().cloned())
            .collect();
        let missing: BTreeSet<String> = call.methods.difference(&served).cloned().collect();
        if !missing.is_empty() {
            diff.method_mismatches.push(MethodMismatch {
                path: call.path.clone(),
                frontend_methods: call.methods.clone(),
                backend_methods: served,
                missing_methods: missing,
                source_files: call.source_files.clone(),
            });
        }
    }

    for route in backend.iter() {
        let called = frontend.iter().any(|call| serves(route, &call.path));
        if !called {
            diff.missing_in_frontend.push(route.clone());
        }
    }

    diff
}

fn serves(route: &EndpointRecord, path: &str) -> bool {
    route.path == path || (route.prefix && is_segment_prefix(&route.path, path))
}
