//! Regex-based call-site and route scanners for the endpoint reconciler.
//!
//! Only literal paths are recognized. A path built at runtime from variables is invisible here
//! and surfaces later as a reconciliation difference.

use anyhow::Context;
use camino::Utf8Path;
use regex::{Captures, Regex};
use selfexpose_domain::endpoints::{EndpointSet, normalize_path};
use selfexpose_domain::policy::{EndpointRules, ScanFilter};
use selfexpose_types::RepoPath;
use std::collections::BTreeSet;

use crate::discover::discover_files;

/// Quoted literal in any of the three JS quote styles; occupies three capture groups.
const JS_LITERAL: &str = r#"(?:'([^'\n]*)'|"([^"\n]*)"|`([^`]*)`)"#;
/// Quoted literal in either Python quote style; occupies two capture groups.
const PY_LITERAL: &str = r#"(?:'([^'\n]*)'|"([^"\n]*)")"#;

/// How far past `fetch(` a `method:` option is looked for.
const FETCH_OPTIONS_WINDOW: usize = 300;

/// One call site or route before normalization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawEndpoint {
    pub method: String,
    pub path: String,
    pub prefix: bool,
}

pub struct EndpointScanner {
    fetch: Regex,
    fetch_method: Regex,
    axios: Regex,
    xhr_open: Regex,
    exact_route: Regex,
    prefix_route: Regex,
    decorator_route: Regex,
    decorator_methods: Regex,
    quoted_word: Regex,
    handler: Regex,
}

impl EndpointScanner {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            fetch: Regex::new(&format!(r"\bfetch\(\s*{JS_LITERAL}"))?,
            fetch_method: Regex::new(r#"\bmethod\s*:\s*['"`]([A-Za-z]+)['"`]"#)?,
            axios: Regex::new(&format!(
                r"\baxios\.(get|post|put|delete|patch)\(\s*{JS_LITERAL}"
            ))?,
            xhr_open: Regex::new(&format!(
                r#"\.open\(\s*['"]([A-Za-z]+)['"]\s*,\s*{JS_LITERAL}"#
            ))?,
            exact_route: Regex::new(&format!(
                r"\b(?:if|elif)\s+(?:self\.)?path\s*==\s*{PY_LITERAL}"
            ))?,
            prefix_route: Regex::new(&format!(r"\bpath\.startswith\(\s*{PY_LITERAL}"))?,
            decorator_route: Regex::new(&format!(
                r"@\w+(?:\.\w+)*\.(route|get|post|put|delete|patch)\(\s*{PY_LITERAL}([^)]*)\)"
            ))?,
            decorator_methods: Regex::new(r"methods\s*=\s*[\[(]([^\])]*)[\])]")?,
            quoted_word: Regex::new(r#"['"]([A-Za-z]+)['"]"#)?,
            handler: Regex::new(r"\bdef\s+do_([A-Z]+)\b")?,
        })
    }

    /// Call sites in front-end markup or script, in source order.
    pub fn scan_frontend(&self, text: &str) -> Vec<RawEndpoint> {
        let mut out: Vec<(usize, RawEndpoint)> = Vec::new();

        for caps in self.fetch.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            let Some(path) = literal(&caps, 1, 3) else {
                continue;
            };
            let method = self
                .fetch_options(text, whole.end())
                .unwrap_or_else(|| "GET".to_string());
            out.push((whole.start(), raw(method, path, false)));
        }

        for caps in self.axios.captures_iter(text) {
            let (Some(whole), Some(verb)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let Some(path) = literal(&caps, 2, 3) else {
                continue;
            };
            out.push((whole.start(), raw(verb.as_str().to_string(), path, false)));
        }

        for caps in self.xhr_open.captures_iter(text) {
            let (Some(whole), Some(verb)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let Some(path) = literal(&caps, 2, 3) else {
                continue;
            };
            out.push((whole.start(), raw(verb.as_str().to_string(), path, false)));
        }

        out.sort_by_key(|(pos, _)| *pos);
        out.into_iter().map(|(_, e)| e).collect()
    }

    /// `method:` option of the fetch call starting at `from`, cut at the next `fetch(`.
    fn fetch_options(&self, text: &str, from: usize) -> Option<String> {
        let rest = &text[from..];
        let mut end = rest.len().min(FETCH_OPTIONS_WINDOW);
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        let mut window = &rest[..end];
        if let Some(next) = window.find("fetch(") {
            window = &window[..next];
        }
        self.fetch_method
            .captures(window)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Routes dispatched by back-end handler source, in source order.
    ///
    /// `self.path` comparisons count only inside the body of a `do_<METHOD>` handler and take
    /// that method. Decorator routes carry their own method and may appear anywhere.
    pub fn scan_backend(&self, text: &str) -> Vec<RawEndpoint> {
        let handlers = self.handler_bodies(text);
        let method_at = |pos: usize| -> Option<String> {
            handlers
                .iter()
                .filter(|h| h.body.contains(&pos))
                .max_by_key(|h| h.body.start)
                .map(|h| h.method.clone())
        };

        let mut out: Vec<(usize, RawEndpoint)> = Vec::new();

        for (pattern, prefix) in [(&self.exact_route, false), (&self.prefix_route, true)] {
            for caps in pattern.captures_iter(text) {
                let Some(whole) = caps.get(0) else { continue };
                let Some(method) = method_at(whole.start()) else {
                    continue;
                };
                if let Some(path) = literal(&caps, 1, 2) {
                    out.push((whole.start(), raw(method, path, prefix)));
                }
            }
        }

        for caps in self.decorator_route.captures_iter(text) {
            let (Some(whole), Some(verb)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let Some(path) = literal(&caps, 2, 2) else {
                continue;
            };
            let methods = match verb.as_str() {
                "route" => {
                    let declared = caps
                        .get(4)
                        .and_then(|rest| self.decorator_methods.captures(rest.as_str()))
                        .and_then(|c| c.get(1))
                        .map(|list| {
                            self.quoted_word
                                .captures_iter(list.as_str())
                                .filter_map(|w| w.get(1).map(|m| m.as_str().to_string()))
                                .collect::<Vec<_>>()
                        })
                        .unwrap_or_default();
                    if declared.is_empty() {
                        vec!["GET".to_string()]
                    } else {
                        declared
                    }
                }
                other => vec![other.to_string()],
            };
            for method in methods {
                out.push((whole.start(), raw(method, path.clone(), false)));
            }
        }

        out.sort_by_key(|(pos, _)| *pos);
        out.into_iter().map(|(_, e)| e).collect()
    }

    /// Byte range of every `def do_<METHOD>` body: the lines after the `def` up to the first
    /// code line indented no deeper than the `def` itself.
    fn handler_bodies(&self, text: &str) -> Vec<HandlerBody> {
        let mut out = Vec::new();
        for caps in self.handler.captures_iter(text) {
            let (Some(whole), Some(method)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let line_start = text[..whole.start()].rfind('\n').map_or(0, |i| i + 1);
            let def_indent = indentation(&text[line_start..]);
            let Some(body_start) = text[whole.end()..].find('\n').map(|i| whole.end() + i + 1)
            else {
                continue;
            };

            let mut end = text.len();
            let mut offset = body_start;
            for line in text[body_start..].split_inclusive('\n') {
                let code = line.trim();
                if !code.is_empty() && !code.starts_with('#') && indentation(line) <= def_indent {
                    end = offset;
                    break;
                }
                offset += line.len();
            }
            out.push(HandlerBody {
                body: body_start..end,
                method: method.as_str().to_string(),
            });
        }
        out
    }
}

struct HandlerBody {
    body: std::ops::Range<usize>,
    method: String,
}

fn indentation(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

/// First present group among `count` groups starting at `first`.
fn literal(caps: &Captures<'_>, first: usize, count: usize) -> Option<String> {
    (first..first + count)
        .find_map(|i| caps.get(i))
        .map(|m| m.as_str().to_string())
}

fn raw(method: String, path: String, prefix: bool) -> RawEndpoint {
    RawEndpoint {
        method: method.to_ascii_uppercase(),
        path,
        prefix,
    }
}

/// Both sides of one endpoint scan, normalized.
#[derive(Clone, Debug, Default)]
pub struct EndpointScan {
    pub frontend: EndpointSet,
    pub backend: EndpointSet,
    pub frontend_files: u32,
    pub backend_files: u32,
}

/// Scan the front-end and back-end trees and normalize what they reference.
pub fn scan_endpoints(
    frontend_root: &Utf8Path,
    backend_root: &Utf8Path,
    rules: &EndpointRules,
    skip_dirs: &BTreeSet<String>,
) -> anyhow::Result<EndpointScan> {
    let scanner = EndpointScanner::new().context("compile endpoint patterns")?;

    let (frontend, frontend_files) = scan_side(
        frontend_root,
        &rules.frontend_extensions,
        skip_dirs,
        rules,
        |text| scanner.scan_frontend(text),
    )
    .context("scan front-end")?;
    let (backend, backend_files) = scan_side(
        backend_root,
        &rules.backend_extensions,
        skip_dirs,
        rules,
        |text| scanner.scan_backend(text),
    )
    .context("scan back-end")?;

    tracing::info!(
        frontend_files,
        backend_files,
        frontend_endpoints = frontend.len(),
        backend_endpoints = backend.len(),
        "endpoint scan complete"
    );

    Ok(EndpointScan {
        frontend,
        backend,
        frontend_files,
        backend_files,
    })
}

fn scan_side(
    root: &Utf8Path,
    extensions: &[String],
    skip_dirs: &BTreeSet<String>,
    rules: &EndpointRules,
    scan: impl Fn(&str) -> Vec<RawEndpoint>,
) -> anyhow::Result<(EndpointSet, u32)> {
    let filter = ScanFilter {
        skip_dirs: skip_dirs.clone(),
        extensions: extensions.to_vec(),
        ..ScanFilter::default()
    };
    let files = discover_files(root, &filter)?;
    let mut set = EndpointSet::new();

    for file in &files {
        let abs = root.join(file.as_str());
        let text = match std::fs::read_to_string(&abs) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(path = %file, error = %err, "skipping unreadable file");
                continue;
            }
        };
        let found = scan(&text);
        tracing::debug!(path = %file, endpoints = found.len(), "scanned");
        add_normalized(&mut set, found, file, rules);
    }

    Ok((set, files.len() as u32))
}

fn add_normalized(
    set: &mut EndpointSet,
    found: Vec<RawEndpoint>,
    file: &RepoPath,
    rules: &EndpointRules,
) {
    for endpoint in found {
        match normalize_path(&endpoint.path, rules) {
            Some(path) => set.insert(&path, &endpoint.method, file, endpoint.prefix),
            None => tracing::debug!(path = %file, raw = %endpoint.path, "discarded empty path"),
        }
    }
}
