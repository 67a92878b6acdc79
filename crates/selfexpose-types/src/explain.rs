//! Explain registry for checks and codes.
//!
//! Maps check IDs and codes to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a check or code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the check/code.
    pub title: &'static str,
    /// What the check does and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after declaration examples.
    pub examples: ExamplePair,
}

/// Before and after examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Declaration that would trigger a finding.
    pub before: &'static str,
    /// Declaration that passes the check.
    pub after: &'static str,
}

/// Look up an explanation by check_id or code.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    match identifier {
        // Check IDs
        ids::CHECK_GRAPH_CYCLES => Some(explain_cycles()),
        ids::CHECK_GRAPH_UNDEFINED_DEPENDENCY => Some(explain_undefined_dependency()),
        ids::CHECK_GRAPH_DEPTH => Some(explain_depth()),
        ids::CHECK_RECORDS_VERSION_FORMAT => Some(explain_version_format()),
        ids::CHECK_RECORDS_DUPLICATE_CAPABILITY => Some(explain_duplicate_capability()),
        ids::CHECK_RECORDS_DUPLICATE_ID => Some(explain_duplicate_id()),
        ids::CHECK_RECORDS_ID_MISMATCH => Some(explain_id_mismatch()),
        ids::CHECK_RECORDS_DECLARATION_FIELDS => Some(explain_declaration_fields()),
        ids::CHECK_SCAN_DECLARATIONS => Some(explain_scan_declarations()),
        ids::CHECK_ENDPOINTS_RECONCILE => Some(explain_endpoints_reconcile()),

        // Codes
        ids::CODE_DEPENDENCY_CYCLE => Some(explain_cycles()),
        ids::CODE_UNDEFINED_DEPENDENCY => Some(explain_undefined_dependency()),
        ids::CODE_EXCESSIVE_DEPTH => Some(explain_depth()),
        ids::CODE_INVALID_VERSION => Some(explain_version_format()),
        ids::CODE_DUPLICATE_CAPABILITY => Some(explain_duplicate_capability()),
        ids::CODE_DUPLICATE_ID => Some(explain_duplicate_id()),
        ids::CODE_ID_FILENAME_MISMATCH => Some(explain_id_mismatch()),
        ids::CODE_INCOMPLETE_DECLARATION => Some(explain_declaration_fields()),
        ids::CODE_MISSING_DECLARATION => Some(explain_missing_declaration()),
        ids::CODE_UNPARSEABLE_DECLARATION => Some(explain_unparseable_declaration()),
        ids::CODE_UNREADABLE_FILE => Some(explain_unreadable_file()),
        ids::CODE_MISSING_IN_BACKEND => Some(explain_missing_in_backend()),
        ids::CODE_MISSING_IN_FRONTEND => Some(explain_missing_in_frontend()),
        ids::CODE_METHOD_MISMATCH => Some(explain_method_mismatch()),

        _ => None,
    }
}

/// List all known check IDs.
pub fn all_check_ids() -> &'static [&'static str] {
    &[
        ids::CHECK_GRAPH_CYCLES,
        ids::CHECK_GRAPH_UNDEFINED_DEPENDENCY,
        ids::CHECK_GRAPH_DEPTH,
        ids::CHECK_RECORDS_VERSION_FORMAT,
        ids::CHECK_RECORDS_DUPLICATE_CAPABILITY,
        ids::CHECK_RECORDS_DUPLICATE_ID,
        ids::CHECK_RECORDS_ID_MISMATCH,
        ids::CHECK_RECORDS_DECLARATION_FIELDS,
        ids::CHECK_SCAN_DECLARATIONS,
        ids::CHECK_ENDPOINTS_RECONCILE,
    ]
}

/// List all known codes.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_DEPENDENCY_CYCLE,
        ids::CODE_UNDEFINED_DEPENDENCY,
        ids::CODE_EXCESSIVE_DEPTH,
        ids::CODE_INVALID_VERSION,
        ids::CODE_DUPLICATE_CAPABILITY,
        ids::CODE_DUPLICATE_ID,
        ids::CODE_ID_FILENAME_MISMATCH,
        ids::CODE_INCOMPLETE_DECLARATION,
        ids::CODE_MISSING_DECLARATION,
        ids::CODE_UNPARSEABLE_DECLARATION,
        ids::CODE_UNREADABLE_FILE,
        ids::CODE_MISSING_IN_BACKEND,
        ids::CODE_MISSING_IN_FRONTEND,
        ids::CODE_METHOD_MISMATCH,
    ]
}

// --- Graph explanations ---

fn explain_cycles() -> Explanation {
    Explanation {
        title: "Dependency Cycles",
        description: "\
Detects cycles in the dependency graph built from `needs.deps`.

Each distinct cycle is reported once, rotated to start at its smallest id:
`a -> b -> a`. Cycles make start-up order undefined and usually mean two
components should be merged or one of them should depend on an interface
instead of the other component.",
        remediation: "\
Break the cycle by removing one edge:
- Move the shared behavior into a third component both can depend on
- Invert one dependency through a callback or event
- Merge the components if they are always deployed together",
        examples: ExamplePair {
            before: r#"# a.py: @self-expose: {"id": "a", "needs": {"deps": ["b"]}}
# b.py: @self-expose: {"id": "b", "needs": {"deps": ["a"]}}"#,
            after: r#"# a.py: @self-expose: {"id": "a", "needs": {"deps": ["common"]}}
# b.py: @self-expose: {"id": "b", "needs": {"deps": ["common"]}}"#,
        },
    }
}

fn explain_undefined_dependency() -> Explanation {
    Explanation {
        title: "Undefined Dependencies",
        description: "\
Detects dependencies that name an id no scanned file declares.

One finding is emitted per `(dependent, missing)` pair. The usual causes are
a typo in the id, a renamed component, or a dependency living outside the
scanned tree (or inside a skipped directory).",
        remediation: "\
Fix the id in `needs.deps`, add a declaration to the missing component, or
widen the scan (check `skip_dirs` and `skip_name_prefixes`).",
        examples: ExamplePair {
            before: r#"# @self-expose: {"id": "a", "needs": {"deps": ["agent_manger"]}}"#,
            after: r#"# @self-expose: {"id": "a", "needs": {"deps": ["agent_manager"]}}"#,
        },
    }
}

fn explain_depth() -> Explanation {
    Explanation {
        title: "Excessive Dependency Depth",
        description: "\
Reports when the longest dependency chain exceeds `[graph] max_depth`
(default 10 edges).

Deep chains make every change near the bottom ripple through many
components.",
        remediation: "\
Flatten the chain: let intermediate components depend directly on the
services they use, or raise `max_depth` if the depth is intended.",
        examples: ExamplePair {
            before: r#"[graph]
max_depth = 10   # chain a -> b -> ... -> l has 11 edges"#,
            after: r#"[graph]
max_depth = 12"#,
        },
    }
}

// --- Record explanations ---

fn explain_version_format() -> Explanation {
    Explanation {
        title: "Version Format",
        description: "\
Detects declared versions that are not plain `MAJOR.MINOR.PATCH` numbers.

`1.0.0` is valid; `1.0`, `v2.0.0` and `1.0.0-beta` are not.",
        remediation: "Declare the version as three dot-separated integers.",
        examples: ExamplePair {
            before: r#"# @self-expose: {"id": "a", "version": "v2.0"}"#,
            after: r#"# @self-expose: {"id": "a", "version": "2.0.0"}"#,
        },
    }
}

fn explain_duplicate_capability() -> Explanation {
    Explanation {
        title: "Duplicate Capabilities",
        description: "\
Reports capabilities provided by two or more distinct ids.

This is informational: overlapping capabilities are sometimes intended
(fallbacks, alternative back-ends) but often signal duplicated code.",
        remediation: "\
Consolidate the implementations, or rename the capabilities so each one
describes what is specific to its provider.",
        examples: ExamplePair {
            before: r#"# a.py: @self-expose: {"id": "a", "provides": {"capabilities": ["search"]}}
# b.py: @self-expose: {"id": "b", "provides": {"capabilities": ["search"]}}"#,
            after: r#"# a.py: @self-expose: {"id": "a", "provides": {"capabilities": ["web search"]}}
# b.py: @self-expose: {"id": "b", "provides": {"capabilities": ["file search"]}}"#,
        },
    }
}

fn explain_duplicate_id() -> Explanation {
    Explanation {
        title: "Duplicate Ids",
        description: "\
Detects ids declared by more than one record.

Dependencies refer to ids, so a duplicate makes the graph ambiguous: the
dependency sets of all records sharing the id are merged.",
        remediation: "Give every declaration a unique id, usually the file stem.",
        examples: ExamplePair {
            before: r#"# agent.py:     @self-expose: {"id": "agent"}
# agent_old.py: @self-expose: {"id": "agent"}"#,
            after: r#"# agent.py:     @self-expose: {"id": "agent"}
# agent_old.py: @self-expose: {"id": "agent_old"}"#,
        },
    }
}

fn explain_id_mismatch() -> Explanation {
    Explanation {
        title: "Id/Filename Mismatch",
        description: "\
Reports declarations whose id differs from the stem of the file that
contains them.

Keeping ids equal to file stems makes the graph easy to navigate.",
        remediation: "Rename the id (and its dependents) or the file.",
        examples: ExamplePair {
            before: r#"# tools.py: @self-expose: {"id": "toolkit"}"#,
            after: r#"# tools.py: @self-expose: {"id": "tools"}"#,
        },
    }
}

fn explain_declaration_fields() -> Explanation {
    Explanation {
        title: "Incomplete Declaration",
        description: "\
Reports declarations that parsed but left fields out or gave them the wrong
shape. The scanner fills these with defaults: the id becomes the file stem,
the name is derived from the id, the kind is `component` and the version is
`1.0.0`. Missing `needs` or `provides` blocks read as empty.

The finding lists the missing and malformed fields so the declaration can
state them explicitly.",
        remediation: "\
Declare every field: `id`, `name`, `type`, `version`, `needs` (with `deps`
and `resources` lists) and `provides` (with a `capabilities` list).",
        examples: ExamplePair {
            before: r#"# @self-expose: {"id": "helper"}"#,
            after: r#"# @self-expose: {"id": "helper", "name": "Helper", "type": "component", "version": "1.0.0", "needs": {"deps": [], "resources": []}, "provides": {"capabilities": []}}"#,
        },
    }
}

// --- Scan explanations ---

fn explain_scan_declarations() -> Explanation {
    Explanation {
        title: "Declaration Scan",
        description: "\
Reports per-file problems found while extracting declarations: files
without a declaration, declarations that cannot be parsed, and files that
cannot be read.

These problems never abort the scan.",
        remediation: "\
Put a `@self-expose: {...}` comment in the first lines of the file with a
valid JSON object, or exclude the file with `skip_dirs` /
`skip_name_prefixes`.",
        examples: ExamplePair {
            before: r#"# @self-expose: {"id": "a", "needs": {"deps": ["b"]"#,
            after: r#"# @self-expose: {"id": "a", "needs": {"deps": ["b"]}}"#,
        },
    }
}

fn explain_missing_declaration() -> Explanation {
    Explanation {
        title: "Missing Declaration",
        description: "\
A candidate file has no declaration marker in its first `max_scan_lines`
lines.",
        remediation: "\
Add a declaration near the top of the file, or exclude it from the scan.
Start from this template, with the id set to the file stem:

    # @self-expose: {\"id\": \"<file stem>\", \"name\": \"<Name>\", \"type\": \"component\", \"version\": \"1.0.0\", \"needs\": {\"deps\": [], \"resources\": []}, \"provides\": {\"capabilities\": []}}

In HTML files use `<!-- @self-expose: {...} -->` instead.",
        examples: ExamplePair {
            before: r#"import os
"#,
            after: r#"# @self-expose: {"id": "helper", "name": "Helper", "type": "component", "version": "1.0.0", "needs": {"deps": [], "resources": []}, "provides": {"capabilities": []}}
import os
"#,
        },
    }
}

fn explain_unparseable_declaration() -> Explanation {
    Explanation {
        title: "Unparseable Declaration",
        description: "\
A marker was found but the text after it is not a JSON object, even after
appending missing closing braces and re-slicing to the outermost braces.",
        remediation: "\
Fix the JSON: quote keys and strings with double quotes, drop trailing
commas, and balance braces.",
        examples: ExamplePair {
            before: r#"# @self-expose: {id: 'a',}"#,
            after: r#"# @self-expose: {"id": "a"}"#,
        },
    }
}

fn explain_unreadable_file() -> Explanation {
    Explanation {
        title: "Unreadable File",
        description: "\
A candidate file could not be read, or its content is not valid UTF-8.",
        remediation: "\
Fix the file permissions or encoding, or exclude the file from the scan.",
        examples: ExamplePair {
            before: "legacy.py (latin-1 encoded)",
            after: "legacy.py (utf-8 encoded)",
        },
    }
}

// --- Endpoint explanations ---

fn explain_endpoints_reconcile() -> Explanation {
    Explanation {
        title: "Endpoint Reconciliation",
        description: "\
Compares HTTP paths called by front-end files against paths dispatched by
back-end handlers.

Paths built at runtime cannot be resolved statically and may show up as
false positives; map template expressions with `[endpoints] template_vars`.",
        remediation: "\
Add the missing route, remove the stale call, or align the HTTP methods.",
        examples: ExamplePair {
            before: r#"fetch('/api/status')            // no handler for /api/status"#,
            after: r#"elif self.path == '/api/status':  # in do_GET"#,
        },
    }
}

fn explain_missing_in_backend() -> Explanation {
    Explanation {
        title: "Endpoint Missing In Back-end",
        description: "The front-end calls a path that no back-end route serves.",
        remediation: "Add a handler for the path or fix the path in the call site.",
        examples: ExamplePair {
            before: r#"fetch('/api/agents/list')"#,
            after: r#"fetch('/api/agents')"#,
        },
    }
}

fn explain_missing_in_frontend() -> Explanation {
    Explanation {
        title: "Endpoint Missing In Front-end",
        description: "\
A back-end route is never called by the scanned front-end files. This is
informational: the route may serve other clients.",
        remediation: "Remove the unused route or document its other callers.",
        examples: ExamplePair {
            before: r#"elif self.path == '/api/legacy':"#,
            after: "(route removed)",
        },
    }
}

fn explain_method_mismatch() -> Explanation {
    Explanation {
        title: "Endpoint Method Mismatch",
        description: "\
The front-end calls a path with an HTTP method the back-end does not handle
for that path.",
        remediation: "\
Handle the method in the matching `do_<METHOD>` handler or change the call.",
        examples: ExamplePair {
            before: r#"fetch('/api/chat', {method: 'POST'})   // only do_GET handles /api/chat"#,
            after: r#"def do_POST(self):
    if self.path == '/api/chat':"#,
        },
    }
}
