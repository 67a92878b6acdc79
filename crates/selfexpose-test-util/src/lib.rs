//! Shared test utilities for the selfexpose workspace.
//!
//! `xtask` needs these at runtime as well as the CLI tests, so they live in a regular crate
//! instead of a `#[cfg(test)]` module.

use serde_json::Value;

pub const TIMESTAMP_PLACEHOLDER: &str = "__TIMESTAMP__";
pub const VERSION_PLACEHOLDER: &str = "__VERSION__";

/// Replace the run-dependent fields of a report envelope with fixed placeholders.
///
/// Only the root object is touched, and only when it looks like an envelope (`schema`, `tool`,
/// `verdict` and `findings` all present). Records and finding payloads are never rewritten, so
/// a declared `version` inside a record survives.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    let Some(obj) = value.as_object_mut() else {
        return value;
    };
    let is_envelope = ["schema", "tool", "verdict", "findings"]
        .iter()
        .all(|k| obj.contains_key(*k));
    if !is_envelope {
        return value;
    }

    for key in ["started_at", "finished_at"] {
        if obj.contains_key(key) {
            obj.insert(key.to_string(), Value::String(TIMESTAMP_PLACEHOLDER.to_string()));
        }
    }
    if let Some(tool) = obj.get_mut("tool").and_then(Value::as_object_mut)
        && tool.contains_key("version")
    {
        tool.insert(
            "version".to_string(),
            Value::String(VERSION_PLACEHOLDER.to_string()),
        );
    }
    value
}

/// Parse report text and normalize it in one step.
pub fn normalize_report_text(text: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(text).map(normalize_nondeterministic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_envelope_fields() {
        let input = json!({
            "schema": "selfexpose.report.v1",
            "tool": { "name": "selfexpose", "version": "0.1.0" },
            "started_at": "2025-01-01T00:00:00Z",
            "finished_at": "2025-01-01T00:00:01Z",
            "verdict": "pass",
            "findings": [],
            "data": { "records": [ { "id": "a", "version": "1.2.3" } ] }
        });

        let result = normalize_nondeterministic(input);

        assert_eq!(result["started_at"], TIMESTAMP_PLACEHOLDER);
        assert_eq!(result["finished_at"], TIMESTAMP_PLACEHOLDER);
        assert_eq!(result["tool"]["version"], VERSION_PLACEHOLDER);
        assert_eq!(result["tool"]["name"], "selfexpose");
        assert_eq!(result["data"]["records"][0]["version"], "1.2.3");
    }

    #[test]
    fn non_envelope_values_are_untouched() {
        let snapshot = json!([{ "id": "a", "version": "1.0.0" }]);
        assert_eq!(normalize_nondeterministic(snapshot.clone()), snapshot);

        let partial = json!({ "tool": { "version": "1" }, "started_at": "x" });
        assert_eq!(normalize_nondeterministic(partial.clone()), partial);
    }

    #[test]
    fn normalization_is_idempotent() {
        let input = json!({
            "schema": "selfexpose.endpoints.v1",
            "tool": { "name": "selfexpose", "version": "9.9.9" },
            "started_at": "2025-01-01T00:00:00Z",
            "finished_at": "2025-01-01T00:00:00Z",
            "verdict": "warn",
            "findings": []
        });
        let once = normalize_nondeterministic(input);
        assert_eq!(normalize_nondeterministic(once.clone()), once);
    }

    #[test]
    fn parse_errors_surface() {
        assert!(normalize_report_text("{").is_err());
    }
}
