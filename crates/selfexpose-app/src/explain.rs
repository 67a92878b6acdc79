//! The `explain` use case: look up check/code documentation.

use selfexpose_types::explain::{self, Explanation};

#[derive(Clone, Debug)]
pub enum ExplainOutput {
    Found(Explanation),
    /// Unknown identifier; carries every known check id and code for the hint.
    NotFound {
        identifier: String,
        available_check_ids: &'static [&'static str],
        available_codes: &'static [&'static str],
    },
}

pub fn run_explain(identifier: &str) -> ExplainOutput {
    let identifier = identifier.trim();
    match explain::lookup_explanation(identifier) {
        Some(exp) => ExplainOutput::Found(exp),
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available_check_ids: explain::all_check_ids(),
            available_codes: explain::all_codes(),
        },
    }
}

/// Terminal rendering: title, description, remediation, then an indented before/after pair.
pub fn format_explanation(exp: &Explanation) -> String {
    let mut out = String::new();

    out.push_str(exp.title);
    out.push('\n');
    out.push_str(&"=".repeat(exp.title.chars().count()));
    out.push_str("\n\n");
    out.push_str(exp.description);
    out.push_str("\n\nHow to fix\n----------\n");
    out.push_str(exp.remediation);
    out.push_str("\n\nProduces a finding:\n\n");
    push_indented(&mut out, exp.examples.before);
    out.push_str("\nClean:\n\n");
    push_indented(&mut out, exp.examples.after);

    out
}

fn push_indented(out: &mut String, block: &str) {
    for line in block.lines() {
        if line.is_empty() {
            out.push('\n');
        } else {
            out.push_str("    ");
            out.push_str(line);
            out.push('\n');
        }
    }
}

pub fn format_not_found(identifier: &str, check_ids: &[&str], codes: &[&str]) -> String {
    let mut out = format!("Unknown check id or code: {identifier}\n\nKnown check ids:\n");
    for id in check_ids {
        out.push_str(&format!("  {id}\n"));
    }
    out.push_str("\nKnown codes:\n");
    for code in codes {
        out.push_str(&format!("  {code}\n"));
    }
    out
}
