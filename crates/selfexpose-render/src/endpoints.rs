use crate::{RenderableEndpoint, RenderableEndpointReport, RenderableVerdictStatus};

pub fn render_endpoint_markdown(report: &RenderableEndpointReport) -> String {
    let mut out = String::new();
    let data = &report.data;

    out.push_str("# Endpoint reconciliation report\n\n");
    let verdict = match report.verdict {
        RenderableVerdictStatus::Pass => "PASS",
        RenderableVerdictStatus::Warn => "WARN",
        RenderableVerdictStatus::Fail => "FAIL",
    };
    out.push_str(&format!(
        "- Verdict: **{}**\n- Front-end: {} endpoints in {} files\n- Back-end: {} endpoints in {} files\n\n",
        verdict,
        data.frontend_endpoints,
        data.frontend_files,
        data.backend_endpoints,
        data.backend_files
    ));

    if data.missing_in_backend.is_empty()
        && data.missing_in_frontend.is_empty()
        && data.method_mismatches.is_empty()
    {
        out.push_str("Front-end and back-end agree.\n");
        return out;
    }

    push_endpoints(
        &mut out,
        "Called but not served (missing in back-end)",
        &data.missing_in_backend,
    );
    push_endpoints(
        &mut out,
        "Served but never called (missing in front-end)",
        &data.missing_in_frontend,
    );

    if !data.method_mismatches.is_empty() {
        out.push_str(&format!(
            "## Method mismatches ({})\n\n",
            data.method_mismatches.len()
        ));
        out.push_str("| Path | Front-end | Back-end | Missing |\n|---|---|---|---|\n");
        for m in &data.method_mismatches {
            out.push_str(&format!(
                "| `{}` | {} | {} | {} |\n",
                m.path,
                m.frontend_methods.join(", "),
                m.backend_methods.join(", "),
                m.missing_methods.join(", ")
            ));
        }
        out.push('\n');
    }

    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}

fn push_endpoints(out: &mut String, title: &str, endpoints: &[RenderableEndpoint]) {
    if endpoints.is_empty() {
        return;
    }
    out.push_str(&format!("## {} ({})\n\n", title, endpoints.len()));
    out.push_str("| Path | Methods | Sources |\n|---|---|---|\n");
    for e in endpoints {
        let path = if e.prefix {
            format!("`{}` (prefix)", e.path)
        } else {
            format!("`{}`", e.path)
        };
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            path,
            e.methods.join(", "),
            e.sources.join(", ")
        ));
    }
    out.push('\n');
}
