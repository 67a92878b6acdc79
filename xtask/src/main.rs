//! Developer tasks (schema generation, golden-file upkeep, explain coverage).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};

/// Project root (parent of the xtask directory).
fn project_root() -> anyhow::Result<PathBuf> {
    let manifest_dir = match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => std::env::current_dir().context("determine current directory")?,
    };
    if manifest_dir.ends_with("xtask")
        && let Some(parent) = manifest_dir.parent()
    {
        return Ok(parent.to_path_buf());
    }
    Ok(manifest_dir)
}

fn schemas_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("schemas"))
}

struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_report_schema() -> schemars::Schema {
    schema_for!(selfexpose_types::ExposureReport)
}

fn generate_endpoints_schema() -> schemars::Schema {
    schema_for!(selfexpose_types::EndpointReport)
}

fn generate_snapshot_schema() -> schemars::Schema {
    schema_for!(Vec<selfexpose_types::ExposureRecord>)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(selfexpose_settings::SelfExposeConfigV1)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "selfexpose.report.v1.json",
            generate: generate_report_schema,
        },
        SchemaSpec {
            filename: "selfexpose.endpoints.v1.json",
            generate: generate_endpoints_schema,
        },
        SchemaSpec {
            filename: "selfexpose.snapshot.v1.json",
            generate: generate_snapshot_schema,
        },
        SchemaSpec {
            filename: "selfexpose.config.v1.json",
            generate: generate_config_schema,
        },
    ]
}

/// Pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    fs::create_dir_all(&dir).context("create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json).with_context(|| format!("write {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

/// Fails when a checked-in schema is missing or differs from the generated one.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }
        let expected = serialize_schema(&(spec.generate)())?;
        let actual =
            fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    for name in &missing {
        eprintln!("missing: {name}");
    }
    for name in &mismatched {
        eprintln!("out of date: {name}");
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("schema validation failed")
}

/// Validate a report file against the generated schema for its `schema` field.
fn validate_report(path: &Path) -> anyhow::Result<()> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?;

    let schema = match value.get("schema").and_then(|s| s.as_str()) {
        Some(selfexpose_types::SCHEMA_REPORT_V1) => generate_report_schema(),
        Some(selfexpose_types::SCHEMA_ENDPOINTS_V1) => generate_endpoints_schema(),
        None if value.is_array() => generate_snapshot_schema(),
        other => bail!("unrecognized report schema: {other:?}"),
    };
    let schema_value = serde_json::to_value(&schema).context("serialize schema")?;
    let validator = jsonschema::validator_for(&schema_value)
        .map_err(|e| anyhow::anyhow!("compile schema: {e}"))?;

    let errors: Vec<String> = validator.iter_errors(&value).map(|e| e.to_string()).collect();
    if errors.is_empty() {
        println!("{} validates", path.display());
        return Ok(());
    }
    for err in &errors {
        eprintln!("  - {err}");
    }
    bail!("{} schema errors in {}", errors.len(), path.display())
}

/// Print a report with timestamps and tool version replaced, for refreshing golden files.
fn normalize(path: &Path) -> anyhow::Result<()> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = selfexpose_test_util::normalize_report_text(&text)
        .with_context(|| format!("parse {}", path.display()))?;
    println!(
        "{}",
        serde_json::to_string_pretty(&value).context("serialize")?
    );
    Ok(())
}

/// Every check id and code must have a complete explanation.
fn explain_coverage() -> anyhow::Result<()> {
    use selfexpose_types::explain;

    let check_ids = explain::all_check_ids();
    let codes = explain::all_codes();
    let mut errors = Vec::new();

    for (kind, ident) in check_ids
        .iter()
        .map(|id| ("check id", *id))
        .chain(codes.iter().map(|code| ("code", *code)))
    {
        let Some(exp) = explain::lookup_explanation(ident) else {
            errors.push(format!("{kind} '{ident}' has no explanation"));
            continue;
        };
        for (field, value) in [
            ("title", exp.title),
            ("description", exp.description),
            ("remediation", exp.remediation),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("{kind} '{ident}' has empty {field}"));
            }
        }
    }

    if errors.is_empty() {
        println!(
            "{} check ids and {} codes have explanations",
            check_ids.len(),
            codes.len()
        );
        return Ok(());
    }
    for error in &errors {
        eprintln!("  - {error}");
    }
    bail!("explain coverage failed with {} errors", errors.len())
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help                     Show this message");
    eprintln!("  emit-schemas             Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas         Check that schemas/ matches generated output");
    eprintln!("  validate-report <FILE>   Validate a report or snapshot against its schema");
    eprintln!("  normalize <FILE>         Print a report with nondeterministic fields replaced");
    eprintln!("  print-schema-ids         Print known schema ids");
    eprintln!("  explain-coverage         Check every check id and code has an explanation");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");
    let file_arg = || -> anyhow::Result<PathBuf> {
        args.get(2)
            .map(PathBuf::from)
            .with_context(|| format!("{cmd} requires a file argument"))
    };

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "validate-report" => validate_report(&file_arg()?),
        "normalize" => normalize(&file_arg()?),
        "explain-coverage" => explain_coverage(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
