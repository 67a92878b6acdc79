//! CLI entry point for selfexpose.
//!
//! This module is intentionally thin: it handles argument parsing, logging setup, file output,
//! and exit codes. All business logic lives in the `selfexpose-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{ArgAction, Parser, Subcommand};
use selfexpose_app::{
    EndpointsInput, ExplainOutput, ScanInput, endpoint_to_renderable, format_explanation,
    format_not_found, parse_report_json, render_endpoint_markdown, render_markdown, run_endpoints,
    run_explain, run_scan, to_renderable, write_report, write_text,
};
use selfexpose_settings::Overrides;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Config file looked up next to the scanned tree when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "selfexpose.toml";

#[derive(Parser, Debug)]
#[command(
    name = "selfexpose",
    version,
    about = "Self-exposure declaration scanner, compatibility reporter and endpoint reconciler"
)]
struct Cli {
    /// Path to the selfexpose config TOML (default: selfexpose.toml in the scanned root).
    #[arg(long, global = true)]
    config: Option<Utf8PathBuf>,

    /// Override profile (default|permissive).
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract declarations, write the snapshot and the compatibility report.
    Scan {
        /// Root directory to scan.
        root: Utf8PathBuf,

        /// Where to write the exposure snapshot (JSON array of records).
        #[arg(default_value = "self_exposures.json")]
        output: Utf8PathBuf,

        /// Where to write the Markdown compatibility report.
        #[arg(long, default_value = "self_exposure_report.md")]
        markdown_out: Utf8PathBuf,

        /// Also write the JSON report envelope here.
        #[arg(long)]
        report_out: Option<Utf8PathBuf>,

        /// Also write the component graph here.
        #[arg(long)]
        graph_out: Option<Utf8PathBuf>,

        /// Number of leading lines searched for a declaration marker.
        #[arg(long)]
        max_scan_lines: Option<usize>,
    },

    /// Diff front-end HTTP call sites against back-end routes.
    Endpoints {
        /// Directory holding front-end markup and scripts.
        #[arg(long)]
        frontend: Utf8PathBuf,

        /// Directory holding back-end handler source.
        #[arg(long)]
        backend: Utf8PathBuf,

        /// Where to write the JSON endpoint report.
        #[arg(long)]
        report_out: Option<Utf8PathBuf>,

        /// Where to write the Markdown endpoint report (if not specified, prints to stdout).
        #[arg(long)]
        markdown_out: Option<Utf8PathBuf>,
    },

    /// Render Markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long)]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Explain a check id or code with remediation guidance.
    Explain {
        /// The check id (e.g. "graph.cycles") or code (e.g. "dependency_cycle") to explain.
        identifier: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.cmd {
        Commands::Scan {
            root,
            output,
            markdown_out,
            report_out,
            graph_out,
            max_scan_lines,
        } => cmd_scan(
            &cli,
            root,
            ScanOutputs {
                snapshot: output,
                markdown: markdown_out,
                report: report_out.as_deref(),
                graph: graph_out.as_deref(),
            },
            *max_scan_lines,
        ),
        Commands::Endpoints {
            frontend,
            backend,
            report_out,
            markdown_out,
        } => cmd_endpoints(
            &cli,
            frontend,
            backend,
            report_out.as_deref(),
            markdown_out.as_deref(),
        ),
        Commands::Md { report, output } => cmd_md(report, output.as_deref()),
        Commands::Explain { identifier } => cmd_explain(identifier),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("selfexpose error: {err:#}");
            ExitCode::from(1)
        }
    }
}

/// Logs go to stderr so stdout stays clean for rendered output.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

struct ScanOutputs<'a> {
    snapshot: &'a Utf8Path,
    markdown: &'a Utf8Path,
    report: Option<&'a Utf8Path>,
    graph: Option<&'a Utf8Path>,
}

fn cmd_scan(
    cli: &Cli,
    root: &Utf8Path,
    outputs: ScanOutputs<'_>,
    max_scan_lines: Option<usize>,
) -> anyhow::Result<ExitCode> {
    if !root.is_dir() {
        anyhow::bail!("root directory does not exist: {root}");
    }
    let cfg_text = load_config(cli.config.as_deref(), &root.join(DEFAULT_CONFIG_FILE))?;

    let output = run_scan(ScanInput {
        root,
        config_text: &cfg_text,
        overrides: Overrides {
            profile: cli.profile.clone(),
            max_scan_lines,
        },
    })?;

    output
        .repository
        .write_snapshot(outputs.snapshot)
        .context("write snapshot")?;

    let md = render_markdown(&to_renderable(&output.report));
    write_text(outputs.markdown, &md).context("write markdown")?;

    if let Some(path) = outputs.report {
        write_report(path, &output.report).context("write report json")?;
    }
    if let Some(path) = outputs.graph {
        output
            .repository
            .write_component_graph(path)
            .context("write component graph")?;
    }

    println!(
        "selfexpose: {} components, {} findings, verdict {}",
        output.report.data.stats.components,
        output.report.findings.len(),
        output.report.verdict.as_str()
    );
    Ok(ExitCode::SUCCESS)
}

fn cmd_endpoints(
    cli: &Cli,
    frontend: &Utf8Path,
    backend: &Utf8Path,
    report_out: Option<&Utf8Path>,
    markdown_out: Option<&Utf8Path>,
) -> anyhow::Result<ExitCode> {
    let cfg_text = load_config(cli.config.as_deref(), Utf8Path::new(DEFAULT_CONFIG_FILE))?;

    let output = run_endpoints(EndpointsInput {
        frontend_root: frontend,
        backend_root: backend,
        config_text: &cfg_text,
        overrides: Overrides {
            profile: cli.profile.clone(),
            max_scan_lines: None,
        },
    })?;

    if let Some(path) = report_out {
        write_report(path, &output.report).context("write report json")?;
    }

    let md = render_endpoint_markdown(&endpoint_to_renderable(&output.report));
    match markdown_out {
        Some(path) => write_text(path, &md).context("write markdown")?,
        None => print!("{md}"),
    }
    Ok(ExitCode::SUCCESS)
}

/// An explicit `--config` must exist; the implicit default may be absent (defaults apply).
fn load_config(explicit: Option<&Utf8Path>, implicit: &Utf8Path) -> anyhow::Result<String> {
    match explicit {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("read config: {path}"))
        }
        None if implicit.is_file() => {
            std::fs::read_to_string(implicit).with_context(|| format!("read config: {implicit}"))
        }
        None => {
            tracing::debug!(path = %implicit, "no config file; using defaults");
            Ok(String::new())
        }
    }
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<ExitCode> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {report_path}"))?;
    let report = parse_report_json(&report_text)?;
    let md = render_markdown(&to_renderable(&report));

    match output {
        Some(path) => write_text(path, &md).context("write markdown output")?,
        None => print!("{md}"),
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_explain(identifier: &str) -> anyhow::Result<ExitCode> {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", format_explanation(&exp));
            Ok(ExitCode::SUCCESS)
        }
        ExplainOutput::NotFound {
            identifier,
            available_check_ids,
            available_codes,
        } => {
            eprint!(
                "{}",
                format_not_found(&identifier, available_check_ids, available_codes)
            );
            Ok(ExitCode::from(1))
        }
    }
}
