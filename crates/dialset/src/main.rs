//! Prints how agent-level model settings resolve against run-level ones.

#[macro_use]
extern crate tracing;

mod source;

use std::fmt::Write as _;

use anyhow::{Context as _, Result};
use clap::{Parser, ValueEnum};
use dialset_model::ModelSettings;
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use crate::source::load_settings;

/// Resolves agent model settings against run model settings.
#[derive(Parser, Debug)]
#[command(name = "dialset", version, about)]
struct Cli {
    /// Agent-level settings, inline JSON or `@path` to a .json/.toml file
    #[arg(long, env = "DIALSET_AGENT_SETTINGS")]
    agent: Option<String>,

    /// Run-level settings, taking precedence over the agent's
    #[arg(long, env = "DIALSET_RUN_SETTINGS")]
    run: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Pretty)]
    format: Format,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Pretty,
    Json,
    Toml,
}

#[derive(Debug, Serialize)]
struct Report {
    agent: ModelSettings,
    run: ModelSettings,
    resolved: ModelSettings,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let agent = load_settings(cli.agent.as_deref().unwrap_or_default())
        .context("failed to load agent settings")?;
    let run = load_settings(cli.run.as_deref().unwrap_or_default())
        .context("failed to load run settings")?;
    let resolved = agent.resolve(&run);
    debug!("resolved {agent:?} with {run:?} into {resolved:?}");

    let report = Report {
        agent,
        run,
        resolved,
    };
    print!("{}", render(&report, cli.format)?);
    Ok(())
}

fn render(report: &Report, format: Format) -> Result<String> {
    match format {
        Format::Pretty => Ok(render_pretty(report)),
        Format::Json => {
            let mut out = serde_json::to_string_pretty(report)?;
            out.push('\n');
            Ok(out)
        }
        Format::Toml => Ok(toml::to_string_pretty(report)?),
    }
}

fn render_pretty(report: &Report) -> String {
    let mut out = String::new();
    for (label, settings) in [
        ("Agent settings", &report.agent),
        ("Run settings", &report.run),
        ("Resolved settings", &report.resolved),
    ] {
        writeln!(out, "{}", label.bold()).ok();
        let fields = match serde_json::to_value(settings) {
            Ok(Value::Object(fields)) => fields,
            _ => Default::default(),
        };
        if fields.is_empty() {
            writeln!(out, "  {}", "(none)".dimmed()).ok();
        }
        for (name, value) in fields {
            let value = match value {
                Value::String(s) => s,
                other => other.to_string(),
            };
            writeln!(out, "  {}: {value}", name.cyan()).ok();
        }
    }
    out
}
