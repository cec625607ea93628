//! `harvest-summarizer` CLI: summarize harvested scanner output for one package.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config ([`load_config`]).
//! 3. Load harvested output: one `--bundle` file, or the newest output of every
//!    tool in a harvest store ([`FileStore`]).
//! 4. Summarize each tool's output with its registered summarizer.
//! 5. Print the definitions as JSON (default) or a terminal report.
//! 6. Exit `0`, or `1` when nothing was harvested or a summarizer failed.

mod cli;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use cli::{Cli, ReportFormat};
use harvest_summarizer::config::load_config;
use harvest_summarizer::detector::detect_tool;
use harvest_summarizer::harvest::FileStore;
use harvest_summarizer::report;
use harvest_summarizer::summary::{summarizer_for, SummaryOptions, ToolFamily};
use harvest_summarizer::{Coordinates, Definition, HarvestBundle};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let coordinates: Coordinates = cli.coordinates.parse()?;
    let config = load_config(Path::new("."), cli.config.as_deref())?;
    let options = SummaryOptions::from_config(&config);
    let only_tool: Option<ToolFamily> = cli.tool.map(Into::into);

    let bundle = match &cli.bundle {
        Some(path) => load_bundle_file(path, only_tool)?,
        None => {
            let root = cli.store.clone().unwrap_or_else(|| PathBuf::from("."));
            let mut bundle = FileStore::new(root).latest_results(&coordinates)?;
            if let Some(tool) = only_tool {
                bundle.retain(|name, _| name.eq_ignore_ascii_case(tool.id()));
            }
            bundle
        }
    };

    if bundle.is_empty() {
        eprintln!("No harvested tool output found for {}", coordinates);
        std::process::exit(1);
    }

    let pb = if !cli.quiet {
        let pb = ProgressBar::new(bundle.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut definitions: BTreeMap<String, Definition> = BTreeMap::new();
    let mut failed = false;

    for (tool_name, harvested) in &bundle {
        if let Some(pb) = &pb {
            pb.set_message(tool_name.clone());
        }

        match summarize_tool(&options, tool_name, &coordinates, harvested) {
            Ok(Some(definition)) => {
                definitions.insert(tool_name.clone(), definition);
            }
            Ok(None) => warn!(tool = %tool_name, "no summarizer registered, skipping"),
            Err(e) => {
                failed = true;
                let line = format!("  {} {}: {:#}", "✗".red(), tool_name, e);
                match &pb {
                    Some(pb) => pb.println(line),
                    None => eprintln!("{line}"),
                }
            }
        }

        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    match cli.report {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&definitions)?),
        ReportFormat::Terminal => {
            report::terminal::render(&coordinates, &definitions, cli.verbose, cli.quiet)
        }
    }

    if failed {
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Read one harvested output file, keyed by the named or detected tool.
fn load_bundle_file(path: &Path, tool: Option<ToolFamily>) -> Result<HarvestBundle> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let harvested: Value =
        serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;

    let Some(tool) = tool.or_else(|| detect_tool(&harvested)) else {
        bail!(
            "cannot tell which tool produced {}; pass --tool",
            path.display()
        );
    };

    let mut bundle = HarvestBundle::new();
    bundle.insert(tool.id().to_string(), harvested);
    Ok(bundle)
}

/// `Ok(None)` when no summarizer is registered for `tool_name`.
fn summarize_tool(
    options: &SummaryOptions,
    tool_name: &str,
    coordinates: &Coordinates,
    harvested: &Value,
) -> Result<Option<Definition>> {
    let Ok(tool) = tool_name.parse::<ToolFamily>() else {
        return Ok(None);
    };
    let summarizer = summarizer_for(tool, options)?;
    Ok(Some(summarizer.summarize(coordinates, harvested)?))
}
