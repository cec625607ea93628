use std::path::PathBuf;

use clap::Parser;

use harvest_summarizer::summary::ToolFamily;

#[derive(Parser, Debug)]
#[command(
    name = "harvest-summarizer",
    about = "Summarize harvested license scanner output into package definitions",
    version
)]
pub struct Cli {
    /// Package coordinates, e.g. npm/npmjs/-/lodash/4.17.21
    pub coordinates: String,

    /// Harvest store root [default: .]
    #[arg(long, value_name = "DIR")]
    pub store: Option<PathBuf>,

    /// Summarize a single harvested tool output file instead of a store
    #[arg(long, value_name = "FILE", conflicts_with = "store")]
    pub bundle: Option<PathBuf>,

    /// Only summarize this tool's output (detected from the file when omitted with --bundle)
    #[arg(long, value_name = "TOOL")]
    pub tool: Option<ToolArg>,

    /// Config file [default: ./.harvest-summarizer/config.toml, fallback ~/.config/harvest-summarizer/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "json", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Show every file and debug diagnostics
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print one summary line per tool
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ToolArg {
    Fossology,
    Scancode,
}

impl From<ToolArg> for ToolFamily {
    fn from(arg: ToolArg) -> Self {
        match arg {
            ToolArg::Fossology => ToolFamily::Fossology,
            ToolArg::Scancode => ToolFamily::ScanCode,
        }
    }
}
