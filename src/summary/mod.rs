//! Tool-specific summarizers that turn raw harvested output into a [`Definition`].
//!
//! Each tool family gets one [`Summarizer`] implementation; [`summarizer_for`]
//! picks it from a [`ToolFamily`] the way callers key harvested data by tool name.
//! Summarizers are stateless across calls and can be shared between threads.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::bail;
use serde_json::Value;

use crate::config::{Config, SummaryConfig};
use crate::error::SummarizeResult;
use crate::license::{LicenseFileClassifier, LicenseNormalizer, NameClassifier, SpdxNormalizer};
use crate::models::{Coordinates, Definition};

pub mod fossology;
pub mod lines;
pub mod merge;
pub mod scancode;
mod util;

pub use fossology::FossologySummarizer;
pub use merge::merge_definitions;
pub use scancode::ScanCodeSummarizer;

pub trait Summarizer: Send + Sync {
    /// The tool family whose output this summarizer understands.
    fn tool(&self) -> ToolFamily;

    /// Summarize one tool's raw output for the package at `coordinates`.
    fn summarize(&self, coordinates: &Coordinates, harvested: &Value) -> SummarizeResult<Definition>;
}

/// Scanner families with a dedicated summarizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolFamily {
    /// FOSSology: monk, nomos and copyright agents.
    Fossology,
    /// ScanCode toolkit JSON output (versions with `license_detections`).
    ScanCode,
}

impl ToolFamily {
    pub fn id(&self) -> &'static str {
        match self {
            ToolFamily::Fossology => "fossology",
            ToolFamily::ScanCode => "scancode",
        }
    }
}

impl fmt::Display for ToolFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ToolFamily {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fossology" => Ok(ToolFamily::Fossology),
            "scancode" => Ok(ToolFamily::ScanCode),
            other => bail!("no summarizer for tool '{other}'"),
        }
    }
}

/// Collaborators and thresholds shared by every summarizer.
#[derive(Clone)]
pub struct SummaryOptions {
    pub normalizer: Arc<dyn LicenseNormalizer>,
    pub classifier: Arc<dyn LicenseFileClassifier>,
    pub thresholds: SummaryConfig,
}

impl SummaryOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            normalizer: Arc::new(SpdxNormalizer::new()),
            classifier: Arc::new(NameClassifier::from_config(&config.license_files)),
            thresholds: config.summary.clone(),
        }
    }
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Build the summarizer registered for `tool`.
pub fn summarizer_for(tool: ToolFamily, options: &SummaryOptions) -> SummarizeResult<Box<dyn Summarizer>> {
    Ok(match tool {
        ToolFamily::Fossology => Box::new(FossologySummarizer::new(options.normalizer.clone())?),
        ToolFamily::ScanCode => Box::new(ScanCodeSummarizer::new(options)),
    })
}
