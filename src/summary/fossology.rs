use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::SummarizeResult;
use crate::license::LicenseNormalizer;
use crate::models::{Coordinates, Definition, FileEntry};

use super::lines::{FullMatchParser, LicenseScanParser, Parsed};
use super::merge::merge_definitions;
use super::util::{non_empty, unique};
use super::{Summarizer, ToolFamily};

/// Summarizer for FOSSology harvests.
///
/// Runs three independent agents' output through the merger: monk (full-text
/// matches), nomos (license scan lines), then copyright (statements).
pub struct FossologySummarizer {
    normalizer: Arc<dyn LicenseNormalizer>,
    full_match: FullMatchParser,
    license_scan: LicenseScanParser,
}

#[derive(Debug, Deserialize)]
struct CopyrightRecord {
    path: String,
    output: Option<CopyrightOutput>,
}

#[derive(Debug, Deserialize)]
struct CopyrightOutput {
    results: Option<Vec<CopyrightFinding>>,
}

#[derive(Debug, Deserialize)]
struct CopyrightFinding {
    #[serde(rename = "type")]
    kind: Option<String>,
    content: Option<String>,
}

impl FossologySummarizer {
    pub fn new(normalizer: Arc<dyn LicenseNormalizer>) -> SummarizeResult<Self> {
        Ok(Self {
            normalizer,
            full_match: FullMatchParser::new()?,
            license_scan: LicenseScanParser::new()?,
        })
    }

    fn summarize_monk(&self, result: &mut Definition, harvested: &Value) {
        let Some(content) = harvested.pointer("/monk/output/content").and_then(Value::as_str) else {
            return;
        };
        let files = content
            .lines()
            .filter_map(|line| match self.full_match.parse(line) {
                Parsed::Entry(entry) => {
                    let license = entry.label.and_then(|l| self.normalizer.normalize(&l));
                    Some(FileEntry::with_license(entry.path, license))
                }
                Parsed::Ignored => None,
                Parsed::Malformed => {
                    warn!(line, "skipping malformed monk full-match line");
                    None
                }
            })
            .collect();
        merge_definitions(result, Definition { files, ..Default::default() });
    }

    fn summarize_nomos(&self, result: &mut Definition, harvested: &Value) {
        let Some(content) = harvested.pointer("/nomos/output/content").and_then(Value::as_str) else {
            return;
        };
        let files = content
            .lines()
            .filter_map(|line| match self.license_scan.parse(line) {
                Parsed::Entry(entry) => {
                    let license = entry.label.and_then(|l| self.normalizer.normalize(&l));
                    Some(FileEntry::with_license(entry.path, license))
                }
                Parsed::Ignored => {
                    if !line.trim().is_empty() {
                        debug!(line, "ignoring nomos line");
                    }
                    None
                }
                Parsed::Malformed => {
                    warn!(line, "skipping malformed nomos line");
                    None
                }
            })
            .collect();
        merge_definitions(result, Definition { files, ..Default::default() });
    }

    fn summarize_copyright(&self, result: &mut Definition, harvested: &Value) {
        let Some(content) = harvested.pointer("/copyright/output/content").and_then(Value::as_array) else {
            return;
        };
        let files = content
            .iter()
            .filter_map(|raw| match CopyrightRecord::deserialize(raw) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(error = %e, "skipping malformed copyright record");
                    None
                }
            })
            .filter_map(|record| {
                let results = record.output?.results?;
                let statements = results
                    .into_iter()
                    .filter(|finding| finding.kind.as_deref() == Some("statement"))
                    .filter_map(|finding| finding.content);
                Some(FileEntry {
                    attributions: non_empty(unique(statements)),
                    ..FileEntry::new(record.path)
                })
            })
            .collect();
        merge_definitions(result, Definition { files, ..Default::default() });
    }
}

impl Summarizer for FossologySummarizer {
    fn tool(&self) -> ToolFamily {
        ToolFamily::Fossology
    }

    fn summarize(&self, _coordinates: &Coordinates, harvested: &Value) -> SummarizeResult<Definition> {
        let mut result = Definition::default();
        // Merging does not reconcile per-file licenses: later passes overwrite
        // earlier ones, so nomos takes precedence over monk. Copyright only
        // contributes attributions.
        self.summarize_monk(&mut result, harvested);
        self.summarize_nomos(&mut result, harvested);
        self.summarize_copyright(&mut result, harvested);
        Ok(result)
    }
}
