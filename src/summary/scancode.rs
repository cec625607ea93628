use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::SummaryConfig;
use crate::error::{SummarizeError, SummarizeResult};
use crate::license::{LicenseFileClassifier, LicenseNormalizer, NOASSERTION};
use crate::models::{Coordinates, Definition, Described, FileEntry, Hashes, Licensed};

use super::util::{extract_date, join_expressions, non_empty, push_unique, unique};
use super::{Summarizer, SummaryOptions, ToolFamily};

/// Summarizer for ScanCode output that carries `license_detections`.
///
/// The declared license comes from the first tier that yields a valid
/// expression: package summary, first package's declared expression, first
/// package's extracted statement, then license text found in root files.
pub struct ScanCodeSummarizer {
    normalizer: Arc<dyn LicenseNormalizer>,
    classifier: Arc<dyn LicenseFileClassifier>,
    thresholds: SummaryConfig,
}

#[derive(Debug, Default, Deserialize)]
struct ScanContent {
    files: Option<Vec<ScanFile>>,
    packages: Option<Vec<ScanPackage>>,
    summary: Option<ScanSummary>,
}

#[derive(Debug, Deserialize)]
struct ScanSummary {
    declared_license_expression: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScanPackage {
    declared_license_expression: Option<String>,
    declared_license_expression_spdx: Option<String>,
    extracted_license_statement: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ScanFile {
    path: String,
    #[serde(rename = "type")]
    kind: Option<String>,
    detected_license_expression: Option<String>,
    detected_license_expression_spdx: Option<String>,
    percentage_of_license_text: Option<f64>,
    license_detections: Option<Vec<LicenseDetection>>,
    copyrights: Option<Vec<CopyrightEntry>>,
    sha1: Option<String>,
    sha256: Option<String>,
}

impl ScanFile {
    fn is_file(&self) -> bool {
        self.kind.as_deref() == Some("file")
    }

    fn is_directory(&self) -> bool {
        self.kind.as_deref() == Some("directory")
    }

    fn detections(&self) -> &[LicenseDetection] {
        self.license_detections.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct LicenseDetection {
    license_expression: Option<String>,
    matches: Option<Vec<LicenseMatch>>,
}

#[derive(Debug, Deserialize)]
struct LicenseMatch {
    license_expression: Option<String>,
    score: Option<f64>,
}

/// Copyright entries changed field names across ScanCode releases.
#[derive(Debug, Deserialize)]
struct CopyrightEntry {
    copyright: Option<String>,
    statements: Option<Vec<String>>,
    value: Option<String>,
}

impl CopyrightEntry {
    fn texts(&self) -> Vec<String> {
        if let Some(copyright) = self.copyright.as_ref().filter(|c| !c.is_empty()) {
            return vec![copyright.clone()];
        }
        if let Some(statements) = &self.statements {
            return statements.clone();
        }
        self.value.iter().cloned().collect()
    }
}

type DeclaredReader = fn(&ScanCodeSummarizer, &ScanContent) -> Option<String>;

impl ScanCodeSummarizer {
    pub fn new(options: &SummaryOptions) -> Self {
        Self {
            normalizer: options.normalizer.clone(),
            classifier: options.classifier.clone(),
            thresholds: options.thresholds.clone(),
        }
    }

    fn tool_version(harvested: &Value) -> Option<&str> {
        ["/content/headers/0/tool_version", "/content/scancode_version"]
            .iter()
            .filter_map(|pointer| harvested.pointer(pointer).and_then(Value::as_str))
            .find(|v| !v.trim().is_empty())
    }

    fn described(harvested: &Value) -> Option<Described> {
        let raw = harvested
            .pointer("/_metadata/releaseDate")
            .and_then(Value::as_str)?;
        let release_date = extract_date(raw);
        if release_date.is_none() {
            debug!(raw, "ignoring unparseable release date");
        }
        release_date.map(|date| Described {
            release_date: Some(date),
        })
    }

    fn normalize(&self, raw: Option<&str>) -> Option<String> {
        self.normalizer.normalize(raw?)
    }

    fn declared_license(&self, content: &ScanContent) -> Option<String> {
        let readers: [DeclaredReader; 3] = [
            Self::read_summary_expression,
            Self::read_package_expression,
            Self::read_extracted_statement,
        ];
        readers
            .iter()
            .filter_map(|read| read(self, content))
            .find(|license| self.normalizer.is_valid_declared(license))
    }

    fn read_summary_expression(&self, content: &ScanContent) -> Option<String> {
        let summary = content.summary.as_ref()?;
        self.normalize(summary.declared_license_expression.as_deref())
            .filter(|e| !e.contains(NOASSERTION))
    }

    fn read_package_expression(&self, content: &ScanContent) -> Option<String> {
        let package = content.packages.as_ref()?.first()?;
        package
            .declared_license_expression_spdx
            .clone()
            .filter(|e| !e.is_empty())
            .or_else(|| self.normalize(package.declared_license_expression.as_deref()))
            .filter(|e| !e.contains(NOASSERTION))
    }

    fn read_extracted_statement(&self, content: &ScanContent) -> Option<String> {
        let package = content.packages.as_ref()?.first()?;
        self.normalize(package.extracted_license_statement.as_ref()?.as_str())
    }

    /// Files that decide the package license when metadata does not:
    /// files directly under a license root or at the top level. A package
    /// wrapped in a single top-level directory is looked at one level down.
    fn root_files<'a>(&self, coordinates: &Coordinates, files: &'a [ScanFile]) -> Vec<&'a ScanFile> {
        let mut roots = self.classifier.license_root_locations(coordinates);
        roots.push(String::new());
        let root_files = find_root_files(files, &roots);

        let wrapper = match root_files.as_slice() {
            [only] if only.is_directory() => Some(format!("{}/", only.path)),
            _ => None,
        };
        match wrapper {
            Some(prefix) => find_root_files(files, &[prefix]),
            None => root_files,
        }
    }

    fn declared_license_from_files(&self, coordinates: &Coordinates, files: &[ScanFile]) -> Option<String> {
        let root_files = self.root_files(coordinates, files);
        self.license_from_detections(&root_files)
    }

    /// Union of detections in files that are mostly license text.
    fn license_from_detections(&self, files: &[&ScanFile]) -> Option<String> {
        let mut licenses = Vec::new();
        let covered = files.iter().filter(|f| {
            f.percentage_of_license_text
                .is_some_and(|p| p >= self.thresholds.coverage_threshold)
        });
        for file in covered {
            for detection in file.detections() {
                if let Some(license) = self.normalize(detection.license_expression.as_deref()) {
                    push_unique(&mut licenses, license);
                }
            }
        }
        join_expressions(&licenses, self.normalizer.as_ref())
    }

    /// Union of detections in a conventionally named license file.
    fn license_by_file_name(&self, file: &ScanFile, coordinates: &Coordinates) -> Option<String> {
        if !self.classifier.is_license_file(&file.path, coordinates) {
            return None;
        }
        let mut licenses = Vec::new();
        for detection in file.detections() {
            if let Some(expression) = detection.license_expression.as_deref() {
                if let Some(license) = self.normalizer.normalize(expression) {
                    push_unique(&mut licenses, license);
                }
                continue;
            }
            let strong_matches = detection
                .matches
                .iter()
                .flatten()
                .filter(|m| m.score.is_some_and(|s| s >= self.thresholds.match_score_threshold));
            for m in strong_matches {
                if let Some(license) = self.normalize(m.license_expression.as_deref()) {
                    push_unique(&mut licenses, license);
                }
            }
        }
        join_expressions(&licenses, self.normalizer.as_ref())
    }

    fn summarize_file(&self, file: &ScanFile, coordinates: &Coordinates) -> FileEntry {
        let mut result = FileEntry::new(file.path.clone());

        result.license = file
            .detected_license_expression_spdx
            .clone()
            .filter(|e| !e.is_empty())
            .or_else(|| self.normalize(file.detected_license_expression.as_deref()));

        if self.license_from_detections(&[file]).is_some()
            || self.license_by_file_name(file, coordinates).is_some()
        {
            result.add_nature("license");
        }

        let copyrights = file.copyrights.iter().flatten().flat_map(CopyrightEntry::texts);
        result.attributions = non_empty(unique(copyrights));

        result.hashes = Hashes {
            sha1: file.sha1.clone(),
            sha256: file.sha256.clone(),
        };
        result
    }
}

fn find_root_files<'a>(files: &'a [ScanFile], roots: &[String]) -> Vec<&'a ScanFile> {
    files
        .iter()
        .filter(|file| {
            roots.iter().any(|root| {
                file.path
                    .strip_prefix(root.as_str())
                    .is_some_and(|rest| !rest.contains('/'))
            })
        })
        .collect()
}

impl Summarizer for ScanCodeSummarizer {
    fn tool(&self) -> ToolFamily {
        ToolFamily::ScanCode
    }

    fn summarize(&self, coordinates: &Coordinates, harvested: &Value) -> SummarizeResult<Definition> {
        let version = Self::tool_version(harvested).ok_or(SummarizeError::InvalidScanCode)?;
        debug!(%coordinates, version, "summarizing scancode output");

        let content = match harvested.get("content") {
            Some(raw) => ScanContent::deserialize(raw).map_err(|source| SummarizeError::Malformed {
                tool: "scancode",
                source,
            })?,
            None => ScanContent::default(),
        };
        let files = content.files.as_deref().unwrap_or_default();

        let mut result = Definition {
            described: Self::described(harvested),
            ..Default::default()
        };

        let declared = self
            .declared_license(&content)
            .or_else(|| self.declared_license_from_files(coordinates, files));
        if declared.is_some() {
            result.licensed = Some(Licensed { declared });
        }

        result.files = files
            .iter()
            .filter(|f| f.is_file())
            .map(|f| self.summarize_file(f, coordinates))
            .collect();

        Ok(result)
    }
}
