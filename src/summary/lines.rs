//! Parsers for line-oriented scanner reports.
//!
//! Each report format has its own parser so a new report version can be added
//! next to the existing ones without touching them.

use regex::Regex;

/// One file mentioned by a report line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub path: String,
    /// Raw, un-normalized license text.
    pub label: Option<String>,
}

/// What a parser made of one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Entry(ReportLine),
    /// Blank, or a line of a kind this report does not consume.
    Ignored,
    /// A line of the consumed kind whose shape is broken.
    Malformed,
}

/// FOSSology monk: `found full match between "<path>" and "<label>"`.
///
/// Harvested output sometimes carries the quotes backslash-escaped (`\"`).
/// Diff and partial matches are ignored.
pub struct FullMatchParser {
    re: Regex,
}

impl FullMatchParser {
    const PREFIX: &'static str = "found full match";

    pub fn new() -> Result<Self, regex::Error> {
        let re = Regex::new(r#"^found full match between \\?"(.+?)\\?" and \\?"(.+?)\\?""#)?;
        Ok(Self { re })
    }

    pub fn parse(&self, line: &str) -> Parsed {
        let line = line.trim();
        if !line.starts_with(Self::PREFIX) {
            return Parsed::Ignored;
        }
        match self.re.captures(line) {
            Some(caps) => Parsed::Entry(ReportLine {
                path: caps[1].to_string(),
                label: Some(caps[2].to_string()),
            }),
            None => Parsed::Malformed,
        }
    }
}

/// FOSSology nomos: `File <path> contains license(s) <expression>`.
///
/// The license clause is optional.
pub struct LicenseScanParser {
    path_re: Regex,
    license_re: Regex,
}

impl LicenseScanParser {
    const PREFIX: &'static str = "File ";

    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            path_re: Regex::new(r"^File (.+?) contains")?,
            license_re: Regex::new(r"license\(s\) (.+?)\s*$")?,
        })
    }

    pub fn parse(&self, line: &str) -> Parsed {
        let line = line.trim();
        if !line.starts_with(Self::PREFIX) {
            return Parsed::Ignored;
        }
        let Some(path) = self.path_re.captures(line).map(|c| c[1].to_string()) else {
            return Parsed::Malformed;
        };
        let label = self.license_re.captures(line).map(|c| c[1].to_string());
        Parsed::Entry(ReportLine { path, label })
    }
}
