//! Error types for summarization.

use thiserror::Error;

/// Errors a [`Summarizer`](crate::summary::Summarizer) can surface.
///
/// A missing tool section is never an error; it simply contributes no evidence.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// Neither `headers[0].tool_version` nor `scancode_version` is present.
    #[error("not valid ScanCode data: no tool version marker")]
    InvalidScanCode,

    /// The tool section exists but cannot be read in the expected shape.
    #[error("malformed {tool} output: {source}")]
    Malformed {
        tool: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A report-line pattern failed to compile.
    #[error("invalid report pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result type for summarization.
pub type SummarizeResult<T> = Result<T, SummarizeError>;
