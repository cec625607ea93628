//! `harvest-summarizer` reconciles raw license scanner output into one
//! canonical [`Definition`](models::Definition) per package.
//!
//! # Flow
//! 1. Load harvested tool output for some [`Coordinates`](models::Coordinates)
//!    ([`harvest::FileStore`], or any caller-supplied JSON).
//! 2. Pick the [`Summarizer`](summary::Summarizer) for each tool
//!    ([`summary::summarizer_for`]).
//! 3. Summarize: parse the tool's report, resolve the declared license, build
//!    per-file entries, and merge partial results ([`summary::merge_definitions`]).
//!
//! License normalization and license-file classification are injected through
//! [`license::LicenseNormalizer`] and [`license::LicenseFileClassifier`].

pub mod config;
pub mod detector;
pub mod error;
pub mod harvest;
pub mod license;
pub mod models;
pub mod report;
pub mod summary;

pub use error::{SummarizeError, SummarizeResult};
pub use models::{Coordinates, Definition, FileEntry, HarvestBundle};
pub use summary::{summarizer_for, Summarizer, SummaryOptions, ToolFamily};
