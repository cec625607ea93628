//! Report renderers for summarized definitions.
//!
//! - [`terminal`]: colored per-tool summary with a file table; respects `--verbose` / `--quiet`.
//!
//! JSON output needs no renderer: definitions serialize directly with `serde_json`.

pub mod terminal;
