use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Root configuration structure, deserialized from `.harvest-summarizer/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Thresholds used by the structured-scanner summarizer.
    #[serde(default)]
    pub summary: SummaryConfig,
    /// License-file naming and root-location overrides.
    #[serde(default)]
    pub license_files: LicenseFilesConfig,
}

/// Evidence thresholds.
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryConfig {
    /// Minimum `percentage_of_license_text` for a file to count as license text.
    /// Defaults to `80`.
    #[serde(default = "default_coverage_threshold")]
    pub coverage_threshold: f64,
    /// Minimum per-match score for a license-named file whose detection has no
    /// overall expression. Defaults to `90`.
    #[serde(default = "default_match_score_threshold")]
    pub match_score_threshold: f64,
}

fn default_coverage_threshold() -> f64 {
    80.0
}

fn default_match_score_threshold() -> f64 {
    90.0
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            coverage_threshold: default_coverage_threshold(),
            match_score_threshold: default_match_score_threshold(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LicenseFilesConfig {
    /// Extra base names treated like `LICENSE` (case-insensitive).
    #[serde(default)]
    pub extra_names: Vec<String>,
    /// License root locations keyed by coordinates type (e.g. `npm = ["package/"]`).
    /// An entry replaces the built-in locations for that type.
    #[serde(default)]
    pub locations: HashMap<String, Vec<String>>,
}

/// Load the configuration, searching in order:
///
/// 1. `config_override`: path passed via `--config`
/// 2. `<project_path>/.harvest-summarizer/config.toml`
/// 3. `~/.config/harvest-summarizer/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".harvest-summarizer").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("harvest-summarizer")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.summary.coverage_threshold, 80.0);
        assert_eq!(cfg.summary.match_score_threshold, 90.0);
        assert!(cfg.license_files.extra_names.is_empty());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "[summary]").unwrap();
        writeln!(f, "coverage_threshold = 75.5").unwrap();
        writeln!(f, "[license_files]").unwrap();
        writeln!(f, "extra_names = [\"UNLICENSE\"]").unwrap();
        writeln!(f, "[license_files.locations]").unwrap();
        writeln!(f, "gem = [\"gem/\"]").unwrap();

        let cfg = load_config(Path::new("."), Some(f.path())).unwrap();
        assert_eq!(cfg.summary.coverage_threshold, 75.5);
        assert_eq!(cfg.summary.match_score_threshold, 90.0);
        assert_eq!(cfg.license_files.extra_names, vec!["UNLICENSE"]);
        assert_eq!(cfg.license_files.locations["gem"], vec!["gem/"]);
    }

    #[test]
    fn test_project_config_is_found() {
        let dir = TempDir::new().unwrap();
        let cfg_dir = dir.path().join(".harvest-summarizer");
        std::fs::create_dir_all(&cfg_dir).unwrap();
        std::fs::write(
            cfg_dir.join("config.toml"),
            "[summary]\nmatch_score_threshold = 95\n",
        )
        .unwrap();

        let cfg = load_config(dir.path(), None).unwrap();
        assert_eq!(cfg.summary.match_score_threshold, 95.0);
    }

    #[test]
    fn test_invalid_override_is_an_error() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "[summary").unwrap();
        assert!(load_config(Path::new("."), Some(f.path())).is_err());
    }
}
