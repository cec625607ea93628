//! Read-only access to harvested tool output stored on disk.
//!
//! Layout, one JSON document per tool run:
//! `<root>/<type>/<provider>/<namespace|->/<name>/revision/<revision>/tool/<tool>/<version>.json`

use std::cmp::Ordering;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

use crate::models::{Coordinates, HarvestBundle};

/// One stored tool result for a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCoordinates {
    pub coordinates: Coordinates,
    pub tool: String,
    pub tool_version: String,
}

impl fmt::Display for ResultCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.coordinates, self.tool, self.tool_version)
    }
}

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn tool_dir(&self, coordinates: &Coordinates) -> PathBuf {
        self.root
            .join(&coordinates.kind)
            .join(&coordinates.provider)
            .join(coordinates.namespace.as_deref().unwrap_or("-"))
            .join(&coordinates.name)
            .join("revision")
            .join(&coordinates.revision)
            .join("tool")
    }

    fn result_path(&self, result: &ResultCoordinates) -> PathBuf {
        self.tool_dir(&result.coordinates)
            .join(&result.tool)
            .join(format!("{}.json", result.tool_version))
    }

    /// Every stored tool result for `coordinates`, sorted by tool then version.
    /// A package with nothing harvested yields an empty list.
    pub fn list_results(&self, coordinates: &Coordinates) -> Result<Vec<ResultCoordinates>> {
        let tool_dir = self.tool_dir(coordinates);
        let Some(tools) = read_dir_if_exists(&tool_dir)? else {
            return Ok(Vec::new());
        };

        let mut results = Vec::new();
        for tool in tools {
            let tool = tool?;
            if !tool.file_type()?.is_dir() {
                continue;
            }
            let tool_name = tool.file_name().to_string_lossy().into_owned();
            for entry in std::fs::read_dir(tool.path())? {
                let path = entry?.path();
                if path.extension().and_then(|e| e.to_str()) != Some("json") {
                    continue;
                }
                if let Some(version) = path.file_stem().and_then(|s| s.to_str()) {
                    results.push(ResultCoordinates {
                        coordinates: coordinates.clone(),
                        tool: tool_name.clone(),
                        tool_version: version.to_string(),
                    });
                }
            }
        }

        results.sort_by(|a, b| {
            a.tool
                .cmp(&b.tool)
                .then_with(|| compare_versions(&a.tool_version, &b.tool_version))
        });
        Ok(results)
    }

    /// Load one stored result.
    pub fn get(&self, result: &ResultCoordinates) -> Result<Value> {
        let path = self.result_path(result);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    /// The newest version of every tool's output, keyed by tool name.
    pub fn latest_results(&self, coordinates: &Coordinates) -> Result<HarvestBundle> {
        let mut latest: Vec<ResultCoordinates> = Vec::new();
        for result in self.list_results(coordinates)? {
            // Sorted by tool then version, so the last one per tool wins.
            match latest.last_mut() {
                Some(prev) if prev.tool == result.tool => *prev = result,
                _ => latest.push(result),
            }
        }

        let mut bundle = HarvestBundle::new();
        for result in latest {
            debug!(%result, "loading harvested output");
            let value = self.get(&result)?;
            bundle.insert(result.tool, value);
        }
        Ok(bundle)
    }
}

fn read_dir_if_exists(path: &Path) -> Result<Option<std::fs::ReadDir>> {
    match std::fs::read_dir(path) {
        Ok(entries) => Ok(Some(entries)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("listing {}", path.display())),
    }
}

/// Compare dotted versions numerically where both parts are numbers.
fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ord = match (l.parse::<u64>(), r.parse::<u64>()) {
                    (Ok(l), Ok(r)) => l.cmp(&r),
                    _ => l.cmp(r),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_result(root: &Path, rel: &str, value: Value) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, value.to_string()).unwrap();
    }

    fn coords(revision: &str) -> Coordinates {
        Coordinates::new("npm", "npmjs", None, "test", revision)
    }

    fn store() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write_result(
            root,
            "npm/npmjs/-/test/revision/1.0/tool/testtool/2.0.json",
            json!({ "_metadata": { "coordinates": "npm/npmjs/-/test/1.0" } }),
        );
        for (tool, version) in [("testtool0", "1.0"), ("testtool1", "2.0"), ("testtool1", "10.0"), ("testtool1", "9.1")] {
            write_result(
                root,
                &format!("npm/npmjs/-/test/revision/2.0/tool/{tool}/{version}.json"),
                json!({ "version": version }),
            );
        }
        std::fs::create_dir_all(root.join("npm/npmjs/-/test/revision/0.0")).unwrap();
        let store = FileStore::new(root);
        (dir, store)
    }

    #[test]
    fn test_unknown_coordinates_have_no_results() {
        let (_dir, store) = store();
        let bogus = Coordinates::new("npm", "npmjs", None, "bogus", "0.0");
        assert!(store.list_results(&bogus).unwrap().is_empty());
        assert!(store.list_results(&coords("0.0")).unwrap().is_empty());
    }

    #[test]
    fn test_single_result() {
        let (_dir, store) = store();
        let results = store.list_results(&coords("1.0")).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].to_string(), "npm/npmjs/-/test/1.0/testtool/2.0");
    }

    #[test]
    fn test_multiple_results_sorted() {
        let (_dir, store) = store();
        let results: Vec<String> = store
            .list_results(&coords("2.0"))
            .unwrap()
            .iter()
            .map(|r| format!("{}@{}", r.tool, r.tool_version))
            .collect();
        assert_eq!(
            results,
            vec!["testtool0@1.0", "testtool1@2.0", "testtool1@9.1", "testtool1@10.0"]
        );
    }

    #[test]
    fn test_latest_results_picks_highest_version() {
        let (_dir, store) = store();
        let bundle = store.latest_results(&coords("2.0")).unwrap();
        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle["testtool0"]["version"], "1.0");
        assert_eq!(bundle["testtool1"]["version"], "10.0");
    }

    #[test]
    fn test_compare_versions() {
        assert_eq!(compare_versions("3.10.0", "3.9.1"), Ordering::Greater);
        assert_eq!(compare_versions("1.0", "1.0.1"), Ordering::Less);
        assert_eq!(compare_versions("2.0", "2.0"), Ordering::Equal);
    }
}
