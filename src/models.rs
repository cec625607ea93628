use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifies one package version: `type/provider/namespace/name/revision`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(rename = "type")]
    pub kind: String,
    pub provider: String,
    pub namespace: Option<String>,
    pub name: String,
    pub revision: String,
}

impl Coordinates {
    pub fn new(
        kind: &str,
        provider: &str,
        namespace: Option<&str>,
        name: &str,
        revision: &str,
    ) -> Self {
        Self {
            kind: kind.to_string(),
            provider: provider.to_string(),
            namespace: namespace.map(str::to_string),
            name: name.to_string(),
            revision: revision.to_string(),
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}/{}",
            self.kind,
            self.provider,
            self.namespace.as_deref().unwrap_or("-"),
            self.name,
            self.revision
        )
    }
}

impl FromStr for Coordinates {
    type Err = anyhow::Error;

    /// Parse `npm/npmjs/-/lodash/4.17.21`. A `-` namespace means "none".
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().trim_matches('/').splitn(5, '/').collect();
        if parts.len() != 5 || parts.iter().any(|p| p.is_empty()) {
            bail!("invalid coordinates '{s}': expected type/provider/namespace/name/revision");
        }
        let namespace = match parts[2] {
            "-" => None,
            ns => Some(ns),
        };
        Ok(Self::new(parts[0], parts[1], namespace, parts[3], parts[4]))
    }
}

/// Raw harvested output keyed by tool identifier (`scancode`, `fossology`, ...).
pub type HarvestBundle = BTreeMap<String, Value>;

/// The canonical per-package summary produced by a summarizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub described: Option<Described>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub licensed: Option<Licensed>,
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

impl Definition {
    /// Shorthand for `licensed.declared`.
    pub fn declared(&self) -> Option<&str> {
        self.licensed.as_ref()?.declared.as_deref()
    }

    /// Shorthand for `described.releaseDate`.
    pub fn release_date(&self) -> Option<NaiveDate> {
        self.described.as_ref()?.release_date
    }

    pub fn file(&self, path: &str) -> Option<&FileEntry> {
        self.files.iter().find(|f| f.path == path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Described {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Licensed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared: Option<String>,
}

/// What one summarizer learned about a single file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natures: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Hashes::is_empty")]
    pub hashes: Hashes,
}

impl FileEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_license(path: impl Into<String>, license: Option<String>) -> Self {
        Self {
            license,
            ..Self::new(path)
        }
    }

    /// Add a nature tag unless it is already present.
    pub fn add_nature(&mut self, nature: &str) {
        let natures = self.natures.get_or_insert_with(Vec::new);
        if !natures.iter().any(|n| n == nature) {
            natures.push(nature.to_string());
        }
    }

    pub fn has_nature(&self, nature: &str) -> bool {
        self.natures
            .as_ref()
            .is_some_and(|n| n.iter().any(|x| x == nature))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hashes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
}

impl Hashes {
    pub fn is_empty(&self) -> bool {
        self.sha1.is_none() && self.sha256.is_none()
    }
}
