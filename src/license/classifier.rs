use std::collections::HashMap;

use crate::config::LicenseFilesConfig;
use crate::models::Coordinates;

use super::LicenseFileClassifier;

/// Base names that conventionally hold license text.
const LICENSE_FILE_NAMES: &[&str] = &["license", "licence", "copying", "copyright", "notice"];
const LICENSE_FILE_SUFFIXES: &[&str] = &["", ".txt", ".md", ".html"];

/// Default [`LicenseFileClassifier`]: file-name conventions plus per-type
/// root locations (`package/` for npm, `META-INF/` for maven, ...).
#[derive(Debug, Clone, Default)]
pub struct NameClassifier {
    extra_names: Vec<String>,
    /// Per coordinates type; replaces the built-in locations for that type.
    locations: HashMap<String, Vec<String>>,
}

impl NameClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &LicenseFilesConfig) -> Self {
        Self {
            extra_names: config
                .extra_names
                .iter()
                .map(|n| n.to_lowercase())
                .collect(),
            locations: config.locations.clone(),
        }
    }

    fn builtin_locations(coordinates: &Coordinates) -> Vec<String> {
        match coordinates.kind.as_str() {
            "npm" => vec!["package/".to_string()],
            "maven" | "sourcearchive" => vec!["META-INF/".to_string()],
            "pypi" => vec![format!("{}-{}/", coordinates.name, coordinates.revision)],
            "go" => {
                // Go namespaces are stored URL-encoded (`github.com%2fuser`).
                let namespace = coordinates
                    .namespace
                    .as_deref()
                    .map(|ns| ns.replace("%2f", "/").replace("%2F", "/"));
                match namespace {
                    Some(ns) => vec![format!("{}/{}@{}/", ns, coordinates.name, coordinates.revision)],
                    None => vec![format!("{}@{}/", coordinates.name, coordinates.revision)],
                }
            }
            _ => Vec::new(),
        }
    }
}

impl LicenseFileClassifier for NameClassifier {
    fn is_license_file(&self, path: &str, coordinates: &Coordinates) -> bool {
        if path.is_empty() {
            return false;
        }
        let lower = path.to_lowercase();

        // Nested files only count when they sit directly under a license root.
        if let Some((parent, file_name)) = lower.rsplit_once('/') {
            let parent = format!("{parent}/");
            let under_root = self
                .license_root_locations(coordinates)
                .iter()
                .any(|root| root.to_lowercase() == parent);
            if !under_root {
                return false;
            }
            return self.matches_name(file_name);
        }

        self.matches_name(&lower)
    }

    fn license_root_locations(&self, coordinates: &Coordinates) -> Vec<String> {
        match self.locations.get(&coordinates.kind) {
            Some(configured) => configured.clone(),
            None => Self::builtin_locations(coordinates),
        }
    }
}

impl NameClassifier {
    fn matches_name(&self, file_name: &str) -> bool {
        LICENSE_FILE_NAMES
            .iter()
            .copied()
            .chain(self.extra_names.iter().map(String::as_str))
            .any(|prefix| {
                LICENSE_FILE_SUFFIXES
                    .iter()
                    .any(|suffix| file_name == format!("{prefix}{suffix}"))
            })
    }
}
