use std::sync::Arc;

use harvest_summarizer::license::{LicenseFileClassifier, LicenseNormalizer, SpdxNormalizer};
use harvest_summarizer::summary::merge_definitions;
use harvest_summarizer::{
    summarizer_for, Coordinates, Definition, FileEntry, SummarizeError, SummaryOptions, ToolFamily,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn coordinates() -> Coordinates {
    Coordinates::new("npm", "npmjs", None, "demo", "1.0.0")
}

fn summarize(tool: ToolFamily, harvested: &Value) -> Result<Definition, SummarizeError> {
    summarize_with(&SummaryOptions::default(), tool, harvested)
}

fn summarize_with(
    options: &SummaryOptions,
    tool: ToolFamily,
    harvested: &Value,
) -> Result<Definition, SummarizeError> {
    summarizer_for(tool, options)?.summarize(&coordinates(), harvested)
}

fn assert_attributions_invariant(def: &Definition) {
    for file in &def.files {
        if let Some(attributions) = &file.attributions {
            assert!(!attributions.is_empty(), "{} has empty attributions", file.path);
            let mut seen = attributions.clone();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), attributions.len(), "{} has duplicates", file.path);
        }
    }
}

#[test]
fn unrecognized_bundle_behaviour_per_tool() {
    let empty = json!({ "licensee": { "output": {} } });

    let def = summarize(ToolFamily::Fossology, &empty).unwrap();
    assert_eq!(serde_json::to_value(&def).unwrap(), json!({ "files": [] }));

    let err = summarize(ToolFamily::ScanCode, &empty).unwrap_err();
    assert!(matches!(err, SummarizeError::InvalidScanCode));
}

#[test]
fn fossology_full_definition() {
    let harvested = json!({
        "_metadata": { "type": "fossology" },
        "monk": { "output": { "content":
            "found full match between \\\"LICENSE\\\" and \\\"MIT\\\"\nfound full match between \"src/a.c\" and \"GPL-2.0\"" } },
        "nomos": { "output": { "content":
            "File src/a.c contains license(s) LGPL-2.1\nFile src/b.c contains license(s) No_license_found\nFile README contains" } },
        "copyright": { "output": { "content": [
            { "path": "src/a.c", "output": { "results": [
                { "type": "statement", "content": "Copyright 2019 Alice" },
                { "type": "statement", "content": "Copyright 2019 Alice" },
                { "type": "statement", "content": "Copyright 2020 Bob" }
            ] } }
        ] } }
    });

    let def = summarize(ToolFamily::Fossology, &harvested).unwrap();
    assert_eq!(
        serde_json::to_value(&def).unwrap(),
        json!({
            "files": [
                { "path": "LICENSE", "license": "MIT" },
                {
                    "path": "src/a.c",
                    "license": "LGPL-2.1",
                    "attributions": ["Copyright 2019 Alice", "Copyright 2020 Bob"]
                },
                { "path": "src/b.c" },
                { "path": "README" }
            ]
        })
    );
    assert_attributions_invariant(&def);
}

#[test]
fn scancode_full_definition() {
    let harvested = json!({
        "_metadata": { "releaseDate": " 2018-11-02T00:00:00Z " },
        "content": {
            "headers": [{ "tool_name": "scancode-toolkit", "tool_version": "32.1.0" }],
            "summary": { "declared_license_expression": "mit AND noassertion" },
            "packages": [{ "declared_license_expression": "apache-2.0" }],
            "files": [
                { "path": "package", "type": "directory" },
                {
                    "path": "package/LICENSE",
                    "type": "file",
                    "sha1": "abc",
                    "detected_license_expression": "apache-2.0",
                    "detected_license_expression_spdx": "Apache-2.0",
                    "percentage_of_license_text": 100.0,
                    "license_detections": [{ "license_expression": "apache-2.0" }],
                    "copyrights": [{ "copyright": "Copyright Acme" }, { "copyright": "Copyright Acme" }]
                },
                { "path": "package/index.js", "type": "file", "sha256": "def" }
            ]
        }
    });

    let def = summarize(ToolFamily::ScanCode, &harvested).unwrap();
    assert_eq!(
        serde_json::to_value(&def).unwrap(),
        json!({
            "described": { "releaseDate": "2018-11-02" },
            "licensed": { "declared": "Apache-2.0" },
            "files": [
                {
                    "path": "package/LICENSE",
                    "license": "Apache-2.0",
                    "natures": ["license"],
                    "attributions": ["Copyright Acme"],
                    "hashes": { "sha1": "abc" }
                },
                { "path": "package/index.js", "hashes": { "sha256": "def" } }
            ]
        })
    );
    assert_attributions_invariant(&def);
}

#[test]
fn merging_two_tools_keeps_paths_unique() {
    let fossology = summarize(
        ToolFamily::Fossology,
        &json!({ "nomos": { "output": { "content": "File a.c contains license(s) MIT\nFile b.c contains" } } }),
    )
    .unwrap();
    let scancode = summarize(
        ToolFamily::ScanCode,
        &json!({ "content": { "scancode_version": "31.2.1", "files": [
            { "path": "b.c", "type": "file", "detected_license_expression_spdx": "ISC" },
            { "path": "c.c", "type": "file" }
        ] } }),
    )
    .unwrap();

    let mut merged = Definition::default();
    merge_definitions(&mut merged, fossology);
    merge_definitions(&mut merged, scancode);

    let paths: Vec<&str> = merged.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["a.c", "b.c", "c.c"]);
    assert_eq!(merged.file("b.c"), Some(&FileEntry::with_license("b.c", Some("ISC".into()))));
}

/// Normalizer that only knows upper-case MIT, to show collaborators are injected.
struct StrictNormalizer;

impl LicenseNormalizer for StrictNormalizer {
    fn normalize(&self, raw: &str) -> Option<String> {
        (raw.trim() == "MIT").then(|| "MIT".to_string())
    }
}

/// Classifier that treats every file as a license file and has no roots.
struct EverythingIsALicense;

impl LicenseFileClassifier for EverythingIsALicense {
    fn is_license_file(&self, _path: &str, _coordinates: &Coordinates) -> bool {
        true
    }

    fn license_root_locations(&self, _coordinates: &Coordinates) -> Vec<String> {
        Vec::new()
    }
}

#[test]
fn injected_collaborators_are_used() {
    let options = SummaryOptions {
        normalizer: Arc::new(StrictNormalizer),
        classifier: Arc::new(EverythingIsALicense),
        ..SummaryOptions::default()
    };
    let harvested = json!({ "content": { "scancode_version": "31.0.0", "files": [
        {
            "path": "src/x.js", "type": "file",
            "detected_license_expression": "MIT",
            "license_detections": [{ "license_expression": "MIT" }]
        },
        {
            "path": "src/y.js", "type": "file",
            "detected_license_expression": "mit",
            "license_detections": [{ "license_expression": "mit" }]
        }
    ] } });

    let def = summarize_with(&options, ToolFamily::ScanCode, &harvested).unwrap();
    let x = def.file("src/x.js").unwrap();
    assert_eq!(x.license.as_deref(), Some("MIT"));
    assert!(x.has_nature("license"));
    let y = def.file("src/y.js").unwrap();
    assert_eq!(y.license, None);
    assert_eq!(y.natures, None);

    assert_eq!(SpdxNormalizer.normalize("mit").as_deref(), Some("MIT"));
}
