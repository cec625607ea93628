use std::collections::BTreeMap;

use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::models::{Coordinates, Definition, FileEntry};

/// Render one colored section per tool.
///
/// Without `verbose`, files that carry nothing beyond a path and hashes are
/// left out of the table.
pub fn render(coordinates: &Coordinates, definitions: &BTreeMap<String, Definition>, verbose: bool, quiet: bool) {
    if quiet {
        for (tool, def) in definitions {
            println!(
                "{}  declared: {}  files: {}",
                tool,
                declared_label(def),
                def.files.len()
            );
        }
        return;
    }

    println!(
        "\n {} v{}",
        "harvest-summarizer".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Package: {}\n", coordinates);

    for (tool, def) in definitions {
        let released = def
            .release_date()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(" {} {}", "[TOOL]".cyan().bold(), tool.bold());
        println!("   Declared license : {}", declared_label(def));
        println!("   Release date     : {}", released);
        println!("   Files            : {}\n", def.files.len());

        let shown: Vec<&FileEntry> = def
            .files
            .iter()
            .filter(|f| verbose || has_evidence(f))
            .collect();
        if !shown.is_empty() {
            render_table(&shown);
            println!();
        }
    }
}

fn declared_label(def: &Definition) -> ColoredString {
    match def.declared() {
        Some(license) => license.green(),
        None => "none".dimmed(),
    }
}

fn has_evidence(file: &FileEntry) -> bool {
    file.license.is_some() || file.attributions.is_some() || file.natures.is_some()
}

fn render_table(files: &[&FileEntry]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Path").add_attribute(Attribute::Bold),
            Cell::new("License").add_attribute(Attribute::Bold),
            Cell::new("Natures").add_attribute(Attribute::Bold),
            Cell::new("Attributions").add_attribute(Attribute::Bold),
            Cell::new("SHA-1").add_attribute(Attribute::Bold),
        ]);

    for file in files {
        let (license, license_color) = match &file.license {
            Some(l) => (l.as_str(), Color::Green),
            None => ("-", Color::DarkGrey),
        };
        let natures = file
            .natures
            .as_ref()
            .map(|n| n.join(", "))
            .unwrap_or_default();
        let attributions = file
            .attributions
            .as_ref()
            .map(|a| a.join("\n"))
            .unwrap_or_default();

        table.add_row(vec![
            Cell::new(&file.path),
            Cell::new(license).fg(license_color),
            Cell::new(natures).fg(Color::Cyan),
            Cell::new(attributions),
            Cell::new(file.hashes.sha1.as_deref().unwrap_or("")).fg(Color::DarkGrey),
        ]);
    }

    println!("{}", table);
}
