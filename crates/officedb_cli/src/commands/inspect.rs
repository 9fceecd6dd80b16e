//! Inspect command implementation.

use super::{open_ready, print_json, Format};
use officedb_core::{CollectionInfo, Database};
use serde::Serialize;
use std::path::Path;

/// Data root inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Data root path.
    pub path: String,
    /// Current company id.
    pub company: String,
    /// Registered extension kinds.
    pub extension_kinds: Vec<String>,
    /// Open collections.
    pub collections: Vec<CollectionStats>,
    /// Total size of all collection files in bytes.
    pub total_size: u64,
}

/// Statistics for a single collection.
#[derive(Debug, Serialize)]
pub struct CollectionStats {
    /// Collection name.
    pub name: String,
    /// File location.
    pub location: String,
    /// Elements directly below the root.
    pub entries: usize,
    /// File size in bytes.
    pub size: u64,
}

impl From<CollectionInfo> for CollectionStats {
    fn from(info: CollectionInfo) -> Self {
        let size = std::fs::metadata(&info.location)
            .map(|m| m.len())
            .unwrap_or(0);
        Self {
            name: info.name,
            location: info.location,
            entries: info.entries,
            size,
        }
    }
}

/// Runs the inspect command.
pub fn run(path: &Path, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_ready(path)?;
    let result = inspect(path, &db)?;

    match format {
        Format::Json => print_json(&result)?,
        Format::Text => print_text_output(&result),
    }
    Ok(())
}

fn inspect(path: &Path, db: &Database) -> Result<InspectResult, Box<dyn std::error::Error>> {
    let company = db
        .current_company()
        .map(|c| c.company_id)
        .unwrap_or_default();
    let collections: Vec<CollectionStats> = db
        .collections()?
        .into_iter()
        .map(CollectionStats::from)
        .collect();
    Ok(InspectResult {
        path: path.display().to_string(),
        company,
        extension_kinds: db
            .extension_kinds()
            .iter()
            .map(|k| k.element_name().to_string())
            .collect(),
        total_size: collections.iter().map(|c| c.size).sum(),
        collections,
    })
}

fn print_text_output(result: &InspectResult) {
    println!("officedb Data Root Inspection");
    println!("=============================");
    println!();
    println!("Path:    {}", result.path);
    println!("Company: {}", result.company);
    println!();
    println!("Collections:");
    for col in &result.collections {
        println!(
            "  {:<20} {:>6} entries  {:>10}  {}",
            col.name,
            col.entries,
            format_size(col.size),
            col.location
        );
    }
    println!();
    println!("Total size: {}", format_size(result.total_size));

    if !result.extension_kinds.is_empty() {
        println!();
        println!("Extension kinds: {}", result.extension_kinds.join(", "));
    }
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use officedb_core::{Article, CompanyInfo};
    use tempfile::tempdir;

    #[test]
    fn inspect_counts_entries() {
        let dir = tempdir().unwrap();
        {
            let db = Database::open(dir.path()).unwrap();
            let acme = CompanyInfo::new("ACME", "ACME Corp.");
            db.add_company(&acme).unwrap();
            db.switch_company(&acme).unwrap();
            db.save_articles(&[Article::new("1", "a"), Article::new("2", "b")])
                .unwrap();
        }

        let db = open_ready(dir.path()).unwrap();
        let result = inspect(dir.path(), &db).unwrap();
        assert_eq!(result.company, "ACME");
        let articles = result
            .collections
            .iter()
            .find(|c| c.name == "Articles")
            .unwrap();
        assert_eq!(articles.entries, 2);
        assert!(articles.size > 0);
        assert_eq!(
            result.total_size,
            result.collections.iter().map(|c| c.size).sum::<u64>()
        );
    }

    #[test]
    fn sizes() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
