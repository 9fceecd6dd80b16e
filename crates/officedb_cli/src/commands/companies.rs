//! Company listing and administration.

use super::{open_exclusive, open_shared, print_json, CliError, Format};
use officedb_core::CompanyInfo;
use std::path::Path;

/// Lists every readable company, marking the current one.
pub fn list(path: &Path, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_shared(path)?;
    let companies = db.list_companies()?;
    let current = db.current_company().map(|c| c.company_id);

    match format {
        Format::Json => print_json(&companies)?,
        Format::Text => {
            if companies.is_empty() {
                println!("No companies at {}", path.display());
            }
            for company in &companies {
                let marker = if current.as_deref() == Some(company.company_id.as_str()) {
                    '*'
                } else {
                    ' '
                };
                println!("{marker} {:<16} {}", company.company_id, company.name);
                for (key, value) in &company.metadata {
                    println!("    {key}: {value}");
                }
            }
        }
    }
    Ok(())
}

/// Creates a company directory.
pub fn add(
    path: &Path,
    id: &str,
    name: &str,
    metadata: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    let info = parse_metadata(CompanyInfo::new(id, name), metadata)?;
    let db = open_exclusive(path)?;
    db.add_company(&info)?;
    println!("Added company {id}");
    Ok(())
}

/// Makes an existing company current.
pub fn switch(path: &Path, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_exclusive(path)?;
    let info = db
        .list_companies()?
        .into_iter()
        .find(|c| c.company_id == id)
        .ok_or_else(|| CliError::UnknownCompany(id.to_string()))?;
    db.switch_company(&info)?;
    println!("Current company: {} ({})", info.company_id, info.name);
    Ok(())
}

fn parse_metadata(mut info: CompanyInfo, entries: &[String]) -> Result<CompanyInfo, CliError> {
    for entry in entries {
        let (key, value) = entry
            .split_once('=')
            .filter(|(key, _)| !key.trim().is_empty())
            .ok_or_else(|| CliError::InvalidMetadata(entry.clone()))?;
        info = info.with_metadata(key.trim(), value);
    }
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn metadata_pairs() {
        let info = parse_metadata(
            CompanyInfo::new("A", "Alpha"),
            &["vat=DE1".to_string(), "note=a=b".to_string()],
        )
        .unwrap();
        assert_eq!(info.metadata["vat"], "DE1");
        assert_eq!(info.metadata["note"], "a=b");

        assert!(parse_metadata(CompanyInfo::new("A", "Alpha"), &["novalue".into()]).is_err());
        assert!(parse_metadata(CompanyInfo::new("A", "Alpha"), &["=x".into()]).is_err());
    }

    #[test]
    fn add_then_switch() {
        let dir = tempdir().unwrap();
        add(dir.path(), "ACME", "ACME Corp.", &[]).unwrap();
        switch(dir.path(), "ACME").unwrap();

        let db = open_shared(dir.path()).unwrap();
        assert_eq!(db.current_company().unwrap().name, "ACME Corp.");
    }

    #[test]
    fn switch_to_unknown_company_fails() {
        let dir = tempdir().unwrap();
        add(dir.path(), "ACME", "ACME Corp.", &[]).unwrap();
        let err = switch(dir.path(), "NOPE").unwrap_err();
        assert!(err.to_string().contains("no such company"));
    }
}
