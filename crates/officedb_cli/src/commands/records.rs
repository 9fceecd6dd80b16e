//! Record listings of the current company.

use super::{open_ready, print_json, CliError, Format, IdTarget};
use chrono::NaiveDate;
use officedb_core::Database;
use serde::Serialize;
use std::path::Path;

/// Lists article previews.
pub fn articles(path: &Path, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_ready(path)?;
    let articles = db.articles()?;
    match format {
        Format::Json => print_json(&articles)?,
        Format::Text => {
            for a in &articles {
                println!(
                    "{:<10} {:<40} {:>16} {}",
                    a.article_id, a.description, a.price, a.unit
                );
            }
            println!("{} article(s)", articles.len());
        }
    }
    Ok(())
}

/// Lists customer previews.
pub fn customers(path: &Path, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_ready(path)?;
    let customers = db.customers()?;
    match format {
        Format::Json => print_json(&customers)?,
        Format::Text => {
            for c in &customers {
                println!("{:<10} {:<30} {}", c.customer_id, c.display_name, c.address);
            }
            println!("{} customer(s)", customers.len());
        }
    }
    Ok(())
}

/// Lists document previews, optionally limited to a type and date range.
///
/// Missing bounds are open.
pub fn documents(
    path: &Path,
    document_type: Option<&str>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_ready(path)?;
    let documents = db.documents_in_interval(
        from.unwrap_or(NaiveDate::MIN),
        to.unwrap_or(NaiveDate::MAX),
        document_type,
    )?;
    match format {
        Format::Json => print_json(&documents)?,
        Format::Text => {
            for d in &documents {
                let customer = d
                    .customer
                    .as_ref()
                    .map(|c| c.display_name.as_str())
                    .unwrap_or("-");
                println!(
                    "{:<14} {:<10} {} {}",
                    d.document_type, d.document_id, d.date, customer
                );
                for (key, value) in &d.extra {
                    println!("    {key}: {value}");
                }
            }
            println!("{} document(s)", documents.len());
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct NextId<'a> {
    scope: &'a str,
    next_id: u64,
}

/// Shows the next free id without reserving it.
pub fn next_id(
    path: &Path,
    target: IdTarget,
    document_type: Option<&str>,
    format: Format,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_ready(path)?;
    let (scope, next_id) = compute_next(&db, target, document_type)?;
    match format {
        Format::Json => print_json(&NextId {
            scope: &scope,
            next_id,
        })?,
        Format::Text => println!("{scope}: {next_id}"),
    }
    Ok(())
}

fn compute_next(
    db: &Database,
    target: IdTarget,
    document_type: Option<&str>,
) -> Result<(String, u64), Box<dyn std::error::Error>> {
    Ok(match target {
        IdTarget::Article => ("Articles".to_string(), db.next_article_id()?),
        IdTarget::Customer => ("Customers".to_string(), db.next_customer_id()?),
        IdTarget::Document => {
            let document_type = document_type.ok_or(CliError::MissingDocumentType)?;
            (
                format!("Documents/{document_type}"),
                db.next_document_id(document_type)?,
            )
        }
    })
}
