//! Multi-threaded access to one database handle.

use officedb_codec::from_xml;
use officedb_core::{Article, CompanyInfo, Config, CoreError, Customer, Database, StoreState};
use std::collections::BTreeSet;
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::tempdir;

fn ready(root: &std::path::Path) -> Database {
    let db = Database::new(root, Config::default());
    db.connect().unwrap();
    let acme = CompanyInfo::new("ACME", "ACME Corp.");
    db.add_company(&acme).unwrap();
    db.switch_company(&acme).unwrap();
    db
}

#[test]
fn concurrent_saves_to_one_collection_are_all_persisted() {
    let temp = tempdir().unwrap();
    let db = ready(temp.path());

    thread::scope(|s| {
        s.spawn(|| db.save_article(&Article::new("1000", "Left")).unwrap());
        s.spawn(|| db.save_article(&Article::new("1001", "Right")).unwrap());
    });

    let bytes = fs::read(temp.path().join("ACME").join("Articles.xml")).unwrap();
    let root = from_xml(&bytes).unwrap();
    let ids: BTreeSet<_> = root
        .children()
        .iter()
        .filter_map(|a| a.child_text("ArticleID"))
        .collect();
    assert_eq!(ids, BTreeSet::from(["1000", "1001"]));
}

#[test]
fn writers_on_different_collections_do_not_interfere() {
    let temp = tempdir().unwrap();
    let db = ready(temp.path());

    thread::scope(|s| {
        s.spawn(|| {
            for i in 0..25 {
                db.save_article(&Article::new((1000 + i).to_string(), "A"))
                    .unwrap();
            }
        });
        s.spawn(|| {
            for i in 0..25 {
                db.save_customer(&Customer::new((1000 + i).to_string(), "C"))
                    .unwrap();
            }
        });
    });

    assert_eq!(db.articles().unwrap().len(), 25);
    assert_eq!(db.customers().unwrap().len(), 25);
}

#[test]
fn claimed_ids_are_unique_across_threads() {
    let temp = tempdir().unwrap();
    let db = ready(temp.path());
    let db = &db;

    let claimed: Vec<u64> = thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                s.spawn(move || {
                    (0..10)
                        .map(|_| db.claim_next_customer_id().unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });

    let unique: BTreeSet<_> = claimed.iter().copied().collect();
    assert_eq!(unique.len(), 40);
    assert_eq!(unique.first(), Some(&1000));
    assert_eq!(unique.last(), Some(&1039));
}

#[test]
fn switching_while_reading_never_mixes_companies() {
    let temp = tempdir().unwrap();
    let db = Arc::new(ready(temp.path()));
    let other = CompanyInfo::new("OTHER", "Other Ltd.");
    db.add_company(&other).unwrap();
    db.save_article(&Article::new("1000", "ACME article"))
        .unwrap();

    let reader = {
        let db = Arc::clone(&db);
        thread::spawn(move || {
            for _ in 0..50 {
                match db.article("1000") {
                    Ok(Some(article)) => assert_eq!(article.description, "ACME article"),
                    Ok(None) | Err(CoreError::NotReady { .. }) => {}
                    Err(e) => panic!("unexpected error: {e}"),
                }
            }
        })
    };

    let acme = CompanyInfo::new("ACME", "ACME Corp.");
    for i in 0..10 {
        let target = if i % 2 == 0 { &other } else { &acme };
        db.switch_company(target).unwrap();
    }
    reader.join().unwrap();

    assert_eq!(db.state(), StoreState::Ready);
    assert_eq!(db.current_company().unwrap().company_id, "ACME");
}
