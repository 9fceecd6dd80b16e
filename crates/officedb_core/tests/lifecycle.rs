//! End-to-end tests of the company lifecycle and record persistence.

use chrono::NaiveDate;
use officedb_codec::{from_xml, Element};
use officedb_core::{
    Article, CollectionStore, CompanyInfo, Config, CoreError, Customer, Database, Document,
    DocumentParser, DocumentPreview, FieldValue, ParserResult, RecordSpec, StoreState, Unit,
};
use officedb_storage::InMemoryBackend;
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn first_run_to_ready_and_back() {
    let temp = tempdir().unwrap();
    let acme = CompanyInfo::new("ACME", "ACME Corp.").with_metadata("Country", "DE");

    {
        let db = Database::new(temp.path(), Config::default());
        assert_eq!(db.state(), StoreState::Uninitialized);
        assert!(!db.connect().unwrap());
        assert_eq!(db.state(), StoreState::FirstRun);

        db.add_company(&acme).unwrap();
        assert!(db.switch_company(&acme).unwrap());
        assert_eq!(db.current_company(), Some(acme.clone()));

        db.save_unit(&Unit {
            name: "Piece".into(),
            short_name: "pc".into(),
            decimals: 0,
        })
        .unwrap();
        db.save_article(&Article {
            unit: Unit::named("Piece"),
            ..Article::new("1000", "Widget")
        })
        .unwrap();
    }

    for name in ["Articles.xml", "Customers.xml", "Documents.xml", "Others.xml"] {
        assert!(temp.path().join("ACME").join(name).is_file(), "{name} missing");
    }
    assert!(temp.path().join("Settings.xml").is_file());

    let db = Database::open(temp.path()).unwrap();
    assert_eq!(db.state(), StoreState::Ready);
    assert_eq!(db.current_company(), Some(acme));

    let article = db.article("1000").unwrap().unwrap();
    assert_eq!(article.description, "Widget");
    assert_eq!(article.unit.short_name, "pc");
    assert_eq!(db.next_article_id().unwrap(), 1001);
}

#[test]
fn companies_are_isolated() {
    let temp = tempdir().unwrap();
    let db = Database::new(temp.path(), Config::default());
    db.connect().unwrap();

    let a = CompanyInfo::new("A", "Alpha");
    let b = CompanyInfo::new("B", "Beta");
    db.add_company(&a).unwrap();
    db.add_company(&b).unwrap();

    db.switch_company(&a).unwrap();
    db.save_customer(&Customer::new("1000", "Only in A")).unwrap();

    db.switch_company(&b).unwrap();
    assert!(db.customer("1000").unwrap().is_none());
    assert_eq!(db.next_customer_id().unwrap(), 1000);

    db.switch_company(&a).unwrap();
    assert_eq!(
        db.customer("1000").unwrap().unwrap().display_name,
        "Only in A"
    );
}

#[test]
fn listing_skips_unreadable_companies() {
    let temp = tempdir().unwrap();
    let db = Database::new(temp.path(), Config::default());
    db.connect().unwrap();
    db.add_company(&CompanyInfo::new("A", "Alpha")).unwrap();
    db.add_company(&CompanyInfo::new("B", "Beta")).unwrap();

    let broken = temp.path().join("Broken");
    fs::create_dir(&broken).unwrap();
    fs::write(broken.join("Others.xml"), "<Settings><CompanyInformation>").unwrap();
    fs::create_dir(temp.path().join("Empty")).unwrap();

    let ids: Vec<_> = db
        .list_companies()
        .unwrap()
        .into_iter()
        .map(|c| c.company_id)
        .collect();
    assert_eq!(ids, ["A", "B"]);
}

#[test]
fn adding_an_existing_company_keeps_its_settings() {
    let temp = tempdir().unwrap();
    let db = Database::new(temp.path(), Config::default());
    db.connect().unwrap();

    db.add_company(&CompanyInfo::new("A", "Alpha")).unwrap();
    let result = db.add_company(&CompanyInfo::new("A", "Overwritten"));
    assert!(matches!(result, Err(CoreError::CompanyExists { .. })));
    assert_eq!(db.list_companies().unwrap()[0].name, "Alpha");
}

#[test]
fn next_id_accounts_for_reservations() {
    let temp = tempdir().unwrap();
    let db = Database::new(temp.path(), Config::default());
    db.connect().unwrap();
    let acme = CompanyInfo::new("ACME", "ACME Corp.");
    db.add_company(&acme).unwrap();
    db.switch_company(&acme).unwrap();

    assert_eq!(db.next_article_id().unwrap(), 1000);

    for id in ["1000", "1042", "1007"] {
        db.save_article(&Article::new(id, "A")).unwrap();
    }
    assert_eq!(db.next_article_id().unwrap(), 1043);

    db.update_reserved_article_id("", "1050");
    assert_eq!(db.next_article_id().unwrap(), 1051);
    assert!(db.article_exists("1050").unwrap());

    db.update_reserved_article_id("1050", "");
    assert_eq!(db.next_article_id().unwrap(), 1043);
    assert!(!db.article_exists("1050").unwrap());
}

struct InvoiceTotal;

impl DocumentParser for InvoiceTotal {
    fn document_type(&self) -> &str {
        "Invoice"
    }

    fn parse_preview(&self, preview: &mut DocumentPreview, raw: &Element) -> ParserResult {
        if let Some(total) = raw.child_text("Total") {
            preview
                .extra
                .insert("Total".into(), FieldValue::Integer(total.parse()?));
        }
        Ok(())
    }
}

#[test]
fn enrichment_applies_to_its_document_type_only() {
    let temp = tempdir().unwrap();
    let db = Database::new(temp.path(), Config::default());
    db.connect().unwrap();
    let acme = CompanyInfo::new("ACME", "ACME Corp.");
    db.add_company(&acme).unwrap();
    db.switch_company(&acme).unwrap();
    db.register_document_parser(Arc::new(InvoiceTotal));

    let mut invoice = Document::new("Invoice", "1000", date(2024, 3, 1));
    invoice.set_field(Element::text_node("Total", "11900"));
    let mut offer = Document::new("Offer", "1000", date(2024, 3, 2));
    offer.set_field(Element::text_node("Total", "500"));
    db.save_documents(&[invoice, offer]).unwrap();

    let previews = db
        .documents_in_interval(date(2024, 3, 1), date(2024, 3, 31), None)
        .unwrap();
    assert_eq!(previews.len(), 2);
    for preview in previews {
        match preview.document_type.as_str() {
            "Invoice" => assert_eq!(
                preview.extra.get("Total"),
                Some(&FieldValue::Integer(11900))
            ),
            _ => assert!(preview.extra.is_empty()),
        }
    }
}

#[test]
fn interval_bounds_are_inclusive() {
    let temp = tempdir().unwrap();
    let db = Database::new(temp.path(), Config::default());
    db.connect().unwrap();
    let acme = CompanyInfo::new("ACME", "ACME Corp.");
    db.add_company(&acme).unwrap();
    db.switch_company(&acme).unwrap();

    for (id, day) in [("1000", 1), ("1001", 15), ("1002", 31)] {
        db.save_document(&Document::new("Invoice", id, date(2024, 1, day)))
            .unwrap();
    }
    db.save_document(&Document::new("Offer", "1000", date(2024, 1, 15)))
        .unwrap();

    let all = db
        .documents_in_interval(date(2024, 1, 1), date(2024, 1, 31), None)
        .unwrap();
    assert_eq!(all.len(), 4);

    let invoices = db
        .documents_in_interval(date(2024, 1, 15), date(2024, 1, 31), Some("Invoice"))
        .unwrap();
    let ids: Vec<_> = invoices.iter().map(|d| d.document_id.as_str()).collect();
    assert_eq!(ids, ["1001", "1002"]);
}

#[test]
fn failed_write_leaves_memory_and_disk_unchanged() {
    let backend = InMemoryBackend::new();
    let store = CollectionStore::open("Articles", "Articles", Box::new(backend.clone())).unwrap();
    let spec = RecordSpec::new("Article", "ArticleID");

    let record = |id: &str| Element::new("Article").with_text_child("ArticleID", id);
    store.upsert(&spec, record("1000")).unwrap();
    let before = backend.data().unwrap();

    backend.set_fail_writes(true);
    let result = store.upsert(&spec, record("1001"));
    assert!(matches!(result, Err(CoreError::Storage(_))));
    assert!(!store.exists(&spec, "1001"));
    assert_eq!(store.len(&spec), 1);
    assert_eq!(backend.data().unwrap(), before);

    backend.set_fail_writes(false);
    store.upsert(&spec, record("1001")).unwrap();
    let on_disk = from_xml(&backend.data().unwrap()).unwrap();
    assert_eq!(on_disk.children().len(), 2);
}

fn ready_acme(root: &std::path::Path) -> Database {
    let db = Database::new(root, Config::default());
    db.connect().unwrap();
    let acme = CompanyInfo::new("ACME", "ACME Corp.");
    db.add_company(&acme).unwrap();
    db.switch_company(&acme).unwrap();
    db
}

#[test]
fn unwritable_text_is_rejected_and_company_still_opens() {
    let temp = tempdir().unwrap();
    {
        let db = ready_acme(temp.path());
        db.save_article(&Article::new("999", "Plain")).unwrap();

        let result = db.save_article(&Article::new("1000", "Widget\u{0C}pasted"));
        assert!(matches!(result, Err(CoreError::Codec(_))));
        assert!(db.article("1000").unwrap().is_none());

        let mut customer = Customer::new("1000", "Jane");
        customer.main_address.city = "Spring\u{1}field".into();
        assert!(db.save_customer(&customer).is_err());
    }

    let db = Database::open(temp.path()).unwrap();
    assert_eq!(db.state(), StoreState::Ready);
    assert!(db.article("1000").unwrap().is_none());
    assert_eq!(db.article("999").unwrap().unwrap().description, "Plain");
    db.save_article(&Article::new("1000", "Widget")).unwrap();
}

#[test]
fn invalid_field_name_is_rejected_and_company_still_opens() {
    let temp = tempdir().unwrap();
    {
        let db = ready_acme(temp.path());
        db.save_document(&Document::new("Invoice", "1", date(2024, 2, 1)))
            .unwrap();

        let mut invoice = Document::new("Invoice", "2", date(2024, 2, 2));
        invoice.set_field(Element::text_node("Net Total", "100"));
        assert!(matches!(
            db.save_document(&invoice),
            Err(CoreError::Codec(_))
        ));
        assert!(!db.document_exists("Invoice", "2").unwrap());
    }

    let db = Database::open(temp.path()).unwrap();
    assert_eq!(db.state(), StoreState::Ready);
    assert_eq!(db.documents("Invoice").unwrap().len(), 1);
}

#[test]
fn whitespace_survives_reopen() {
    let temp = tempdir().unwrap();
    let acme = CompanyInfo::new("ACME", "ACME Corp.").with_metadata("tab\tkey", "a\r\nb");
    {
        let db = Database::new(temp.path(), Config::default());
        db.connect().unwrap();
        db.add_company(&acme).unwrap();
        db.switch_company(&acme).unwrap();
        db.save_article(&Article::new("1000", "Line1\r\nLine2\r")).unwrap();
        db.save_article(&Article::new("1001", "\tindented ")).unwrap();
        db.save_article(&Article::new("1002", "")).unwrap();
    }

    let db = Database::open(temp.path()).unwrap();
    assert_eq!(db.state(), StoreState::Ready);
    assert_eq!(db.current_company(), Some(acme.clone()));
    assert_eq!(db.list_companies().unwrap(), [acme]);
    assert_eq!(
        db.article("1000").unwrap().unwrap().description,
        "Line1\r\nLine2\r"
    );
    assert_eq!(db.article("1001").unwrap().unwrap().description, "\tindented ");
    assert_eq!(db.article("1002").unwrap().unwrap().description, "");
}
