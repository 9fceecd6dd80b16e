//! Test fixtures and store helpers.
//!
//! Provides temporary data roots with an active company and a sample
//! extension record type.

use officedb_codec::{CodecResult, Element};
use officedb_core::{
    Article, CompanyInfo, Config, Customer, Database, NamedRecord, RecordCodec, StoreState,
};
use std::path::Path;
use tempfile::TempDir;

/// Id of the company created by [`TestStore::ready`].
pub const TEST_COMPANY: &str = "ACME";

/// A database over a temporary data root, removed on drop.
pub struct TestStore {
    /// The database instance.
    pub db: Database,
    /// The temporary directory (kept alive to prevent cleanup).
    temp_dir: TempDir,
}

impl TestStore {
    /// A connected store with no company yet.
    pub fn first_run() -> Self {
        Self::first_run_with_config(Config::default())
    }

    /// A connected store with no company yet, using `config`.
    pub fn first_run_with_config(config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db = Database::new(temp_dir.path(), config);
        db.connect().expect("Failed to connect");
        assert_eq!(db.state(), StoreState::FirstRun);
        Self { db, temp_dir }
    }

    /// A store with [`TEST_COMPANY`] added and active.
    pub fn ready() -> Self {
        Self::ready_with_config(Config::default())
    }

    /// A store with [`TEST_COMPANY`] active, using `config`.
    pub fn ready_with_config(config: Config) -> Self {
        let store = Self::first_run_with_config(config);
        let company = CompanyInfo::new(TEST_COMPANY, "ACME Corp.");
        store.db.add_company(&company).expect("Failed to add company");
        store
            .db
            .switch_company(&company)
            .expect("Failed to switch company");
        store
    }

    /// Root of the data directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Directory of the test company.
    pub fn company_dir(&self) -> std::path::PathBuf {
        self.path().join(TEST_COMPANY)
    }

    /// Drops the database and opens a fresh handle on the same root.
    #[must_use]
    pub fn reopen(self) -> Self {
        let Self { db, temp_dir } = self;
        let config = db.config().clone();
        drop(db);
        let db = Database::open_with_config(temp_dir.path(), config).expect("Failed to reopen");
        Self { db, temp_dir }
    }
}

impl std::ops::Deref for TestStore {
    type Target = Database;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

/// Runs a test with a temporary ready store.
///
/// # Example
///
/// ```rust,ignore
/// use officedb_testkit::with_ready_store;
///
/// #[test]
/// fn my_test() {
///     with_ready_store(|db| {
///         assert_eq!(db.next_article_id().unwrap(), 1000);
///     });
/// }
/// ```
pub fn with_ready_store<F, R>(f: F) -> R
where
    F: FnOnce(&Database) -> R,
{
    let store = TestStore::ready();
    f(&store.db)
}

/// Sample extension record used across tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Project id.
    pub id: String,
    /// Project title.
    pub title: String,
    /// Budget in minor units.
    pub budget: i64,
}

impl Project {
    /// Creates a project with a generated title.
    pub fn new(id: impl Into<String>, budget: i64) -> Self {
        let id = id.into();
        Self {
            title: format!("Project {id}"),
            id,
            budget,
        }
    }
}

impl RecordCodec for Project {
    fn to_element(&self) -> Element {
        Element::new(Self::ELEMENT_NAME)
            .with_text_child(Self::ID_FIELD, &self.id)
            .with_text_child("Title", &self.title)
            .with_text_child("Budget", self.budget.to_string())
    }

    fn from_element(element: &Element) -> CodecResult<Self> {
        element.expect_name(Self::ELEMENT_NAME)?;
        Ok(Self {
            id: element.required_text(Self::ID_FIELD)?.to_string(),
            title: element.child_text("Title").unwrap_or_default().to_string(),
            budget: element.parse_child_or("Budget", 0)?,
        })
    }
}

impl NamedRecord for Project {
    const ELEMENT_NAME: &'static str = "Project";
    const ID_FIELD: &'static str = "ProjectID";

    fn record_id(&self) -> String {
        self.id.clone()
    }
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// A ready store with `articles` articles and `customers` customers,
    /// numbered from 1000.
    pub fn populated_store(articles: usize, customers: usize) -> TestStore {
        let store = TestStore::ready();
        let articles: Vec<_> = (0..articles)
            .map(|i| Article::new((1000 + i).to_string(), format!("Article {i}")))
            .collect();
        let customers: Vec<_> = (0..customers)
            .map(|i| Customer::new((1000 + i).to_string(), format!("Customer {i}")))
            .collect();
        store.save_articles(&articles).expect("Failed to save articles");
        store
            .save_customers(&customers)
            .expect("Failed to save customers");
        store
    }

    /// A first-run root holding companies `A` and `B` plus one company
    /// directory whose settings file is corrupt.
    pub fn companies_with_corrupt_entry() -> TestStore {
        let store = TestStore::first_run();
        for (id, name) in [("A", "Alpha"), ("B", "Beta")] {
            store
                .add_company(&CompanyInfo::new(id, name))
                .expect("Failed to add company");
        }
        let broken = store.path().join("Broken");
        std::fs::create_dir(&broken).expect("Failed to create directory");
        std::fs::write(broken.join("Others.xml"), "<Settings><CompanyInformation>")
            .expect("Failed to write corrupt settings");
        store
    }
}
