//! Tenant (company) directory.
//!
//! Each company owns a sub-directory of the data root holding its
//! collections. The root `Settings` file names the current company:
//!
//! ```text
//! <ApplicationSettings>
//!   <CurrentCompany>
//!     <CompanyInformation>
//!       <CompanyID>ACME</CompanyID>
//!       <CompanyName>ACME Corp.</CompanyName>
//!       <Metadata><Entry Key="vat_id">DE123</Entry></Metadata>
//!     </CompanyInformation>
//!   </CurrentCompany>
//! </ApplicationSettings>
//! ```

mod stores;

pub(crate) use stores::{TenantStores, ARTICLES, CUSTOMERS, DOCUMENTS, OTHERS, OTHERS_ROOT};

use crate::collection::RecordCodec;
use crate::dir::DataDir;
use crate::error::{CoreError, CoreResult};
use officedb_codec::{from_xml, to_xml, CodecResult, Element};
use officedb_storage::StorageBackend;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Component;
use tracing::{debug, info};

const APPLICATION_SETTINGS: &str = "ApplicationSettings";
const CURRENT_COMPANY: &str = "CurrentCompany";

/// Identity and metadata of one company.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyInfo {
    /// Stable id, also the directory name.
    pub company_id: String,
    /// Display name.
    pub name: String,
    /// Arbitrary key-value metadata.
    pub metadata: BTreeMap<String, String>,
}

impl CompanyInfo {
    /// Element name of the descriptor.
    pub const ELEMENT_NAME: &'static str = "CompanyInformation";

    /// Creates a descriptor without metadata.
    pub fn new(company_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            name: name.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Adds a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

impl RecordCodec for CompanyInfo {
    fn to_element(&self) -> Element {
        let metadata = self
            .metadata
            .iter()
            .fold(Element::new("Metadata"), |m, (key, value)| {
                m.with_child(Element::text_node("Entry", value).with_attr("Key", key))
            });
        Element::new(Self::ELEMENT_NAME)
            .with_text_child("CompanyID", &self.company_id)
            .with_text_child("CompanyName", &self.name)
            .with_child(metadata)
    }

    fn from_element(element: &Element) -> CodecResult<Self> {
        element.expect_name(Self::ELEMENT_NAME)?;
        let metadata = element
            .child("Metadata")
            .map(|m| {
                m.children_named("Entry")
                    .filter_map(|e| Some((e.attr("Key")?.to_string(), e.text().to_string())))
                    .collect()
            })
            .unwrap_or_default();
        Ok(Self {
            company_id: element.required_text("CompanyID")?.to_string(),
            name: element.child_text("CompanyName").unwrap_or_default().to_string(),
            metadata,
        })
    }
}

/// Checks that a company id is usable as a single directory name.
///
/// # Errors
///
/// Returns [`CoreError::InvalidCompanyId`] otherwise.
pub fn validate_company_id(id: &str) -> CoreResult<()> {
    let invalid = || CoreError::InvalidCompanyId { id: id.to_string() };
    if id.trim().is_empty() || id.contains(['/', '\\']) {
        return Err(invalid());
    }
    let mut components = std::path::Path::new(id).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(invalid()),
    }
}

/// Reads and writes company descriptors below a data root.
#[derive(Debug, Clone)]
pub(crate) struct TenantDirectory {
    dir: DataDir,
}

impl TenantDirectory {
    pub(crate) fn new(dir: DataDir) -> Self {
        Self { dir }
    }

    pub(crate) fn dir(&self) -> &DataDir {
        &self.dir
    }

    /// Reads the root settings file.
    ///
    /// `Ok(None)` if the file does not exist.
    fn read_settings(&self) -> CoreResult<Option<Element>> {
        let backend = self.dir.settings_backend()?;
        let unavailable = |reason: String| CoreError::storage_unavailable("Settings", reason);
        let Some(bytes) = backend.read().map_err(|e| unavailable(e.to_string()))? else {
            return Ok(None);
        };
        let root = from_xml(&bytes).map_err(|e| unavailable(e.to_string()))?;
        if root.name() != APPLICATION_SETTINGS {
            return Err(unavailable(format!(
                "expected root <{APPLICATION_SETTINGS}>, found <{}>",
                root.name()
            )));
        }
        Ok(Some(root))
    }

    /// The company named in the root settings file.
    ///
    /// `Ok(None)` when there is no settings file or it names no company.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::StorageUnavailable`] if the file cannot be read
    /// or parsed, or the descriptor is malformed.
    pub(crate) fn current_company(&self) -> CoreResult<Option<CompanyInfo>> {
        let Some(root) = self.read_settings()? else {
            return Ok(None);
        };
        let Some(descriptor) = root
            .child(CURRENT_COMPANY)
            .and_then(|c| c.child(CompanyInfo::ELEMENT_NAME))
        else {
            return Ok(None);
        };
        let info = CompanyInfo::from_element(descriptor)
            .map_err(|e| CoreError::storage_unavailable("Settings", e.to_string()))?;
        validate_company_id(&info.company_id)?;
        Ok(Some(info))
    }

    /// Rewrites the current-company element of the root settings file.
    ///
    /// Other children of the settings root are preserved. Nothing is
    /// written if the existing file cannot be parsed.
    pub(crate) fn write_current(&self, info: &CompanyInfo) -> CoreResult<()> {
        self.dir.ensure_root()?;
        let mut root = self
            .read_settings()?
            .unwrap_or_else(|| Element::new(APPLICATION_SETTINGS));
        root.replace_child(Element::new(CURRENT_COMPANY).with_child(info.to_element()));

        let mut backend = self.dir.settings_backend()?;
        backend.write(&to_xml(&root)?)?;
        debug!(company = %info.company_id, "wrote current company");
        Ok(())
    }

    /// Creates a company directory with an initial Others file.
    pub(crate) fn add_company(&self, info: &CompanyInfo) -> CoreResult<()> {
        validate_company_id(&info.company_id)?;
        self.dir.ensure_root()?;

        let mut backend = self.dir.collection_backend(&info.company_id, OTHERS)?;
        if backend.exists() {
            return Err(CoreError::CompanyExists {
                id: info.company_id.clone(),
            });
        }

        let root = Element::new(OTHERS_ROOT).with_child(info.to_element());
        backend.write(&to_xml(&root)?)?;
        info!(company = %info.company_id, name = %info.name, "added company");
        Ok(())
    }

    /// Every company whose Others file holds a readable descriptor, by id.
    ///
    /// Unreadable or incomplete company directories are skipped.
    pub(crate) fn list_companies(&self) -> CoreResult<Vec<CompanyInfo>> {
        let mut companies = Vec::new();
        for path in self.dir.company_dirs()? {
            let others = path.join(self.dir.file_name(OTHERS));
            match read_descriptor(&others) {
                Ok(info) => companies.push(info),
                Err(reason) => {
                    debug!(path = %path.display(), %reason, "skipping company directory");
                }
            }
        }
        companies.sort_by(|a, b| a.company_id.cmp(&b.company_id));
        Ok(companies)
    }
}

fn read_descriptor(path: &std::path::Path) -> Result<CompanyInfo, String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    let root = from_xml(&bytes).map_err(|e| e.to_string())?;
    if root.name() != OTHERS_ROOT {
        return Err(format!("unexpected root <{}>", root.name()));
    }
    let descriptor = root
        .child(CompanyInfo::ELEMENT_NAME)
        .ok_or_else(|| "no company descriptor".to_string())?;
    CompanyInfo::from_element(descriptor).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn directory(root: &std::path::Path) -> TenantDirectory {
        TenantDirectory::new(DataDir::new(root, "xml"))
    }

    #[test]
    fn company_info_round_trip() {
        let info = CompanyInfo::new("ACME", "ACME Corp.").with_metadata("vat_id", "DE123");
        let element = info.to_element();
        assert_eq!(
            element.child("Metadata").unwrap().children()[0].attr("Key"),
            Some("vat_id")
        );
        assert_eq!(CompanyInfo::from_element(&element).unwrap(), info);
    }

    #[test]
    fn company_id_validation() {
        assert!(validate_company_id("ACME").is_ok());
        assert!(validate_company_id("acme-2024").is_ok());
        for bad in ["", "  ", ".", "..", "a/b", "a\\b", "/abs"] {
            assert!(
                matches!(validate_company_id(bad), Err(CoreError::InvalidCompanyId { .. })),
                "{bad:?} accepted"
            );
        }
    }

    #[test]
    fn no_settings_means_no_current_company() {
        let temp = tempdir().unwrap();
        assert_eq!(directory(temp.path()).current_company().unwrap(), None);
    }

    #[test]
    fn write_then_read_current() {
        let temp = tempdir().unwrap();
        let tenants = directory(temp.path());
        let info = CompanyInfo::new("ACME", "ACME Corp.");

        tenants.write_current(&info).unwrap();
        assert_eq!(tenants.current_company().unwrap(), Some(info));
    }

    #[test]
    fn write_current_preserves_other_settings() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("Settings.xml"),
            "<ApplicationSettings><Theme>dark</Theme></ApplicationSettings>",
        )
        .unwrap();
        let tenants = directory(temp.path());

        tenants.write_current(&CompanyInfo::new("A", "A")).unwrap();
        tenants.write_current(&CompanyInfo::new("B", "B")).unwrap();

        let root = from_xml(&fs::read(temp.path().join("Settings.xml")).unwrap()).unwrap();
        assert_eq!(root.child_text("Theme"), Some("dark"));
        assert_eq!(root.children_named(CURRENT_COMPANY).count(), 1);
        assert_eq!(tenants.current_company().unwrap().unwrap().company_id, "B");
    }

    #[test]
    fn write_current_refuses_to_clobber_corrupt_settings() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("Settings.xml");
        fs::write(&path, "<ApplicationSettings>").unwrap();

        let result = directory(temp.path()).write_current(&CompanyInfo::new("A", "A"));
        assert!(matches!(result, Err(CoreError::StorageUnavailable { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), "<ApplicationSettings>");
    }

    #[test]
    fn corrupt_settings_are_fatal() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("Settings.xml"), "not xml").unwrap();
        assert!(directory(temp.path()).current_company().is_err());
    }

    #[test]
    fn add_company_writes_descriptor() {
        let temp = tempdir().unwrap();
        let tenants = directory(temp.path());
        let info = CompanyInfo::new("ACME", "ACME Corp.");

        tenants.add_company(&info).unwrap();

        let root = from_xml(&fs::read(temp.path().join("ACME/Others.xml")).unwrap()).unwrap();
        assert_eq!(root.name(), "Settings");
        assert_eq!(tenants.list_companies().unwrap(), vec![info]);
    }

    #[test]
    fn add_company_twice_fails() {
        let temp = tempdir().unwrap();
        let tenants = directory(temp.path());
        let info = CompanyInfo::new("ACME", "ACME Corp.");

        tenants.add_company(&info).unwrap();
        assert!(matches!(
            tenants.add_company(&info),
            Err(CoreError::CompanyExists { .. })
        ));
    }

    #[test]
    fn list_skips_broken_companies() {
        let temp = tempdir().unwrap();
        let tenants = directory(temp.path());
        tenants.add_company(&CompanyInfo::new("B", "Beta")).unwrap();
        tenants.add_company(&CompanyInfo::new("A", "Alpha")).unwrap();

        fs::create_dir(temp.path().join("Broken")).unwrap();
        fs::write(temp.path().join("Broken/Others.xml"), "<Settings><Compa").unwrap();
        fs::create_dir(temp.path().join("NoDescriptor")).unwrap();
        fs::write(temp.path().join("NoDescriptor/Others.xml"), "<Settings/>").unwrap();
        fs::create_dir(temp.path().join("Empty")).unwrap();

        let ids: Vec<_> = tenants
            .list_companies()
            .unwrap()
            .into_iter()
            .map(|c| c.company_id)
            .collect();
        assert_eq!(ids, ["A", "B"]);
    }

    #[test]
    fn list_on_missing_root_is_empty() {
        let temp = tempdir().unwrap();
        let tenants = directory(&temp.path().join("missing"));
        assert!(tenants.list_companies().unwrap().is_empty());
    }
}
