// Mon Oct 19 2026 - Alex

use super::api_description::ApiDescription;
use super::error::ModelError;
use super::store::{is_archive, ArchiveStore, DirectoryStore, MemoryStore, PackageListing, TypeStore};
use crate::descriptor::TypeDescriptor;
use std::fmt;
use std::path::Path;

/// A named, versioned unit of compiled code.
pub struct Component {
    id: String,
    version: String,
    is_system: bool,
    host: Option<String>,
    store: Box<dyn TypeStore>,
    api_description: ApiDescription,
}

impl Component {
    pub fn new(id: &str, version: &str, store: Box<dyn TypeStore>) -> Self {
        Self {
            id: id.to_string(),
            version: version.to_string(),
            is_system: false,
            host: None,
            store,
            api_description: ApiDescription::new(),
        }
    }

    /// Opens a class directory and its `.api_description.json` sidecar.
    pub fn from_directory(id: &str, version: &str, path: &Path) -> Result<Self, ModelError> {
        let store = DirectoryStore::open(path)?;
        let api_description = ApiDescription::load_sidecar(path)?;
        log::debug!(
            "Opened component {} ({}) at {} with {} annotations",
            id,
            version,
            path.display(),
            api_description.len()
        );
        Ok(Self::new(id, version, Box::new(store)).with_api_description(api_description))
    }

    /// Opens a jar, zip or jmod archive and its `<archive>.api_description.json`
    /// sidecar.
    pub fn from_archive(id: &str, version: &str, path: &Path) -> Result<Self, ModelError> {
        let store = ArchiveStore::open(path)?;
        let api_description = ApiDescription::load_archive_sidecar(path)?;
        log::debug!(
            "Opened archive component {} ({}) at {} with {} annotations",
            id,
            version,
            path.display(),
            api_description.len()
        );
        Ok(Self::new(id, version, Box::new(store)).with_api_description(api_description))
    }

    /// Opens a class directory or an archive, whichever `path` names.
    pub fn from_path(id: &str, version: &str, path: &Path) -> Result<Self, ModelError> {
        if path.is_dir() {
            Self::from_directory(id, version, path)
        } else if path.is_file() && is_archive(path) {
            Self::from_archive(id, version, path)
        } else {
            Err(ModelError::Resource(format!(
                "{} is neither a class directory nor a jar, zip or jmod archive",
                path.display()
            )))
        }
    }

    pub fn in_memory(id: &str, version: &str, store: MemoryStore) -> Self {
        Self::new(id, version, Box::new(store))
    }

    pub fn with_api_description(mut self, api_description: ApiDescription) -> Self {
        self.api_description = api_description;
        self
    }

    pub fn as_system(mut self) -> Self {
        self.is_system = true;
        self
    }

    pub fn as_fragment_of(mut self, host: &str) -> Self {
        self.host = Some(host.to_string());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// `id (version)`, as used in reports.
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.id, self.version)
    }

    pub fn is_system(&self) -> bool {
        self.is_system
    }

    pub fn is_fragment(&self) -> bool {
        self.host.is_some()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn packages(&self) -> Result<PackageListing, ModelError> {
        self.store.packages()
    }

    pub fn package_names(&self) -> Result<Vec<String>, ModelError> {
        Ok(self.packages()?.into_iter().map(|(name, _)| name).collect())
    }

    pub fn types(&self) -> Result<Vec<TypeDescriptor>, ModelError> {
        Ok(self.packages()?.into_iter().flat_map(|(_, types)| types).collect())
    }

    pub fn contains_type(&self, ty: &TypeDescriptor) -> bool {
        self.store.contains(ty)
    }

    pub fn read_type(&self, ty: &TypeDescriptor) -> Result<Vec<u8>, ModelError> {
        self.store.read(ty)
    }

    pub fn api_description(&self) -> &ApiDescription {
        &self.api_description
    }

    pub fn store(&self) -> &dyn TypeStore {
        self.store.as_ref()
    }

    pub fn verify(&self) -> Result<(), ModelError> {
        self.store.verify()
    }

    pub fn dispose(&self) {
        if !self.store.is_disposed() {
            log::debug!("Disposing component {}", self.id);
            self.store.dispose();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.store.is_disposed()
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.id)
            .field("version", &self.version)
            .field("is_system", &self.is_system)
            .field("host", &self.host)
            .field("store", &self.store.location())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::modifiers::{RestrictionMask, Visibility};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_from_directory_loads_sidecar() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("a/A.class"), b"-").unwrap();
        fs::write(
            dir.path().join(".api_description.json"),
            r#"{"elements":[{"kind":"type","name":"a.A","visibility":"SPI","restrictions":["NO_EXTEND"]}]}"#,
        )
        .unwrap();

        let component = Component::from_directory("comp.a", "1.0.0", dir.path()).unwrap();
        assert_eq!(component.display_name(), "comp.a (1.0.0)");
        assert_eq!(component.package_names().unwrap(), vec!["a".to_string()]);
        let annotations = component
            .api_description()
            .resolve(&TypeDescriptor::new("a", "A").into());
        assert_eq!(annotations.visibility, Visibility::Spi);
        assert_eq!(annotations.restrictions, RestrictionMask::NO_EXTEND);
    }

    #[test]
    fn test_from_path_opens_archive_with_sidecar() {
        use std::io::Write;
        use zip::write::FileOptions;

        let dir = tempdir().unwrap();
        let jar = dir.path().join("lib.jar");
        let mut writer = zip::ZipWriter::new(fs::File::create(&jar).unwrap());
        writer.start_file("a/A.class", FileOptions::default()).unwrap();
        writer.write_all(b"-").unwrap();
        writer.finish().unwrap();
        fs::write(
            dir.path().join("lib.jar.api_description.json"),
            r#"{"elements":[{"kind":"type","name":"a.A","visibility":"SPI","restrictions":["NO_EXTEND"]}]}"#,
        )
        .unwrap();

        let component = Component::from_path("comp.lib", "2.0.0", &jar).unwrap();
        assert_eq!(component.package_names().unwrap(), vec!["a".to_string()]);
        assert_eq!(component.read_type(&TypeDescriptor::new("a", "A")).unwrap(), b"-");
        let annotations = component
            .api_description()
            .resolve(&TypeDescriptor::new("a", "A").into());
        assert_eq!(annotations.visibility, Visibility::Spi);
        assert_eq!(annotations.restrictions, RestrictionMask::NO_EXTEND);
    }

    #[test]
    fn test_from_path_rejects_plain_file() {
        let dir = tempdir().unwrap();
        let notes = dir.path().join("notes.txt");
        fs::write(&notes, b"-").unwrap();
        assert!(matches!(
            Component::from_path("c", "1", &notes),
            Err(ModelError::Resource(_))
        ));
        assert!(Component::from_path("c", "1", dir.path()).is_ok());
    }

    #[test]
    fn test_fragment_flags() {
        let component = Component::in_memory("frag", "1", MemoryStore::new()).as_fragment_of("host");
        assert!(component.is_fragment());
        assert_eq!(component.host(), Some("host"));
        assert!(!component.is_system());
    }

    #[test]
    fn test_dispose() {
        let component = Component::in_memory("c", "1", MemoryStore::new());
        component.dispose();
        assert!(component.is_disposed());
        assert!(component.verify().is_err());
    }
}
