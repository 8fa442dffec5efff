// Mon Oct 19 2026 - Alex

use super::error::ModelError;
use crate::descriptor::TypeDescriptor;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};
use zip::result::ZipError;
use zip::ZipArchive;

const ARCHIVE_EXTENSIONS: &[&str] = &["jar", "zip", "jmod"];

pub type PackageListing = Vec<(String, Vec<TypeDescriptor>)>;

/// Source of the type binaries of one component.
///
/// Stores are shared by the parallel extraction workers, so each `read` must be
/// independent of the others. `dispose` waits for reads in flight.
pub trait TypeStore: Send + Sync {
    /// Packages in name order, each with its types in name order.
    fn packages(&self) -> Result<PackageListing, ModelError>;

    fn contains(&self, ty: &TypeDescriptor) -> bool;

    fn read(&self, ty: &TypeDescriptor) -> Result<Vec<u8>, ModelError>;

    /// Checks that the store can still be read.
    fn verify(&self) -> Result<(), ModelError>;

    fn dispose(&self);

    fn is_disposed(&self) -> bool;

    fn location(&self) -> String;
}

#[derive(Default)]
struct DirectoryState {
    disposed: bool,
    index: Option<PackageListing>,
}

/// A directory tree of `.class` files, one sub-directory per package segment.
pub struct DirectoryStore {
    root: PathBuf,
    state: RwLock<DirectoryState>,
}

impl DirectoryStore {
    pub fn open(root: impl AsRef<Path>) -> Result<Self, ModelError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(ModelError::Resource(format!("{} is not a directory", root.display())));
        }
        Ok(Self {
            root: root.to_path_buf(),
            state: RwLock::new(DirectoryState::default()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn type_path(&self, ty: &TypeDescriptor) -> PathBuf {
        let mut path = self.root.clone();
        for segment in ty.package_name().split('.').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path.push(format!("{}.class", ty.name()));
        path
    }

    fn scan(&self) -> Result<PackageListing, ModelError> {
        let mut packages: BTreeMap<String, Vec<TypeDescriptor>> = BTreeMap::new();
        scan_dir(&self.root, "", &mut packages)?;
        for types in packages.values_mut() {
            types.sort();
        }
        log::debug!("Indexed {} packages under {}", packages.len(), self.root.display());
        Ok(packages.into_iter().collect())
    }

    fn disposed_error(&self) -> ModelError {
        ModelError::Disposed(self.root.display().to_string())
    }
}

fn scan_dir(dir: &Path, package: &str, out: &mut BTreeMap<String, Vec<TypeDescriptor>>) -> Result<(), ModelError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if path.is_dir() {
            let sub = if package.is_empty() {
                name
            } else {
                format!("{}.{}", package, name)
            };
            scan_dir(&path, &sub, out)?;
        } else if let Some(stem) = name.strip_suffix(".class") {
            if stem == "module-info" || stem == "package-info" {
                continue;
            }
            out.entry(package.to_string())
                .or_default()
                .push(TypeDescriptor::new(package, stem));
        }
    }
    Ok(())
}

impl TypeStore for DirectoryStore {
    fn packages(&self) -> Result<PackageListing, ModelError> {
        {
            let state = self.state.read();
            if state.disposed {
                return Err(self.disposed_error());
            }
            if let Some(index) = &state.index {
                return Ok(index.clone());
            }
        }

        let scanned = self.scan()?;
        let mut state = self.state.write();
        if state.disposed {
            return Err(self.disposed_error());
        }
        state.index = Some(scanned.clone());
        Ok(scanned)
    }

    fn contains(&self, ty: &TypeDescriptor) -> bool {
        let state = self.state.read();
        !state.disposed && self.type_path(ty).is_file()
    }

    fn read(&self, ty: &TypeDescriptor) -> Result<Vec<u8>, ModelError> {
        let state = self.state.read();
        if state.disposed {
            return Err(self.disposed_error());
        }
        match fs::read(self.type_path(ty)) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(ModelError::TypeNotFound(ty.qualified_name())),
            Err(e) => Err(e.into()),
        }
    }

    fn verify(&self) -> Result<(), ModelError> {
        if self.state.read().disposed {
            return Err(self.disposed_error());
        }
        if !self.root.is_dir() {
            return Err(ModelError::Resource(format!("{} is no longer readable", self.root.display())));
        }
        Ok(())
    }

    fn dispose(&self) {
        let mut state = self.state.write();
        state.disposed = true;
        state.index = None;
    }

    fn is_disposed(&self) -> bool {
        self.state.read().disposed
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }
}

/// True for files named like a jar, zip or jmod archive.
pub fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ARCHIVE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

#[derive(Default)]
struct ArchiveState {
    disposed: bool,
}

/// A jar, zip or jmod archive of `.class` entries.
///
/// The entry index is built once on open. Every read opens its own handle on
/// the archive.
pub struct ArchiveStore {
    path: PathBuf,
    entries: BTreeMap<TypeDescriptor, String>,
    state: RwLock<ArchiveState>,
}

impl ArchiveStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ModelError::Resource(format!("{} is not a file", path.display())));
        }

        let mut archive = open_archive(path)?;
        let mut entries = BTreeMap::new();
        for idx in 0..archive.len() {
            let entry = archive.by_index(idx).map_err(|e| archive_error(path, e))?;
            if entry.is_dir() {
                continue;
            }
            if let Some(ty) = entry_type(entry.name()) {
                entries.insert(ty, entry.name().to_string());
            }
        }
        log::debug!("Indexed {} types in {}", entries.len(), path.display());

        Ok(Self {
            path: path.to_path_buf(),
            entries,
            state: RwLock::new(ArchiveState::default()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn disposed_error(&self) -> ModelError {
        ModelError::Disposed(self.path.display().to_string())
    }
}

fn open_archive(path: &Path) -> Result<ZipArchive<BufReader<File>>, ModelError> {
    let file = File::open(path)?;
    ZipArchive::new(BufReader::new(file)).map_err(|e| archive_error(path, e))
}

fn archive_error(path: &Path, source: ZipError) -> ModelError {
    ModelError::Archive {
        path: path.display().to_string(),
        source,
    }
}

/// Maps an archive entry name to the type it holds. jmod entries live under
/// `classes/`; multi-release overlays are ignored.
fn entry_type(name: &str) -> Option<TypeDescriptor> {
    if name.starts_with("META-INF/") {
        return None;
    }
    let internal = name.strip_prefix("classes/").unwrap_or(name).strip_suffix(".class")?;
    let simple = internal.rsplit('/').next().unwrap_or(internal);
    if simple.is_empty() || simple == "module-info" || simple == "package-info" {
        return None;
    }
    Some(TypeDescriptor::from_internal_name(internal))
}

impl TypeStore for ArchiveStore {
    fn packages(&self) -> Result<PackageListing, ModelError> {
        if self.state.read().disposed {
            return Err(self.disposed_error());
        }
        let mut packages: BTreeMap<String, Vec<TypeDescriptor>> = BTreeMap::new();
        for ty in self.entries.keys() {
            packages
                .entry(ty.package_name().to_string())
                .or_default()
                .push(ty.clone());
        }
        Ok(packages.into_iter().collect())
    }

    fn contains(&self, ty: &TypeDescriptor) -> bool {
        !self.state.read().disposed && self.entries.contains_key(ty)
    }

    fn read(&self, ty: &TypeDescriptor) -> Result<Vec<u8>, ModelError> {
        let state = self.state.read();
        if state.disposed {
            return Err(self.disposed_error());
        }
        let name = self
            .entries
            .get(ty)
            .ok_or_else(|| ModelError::TypeNotFound(ty.qualified_name()))?;

        let mut archive = open_archive(&self.path)?;
        let mut entry = archive.by_name(name).map_err(|e| archive_error(&self.path, e))?;
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    fn verify(&self) -> Result<(), ModelError> {
        if self.state.read().disposed {
            return Err(self.disposed_error());
        }
        if !self.path.is_file() {
            return Err(ModelError::Resource(format!("{} is no longer readable", self.path.display())));
        }
        Ok(())
    }

    fn dispose(&self) {
        self.state.write().disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.state.read().disposed
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Default)]
struct MemoryState {
    disposed: bool,
    types: BTreeMap<TypeDescriptor, Vec<u8>>,
}

/// Type binaries held in memory: synthetic components and stubs.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ty: TypeDescriptor, bytes: Vec<u8>) {
        self.state.get_mut().types.insert(ty, bytes);
    }

    pub fn with_type(mut self, ty: TypeDescriptor, bytes: Vec<u8>) -> Self {
        self.insert(ty, bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.state.read().types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TypeStore for MemoryStore {
    fn packages(&self) -> Result<PackageListing, ModelError> {
        let state = self.state.read();
        if state.disposed {
            return Err(ModelError::Disposed(self.location()));
        }
        let mut packages: BTreeMap<String, Vec<TypeDescriptor>> = BTreeMap::new();
        for ty in state.types.keys() {
            packages
                .entry(ty.package_name().to_string())
                .or_default()
                .push(ty.clone());
        }
        Ok(packages.into_iter().collect())
    }

    fn contains(&self, ty: &TypeDescriptor) -> bool {
        let state = self.state.read();
        !state.disposed && state.types.contains_key(ty)
    }

    fn read(&self, ty: &TypeDescriptor) -> Result<Vec<u8>, ModelError> {
        let state = self.state.read();
        if state.disposed {
            return Err(ModelError::Disposed(self.location()));
        }
        state
            .types
            .get(ty)
            .cloned()
            .ok_or_else(|| ModelError::TypeNotFound(ty.qualified_name()))
    }

    fn verify(&self) -> Result<(), ModelError> {
        if self.state.read().disposed {
            return Err(ModelError::Disposed(self.location()));
        }
        Ok(())
    }

    fn dispose(&self) {
        self.state.write().disposed = true;
    }

    fn is_disposed(&self) -> bool {
        self.state.read().disposed
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}
