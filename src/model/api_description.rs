// Mon Oct 19 2026 - Alex

use super::error::ModelError;
use super::modifiers::{ApiAnnotations, RestrictionMask, Visibility};
use crate::descriptor::{ElementDescriptor, ElementKind, PackageDescriptor, TypeDescriptor};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SIDECAR_FILE: &str = ".api_description.json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Entry {
    visibility: Option<Visibility>,
    restrictions: RestrictionMask,
}

/// Visibility and restriction annotations of one component.
///
/// Visibility is inherited: an element without its own visibility takes the
/// one of its nearest annotated ancestor, and packages default to API.
/// Restrictions only ever apply to the element they were set on.
#[derive(Debug, Clone, Default)]
pub struct ApiDescription {
    entries: AHashMap<ElementDescriptor, Entry>,
}

impl ApiDescription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_visibility(&mut self, element: impl Into<ElementDescriptor>, visibility: Visibility) {
        self.entries.entry(element.into()).or_default().visibility = Some(visibility);
    }

    pub fn set_restrictions(&mut self, element: impl Into<ElementDescriptor>, restrictions: RestrictionMask) {
        self.entries.entry(element.into()).or_default().restrictions = restrictions;
    }

    pub fn annotate(&mut self, element: impl Into<ElementDescriptor>, visibility: Visibility, restrictions: RestrictionMask) {
        self.entries.insert(
            element.into(),
            Entry {
                visibility: Some(visibility),
                restrictions,
            },
        );
    }

    pub fn resolve(&self, element: &ElementDescriptor) -> ApiAnnotations {
        let restrictions = self
            .entries
            .get(element)
            .map(|e| e.restrictions)
            .unwrap_or_default();

        let mut visibility = None;
        let mut current = Some(element.clone());
        while let Some(el) = current {
            if let Some(v) = self.entries.get(&el).and_then(|e| e.visibility) {
                visibility = Some(v);
                break;
            }
            current = el.parent();
        }

        ApiAnnotations::new(visibility.unwrap_or(Visibility::Api), restrictions)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Elements carrying any restriction, sorted.
    pub fn restricted_elements(&self) -> Vec<(ElementDescriptor, RestrictionMask)> {
        let mut out: Vec<_> = self
            .entries
            .iter()
            .filter(|(_, e)| !e.restrictions.is_empty())
            .map(|(el, e)| (el.clone(), e.restrictions))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        let file: DescriptionFile = serde_json::from_str(json)?;
        let mut description = Self::new();
        for element in file.elements {
            let descriptor = element.descriptor()?;
            if let Some(v) = &element.visibility {
                let visibility =
                    Visibility::parse(v).ok_or_else(|| ModelError::InvalidAnnotation(format!("unknown visibility '{}'", v)))?;
                description.set_visibility(descriptor.clone(), visibility);
            }
            if !element.restrictions.is_empty() {
                let mask = RestrictionMask::parse_names(&element.restrictions).map_err(ModelError::InvalidAnnotation)?;
                description.set_restrictions(descriptor, mask);
            }
        }
        Ok(description)
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Loads `<dir>/.api_description.json` when present, an empty description
    /// otherwise.
    pub fn load_sidecar(dir: &Path) -> Result<Self, ModelError> {
        Self::load_if_present(&dir.join(SIDECAR_FILE))
    }

    /// Loads `<archive>.api_description.json` next to an archive when present.
    pub fn load_archive_sidecar(archive: &Path) -> Result<Self, ModelError> {
        let mut name = archive.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(SIDECAR_FILE);
        Self::load_if_present(&archive.with_file_name(name))
    }

    fn load_if_present(path: &Path) -> Result<Self, ModelError> {
        if path.is_file() {
            log::debug!("Loading API description from {}", path.display());
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct DescriptionFile {
    #[serde(default)]
    elements: Vec<ElementEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ElementEntry {
    kind: ElementKind,
    name: String,
    #[serde(rename = "type", default)]
    owner: Option<String>,
    #[serde(default)]
    signature: Option<String>,
    #[serde(default)]
    visibility: Option<String>,
    #[serde(default)]
    restrictions: Vec<String>,
}

impl ElementEntry {
    fn owner(&self) -> Result<TypeDescriptor, ModelError> {
        self.owner
            .as_deref()
            .map(TypeDescriptor::from_qualified_name)
            .ok_or_else(|| ModelError::InvalidAnnotation(format!("{} '{}' has no type", self.kind, self.name)))
    }

    fn descriptor(&self) -> Result<ElementDescriptor, ModelError> {
        Ok(match self.kind {
            ElementKind::Package => PackageDescriptor::new(&self.name).into(),
            ElementKind::Type => TypeDescriptor::from_qualified_name(&self.name).into(),
            ElementKind::Method => {
                let signature = self.signature.as_deref().ok_or_else(|| {
                    ModelError::InvalidAnnotation(format!("method '{}' has no signature", self.name))
                })?;
                self.owner()?.method(&self.name, signature).into()
            }
            ElementKind::Field => self.owner()?.field(&self.name).into(),
        })
    }
}
