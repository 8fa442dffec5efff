// Mon Oct 19 2026 - Alex

use super::component::Component;
use crate::descriptor::TypeDescriptor;
use ahash::AHashMap;
use indexmap::IndexMap;

/// A snapshot of components. The baseline owns its components and disposes
/// them when dropped.
pub struct Baseline {
    name: String,
    components: IndexMap<String, Component>,
    package_index: AHashMap<String, Vec<String>>,
    disposed: bool,
}

impl Baseline {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            components: IndexMap::new(),
            package_index: AHashMap::new(),
            disposed: false,
        }
    }

    /// Adds a component and indexes its packages. A component whose store
    /// cannot be listed is still added; searches report it.
    pub fn add_component(&mut self, component: Component) {
        let id = component.id().to_string();
        match component.package_names() {
            Ok(packages) => {
                for package in packages {
                    let providers = self.package_index.entry(package).or_default();
                    if !providers.contains(&id) {
                        providers.push(id.clone());
                    }
                }
            }
            Err(e) => log::warn!("Could not index packages of {}: {}", id, e),
        }
        if let Some(previous) = self.components.insert(id.clone(), component) {
            log::warn!("Component {} replaced in baseline {}", id, self.name);
            previous.dispose();
        }
    }

    pub fn with_component(mut self, component: Component) -> Self {
        self.add_component(component);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    pub fn component_ids(&self) -> Vec<String> {
        self.components.keys().cloned().collect()
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.get(id)
    }

    pub fn system_component(&self) -> Option<&Component> {
        self.components.values().find(|c| c.is_system())
    }

    /// Components providing `package`, in the order a reference from
    /// `source` sees them: the source itself, its host when it is a
    /// fragment, fragments attached to it, then everyone else in baseline
    /// order. `java.*` packages only come from the system component.
    pub fn resolve_package(&self, source: &str, package: &str) -> Vec<&Component> {
        if package == "java" || package.starts_with("java.") {
            return self.system_component().into_iter().collect();
        }

        let providers = match self.package_index.get(package) {
            Some(providers) => providers,
            None => return Vec::new(),
        };

        let host = self.components.get(source).and_then(|c| c.host());
        let rank = |id: &str| -> u8 {
            if id == source {
                0
            } else if Some(id) == host {
                1
            } else if self.components.get(id).and_then(|c| c.host()) == Some(source) {
                2
            } else {
                3
            }
        };

        let mut ordered: Vec<&String> = providers.iter().collect();
        ordered.sort_by_key(|id| rank(id.as_str()));
        ordered
            .into_iter()
            .filter_map(|id| self.components.get(id))
            .collect()
    }

    /// The component a reference from `source` to `ty` lands in.
    pub fn find_type_owner(&self, source: &str, ty: &TypeDescriptor) -> Option<&Component> {
        self.resolve_package(source, ty.package_name())
            .into_iter()
            .find(|c| c.contains_type(ty))
    }

    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        for component in self.components.values() {
            component.dispose();
        }
        self.disposed = true;
        log::debug!("Baseline {} disposed", self.name);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

impl Drop for Baseline {
    fn drop(&mut self) {
        self.dispose();
    }
}
