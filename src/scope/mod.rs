// Mon Oct 19 2026 - Alex

pub mod components;
pub mod types;

pub use components::ComponentsScope;
pub use types::TypeScope;

use crate::descriptor::{ElementDescriptor, TypeDescriptor};
use crate::model::{Baseline, Component, ModelError};
use std::collections::BTreeSet;

/// Types of a scope, in visiting order, plus the components that could not
/// be listed.
#[derive(Debug, Default)]
pub struct ScopeEnumeration {
    pub types: Vec<(String, TypeDescriptor)>,
    pub failures: Vec<(String, ModelError)>,
}

impl ScopeEnumeration {
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// The set of types a search visits.
pub trait SearchScope: Send + Sync {
    /// Component ids in visiting order.
    fn components(&self) -> Vec<String>;

    fn contains(&self, component: &str, element: &ElementDescriptor) -> bool;

    /// Types of `component` inside this scope.
    fn enumerate_component(&self, component: &Component) -> Result<Vec<TypeDescriptor>, ModelError>;

    fn enumerate(&self, baseline: &Baseline) -> ScopeEnumeration {
        let mut enumeration = ScopeEnumeration::default();
        for id in self.components() {
            let component = match baseline.component(&id) {
                Some(component) => component,
                None => {
                    enumeration.failures.push((id.clone(), ModelError::ComponentNotFound(id)));
                    continue;
                }
            };
            match component.verify().and_then(|_| self.enumerate_component(component)) {
                Ok(types) => enumeration
                    .types
                    .extend(types.into_iter().map(|ty| (id.clone(), ty))),
                Err(e) => {
                    log::warn!("Cannot enumerate component {}: {}", id, e);
                    enumeration.failures.push((id, e));
                }
            }
        }
        enumeration
    }

    /// Distinct package names covered by the scope.
    fn package_names(&self, baseline: &Baseline) -> Vec<String> {
        self.enumerate(baseline)
            .types
            .iter()
            .map(|(_, ty)| ty.package_name().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
