// Mon Oct 19 2026 - Alex

use super::SearchScope;
use crate::descriptor::{ElementDescriptor, TypeDescriptor};
use crate::model::{Baseline, Component, ModelError};

/// Every type of a set of components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentsScope {
    components: Vec<String>,
}

impl ComponentsScope {
    pub fn new<S: AsRef<str>>(components: &[S]) -> Self {
        let mut ids: Vec<String> = Vec::with_capacity(components.len());
        for id in components {
            let id = id.as_ref().to_string();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Self { components: ids }
    }

    /// All components of `baseline`, in baseline order.
    pub fn all(baseline: &Baseline) -> Self {
        Self {
            components: baseline.component_ids(),
        }
    }

    pub fn single(component: &str) -> Self {
        Self::new(&[component])
    }
}

impl SearchScope for ComponentsScope {
    fn components(&self) -> Vec<String> {
        self.components.clone()
    }

    fn contains(&self, component: &str, _element: &ElementDescriptor) -> bool {
        self.components.iter().any(|id| id == component)
    }

    fn enumerate_component(&self, component: &Component) -> Result<Vec<TypeDescriptor>, ModelError> {
        component.types()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MemoryStore;

    fn baseline() -> Baseline {
        let a = MemoryStore::new()
            .with_type(TypeDescriptor::new("a", "One"), vec![1])
            .with_type(TypeDescriptor::new("a.b", "Two"), vec![2]);
        let b = MemoryStore::new().with_type(TypeDescriptor::new("b", "Three"), vec![3]);
        Baseline::new("scope")
            .with_component(Component::in_memory("comp.a", "1.0.0", a))
            .with_component(Component::in_memory("comp.b", "1.0.0", b))
    }

    #[test]
    fn test_enumerate_matches_component_listing() {
        let baseline = baseline();
        let scope = ComponentsScope::all(&baseline);
        let enumeration = scope.enumerate(&baseline);
        assert!(enumeration.failures.is_empty());

        let mut direct = Vec::new();
        for component in baseline.components() {
            for ty in component.types().unwrap() {
                direct.push((component.id().to_string(), ty));
            }
        }
        assert_eq!(enumeration.types, direct);
    }

    #[test]
    fn test_unknown_and_disposed_components_fail_alone() {
        let baseline = baseline();
        baseline.component("comp.b").unwrap().dispose();
        let scope = ComponentsScope::new(&["comp.a", "comp.b", "missing", "comp.a"]);
        assert_eq!(scope.components().len(), 3);

        let enumeration = scope.enumerate(&baseline);
        assert_eq!(enumeration.len(), 2);
        assert_eq!(enumeration.failures.len(), 2);
        assert!(matches!(enumeration.failures[1].1, ModelError::ComponentNotFound(_)));
    }

    #[test]
    fn test_contains_and_packages() {
        let baseline = baseline();
        let scope = ComponentsScope::single("comp.a");
        let ty: ElementDescriptor = TypeDescriptor::new("b", "Three").into();
        assert!(scope.contains("comp.a", &ty));
        assert!(!scope.contains("comp.b", &ty));
        assert_eq!(scope.package_names(&baseline), vec!["a".to_string(), "a.b".to_string()]);
    }
}
