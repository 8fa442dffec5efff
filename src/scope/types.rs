// Mon Oct 19 2026 - Alex

use super::SearchScope;
use crate::descriptor::{ElementDescriptor, TypeDescriptor};
use crate::model::{Component, ModelError};

/// An explicit list of types inside one component. Nested types of a listed
/// type are part of the scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeScope {
    component: String,
    types: Vec<TypeDescriptor>,
}

impl TypeScope {
    pub fn new(component: &str, types: Vec<TypeDescriptor>) -> Self {
        Self {
            component: component.to_string(),
            types,
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn types(&self) -> &[TypeDescriptor] {
        &self.types
    }

    fn covers(&self, ty: &TypeDescriptor) -> bool {
        self.types.iter().any(|t| t == ty || ty.is_nested_in(t))
    }
}

impl SearchScope for TypeScope {
    fn components(&self) -> Vec<String> {
        vec![self.component.clone()]
    }

    fn contains(&self, component: &str, element: &ElementDescriptor) -> bool {
        if component != self.component {
            return false;
        }
        match element {
            ElementDescriptor::Package(package) => self.types.iter().any(|t| t.package_name() == package.name()),
            other => other.type_descriptor().map_or(false, |ty| self.covers(ty)),
        }
    }

    fn enumerate_component(&self, component: &Component) -> Result<Vec<TypeDescriptor>, ModelError> {
        let types: Vec<TypeDescriptor> = component
            .types()?
            .into_iter()
            .filter(|ty| self.covers(ty))
            .collect();
        for ty in &self.types {
            if !types.contains(ty) {
                log::warn!("Type {} is not in component {}", ty, self.component);
            }
        }
        Ok(types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Baseline, MemoryStore};

    #[test]
    fn test_enumerates_listed_and_nested_types() {
        let store = MemoryStore::new()
            .with_type(TypeDescriptor::new("p", "A"), vec![1])
            .with_type(TypeDescriptor::new("p", "A$Inner"), vec![2])
            .with_type(TypeDescriptor::new("p", "B"), vec![3]);
        let baseline = Baseline::new("t").with_component(Component::in_memory("c", "1.0.0", store));

        let scope = TypeScope::new("c", vec![TypeDescriptor::new("p", "A"), TypeDescriptor::new("p", "Gone")]);
        let enumeration = scope.enumerate(&baseline);
        let names: Vec<String> = enumeration.types.iter().map(|(_, t)| t.name().to_string()).collect();
        assert_eq!(names, vec!["A".to_string(), "A$Inner".to_string()]);
    }

    #[test]
    fn test_contains_members_of_listed_types() {
        let scope = TypeScope::new("c", vec![TypeDescriptor::new("p", "A")]);
        let method: ElementDescriptor = TypeDescriptor::new("p", "A$Inner").method("run", "()V").into();
        assert!(scope.contains("c", &method));
        assert!(!scope.contains("other", &method));
        assert!(!scope.contains("c", &TypeDescriptor::new("p", "B").into()));
        assert!(scope.contains("c", &ElementDescriptor::Package(crate::descriptor::PackageDescriptor::new("p"))));
    }
}
