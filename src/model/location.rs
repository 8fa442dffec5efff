// Mon Oct 19 2026 - Alex

use crate::descriptor::{ElementDescriptor, TypeDescriptor};
use std::fmt;

/// Where an element lives: the owning component (when known) plus the
/// element itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    component: Option<String>,
    member: ElementDescriptor,
}

impl Location {
    pub fn new(component: &str, member: impl Into<ElementDescriptor>) -> Self {
        Self {
            component: Some(component.to_string()),
            member: member.into(),
        }
    }

    /// A location whose owning component could not be determined.
    pub fn unowned(member: impl Into<ElementDescriptor>) -> Self {
        Self {
            component: None,
            member: member.into(),
        }
    }

    pub fn component(&self) -> Option<&str> {
        self.component.as_deref()
    }

    pub fn member(&self) -> &ElementDescriptor {
        &self.member
    }

    pub fn type_descriptor(&self) -> Option<&TypeDescriptor> {
        self.member.type_descriptor()
    }

    pub fn has_component(&self) -> bool {
        self.component.is_some()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.component {
            Some(component) => write!(f, "{} [{}]", self.member, component),
            None => write!(f, "{} [?]", self.member),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_needs_component_and_member() {
        let t = TypeDescriptor::new("p", "A");
        assert_eq!(Location::new("c", t.clone()), Location::new("c", t.clone()));
        assert_ne!(Location::new("c", t.clone()), Location::new("d", t.clone()));
        assert_ne!(Location::new("c", t.clone()), Location::unowned(t.clone()));
        assert_eq!(Location::new("c", t.method("m", "()V")).type_descriptor(), Some(&t));
    }

    #[test]
    fn test_display() {
        let loc = Location::new("comp", TypeDescriptor::new("p", "A").method("m", "(I)V"));
        assert_eq!(loc.to_string(), "p.A.m(I)V [comp]");
    }
}
