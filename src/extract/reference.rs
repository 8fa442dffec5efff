// Mon Oct 19 2026 - Alex

use crate::descriptor::ElementDescriptor;
use crate::model::{ApiAnnotations, Location, ReferenceKind, ReferenceType, RestrictionMask, Visibility};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A reference as read from one binary, before any baseline lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawReference {
    source: ElementDescriptor,
    target: ElementDescriptor,
    kind: ReferenceKind,
    line: Option<u16>,
}

impl RawReference {
    pub fn new(source: impl Into<ElementDescriptor>, target: impl Into<ElementDescriptor>, kind: ReferenceKind) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
            line: None,
        }
    }

    pub fn with_line(mut self, line: Option<u16>) -> Self {
        self.line = line;
        self
    }

    pub fn source(&self) -> &ElementDescriptor {
        &self.source
    }

    pub fn target(&self) -> &ElementDescriptor {
        &self.target
    }

    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    pub fn line(&self) -> Option<u16> {
        self.line
    }
}

/// A resolved reference edge. Equality and hashing only look at source,
/// target and kind, so sets from two snapshots of the same code compare equal.
#[derive(Debug, Clone)]
pub struct Reference {
    source: Location,
    target: Location,
    kind: ReferenceKind,
    line: Option<u16>,
    annotations: Option<ApiAnnotations>,
}

impl Reference {
    pub fn new(source: Location, target: Location, kind: ReferenceKind) -> Self {
        Self {
            source,
            target,
            kind,
            line: None,
            annotations: None,
        }
    }

    pub fn with_line(mut self, line: Option<u16>) -> Self {
        self.line = line;
        self
    }

    pub fn with_annotations(mut self, annotations: Option<ApiAnnotations>) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn source(&self) -> &Location {
        &self.source
    }

    pub fn target(&self) -> &Location {
        &self.target
    }

    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    pub fn line(&self) -> Option<u16> {
        self.line
    }

    pub fn annotations(&self) -> Option<&ApiAnnotations> {
        self.annotations.as_ref()
    }

    pub fn is_resolved(&self) -> bool {
        self.annotations.is_some()
    }

    pub fn visibility(&self) -> Option<Visibility> {
        self.annotations.map(|a| a.visibility)
    }

    pub fn restrictions(&self) -> Option<RestrictionMask> {
        self.annotations.map(|a| a.restrictions)
    }

    pub fn reference_type(&self) -> ReferenceType {
        self.kind.reference_type()
    }

    pub fn source_component(&self) -> Option<&str> {
        self.source.component()
    }

    pub fn target_component(&self) -> Option<&str> {
        self.target.component()
    }

    fn key(&self) -> (&Location, &Location, ReferenceKind) {
        (&self.source, &self.target, self.kind)
    }
}

impl PartialEq for Reference {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Reference {}

impl Hash for Reference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Reference {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Reference {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --{}--> {}", self.source, self.kind, self.target)?;
        if let Some(line) = self.line {
            write!(f, " (line {})", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::TypeDescriptor;
    use std::collections::HashSet;

    #[test]
    fn test_equality_ignores_line_and_annotations() {
        let a = TypeDescriptor::new("p", "A");
        let b = TypeDescriptor::new("p", "B");
        let r1 = Reference::new(Location::new("c", b.clone()), Location::new("c", a.clone()), ReferenceKind::Extends)
            .with_line(Some(3))
            .with_annotations(Some(ApiAnnotations::default()));
        let r2 = Reference::new(Location::new("c", b.clone()), Location::new("c", a.clone()), ReferenceKind::Extends);
        assert_eq!(r1, r2);

        let mut set = HashSet::new();
        set.insert(r1);
        assert!(!set.insert(r2));
    }

    #[test]
    fn test_kind_is_part_of_identity() {
        let a = TypeDescriptor::new("p", "A");
        let m = a.method("<init>", "()V");
        let call = Reference::new(Location::new("c", a.clone()), Location::new("c", m.clone()), ReferenceKind::SpecialMethodCall);
        let other = Reference::new(Location::new("c", a), Location::new("c", m), ReferenceKind::VirtualMethodCall);
        assert_ne!(call, other);
        assert!(!call.is_resolved());
        assert_eq!(call.reference_type(), ReferenceType::Method);
    }
}
