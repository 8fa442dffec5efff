// Mon Oct 19 2026 - Alex

use super::error::SearchError;
use crate::descriptor::{ElementDescriptor, ElementKind, TypeDescriptor};
use crate::extract::Reference;
use crate::model::{ReferenceKindMask, RestrictionMask, VisibilityMask};
use ahash::AHashMap;
use regex::Regex;

/// Which restriction sets a criterion accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestrictionMatch {
    /// Every restriction set, including none.
    #[default]
    Any,
    /// Restriction sets sharing at least one bit with the mask.
    Mask(RestrictionMask),
}

impl RestrictionMatch {
    pub fn matches(&self, restrictions: RestrictionMask) -> bool {
        match self {
            RestrictionMatch::Any => true,
            RestrictionMatch::Mask(mask) => mask.intersects(restrictions),
        }
    }
}

/// A regular expression over one part of the target's name. The expression
/// must match the whole name.
#[derive(Debug, Clone)]
pub struct PatternRestriction {
    pattern: String,
    regex: Regex,
    kind: ElementKind,
}

impl PatternRestriction {
    pub fn new(pattern: &str, kind: ElementKind) -> Result<Self, SearchError> {
        let regex = Regex::new(&format!("^(?:{})$", pattern))
            .map_err(|e| SearchError::InvalidCriteria(format!("bad pattern '{}': {}", pattern, e)))?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            kind,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Package patterns see the element's package, type patterns the
    /// qualified name of its type and then of each enclosing type, method and
    /// field patterns the simple member name.
    pub fn matches(&self, element: &ElementDescriptor) -> bool {
        match self.kind {
            ElementKind::Package => self.regex.is_match(element.package_name()),
            ElementKind::Type => match element.type_descriptor() {
                Some(ty) => self.matches_type(ty),
                None => false,
            },
            ElementKind::Method => matches!(element, ElementDescriptor::Method(m) if self.regex.is_match(m.name())),
            ElementKind::Field => matches!(element, ElementDescriptor::Field(f) if self.regex.is_match(f.name())),
        }
    }

    fn matches_type(&self, ty: &TypeDescriptor) -> bool {
        let mut current = Some(ty.clone());
        while let Some(ty) = current {
            if self.regex.is_match(&ty.qualified_name()) {
                return true;
            }
            current = ty.enclosing_type();
        }
        false
    }
}

/// An immutable reference filter. Built with [`SearchCriteriaBuilder`].
#[derive(Debug, Clone)]
pub struct SearchCriteria {
    kinds: ReferenceKindMask,
    visibilities: VisibilityMask,
    restrictions: RestrictionMatch,
    elements: AHashMap<String, Vec<ElementDescriptor>>,
    patterns: Vec<PatternRestriction>,
    components: Vec<String>,
    source_filter: Vec<String>,
}

impl SearchCriteria {
    pub fn builder() -> SearchCriteriaBuilder {
        SearchCriteriaBuilder::new()
    }

    pub fn kinds(&self) -> ReferenceKindMask {
        self.kinds
    }

    pub fn visibilities(&self) -> VisibilityMask {
        self.visibilities
    }

    pub fn restrictions(&self) -> RestrictionMatch {
        self.restrictions
    }

    pub fn patterns(&self) -> &[PatternRestriction] {
        &self.patterns
    }

    pub fn source_filter(&self) -> &[String] {
        &self.source_filter
    }

    pub fn matches(&self, reference: &Reference) -> bool {
        self.matches_kind(reference)
            && self.matches_annotations(reference)
            && self.matches_target(reference)
            && self.matches_source(reference)
    }

    pub fn matches_kind(&self, reference: &Reference) -> bool {
        self.kinds.contains_kind(reference.kind())
    }

    fn matches_annotations(&self, reference: &Reference) -> bool {
        match reference.annotations() {
            Some(annotations) => {
                self.visibilities.contains_visibility(annotations.visibility)
                    && self.restrictions.matches(annotations.restrictions)
            }
            None => false,
        }
    }

    fn matches_target(&self, reference: &Reference) -> bool {
        let target = reference.target();
        let component = target.component().unwrap_or_default();

        if !self.elements.is_empty() {
            let enclosed = self
                .elements
                .get(component)
                .map_or(false, |leaves| leaves.is_empty() || leaves.iter().any(|leaf| leaf.encloses(target.member())));
            if !enclosed {
                return false;
            }
        }
        if !self.patterns.is_empty() && !self.patterns.iter().any(|p| p.matches(target.member())) {
            return false;
        }
        if !self.components.is_empty() && !self.components.iter().any(|c| c == component) {
            return false;
        }
        true
    }

    fn matches_source(&self, reference: &Reference) -> bool {
        match reference.source_component() {
            Some(source) => !self.source_filter.iter().any(|c| c == source),
            None => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchCriteriaBuilder {
    kinds: ReferenceKindMask,
    visibilities: VisibilityMask,
    restrictions: RestrictionMatch,
    elements: AHashMap<String, Vec<ElementDescriptor>>,
    patterns: Vec<(String, ElementKind)>,
    components: Vec<String>,
    source_filter: Vec<String>,
}

impl Default for SearchCriteriaBuilder {
    fn default() -> Self {
        Self {
            kinds: ReferenceKindMask::all(),
            visibilities: VisibilityMask::all(),
            restrictions: RestrictionMatch::Any,
            elements: AHashMap::new(),
            patterns: Vec::new(),
            components: Vec::new(),
            source_filter: Vec::new(),
        }
    }
}

impl SearchCriteriaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kinds(mut self, kinds: ReferenceKindMask) -> Self {
        self.kinds = kinds;
        self
    }

    pub fn visibilities(mut self, visibilities: VisibilityMask) -> Self {
        self.visibilities = visibilities;
        self
    }

    pub fn restrictions(mut self, restrictions: RestrictionMatch) -> Self {
        self.restrictions = restrictions;
        self
    }

    pub fn restriction_mask(self, mask: RestrictionMask) -> Self {
        self.restrictions(RestrictionMatch::Mask(mask))
    }

    /// Limits targets to `elements` (and what they enclose) inside
    /// `component`. Elements already enclosed by a listed one are dropped.
    pub fn element_restriction(mut self, component: &str, elements: Vec<ElementDescriptor>) -> Self {
        let leaves = self.elements.entry(component.to_string()).or_default();
        for element in elements {
            if leaves.iter().any(|leaf| leaf.encloses(&element)) {
                continue;
            }
            leaves.retain(|leaf| !element.encloses(leaf));
            leaves.push(element);
        }
        self
    }

    pub fn pattern_restriction(mut self, pattern: &str, kind: ElementKind) -> Self {
        self.patterns.push((pattern.to_string(), kind));
        self
    }

    pub fn component_restriction(mut self, component: &str) -> Self {
        if !self.components.iter().any(|c| c == component) {
            self.components.push(component.to_string());
        }
        self
    }

    pub fn source_filter(mut self, component: &str) -> Self {
        if !self.source_filter.iter().any(|c| c == component) {
            self.source_filter.push(component.to_string());
        }
        self
    }

    pub fn build(self) -> Result<SearchCriteria, SearchError> {
        if self.kinds.is_empty() {
            return Err(SearchError::InvalidCriteria("no reference kinds selected".to_string()));
        }
        if self.visibilities.is_empty() {
            return Err(SearchError::InvalidCriteria("no visibilities selected".to_string()));
        }
        if self.restrictions == RestrictionMatch::Mask(RestrictionMask::NO_RESTRICTIONS) {
            return Err(SearchError::InvalidCriteria(
                "an empty restriction mask matches nothing".to_string(),
            ));
        }
        let patterns = self
            .patterns
            .iter()
            .map(|(pattern, kind)| PatternRestriction::new(pattern, *kind))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SearchCriteria {
            kinds: self.kinds,
            visibilities: self.visibilities,
            restrictions: self.restrictions,
            elements: self.elements,
            patterns,
            components: self.components,
            source_filter: self.source_filter,
        })
    }
}

/// Union of the kinds any of `criteria` looks for.
pub fn combined_kinds(criteria: &[SearchCriteria]) -> ReferenceKindMask {
    criteria
        .iter()
        .fold(ReferenceKindMask::empty(), |mask, c| mask | c.kinds())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ApiAnnotations, Location, ReferenceKind, Visibility};

    fn reference(target: impl Into<ElementDescriptor>, kind: ReferenceKind, annotations: Option<ApiAnnotations>) -> Reference {
        let source = TypeDescriptor::new("app", "Client");
        let target = target.into();
        let target = if annotations.is_some() {
            Location::new("lib", target)
        } else {
            Location::unowned(target)
        };
        Reference::new(Location::new("app", source), target, kind).with_annotations(annotations)
    }

    fn restricted(mask: RestrictionMask) -> Option<ApiAnnotations> {
        Some(ApiAnnotations::new(Visibility::Api, mask))
    }

    #[test]
    fn test_kind_and_restriction_filters() {
        let criteria = SearchCriteria::builder()
            .kinds(ReferenceKind::Extends.into())
            .restriction_mask(RestrictionMask::NO_EXTEND)
            .build()
            .unwrap();
        let base = TypeDescriptor::new("lib", "Base");

        assert!(criteria.matches(&reference(base.clone(), ReferenceKind::Extends, restricted(RestrictionMask::NO_EXTEND))));
        assert!(!criteria.matches(&reference(base.clone(), ReferenceKind::Extends, restricted(RestrictionMask::empty()))));
        assert!(!criteria.matches(&reference(base.clone(), ReferenceKind::Implements, restricted(RestrictionMask::NO_EXTEND))));
        assert!(!criteria.matches(&reference(base, ReferenceKind::Extends, None)));
    }

    #[test]
    fn test_any_restrictions_still_need_resolution() {
        let criteria = SearchCriteria::builder().build().unwrap();
        let base = TypeDescriptor::new("lib", "Base");
        assert!(criteria.matches(&reference(base.clone(), ReferenceKind::Extends, restricted(RestrictionMask::empty()))));
        assert!(!criteria.matches(&reference(base, ReferenceKind::Extends, None)));
    }

    #[test]
    fn test_visibility_mask() {
        let criteria = SearchCriteria::builder()
            .visibilities(VisibilityMask::PRIVATE)
            .build()
            .unwrap();
        let base = TypeDescriptor::new("lib", "Base");
        let private = Some(ApiAnnotations::new(Visibility::Private, RestrictionMask::empty()));
        assert!(criteria.matches(&reference(base.clone(), ReferenceKind::Extends, private)));
        assert!(!criteria.matches(&reference(base, ReferenceKind::Extends, restricted(RestrictionMask::empty()))));
    }

    #[test]
    fn test_pattern_on_method_names() {
        let criteria = SearchCriteria::builder()
            .pattern_restriction("no.*", ElementKind::Method)
            .build()
            .unwrap();
        let ty = TypeDescriptor::new("lib", "Base");
        assert!(criteria.matches(&reference(ty.method("noReference", "()V"), ReferenceKind::VirtualMethodCall, restricted(RestrictionMask::empty()))));
        assert!(!criteria.matches(&reference(ty.method("annotated", "()V"), ReferenceKind::VirtualMethodCall, restricted(RestrictionMask::empty()))));
        assert!(!criteria.matches(&reference(ty.field("noField"), ReferenceKind::GetField, restricted(RestrictionMask::empty()))));
    }

    #[test]
    fn test_type_pattern_tries_enclosing_types() {
        let pattern = PatternRestriction::new("lib\\.Outer", ElementKind::Type).unwrap();
        let inner: ElementDescriptor = TypeDescriptor::new("lib", "Outer$Inner").method("go", "()V").into();
        assert!(pattern.matches(&inner));
        assert!(!pattern.matches(&TypeDescriptor::new("lib", "Outer2").into()));

        let package = PatternRestriction::new("lib(\\..*)?", ElementKind::Package).unwrap();
        assert!(package.matches(&inner));
    }

    #[test]
    fn test_invalid_pattern_fails_at_build() {
        let err = SearchCriteria::builder()
            .pattern_restriction("(unclosed", ElementKind::Type)
            .build()
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidCriteria(_)));
    }

    #[test]
    fn test_element_restriction_encloses_members() {
        let base = TypeDescriptor::new("lib", "Base");
        let criteria = SearchCriteria::builder()
            .element_restriction("lib", vec![base.method("run", "()V").into(), base.clone().into()])
            .build()
            .unwrap();
        assert_eq!(criteria.elements.get("lib").map(Vec::len), Some(1));
        assert!(criteria.matches(&reference(base.method("stop", "()V"), ReferenceKind::VirtualMethodCall, restricted(RestrictionMask::empty()))));
        assert!(!criteria.matches(&reference(TypeDescriptor::new("lib", "Other"), ReferenceKind::Extends, restricted(RestrictionMask::empty()))));
    }

    #[test]
    fn test_component_restriction_and_source_filter() {
        let base = TypeDescriptor::new("lib", "Base");
        let only_other = SearchCriteria::builder().component_restriction("other").build().unwrap();
        assert!(!only_other.matches(&reference(base.clone(), ReferenceKind::Extends, restricted(RestrictionMask::empty()))));

        let filtered = SearchCriteria::builder().source_filter("app").build().unwrap();
        assert!(!filtered.matches(&reference(base, ReferenceKind::Extends, restricted(RestrictionMask::empty()))));
    }

    #[test]
    fn test_combined_kinds() {
        let a = SearchCriteria::builder().kinds(ReferenceKind::Extends.into()).build().unwrap();
        let b = SearchCriteria::builder().kinds(ReferenceKindMask::FIELD_ACCESS).build().unwrap();
        let kinds = combined_kinds(&[a, b]);
        assert!(kinds.contains_kind(ReferenceKind::Extends));
        assert!(kinds.contains_kind(ReferenceKind::PutStatic));
        assert!(!kinds.contains_kind(ReferenceKind::Override));
    }
}
