// Mon Oct 19 2026 - Alex

use crate::descriptor::TypeDescriptor;
use crate::extract::Reference;
use serde::Serialize;
use std::time::Duration;

/// A type that could not be read or decoded. The rest of the scan goes on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionProblem {
    pub component: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub message: String,
}

/// A component whose store could not be opened or listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentProblem {
    pub component: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchStats {
    pub components: usize,
    pub types_scanned: usize,
    pub types_failed: usize,
    pub total_references: usize,
    pub resolved_references: usize,
    pub matched_references: usize,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl SearchStats {
    pub fn unresolved_references(&self) -> usize {
        self.total_references - self.resolved_references
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    /// Matching references, deduplicated, in discovery order.
    pub matches: Vec<Reference>,
    /// References whose target component could not be found.
    pub unresolved: Vec<Reference>,
    pub extraction_problems: Vec<ExtractionProblem>,
    pub component_problems: Vec<ComponentProblem>,
    pub stats: SearchStats,
    /// Set when the monitor cancelled the scan; the other fields hold what was
    /// found before.
    pub cancelled: bool,
    /// Types visited, in scope order.
    pub scanned: Vec<(String, TypeDescriptor)>,
}

impl SearchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn references(&self) -> &[Reference] {
        &self.matches
    }

    pub fn into_references(self) -> Vec<Reference> {
        self.matches
    }

    pub fn unresolved_count(&self) -> usize {
        self.stats.unresolved_references()
    }

    pub fn has_problems(&self) -> bool {
        !self.extraction_problems.is_empty() || !self.component_problems.is_empty()
    }

    pub fn matches_from(&self, component: &str) -> impl Iterator<Item = &Reference> + '_ {
        let component = component.to_string();
        self.matches
            .iter()
            .filter(move |r| r.source_component() == Some(component.as_str()))
    }
}
