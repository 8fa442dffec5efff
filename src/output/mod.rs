// Mon Oct 19 2026 - Alex

pub mod error;
pub mod json;
pub mod summary;
pub mod xml;

pub use error::OutputError;
pub use json::JsonReportWriter;
pub use summary::SummaryPrinter;
pub use xml::XmlReportWriter;

use crate::extract::Reference;
use crate::model::{Baseline, Location, Visibility};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Xml,
    Json,
}

impl OutputFormat {
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Xml => "xml",
            OutputFormat::Json => "json",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(OutputFormat::Text),
            "xml" => Some(OutputFormat::Xml),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Report label for an unresolved target's group.
pub const UNRESOLVED: &str = "unresolved";

/// Flat, serializable view of one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationRecord {
    pub component: Option<String>,
    pub kind: &'static str,
    pub element: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl From<&Location> for LocationRecord {
    fn from(location: &Location) -> Self {
        let member = location.member();
        Self {
            component: location.component().map(str::to_string),
            kind: member.kind().name(),
            element: member.qualified_name(),
            signature: member.signature().map(str::to_string),
        }
    }
}

/// Flat, serializable view of one reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceRecord {
    pub kind: &'static str,
    pub reference_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u16>,
    pub visibility: String,
    pub restrictions: Vec<&'static str>,
    pub source: LocationRecord,
    pub target: LocationRecord,
}

impl ReferenceRecord {
    pub fn new(reference: &Reference, baseline: Option<&Baseline>) -> Self {
        Self {
            kind: reference.kind().name(),
            reference_type: reference.reference_type().name(),
            line: reference.line(),
            visibility: report_visibility(reference, baseline),
            restrictions: reference.restrictions().map(|r| r.names()).unwrap_or_default(),
            source: reference.source().into(),
            target: reference.target().into(),
        }
    }
}

/// Visibility as reports show it. Private targets reached from a fragment of
/// their own component are permissible; unresolved targets report `ALL`.
pub fn report_visibility(reference: &Reference, baseline: Option<&Baseline>) -> String {
    let visibility = match reference.visibility() {
        Some(visibility) => visibility,
        None => return "ALL".to_string(),
    };
    if visibility == Visibility::Private {
        let host = baseline
            .zip(reference.source_component())
            .and_then(|(baseline, source)| baseline.component(source))
            .and_then(|component| component.host());
        if host.is_some() && host == reference.target_component() {
            return Visibility::PrivatePermissible.name().to_string();
        }
    }
    visibility.name().to_string()
}

/// `id (version)` when the baseline knows the component.
pub fn component_label(component: Option<&str>, baseline: Option<&Baseline>) -> String {
    match component {
        Some(id) => baseline
            .and_then(|b| b.component(id))
            .map(|c| c.display_name())
            .unwrap_or_else(|| id.to_string()),
        None => UNRESOLVED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::TypeDescriptor;
    use crate::model::{ApiAnnotations, Component, MemoryStore, ReferenceKind, RestrictionMask};

    #[test]
    fn test_record_from_reference() {
        let reference = Reference::new(
            Location::new("b", TypeDescriptor::new("p", "User").method("go", "()V")),
            Location::new("a", TypeDescriptor::new("q", "Api").method("call", "(I)V")),
            ReferenceKind::VirtualMethodCall,
        )
        .with_line(Some(4))
        .with_annotations(Some(ApiAnnotations::new(Visibility::Api, RestrictionMask::NO_REFERENCE)));

        let record = ReferenceRecord::new(&reference, None);
        assert_eq!(record.kind, "VIRTUAL_METHOD_CALL");
        assert_eq!(record.reference_type, "method");
        assert_eq!(record.restrictions, vec!["NO_REFERENCE"]);
        assert_eq!(record.target.element, "q.Api.call");
        assert_eq!(record.target.signature.as_deref(), Some("(I)V"));
        assert_eq!(record.visibility, "API");
    }

    #[test]
    fn test_fragment_private_access_is_permissible() {
        let baseline = Baseline::new("b")
            .with_component(Component::in_memory("host", "1.0.0", MemoryStore::new()))
            .with_component(Component::in_memory("frag", "1.0.0", MemoryStore::new()).as_fragment_of("host"));
        let private = Some(ApiAnnotations::new(Visibility::Private, RestrictionMask::empty()));
        let from = |component: &str| {
            Reference::new(
                Location::new(component, TypeDescriptor::new("f", "F")),
                Location::new("host", TypeDescriptor::new("h", "Internal")),
                ReferenceKind::Extends,
            )
            .with_annotations(private)
        };

        assert_eq!(report_visibility(&from("frag"), Some(&baseline)), "PRIVATE_PERMISSIBLE");
        assert_eq!(report_visibility(&from("host"), Some(&baseline)), "PRIVATE");
        assert_eq!(component_label(Some("frag"), Some(&baseline)), "frag (1.0.0)");
        assert_eq!(component_label(None, Some(&baseline)), UNRESOLVED);
    }
}
