// Mon Oct 19 2026 - Alex

pub mod classfile;
pub mod config;
pub mod descriptor;
pub mod extract;
pub mod model;
pub mod output;
pub mod scope;
pub mod search;
pub mod ui;
pub mod utils;

pub use config::SearchConfig;
pub use descriptor::{ElementDescriptor, ElementKind, TypeDescriptor};
pub use extract::{extract, Reference, ReferenceExtractor, ReferenceResolver};
pub use model::{Baseline, Component, ReferenceKind, ReferenceKindMask, RestrictionMask, Visibility, VisibilityMask};
pub use output::{JsonReportWriter, OutputFormat, SummaryPrinter, XmlReportWriter};
pub use scope::{ComponentsScope, SearchScope, TypeScope};
pub use search::{SearchCriteria, SearchEngine, SearchError, SearchResult};
