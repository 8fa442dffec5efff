// Mon Oct 19 2026 - Alex

pub mod criteria;
pub mod diff;
pub mod engine;
pub mod error;
pub mod progress;
pub mod result;

pub use criteria::{combined_kinds, PatternRestriction, RestrictionMatch, SearchCriteria, SearchCriteriaBuilder};
pub use diff::{diff, intersection};
pub use engine::SearchEngine;
pub use error::SearchError;
pub use progress::{CancellationToken, CountingMonitor, NullProgressMonitor, ProgressMonitor};
pub use result::{ComponentProblem, ExtractionProblem, SearchResult, SearchStats};
