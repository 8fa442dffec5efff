// Mon Oct 19 2026 - Alex

use super::criteria::{combined_kinds, SearchCriteria};
use super::error::SearchError;
use super::progress::{NullProgressMonitor, ProgressMonitor};
use super::result::{ComponentProblem, ExtractionProblem, SearchResult};
use crate::descriptor::TypeDescriptor;
use crate::extract::{ExtractOptions, Reference, ReferenceExtractor, ReferenceResolver};
use crate::model::{Baseline, ModelError};
use crate::scope::SearchScope;
use crate::utils::logging::ScopedTimer;
use indexmap::IndexSet;
use rayon::prelude::*;
use std::time::Instant;

enum TypeOutcome {
    Scanned(Vec<Reference>),
    Failed(ExtractionProblem),
    Cancelled,
}

/// Runs reference searches over one baseline.
pub struct SearchEngine<'a> {
    baseline: &'a Baseline,
    threads: usize,
    include_self_references: bool,
}

impl<'a> SearchEngine<'a> {
    pub fn new(baseline: &'a Baseline) -> Self {
        Self {
            baseline,
            threads: num_cpus::get(),
            include_self_references: false,
        }
    }

    /// Worker threads for extraction. `1` scans on the calling thread.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn with_self_references(mut self, include: bool) -> Self {
        self.include_self_references = include;
        self
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn search(&self, scope: &dyn SearchScope, criteria: &[SearchCriteria]) -> Result<SearchResult, SearchError> {
        self.search_with_progress(scope, criteria, &NullProgressMonitor)
    }

    /// Scans every type of `scope` and keeps the references matching any of
    /// `criteria`. A cancelled search still returns what it found.
    pub fn search_with_progress(
        &self,
        scope: &dyn SearchScope,
        criteria: &[SearchCriteria],
        monitor: &dyn ProgressMonitor,
    ) -> Result<SearchResult, SearchError> {
        if criteria.is_empty() {
            return Err(SearchError::InvalidCriteria("at least one criterion is required".to_string()));
        }
        if self.baseline.is_disposed() {
            return Err(ModelError::Disposed(self.baseline.name().to_string()).into());
        }

        let _timer = ScopedTimer::new("search");
        let started = Instant::now();
        let kinds = combined_kinds(criteria);
        let mut result = SearchResult::new();

        let enumeration = scope.enumerate(self.baseline);
        result.stats.components = scope.components().len();
        for (component, error) in &enumeration.failures {
            result.component_problems.push(ComponentProblem {
                component: component.clone(),
                message: error.to_string(),
            });
        }
        log::info!(
            "Searching {} types in {} components with {} criteria",
            enumeration.len(),
            result.stats.components,
            criteria.len()
        );

        monitor.begin("Searching for references", enumeration.len());
        let extractor = ReferenceExtractor::new(
            ExtractOptions::default()
                .with_kinds(kinds)
                .with_self_references(self.include_self_references),
        );
        let resolver = ReferenceResolver::new(self.baseline);

        let scan = |(component, ty): &(String, TypeDescriptor)| -> TypeOutcome {
            if monitor.is_cancelled() {
                return TypeOutcome::Cancelled;
            }
            let outcome = match self.scan_type(component, ty, &extractor, &resolver) {
                Ok(references) => TypeOutcome::Scanned(references),
                Err(message) => {
                    log::warn!("Skipping {} in {}: {}", ty, component, message);
                    TypeOutcome::Failed(ExtractionProblem {
                        component: component.clone(),
                        type_name: ty.qualified_name(),
                        message,
                    })
                }
            };
            monitor.worked(1);
            outcome
        };

        let outcomes: Vec<TypeOutcome> = if self.threads <= 1 {
            enumeration.types.iter().map(scan).collect()
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.threads)
                .build()
                .map_err(|e| SearchError::ThreadPool(e.to_string()))?;
            pool.install(|| enumeration.types.par_iter().map(scan).collect())
        };

        let mut unique: IndexSet<Reference> = IndexSet::new();
        for ((component, ty), outcome) in enumeration.types.iter().zip(outcomes) {
            match outcome {
                TypeOutcome::Scanned(references) => {
                    result.scanned.push((component.clone(), ty.clone()));
                    unique.extend(references);
                }
                TypeOutcome::Failed(problem) => {
                    result.scanned.push((component.clone(), ty.clone()));
                    result.extraction_problems.push(problem);
                }
                TypeOutcome::Cancelled => result.cancelled = true,
            }
        }

        for reference in unique {
            result.stats.total_references += 1;
            if reference.is_resolved() {
                result.stats.resolved_references += 1;
            }
            if criteria.iter().any(|c| c.matches(&reference)) {
                result.matches.push(reference);
            } else if !reference.is_resolved() {
                result.unresolved.push(reference);
            }
        }

        result.stats.types_scanned = result.scanned.len();
        result.stats.types_failed = result.extraction_problems.len();
        result.stats.matched_references = result.matches.len();
        result.stats.elapsed = started.elapsed();
        monitor.done();

        let (hits, misses) = resolver.cache_stats();
        log::debug!("Type cache: {} hits, {} misses", hits, misses);
        if result.cancelled {
            log::warn!("Search cancelled after {} of {} types", result.stats.types_scanned, enumeration.len());
        }
        log::info!(
            "Found {} matching references ({} total, {} unresolved)",
            result.stats.matched_references,
            result.stats.total_references,
            result.unresolved_count()
        );
        Ok(result)
    }

    fn scan_type(
        &self,
        component: &str,
        ty: &TypeDescriptor,
        extractor: &ReferenceExtractor,
        resolver: &ReferenceResolver<'_>,
    ) -> Result<Vec<Reference>, String> {
        let owner = self
            .baseline
            .component(component)
            .ok_or_else(|| ModelError::ComponentNotFound(component.to_string()).to_string())?;
        let bytes = owner.read_type(ty).map_err(|e| e.to_string())?;
        let raw = extractor.extract(&bytes).map_err(|e| e.to_string())?;
        log::trace!("{} yielded {} raw references", ty, raw.len());
        Ok(resolver.resolve_all(component, raw))
    }
}
