// Mon Oct 19 2026 - Alex

use super::report_visibility;
use crate::extract::Reference;
use crate::model::Baseline;
use crate::search::SearchResult;
use crate::utils::{format_duration, pluralize};
use colored::*;
use itertools::Itertools;
use std::fmt::Write;

/// Human readable search summary for the terminal.
pub struct SummaryPrinter<'a> {
    baseline: Option<&'a Baseline>,
    show_references: bool,
    show_unresolved: bool,
    limit: Option<usize>,
}

impl<'a> SummaryPrinter<'a> {
    pub fn new() -> Self {
        Self {
            baseline: None,
            show_references: true,
            show_unresolved: false,
            limit: None,
        }
    }

    pub fn with_baseline(mut self, baseline: &'a Baseline) -> Self {
        self.baseline = Some(baseline);
        self
    }

    pub fn with_references(mut self, show: bool) -> Self {
        self.show_references = show;
        self
    }

    pub fn with_unresolved(mut self, show: bool) -> Self {
        self.show_unresolved = show;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn print(&self, result: &SearchResult) {
        print!("{}", self.render(result));
    }

    pub fn render(&self, result: &SearchResult) -> String {
        let mut out = String::new();
        let stats = &result.stats;

        let _ = writeln!(
            out,
            "{} Scanned {} in {} ({})",
            "[*]".blue(),
            pluralize(stats.types_scanned, "type", "types"),
            pluralize(stats.components, "component", "components"),
            format_duration(stats.elapsed)
        );
        let _ = writeln!(
            out,
            "{} {} extracted, {} resolved, {} unresolved",
            "[*]".blue(),
            pluralize(stats.total_references, "reference", "references"),
            stats.resolved_references,
            stats.unresolved_references()
        );
        let _ = writeln!(
            out,
            "{} {}",
            "[+]".green(),
            pluralize(result.len(), "matching reference", "matching references").as_str().bold()
        );

        let counts = result.matches.iter().map(|r| r.kind()).counts();
        for (kind, count) in counts.into_iter().sorted() {
            let _ = writeln!(out, "    {:<24} {}", kind.name(), count);
        }

        if self.show_references {
            self.render_references(&mut out, &result.matches);
        }
        if self.show_unresolved && !result.unresolved.is_empty() {
            let _ = writeln!(
                out,
                "{} {}",
                "[*]".blue(),
                pluralize(result.unresolved.len(), "unresolved reference", "unresolved references")
            );
            self.render_references(&mut out, &result.unresolved);
        }

        for problem in &result.extraction_problems {
            let _ = writeln!(
                out,
                "{} {} in {}: {}",
                "[!]".red(),
                problem.type_name,
                problem.component,
                problem.message
            );
        }
        for problem in &result.component_problems {
            let _ = writeln!(out, "{} {}: {}", "[!]".red(), problem.component, problem.message);
        }
        if result.cancelled {
            let _ = writeln!(out, "{} {}", "[!]".red(), "Search cancelled, results are partial".yellow());
        }
        out
    }

    fn render_references(&self, out: &mut String, references: &[Reference]) {
        let shown = self.limit.unwrap_or(references.len());
        for reference in references.iter().take(shown) {
            let line = reference.line().map(|l| format!(":{}", l)).unwrap_or_default();
            let restrictions = reference
                .restrictions()
                .map(|r| r.names())
                .filter(|names| !names.is_empty())
                .map(|names| format!(" {{{}}}", names.join("|")))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "    {}{} -> {} {} {}{}",
                reference.source(),
                line,
                reference.target().to_string().as_str().cyan(),
                reference.kind().name().dimmed(),
                report_visibility(reference, self.baseline),
                restrictions.as_str().yellow()
            );
        }
        if references.len() > shown {
            let _ = writeln!(out, "    ... {} more", references.len() - shown);
        }
    }
}

impl<'a> Default for SummaryPrinter<'a> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ReferenceKind, RestrictionMask};
    use crate::scope::ComponentsScope;
    use crate::search::{ExtractionProblem, SearchCriteria, SearchEngine};
    use crate::utils::fixtures;

    fn overrides(baseline: &Baseline) -> SearchResult {
        let criteria = SearchCriteria::builder()
            .kinds(ReferenceKind::Override.mask())
            .restriction_mask(RestrictionMask::NO_OVERRIDE)
            .build()
            .unwrap();
        SearchEngine::new(baseline)
            .with_threads(1)
            .search(&ComponentsScope::single(fixtures::COMPONENT_B), &[criteria])
            .unwrap()
    }

    #[test]
    fn test_render_counts_and_references() {
        let baseline = fixtures::baseline();
        let result = overrides(&baseline);
        let text = SummaryPrinter::new().with_baseline(&baseline).render(&result);

        assert!(text.contains("Scanned 5 types in 1 component"));
        assert!(text.contains("3 matching references"));
        assert!(text.contains("OVERRIDE"));
        assert!(text.contains("component.a.A.noOverride2(I)V"));
        assert!(text.contains("{NO_OVERRIDE}"));
    }

    #[test]
    fn test_limit_and_problems() {
        let baseline = fixtures::baseline();
        let mut result = overrides(&baseline);
        result.extraction_problems.push(ExtractionProblem {
            component: fixtures::COMPONENT_B.to_string(),
            type_name: "component.b.Broken".to_string(),
            message: "truncated".to_string(),
        });
        result.cancelled = true;

        let text = SummaryPrinter::new().with_limit(1).render(&result);
        assert!(text.contains("... 2 more"));
        assert!(text.contains("component.b.Broken in component.b: truncated"));
        assert!(text.contains("results are partial"));
    }

    #[test]
    fn test_hide_references() {
        let text = SummaryPrinter::new().with_references(false).render(&SearchResult::new());
        assert!(text.contains("0 matching references"));
        assert!(!text.contains(" -> "));
    }
}
