// Mon Oct 19 2026 - Alex

use super::error::OutputError;
use super::ReferenceRecord;
use crate::model::Baseline;
use crate::search::SearchResult;
use serde_json::{json, to_string, to_string_pretty, Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct JsonReportWriter {
    pretty_print: bool,
    include_unresolved: bool,
    include_problems: bool,
    include_statistics: bool,
}

impl JsonReportWriter {
    pub fn new() -> Self {
        Self {
            pretty_print: true,
            include_unresolved: false,
            include_problems: true,
            include_statistics: true,
        }
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn with_unresolved(mut self, include: bool) -> Self {
        self.include_unresolved = include;
        self
    }

    pub fn with_problems(mut self, include: bool) -> Self {
        self.include_problems = include;
        self
    }

    pub fn with_statistics(mut self, include: bool) -> Self {
        self.include_statistics = include;
        self
    }

    pub fn serialize(&self, result: &SearchResult, baseline: Option<&Baseline>) -> Result<String, OutputError> {
        let value = self.build_json_value(result, baseline)?;
        let json = if self.pretty_print {
            to_string_pretty(&value)?
        } else {
            to_string(&value)?
        };
        Ok(json)
    }

    pub fn write_to_file<P: AsRef<Path>>(
        &self,
        result: &SearchResult,
        baseline: Option<&Baseline>,
        path: P,
    ) -> Result<(), OutputError> {
        let json = self.serialize(result, baseline)?;
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        writer.write_all(json.as_bytes())?;
        writer.flush()?;
        log::info!("Wrote JSON report to {}", path.as_ref().display());
        Ok(())
    }

    fn build_json_value(&self, result: &SearchResult, baseline: Option<&Baseline>) -> Result<Value, OutputError> {
        let mut root = Map::new();

        if let Some(baseline) = baseline {
            root.insert("baseline".to_string(), json!(baseline.name()));
        }
        root.insert("cancelled".to_string(), json!(result.cancelled));

        if self.include_statistics {
            let stats = &result.stats;
            root.insert(
                "statistics".to_string(),
                json!({
                    "components": stats.components,
                    "types_scanned": stats.types_scanned,
                    "types_failed": stats.types_failed,
                    "total_references": stats.total_references,
                    "resolved_references": stats.resolved_references,
                    "unresolved_references": stats.unresolved_references(),
                    "matched_references": stats.matched_references,
                    "elapsed_ms": stats.elapsed.as_millis() as u64,
                }),
            );
        }

        let matches: Vec<ReferenceRecord> = result.matches.iter().map(|r| ReferenceRecord::new(r, baseline)).collect();
        root.insert("matches".to_string(), serde_json::to_value(matches)?);

        if self.include_unresolved {
            let unresolved: Vec<ReferenceRecord> =
                result.unresolved.iter().map(|r| ReferenceRecord::new(r, baseline)).collect();
            root.insert("unresolved".to_string(), serde_json::to_value(unresolved)?);
        }

        if self.include_problems {
            root.insert(
                "problems".to_string(),
                json!({
                    "extraction": serde_json::to_value(&result.extraction_problems)?,
                    "components": serde_json::to_value(&result.component_problems)?,
                }),
            );
        }

        Ok(Value::Object(root))
    }
}

impl Default for JsonReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::ComponentsScope;
    use crate::search::{SearchCriteria, SearchEngine};
    use crate::model::{ReferenceKind, RestrictionMask};
    use crate::utils::fixtures;

    fn instantiations() -> (Baseline, SearchResult) {
        let baseline = fixtures::baseline();
        let criteria = SearchCriteria::builder()
            .kinds(ReferenceKind::Instantiate.mask())
            .restriction_mask(RestrictionMask::NO_INSTANTIATE)
            .build()
            .unwrap();
        let result = SearchEngine::new(&baseline)
            .with_threads(1)
            .search(&ComponentsScope::single(fixtures::COMPONENT_B), &[criteria])
            .unwrap();
        (baseline, result)
    }

    #[test]
    fn test_serialize_matches() {
        let (baseline, result) = instantiations();
        let json = JsonReportWriter::new().serialize(&result, Some(&baseline)).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["baseline"], "fixture");
        assert_eq!(value["cancelled"], false);
        let matches = value["matches"].as_array().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0]["kind"], "INSTANTIATE");
        assert_eq!(matches[0]["line"], 12);
        assert_eq!(matches[0]["restrictions"][0], "NO_INSTANTIATE");
        assert_eq!(matches[0]["target"]["component"], fixtures::COMPONENT_A);
        assert_eq!(value["statistics"]["types_scanned"], 5);
        assert!(value.get("unresolved").is_none());
    }

    #[test]
    fn test_optional_sections() {
        let (baseline, result) = instantiations();
        let json = JsonReportWriter::new()
            .with_pretty_print(false)
            .with_statistics(false)
            .with_problems(false)
            .serialize(&result, Some(&baseline))
            .unwrap();
        assert!(!json.contains('\n'));
        let value: Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("statistics").is_none());
        assert!(value.get("problems").is_none());
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        JsonReportWriter::new().write_to_file(&SearchResult::new(), None, &path).unwrap();
        let value: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["matches"].as_array().map(Vec::len), Some(0));
    }
}
