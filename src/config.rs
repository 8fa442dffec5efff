// Mon Oct 19 2026 - Alex

use crate::descriptor::{ElementDescriptor, ElementKind, PackageDescriptor, TypeDescriptor};
use crate::model::{Baseline, Component, ModelError, ReferenceKindMask, RestrictionMask, VisibilityMask};
use crate::output::OutputFormat;
use crate::search::{RestrictionMatch, SearchCriteria, SearchError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_VERSION: &str = "0.0.0";

static COMPONENT_ARG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<id>[A-Za-z0-9_.\-]+)(?:@(?P<version>[A-Za-z0-9_.\-]+))?=(?P<path>.+)$")
        .unwrap_or_else(|e| panic!("component argument pattern: {}", e))
});

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentConfig {
    pub id: String,
    #[serde(default = "default_version")]
    pub version: String,
    pub path: PathBuf,
    #[serde(default)]
    pub system: bool,
    #[serde(default)]
    pub host: Option<String>,
}

impl ComponentConfig {
    pub fn new(id: &str, path: impl Into<PathBuf>) -> Self {
        Self {
            id: id.to_string(),
            version: default_version(),
            path: path.into(),
            system: false,
            host: None,
        }
    }

    /// Parses `name[@version]=path`.
    pub fn parse(arg: &str) -> Result<Self, String> {
        let caps = COMPONENT_ARG
            .captures(arg.trim())
            .ok_or_else(|| format!("Invalid component '{}', expected name[@version]=path", arg))?;
        let mut component = Self::new(&caps["id"], PathBuf::from(&caps["path"]));
        if let Some(version) = caps.name("version") {
            component.version = version.as_str().to_string();
        }
        Ok(component)
    }

    pub fn open(&self) -> Result<Component, ModelError> {
        let mut component = Component::from_path(&self.id, &self.version, &self.path)?;
        if self.system {
            component = component.as_system();
        }
        if let Some(host) = &self.host {
            component = component.as_fragment_of(host);
        }
        Ok(component)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternConfig {
    pub pattern: String,
    pub kind: String,
}

/// An element restriction entry; `name` is the qualified name, methods also
/// carry their signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementConfig {
    pub component: String,
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub signature: Option<String>,
}

impl ElementConfig {
    pub fn descriptor(&self) -> Result<ElementDescriptor, String> {
        let kind = ElementKind::parse(&self.kind).ok_or_else(|| format!("Unknown element kind: {}", self.kind))?;
        let member = |name: &str| -> Result<(TypeDescriptor, String), String> {
            name.rsplit_once('.')
                .map(|(owner, member)| (TypeDescriptor::from_qualified_name(owner), member.to_string()))
                .ok_or_else(|| format!("'{}' has no declaring type", name))
        };
        Ok(match kind {
            ElementKind::Package => PackageDescriptor::new(&self.name).into(),
            ElementKind::Type => TypeDescriptor::from_qualified_name(&self.name).into(),
            ElementKind::Method => {
                let (owner, name) = member(&self.name)?;
                let signature = self
                    .signature
                    .as_deref()
                    .ok_or_else(|| format!("Method '{}' needs a signature", self.name))?;
                owner.method(&name, signature).into()
            }
            ElementKind::Field => {
                let (owner, name) = member(&self.name)?;
                owner.field(&name).into()
            }
        })
    }
}

/// One search criterion as written in a config file. Empty lists mean "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriteriaConfig {
    pub kinds: Vec<String>,
    pub visibilities: Vec<String>,
    pub restrictions: Vec<String>,
    pub elements: Vec<ElementConfig>,
    pub patterns: Vec<PatternConfig>,
    pub components: Vec<String>,
    pub source_filter: Vec<String>,
}

impl CriteriaConfig {
    pub fn to_criteria(&self) -> Result<SearchCriteria, SearchError> {
        let invalid = SearchError::InvalidCriteria;
        let mut builder = SearchCriteria::builder();

        if !self.kinds.is_empty() {
            builder = builder.kinds(ReferenceKindMask::parse_names(&self.kinds).map_err(invalid)?);
        }
        if !self.visibilities.is_empty() {
            builder = builder.visibilities(VisibilityMask::parse_names(&self.visibilities).map_err(invalid)?);
        }
        let any = self.restrictions.is_empty()
            || self.restrictions.iter().any(|r| r.trim().eq_ignore_ascii_case("ANY"));
        builder = if any {
            builder.restrictions(RestrictionMatch::Any)
        } else {
            builder.restriction_mask(RestrictionMask::parse_names(&self.restrictions).map_err(invalid)?)
        };

        for element in &self.elements {
            let descriptor = element.descriptor().map_err(invalid)?;
            builder = builder.element_restriction(&element.component, vec![descriptor]);
        }
        for pattern in &self.patterns {
            let kind = ElementKind::parse(&pattern.kind)
                .ok_or_else(|| invalid(format!("Unknown element kind: {}", pattern.kind)))?;
            builder = builder.pattern_restriction(&pattern.pattern, kind);
        }
        for component in &self.components {
            builder = builder.component_restriction(component);
        }
        for component in &self.source_filter {
            builder = builder.source_filter(component);
        }
        builder.build()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub baseline_name: String,
    pub components: Vec<ComponentConfig>,
    /// Components to scan; empty scans every component.
    pub scope: Vec<String>,
    pub criteria: Vec<CriteriaConfig>,
    pub threads: usize,
    pub output_format: OutputFormat,
    pub output_file: Option<PathBuf>,
    pub include_unresolved: bool,
    pub include_self_references: bool,
    pub show_progress: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            baseline_name: "default".to_string(),
            components: Vec::new(),
            scope: Vec::new(),
            criteria: Vec::new(),
            threads: num_cpus::get(),
            output_format: OutputFormat::Text,
            output_file: None,
            include_unresolved: false,
            include_self_references: false,
            show_progress: true,
        }
    }
}

impl SearchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        log::debug!(
            "Loaded config {} with {} components and {} criteria",
            path.display(),
            config.components.len(),
            config.criteria.len()
        );
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn with_component(mut self, component: ComponentConfig) -> Self {
        self.components.push(component);
        self
    }

    pub fn with_criteria(mut self, criteria: CriteriaConfig) -> Self {
        self.criteria.push(criteria);
        self
    }

    pub fn with_scope(mut self, component: &str) -> Self {
        self.scope.push(component.to_string());
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_output_file(mut self, output: PathBuf) -> Self {
        self.output_file = Some(output);
        self
    }

    pub fn with_unresolved(mut self, include: bool) -> Self {
        self.include_unresolved = include;
        self
    }

    pub fn with_self_references(mut self, include: bool) -> Self {
        self.include_self_references = include;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.components.is_empty() {
            return Err("At least one component must be configured".to_string());
        }
        if self.threads == 0 {
            return Err("threads must be greater than 0".to_string());
        }
        let mut ids: Vec<&str> = self.components.iter().map(|c| c.id.as_str()).collect();
        ids.sort_unstable();
        if let Some(pair) = ids.windows(2).find(|w| w[0] == w[1]) {
            return Err(format!("Component '{}' is configured twice", pair[0]));
        }
        for id in &self.scope {
            if !ids.contains(&id.as_str()) {
                return Err(format!("Scope names unknown component '{}'", id));
            }
        }
        for component in &self.components {
            if let Some(host) = &component.host {
                if !ids.contains(&host.as_str()) {
                    return Err(format!("Fragment '{}' names unknown host '{}'", component.id, host));
                }
            }
        }
        Ok(())
    }

    /// Criteria to search with; no configured criteria means one that
    /// matches every reference.
    pub fn to_criteria(&self) -> Result<Vec<SearchCriteria>, SearchError> {
        if self.criteria.is_empty() {
            return Ok(vec![SearchCriteria::builder().build()?]);
        }
        self.criteria.iter().map(CriteriaConfig::to_criteria).collect()
    }

    pub fn build_baseline(&self) -> Result<Baseline, ModelError> {
        let mut baseline = Baseline::new(&self.baseline_name);
        for component in &self.components {
            baseline.add_component(component.open()?);
        }
        log::info!("Baseline {} has {} components", baseline.name(), baseline.len());
        Ok(baseline)
    }

    /// Component ids to scan.
    pub fn scope_components(&self) -> Vec<String> {
        if self.scope.is_empty() {
            self.components.iter().map(|c| c.id.clone()).collect()
        } else {
            self.scope.clone()
        }
    }
}
