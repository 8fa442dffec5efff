// Mon Oct 19 2026 - Alex

use crate::config::{ComponentConfig, CriteriaConfig, PatternConfig, SearchConfig};
use crate::output::OutputFormat;
use crate::utils::LoggingUtils;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "api-ref-search")]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Searches API references between JVM class-file components", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true, default_value = "warn")]
    pub log_level: String,

    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Raise the log level, repeat for more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[arg(long, global = true)]
    pub no_color: bool,
}

impl Args {
    /// `-q` wins over `-v`, which wins over `--log-level`.
    pub fn log_level_filter(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else if self.verbose > 0 {
            LoggingUtils::level_from_verbosity(self.verbose as usize)
        } else {
            LoggingUtils::level_from_str(&self.log_level)
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search a baseline for references matching the criteria
    Search(SearchArgs),
    /// Compare the references of two versions of one component
    Diff(DiffArgs),
    /// Print the references read from a single class file
    Dump(DumpArgs),
}

/// Criteria flags shared by `search` and `diff`.
#[derive(Parser, Debug, Default, Clone)]
pub struct CriteriaArgs {
    /// Reference kinds, e.g. EXTENDS,method_calls,ALL
    #[arg(short, long, value_delimiter = ',')]
    pub kinds: Vec<String>,

    /// Target visibilities, e.g. API,SPI
    #[arg(long, value_delimiter = ',')]
    pub visibility: Vec<String>,

    /// Restrictions the target must carry, or ANY
    #[arg(short, long, value_delimiter = ',')]
    pub restrictions: Vec<String>,

    /// Target name pattern as KIND:REGEX, e.g. method:no.*
    #[arg(long, value_name = "KIND:REGEX")]
    pub pattern: Vec<String>,

    /// Only targets inside these components
    #[arg(long)]
    pub target_component: Vec<String>,

    /// Drop references whose source is in these components
    #[arg(long)]
    pub source_filter: Vec<String>,
}

impl CriteriaArgs {
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
            && self.visibility.is_empty()
            && self.restrictions.is_empty()
            && self.pattern.is_empty()
            && self.target_component.is_empty()
            && self.source_filter.is_empty()
    }

    pub fn to_criteria_config(&self) -> Result<CriteriaConfig, String> {
        let patterns = self
            .pattern
            .iter()
            .map(|p| {
                p.split_once(':')
                    .map(|(kind, pattern)| PatternConfig {
                        pattern: pattern.to_string(),
                        kind: kind.to_string(),
                    })
                    .ok_or_else(|| format!("Invalid pattern '{}', expected KIND:REGEX", p))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CriteriaConfig {
            kinds: self.kinds.clone(),
            visibilities: self.visibility.clone(),
            restrictions: self.restrictions.clone(),
            elements: Vec::new(),
            patterns,
            components: self.target_component.clone(),
            source_filter: self.source_filter.clone(),
        })
    }
}

#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Component to load, as NAME[@VERSION]=PATH (class directory, jar, zip or jmod)
    #[arg(short, long = "component", value_name = "NAME[@VERSION]=PATH")]
    pub components: Vec<String>,

    /// JSON search configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Components to scan, all when omitted
    #[arg(short, long)]
    pub scope: Vec<String>,

    #[command(flatten)]
    pub criteria: CriteriaArgs,

    /// text, xml or json
    #[arg(short, long)]
    pub format: Option<String>,

    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Also report references whose target could not be resolved
    #[arg(long)]
    pub unresolved: bool,

    #[arg(long)]
    pub self_references: bool,

    #[arg(long)]
    pub no_progress: bool,

    /// Maximum references listed in the text summary
    #[arg(long)]
    pub limit: Option<usize>,
}

impl SearchArgs {
    /// Merges the flags over the config file, if any. Criteria flags replace
    /// the configured criteria.
    pub fn to_config(&self) -> Result<SearchConfig, String> {
        let mut config = match &self.config {
            Some(path) => SearchConfig::load(path).map_err(|e| format!("Cannot load {}: {}", path.display(), e))?,
            None => SearchConfig::new(),
        };
        for arg in &self.components {
            config = config.with_component(ComponentConfig::parse(arg)?);
        }
        for id in &self.scope {
            config = config.with_scope(id);
        }
        if !self.criteria.is_empty() {
            config.criteria = vec![self.criteria.to_criteria_config()?];
        }
        if let Some(format) = &self.format {
            let format = OutputFormat::parse(format).ok_or_else(|| format!("Unknown output format: {}", format))?;
            config = config.with_output_format(format);
        }
        if let Some(output) = &self.output {
            config = config.with_output_file(output.clone());
        }
        if let Some(threads) = self.threads {
            config = config.with_threads(threads);
        }
        if self.unresolved {
            config = config.with_unresolved(true);
        }
        if self.self_references {
            config = config.with_self_references(true);
        }
        if self.no_progress {
            config.show_progress = false;
        }
        Ok(config)
    }
}

#[derive(Parser, Debug)]
pub struct DiffArgs {
    /// Components both versions are resolved against
    #[arg(short, long = "component", value_name = "NAME[@VERSION]=PATH")]
    pub components: Vec<String>,

    /// Old version of the compared component
    #[arg(long, value_name = "NAME[@VERSION]=PATH")]
    pub old: String,

    /// New version of the compared component
    #[arg(long, value_name = "NAME[@VERSION]=PATH")]
    pub new: String,

    #[command(flatten)]
    pub criteria: CriteriaArgs,

    #[arg(short, long)]
    pub threads: Option<usize>,
}

impl DiffArgs {
    pub fn validate(&self) -> Result<(ComponentConfig, ComponentConfig), String> {
        let old = ComponentConfig::parse(&self.old)?;
        let new = ComponentConfig::parse(&self.new)?;
        if old.id != new.id {
            return Err(format!("--old ({}) and --new ({}) must name the same component", old.id, new.id));
        }
        Ok((old, new))
    }

    /// Config for one side of the comparison.
    pub fn side_config(&self, side: ComponentConfig) -> Result<SearchConfig, String> {
        let mut config = SearchConfig::new().with_scope(&side.id);
        config.baseline_name = format!("{}@{}", side.id, side.version);
        for arg in &self.components {
            config = config.with_component(ComponentConfig::parse(arg)?);
        }
        config = config.with_component(side);
        if !self.criteria.is_empty() {
            config = config.with_criteria(self.criteria.to_criteria_config()?);
        }
        if let Some(threads) = self.threads {
            config = config.with_threads(threads);
        }
        Ok(config)
    }
}

#[derive(Parser, Debug)]
pub struct DumpArgs {
    /// Class file to read
    pub file: PathBuf,

    #[arg(short, long, value_delimiter = ',')]
    pub kinds: Vec<String>,

    #[arg(long)]
    pub self_references: bool,
}
