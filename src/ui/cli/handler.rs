// Mon Oct 19 2026 - Alex

use super::args::{Args, Command, DiffArgs, DumpArgs, SearchArgs};
use crate::config::SearchConfig;
use crate::extract::{ExtractOptions, Reference, ReferenceExtractor};
use crate::model::{Baseline, ReferenceKindMask};
use crate::output::{JsonReportWriter, OutputFormat, SummaryPrinter, XmlReportWriter};
use crate::scope::ComponentsScope;
use crate::search::{diff, NullProgressMonitor, ProgressMonitor, SearchEngine, SearchResult};
use crate::ui::progress::SearchProgressBar;
use crate::ui::{print_info, print_success, print_warning};
use crate::utils::{pluralize, LoggingUtils, ProgressLogger};
use anyhow::{anyhow, Context};
use colored::Colorize;
use std::fs;

pub struct CommandHandler;

impl CommandHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, args: Args) -> anyhow::Result<()> {
        if args.no_color {
            colored::control::set_override(false);
        }
        self.setup_logging(&args);

        match args.command {
            Command::Search(search_args) => self.handle_search(search_args, args.quiet),
            Command::Diff(diff_args) => self.handle_diff(diff_args, args.quiet),
            Command::Dump(dump_args) => self.handle_dump(dump_args),
        }
    }

    fn setup_logging(&self, args: &Args) {
        let level = args.log_level_filter();
        if std::env::var_os("RUST_LOG").is_some() {
            LoggingUtils::init_env_logger(level);
        } else {
            LoggingUtils::init_logger(level);
        }
    }

    fn title(&self, text: &str, quiet: bool) {
        if quiet {
            return;
        }
        println!("{}", text.cyan().bold());
        println!("{}", "=".repeat(50).cyan());
    }

    fn open_baseline(&self, config: &SearchConfig, quiet: bool) -> anyhow::Result<Baseline> {
        config.validate().map_err(|e| anyhow!(e))?;
        if !quiet {
            print_info(&format!(
                "Opening {}",
                pluralize(config.components.len(), "component", "components")
            ));
        }
        let baseline = config.build_baseline().context("Failed to open components")?;
        if !quiet {
            print_success(&format!("Baseline {} ready", baseline.name()));
        }
        Ok(baseline)
    }

    fn run_search(&self, config: &SearchConfig, baseline: &Baseline, monitor: &dyn ProgressMonitor) -> anyhow::Result<SearchResult> {
        let criteria = config.to_criteria()?;
        let scope = ComponentsScope::new(&config.scope_components());
        let result = SearchEngine::new(baseline)
            .with_threads(config.threads)
            .with_self_references(config.include_self_references)
            .search_with_progress(&scope, &criteria, monitor)?;
        Ok(result)
    }

    fn handle_search(&self, args: SearchArgs, quiet: bool) -> anyhow::Result<()> {
        let config = args.to_config().map_err(|e| anyhow!(e))?;
        self.title("API Reference Search", quiet);
        let baseline = self.open_baseline(&config, quiet)?;

        let progress: Box<dyn ProgressMonitor> = if config.show_progress && !quiet {
            Box::new(SearchProgressBar::new())
        } else {
            Box::new(ProgressLogger::new("search"))
        };
        let result = self.run_search(&config, &baseline, progress.as_ref())?;
        self.report(&config, &baseline, &result, args.limit, quiet)
    }

    fn report(
        &self,
        config: &SearchConfig,
        baseline: &Baseline,
        result: &SearchResult,
        limit: Option<usize>,
        quiet: bool,
    ) -> anyhow::Result<()> {
        match config.output_format {
            OutputFormat::Text => {
                let mut printer = SummaryPrinter::new()
                    .with_baseline(baseline)
                    .with_unresolved(config.include_unresolved);
                if let Some(limit) = limit {
                    printer = printer.with_limit(limit);
                }
                match &config.output_file {
                    Some(path) => {
                        colored::control::set_override(false);
                        let text = printer.render(result);
                        colored::control::unset_override();
                        fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
                    }
                    None => printer.print(result),
                }
            }
            OutputFormat::Xml => {
                let writer = XmlReportWriter::new()
                    .with_baseline(baseline)
                    .with_unresolved(config.include_unresolved);
                match &config.output_file {
                    Some(path) => writer.write_to_file(result, path)?,
                    None => println!("{}", writer.write_to_string(result)?),
                }
            }
            OutputFormat::Json => {
                let writer = JsonReportWriter::new().with_unresolved(config.include_unresolved);
                match &config.output_file {
                    Some(path) => writer.write_to_file(result, Some(baseline), path)?,
                    None => println!("{}", writer.serialize(result, Some(baseline))?),
                }
            }
        }

        if !quiet {
            if let Some(path) = &config.output_file {
                print_success(&format!("Report written to: {}", path.display()));
            }
            if result.has_problems() {
                print_warning(&format!(
                    "{} and {} could not be read",
                    pluralize(result.extraction_problems.len(), "type", "types"),
                    pluralize(result.component_problems.len(), "component", "components")
                ));
            }
        }
        Ok(())
    }

    fn handle_diff(&self, args: DiffArgs, quiet: bool) -> anyhow::Result<()> {
        let (old, new) = args.validate().map_err(|e| anyhow!(e))?;
        self.title("API Reference Diff", quiet);
        let old_config = args.side_config(old).map_err(|e| anyhow!(e))?;
        let new_config = args.side_config(new).map_err(|e| anyhow!(e))?;

        let old_baseline = self.open_baseline(&old_config, quiet)?;
        let new_baseline = self.open_baseline(&new_config, quiet)?;
        let before = self.run_search(&old_config, &old_baseline, &NullProgressMonitor)?;
        let after = self.run_search(&new_config, &new_baseline, &NullProgressMonitor)?;

        let added = diff(after.references(), before.references());
        let removed = diff(before.references(), after.references());
        print_diff_section("+", &added);
        print_diff_section("-", &removed);

        if !quiet {
            print_info(&format!(
                "{} from {} to {}: {} added, {} removed",
                pluralize(after.len(), "reference", "references"),
                old_baseline.name(),
                new_baseline.name(),
                added.len(),
                removed.len()
            ));
        }
        Ok(())
    }

    fn handle_dump(&self, args: DumpArgs) -> anyhow::Result<()> {
        let bytes = fs::read(&args.file).with_context(|| format!("Failed to read {}", args.file.display()))?;
        let kinds = if args.kinds.is_empty() {
            ReferenceKindMask::all()
        } else {
            ReferenceKindMask::parse_names(&args.kinds).map_err(|e| anyhow!(e))?
        };
        let extractor =
            ReferenceExtractor::new(ExtractOptions::default().with_kinds(kinds).with_self_references(args.self_references));
        let references = extractor
            .extract(&bytes)
            .with_context(|| format!("Failed to parse {}", args.file.display()))?;

        for reference in &references {
            let line = reference.line().map(|l| l.to_string()).unwrap_or_else(|| "-".to_string());
            println!(
                "{:>5} {:<22} {} -> {}",
                line.dimmed(),
                reference.kind().name(),
                reference.source(),
                reference.target().to_string().cyan()
            );
        }
        print_success(&pluralize(references.len(), "reference", "references"));
        Ok(())
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn print_diff_section(marker: &str, references: &[Reference]) {
    for reference in references {
        let line = format!("{} {} -> {} {}", marker, reference.source(), reference.target(), reference.kind().name());
        if marker == "+" {
            println!("{}", line.green());
        } else {
            println!("{}", line.red());
        }
    }
}
