// Mon Oct 19 2026 - Alex

use super::error::OutputError;
use super::{component_label, report_visibility, ReferenceRecord, LocationRecord};
use crate::extract::Reference;
use crate::model::Baseline;
use crate::search::SearchResult;
use itertools::Itertools;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::fs;
use std::io::Cursor;
use std::path::Path;

fn xml_error<E: std::fmt::Display>(e: E) -> OutputError {
    OutputError::Xml(e.to_string())
}

/// Writes search results as an XML reference report.
///
/// References are grouped by referenced component, then referencing
/// component, then report visibility and reference type:
///
/// ```text
/// <references>
///   <component id="a (1.0.0)">
///     <referencing id="b (1.0.0)">
///       <visibility value="API">
///         <type_references>
///           <reference kind="EXTENDS" ...>
///             <source .../>
///             <target .../>
/// ```
pub struct XmlReportWriter<'a> {
    baseline: Option<&'a Baseline>,
    indent: usize,
    include_unresolved: bool,
}

impl<'a> XmlReportWriter<'a> {
    pub fn new() -> Self {
        Self {
            baseline: None,
            indent: 2,
            include_unresolved: false,
        }
    }

    pub fn with_baseline(mut self, baseline: &'a Baseline) -> Self {
        self.baseline = Some(baseline);
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_unresolved(mut self, include: bool) -> Self {
        self.include_unresolved = include;
        self
    }

    pub fn write_to_string(&self, result: &SearchResult) -> Result<String, OutputError> {
        let references: Vec<&Reference> = if self.include_unresolved {
            result.matches.iter().chain(result.unresolved.iter()).collect()
        } else {
            result.matches.iter().collect()
        };
        self.render(&references)
    }

    pub fn write_to_file(&self, result: &SearchResult, path: &Path) -> Result<(), OutputError> {
        let xml = self.write_to_string(result)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, xml)?;
        log::info!("Wrote XML report to {}", path.display());
        Ok(())
    }

    fn render(&self, references: &[&Reference]) -> Result<String, OutputError> {
        let mut rows: Vec<(String, String, String, &'static str, &Reference)> = references
            .iter()
            .map(|r| {
                (
                    component_label(r.target_component(), self.baseline),
                    component_label(r.source_component(), self.baseline),
                    report_visibility(r, self.baseline),
                    group_name(r),
                    *r,
                )
            })
            .collect();
        rows.sort_by(|a, b| {
            (&a.0, &a.1, &a.2, a.3)
                .cmp(&(&b.0, &b.1, &b.2, b.3))
                .then_with(|| a.4.source().cmp(b.4.source()))
                .then_with(|| a.4.line().cmp(&b.4.line()))
        });

        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', self.indent);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_error)?;

        let mut root = BytesStart::new("references");
        let count = rows.len().to_string();
        root.push_attribute(("count", count.as_str()));
        if let Some(baseline) = self.baseline {
            root.push_attribute(("baseline", baseline.name()));
        }
        writer.write_event(Event::Start(root)).map_err(xml_error)?;

        let by_referenced = rows.iter().chunk_by(|row| row.0.clone());
        for (referenced, rows) in &by_referenced {
            let rows: Vec<_> = rows.collect();
            start(&mut writer, "component", &[("id", referenced.as_str())])?;

            for (referencing, rows) in &rows.iter().chunk_by(|row| row.1.clone()) {
                let rows: Vec<_> = rows.collect();
                start(&mut writer, "referencing", &[("id", referencing.as_str())])?;

                for (visibility, rows) in &rows.iter().chunk_by(|row| row.2.clone()) {
                    let rows: Vec<_> = rows.collect();
                    start(&mut writer, "visibility", &[("value", visibility.as_str())])?;

                    for (group, rows) in &rows.iter().chunk_by(|row| row.3) {
                        start(&mut writer, group, &[])?;
                        for row in rows {
                            write_reference(&mut writer, &ReferenceRecord::new(row.4, self.baseline))?;
                        }
                        end(&mut writer, group)?;
                    }
                    end(&mut writer, "visibility")?;
                }
                end(&mut writer, "referencing")?;
            }
            end(&mut writer, "component")?;
        }

        end(&mut writer, "references")?;
        String::from_utf8(writer.into_inner().into_inner()).map_err(xml_error)
    }
}

impl<'a> Default for XmlReportWriter<'a> {
    fn default() -> Self {
        Self::new()
    }
}

fn group_name(reference: &Reference) -> &'static str {
    match reference.reference_type().name() {
        "type" => "type_references",
        "method" => "method_references",
        _ => "field_references",
    }
}

fn start<W: std::io::Write>(writer: &mut Writer<W>, name: &str, attributes: &[(&str, &str)]) -> Result<(), OutputError> {
    let mut element = BytesStart::new(name);
    for attribute in attributes {
        element.push_attribute(*attribute);
    }
    writer.write_event(Event::Start(element)).map_err(xml_error)
}

fn end<W: std::io::Write>(writer: &mut Writer<W>, name: &str) -> Result<(), OutputError> {
    writer.write_event(Event::End(BytesEnd::new(name))).map_err(xml_error)
}

fn location<W: std::io::Write>(writer: &mut Writer<W>, name: &str, record: &LocationRecord) -> Result<(), OutputError> {
    let mut element = BytesStart::new(name);
    element.push_attribute(("component", record.component.as_deref().unwrap_or(super::UNRESOLVED)));
    element.push_attribute(("kind", record.kind));
    element.push_attribute(("element", record.element.as_str()));
    if let Some(signature) = &record.signature {
        element.push_attribute(("signature", signature.as_str()));
    }
    writer.write_event(Event::Empty(element)).map_err(xml_error)
}

fn write_reference<W: std::io::Write>(writer: &mut Writer<W>, record: &ReferenceRecord) -> Result<(), OutputError> {
    let mut element = BytesStart::new("reference");
    element.push_attribute(("kind", record.kind));
    let line = record.line.map(|l| l.to_string());
    if let Some(line) = &line {
        element.push_attribute(("line", line.as_str()));
    }
    element.push_attribute(("visibility", record.visibility.as_str()));
    let restrictions = record.restrictions.join("|");
    element.push_attribute(("restrictions", restrictions.as_str()));
    writer.write_event(Event::Start(element)).map_err(xml_error)?;
    location(writer, "source", &record.source)?;
    location(writer, "target", &record.target)?;
    end(writer, "reference")
}
