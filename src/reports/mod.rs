//! Report assembly for audited projects.
//!
//! A report is built in three steps:
//! - [`ReportData`]: grades, health, plan source and findings resolved from
//!   the project's pages
//! - [`sections`]: the content turned into page-independent sections
//! - [`layout`]: two-pass pagination onto A4 pages with `n / total` footers
//!
//! Renderers then write the laid-out pages as PDF or text, or serialize the
//! resolved data as JSON.
//!
//! # Security
//!
//! Page URLs, check titles and AI plan text come from outside. The
//! `escape` module folds and escapes them before they reach a PDF string
//! or a terminal.

mod data;
mod document;
pub mod escape;
mod findings;
mod json;
pub mod layout;
mod pdf;
pub mod sections;
mod text;
mod types;

pub use data::{
    Brand, CategoryScores, MetricRow, PageReport, ProjectInfo, ReportData, ScoreCell, SummaryRow,
    ValueSource,
};
pub use document::{
    Block, Document, Element, LaidOutPage, Line, PageGeometry, Rgb, Section, Span, TextSize,
};
pub use findings::{collect_findings, Finding, FindingCategory, Findings, Severity, MAX_FINDINGS};
pub use json::JsonRenderer;
pub use pdf::write_pdf;
pub use text::write_text;
pub use types::{
    ReportFormat, ReportOptions, DEFAULT_ACCENT, DEFAULT_PRODUCT_CONTACT, DEFAULT_PRODUCT_NAME,
};

use crate::model::{Branding, PageEntry, PlanTier, Project, ProjectReport};
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// The inputs of one report: a project, its pages in display order, and
/// the branding to apply.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub project: &'a Project,
    pub pages: &'a [PageEntry],
    pub branding: Option<&'a Branding>,
}

impl<'a> ReportInput<'a> {
    #[must_use]
    pub const fn new(project: &'a Project, pages: &'a [PageEntry]) -> Self {
        Self {
            project,
            pages,
            branding: None,
        }
    }

    #[must_use]
    pub fn with_branding(mut self, branding: Option<&'a Branding>) -> Self {
        self.branding = branding;
        self
    }

    /// Input from a project file, with its branding record.
    #[must_use]
    pub fn from_report(report: &'a ProjectReport) -> Self {
        Self::new(&report.project, &report.pages).with_branding(report.branding.as_ref())
    }

    /// Drop the branding record when the tier does not include branding.
    #[must_use]
    pub fn for_tier(self, tier: PlanTier) -> Self {
        if self.branding.is_some() && !tier.limits().branding {
            tracing::info!("Branding is not included in the {} plan, using defaults", tier);
            return self.with_branding(None);
        }
        self
    }

    /// Resolve grades, plans and findings for every page.
    #[must_use]
    pub fn resolve(&self, options: &ReportOptions) -> ReportData {
        ReportData::assemble(self.project, self.pages, self.branding, options)
    }
}

/// Trait for report renderers
pub trait ReportRenderer {
    /// Render a complete report
    fn render(&self, input: &ReportInput<'_>, options: &ReportOptions) -> Result<Vec<u8>, ReportError>;

    /// Write a report to a writer
    fn write_report(
        &self,
        input: &ReportInput<'_>,
        options: &ReportOptions,
        writer: &mut dyn Write,
    ) -> Result<(), ReportError> {
        let bytes = self.render(input, options)?;
        writer.write_all(&bytes)?;
        Ok(())
    }

    /// Get the format this renderer produces
    fn format(&self) -> ReportFormat;
}

/// Paginated PDF output.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfRenderer;

impl ReportRenderer for PdfRenderer {
    fn render(&self, input: &ReportInput<'_>, options: &ReportOptions) -> Result<Vec<u8>, ReportError> {
        let data = input.resolve(options);
        let document = sections::build_document(&data);
        tracing::debug!(
            "Laid out {} pages for {} audited pages",
            document.pages.len(),
            data.pages.len()
        );
        Ok(write_pdf(&document, options.generated_at))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Pdf
    }
}

/// The same pages as text, one form feed between pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl ReportRenderer for TextRenderer {
    fn render(&self, input: &ReportInput<'_>, options: &ReportOptions) -> Result<Vec<u8>, ReportError> {
        let data = input.resolve(options);
        let document = sections::build_document(&data);
        Ok(write_text(&document, options.color).into_bytes())
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Text
    }
}

/// Create a renderer for the given format
#[must_use]
pub fn create_renderer(format: ReportFormat) -> Box<dyn ReportRenderer> {
    match format {
        ReportFormat::Pdf => Box::new(PdfRenderer),
        ReportFormat::Text => Box::new(TextRenderer),
        ReportFormat::Json => Box::new(JsonRenderer::new()),
    }
}

/// Render a report in one call.
pub fn render_report(
    project: &Project,
    pages: &[PageEntry],
    branding: Option<&Branding>,
    format: ReportFormat,
    options: &ReportOptions,
) -> Result<Vec<u8>, ReportError> {
    let input = ReportInput::new(project, pages).with_branding(branding);
    create_renderer(format).render(&input, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AuditSnapshot, NormalizedAuditMetrics, Page, Strategy};
    use chrono::{TimeZone, Utc};

    fn project() -> Project {
        Project {
            name: "Acme".to_string(),
            url: "https://acme.example".to_string(),
            strategy: Strategy::Desktop,
        }
    }

    fn entry(path: &str) -> PageEntry {
        PageEntry {
            page: Page {
                url: format!("https://acme.example{path}"),
                label: None,
            },
            audit: AuditSnapshot {
                metrics: NormalizedAuditMetrics {
                    perf_score: 62,
                    seo_score: Some(91),
                    lcp: Some(2900.0),
                    tool_version: "12.1.0".to_string(),
                    ..NormalizedAuditMetrics::default()
                },
                audited_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
                ai_action_plan: None,
            },
        }
    }

    fn options() -> ReportOptions {
        ReportOptions::at(Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap())
    }

    #[test]
    fn test_factory_formats() {
        for format in [ReportFormat::Pdf, ReportFormat::Text, ReportFormat::Json] {
            assert_eq!(create_renderer(format).format(), format);
        }
    }

    #[test]
    fn test_branding_dropped_below_agency() {
        let pages = vec![entry("/")];
        let project = project();
        let branding = Branding {
            agency_name: "Studio North".to_string(),
            ..Branding::default()
        };
        let input = ReportInput::new(&project, &pages).with_branding(Some(&branding));
        assert!(input.for_tier(PlanTier::Pro).branding.is_none());
        assert!(input.for_tier(PlanTier::Agency).branding.is_some());
    }

    #[test]
    fn test_text_report_has_generated_marker_only_on_cover() {
        let project = project();
        let single = vec![entry("/")];
        let text = render_report(&project, &single, None, ReportFormat::Text, &options()).unwrap();
        let text = String::from_utf8(text).unwrap();
        assert!(!text.contains("Generated at"));
        let total = text.matches('\x0c').count() + 1;
        assert!(text.contains(&format!("{total} / {total}")));

        let multi = vec![entry("/"), entry("/pricing")];
        let text = render_report(&project, &multi, None, ReportFormat::Text, &options()).unwrap();
        let text = String::from_utf8(text).unwrap();
        assert_eq!(text.matches("Generated at").count(), 1);
        assert!(text.contains("PAGE  /pricing"));
    }

    #[test]
    fn test_write_report_to_writer() {
        let project = project();
        let pages = vec![entry("/")];
        let input = ReportInput::new(&project, &pages);
        let mut out = Vec::new();
        JsonRenderer::new()
            .pretty(false)
            .write_report(&input, &options(), &mut out)
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["tool"]["name"], "perfally");
        assert_eq!(value["pages"][0]["health"]["value"], 71);
        assert_eq!(value["pages"][0]["plan"]["source"], "all-clear");
    }
}
