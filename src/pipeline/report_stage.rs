//! Report stage: entitlement checks and rendering.

use super::PipelineError;
use crate::config::ReportConfig;
use crate::model::{PlanTier, ProjectReport};
use crate::reports::{create_renderer, ReportFormat, ReportInput};
use chrono::{DateTime, Utc};

/// How to render a project report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub format: ReportFormat,
    pub tier: PlanTier,
    /// Fixed generation time; `None` means now
    pub generated_at: Option<DateTime<Utc>>,
    /// ANSI colors in text output
    pub color: bool,
}

impl ReportRequest {
    #[must_use]
    pub const fn new(format: ReportFormat, tier: PlanTier) -> Self {
        Self {
            format,
            tier,
            generated_at: None,
            color: false,
        }
    }
}

/// Refuse exports the tier does not include: PDF documents, and projects
/// with more pages than the tier allows.
pub fn check_entitlement(
    report: &ProjectReport,
    format: ReportFormat,
    tier: PlanTier,
) -> Result<(), PipelineError> {
    let limits = tier.limits();
    if format == ReportFormat::Pdf && !limits.pdf_reports {
        return Err(PipelineError::NotEntitled {
            tier: tier.to_string(),
            what: "PDF reports".to_string(),
        });
    }
    if !limits.allows_pages(report.pages.len()) {
        return Err(PipelineError::NotEntitled {
            tier: tier.to_string(),
            what: format!("{} pages per project", report.pages.len()),
        });
    }
    Ok(())
}

/// Check entitlements, then render the report. Branding is dropped when
/// the tier does not include it.
pub fn render_project_report(
    report: &ProjectReport,
    request: &ReportRequest,
    config: &ReportConfig,
) -> Result<Vec<u8>, PipelineError> {
    check_entitlement(report, request.format, request.tier)?;

    let mut options = config.to_options().with_color(request.color);
    if let Some(generated_at) = request.generated_at {
        options.generated_at = generated_at;
    }

    let input = ReportInput::from_report(report).for_tier(request.tier);
    let bytes = create_renderer(request.format).render(&input, &options)?;
    tracing::info!(
        "Rendered {} report for '{}' ({} pages, {} bytes)",
        request.format,
        report.project.name,
        report.pages.len(),
        bytes.len()
    );
    Ok(bytes)
}
