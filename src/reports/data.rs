//! Report content, resolved from a project before any layout happens.
//!
//! Everything a renderer shows is computed here once: grades, composite
//! health, the plan source, findings and the resolved brand. The JSON
//! renderer serializes this structure as is.

use super::document::Rgb;
use super::findings::{collect_findings, Findings};
use super::types::ReportOptions;
use crate::grading::{grade_metric, grade_score, site_health_score, Grade};
use crate::model::{
    Branding, MetricKey, NormalizedAuditMetrics, PageEntry, Project, ProjectReport, Strategy,
};
use crate::planner::{resolve_plan, PlanSource};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Name, contact and colors applied to every page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub name: String,
    pub contact: String,
    pub accent: Rgb,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// Whether an agency branding record was applied
    pub white_label: bool,
}

impl Brand {
    /// Resolve the brand from an optional branding record.
    ///
    /// Blank fields and unparseable colors fall back to the product defaults
    /// field by field.
    #[must_use]
    pub fn resolve(branding: Option<&Branding>, options: &ReportOptions) -> Self {
        let default_accent = Rgb::from_hex(&options.default_accent).unwrap_or(Rgb(0x25, 0x63, 0xeb));
        let Some(branding) = branding else {
            return Self {
                name: options.product_name.clone(),
                contact: options.product_contact.clone(),
                accent: default_accent,
                logo_url: None,
                white_label: false,
            };
        };
        let non_blank = |s: &str| Some(s.trim()).filter(|s| !s.is_empty()).map(str::to_string);
        Self {
            name: non_blank(branding.agency_name.as_str()).unwrap_or_else(|| options.product_name.clone()),
            contact: non_blank(branding.agency_contact.as_str())
                .unwrap_or_else(|| options.product_contact.clone()),
            accent: branding
                .accent_color
                .as_deref()
                .and_then(Rgb::from_hex)
                .unwrap_or(default_accent),
            logo_url: branding.agency_logo_url.as_deref().and_then(non_blank),
            white_label: true,
        }
    }

    /// Footer text: `"name | contact"`.
    #[must_use]
    pub fn footer(&self) -> String {
        if self.contact.is_empty() {
            self.name.clone()
        } else {
            format!("{} | {}", self.name, self.contact)
        }
    }
}

/// A 0-100 score with its band. Both are absent when not measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreCell {
    pub value: Option<u8>,
    pub grade: Option<Grade>,
}

impl ScoreCell {
    #[must_use]
    pub fn new(value: Option<u8>) -> Self {
        Self {
            value,
            grade: value.map(|v| grade_score(f64::from(v))),
        }
    }
}

/// Where a shown metric value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Field,
    Lab,
}

impl ValueSource {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Field => "field",
            Self::Lab => "lab",
        }
    }
}

/// One core metric with both measurements and the graded preferred value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRow {
    pub key: MetricKey,
    pub lab: Option<f64>,
    pub field: Option<f64>,
    /// Field when present, else lab
    pub shown: Option<f64>,
    pub source: Option<ValueSource>,
    pub grade: Option<Grade>,
}

impl MetricRow {
    #[must_use]
    pub fn from_metrics(metrics: &NormalizedAuditMetrics, key: MetricKey) -> Self {
        let lab = metrics.lab_value(key);
        let field = metrics.field_value(key);
        let (shown, source) = match (field, lab) {
            (Some(v), _) => (Some(v), Some(ValueSource::Field)),
            (None, Some(v)) => (Some(v), Some(ValueSource::Lab)),
            (None, None) => (None, None),
        };
        Self {
            key,
            lab,
            field,
            shown,
            source,
            grade: shown.map(|v| grade_metric(key, v)),
        }
    }

    /// Grade of the lab value alone.
    #[must_use]
    pub fn lab_grade(&self) -> Option<Grade> {
        self.lab.map(|v| grade_metric(self.key, v))
    }

    /// Grade of the field value alone.
    #[must_use]
    pub fn field_grade(&self) -> Option<Grade> {
        self.field.map(|v| grade_metric(self.key, v))
    }
}

/// The four category scores of one audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScores {
    pub performance: ScoreCell,
    pub seo: ScoreCell,
    pub accessibility: ScoreCell,
    pub best_practices: ScoreCell,
}

impl CategoryScores {
    #[must_use]
    pub fn from_metrics(metrics: &NormalizedAuditMetrics) -> Self {
        Self {
            performance: ScoreCell::new(Some(metrics.perf_score)),
            seo: ScoreCell::new(metrics.seo_score),
            accessibility: ScoreCell::new(metrics.accessibility_score),
            best_practices: ScoreCell::new(metrics.best_practices_score),
        }
    }

    /// Named cells in display order.
    #[must_use]
    pub fn named(&self) -> [(&'static str, ScoreCell); 4] {
        [
            ("Performance", self.performance),
            ("SEO", self.seo),
            ("Accessibility", self.accessibility),
            ("Best Practices", self.best_practices),
        ]
    }
}

/// One row of the project cover table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub label: String,
    pub url: String,
    pub health: ScoreCell,
    pub scores: CategoryScores,
    pub lcp: MetricRow,
}

impl SummaryRow {
    #[must_use]
    pub fn from_entry(entry: &PageEntry) -> Self {
        let metrics = &entry.audit.metrics;
        Self {
            label: entry.page.display_label(),
            url: entry.page.url.clone(),
            health: health_cell(metrics),
            scores: CategoryScores::from_metrics(metrics),
            lcp: MetricRow::from_metrics(metrics, MetricKey::Lcp),
        }
    }
}

/// Everything shown for one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageReport {
    pub label: String,
    pub url: String,
    pub audited_at: DateTime<Utc>,
    pub tool_version: String,
    pub health: ScoreCell,
    pub scores: CategoryScores,
    pub metrics: Vec<MetricRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_blocking_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_index: Option<f64>,
    pub plan: PlanSource,
    /// `None` when the audit payload was missing or unreadable
    pub findings: Option<Findings>,
}

impl PageReport {
    #[must_use]
    pub fn from_entry(entry: &PageEntry) -> Self {
        let metrics = &entry.audit.metrics;
        let raw = metrics.raw_payload.as_ref();
        if raw.is_none() {
            tracing::warn!(
                "No readable payload for {}, findings section omitted",
                entry.page.url
            );
        }
        Self {
            label: entry.page.display_label(),
            url: entry.page.url.clone(),
            audited_at: entry.audit.audited_at,
            tool_version: metrics.tool_version.clone(),
            health: health_cell(metrics),
            scores: CategoryScores::from_metrics(metrics),
            metrics: MetricKey::ALL
                .iter()
                .map(|key| MetricRow::from_metrics(metrics, *key))
                .collect(),
            total_blocking_time: metrics.tbt,
            speed_index: metrics.speed_index,
            plan: resolve_plan(entry.audit.ai_action_plan.as_deref(), raw),
            findings: raw.map(collect_findings),
        }
    }
}

fn health_cell(metrics: &NormalizedAuditMetrics) -> ScoreCell {
    ScoreCell::new(Some(site_health_score(
        metrics.perf_score,
        metrics.seo_score,
        metrics.accessibility_score,
    )))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub name: String,
    pub url: String,
    pub strategy: Strategy,
}

/// Complete report content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub project: ProjectInfo,
    pub generated_at: DateTime<Utc>,
    pub brand: Brand,
    /// Present only when the project has more than one page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Vec<SummaryRow>>,
    pub pages: Vec<PageReport>,
}

impl ReportData {
    /// Resolve report content. Pages keep their input order.
    #[must_use]
    pub fn assemble(
        project: &Project,
        pages: &[PageEntry],
        branding: Option<&Branding>,
        options: &ReportOptions,
    ) -> Self {
        let summary = (pages.len() > 1).then(|| pages.iter().map(SummaryRow::from_entry).collect());
        let pages: Vec<PageReport> = pages.iter().map(PageReport::from_entry).collect();
        Self {
            project: ProjectInfo {
                name: project.name.clone(),
                url: project.url.clone(),
                strategy: project.strategy,
            },
            generated_at: options.generated_at,
            brand: Brand::resolve(branding, options),
            summary,
            pages,
        }
    }

    #[must_use]
    pub fn from_report(report: &ProjectReport, options: &ReportOptions) -> Self {
        Self::assemble(
            &report.project,
            &report.pages,
            report.branding.as_ref(),
            options,
        )
    }

    #[must_use]
    pub fn is_multi_page(&self) -> bool {
        self.summary.is_some()
    }
}
