//! Section builders.
//!
//! Each function turns part of [`ReportData`] into one [`Section`]; every
//! section starts on a new page. The order is fixed: project cover (only
//! for multi-page projects), then for each page its summary, metric
//! details, action plan and findings.

use super::data::{MetricRow, PageReport, ReportData, ScoreCell, SummaryRow, ValueSource};
use super::document::{Block, Document, Line, PageGeometry, Rgb, Section, Span, TextSize};
use super::findings::{Findings, Severity};
use super::layout::{paginate, PageChrome};
use crate::grading::{
    format_duration_ms, format_metric, metric_explanation, metric_target, Grade, GOOD_COLOR,
    NEEDS_IMPROVEMENT_COLOR, POOR_COLOR,
};
use crate::model::{ActionItem, AiActionItem, Difficulty, Impact, MetricKey};
use crate::planner::PlanSource;
use chrono::{DateTime, Utc};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LABEL_COLUMN: usize = 28;
const GAUGE_CELLS: usize = 40;

/// Build sections and paginate them.
#[must_use]
pub fn build_document(data: &ReportData) -> Document {
    let geometry = PageGeometry::A4;
    let chrome = PageChrome {
        accent: data.brand.accent,
        header: Some(data.brand.name.clone()),
        footer: data.brand.footer(),
    };
    let sections = build_sections(data);
    Document {
        title: format!("{} - performance report", data.project.name),
        author: data.brand.name.clone(),
        subject: data.project.url.clone(),
        geometry,
        pages: paginate(&sections, geometry, &chrome),
    }
}

/// All sections in document order.
#[must_use]
pub fn build_sections(data: &ReportData) -> Vec<Section> {
    let multi = data.is_multi_page();
    let mut sections = Vec::with_capacity(data.pages.len() * 4 + 1);
    if let Some(rows) = &data.summary {
        sections.push(project_cover(data, rows));
    }
    for page in &data.pages {
        let badge = multi.then_some(page.label.as_str());
        sections.push(page_summary(data, page, badge));
        sections.push(metrics_detail(page, badge));
        sections.push(action_plan(page, badge, data.brand.accent));
        if let Some(findings) = &page.findings {
            sections.push(findings_section(findings, badge));
        }
    }
    sections
}

fn project_cover(data: &ReportData, rows: &[SummaryRow]) -> Section {
    let mut section = Section::new();
    push_brand_header(&mut section, data);
    section.push(
        Line::new(vec![Span::colored("Performance report", data.brand.accent)])
            .sized(TextSize::Title),
    );
    section.spacer(4.0);
    section.push(Line::new(vec![Span::bold(data.project.name.clone())]).sized(TextSize::Heading));
    section.push(Line::new(vec![Span::muted(data.project.url.clone())]));
    section.spacer(6.0);
    section.push(Line::new(vec![
        Span::muted("Strategy: "),
        Span::plain(data.project.strategy.as_str()),
        Span::muted("   Pages: "),
        Span::plain(rows.len().to_string()),
    ]));
    section.push(Line::new(vec![
        Span::muted("Generated at: "),
        Span::plain(format_timestamp(data.generated_at)),
    ]));
    section.spacer(12.0);

    section.push(Line::new(vec![Span::bold("Pages")]).sized(TextSize::Heading));
    section.push(Block::Rule);
    section.push(Line::new(vec![Span::bold(format!(
        "{} {:>6} {:>6} {:>6} {:>6} {:>8}",
        fit("Page", LABEL_COLUMN),
        "Health",
        "Perf",
        "SEO",
        "A11y",
        "LCP"
    ))]));
    section.push(Block::Rule);
    for row in rows {
        section.push(summary_row(row));
    }
    section.push(Block::Rule);
    section.spacer(4.0);
    section.push(Block::indented_paragraph(
        "LCP shows the field value (75th percentile of real visits) when available, \
         otherwise the lab value. Scores are out of 100.",
        0,
        Rgb::MUTED,
    ));
    section
}

fn summary_row(row: &SummaryRow) -> Line {
    let mut spans = vec![Span::plain(format!("{} ", fit(&row.label, LABEL_COLUMN)))];
    for cell in [
        row.health,
        row.scores.performance,
        row.scores.seo,
        row.scores.accessibility,
    ] {
        spans.push(score_span(cell, 6));
        spans.push(Span::plain(" "));
    }
    spans.push(metric_span(&row.lcp, 8));
    if row.lcp.source == Some(ValueSource::Lab) {
        spans.push(Span::muted(" lab"));
    }
    Line::new(spans)
}

fn page_summary(data: &ReportData, page: &PageReport, badge: Option<&str>) -> Section {
    let mut section = Section::new();
    push_brand_header(&mut section, data);
    push_badge(&mut section, badge);
    let title = if badge.is_some() {
        "Page summary"
    } else {
        data.project.name.as_str()
    };
    section.push(Line::new(vec![Span::bold(title)]).sized(TextSize::Title));
    section.push(Line::new(vec![Span::muted(page.url.clone())]));
    section.push(Line::new(vec![Span::muted(format!(
        "Audited {} | {} | Lighthouse {}",
        format_timestamp(page.audited_at),
        data.project.strategy,
        if page.tool_version.is_empty() {
            "unknown"
        } else {
            page.tool_version.as_str()
        }
    ))]));
    section.spacer(10.0);

    section.push(Line::new(vec![Span::bold("Site health")]).sized(TextSize::Heading));
    let health = page.health.value.unwrap_or(0);
    let color = cell_color(page.health);
    section.push(
        Line::new(vec![
            Span::colored(health.to_string(), color),
            Span::muted(" / 100"),
        ])
        .sized(TextSize::Display),
    );
    section.push(Block::Gauge {
        score: health,
        color,
        cells: GAUGE_CELLS,
    });
    section.push(Line::new(vec![
        Span::colored(grade_label(page.health.grade), color),
        Span::muted("  weighted: performance 40%, SEO 30%, accessibility 30%"),
    ]));
    section.spacer(10.0);

    section.push(Line::new(vec![Span::bold("Category scores")]).sized(TextSize::Heading));
    for (name, cell) in page.scores.named() {
        section.push(Line::new(vec![
            Span::plain(fit(name, 16)),
            score_span(cell, 4),
            Span::muted(format!("  {}", grade_label(cell.grade))),
        ]));
        if let Some(score) = cell.value {
            section.push(Block::Gauge {
                score,
                color: cell_color(cell),
                cells: GAUGE_CELLS,
            });
        }
    }
    section.spacer(10.0);

    section.push(Line::new(vec![Span::bold("Core Web Vitals")]).sized(TextSize::Heading));
    for row in &page.metrics {
        let mut spans = vec![
            Span::bold(fit(row.key.acronym(), 6)),
            Span::plain(fit(row.key.name(), 28)),
            metric_span(row, 9),
            Span::plain("  "),
        ];
        match (row.grade, row.source) {
            (Some(grade), Some(source)) => {
                spans.push(Span::colored(grade.label(), grade_rgb(grade)));
                spans.push(Span::muted(format!(" ({})", source.label())));
            }
            _ => spans.push(Span::muted("not measured")),
        }
        section.push(Line::new(spans));
    }
    section
}

fn metrics_detail(page: &PageReport, badge: Option<&str>) -> Section {
    let mut section = Section::new();
    push_badge(&mut section, badge);
    section.push(Line::new(vec![Span::bold("Metrics in detail")]).sized(TextSize::Title));
    section.push(Block::indented_paragraph(
        "Lab values come from one synthetic page load. Field values are the 75th \
         percentile of real visits over the last 28 days, when enough traffic exists.",
        0,
        Rgb::MUTED,
    ));
    for row in &page.metrics {
        section.spacer(10.0);
        section.push(
            Line::new(vec![
                Span::colored(row.key.acronym(), grade_or_muted(row.grade)),
                Span::bold(format!("  {}", row.key.name())),
            ])
            .sized(TextSize::Heading),
        );
        section.push(Block::paragraph(metric_explanation(row.key)));
        section.push(measurement_line("Lab:    ", row.key, row.lab, row.lab_grade(), lab_gap(row.key)));
        section.push(measurement_line(
            "Field:  ",
            row.key,
            row.field,
            row.field_grade(),
            "no field data",
        ));
        section.push(Line::new(vec![
            Span::muted("Target: "),
            Span::plain(metric_target(row.key)),
        ]));
    }

    let extras: Vec<(&str, f64)> = [
        ("Total Blocking Time", page.total_blocking_time),
        ("Speed Index", page.speed_index),
    ]
    .into_iter()
    .filter_map(|(name, value)| value.map(|v| (name, v)))
    .collect();
    if !extras.is_empty() {
        section.spacer(10.0);
        section.push(Line::new(vec![Span::bold("Other lab measurements")]).sized(TextSize::Heading));
        for (name, value) in extras {
            section.push(Line::new(vec![
                Span::plain(fit(name, 24)),
                Span::bold(format_duration_ms(value)),
            ]));
        }
    }
    section
}

const fn lab_gap(key: MetricKey) -> &'static str {
    match key {
        MetricKey::Inp => "needs real interactions, not measured in the lab",
        _ => "not measured",
    }
}

fn measurement_line(
    label: &str,
    key: MetricKey,
    value: Option<f64>,
    grade: Option<Grade>,
    missing: &str,
) -> Line {
    let mut spans = vec![Span::muted(label.to_string())];
    match (value, grade) {
        (Some(v), Some(grade)) => {
            spans.push(Span::colored(fit(&format_metric(key, v), 9), grade_rgb(grade)));
            spans.push(Span::muted(grade.label()));
        }
        _ => spans.push(Span::muted(missing.to_string())),
    }
    Line::new(spans).indented(2)
}

fn action_plan(page: &PageReport, badge: Option<&str>, accent: Rgb) -> Section {
    let mut section = Section::new();
    push_badge(&mut section, badge);
    section.push(Line::new(vec![Span::bold("Action plan")]).sized(TextSize::Title));
    match &page.plan {
        PlanSource::Ai(items) => {
            section.push(Block::indented_paragraph(
                "Recommendations written for this page from the evidence in its audit.",
                0,
                Rgb::MUTED,
            ));
            for (index, item) in items.iter().enumerate() {
                push_ai_item(&mut section, index + 1, item, accent);
            }
        }
        PlanSource::Static(items) => {
            section.push(Block::indented_paragraph(
                "Fixes for the failing performance checks, highest impact first.",
                0,
                Rgb::MUTED,
            ));
            for (index, item) in items.iter().enumerate() {
                push_static_item(&mut section, index + 1, item);
            }
        }
        PlanSource::AllClear => {
            section.spacer(8.0);
            section.push(
                Line::new(vec![Span::colored("No critical issues found", grade_rgb(Grade::Good))])
                    .sized(TextSize::Heading),
            );
            section.push(Block::paragraph(
                "None of the failing checks on this page has a known fix with meaningful \
                 impact. Keep monitoring it to catch regressions early.",
            ));
        }
    }
    section
}

fn push_ai_item(section: &mut Section, number: usize, item: &AiActionItem, accent: Rgb) {
    section.spacer(8.0);
    section.push(Block::Paragraph {
        text: format!("{number}. {}", item.title),
        color: Rgb::BLACK,
        size: TextSize::Heading,
        indent: 0,
    });
    section.push(Line::new(vec![
        Span::muted("Difficulty: "),
        Span::colored(format!("[{}]", item.difficulty.label()), difficulty_rgb(item.difficulty)),
    ]));
    section.push(Block::paragraph(item.action.clone()));
    for (step_number, step) in item.steps.iter().enumerate() {
        section.push(Block::indented_paragraph(
            format!("{}) {step}", step_number + 1),
            2,
            Rgb::TEXT,
        ));
    }
    section.push(Line::new(vec![Span::bold("Why it matters")]).indented(2));
    section.push(Block::indented_paragraph(item.why.clone(), 2, Rgb::MUTED));
    if let Some(tip) = item.stack_tip.as_deref().filter(|t| !t.trim().is_empty()) {
        section.push(Line::new(vec![Span::colored("Stack tip", accent)]).indented(2));
        section.push(Block::indented_paragraph(tip, 2, Rgb::TEXT));
    }
}

fn push_static_item(section: &mut Section, number: usize, item: &ActionItem) {
    section.spacer(8.0);
    section.push(Block::Paragraph {
        text: format!("{number}. {}", item.title),
        color: Rgb::BLACK,
        size: TextSize::Heading,
        indent: 0,
    });
    let mut spans = vec![Span::colored(item.impact.label(), impact_rgb(item.impact))];
    if let Some(savings) = &item.savings {
        spans.push(Span::muted("   Potential savings: "));
        spans.push(Span::bold(savings.clone()));
    }
    section.push(Line::new(spans));
    section.push(Block::paragraph(item.fix.clone()));
    section.push(Line::new(vec![Span::muted(format!("Check: {}", item.audit_id))]).indented(2));
}

fn findings_section(findings: &Findings, badge: Option<&str>) -> Section {
    let mut section = Section::new();
    push_badge(&mut section, badge);
    section.push(Line::new(vec![Span::bold("SEO & accessibility")]).sized(TextSize::Title));
    if findings.is_empty() {
        section.spacer(8.0);
        section.push(
            Line::new(vec![Span::colored(
                "No failing SEO or accessibility checks",
                grade_rgb(Grade::Good),
            )])
            .sized(TextSize::Heading),
        );
        return section;
    }
    section.push(Line::new(vec![
        Span::colored(Severity::Critical.marker(), severity_rgb(Severity::Critical)),
        Span::muted(" scored zero   "),
        Span::colored(Severity::Moderate.marker(), severity_rgb(Severity::Moderate)),
        Span::muted(" partially passing"),
    ]));
    for (category, items) in findings.groups() {
        section.spacer(10.0);
        section.push(Line::new(vec![Span::bold(category.title())]).sized(TextSize::Heading));
        section.push(Block::Rule);
        for finding in items {
            section.push(Line::new(vec![
                Span::colored(fit(finding.severity.marker(), 14), severity_rgb(finding.severity)),
                Span::bold(finding.label.clone()),
            ]));
            if let Some(detail) = finding.display_value.as_deref().filter(|d| !d.is_empty()) {
                section.push(Block::indented_paragraph(detail, 14, Rgb::MUTED));
            }
        }
    }
    section
}

/// Agency name and logo reference at the top of a cover. The logo is
/// referenced by URL; remote images are never fetched.
fn push_brand_header(section: &mut Section, data: &ReportData) {
    let brand = &data.brand;
    if !brand.white_label {
        return;
    }
    section.push(Line::new(vec![
        Span::muted("Prepared by "),
        Span::colored(brand.name.clone(), brand.accent),
    ]));
    if let Some(url) = &brand.logo_url {
        section.push(Block::indented_paragraph(format!("Logo: {url}"), 0, Rgb::MUTED));
    }
    section.spacer(6.0);
}

fn push_badge(section: &mut Section, badge: Option<&str>) {
    if let Some(label) = badge {
        section.push(Line::new(vec![Span::muted("PAGE  "), Span::bold(label)]));
        section.spacer(6.0);
    }
}

// ============================================================================
// Formatting helpers
// ============================================================================

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Truncate or pad to exactly `width` display columns.
fn fit(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0usize;
    if text.width() > width {
        let budget = width.saturating_sub(1);
        for c in text.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > budget {
                break;
            }
            out.push(c);
            used += w;
        }
        if width > 0 {
            out.push('~');
            used += 1;
        }
    } else {
        out.push_str(text);
        used = text.width();
    }
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

fn right(text: &str, width: usize) -> String {
    format!("{}{text}", " ".repeat(width.saturating_sub(text.width())))
}

fn score_span(cell: ScoreCell, width: usize) -> Span {
    match cell.value {
        Some(v) => Span::colored(right(&v.to_string(), width), cell_color(cell)),
        None => Span::muted(right("N/A", width)),
    }
}

fn metric_span(row: &MetricRow, width: usize) -> Span {
    match (row.shown, row.grade) {
        (Some(v), Some(grade)) => Span::colored(right(&format_metric(row.key, v), width), grade_rgb(grade)),
        _ => Span::muted(right("N/A", width)),
    }
}

fn grade_label(grade: Option<Grade>) -> &'static str {
    grade.map_or("Not measured", Grade::label)
}

fn hex(color: &str) -> Rgb {
    Rgb::from_hex(color).unwrap_or(Rgb::MUTED)
}

fn grade_rgb(grade: Grade) -> Rgb {
    hex(grade.color())
}

fn grade_or_muted(grade: Option<Grade>) -> Rgb {
    grade.map_or(Rgb::MUTED, grade_rgb)
}

fn cell_color(cell: ScoreCell) -> Rgb {
    grade_or_muted(cell.grade)
}

fn impact_rgb(impact: Impact) -> Rgb {
    match impact {
        Impact::High => hex(POOR_COLOR),
        Impact::Medium => hex(NEEDS_IMPROVEMENT_COLOR),
        Impact::Low => hex(GOOD_COLOR),
    }
}

fn difficulty_rgb(difficulty: Difficulty) -> Rgb {
    match difficulty {
        Difficulty::Easy => hex(GOOD_COLOR),
        Difficulty::Medium => hex(NEEDS_IMPROVEMENT_COLOR),
        Difficulty::Hard => hex(POOR_COLOR),
    }
}

fn severity_rgb(severity: Severity) -> Rgb {
    match severity {
        Severity::Critical => hex(POOR_COLOR),
        Severity::Moderate => hex(NEEDS_IMPROVEMENT_COLOR),
    }
}
