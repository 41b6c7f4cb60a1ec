//! Evidence extraction: the concrete resources behind each failing check.

use crate::grading::{format_bytes, format_duration_ms};
use crate::model::{category_ids, AuditRecord, DetailItem, LighthouseResult};
use std::cmp::Ordering;

/// Performance checks scoring below this are considered failing.
pub const PERFORMANCE_FAILING_BELOW: f64 = 0.9;
pub const MAX_PERFORMANCE_CHECKS: usize = 10;
pub const MAX_SEO_CHECKS: usize = 5;
pub const MAX_ITEMS_PER_CHECK: usize = 4;
const MAX_URL_CHARS: usize = 120;

/// One failing check and its supporting lines.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckEvidence {
    pub id: String,
    pub title: String,
    pub score: f64,
    pub display_value: Option<String>,
    pub lines: Vec<String>,
}

impl CheckEvidence {
    /// Prompt block: a header line, then one line per detail item.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!("[{}] {} (score {:.2}", self.id, self.title, self.score);
        if let Some(display) = &self.display_value {
            out.push_str(", ");
            out.push_str(display);
        }
        out.push(')');
        for line in &self.lines {
            out.push('\n');
            out.push_str(line);
        }
        out
    }
}

/// Failing checks selected for the prompt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evidence {
    pub performance: Vec<CheckEvidence>,
    pub seo: Vec<CheckEvidence>,
}

impl Evidence {
    /// Select the most severe failing checks from a payload.
    ///
    /// Performance: up to 10 checks of the performance category scoring
    /// below 0.9, each with up to 4 detail lines. SEO: up to 5 failing checks.
    /// Both lists are sorted by ascending score.
    #[must_use]
    pub fn extract(raw: &LighthouseResult) -> Self {
        let performance = worst_checks(raw, category_ids::PERFORMANCE, PERFORMANCE_FAILING_BELOW)
            .into_iter()
            .take(MAX_PERFORMANCE_CHECKS)
            .map(|audit| evidence_for(audit, true))
            .collect();
        let seo = worst_checks(raw, category_ids::SEO, 1.0)
            .into_iter()
            .take(MAX_SEO_CHECKS)
            .map(|audit| evidence_for(audit, false))
            .collect();
        Self { performance, seo }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.performance.is_empty() && self.seo.is_empty()
    }
}

fn worst_checks<'a>(
    raw: &'a LighthouseResult,
    category: &str,
    below: f64,
) -> Vec<&'a AuditRecord> {
    let mut checks: Vec<&AuditRecord> = raw
        .checks_in(category)
        .filter(|a| a.score.is_some_and(|s| s < below))
        .collect();
    checks.sort_by(|a, b| {
        a.score
            .partial_cmp(&b.score)
            .unwrap_or(Ordering::Equal)
    });
    checks
}

fn evidence_for(audit: &AuditRecord, with_items: bool) -> CheckEvidence {
    let lines = if with_items {
        audit
            .details
            .iter()
            .flat_map(|d| d.items.iter())
            .take(MAX_ITEMS_PER_CHECK)
            .filter_map(describe_item)
            .collect()
    } else {
        Vec::new()
    };
    CheckEvidence {
        id: audit.id.clone(),
        title: audit.title.clone(),
        score: audit.score.unwrap_or(0.0),
        display_value: audit.display_value.clone(),
        lines,
    }
}

/// Render a detail item as `"- <identifier>: <figure>"`.
///
/// Items without a URL, entity or group label are dropped.
#[must_use]
pub fn describe_item(item: &DetailItem) -> Option<String> {
    let identifier = item_identifier(item)?;
    Some(match item_figure(item) {
        Some(figure) => format!("- {identifier}: {figure}"),
        None => format!("- {identifier}"),
    })
}

fn item_identifier(item: &DetailItem) -> Option<String> {
    let non_empty = |s: &Option<String>| {
        s.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    };
    if let Some(url) = non_empty(&item.url) {
        return Some(truncate_chars(&url, MAX_URL_CHARS));
    }
    non_empty(&item.entity).or_else(|| non_empty(&item.group_label))
}

/// Savings first (time, then bytes), then cost figures, then raw size.
fn item_figure(item: &DetailItem) -> Option<String> {
    let positive = |v: Option<f64>| v.filter(|v| *v > 0.0);

    if let Some(ms) = positive(item.wasted_ms) {
        return Some(format!("wasted {}", format_duration_ms(ms)));
    }
    if let Some(bytes) = positive(item.wasted_bytes) {
        return Some(format!("wasted {}", format_bytes(bytes)));
    }
    if let Some(ms) = positive(item.total)
        .or_else(|| positive(item.duration))
        .or_else(|| positive(item.main_thread_time))
    {
        return Some(format!("execution {}", format_duration_ms(ms)));
    }
    if let Some(ms) = positive(item.blocking_time) {
        return Some(format!("blocking {}", format_duration_ms(ms)));
    }
    positive(item.transfer_size)
        .or_else(|| positive(item.total_bytes))
        .map(|bytes| format!("size {}", format_bytes(bytes)))
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(value: serde_json::Value) -> DetailItem {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_identifier_priority() {
        let both = item(json!({ "url": "https://a.com/x.js", "entity": "Acme", "wastedMs": 300 }));
        assert_eq!(describe_item(&both).unwrap(), "- https://a.com/x.js: wasted 300ms");

        let entity = item(json!({ "entity": "Acme", "groupLabel": "Script" , "blockingTime": 250 }));
        assert_eq!(describe_item(&entity).unwrap(), "- Acme: blocking 250ms");

        let group = item(json!({ "groupLabel": "Style & Layout", "duration": 1420 }));
        assert_eq!(describe_item(&group).unwrap(), "- Style & Layout: execution 1.4s");

        assert_eq!(describe_item(&item(json!({ "wastedMs": 900 }))), None);
        assert_eq!(describe_item(&item(json!({ "url": "  " }))), None);
    }

    #[test]
    fn test_figure_preference() {
        let time_and_bytes = item(json!({ "url": "u", "wastedMs": 1200, "wastedBytes": 90000 }));
        assert_eq!(describe_item(&time_and_bytes).unwrap(), "- u: wasted 1.2s");

        let bytes = item(json!({ "url": "u", "wastedMs": 0, "wastedBytes": 122880, "totalBytes": 400000 }));
        assert_eq!(describe_item(&bytes).unwrap(), "- u: wasted 120 KiB");

        let size = item(json!({ "url": "u", "transferSize": 100352 }));
        assert_eq!(describe_item(&size).unwrap(), "- u: size 98 KiB");

        let bare = item(json!({ "url": "u" }));
        assert_eq!(describe_item(&bare).unwrap(), "- u");
    }

    #[test]
    fn test_long_urls_truncated() {
        let long = format!("https://cdn.example.com/{}", "a".repeat(200));
        let line = describe_item(&item(json!({ "url": long }))).unwrap();
        assert_eq!(line.chars().count(), 2 + MAX_URL_CHARS);
        assert!(line.ends_with('…'));
    }

    fn payload() -> LighthouseResult {
        let mut audits = serde_json::Map::new();
        let mut refs = Vec::new();
        for i in 0..14u32 {
            let id = format!("perf-{i}");
            audits.insert(
                id.clone(),
                json!({
                    "title": format!("Check {i}"),
                    "score": f64::from(i) * 0.07,
                    "details": { "items": [
                        { "url": "https://a/1.js", "wastedMs": 100 },
                        { "wastedMs": 50 },
                        { "url": "https://a/2.js", "wastedMs": 90 },
                        { "url": "https://a/3.js", "wastedMs": 80 },
                        { "url": "https://a/4.js", "wastedMs": 70 },
                        { "url": "https://a/5.js", "wastedMs": 60 }
                    ]}
                }),
            );
            refs.push(json!({ "id": id }));
        }
        audits.insert("informational".into(), json!({ "score": null }));
        refs.push(json!({ "id": "informational" }));
        audits.insert("document-title".into(), json!({ "title": "Has a title", "score": 0 }));
        audits.insert("meta-description".into(), json!({ "title": "Has a description", "score": 1 }));
        audits.insert("stray".into(), json!({ "title": "Not referenced", "score": 0 }));

        LighthouseResult::from_value(json!({
            "categories": {
                "performance": { "auditRefs": refs },
                "seo": { "auditRefs": [{ "id": "meta-description" }, { "id": "document-title" }] }
            },
            "audits": audits
        }))
        .unwrap()
    }

    #[test]
    fn test_extract_caps_and_sorts() {
        let evidence = Evidence::extract(&payload());
        // scores 0.00..0.84 fail (< 0.9): 13 candidates, capped at 10
        assert_eq!(evidence.performance.len(), MAX_PERFORMANCE_CHECKS);
        assert_eq!(evidence.performance[0].id, "perf-0");
        assert!(evidence
            .performance
            .windows(2)
            .all(|w| w[0].score <= w[1].score));
        // the second of the first four items has no identifier
        assert!(evidence.performance.iter().all(|c| c.lines.len() == 3));
        assert!(evidence.performance[0].lines[2].contains("3.js"));
        assert!(evidence.performance.iter().all(|c| c.id != "stray"));

        assert_eq!(evidence.seo.len(), 1);
        assert_eq!(evidence.seo[0].id, "document-title");
        assert!(evidence.seo[0].lines.is_empty());
    }

    #[test]
    fn test_item_cap_counts_dropped_items() {
        let lhr = LighthouseResult::from_value(json!({
            "categories": { "performance": { "auditRefs": [{ "id": "bootup-time" }] } },
            "audits": { "bootup-time": {
                "title": "Reduce JavaScript execution time",
                "score": 0.2,
                "details": { "items": [
                    { "wastedMs": 300 },
                    { "totalBytes": 1024 },
                    { "duration": 90 },
                    { "url": "https://a/1.js", "wastedMs": 100 },
                    { "url": "https://a/5.js", "wastedMs": 60 },
                    { "url": "https://a/6.js", "wastedMs": 50 }
                ]}
            }}
        }))
        .unwrap();
        let evidence = Evidence::extract(&lhr);
        assert_eq!(evidence.performance[0].lines, vec!["- https://a/1.js: wasted 100ms"]);
    }

    #[test]
    fn test_render_block() {
        let check = CheckEvidence {
            id: "unused-javascript".into(),
            title: "Reduce unused JavaScript".into(),
            score: 0.25,
            display_value: Some("Est savings of 212 KiB".into()),
            lines: vec!["- https://a/app.js: wasted 150 KiB".into()],
        };
        assert_eq!(
            check.render(),
            "[unused-javascript] Reduce unused JavaScript (score 0.25, Est savings of 212 KiB)\n- https://a/app.js: wasted 150 KiB"
        );
    }
}
