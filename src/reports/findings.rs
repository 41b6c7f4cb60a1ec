//! Failing SEO and accessibility checks for the findings section.

use crate::model::{category_ids, AuditRecord, LighthouseResult};
use serde::Serialize;
use std::collections::HashSet;

/// At most this many findings are listed per page.
pub const MAX_FINDINGS: usize = 15;

/// Reader-facing names for well-known SEO checks.
const SEO_LABELS: &[(&str, &str)] = &[
    ("document-title", "Page title is missing"),
    ("meta-description", "Meta description is missing"),
    ("hreflang", "Invalid hreflang attributes"),
    ("canonical", "Invalid canonical link"),
    ("robots-txt", "robots.txt has errors"),
    ("link-text", "Links use generic text"),
    ("crawlable-anchors", "Links are not crawlable"),
    ("is-crawlable", "Page is blocked from indexing"),
    ("tap-targets", "Tap targets are too small"),
    ("font-size", "Text is too small to read"),
    ("viewport", "Viewport is not configured"),
    ("structured-data", "Structured data has errors"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingCategory {
    Seo,
    Accessibility,
}

impl FindingCategory {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Seo => "SEO",
            Self::Accessibility => "Accessibility",
        }
    }
}

/// Critical when the check scored zero, moderate otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Moderate,
}

impl Severity {
    /// ASCII marker drawn next to the finding.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::Critical => "[!] CRITICAL",
            Self::Moderate => "[~] MODERATE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub id: String,
    pub label: String,
    pub category: FindingCategory,
    pub severity: Severity,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
}

/// Findings for one page, in upstream order within each group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Findings {
    pub seo: Vec<Finding>,
    pub accessibility: Vec<Finding>,
}

impl Findings {
    #[must_use]
    pub fn len(&self) -> usize {
        self.seo.len() + self.accessibility.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Non-empty groups with their category.
    pub fn groups(&self) -> impl Iterator<Item = (FindingCategory, &[Finding])> {
        [
            (FindingCategory::Seo, self.seo.as_slice()),
            (FindingCategory::Accessibility, self.accessibility.as_slice()),
        ]
        .into_iter()
        .filter(|(_, items)| !items.is_empty())
    }
}

/// Label for a check: the known SEO label, else the check title, else its id.
#[must_use]
pub fn finding_label(audit: &AuditRecord) -> String {
    if let Some((_, label)) = SEO_LABELS.iter().find(|(id, _)| *id == audit.id) {
        return (*label).to_string();
    }
    if audit.title.trim().is_empty() {
        audit.id.clone()
    } else {
        audit.title.clone()
    }
}

/// Collect failing checks from the SEO and accessibility categories.
///
/// A check referenced by both categories is listed once, under SEO. The cap
/// applies across both groups, SEO first.
#[must_use]
pub fn collect_findings(raw: &LighthouseResult) -> Findings {
    let mut seen = HashSet::new();
    let mut findings = Findings::default();
    let mut remaining = MAX_FINDINGS;

    let sources = [
        (FindingCategory::Seo, category_ids::SEO),
        (FindingCategory::Accessibility, category_ids::ACCESSIBILITY),
    ];
    for (category, category_id) in sources {
        for audit in raw.checks_in(category_id) {
            if remaining == 0 {
                break;
            }
            if !seen.insert(audit.id.as_str()) {
                continue;
            }
            let Some(score) = audit.score.filter(|s| *s < 1.0) else {
                continue;
            };
            let finding = Finding {
                id: audit.id.clone(),
                label: finding_label(audit),
                category,
                severity: if audit.is_critical() {
                    Severity::Critical
                } else {
                    Severity::Moderate
                },
                score,
                display_value: audit.display_value.clone(),
            };
            match category {
                FindingCategory::Seo => findings.seo.push(finding),
                FindingCategory::Accessibility => findings.accessibility.push(finding),
            }
            remaining -= 1;
        }
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn refs(ids: &[&str]) -> serde_json::Value {
        ids.iter().map(|id| json!({ "id": id })).collect()
    }

    #[test]
    fn test_shared_check_is_listed_once_under_seo() {
        let lhr = LighthouseResult::from_value(json!({
            "categories": {
                "seo": { "auditRefs": refs(&["tap-targets", "document-title"]) },
                "accessibility": { "auditRefs": refs(&["tap-targets", "color-contrast"]) }
            },
            "audits": {
                "tap-targets": { "title": "Tap targets are sized appropriately", "score": 0.5 },
                "document-title": { "title": "Document has a title", "score": 1 },
                "color-contrast": { "title": "Low contrast", "score": 0 }
            }
        }))
        .unwrap();
        let findings = collect_findings(&lhr);
        assert_eq!(findings.seo.len(), 1);
        assert_eq!(findings.seo[0].id, "tap-targets");
        assert_eq!(findings.seo[0].label, "Tap targets are too small");
        assert_eq!(findings.seo[0].severity, Severity::Moderate);
        assert_eq!(findings.accessibility.len(), 1);
        assert_eq!(findings.accessibility[0].label, "Low contrast");
        assert_eq!(findings.accessibility[0].severity, Severity::Critical);
    }

    #[test]
    fn test_unscored_checks_are_skipped() {
        let lhr = LighthouseResult::from_value(json!({
            "categories": { "seo": { "auditRefs": refs(&["structured-data", "missing"]) } },
            "audits": { "structured-data": { "score": null } }
        }))
        .unwrap();
        assert!(collect_findings(&lhr).is_empty());
    }

    #[test]
    fn test_capped_across_groups() {
        let seo_ids: Vec<String> = (0..10).map(|i| format!("seo-{i}")).collect();
        let a11y_ids: Vec<String> = (0..10).map(|i| format!("a11y-{i}")).collect();
        let mut audits = serde_json::Map::new();
        for id in seo_ids.iter().chain(&a11y_ids) {
            audits.insert(id.clone(), json!({ "title": id, "score": 0.5 }));
        }
        let seo_refs: Vec<&str> = seo_ids.iter().map(String::as_str).collect();
        let a11y_refs: Vec<&str> = a11y_ids.iter().map(String::as_str).collect();
        let lhr = LighthouseResult::from_value(json!({
            "categories": {
                "seo": { "auditRefs": refs(&seo_refs) },
                "accessibility": { "auditRefs": refs(&a11y_refs) }
            },
            "audits": audits
        }))
        .unwrap();
        let findings = collect_findings(&lhr);
        assert_eq!(findings.len(), MAX_FINDINGS);
        assert_eq!(findings.seo.len(), 10);
        assert_eq!(findings.accessibility.len(), 5);
        assert_eq!(findings.groups().count(), 2);
    }

    #[test]
    fn test_label_falls_back_to_id() {
        let audit = AuditRecord {
            id: "custom-check".to_string(),
            ..AuditRecord::default()
        };
        assert_eq!(finding_label(&audit), "custom-check");
    }
}
