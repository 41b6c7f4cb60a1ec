//! Projects, monitored pages and stored audit snapshots.

use super::action::AiActionItem;
use super::metrics::{NormalizedAuditMetrics, Strategy};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A client site registered for monitoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub strategy: Strategy,
}

/// One monitored page of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Page {
    /// Label shown on per-page sections: the explicit label, else the URL path.
    #[must_use]
    pub fn display_label(&self) -> String {
        if let Some(label) = self.label.as_deref().filter(|l| !l.trim().is_empty()) {
            return label.to_string();
        }
        match url::Url::parse(&self.url) {
            Ok(parsed) => parsed.path().to_string(),
            Err(_) => self.url.clone(),
        }
    }
}

/// A stored audit: metrics, when they were taken, and the AI plan if one
/// was generated for this run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSnapshot {
    #[serde(flatten)]
    pub metrics: NormalizedAuditMetrics,
    pub audited_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_action_plan: Option<Vec<AiActionItem>>,
}

/// A page paired with its latest audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageEntry {
    pub page: Page,
    pub audit: AuditSnapshot,
}

/// Agency white-label settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    pub agency_name: String,
    #[serde(default)]
    pub agency_contact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency_logo_url: Option<String>,
}

/// Everything needed to render one project report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectReport {
    pub project: Project,
    pub pages: Vec<PageEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branding: Option<Branding>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_label() {
        let page = Page {
            url: "https://example.com/pricing?ref=x".to_string(),
            label: None,
        };
        assert_eq!(page.display_label(), "/pricing");

        let root = Page {
            url: "https://example.com".to_string(),
            label: None,
        };
        assert_eq!(root.display_label(), "/");

        let labelled = Page {
            url: "https://example.com/blog".to_string(),
            label: Some("Blog".to_string()),
        };
        assert_eq!(labelled.display_label(), "Blog");

        let broken = Page {
            url: "not a url".to_string(),
            label: Some("  ".to_string()),
        };
        assert_eq!(broken.display_label(), "not a url");
    }

    #[test]
    fn test_snapshot_flattens_metrics() {
        let json = serde_json::json!({
            "perfScore": 93,
            "seoScore": 100,
            "lcp": 1800.0,
            "toolVersion": "12.2.1",
            "auditedAt": "2026-03-01T12:00:00Z",
            "aiActionPlan": [
                { "title": "t", "action": "a", "why": "w", "difficulty": "easy" }
            ]
        });
        let snapshot: AuditSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(snapshot.metrics.perf_score, 93);
        assert_eq!(snapshot.metrics.seo_score, Some(100));
        assert_eq!(snapshot.ai_action_plan.as_ref().map(Vec::len), Some(1));
    }
}
