//! Typed view of the upstream audit payload.
//!
//! The scoring service returns a large, loosely specified document. It is
//! decoded once into these types at ingestion; planners and report sections
//! only ever see the typed form. Unknown fields are dropped. Detail-item
//! fields that arrive with an unexpected JSON type are treated as absent
//! rather than rejecting the whole payload.

use crate::error::{PayloadErrorKind, PerfAllyError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Well-known category identifiers.
pub mod category_ids {
    pub const PERFORMANCE: &str = "performance";
    pub const SEO: &str = "seo";
    pub const ACCESSIBILITY: &str = "accessibility";
    pub const BEST_PRACTICES: &str = "best-practices";

    /// The four categories requested on every run.
    pub const ALL: [&str; 4] = [PERFORMANCE, SEO, ACCESSIBILITY, BEST_PRACTICES];
}

/// Decoded audit payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LighthouseResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lighthouse_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_time: Option<String>,
    /// Categories in upstream order
    #[serde(default)]
    pub categories: IndexMap<String, Category>,
    /// Checks keyed by id, in upstream order
    #[serde(default)]
    pub audits: IndexMap<String, AuditRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stack_packs: Vec<StackPack>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub audit_refs: Vec<AuditRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

/// One check. `score` is `None` for informational or manual checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_display_mode: Option<String>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub numeric_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_unit: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
    #[serde(default, deserialize_with = "lenient_details", skip_serializing_if = "Option::is_none")]
    pub details: Option<AuditDetails>,
}

impl AuditRecord {
    /// A scored check that did not pass.
    #[must_use]
    pub fn is_failing(&self) -> bool {
        self.score.is_some_and(|s| s < 1.0)
    }

    /// Failing with the lowest possible score.
    #[must_use]
    pub fn is_critical(&self) -> bool {
        self.score.is_some_and(|s| s <= 0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditDetails {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub overall_savings_ms: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub overall_savings_bytes: Option<f64>,
    #[serde(default, deserialize_with = "lenient_items", skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<DetailItem>,
}

/// One row of a check's detail table.
///
/// Only the fields used to describe a resource and its cost are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailItem {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_entity", skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub group_label: Option<String>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub wasted_ms: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub wasted_bytes: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub total_bytes: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub transfer_size: Option<f64>,
    /// Script execution time (bootup-time rows report it as `total`)
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub main_thread_time: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub blocking_time: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StackPack {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
}

impl LighthouseResult {
    /// Decode a payload from an already parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            return Err(PerfAllyError::payload(
                "audit payload",
                PayloadErrorKind::InvalidValue {
                    field: "lighthouseResult".to_string(),
                    message: "expected an object".to_string(),
                },
            ));
        }
        let mut result: Self = serde_json::from_value(value)?;
        // Older payloads omit the id inside each record
        for (id, audit) in &mut result.audits {
            if audit.id.is_empty() {
                audit.id.clone_from(id);
            }
        }
        for (id, category) in &mut result.categories {
            if category.id.is_empty() {
                category.id.clone_from(id);
            }
        }
        Ok(result)
    }

    #[must_use]
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.get(id)
    }

    #[must_use]
    pub fn audit(&self, id: &str) -> Option<&AuditRecord> {
        self.audits.get(id)
    }

    /// Checks referenced by a category, in reference order.
    ///
    /// References to checks missing from `audits` are skipped.
    pub fn checks_in<'a>(&'a self, category_id: &str) -> impl Iterator<Item = &'a AuditRecord> + 'a {
        self.categories
            .get(category_id)
            .map(|c| c.audit_refs.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|r| self.audits.get(&r.id))
    }

    /// Category score scaled to `0..=100`, if the category was measured.
    #[must_use]
    pub fn category_score(&self, id: &str) -> Option<u8> {
        self.category(id)
            .and_then(|c| c.score)
            .map(|s| (s * 100.0).round().clamp(0.0, 100.0) as u8)
    }

    #[must_use]
    pub fn numeric_value(&self, audit_id: &str) -> Option<f64> {
        self.audit(audit_id).and_then(|a| a.numeric_value)
    }

    /// Titles of the technology stacks the service detected.
    #[must_use]
    pub fn detected_stack(&self) -> Vec<&str> {
        self.stack_packs
            .iter()
            .map(|p| p.title.as_str())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

// ============================================================================
// Lenient field decoders
// ============================================================================

fn lenient_number<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<f64>, D::Error> {
    let value = serde_json::Value::deserialize(d)?;
    Ok(value.as_f64())
}

fn lenient_string<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Option<String>, D::Error> {
    let value = serde_json::Value::deserialize(d)?;
    Ok(value.as_str().map(str::to_owned))
}

/// Entities arrive either as a plain name or as a link object with `text`.
fn lenient_entity<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Option<String>, D::Error> {
    let value = serde_json::Value::deserialize(d)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Object(map) => map
            .get("text")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned),
        _ => None,
    })
}

fn lenient_details<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Option<AuditDetails>, D::Error> {
    let value = serde_json::Value::deserialize(d)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_items<'de, D: Deserializer<'de>>(
    d: D,
) -> std::result::Result<Vec<DetailItem>, D::Error> {
    let value = serde_json::Value::deserialize(d)?;
    Ok(match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter(serde_json::Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "lighthouseVersion": "12.2.1",
            "categories": {
                "performance": {
                    "score": 0.62,
                    "auditRefs": [
                        { "id": "unused-javascript", "weight": 0 },
                        { "id": "ghost-check", "weight": 0 },
                        { "id": "largest-contentful-paint", "weight": 25 }
                    ]
                },
                "seo": { "score": null, "auditRefs": [] }
            },
            "audits": {
                "unused-javascript": {
                    "title": "Reduce unused JavaScript",
                    "score": 0.3,
                    "numericValue": 900,
                    "displayValue": "Est savings of 212 KiB",
                    "details": {
                        "type": "opportunity",
                        "overallSavingsMs": 900,
                        "overallSavingsBytes": 217000,
                        "items": [
                            { "url": "https://cdn.example.com/app.js", "wastedBytes": 150000, "totalBytes": 300000 },
                            { "entity": { "type": "link", "text": "Google Tag Manager", "url": "https://gtm" } },
                            "not-an-object",
                            { "url": { "type": "node" }, "wastedMs": "12" }
                        ]
                    }
                },
                "largest-contentful-paint": {
                    "id": "largest-contentful-paint",
                    "title": "Largest Contentful Paint",
                    "score": 0.41,
                    "numericValue": 3890.5,
                    "displayValue": ["odd", "shape"]
                }
            },
            "stackPacks": [ { "id": "next", "title": "Next.js" } ]
        })
    }

    #[test]
    fn test_decode_fills_ids_and_keeps_order() {
        let lhr = LighthouseResult::from_value(sample()).unwrap();
        assert_eq!(lhr.audit("unused-javascript").unwrap().id, "unused-javascript");
        assert_eq!(lhr.category("performance").unwrap().id, "performance");

        let ids: Vec<&str> = lhr.checks_in("performance").map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["unused-javascript", "largest-contentful-paint"]);
    }

    #[test]
    fn test_lenient_fields() {
        let lhr = LighthouseResult::from_value(sample()).unwrap();
        let lcp = lhr.audit("largest-contentful-paint").unwrap();
        assert_eq!(lcp.display_value, None);
        assert_eq!(lcp.numeric_value, Some(3890.5));

        let items = &lhr.audit("unused-javascript").unwrap().details.as_ref().unwrap().items;
        assert_eq!(items.len(), 3);
        assert_eq!(items[1].entity.as_deref(), Some("Google Tag Manager"));
        assert_eq!(items[2].url, None);
        assert_eq!(items[2].wasted_ms, None);
    }

    #[test]
    fn test_category_scores() {
        let lhr = LighthouseResult::from_value(sample()).unwrap();
        assert_eq!(lhr.category_score("performance"), Some(62));
        assert_eq!(lhr.category_score("seo"), None);
        assert_eq!(lhr.category_score("accessibility"), None);
    }

    #[test]
    fn test_detected_stack_and_missing_category() {
        let lhr = LighthouseResult::from_value(sample()).unwrap();
        assert_eq!(lhr.detected_stack(), vec!["Next.js"]);
        assert_eq!(lhr.checks_in("accessibility").count(), 0);
    }

    #[test]
    fn test_non_object_payload_rejected() {
        assert!(LighthouseResult::from_value(json!([1, 2])).is_err());
        assert!(LighthouseResult::from_value(json!({ "audits": 5 })).is_err());
    }

    #[test]
    fn test_failing_and_critical() {
        let mut audit = AuditRecord::default();
        assert!(!audit.is_failing());
        audit.score = Some(1.0);
        assert!(!audit.is_failing());
        audit.score = Some(0.5);
        assert!(audit.is_failing() && !audit.is_critical());
        audit.score = Some(0.0);
        assert!(audit.is_critical());
    }
}
