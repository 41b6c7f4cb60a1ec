//! Core web-vital keys and the normalized audit record.

use super::payload::LighthouseResult;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One of the five core metrics graded by fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MetricKey {
    Lcp,
    Cls,
    Inp,
    Fcp,
    Ttfb,
}

/// Unit a metric value is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricUnit {
    Milliseconds,
    Unitless,
}

impl MetricKey {
    /// All keys in report order.
    pub const ALL: [Self; 5] = [Self::Lcp, Self::Cls, Self::Inp, Self::Fcp, Self::Ttfb];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lcp => "lcp",
            Self::Cls => "cls",
            Self::Inp => "inp",
            Self::Fcp => "fcp",
            Self::Ttfb => "ttfb",
        }
    }

    /// Short upper-case acronym used in tables.
    #[must_use]
    pub const fn acronym(self) -> &'static str {
        match self {
            Self::Lcp => "LCP",
            Self::Cls => "CLS",
            Self::Inp => "INP",
            Self::Fcp => "FCP",
            Self::Ttfb => "TTFB",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Lcp => "Largest Contentful Paint",
            Self::Cls => "Cumulative Layout Shift",
            Self::Inp => "Interaction to Next Paint",
            Self::Fcp => "First Contentful Paint",
            Self::Ttfb => "Time to First Byte",
        }
    }

    #[must_use]
    pub const fn unit(self) -> MetricUnit {
        match self {
            Self::Cls => MetricUnit::Unitless,
            _ => MetricUnit::Milliseconds,
        }
    }

    /// Parse a metric key; returns None for unrecognized values.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "lcp" => Some(Self::Lcp),
            "cls" => Some(Self::Cls),
            "inp" => Some(Self::Inp),
            "fcp" => Some(Self::Fcp),
            "ttfb" => Some(Self::Ttfb),
            _ => None,
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Device profile the upstream service emulates.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Mobile,
    Desktop,
}

impl Strategy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mobile => "mobile",
            Self::Desktop => "desktop",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat record produced by one audit run.
///
/// Scores are integers in `0..=100`. Lab and field values are independent:
/// either side may be missing without the other being affected. `inp` has
/// no lab source and stays `None`; only `crux_inp` is ever populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedAuditMetrics {
    #[serde(deserialize_with = "score")]
    pub perf_score: u8,
    #[serde(default, deserialize_with = "optional_score", skip_serializing_if = "Option::is_none")]
    pub seo_score: Option<u8>,
    #[serde(default, deserialize_with = "optional_score", skip_serializing_if = "Option::is_none")]
    pub accessibility_score: Option<u8>,
    #[serde(default, deserialize_with = "optional_score", skip_serializing_if = "Option::is_none")]
    pub best_practices_score: Option<u8>,

    // Lab values from the synthetic run
    #[serde(default)]
    pub lcp: Option<f64>,
    #[serde(default)]
    pub cls: Option<f64>,
    #[serde(default)]
    pub inp: Option<f64>,
    #[serde(default)]
    pub fcp: Option<f64>,
    #[serde(default)]
    pub ttfb: Option<f64>,
    #[serde(default)]
    pub tbt: Option<f64>,
    #[serde(default)]
    pub speed_index: Option<f64>,

    // Field values, 75th percentile of real-user sessions
    #[serde(default)]
    pub crux_lcp: Option<f64>,
    #[serde(default)]
    pub crux_cls: Option<f64>,
    #[serde(default)]
    pub crux_inp: Option<f64>,
    #[serde(default)]
    pub crux_fcp: Option<f64>,

    /// Typed audit payload. A stored payload that no longer decodes is
    /// loaded as `None` rather than failing the whole record.
    #[serde(default, deserialize_with = "lenient_payload")]
    pub raw_payload: Option<LighthouseResult>,

    #[serde(default)]
    pub tool_version: String,
}

impl NormalizedAuditMetrics {
    /// Lab value for a metric.
    #[must_use]
    pub const fn lab_value(&self, key: MetricKey) -> Option<f64> {
        match key {
            MetricKey::Lcp => self.lcp,
            MetricKey::Cls => self.cls,
            MetricKey::Inp => self.inp,
            MetricKey::Fcp => self.fcp,
            MetricKey::Ttfb => self.ttfb,
        }
    }

    /// Field (P75) value for a metric. There is no field TTFB.
    #[must_use]
    pub const fn field_value(&self, key: MetricKey) -> Option<f64> {
        match key {
            MetricKey::Lcp => self.crux_lcp,
            MetricKey::Cls => self.crux_cls,
            MetricKey::Inp => self.crux_inp,
            MetricKey::Fcp => self.crux_fcp,
            MetricKey::Ttfb => None,
        }
    }

    /// Field value when present, else the lab value.
    #[must_use]
    pub fn preferred_value(&self, key: MetricKey) -> Option<f64> {
        self.field_value(key).or_else(|| self.lab_value(key))
    }
}

const MAX_SCORE: u8 = 100;

fn checked_score<E: serde::de::Error>(value: u8) -> Result<u8, E> {
    if value > MAX_SCORE {
        return Err(E::custom(format!(
            "score {value} is out of range, expected 0-{MAX_SCORE}"
        )));
    }
    Ok(value)
}

fn score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    checked_score(u8::deserialize(deserializer)?)
}

fn optional_score<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<u8>::deserialize(deserializer)?
        .map(checked_score)
        .transpose()
}

fn lenient_payload<'de, D>(deserializer: D) -> Result<Option<LighthouseResult>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match LighthouseResult::from_value(v) {
        Ok(result) => Some(result),
        Err(e) => {
            tracing::warn!("Stored audit payload is unreadable, ignoring it: {}", e);
            None
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_key_parse() {
        assert_eq!(MetricKey::parse("LCP"), Some(MetricKey::Lcp));
        assert_eq!(MetricKey::parse(" ttfb "), Some(MetricKey::Ttfb));
        assert_eq!(MetricKey::parse("tbt"), None);
    }

    #[test]
    fn test_preferred_value_uses_field_first() {
        let metrics = NormalizedAuditMetrics {
            lcp: Some(3100.0),
            crux_lcp: Some(2200.0),
            fcp: Some(1200.0),
            ttfb: Some(400.0),
            ..Default::default()
        };
        assert_eq!(metrics.preferred_value(MetricKey::Lcp), Some(2200.0));
        assert_eq!(metrics.preferred_value(MetricKey::Fcp), Some(1200.0));
        assert_eq!(metrics.preferred_value(MetricKey::Ttfb), Some(400.0));
        assert_eq!(metrics.preferred_value(MetricKey::Inp), None);
    }

    #[test]
    fn test_unreadable_payload_becomes_none() {
        let json = serde_json::json!({
            "perfScore": 71,
            "rawPayload": { "categories": "not-a-map" },
            "toolVersion": "12.0.0"
        });
        let metrics: NormalizedAuditMetrics = serde_json::from_value(json).unwrap();
        assert_eq!(metrics.perf_score, 71);
        assert!(metrics.raw_payload.is_none());
    }

    #[test]
    fn test_scores_above_100_are_rejected() {
        for json in [
            serde_json::json!({ "perfScore": 150 }),
            serde_json::json!({ "perfScore": 90, "seoScore": 101 }),
            serde_json::json!({ "perfScore": 90, "bestPracticesScore": 255 }),
        ] {
            let err = serde_json::from_value::<NormalizedAuditMetrics>(json).unwrap_err();
            assert!(err.to_string().contains("out of range"), "{err}");
        }

        let json = serde_json::json!({ "perfScore": 100, "seoScore": 0, "accessibilityScore": null });
        let metrics: NormalizedAuditMetrics = serde_json::from_value(json).unwrap();
        assert_eq!(metrics.perf_score, 100);
        assert_eq!(metrics.seo_score, Some(0));
        assert_eq!(metrics.accessibility_score, None);
    }

    #[test]
    fn test_missing_scores_stay_absent() {
        let json = serde_json::json!({ "perfScore": 88 });
        let metrics: NormalizedAuditMetrics = serde_json::from_value(json).unwrap();
        assert_eq!(metrics.seo_score, None);
        assert_eq!(metrics.accessibility_score, None);
        assert_eq!(metrics.tool_version, "");
    }
}
