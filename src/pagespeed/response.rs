//! Scoring API response types.
//!
//! Only the parts of the response that feed normalization are modelled.
//! The lab result is kept as raw JSON here and decoded into the typed
//! payload during normalization.

use serde::Deserialize;

/// Top-level response of one scoring run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PsiResponse {
    pub lighthouse_result: serde_json::Value,
    /// Real-user data for this exact page; needs enough page traffic
    #[serde(default)]
    pub loading_experience: Option<CruxExperience>,
    /// Real-user data for the whole origin
    #[serde(default)]
    pub origin_loading_experience: Option<CruxExperience>,
}

/// A block of real-user field data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CruxExperience {
    #[serde(default)]
    pub metrics: Option<CruxMetrics>,
}

/// Field metrics by their fixed upstream names.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct CruxMetrics {
    #[serde(default)]
    pub largest_contentful_paint_ms: Option<CruxMetric>,
    /// Stored multiplied by 100
    #[serde(default)]
    pub cumulative_layout_shift_score: Option<CruxMetric>,
    #[serde(default)]
    pub interaction_to_next_paint: Option<CruxMetric>,
    #[serde(default)]
    pub first_contentful_paint_ms: Option<CruxMetric>,
}

/// A single field metric. `percentile` is the flat P75 value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CruxMetric {
    #[serde(default)]
    pub percentile: Option<f64>,
}

/// Error body returned on non-success statuses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PsiErrorBody {
    #[serde(default)]
    pub error: Option<PsiErrorDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PsiErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

impl PsiErrorBody {
    /// Upstream message, if the body carried one.
    #[must_use]
    pub fn message(self) -> Option<String> {
        self.error.and_then(|e| e.message)
    }
}
