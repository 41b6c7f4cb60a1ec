//! Flattening of a scoring response into [`NormalizedAuditMetrics`].

use super::response::{CruxExperience, CruxMetric, CruxMetrics, PsiResponse};
use crate::error::AuditServiceError;
use crate::model::{category_ids, LighthouseResult, NormalizedAuditMetrics};

/// Lab audit ids for each normalized field.
mod lab_ids {
    pub const LCP: &str = "largest-contentful-paint";
    pub const CLS: &str = "cumulative-layout-shift";
    pub const FCP: &str = "first-contentful-paint";
    pub const TTFB: &str = "server-response-time";
    pub const TBT: &str = "total-blocking-time";
    pub const SPEED_INDEX: &str = "speed-index";
}

/// Decode and normalize a full response.
pub fn normalize_response(
    response: PsiResponse,
) -> Result<NormalizedAuditMetrics, AuditServiceError> {
    let lhr = LighthouseResult::from_value(response.lighthouse_result).map_err(|e| {
        AuditServiceError::new(format!("Scoring API returned an unreadable result: {e}"), None)
    })?;
    Ok(normalize(
        lhr,
        response.loading_experience.as_ref(),
        response.origin_loading_experience.as_ref(),
    ))
}

/// Normalize a decoded lab result plus optional field data.
///
/// Each field metric resolves independently: page-level percentile, else
/// origin-level percentile, else `None`.
#[must_use]
pub fn normalize(
    lhr: LighthouseResult,
    page: Option<&CruxExperience>,
    origin: Option<&CruxExperience>,
) -> NormalizedAuditMetrics {
    let page = page.and_then(|e| e.metrics.as_ref());
    let origin = origin.and_then(|e| e.metrics.as_ref());
    let crux = |pick: fn(&CruxMetrics) -> Option<&CruxMetric>| {
        page.and_then(|m| pick(m).and_then(|c| c.percentile))
            .or_else(|| origin.and_then(|m| pick(m).and_then(|c| c.percentile)))
    };

    let crux_lcp = crux(|m| m.largest_contentful_paint_ms.as_ref());
    let crux_cls = crux(|m| m.cumulative_layout_shift_score.as_ref()).map(|v| v / 100.0);
    let crux_inp = crux(|m| m.interaction_to_next_paint.as_ref());
    let crux_fcp = crux(|m| m.first_contentful_paint_ms.as_ref());

    let tool_version = lhr
        .lighthouse_version
        .clone()
        .unwrap_or_else(|| "unknown".to_string());

    NormalizedAuditMetrics {
        perf_score: lhr.category_score(category_ids::PERFORMANCE).unwrap_or(0),
        seo_score: lhr.category_score(category_ids::SEO),
        accessibility_score: lhr.category_score(category_ids::ACCESSIBILITY),
        best_practices_score: lhr.category_score(category_ids::BEST_PRACTICES),
        lcp: lhr.numeric_value(lab_ids::LCP),
        cls: lhr.numeric_value(lab_ids::CLS),
        // Synthetic runs have no real interactions to time
        inp: None,
        fcp: lhr.numeric_value(lab_ids::FCP),
        ttfb: lhr.numeric_value(lab_ids::TTFB),
        tbt: lhr.numeric_value(lab_ids::TBT),
        speed_index: lhr.numeric_value(lab_ids::SPEED_INDEX),
        crux_lcp,
        crux_cls,
        crux_inp,
        crux_fcp,
        raw_payload: Some(lhr),
        tool_version,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(page: serde_json::Value, origin: serde_json::Value) -> PsiResponse {
        serde_json::from_value(json!({
            "lighthouseResult": {
                "lighthouseVersion": "12.2.1",
                "categories": {
                    "performance": { "score": 0.734 },
                    "seo": { "score": 0.92 },
                    "accessibility": { "score": 1 },
                    "best-practices": { "score": null }
                },
                "audits": {
                    "largest-contentful-paint": { "numericValue": 3120.4 },
                    "cumulative-layout-shift": { "numericValue": 0.04 },
                    "first-contentful-paint": { "numericValue": 1410 },
                    "server-response-time": { "numericValue": 220 },
                    "total-blocking-time": { "numericValue": 380 },
                    "speed-index": { "numericValue": 4200 }
                }
            },
            "loadingExperience": page,
            "originLoadingExperience": origin
        }))
        .unwrap()
    }

    #[test]
    fn test_scores_and_lab_values() {
        let m = normalize_response(response(json!(null), json!(null))).unwrap();
        assert_eq!(m.perf_score, 73);
        assert_eq!(m.seo_score, Some(92));
        assert_eq!(m.accessibility_score, Some(100));
        assert_eq!(m.best_practices_score, None);
        assert_eq!(m.lcp, Some(3120.4));
        assert_eq!(m.cls, Some(0.04));
        assert_eq!(m.ttfb, Some(220.0));
        assert_eq!(m.tbt, Some(380.0));
        assert_eq!(m.speed_index, Some(4200.0));
        assert_eq!(m.inp, None);
        assert_eq!(m.tool_version, "12.2.1");
        assert!(m.raw_payload.is_some());
        assert_eq!(m.crux_lcp, None);
    }

    #[test]
    fn test_page_level_field_data_wins() {
        let page = json!({ "metrics": {
            "LARGEST_CONTENTFUL_PAINT_MS": { "percentile": 2100 }
        }});
        let origin = json!({ "metrics": {
            "LARGEST_CONTENTFUL_PAINT_MS": { "percentile": 2900 },
            "INTERACTION_TO_NEXT_PAINT": { "percentile": 180 },
            "CUMULATIVE_LAYOUT_SHIFT_SCORE": { "percentile": 10 },
            "FIRST_CONTENTFUL_PAINT_MS": { "percentile": 1500 }
        }});
        let m = normalize_response(response(page, origin)).unwrap();
        assert_eq!(m.crux_lcp, Some(2100.0));
        assert_eq!(m.crux_inp, Some(180.0));
        assert_eq!(m.crux_cls, Some(0.1));
        assert_eq!(m.crux_fcp, Some(1500.0));
        // Field INP never leaks into the lab slot
        assert_eq!(m.inp, None);
    }

    #[test]
    fn test_missing_performance_category_scores_zero() {
        let resp: PsiResponse = serde_json::from_value(json!({
            "lighthouseResult": { "categories": {}, "audits": {} }
        }))
        .unwrap();
        let m = normalize_response(resp).unwrap();
        assert_eq!(m.perf_score, 0);
        assert_eq!(m.tool_version, "unknown");
        assert_eq!(m.lcp, None);
    }

    #[test]
    fn test_unreadable_lab_result_is_service_error() {
        let resp: PsiResponse =
            serde_json::from_value(json!({ "lighthouseResult": "oops" })).unwrap();
        let err = normalize_response(resp).unwrap_err();
        assert_eq!(err.status_code, None);
    }
}
