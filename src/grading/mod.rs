//! Metric grading engine.
//!
//! Pure functions mapping metric values and category scores to fixed
//! severity bands, plus the display formatting shared by every renderer.
//! Thresholds are fixed and not configurable.

mod explanations;
mod format;
mod grade;

pub use explanations::metric_explanation;
pub use format::{
    format_bytes, format_duration_ms, format_metric, format_metric_value, format_optional_metric,
    metric_target,
};
pub use grade::{
    grade_metric, grade_score, score_gauge_color, site_health_score, Grade, Thresholds,
    GOOD_COLOR, NEEDS_IMPROVEMENT_COLOR, POOR_COLOR,
};
