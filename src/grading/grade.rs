//! Threshold grading for metrics and category scores.

use crate::model::MetricKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity band. Ordered `Good < NeedsImprovement < Poor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Grade {
    Good,
    NeedsImprovement,
    Poor,
}

impl Grade {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::NeedsImprovement => "needs-improvement",
            Self::Poor => "poor",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::NeedsImprovement => "Needs improvement",
            Self::Poor => "Poor",
        }
    }

    /// Foreground color for this band.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Good => GOOD_COLOR,
            Self::NeedsImprovement => NEEDS_IMPROVEMENT_COLOR,
            Self::Poor => POOR_COLOR,
        }
    }

    /// Light background tint for this band.
    #[must_use]
    pub const fn background(self) -> &'static str {
        match self {
            Self::Good => "#f0fdf4",
            Self::NeedsImprovement => "#fffbeb",
            Self::Poor => "#fef2f2",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const GOOD_COLOR: &str = "#16a34a";
pub const NEEDS_IMPROVEMENT_COLOR: &str = "#d97706";
pub const POOR_COLOR: &str = "#dc2626";

/// Fixed good/poor thresholds for one metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Values at or below this are `Good`
    pub good: f64,
    /// Values above this are `Poor`
    pub poor: f64,
}

impl Thresholds {
    #[must_use]
    pub const fn for_metric(key: MetricKey) -> Self {
        match key {
            MetricKey::Lcp => Self { good: 2500.0, poor: 4000.0 },
            MetricKey::Cls => Self { good: 0.1, poor: 0.25 },
            MetricKey::Inp => Self { good: 200.0, poor: 500.0 },
            MetricKey::Fcp => Self { good: 1800.0, poor: 3000.0 },
            MetricKey::Ttfb => Self { good: 800.0, poor: 1800.0 },
        }
    }
}

/// Grade a metric value.
///
/// A value exactly at the poor threshold is still `NeedsImprovement`.
#[must_use]
pub fn grade_metric(key: MetricKey, value: f64) -> Grade {
    let t = Thresholds::for_metric(key);
    if value <= t.good {
        Grade::Good
    } else if value <= t.poor {
        Grade::NeedsImprovement
    } else {
        Grade::Poor
    }
}

/// Grade a 0-100 category score.
#[must_use]
pub fn grade_score(score: f64) -> Grade {
    if score >= 90.0 {
        Grade::Good
    } else if score >= 50.0 {
        Grade::NeedsImprovement
    } else {
        Grade::Poor
    }
}

/// Gauge color for a 0-100 score, banded like [`grade_score`].
#[must_use]
pub fn score_gauge_color(score: f64) -> &'static str {
    grade_score(score).color()
}

/// Composite site health.
///
/// Unmeasured SEO or accessibility falls back to the performance score, so a
/// category that was not requested never drags the composite down.
#[must_use]
pub fn site_health_score(perf: u8, seo: Option<u8>, accessibility: Option<u8>) -> u8 {
    let perf_f = f64::from(perf);
    let seo_f = f64::from(seo.unwrap_or(perf));
    let a11y_f = f64::from(accessibility.unwrap_or(perf));
    (perf_f * 0.4 + seo_f * 0.3 + a11y_f * 0.3)
        .round()
        .clamp(0.0, 100.0) as u8
}
