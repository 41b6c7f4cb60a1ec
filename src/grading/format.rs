//! Display formatting for metric values, durations and byte sizes.

use crate::model::{MetricKey, MetricUnit};

/// Format a metric value by key name.
///
/// Unknown keys fall back to the plain number.
///
/// ```
/// use perfally::grading::format_metric_value;
///
/// assert_eq!(format_metric_value("cls", 0.1), "0.100");
/// assert_eq!(format_metric_value("lcp", 999.0), "999ms");
/// assert_eq!(format_metric_value("lcp", 2500.0), "2.5s");
/// assert_eq!(format_metric_value("unknown", 42.0), "42");
/// ```
#[must_use]
pub fn format_metric_value(key: &str, value: f64) -> String {
    MetricKey::parse(key).map_or_else(|| value.to_string(), |k| format_metric(k, value))
}

/// Format a metric value for display.
#[must_use]
pub fn format_metric(key: MetricKey, value: f64) -> String {
    match key.unit() {
        MetricUnit::Unitless => format!("{value:.3}"),
        MetricUnit::Milliseconds => format_duration_ms(value),
    }
}

/// Format an optional metric value, showing `N/A` when absent.
#[must_use]
pub fn format_optional_metric(key: MetricKey, value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format_metric(key, v))
}

/// `"350ms"` below one second, `"1.2s"` from one second up.
#[must_use]
pub fn format_duration_ms(ms: f64) -> String {
    if ms < 1000.0 {
        format!("{}ms", ms.round() as i64)
    } else {
        format!("{:.1}s", ms / 1000.0)
    }
}

/// Binary byte size: `"512 B"`, `"98 KiB"`, `"1.4 MiB"`.
#[must_use]
pub fn format_bytes(bytes: f64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = 1024.0 * 1024.0;
    if bytes < KIB {
        format!("{} B", bytes.round() as i64)
    } else if bytes < MIB {
        format!("{} KiB", (bytes / KIB).round() as i64)
    } else {
        format!("{:.1} MiB", bytes / MIB)
    }
}

/// Human target for a metric, e.g. `"< 2.5s"`.
#[must_use]
pub const fn metric_target(key: MetricKey) -> &'static str {
    match key {
        MetricKey::Lcp => "< 2.5s",
        MetricKey::Cls => "< 0.1",
        MetricKey::Inp => "< 200ms",
        MetricKey::Fcp => "< 1.8s",
        MetricKey::Ttfb => "< 800ms",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cls_three_decimals() {
        assert_eq!(format_metric_value("cls", 0.125), "0.125");
        assert_eq!(format_metric_value("cls", 0.1), "0.100");
    }

    #[test]
    fn test_time_metrics() {
        assert_eq!(format_metric_value("lcp", 800.0), "800ms");
        assert_eq!(format_metric_value("lcp", 1000.0), "1.0s");
        assert_eq!(format_metric_value("fcp", 999.0), "999ms");
        assert_eq!(format_metric_value("ttfb", 1000.0), "1.0s");
        assert_eq!(format_metric_value("inp", 200.0), "200ms");
    }

    #[test]
    fn test_unknown_key_is_plain_number() {
        assert_eq!(format_metric_value("unknown", 42.0), "42");
        assert_eq!(format_metric_value("speed", 0.5), "0.5");
    }

    #[test]
    fn test_bytes() {
        assert_eq!(format_bytes(512.0), "512 B");
        assert_eq!(format_bytes(100_352.0), "98 KiB");
        assert_eq!(format_bytes(1_572_864.0), "1.5 MiB");
    }

    #[test]
    fn test_optional_metric() {
        assert_eq!(format_optional_metric(MetricKey::Inp, None), "N/A");
        assert_eq!(format_optional_metric(MetricKey::Cls, Some(0.02)), "0.020");
    }
}
