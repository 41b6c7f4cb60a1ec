//! Plain-language descriptions of the core metrics for report readers.

use crate::model::MetricKey;

/// What a metric measures, in one sentence.
#[must_use]
pub const fn metric_explanation(key: MetricKey) -> &'static str {
    match key {
        MetricKey::Lcp => {
            "Time until the largest image or text block in the viewport is rendered. \
             It is the moment visitors perceive the page as loaded."
        }
        MetricKey::Cls => {
            "How much visible content moves around unexpectedly while the page loads. \
             High values cause misclicks and make the page feel unstable."
        }
        MetricKey::Inp => {
            "Delay between a user interaction (tap, click, key press) and the next frame \
             being painted. Only measurable from real visitors."
        }
        MetricKey::Fcp => {
            "Time until the first text or image appears. It tells visitors that \
             something is happening."
        }
        MetricKey::Ttfb => {
            "Time until the browser receives the first byte of the HTML document. \
             It reflects server processing, caching and network latency."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_metric_is_explained() {
        for key in MetricKey::ALL {
            assert!(metric_explanation(key).len() > 40, "{key}");
        }
    }
}
