//! Rule-based remediation plan.
//!
//! Failing performance checks are looked up in a fixed table of known checks.
//! Checks without an entry are skipped rather than given generic advice.

use crate::grading::{format_bytes, format_duration_ms};
use crate::model::{category_ids, ActionItem, AuditRecord, Impact, LighthouseResult};
use std::collections::HashSet;

/// Static guidance for one known check.
#[derive(Debug, Clone, Copy)]
pub struct StaticRule {
    pub audit_id: &'static str,
    pub title: &'static str,
    pub fix: &'static str,
    pub impact: Impact,
}

const fn rule(
    audit_id: &'static str,
    title: &'static str,
    fix: &'static str,
    impact: Impact,
) -> StaticRule {
    StaticRule {
        audit_id,
        title,
        fix,
        impact,
    }
}

/// Known performance checks.
pub const STATIC_RULES: &[StaticRule] = &[
    // High
    rule(
        "render-blocking-resources",
        "Eliminate render-blocking resources",
        "Inline critical CSS, load the rest asynchronously, and add defer or async to scripts in <head>.",
        Impact::High,
    ),
    rule(
        "unused-javascript",
        "Remove unused JavaScript",
        "Split bundles by route, lazy-load below-the-fold widgets, and drop libraries that are no longer used.",
        Impact::High,
    ),
    rule(
        "largest-contentful-paint-element",
        "Speed up the largest visible element",
        "Serve the hero image or heading early: preload it, avoid lazy-loading it, and keep it out of client-side rendering.",
        Impact::High,
    ),
    rule(
        "server-response-time",
        "Reduce server response time",
        "Cache rendered pages at the edge, optimise slow database queries, and move the origin closer to visitors.",
        Impact::High,
    ),
    rule(
        "uses-optimized-images",
        "Compress images",
        "Re-encode images at a lower quality setting and strip metadata. Most photos lose nothing visible at 75-80%.",
        Impact::High,
    ),
    rule(
        "modern-image-formats",
        "Serve images in modern formats",
        "Convert JPEG and PNG assets to WebP or AVIF, keeping the originals only as fallbacks.",
        Impact::High,
    ),
    rule(
        "total-byte-weight",
        "Reduce total page weight",
        "Audit the heaviest requests. Compress media, trim fonts to used subsets, and remove unused third-party tags.",
        Impact::High,
    ),
    rule(
        "bootup-time",
        "Reduce JavaScript execution time",
        "Ship less JavaScript, defer non-critical scripts, and move heavy work off the main thread.",
        Impact::High,
    ),
    rule(
        "mainthread-work-breakdown",
        "Minimise main-thread work",
        "Break up long tasks, reduce style recalculation by simplifying selectors, and defer non-essential scripts.",
        Impact::High,
    ),
    rule(
        "redirects",
        "Avoid multiple page redirects",
        "Link directly to the final URL and collapse redirect chains (http to https to www) into a single hop.",
        Impact::High,
    ),
    // Medium
    rule(
        "unused-css-rules",
        "Remove unused CSS",
        "Purge unused selectors at build time and split page-specific styles out of the global stylesheet.",
        Impact::Medium,
    ),
    rule(
        "unminified-javascript",
        "Minify JavaScript",
        "Enable minification in the production build so comments and whitespace are stripped.",
        Impact::Medium,
    ),
    rule(
        "unminified-css",
        "Minify CSS",
        "Enable CSS minification in the build pipeline or asset plugin.",
        Impact::Medium,
    ),
    rule(
        "uses-text-compression",
        "Enable text compression",
        "Turn on Brotli or gzip for HTML, CSS, JavaScript and JSON responses at the server or CDN.",
        Impact::Medium,
    ),
    rule(
        "uses-responsive-images",
        "Serve properly sized images",
        "Provide srcset and sizes so small screens download small images instead of desktop-sized ones.",
        Impact::Medium,
    ),
    rule(
        "offscreen-images",
        "Defer offscreen images",
        "Add loading=\"lazy\" to images below the fold so they load only when scrolled into view.",
        Impact::Medium,
    ),
    rule(
        "efficient-animated-content",
        "Use video for animated content",
        "Replace large animated GIFs with muted, looping MP4 or WebM video.",
        Impact::Medium,
    ),
    rule(
        "third-party-summary",
        "Reduce the impact of third-party code",
        "Review tag managers, chat widgets and trackers. Remove unused ones and load the rest after interaction.",
        Impact::Medium,
    ),
    rule(
        "dom-size",
        "Avoid an excessive DOM size",
        "Paginate or virtualise long lists and remove wrapper elements that exist only for styling.",
        Impact::Medium,
    ),
    rule(
        "layout-shifts",
        "Avoid large layout shifts",
        "Reserve space for images, embeds and ads with explicit dimensions or aspect-ratio.",
        Impact::Medium,
    ),
    rule(
        "cumulative-layout-shift",
        "Stabilise the layout while loading",
        "Set width and height on media, avoid inserting content above existing content, and preload web fonts.",
        Impact::Medium,
    ),
    rule(
        "uses-long-cache-ttl",
        "Cache static assets for longer",
        "Serve fingerprinted assets with Cache-Control: max-age=31536000, immutable.",
        Impact::Medium,
    ),
    rule(
        "font-display",
        "Keep text visible while fonts load",
        "Add font-display: swap to @font-face rules so fallback text renders immediately.",
        Impact::Medium,
    ),
    rule(
        "legacy-javascript",
        "Stop shipping legacy JavaScript to modern browsers",
        "Raise the build's browser targets so polyfills and transpiled syntax are only sent where needed.",
        Impact::Medium,
    ),
    rule(
        "duplicated-javascript",
        "Remove duplicate modules from bundles",
        "Deduplicate dependency versions and check that shared libraries are not bundled twice.",
        Impact::Medium,
    ),
    rule(
        "lcp-lazy-loaded",
        "Do not lazy-load the largest image",
        "Remove loading=\"lazy\" from the hero image and give it fetchpriority=\"high\".",
        Impact::Medium,
    ),
    rule(
        "unsized-images",
        "Give images explicit dimensions",
        "Set width and height attributes on every <img> so the browser can reserve space before it loads.",
        Impact::Medium,
    ),
    rule(
        "non-composited-animations",
        "Animate only composited properties",
        "Animate transform and opacity instead of layout properties such as top, left, width or height.",
        Impact::Medium,
    ),
    // Low
    rule(
        "uses-rel-preconnect",
        "Preconnect to required origins",
        "Add <link rel=\"preconnect\"> for the CDN, font and API origins the page needs immediately.",
        Impact::Low,
    ),
    rule(
        "uses-rel-preload",
        "Preload key requests",
        "Preload late-discovered critical resources such as web fonts referenced from CSS.",
        Impact::Low,
    ),
    rule(
        "prioritize-lcp-image",
        "Preload the largest image",
        "Add <link rel=\"preload\" as=\"image\"> with fetchpriority=\"high\" for the hero image.",
        Impact::Low,
    ),
    rule(
        "critical-request-chains",
        "Shorten critical request chains",
        "Reduce chained dependencies: inline small critical files and preload what is discovered late.",
        Impact::Low,
    ),
    rule(
        "user-timings",
        "Review user timing marks",
        "Check that custom performance marks are not measuring work that could be deferred.",
        Impact::Low,
    ),
    rule(
        "long-tasks",
        "Break up long main-thread tasks",
        "Split work into chunks under 50ms and yield to the browser between them.",
        Impact::Low,
    ),
];

/// Look up the static rule for a check id.
#[must_use]
pub fn rule_for(audit_id: &str) -> Option<&'static StaticRule> {
    STATIC_RULES.iter().find(|r| r.audit_id == audit_id)
}

/// Build the rule-based plan for a payload.
///
/// Items are ordered by impact (high first), then by the check's position
/// in the performance category. No failing known checks yields an empty list.
#[must_use]
pub fn get_action_plan(raw: &LighthouseResult) -> Vec<ActionItem> {
    let mut seen = HashSet::new();
    let mut items: Vec<ActionItem> = raw
        .checks_in(category_ids::PERFORMANCE)
        .filter(|audit| audit.is_failing() && seen.insert(audit.id.as_str()))
        .filter_map(|audit| {
            rule_for(&audit.id).map(|rule| ActionItem {
                audit_id: audit.id.clone(),
                title: rule.title.to_string(),
                fix: rule.fix.to_string(),
                impact: rule.impact,
                savings: savings_estimate(audit),
            })
        })
        .collect();

    // Stable: upstream order is kept within each impact band
    items.sort_by_key(|item| item.impact);
    items
}

/// Savings estimate from the check's details, time preferred over bytes.
fn savings_estimate(audit: &AuditRecord) -> Option<String> {
    let details = audit.details.as_ref()?;
    if let Some(ms) = details.overall_savings_ms.filter(|ms| *ms > 0.0) {
        return Some(format_duration_ms(ms));
    }
    details
        .overall_savings_bytes
        .filter(|b| *b > 0.0)
        .map(format_bytes)
}
