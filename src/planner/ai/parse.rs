//! Extraction of the action list from model output.

use super::client::AiPlanFailure;
use crate::model::AiActionItem;
use regex::Regex;
use std::sync::LazyLock;

/// Widest bracketed span: first `[` through last `]`.
static ARRAY_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("static regex"));

/// Parse the action list out of free-form model text.
///
/// Surrounding prose is tolerated. A missing span, invalid JSON, a non-array
/// value or an empty array are all failures.
pub fn parse_action_items(text: &str) -> Result<Vec<AiActionItem>, AiPlanFailure> {
    let span = ARRAY_SPAN
        .find(text)
        .ok_or(AiPlanFailure::NoJsonArray)?
        .as_str();

    let value: serde_json::Value =
        serde_json::from_str(span).map_err(|e| AiPlanFailure::Malformed(e.to_string()))?;
    if !value.is_array() {
        return Err(AiPlanFailure::Malformed("not an array".to_string()));
    }

    let items: Vec<AiActionItem> =
        serde_json::from_value(value).map_err(|e| AiPlanFailure::Malformed(e.to_string()))?;
    if items.is_empty() {
        return Err(AiPlanFailure::Empty);
    }
    Ok(items)
}
