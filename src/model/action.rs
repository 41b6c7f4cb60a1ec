//! Remediation items produced by the planners.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Expected impact of fixing a check.
///
/// Variant order is severity order: sorting ascending puts `High` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High impact",
            Self::Medium => "Medium impact",
            Self::Low => "Low impact",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        f.write_str(s)
    }
}

/// Rule-based remediation item derived from a failing performance check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    pub audit_id: String,
    pub title: String,
    pub fix: String,
    pub impact: Impact,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub savings: Option<String>,
}

/// Effort estimate attached to a model-generated item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Parse a difficulty label, accepting English and Portuguese spellings.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "fácil" | "facil" => Some(Self::Easy),
            "medium" | "médio" | "medio" => Some(Self::Medium),
            "hard" | "difícil" | "dificil" => Some(Self::Hard),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Badge text for reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Difficulty {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown difficulty '{s}'")))
    }
}

/// Model-generated remediation item, stored alongside its audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiActionItem {
    pub title: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<String>,
    pub why: String,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_tip: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impact_sort_order() {
        let mut impacts = vec![Impact::Low, Impact::High, Impact::Medium, Impact::High];
        impacts.sort();
        assert_eq!(
            impacts,
            vec![Impact::High, Impact::High, Impact::Medium, Impact::Low]
        );
    }

    #[test]
    fn test_difficulty_accepts_localized_labels() {
        assert_eq!(Difficulty::parse("Fácil"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::parse("MÉDIO"), Some(Difficulty::Medium));
        assert_eq!(Difficulty::parse("dificil"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("Hard"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("trivial"), None);
    }

    #[test]
    fn test_ai_item_decoding() {
        let json = r#"{
            "title": "Defer third-party tags",
            "action": "Load the tag manager after first interaction.",
            "why": "Cuts main-thread blocking during load.",
            "difficulty": "Médio"
        }"#;
        let item: AiActionItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.difficulty, Difficulty::Medium);
        assert!(item.steps.is_empty());
        assert_eq!(item.stack_tip, None);

        let out = serde_json::to_value(&item).unwrap();
        assert_eq!(out["difficulty"], "medium");
        assert!(out.get("stackTip").is_none());
    }

    #[test]
    fn test_ai_item_rejects_unknown_difficulty() {
        let json = r#"{"title":"t","action":"a","why":"w","difficulty":"whenever"}"#;
        assert!(serde_json::from_str::<AiActionItem>(json).is_err());
    }
}
