//! Report type definitions.

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PRODUCT_NAME: &str = "PerfAlly";
pub const DEFAULT_PRODUCT_CONTACT: &str = "perfally.com";
pub const DEFAULT_ACCENT: &str = "#2563eb";

/// Output format for reports
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Paginated PDF document
    #[default]
    Pdf,
    /// The same pages as plain text, separated by form feeds
    Text,
    /// Structured report data
    Json,
}

impl ReportFormat {
    /// Conventional file extension for this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Text => "txt",
            Self::Json => "json",
        }
    }

    /// Whether the output is binary and should not be written to a terminal.
    #[must_use]
    pub const fn is_binary(self) -> bool {
        matches!(self, Self::Pdf)
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pdf => write!(f, "pdf"),
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Render-time settings that do not come from the project data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Shown on the project cover and stored as the document creation date.
    /// Fix it to get byte-identical output.
    pub generated_at: DateTime<Utc>,
    /// Name used in the footer when no branding applies
    pub product_name: String,
    pub product_contact: String,
    /// `#rrggbb` accent used when no branding applies
    pub default_accent: String,
    /// ANSI colors in text output
    pub color: bool,
}

impl ReportOptions {
    /// Options with product defaults, generated now.
    #[must_use]
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Options with product defaults and a fixed generation time.
    #[must_use]
    pub fn at(generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            product_name: DEFAULT_PRODUCT_NAME.to_string(),
            product_contact: DEFAULT_PRODUCT_CONTACT.to_string(),
            default_accent: DEFAULT_ACCENT.to_string(),
            color: false,
        }
    }

    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::new()
    }
}
