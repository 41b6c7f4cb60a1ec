//! JSON report renderer.

use super::data::ReportData;
use super::{ReportError, ReportFormat, ReportInput, ReportOptions, ReportRenderer};
use serde::Serialize;

/// Serializes the resolved report content.
pub struct JsonRenderer {
    /// Pretty print output
    pretty: bool,
}

impl JsonRenderer {
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRenderer for JsonRenderer {
    fn render(&self, input: &ReportInput<'_>, options: &ReportOptions) -> Result<Vec<u8>, ReportError> {
        let data = input.resolve(options);
        let report = JsonReport {
            tool: ToolInfo {
                name: "perfally",
                version: env!("CARGO_PKG_VERSION"),
            },
            data: &data,
        };
        let json = if self.pretty {
            serde_json::to_vec_pretty(&report)
        } else {
            serde_json::to_vec(&report)
        };
        json.map_err(|e| ReportError::SerializationError(e.to_string()))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    tool: ToolInfo,
    #[serde(flatten)]
    data: &'a ReportData,
}

#[derive(Serialize)]
struct ToolInfo {
    name: &'static str,
    version: &'static str,
}
