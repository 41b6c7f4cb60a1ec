//! Unified error types for perfally.
//!
//! This module provides the error hierarchy for the library. The one error
//! that callers are expected to branch on is [`AuditServiceError`]: an audit
//! run that produced no data. Everything with a defined fallback (the AI
//! planner, an unreadable findings payload) is absorbed where it happens.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for perfally operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PerfAllyError {
    /// The upstream scoring service failed or was unreachable
    #[error(transparent)]
    AuditService(#[from] AuditServiceError),

    /// Errors while reading an audit payload or snapshot
    #[error("Failed to read audit payload: {context}")]
    Payload {
        context: String,
        #[source]
        source: PayloadErrorKind,
    },

    /// Errors during report generation
    #[error("Report generation failed: {context}")]
    Report {
        context: String,
        #[source]
        source: ReportErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Failure reported by the upstream scoring service.
///
/// `status_code` is `None` for transport failures (DNS, TLS, timeout) and
/// for responses that could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AuditServiceError {
    pub message: String,
    pub status_code: Option<u16>,
}

impl AuditServiceError {
    pub fn new(message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self {
            message: message.into(),
            status_code,
        }
    }

    /// Error for a non-success HTTP status, preferring the upstream message.
    pub fn from_status(status: u16, upstream_message: Option<String>) -> Self {
        let message = upstream_message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Scoring API error {status}"));
        Self::new(message, Some(status))
    }

    /// Error for a failure below the HTTP layer.
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::new(format!("Scoring API unreachable: {err}"), None)
    }
}

/// Specific payload error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PayloadErrorKind {
    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Invalid field value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Specific report error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ReportErrorKind {
    #[error("JSON serialization failed: {0}")]
    JsonSerializationError(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for perfally operations
pub type Result<T> = std::result::Result<T, PerfAllyError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl PerfAllyError {
    /// Create a payload error with context
    pub fn payload(context: impl Into<String>, source: PayloadErrorKind) -> Self {
        Self::Payload {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a report error
    pub fn report(context: impl Into<String>, source: ReportErrorKind) -> Self {
        Self::Report {
            context: context.into(),
            source,
        }
    }

    /// Upstream HTTP status, when this error came from the scoring service.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::AuditService(e) => e.status_code,
            _ => None,
        }
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for PerfAllyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for PerfAllyError {
    fn from(err: serde_json::Error) -> Self {
        Self::payload(
            "JSON deserialization",
            PayloadErrorKind::InvalidJson(err.to_string()),
        )
    }
}

impl From<crate::reports::ReportError> for PerfAllyError {
    fn from(err: crate::reports::ReportError) -> Self {
        match err {
            crate::reports::ReportError::IoError(source) => Self::from(source),
            crate::reports::ReportError::SerializationError(message) => Self::report(
                "rendering",
                ReportErrorKind::JsonSerializationError(message),
            ),
        }
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings are chained outermost-first, so a failure deep inside
/// snapshot loading reads as `"loading project: reading snapshot: ..."`.
///
/// # Example
///
/// ```ignore
/// use perfally::error::ErrorContext;
///
/// fn load_snapshot(path: &Path) -> Result<AuditSnapshot> {
///     let content = std::fs::read_to_string(path)
///         .with_context(|| format!("reading {}", path.display()))?;
///     serde_json::from_str(&content).context("decoding audit snapshot")
/// }
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure, evaluated only on the error path.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<PerfAllyError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
///
/// Upstream service errors keep their message untouched: it is shown to
/// users verbatim.
fn add_context_to_error(err: PerfAllyError, new_ctx: &str) -> PerfAllyError {
    match err {
        PerfAllyError::Payload {
            context: existing,
            source,
        } => PerfAllyError::Payload {
            context: chain_context(new_ctx, &existing),
            source,
        },
        PerfAllyError::Report {
            context: existing,
            source,
        } => PerfAllyError::Report {
            context: chain_context(new_ctx, &existing),
            source,
        },
        PerfAllyError::Io {
            path,
            message,
            source,
        } => PerfAllyError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        PerfAllyError::Validation(msg) => PerfAllyError::Validation(chain_context(new_ctx, &msg)),
        other @ PerfAllyError::AuditService(_) => other,
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}
