//! Output handling for reports and snapshots.

use crate::error::{PerfAllyError, Result};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;

/// Target for output - either stdout or a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Write to stdout
    Stdout,
    /// Write to a file
    File(PathBuf),
}

impl OutputTarget {
    /// Create output target from optional path
    #[must_use]
    pub fn from_option(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Stdout, Self::File)
    }

    /// Check if output is to a terminal
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stdout) && std::io::stdout().is_terminal()
    }
}

/// Determine if color should be used based on flags, environment and target
#[must_use]
pub fn should_use_color(no_color_flag: bool, target: &OutputTarget) -> bool {
    !no_color_flag && std::env::var_os("NO_COLOR").is_none() && target.is_terminal()
}

/// Write output bytes to the target.
///
/// Binary output is never written to an interactive terminal.
pub fn write_output(content: &[u8], target: &OutputTarget, binary: bool) -> Result<()> {
    match target {
        OutputTarget::Stdout => {
            if binary && target.is_terminal() {
                return Err(PerfAllyError::validation(
                    "refusing to write a binary document to the terminal; pass --output-file",
                ));
            }
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content)?;
            stdout.flush()?;
            Ok(())
        }
        OutputTarget::File(path) => {
            std::fs::write(path, content).map_err(|e| PerfAllyError::io(path, e))?;
            tracing::info!("Wrote {} bytes to {}", content.len(), path.display());
            Ok(())
        }
    }
}
