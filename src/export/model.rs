//! Export format selection.

use std::fmt;
use std::str::FromStr;

use crate::gitlab::IntakeError;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Document grouped by merge request and code location.
    Markdown,
    /// Flat table, one row per comment.
    Csv,
    /// One JSON object per comment; can be loaded back with
    /// [`super::read_jsonl`].
    Jsonl,
}

impl FromStr for ExportFormat {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "csv" => Ok(Self::Csv),
            "jsonl" | "json-lines" | "jsonlines" => Ok(Self::Jsonl),
            _ => Err(IntakeError::Configuration {
                message: format!(
                    "unsupported export format '{s}': valid options are 'markdown', 'csv' or 'jsonl'"
                ),
            }),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => write!(f, "markdown"),
            Self::Csv => write!(f, "csv"),
            Self::Jsonl => write!(f, "jsonl"),
        }
    }
}
