//! Comment export.
//!
//! Three formats are supported:
//!
//! - **Markdown**: a document grouped by merge request, then by code
//!   location, with each location's snippet shown once
//! - **CSV**: a flat table with one row per comment, in input order
//! - **JSONL**: one JSON object per comment; the only format that can be read
//!   back, so the other two can be produced again offline

mod csv;
mod jsonl;
mod markdown;
mod model;
#[doc(hidden)]
pub mod test_helpers;

use std::io::Write;

use crate::gitlab::IntakeError;
use crate::review::ReviewComment;

pub use self::csv::{CSV_HEADER, write_csv};
pub use jsonl::{read_jsonl, write_jsonl};
pub use markdown::{display_timestamp, write_markdown};
pub use model::ExportFormat;

/// Writes `comments` to `writer` in `format`.
///
/// # Errors
///
/// Returns [`IntakeError::Io`] if writing fails.
pub fn write_export<W: Write>(
    writer: &mut W,
    format: ExportFormat,
    comments: &[ReviewComment],
) -> Result<(), IntakeError> {
    match format {
        ExportFormat::Markdown => write_markdown(writer, comments),
        ExportFormat::Csv => write_csv(writer, comments),
        ExportFormat::Jsonl => write_jsonl(writer, comments),
    }
}

/// Converts an I/O error to an [`IntakeError::Io`].
#[must_use]
pub fn io_error(error: &std::io::Error) -> IntakeError {
    IntakeError::Io {
        message: error.to_string(),
    }
}
