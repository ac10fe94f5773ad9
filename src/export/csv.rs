//! CSV table export.
//!
//! One row per comment, in input order, with no grouping. Fields containing
//! the delimiter, a quote or a line break are quoted, and quotes inside them
//! are doubled. Records end with `\r\n`.

use std::io::Write;

use crate::gitlab::IntakeError;
use crate::review::ReviewComment;

use super::io_error;

/// Column headings, in output order.
pub const CSV_HEADER: [&str; 8] = [
    "MR Title",
    "MR ID",
    "File Path",
    "Line Number",
    "Code Snippet",
    "Author",
    "Review Comment",
    "Created At",
];

const RECORD_TERMINATOR: &str = "\r\n";

/// Writes comments as CSV, header first.
///
/// # Errors
///
/// Returns [`IntakeError::Io`] if writing to the output fails.
pub fn write_csv<W: Write>(writer: &mut W, comments: &[ReviewComment]) -> Result<(), IntakeError> {
    write_record(writer, &CSV_HEADER)?;
    for comment in comments {
        let mr_id = comment.mr_id.to_string();
        let line_number = comment
            .line_number
            .map(|line| line.to_string())
            .unwrap_or_default();
        write_record(
            writer,
            &[
                comment.mr_title.as_str(),
                mr_id.as_str(),
                comment.file_path.as_str(),
                line_number.as_str(),
                comment.code_snippet.as_str(),
                comment.author.as_str(),
                comment.review_text.as_str(),
                comment.created_at.as_str(),
            ],
        )?;
    }
    Ok(())
}

fn write_record<W: Write>(writer: &mut W, fields: &[&str]) -> Result<(), IntakeError> {
    let record = fields
        .iter()
        .map(|field| escape_field(field))
        .collect::<Vec<_>>()
        .join(",");
    write!(writer, "{record}{RECORD_TERMINATOR}").map_err(|e| io_error(&e))
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}
