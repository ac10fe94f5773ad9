//! JSON Lines export and import.
//!
//! Each comment is written as one JSON object per line. Every field of
//! [`ReviewComment`] is kept, so [`read_jsonl`] restores the collection
//! exactly and the other formats can be rendered from it offline.

use std::io::{BufRead, Write};

use crate::gitlab::IntakeError;
use crate::review::ReviewComment;

use super::io_error;

/// Writes comments in JSONL format to the given writer.
///
/// # Errors
///
/// Returns [`IntakeError::Io`] if writing to the output fails, or if
/// JSON serialization fails (which should not happen for valid comments).
pub fn write_jsonl<W: Write>(
    writer: &mut W,
    comments: &[ReviewComment],
) -> Result<(), IntakeError> {
    for comment in comments {
        serde_json::to_writer(&mut *writer, comment).map_err(|e| IntakeError::Io {
            message: format!("JSON serialization failed: {e}"),
        })?;
        writeln!(writer).map_err(|e| io_error(&e))?;
    }
    Ok(())
}

/// Reads a collection written by [`write_jsonl`].
///
/// Blank lines are ignored.
///
/// # Errors
///
/// Returns [`IntakeError::Io`] if reading fails, or
/// [`IntakeError::InvalidCollection`] naming the first line that is not a
/// valid comment.
pub fn read_jsonl<R: BufRead>(reader: R) -> Result<Vec<ReviewComment>, IntakeError> {
    let mut comments = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let text = line.map_err(|e| io_error(&e))?;
        if text.trim().is_empty() {
            continue;
        }
        let comment: ReviewComment =
            serde_json::from_str(&text).map_err(|e| IntakeError::InvalidCollection {
                message: format!("line {}: {e}", index + 1),
            })?;
        comments.push(comment);
    }
    Ok(comments)
}
