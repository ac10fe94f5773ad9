//! Markdown document export.
//!
//! Comments are grouped by merge request, then by code location. Each
//! location's snippet is written once, as a fenced code block, followed by
//! every comment made there.

use std::io::Write;

use camino::Utf8Path;
use chrono::DateTime;

use crate::gitlab::IntakeError;
use crate::review::{CodeLocation, GroupedComments, LocationGroup, MergeRequestGroup, ReviewComment};

use super::io_error;

/// Length of a timestamp shown to second precision.
const TIMESTAMP_LEN: usize = 19;

/// Writes comments as a Markdown document.
///
/// # Errors
///
/// Returns [`IntakeError::Io`] if writing to the output fails.
pub fn write_markdown<W: Write>(
    writer: &mut W,
    comments: &[ReviewComment],
) -> Result<(), IntakeError> {
    writeln!(writer, "# GitLab MR Comments Export").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;

    let grouped = GroupedComments::from_comments(comments);
    for group in grouped.merge_requests() {
        write_merge_request(writer, group)?;
    }
    Ok(())
}

fn write_merge_request<W: Write>(
    writer: &mut W,
    group: &MergeRequestGroup<'_>,
) -> Result<(), IntakeError> {
    writeln!(writer, "## MR: {}", group.title()).map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "**MR ID:** {}", group.mr_id()).map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;

    for bucket in group.locations() {
        write_location(writer, bucket)?;
    }

    writeln!(writer).map_err(|e| io_error(&e))?;
    Ok(())
}

fn write_location<W: Write>(writer: &mut W, bucket: &LocationGroup<'_>) -> Result<(), IntakeError> {
    match bucket.location() {
        CodeLocation::General => {
            writeln!(writer, "### General Comments").map_err(|e| io_error(&e))?;
        }
        CodeLocation::Located { path, line } => {
            writeln!(writer, "### Code Location: {path}:{line}").map_err(|e| io_error(&e))?;
        }
    }
    writeln!(writer).map_err(|e| io_error(&e))?;

    if let (CodeLocation::Located { path, .. }, Some(snippet)) =
        (bucket.location(), bucket.snippet())
    {
        write_code_block(writer, path, snippet)?;
    }

    for comment in bucket.comments() {
        write_comment(writer, comment)?;
    }

    writeln!(writer, "---").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    Ok(())
}

fn write_comment<W: Write>(writer: &mut W, comment: &ReviewComment) -> Result<(), IntakeError> {
    writeln!(
        writer,
        "**{}** at `{}`:",
        comment.author,
        display_timestamp(&comment.created_at)
    )
    .map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "{}", comment.review_text).map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    Ok(())
}

/// Writes a fenced code block tagged with the language of `file_path`.
///
/// The fence is longer than any backtick run in the snippet so the block
/// cannot be closed early.
fn write_code_block<W: Write>(
    writer: &mut W,
    file_path: &str,
    snippet: &str,
) -> Result<(), IntakeError> {
    let language = Utf8Path::new(file_path)
        .extension()
        .map_or(FALLBACK_LANGUAGE, extension_to_language);

    let fence = compute_fence(snippet);
    writeln!(writer, "{fence}{language}").map_err(|e| io_error(&e))?;
    writeln!(writer, "{snippet}").map_err(|e| io_error(&e))?;
    writeln!(writer, "{fence}").map_err(|e| io_error(&e))?;
    writeln!(writer).map_err(|e| io_error(&e))?;
    Ok(())
}

/// Computes a fence string that exceeds any backtick run in the content.
fn compute_fence(content: &str) -> String {
    let max_backticks = content.split(|c| c != '`').map(str::len).max().unwrap_or(0);
    let fence_len = max_backticks.max(2) + 1;
    "`".repeat(fence_len)
}

/// Formats a timestamp as `YYYY-MM-DDTHH:MM:SS`.
///
/// RFC 3339 values are parsed and keep their own offset; anything else is cut
/// to its first 19 characters.
#[must_use]
pub fn display_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw).map_or_else(
        |_| raw.chars().take(TIMESTAMP_LEN).collect(),
        |parsed| parsed.format("%Y-%m-%dT%H:%M:%S").to_string(),
    )
}

const FALLBACK_LANGUAGE: &str = "text";

const EXTENSION_MAPPINGS: &[(&str, &str)] = &[
    ("rs", "rust"),
    ("py", "python"),
    ("js", "javascript"),
    ("mjs", "javascript"),
    ("ts", "typescript"),
    ("jsx", "jsx"),
    ("tsx", "tsx"),
    ("vue", "vue"),
    ("rb", "ruby"),
    ("go", "go"),
    ("java", "java"),
    ("groovy", "groovy"),
    ("gradle", "groovy"),
    ("scala", "scala"),
    ("kt", "kotlin"),
    ("kts", "kotlin"),
    ("swift", "swift"),
    ("dart", "dart"),
    ("c", "c"),
    ("cpp", "cpp"),
    ("cc", "cpp"),
    ("h", "cpp"),
    ("hpp", "cpp"),
    ("cs", "csharp"),
    ("php", "php"),
    ("sh", "bash"),
    ("bash", "bash"),
    ("ps1", "powershell"),
    ("sql", "sql"),
    ("md", "markdown"),
    ("json", "json"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
    ("toml", "toml"),
    ("xml", "xml"),
    ("properties", "properties"),
    ("html", "html"),
    ("css", "css"),
    ("scss", "scss"),
];

fn extension_to_language(ext: &str) -> &'static str {
    let ext_lower = ext.to_lowercase();
    EXTENSION_MAPPINGS
        .iter()
        .find(|(e, _)| *e == ext_lower)
        .map_or(FALLBACK_LANGUAGE, |(_, lang)| lang)
}

#[cfg(test)]
#[path = "markdown_tests.rs"]
mod tests;
