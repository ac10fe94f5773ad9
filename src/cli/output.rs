//! Text views of a run written to a terminal.

use std::io::Write;

use mrscribe::export::{display_timestamp, io_error};
use mrscribe::review::{LocationGroup, MergeRequestGroup, RunWarning, overview};
use mrscribe::{CodeLocation, GroupedComments, IntakeError, RunOutcome, RunSummary};

const SNIPPET_INDENT: &str = "      | ";

/// Writes the outcome line and, for populated runs, the totals.
pub fn write_summary<W: Write>(
    writer: &mut W,
    outcome: &RunOutcome,
    summary: &RunSummary,
) -> Result<(), IntakeError> {
    match outcome {
        RunOutcome::Populated { .. } => {
            writeln!(
                writer,
                "Found {} comments across {} merge requests",
                summary.total_comments, summary.merge_requests
            )
            .map_err(|e| io_error(&e))?;
            writeln!(
                writer,
                "Code locations: {} unique code locations, {} general comments",
                summary.code_locations, summary.general_comments
            )
            .map_err(|e| io_error(&e))?;
        }
        RunOutcome::NoComments { merge_requests } => {
            writeln!(
                writer,
                "No comments found in {merge_requests} selected merge requests."
            )
            .map_err(|e| io_error(&e))?;
        }
        RunOutcome::Failed(error) => {
            writeln!(writer, "Run failed: {error}").map_err(|e| io_error(&e))?;
        }
    }
    Ok(())
}

/// Writes one line per skipped or truncated part of the run.
pub fn write_warnings<W: Write>(
    writer: &mut W,
    warnings: &[RunWarning],
) -> Result<(), IntakeError> {
    if warnings.is_empty() {
        return Ok(());
    }
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(writer, "Incomplete results:").map_err(|e| io_error(&e))?;
    for warning in warnings {
        writeln!(writer, "  - {warning}").map_err(|e| io_error(&e))?;
    }
    Ok(())
}

/// Writes the per merge request overview table.
pub fn write_overview<W: Write>(
    writer: &mut W,
    grouped: &GroupedComments<'_>,
) -> Result<(), IntakeError> {
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(
        writer,
        "{:<8} {:<53} {:>8} {:>9} {:>7}",
        "MR ID", "Title", "Comments", "Locations", "General"
    )
    .map_err(|e| io_error(&e))?;
    for row in overview(grouped) {
        writeln!(
            writer,
            "{:<8} {:<53} {:>8} {:>9} {:>7}",
            row.mr_id, row.title, row.total_comments, row.code_locations, row.general_comments
        )
        .map_err(|e| io_error(&e))?;
    }
    Ok(())
}

/// Writes every merge request, location and comment as an indented tree.
pub fn write_hierarchy<W: Write>(
    writer: &mut W,
    grouped: &GroupedComments<'_>,
) -> Result<(), IntakeError> {
    for group in grouped.merge_requests() {
        write_merge_request(writer, group)?;
    }
    Ok(())
}

fn write_merge_request<W: Write>(
    writer: &mut W,
    group: &MergeRequestGroup<'_>,
) -> Result<(), IntakeError> {
    writeln!(writer).map_err(|e| io_error(&e))?;
    writeln!(
        writer,
        "MR !{}: {} ({} comments)",
        group.mr_id(),
        group.title(),
        group.total_comments()
    )
    .map_err(|e| io_error(&e))?;
    for bucket in group.locations() {
        write_location(writer, bucket)?;
    }
    Ok(())
}

fn write_location<W: Write>(writer: &mut W, bucket: &LocationGroup<'_>) -> Result<(), IntakeError> {
    let heading = match bucket.location() {
        CodeLocation::General => "General comments".to_owned(),
        located @ CodeLocation::Located { .. } => located.key(),
    };
    writeln!(writer, "  {heading} ({} comments)", bucket.comments().len())
        .map_err(|e| io_error(&e))?;
    if let Some(snippet) = bucket.snippet() {
        for line in snippet.lines() {
            writeln!(writer, "{SNIPPET_INDENT}{line}").map_err(|e| io_error(&e))?;
        }
    }
    for comment in bucket.comments() {
        writeln!(
            writer,
            "    - {} at {}: {}",
            comment.author,
            display_timestamp(&comment.created_at),
            comment.review_text.replace('\n', " ")
        )
        .map_err(|e| io_error(&e))?;
    }
    Ok(())
}
