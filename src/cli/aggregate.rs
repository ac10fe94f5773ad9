//! Runs an aggregation, or re-renders a saved collection, and reports it.
//!
//! Reports go to stdout unless an export is being streamed there, in which
//! case stdout carries only the export and the totals are logged instead.

use std::fs::File;
use std::io::{self, BufReader, Write};

use camino::Utf8Path;
use mrscribe::{
    AggregationReport, CommentAggregator, GitLabGateway, IntakeError, MrScribeConfig, ReviewComment,
    ReviewSession, RunMode, RunOutcome, read_jsonl,
};
use tracing::info;

use super::export_comments::write_output;
use super::output::{write_hierarchy, write_overview, write_summary, write_warnings};

/// Runs the configured operation.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration is invalid
/// - The project id or token is missing
/// - A saved collection cannot be read
/// - Writing the report or export fails
pub async fn run(config: &MrScribeConfig) -> Result<(), IntakeError> {
    config.validate()?;
    let export_format = config.export_format()?;

    let mut session = ReviewSession::new();
    let outcome = match config.run_mode() {
        RunMode::Offline(path) => session.load(load_collection(path)?),
        RunMode::Fetch => session.record(fetch(config).await),
    };
    if let RunOutcome::Failed(error) = &outcome {
        return Err(error.clone());
    }

    let summary = session.summary();
    info!(
        comments = summary.total_comments,
        merge_requests = summary.merge_requests,
        code_locations = summary.code_locations,
        general_comments = summary.general_comments,
        "run complete"
    );

    let output = config.output_path();
    let streams_export = export_format.is_some() && output.is_none();
    if !streams_export {
        write_report(&session, &outcome)?;
    }

    match export_format {
        Some(format) if !session.is_empty() => write_output(output, session.comments(), format),
        Some(format) => {
            info!(%format, "no comments, nothing exported");
            Ok(())
        }
        None => Ok(()),
    }
}

async fn fetch(config: &MrScribeConfig) -> Result<AggregationReport, IntakeError> {
    let locator = config.project_locator()?;
    let token = config.resolve_token()?;
    let selection = config.selection()?;
    let gateway = GitLabGateway::for_token(&token, locator)?.with_per_page(config.per_page)?;
    let aggregator = CommentAggregator::new(&gateway);
    Ok(aggregator.run(&selection).await)
}

fn load_collection(path: &Utf8Path) -> Result<Vec<ReviewComment>, IntakeError> {
    let file = File::open(path).map_err(|e| IntakeError::Io {
        message: format!("failed to open saved collection '{path}': {e}"),
    })?;
    let comments = read_jsonl(BufReader::new(file))?;
    info!(%path, comments = comments.len(), "loaded saved collection");
    Ok(comments)
}

fn write_report(session: &ReviewSession, outcome: &RunOutcome) -> Result<(), IntakeError> {
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    write_summary(&mut writer, outcome, &session.summary())?;
    write_warnings(&mut writer, session.warnings())?;
    if !session.is_empty() {
        let grouped = session.grouped();
        write_overview(&mut writer, &grouped)?;
        write_hierarchy(&mut writer, &grouped)?;
    }
    writer.flush().map_err(|e| IntakeError::Io {
        message: format!("failed to flush stdout: {e}"),
    })
}
