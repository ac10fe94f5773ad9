//! Run state kept between aggregation runs.
//!
//! A session starts empty, holds the comments of the last successful run and
//! is emptied again by [`ReviewSession::reset`]. A failed run never touches
//! the comments of an earlier successful one.

use crate::gitlab::IntakeError;

use super::comment::ReviewComment;
use super::grouping::GroupedComments;
use super::pipeline::{AggregationReport, RunWarning};
use super::summary::RunSummary;

/// What happened to the last run recorded in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The run found comments; they replaced the previous results.
    Populated {
        /// Number of comments collected.
        comments: usize,
        /// Number of merge requests processed.
        merge_requests: usize,
    },
    /// The run succeeded but found no comments.
    NoComments {
        /// Number of merge requests processed.
        merge_requests: usize,
    },
    /// The run failed; previous results were kept.
    Failed(IntakeError),
}

/// Comments of the most recent successful run.
#[derive(Debug, Clone, Default)]
pub struct ReviewSession {
    comments: Vec<ReviewComment>,
    warnings: Vec<RunWarning>,
    last_outcome: Option<RunOutcome>,
}

impl ReviewSession {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the result of a run and returns its outcome.
    ///
    /// A successful run replaces the stored comments, even when it found
    /// none. A failed run only updates the outcome.
    pub fn record(&mut self, run: Result<AggregationReport, IntakeError>) -> RunOutcome {
        match run {
            Ok(report) => {
                let merge_requests = report.merge_requests.len();
                self.store(report.comments, report.warnings, merge_requests)
            }
            Err(error) => {
                let outcome = RunOutcome::Failed(error);
                self.last_outcome = Some(outcome.clone());
                outcome
            }
        }
    }

    /// Loads a previously saved collection as if it came from a run.
    pub fn load(&mut self, comments: Vec<ReviewComment>) -> RunOutcome {
        let merge_requests = GroupedComments::from_comments(&comments).len();
        self.store(comments, Vec::new(), merge_requests)
    }

    fn store(
        &mut self,
        comments: Vec<ReviewComment>,
        warnings: Vec<RunWarning>,
        merge_requests: usize,
    ) -> RunOutcome {
        let outcome = if comments.is_empty() {
            RunOutcome::NoComments { merge_requests }
        } else {
            RunOutcome::Populated {
                comments: comments.len(),
                merge_requests,
            }
        };
        self.comments = comments;
        self.warnings = warnings;
        self.last_outcome = Some(outcome.clone());
        outcome
    }

    /// Clears results and outcome.
    pub fn reset(&mut self) {
        self.comments.clear();
        self.warnings.clear();
        self.last_outcome = None;
    }

    /// Comments of the last successful run.
    #[must_use]
    pub fn comments(&self) -> &[ReviewComment] {
        &self.comments
    }

    /// Warnings of the last successful run.
    #[must_use]
    pub fn warnings(&self) -> &[RunWarning] {
        &self.warnings
    }

    /// Outcome of the last recorded run.
    #[must_use]
    pub const fn last_outcome(&self) -> Option<&RunOutcome> {
        self.last_outcome.as_ref()
    }

    /// Returns true when the session holds no comments.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Groups the stored comments.
    #[must_use]
    pub fn grouped(&self) -> GroupedComments<'_> {
        GroupedComments::from_comments(&self.comments)
    }

    /// Totals over the stored comments.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary::from_grouped(&self.grouped())
    }
}
