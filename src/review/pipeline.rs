//! Aggregation run: select merge requests, read their discussions and
//! normalize every note into a [`ReviewComment`].
//!
//! Nothing in a run is fatal. Failures are logged, recorded as
//! [`RunWarning`]s, and the affected subtree is skipped.

use std::fmt;

use tracing::{info, warn};

use crate::gitlab::{IntakeError, MergeRequest, MergeRequestIid, MergeRequestSource};

use super::comment::ReviewComment;
use super::normalizer::CommentNormalizer;
use super::selector::{MergeRequestSelection, select_merge_requests};

/// A part of the run that was skipped or cut short.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunWarning {
    /// The labelled listing stopped early; later merge requests are missing.
    ListingInterrupted {
        /// The failure.
        error: IntakeError,
    },
    /// An explicitly requested merge request could not be fetched.
    MergeRequestSkipped {
        /// The requested merge request.
        iid: MergeRequestIid,
        /// The failure.
        error: IntakeError,
    },
    /// Discussions of a merge request stopped early.
    DiscussionsInterrupted {
        /// The merge request.
        iid: u64,
        /// The failure.
        error: IntakeError,
    },
}

impl fmt::Display for RunWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ListingInterrupted { error } => {
                write!(f, "merge request listing incomplete: {error}")
            }
            Self::MergeRequestSkipped { iid, error } => {
                write!(f, "merge request {iid} skipped: {error}")
            }
            Self::DiscussionsInterrupted { iid, error } => {
                write!(f, "discussions of !{iid} incomplete: {error}")
            }
        }
    }
}

/// Result of one aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationReport {
    /// Merge requests that were processed, in selection order.
    pub merge_requests: Vec<MergeRequest>,
    /// Normalized comments in discovery order.
    pub comments: Vec<ReviewComment>,
    /// Everything that was skipped along the way.
    pub warnings: Vec<RunWarning>,
}

impl AggregationReport {
    /// Returns true when the run completed without skipping anything.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Runs aggregation against a [`MergeRequestSource`].
pub struct CommentAggregator<'source, Source: ?Sized> {
    source: &'source Source,
}

impl<'source, Source> CommentAggregator<'source, Source>
where
    Source: MergeRequestSource + ?Sized,
{
    /// Creates an aggregator reading from `source`.
    #[must_use]
    pub const fn new(source: &'source Source) -> Self {
        Self { source }
    }

    /// Collects the comments of every selected merge request.
    ///
    /// Merge requests are processed one after another in selection order, and
    /// discussions and notes in the order GitLab returns them.
    pub async fn run(&self, selection: &MergeRequestSelection) -> AggregationReport {
        let selected = select_merge_requests(self.source, selection).await;
        let mut report = AggregationReport::default();
        if let Some(error) = selected.listing_interruption {
            report.warnings.push(RunWarning::ListingInterrupted { error });
        }
        report.warnings.extend(
            selected
                .skipped
                .into_iter()
                .map(|skip| RunWarning::MergeRequestSkipped {
                    iid: skip.iid,
                    error: skip.error,
                }),
        );

        let mut normalizer = CommentNormalizer::new(self.source);
        for merge_request in selected.merge_requests {
            let comments = self
                .collect_merge_request(&mut normalizer, &merge_request, &mut report.warnings)
                .await;
            report.comments.extend(comments);
            report.merge_requests.push(merge_request);
        }

        info!(
            merge_requests = report.merge_requests.len(),
            comments = report.comments.len(),
            file_fetches = normalizer.file_fetches(),
            warnings = report.warnings.len(),
            "aggregation finished"
        );
        report
    }

    async fn collect_merge_request(
        &self,
        normalizer: &mut CommentNormalizer<'source, Source>,
        merge_request: &MergeRequest,
        warnings: &mut Vec<RunWarning>,
    ) -> Vec<ReviewComment> {
        let Ok(iid) = MergeRequestIid::new(merge_request.iid) else {
            warn!(title = merge_request.title.as_str(), "merge request without iid skipped");
            return Vec::new();
        };
        let discussions = self.source.discussions(iid).await;
        if let Some(error) = discussions.interruption {
            warn!(
                iid = merge_request.iid,
                kept = discussions.items.len(),
                %error,
                "discussion listing interrupted"
            );
            warnings.push(RunWarning::DiscussionsInterrupted {
                iid: merge_request.iid,
                error,
            });
        }

        let mut comments = Vec::new();
        for discussion in &discussions.items {
            comments.extend(
                normalizer
                    .normalize_discussion(merge_request, discussion)
                    .await,
            );
        }
        info!(
            iid = merge_request.iid,
            discussions = discussions.items.len(),
            comments = comments.len(),
            "collected merge request comments"
        );
        comments
    }
}
