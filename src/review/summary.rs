//! Aggregate figures shown after a run.

use super::grouping::{GroupedComments, MergeRequestGroup};

/// Longest title shown in an overview row before it is shortened.
pub const OVERVIEW_TITLE_LIMIT: usize = 50;

/// Totals over a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of comments.
    pub total_comments: usize,
    /// Number of distinct merge requests with at least one comment.
    pub merge_requests: usize,
    /// Number of distinct code locations across every merge request.
    pub code_locations: usize,
    /// Number of general comments across every merge request.
    pub general_comments: usize,
}

impl RunSummary {
    /// Computes totals from grouped comments.
    #[must_use]
    pub fn from_grouped(grouped: &GroupedComments<'_>) -> Self {
        grouped
            .merge_requests()
            .iter()
            .fold(Self::default(), |totals, group| Self {
                total_comments: totals.total_comments + group.total_comments(),
                merge_requests: totals.merge_requests + 1,
                code_locations: totals.code_locations + group.code_location_count(),
                general_comments: totals.general_comments + group.general_comment_count(),
            })
    }
}

/// One row of the per merge request overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequestOverview {
    /// Title, shortened to [`OVERVIEW_TITLE_LIMIT`] characters plus `...`.
    pub title: String,
    /// Merge request id.
    pub mr_id: u64,
    /// Comments on the merge request.
    pub total_comments: usize,
    /// Distinct code locations.
    pub code_locations: usize,
    /// General comments.
    pub general_comments: usize,
}

impl From<&MergeRequestGroup<'_>> for MergeRequestOverview {
    fn from(group: &MergeRequestGroup<'_>) -> Self {
        Self {
            title: shorten_title(group.title()),
            mr_id: group.mr_id(),
            total_comments: group.total_comments(),
            code_locations: group.code_location_count(),
            general_comments: group.general_comment_count(),
        }
    }
}

/// Builds overview rows in grouping order.
#[must_use]
pub fn overview(grouped: &GroupedComments<'_>) -> Vec<MergeRequestOverview> {
    grouped
        .merge_requests()
        .iter()
        .map(MergeRequestOverview::from)
        .collect()
}

fn shorten_title(title: &str) -> String {
    if title.chars().count() <= OVERVIEW_TITLE_LIMIT {
        return title.to_owned();
    }
    let mut short: String = title.chars().take(OVERVIEW_TITLE_LIMIT).collect();
    short.push_str("...");
    short
}
