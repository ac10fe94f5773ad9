//! Review comment aggregation.
//!
//! Selects merge requests, normalizes their discussion notes into
//! [`ReviewComment`] records with code context, and groups them by merge
//! request and code location. [`ReviewSession`] keeps the result of the last
//! successful run.

pub mod comment;
pub mod context;
pub mod grouping;
pub mod location;
pub mod normalizer;
pub mod pipeline;
pub mod selector;
pub mod session;
pub mod summary;

pub use comment::ReviewComment;
pub use context::{CodeContextResolver, snippet_window};
pub use grouping::{GroupedComments, LocationGroup, MergeRequestGroup};
pub use location::CodeLocation;
pub use normalizer::CommentNormalizer;
pub use pipeline::{AggregationReport, CommentAggregator, RunWarning};
pub use selector::{
    MergeRequestSelection, SelectedMergeRequests, SkippedMergeRequest, select_merge_requests,
};
pub use session::{ReviewSession, RunOutcome};
pub use summary::{MergeRequestOverview, RunSummary, overview};
