//! Mrscribe library crate: GitLab merge request review comment aggregation.
//!
//! The library reads merge requests from a GitLab project (selected by label
//! or by explicit id), collects every human review comment from their
//! discussion threads, attaches a short source snippet to inline comments
//! and renders the result as Markdown, CSV or JSON Lines.
//!
//! - [`gitlab`] talks to the GitLab REST API
//! - [`review`] normalizes, groups and summarizes comments
//! - [`export`] writes and reads exported collections
//! - [`config`] loads layered configuration

pub mod config;
pub mod export;
pub mod gitlab;
pub mod review;

pub use config::{MrScribeConfig, RunMode};
pub use export::{ExportFormat, read_jsonl, write_csv, write_export, write_jsonl, write_markdown};
pub use gitlab::{
    GitLabGateway, IntakeError, MergeRequestIid, MergeRequestSource, PersonalAccessToken, ProjectId,
    ProjectLocator,
};
pub use review::{
    AggregationReport, CodeLocation, CommentAggregator, GroupedComments, MergeRequestSelection,
    ReviewComment, ReviewSession, RunOutcome, RunSummary,
};
