//! GitLab merge request intake.
//!
//! This module talks to the GitLab REST v4 API: it lists labelled merge
//! requests, fetches individual merge requests, pages through discussion
//! threads and reads raw file content. Errors are mapped into
//! [`IntakeError`] variants so callers can decide whether a failure aborts a
//! run or only skips part of it.

pub mod error;
mod error_mapping;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod pagination;
pub mod transport;

pub use error::IntakeError;
pub use gateway::{GitLabGateway, MergeRequestSource};
pub use locator::{
    MergeRequestIid, PersonalAccessToken, ProjectId, ProjectLocator, parse_merge_request_ids,
};
pub use models::{Discussion, MergeRequest, Note, Position};
pub use pagination::{DEFAULT_PER_PAGE, ListEndpoint, PagedItems, fetch_all_pages};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};

#[cfg(test)]
pub use gateway::MockMergeRequestSource;
