//! Gateway for reading merge requests, discussions and files from GitLab.
//!
//! [`MergeRequestSource`] is the seam the aggregation pipeline depends on,
//! which keeps it mockable in tests. [`GitLabGateway`] implements it over any
//! [`HttpTransport`].

use async_trait::async_trait;
use tracing::debug;

use crate::gitlab::error::IntakeError;
use crate::gitlab::error_mapping::{decode_json, map_http_error};
use crate::gitlab::locator::{MergeRequestIid, PersonalAccessToken, ProjectLocator};
use crate::gitlab::models::{ApiDiscussion, ApiMergeRequest, Discussion, MergeRequest};
use crate::gitlab::pagination::{
    DEFAULT_PER_PAGE, ListEndpoint, PagedItems, fetch_all_pages, validate_per_page,
};
use crate::gitlab::transport::{HttpTransport, ReqwestTransport};

/// Read-only access to the GitLab data the pipeline consumes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MergeRequestSource: Send + Sync {
    /// Lists every merge request carrying `label`, in any state.
    ///
    /// A failed page keeps the merge requests gathered so far and records the
    /// failure in [`PagedItems::interruption`].
    async fn labelled_merge_requests(&self, label: &str) -> PagedItems<MergeRequest>;

    /// Fetches a single merge request.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError`] on transport failure, a non-success status or
    /// an unexpected body.
    async fn merge_request(&self, iid: MergeRequestIid) -> Result<MergeRequest, IntakeError>;

    /// Lists every discussion thread of a merge request.
    async fn discussions(&self, iid: MergeRequestIid) -> PagedItems<Discussion>;

    /// Fetches raw file content at `revision`.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError`] on transport failure or a non-success status.
    async fn raw_file(&self, file_path: &str, revision: &str) -> Result<String, IntakeError>;
}

/// GitLab REST v4 gateway for one project.
pub struct GitLabGateway<Transport> {
    transport: Transport,
    locator: ProjectLocator,
    per_page: u8,
}

impl GitLabGateway<ReqwestTransport> {
    /// Builds a reqwest-backed gateway authenticated with `token`.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Network`] when the HTTP client cannot be built.
    pub fn for_token(
        token: &PersonalAccessToken,
        locator: ProjectLocator,
    ) -> Result<Self, IntakeError> {
        let transport = ReqwestTransport::new(token.clone())?;
        Ok(Self::new(transport, locator))
    }
}

impl<Transport: HttpTransport> GitLabGateway<Transport> {
    /// Creates a gateway over `transport` using the default page size.
    #[must_use]
    pub const fn new(transport: Transport, locator: ProjectLocator) -> Self {
        Self {
            transport,
            locator,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    /// Overrides the page size used for list endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidPagination`] when `per_page` is outside
    /// GitLab's accepted range.
    pub fn with_per_page(mut self, per_page: u8) -> Result<Self, IntakeError> {
        validate_per_page(per_page)?;
        self.per_page = per_page;
        Ok(self)
    }

    /// Project this gateway reads from.
    #[must_use]
    pub const fn locator(&self) -> &ProjectLocator {
        &self.locator
    }

    fn list_endpoint(&self, url: url::Url) -> Result<ListEndpoint, IntakeError> {
        ListEndpoint::new(url, self.per_page)
    }
}

#[async_trait]
impl<Transport: HttpTransport> MergeRequestSource for GitLabGateway<Transport> {
    async fn labelled_merge_requests(&self, label: &str) -> PagedItems<MergeRequest> {
        let endpoint = match self.list_endpoint(self.locator.merge_requests_url()) {
            Ok(endpoint) => endpoint.with_query("state", "all").with_query("labels", label),
            Err(error) => return interrupted(error),
        };
        let paged: PagedItems<ApiMergeRequest> =
            fetch_all_pages(&self.transport, &endpoint, "list merge requests").await;
        debug!(label, count = paged.items.len(), "listed labelled merge requests");
        paged.map_items(MergeRequest::from)
    }

    async fn merge_request(&self, iid: MergeRequestIid) -> Result<MergeRequest, IntakeError> {
        let url = self.locator.merge_request_url(iid);
        let response = self.transport.get(&url, &[]).await?;
        let api: ApiMergeRequest = decode_json("merge request", &response)?;
        Ok(api.into())
    }

    async fn discussions(&self, iid: MergeRequestIid) -> PagedItems<Discussion> {
        let endpoint = match self.list_endpoint(self.locator.discussions_url(iid)) {
            Ok(endpoint) => endpoint,
            Err(error) => return interrupted(error),
        };
        let paged: PagedItems<ApiDiscussion> =
            fetch_all_pages(&self.transport, &endpoint, "list discussions").await;
        paged.map_items(Discussion::from)
    }

    async fn raw_file(&self, file_path: &str, revision: &str) -> Result<String, IntakeError> {
        let url = self.locator.raw_file_url(file_path);
        let query = [("ref".to_owned(), revision.to_owned())];
        let response = self.transport.get(&url, &query).await?;
        if response.status.is_success() {
            Ok(response.body)
        } else {
            Err(map_http_error("raw file", &response))
        }
    }
}

const fn interrupted<T>(error: IntakeError) -> PagedItems<T> {
    PagedItems {
        items: Vec::new(),
        requests: 0,
        interruption: Some(error),
    }
}
