//! Page-number pagination over GitLab list endpoints.
//!
//! GitLab list endpoints take `page` and `per_page` query parameters. The
//! fetcher walks pages from 1 and stops at the first empty page or the first
//! page holding fewer than `per_page` items. A short page is taken as proof
//! that no further pages exist; no extra request is made to confirm it.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::error::IntakeError;
use super::error_mapping::decode_json;
use super::transport::HttpTransport;

/// Default number of items requested per page.
pub const DEFAULT_PER_PAGE: u8 = 50;

/// Largest page size GitLab honours.
pub const MAX_PER_PAGE: u8 = 100;

/// A list endpoint: URL, fixed filters and page size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEndpoint {
    url: Url,
    query: Vec<(String, String)>,
    per_page: u8,
}

impl ListEndpoint {
    /// Describes a list endpoint fetched `per_page` items at a time.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidPagination`] when `per_page` is zero or
    /// above [`MAX_PER_PAGE`].
    pub fn new(url: Url, per_page: u8) -> Result<Self, IntakeError> {
        validate_per_page(per_page)?;
        Ok(Self {
            url,
            query: Vec::new(),
            per_page,
        })
    }

    /// Adds a fixed query parameter sent with every page request.
    #[must_use]
    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_owned(), value.to_owned()));
        self
    }

    fn query_for_page(&self, page: u32) -> Vec<(String, String)> {
        let mut query = self.query.clone();
        query.push(("per_page".to_owned(), self.per_page.to_string()));
        query.push(("page".to_owned(), page.to_string()));
        query
    }
}

/// Validates a page size against GitLab's limits.
///
/// # Errors
///
/// Returns [`IntakeError::InvalidPagination`] when `per_page` is zero or
/// above [`MAX_PER_PAGE`].
pub fn validate_per_page(per_page: u8) -> Result<(), IntakeError> {
    if per_page == 0 {
        return Err(IntakeError::InvalidPagination {
            message: "per_page must be at least 1".to_owned(),
        });
    }
    if per_page > MAX_PER_PAGE {
        return Err(IntakeError::InvalidPagination {
            message: format!("per_page must not exceed {MAX_PER_PAGE}"),
        });
    }
    Ok(())
}

/// Items gathered from a list endpoint.
///
/// A failed page request does not discard earlier pages: the items already
/// gathered are kept and the failure is recorded in `interruption`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedItems<T> {
    /// Concatenated items of every page fetched successfully.
    pub items: Vec<T>,
    /// Number of page requests issued, including a failed one.
    pub requests: u32,
    /// The failure that stopped pagination early, if any.
    pub interruption: Option<IntakeError>,
}

impl<T> PagedItems<T> {
    /// Returns true when pagination ran to the last page.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.interruption.is_none()
    }

    /// Converts every item, keeping the request count and interruption.
    #[must_use]
    pub fn map_items<U>(self, convert: impl FnMut(T) -> U) -> PagedItems<U> {
        PagedItems {
            items: self.items.into_iter().map(convert).collect(),
            requests: self.requests,
            interruption: self.interruption,
        }
    }
}

/// Fetches every page of `endpoint` and concatenates the items.
///
/// `operation` names the endpoint in error messages.
pub async fn fetch_all_pages<T, Transport>(
    transport: &Transport,
    endpoint: &ListEndpoint,
    operation: &str,
) -> PagedItems<T>
where
    T: DeserializeOwned,
    Transport: HttpTransport + ?Sized,
{
    let per_page = usize::from(endpoint.per_page);
    let mut items: Vec<T> = Vec::new();
    let mut requests = 0_u32;
    let mut page = 1_u32;

    let interruption = loop {
        requests += 1;
        let query = endpoint.query_for_page(page);
        let page_items = match transport.get(&endpoint.url, &query).await {
            Ok(response) => decode_json::<Vec<T>>(operation, &response),
            Err(error) => Err(error),
        };

        let batch = match page_items {
            Ok(batch) => batch,
            Err(error) => break Some(error),
        };

        let batch_len = batch.len();
        debug!(operation, page, items = batch_len, "fetched page");
        if batch_len == 0 {
            break None;
        }
        items.extend(batch);
        if batch_len < per_page {
            break None;
        }
        page += 1;
    };

    PagedItems {
        items,
        requests,
        interruption,
    }
}
