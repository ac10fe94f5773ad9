//! Identity wrappers and endpoint construction for a GitLab project.

use url::Url;

use super::error::IntakeError;

/// Project identifier: either the numeric id or the `namespace/name` path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectId(String);

impl ProjectId {
    /// Validates that the identifier is non-empty after trimming.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MissingProjectId`] when the value is blank.
    pub fn new(value: impl AsRef<str>) -> Result<Self, IntakeError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IntakeError::MissingProjectId);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the identifier.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Merge request number, unique within a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MergeRequestIid(u64);

impl MergeRequestIid {
    /// Wraps a positive merge request number.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidMergeRequestIds`] when `value` is zero.
    pub fn new(value: u64) -> Result<Self, IntakeError> {
        if value == 0 {
            return Err(IntakeError::InvalidMergeRequestIds {
                token: value.to_string(),
            });
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for MergeRequestIid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "!{}", self.0)
    }
}

/// Parses a comma-separated list of merge request numbers.
///
/// Blank entries (for example a trailing comma) are ignored and repeated
/// numbers are kept once, at their first position.
///
/// # Errors
///
/// Returns [`IntakeError::InvalidMergeRequestIds`] naming the first token that
/// is not a positive integer.
///
/// # Example
///
/// ```
/// use mrscribe::gitlab::parse_merge_request_ids;
///
/// let ids = parse_merge_request_ids("12, 7,12,").expect("valid list");
/// let values: Vec<u64> = ids.iter().map(|iid| iid.get()).collect();
/// assert_eq!(values, vec![12, 7]);
/// ```
pub fn parse_merge_request_ids(input: &str) -> Result<Vec<MergeRequestIid>, IntakeError> {
    let mut ids: Vec<MergeRequestIid> = Vec::new();
    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let iid = token
            .parse::<u64>()
            .ok()
            .and_then(|value| MergeRequestIid::new(value).ok())
            .ok_or_else(|| IntakeError::InvalidMergeRequestIds {
                token: token.to_owned(),
            })?;
        if !ids.contains(&iid) {
            ids.push(iid);
        }
    }
    Ok(ids)
}

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, IntakeError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IntakeError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl std::fmt::Debug for PersonalAccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PersonalAccessToken(***)")
    }
}

/// GitLab instance plus project, from which every endpoint URL is derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLocator {
    api_base: Url,
    project: ProjectId,
}

impl ProjectLocator {
    /// Builds a locator from the instance URL (for example
    /// `https://gitlab.com` or `https://git.example.com/gitlab`) and a
    /// project identifier.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::InvalidUrl` when the URL cannot be parsed or is
    /// not an `http(s)` URL.
    pub fn new(gitlab_url: &str, project: ProjectId) -> Result<Self, IntakeError> {
        let mut api_base = Url::parse(gitlab_url.trim())
            .map_err(|error| IntakeError::InvalidUrl(error.to_string()))?;
        if !matches!(api_base.scheme(), "http" | "https") {
            return Err(IntakeError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                api_base.scheme()
            )));
        }
        api_base.set_query(None);
        api_base.set_fragment(None);
        api_base
            .path_segments_mut()
            .map_err(|()| IntakeError::InvalidUrl("URL cannot be a base".to_owned()))?
            .pop_if_empty()
            .extend(["api", "v4"]);
        Ok(Self { api_base, project })
    }

    /// REST API base, ending in `/api/v4`.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// `GET /projects/:id/merge_requests`
    #[must_use]
    pub fn merge_requests_url(&self) -> Url {
        self.project_url(&["merge_requests"])
    }

    /// `GET /projects/:id/merge_requests/:iid`
    #[must_use]
    pub fn merge_request_url(&self, iid: MergeRequestIid) -> Url {
        self.project_url(&["merge_requests", &iid.get().to_string()])
    }

    /// `GET /projects/:id/merge_requests/:iid/discussions`
    #[must_use]
    pub fn discussions_url(&self, iid: MergeRequestIid) -> Url {
        self.project_url(&["merge_requests", &iid.get().to_string(), "discussions"])
    }

    /// `GET /projects/:id/repository/files/:path/raw`
    ///
    /// The file path travels as one encoded segment, so `src/Main.java`
    /// becomes `src%2FMain.java`.
    #[must_use]
    pub fn raw_file_url(&self, file_path: &str) -> Url {
        self.project_url(&["repository", "files", file_path, "raw"])
    }

    fn project_url(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.push("projects").push(self.project.as_str());
            path.extend(segments);
        }
        url
    }
}
