//! Error types exposed by the GitLab intake layer.

use thiserror::Error;

/// Errors surfaced while validating input or communicating with GitLab.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IntakeError {
    /// No GitLab project identifier was configured.
    #[error("GitLab project identifier is required")]
    MissingProjectId,

    /// The authentication token was missing.
    #[error("personal access token is required")]
    MissingToken,

    /// The configured GitLab URL could not be parsed.
    #[error("GitLab URL is invalid: {0}")]
    InvalidUrl(String),

    /// The explicit merge request list contained a token that is not a
    /// positive integer.
    #[error("invalid merge request id '{token}': use comma-separated numbers")]
    InvalidMergeRequestIds {
        /// The offending token as typed by the user.
        token: String,
    },

    /// The authentication token was rejected by GitLab.
    #[error("GitLab rejected the token: {message}")]
    Authentication {
        /// Message returned with the 401/403 response.
        message: String,
    },

    /// The requested resource does not exist or is not visible.
    #[error("GitLab resource not found: {message}")]
    NotFound {
        /// Message returned with the 404 response.
        message: String,
    },

    /// GitLab throttled the request.
    #[error("GitLab API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Seconds to wait before retrying, from the `Retry-After` header.
        retry_after_secs: Option<u64>,
        /// Message returned with the 429 response.
        message: String,
    },

    /// GitLab returned a non-success status not covered above.
    #[error("GitLab API error: {message}")]
    Api {
        /// Status code and response detail.
        message: String,
    },

    /// Networking failed while calling GitLab.
    #[error("network error talking to GitLab: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// A response body did not have the expected shape.
    #[error("unexpected GitLab response: {message}")]
    Decode {
        /// Deserialisation error detail.
        message: String,
    },

    /// Invalid pagination parameters.
    #[error("invalid pagination: {message}")]
    InvalidPagination {
        /// Description of the invalid parameter.
        message: String,
    },

    /// A saved comment collection could not be read back.
    #[error("saved comment collection is invalid: {message}")]
    InvalidCollection {
        /// Which record failed and why.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}

