//! Maps GitLab HTTP responses onto [`IntakeError`] variants.

use http::StatusCode;
use serde::de::DeserializeOwned;

use super::error::IntakeError;
use super::transport::HttpResponse;

/// Checks if a GitLab status indicates an authentication failure.
pub(crate) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Extracts the human-readable detail GitLab puts in error bodies.
///
/// GitLab uses `message` for most failures (sometimes as an object of field
/// errors) and `error` for OAuth-style failures.
pub(crate) fn extract_gitlab_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return None;
    };
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key))
        .map(|detail| {
            detail
                .as_str()
                .map_or_else(|| detail.to_string(), str::to_owned)
        })
}

/// Converts a non-success response into an error.
pub(crate) fn map_http_error(operation: &str, response: &HttpResponse) -> IntakeError {
    let status = response.status;
    let detail =
        extract_gitlab_message(&response.body).unwrap_or_else(|| "unknown error".to_owned());
    let message = format!("{operation} failed with status {status}: {detail}");

    if is_auth_failure(status) {
        IntakeError::Authentication { message }
    } else if status == StatusCode::NOT_FOUND {
        IntakeError::NotFound { message }
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        IntakeError::RateLimitExceeded {
            retry_after_secs: response.retry_after_secs,
            message,
        }
    } else {
        IntakeError::Api { message }
    }
}

/// Decodes a successful JSON response, mapping failures to errors.
pub(crate) fn decode_json<T: DeserializeOwned>(
    operation: &str,
    response: &HttpResponse,
) -> Result<T, IntakeError> {
    if !response.status.is_success() {
        return Err(map_http_error(operation, response));
    }
    serde_json::from_str(&response.body).map_err(|error| IntakeError::Decode {
        message: format!("{operation} response deserialisation failed: {error}"),
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::unauthorized(StatusCode::UNAUTHORIZED, "Authentication")]
    #[case::forbidden(StatusCode::FORBIDDEN, "Authentication")]
    #[case::not_found(StatusCode::NOT_FOUND, "NotFound")]
    #[case::throttled(StatusCode::TOO_MANY_REQUESTS, "RateLimitExceeded")]
    #[case::server(StatusCode::BAD_GATEWAY, "Api")]
    fn maps_status_codes(#[case] status: StatusCode, #[case] expected: &str) {
        let response = HttpResponse::new(status, r#"{"message":"nope"}"#);
        let error = map_http_error("list merge requests", &response);
        let variant = match &error {
            IntakeError::Authentication { .. } => "Authentication",
            IntakeError::NotFound { .. } => "NotFound",
            IntakeError::RateLimitExceeded { .. } => "RateLimitExceeded",
            IntakeError::Api { .. } => "Api",
            _ => "other",
        };
        assert_eq!(variant, expected, "unexpected mapping: {error:?}");
        assert!(error.to_string().contains("nope"));
    }

    #[rstest]
    #[case::message(r#"{"message":"404 Project Not Found"}"#, Some("404 Project Not Found"))]
    #[case::oauth(r#"{"error":"invalid_token"}"#, Some("invalid_token"))]
    #[case::field_errors(
        r#"{"message":{"ref":["is missing"]}}"#,
        Some(r#"{"ref":["is missing"]}"#)
    )]
    #[case::plain_text("Bad Gateway", None)]
    fn extracts_messages(#[case] body: &str, #[case] expected: Option<&str>) {
        assert_eq!(extract_gitlab_message(body).as_deref(), expected);
    }

    #[rstest]
    fn rate_limit_keeps_retry_hint() {
        let response = HttpResponse {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: String::new(),
            retry_after_secs: Some(60),
        };
        assert!(matches!(
            map_http_error("discussions", &response),
            IntakeError::RateLimitExceeded {
                retry_after_secs: Some(60),
                ..
            }
        ));
    }

    #[rstest]
    fn decode_reports_malformed_bodies() {
        let response = HttpResponse::new(StatusCode::OK, "not json");
        let result: Result<Vec<u32>, _> = decode_json("discussions", &response);
        assert!(matches!(result, Err(IntakeError::Decode { .. })));
    }
}
