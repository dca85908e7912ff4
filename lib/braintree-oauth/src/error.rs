use http::StatusCode;

use crate::auth::CredentialsError;

/// Maximum length of a response body kept in an error.
pub(crate) const BODY_MAX_LENGTH: usize = 1024;

/// Errors returned by gateway operations.
///
/// These are the failures a caller does not anticipate as part of the
/// business flow: misuse of the API, rejected or revoked credentials,
/// transport problems and server faults. Expected business rejections are
/// reported as a [`GatewayResult::Failure`](crate::GatewayResult::Failure)
/// instead.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum GatewayError {
    /// HTTP client error from the underlying reqwest library.
    ///
    /// Connection failures, timeouts, and other transport issues.
    #[display("Network error: {_0}")]
    #[from]
    Network(reqwest::Error),

    /// The credentials could not be parsed or encoded.
    #[display("{_0}")]
    #[from]
    Credentials(CredentialsError),

    /// The gateway configuration is inconsistent.
    #[display("Configuration error: {reason}")]
    Configuration {
        /// Description of the configuration issue.
        reason: String,
    },

    /// The base URL cannot be used to reach the gateway.
    #[display("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The URL that was provided.
        url: String,
        /// Description of why the URL is invalid.
        reason: String,
    },

    /// The request was rejected before being sent.
    #[display("Invalid request: {reason}")]
    InvalidRequest {
        /// Description of what is wrong with the request.
        reason: String,
    },

    /// The gateway did not accept the credentials (HTTP 401).
    ///
    /// This is what a revoked or expired access token produces.
    #[display("Authentication failed: {body}")]
    Authentication {
        /// The response body.
        body: String,
    },

    /// The credentials are valid but not allowed to perform the operation (HTTP 403).
    #[display("Authorization failed: {body}")]
    Authorization {
        /// The response body.
        body: String,
    },

    /// The requested resource does not exist (HTTP 404).
    #[display("Not found: {body}")]
    NotFound {
        /// The response body.
        body: String,
    },

    /// The gateway no longer supports this API version (HTTP 426).
    #[display("Upgrade required: the gateway no longer supports this client version")]
    UpgradeRequired,

    /// Too many requests were sent (HTTP 429).
    #[display("Too many requests")]
    TooManyRequests,

    /// The gateway failed to process the request (HTTP 500).
    #[display("Server error: {body}")]
    ServerError {
        /// The response body.
        body: String,
    },

    /// The gateway is down for maintenance (HTTP 503).
    #[display("Service unavailable")]
    ServiceUnavailable,

    /// The gateway answered with a status this client does not handle.
    #[display("Unexpected status code {status_code}: {body}")]
    UnexpectedStatusCode {
        /// The HTTP status code.
        status_code: u16,
        /// The response body.
        body: String,
    },

    /// The response body does not match the expected format.
    #[display("Unexpected response (status {status_code}): {reason}\n{body}")]
    UnexpectedResponse {
        /// The HTTP status code.
        status_code: u16,
        /// Why the body could not be used.
        reason: String,
        /// The response body.
        body: String,
    },
}

impl GatewayError {
    /// Maps a non-success HTTP status to its error.
    ///
    /// 422 is not handled here: it carries validation errors.
    pub(crate) fn from_status(status: StatusCode, body: &str) -> Self {
        let body = truncate_body(body);
        match status {
            StatusCode::UNAUTHORIZED => Self::Authentication { body },
            StatusCode::FORBIDDEN => Self::Authorization { body },
            StatusCode::NOT_FOUND => Self::NotFound { body },
            StatusCode::UPGRADE_REQUIRED => Self::UpgradeRequired,
            StatusCode::TOO_MANY_REQUESTS => Self::TooManyRequests,
            StatusCode::INTERNAL_SERVER_ERROR => Self::ServerError { body },
            StatusCode::SERVICE_UNAVAILABLE => Self::ServiceUnavailable,
            _ => Self::UnexpectedStatusCode {
                status_code: status.as_u16(),
                body,
            },
        }
    }

    pub(crate) fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Returns `true` if the gateway refused the credentials.
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    if body.len() <= BODY_MAX_LENGTH {
        return body.to_string();
    }
    let mut end = BODY_MAX_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    let head = body.get(..end).unwrap_or_default();
    format!("{head}... (truncated)")
}
