//! Error types for Helix API calls.
//!
//! One request produces exactly one outcome: a populated
//! [`HelixResponse`](crate::HelixResponse) or a single [`Error`] carrying the
//! best diagnostics available. Non-success responses are decoded into a
//! structured [`ErrorEnvelope`] when the body allows it; when it does not,
//! reporting degrades to the HTTP status code rather than letting a
//! secondary JSON failure mask the real one. Raw bodies are preserved on
//! every variant that has one.

use crate::rate_limit::RateLimitInfo;
use crate::scope::Scope;
use http::{HeaderMap, StatusCode};
use serde::Deserialize;

/// The main error type for Helix API calls.
///
/// # Examples
///
/// ```no_run
/// use helixir::{Credentials, Error, HelixClient, RequestContext};
///
/// # async fn example() -> Result<(), Error> {
/// # let client = HelixClient::builder().build()?;
/// # let ctx = RequestContext::new(Credentials::new("id", "token", Vec::new()));
/// match client.get::<Vec<serde_json::Value>>("/streams", &ctx).await {
///     Ok(page) => println!("{} results", page.data.len()),
///     Err(Error::Api { status, error, message, .. }) => {
///         eprintln!("API refused the call ({status}): {error}: {message}");
///     }
///     Err(Error::MissingScopes { missing }) => {
///         eprintln!("token lacks scopes: {missing:?}");
///     }
///     Err(Error::DeserializationFailed { raw_response, .. }) => {
///         eprintln!("2xx body did not match the expected type: {raw_response}");
///     }
///     Err(e) => eprintln!("other error: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A network-level fault before any usable HTTP response existed
    /// (connection refused, DNS failure, timeout, broken transfer).
    ///
    /// Not convertible to an [`ErrorEnvelope`]; only the transport's own
    /// message is available.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API answered with a non-2xx status and a structured error body.
    ///
    /// `error` is the short machine-readable label (`"Unauthorized"`,
    /// `"Too Many Requests"`, and so on) and `message` the human-readable
    /// explanation, both taken from the body. `status` is the transport's
    /// status line, which stays authoritative even if the body disagrees.
    #[error("Helix error {status}: {error}: {message}")]
    Api {
        /// The HTTP status code.
        status: StatusCode,
        /// Short error label from the body.
        error: String,
        /// Human-readable message from the body.
        message: String,
        /// Rate-limit snapshot from the response headers, zero-valued when
        /// they were absent. Worth reading on 429s.
        rate_limit: RateLimitInfo,
    },

    /// The API answered with a non-2xx status but the body was not a
    /// parseable error envelope.
    ///
    /// Reporting degrades to the status code; the secondary JSON failure is
    /// swallowed because the HTTP failure is the primary fact. The raw body
    /// is kept for debugging.
    #[error("Helix error {status} (error body was not parseable)")]
    MalformedErrorBody {
        /// The HTTP status code.
        status: StatusCode,
        /// The raw response body that failed to decode.
        raw_response: String,
    },

    /// The credentials do not grant every scope the call requires.
    ///
    /// Raised by the pre-flight check, before any network I/O happens.
    #[error("Missing required scopes: {}", format_scopes(.missing))]
    MissingScopes {
        /// Required scopes the credentials do not grant, in stable order.
        missing: Vec<Scope>,
    },

    /// A 2xx response whose body failed to decode into the expected type.
    ///
    /// A success status with unparseable content is a contract violation by
    /// the upstream API and is surfaced as its own kind, never silently
    /// defaulted. The serde failure is chained as the source.
    #[error("Failed to decode response body (status {status}): {source}")]
    DeserializationFailed {
        /// The raw response body that failed to decode.
        raw_response: String,
        /// The underlying serde error.
        source: serde_json::Error,
        /// The (successful) HTTP status code.
        status: StatusCode,
    },

    /// Invalid client or request configuration (bad header name or value,
    /// unusable base URL).
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The request body could not be serialized to JSON.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// An invalid URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Wire shape of a Helix error body.
///
/// ```json
/// { "status": 429, "error": "Too Many Requests", "message": "Thanks!" }
/// ```
///
/// Fields default individually, so a partial body still decodes into a
/// (partly empty) envelope; a body that is not JSON at all produces no
/// envelope and classification falls back to
/// [`Error::MalformedErrorBody`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorEnvelope {
    /// HTTP status echoed inside the body.
    #[serde(default)]
    pub status: u16,
    /// Short error label.
    #[serde(default)]
    pub error: String,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
}

impl Error {
    /// Classifies a non-2xx response.
    ///
    /// Two-tier extraction: a parseable body enriches the error with the
    /// envelope's label and message; an unparseable one degrades to
    /// status-only reporting. The secondary JSON failure never escapes.
    pub(crate) fn from_response(status: StatusCode, headers: &HeaderMap, body: &str) -> Self {
        if status.is_client_error() {
            tracing::error!(status = status.as_u16(), response = %body, "client error (4xx)");
        } else if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), response = %body, "server error (5xx)");
        }

        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => Error::Api {
                status,
                error: envelope.error,
                message: envelope.message,
                rate_limit: RateLimitInfo::from_headers(headers),
            },
            Err(_) => Error::MalformedErrorBody {
                status,
                raw_response: body.to_owned(),
            },
        }
    }

    /// Returns the HTTP status code if this error carries one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. }
            | Error::MalformedErrorBody { status, .. }
            | Error::DeserializationFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The short error label from a structured API error.
    ///
    /// `None` for every other kind, including degraded error bodies.
    pub fn error_label(&self) -> Option<&str> {
        match self {
            Error::Api { error, .. } => Some(error),
            _ => None,
        }
    }

    /// The raw response body, for the kinds that preserve one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::MalformedErrorBody { raw_response, .. }
            | Error::DeserializationFailed { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    /// Rate-limit snapshot attached to a structured API error.
    pub fn rate_limit_info(&self) -> Option<&RateLimitInfo> {
        match self {
            Error::Api { rate_limit, .. } => Some(rate_limit),
            _ => None,
        }
    }

    /// `true` if the failure is plausibly transient.
    ///
    /// Network faults, 5xx statuses, and 429 qualify. The crate itself
    /// never retries; this is a hint for whatever schedules the caller's
    /// retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(_) => true,
            Error::Api { status, .. } | Error::MalformedErrorBody { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Error::MissingScopes { .. }
            | Error::DeserializationFailed { .. }
            | Error::ConfigurationError(_)
            | Error::SerializationFailed(_)
            | Error::InvalidUrl(_) => false,
        }
    }
}

/// Renders a scope list for error messages.
fn format_scopes(scopes: &[Scope]) -> String {
    scopes
        .iter()
        .map(|scope| scope.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A specialized `Result` type for Helix API calls.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn rate_limited_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("ratelimit-limit", HeaderValue::from_static("800"));
        headers.insert("ratelimit-remaining", HeaderValue::from_static("0"));
        headers.insert("ratelimit-reset", HeaderValue::from_static("1700000000"));
        headers
    }

    #[test]
    fn test_structured_error_body_becomes_api_error() {
        let body = r#"{"status":429,"error":"Too Many Requests","message":"slow down"}"#;
        let err = Error::from_response(
            StatusCode::TOO_MANY_REQUESTS,
            &rate_limited_headers(),
            body,
        );

        match &err {
            Error::Api {
                status,
                error,
                message,
                rate_limit,
            } => {
                assert_eq!(*status, StatusCode::TOO_MANY_REQUESTS);
                assert_eq!(error, "Too Many Requests");
                assert_eq!(message, "slow down");
                assert!(rate_limit.is_exhausted());
            }
            other => panic!("expected Api, got {other:?}"),
        }
        assert_eq!(err.error_label(), Some("Too Many Requests"));
        assert_eq!(err.status(), Some(StatusCode::TOO_MANY_REQUESTS));
        assert!(err.is_retryable());
        assert!(err.to_string().contains("Too Many Requests"));
    }

    #[test]
    fn test_unparseable_error_body_degrades_to_status_only() {
        let err = Error::from_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            &HeaderMap::new(),
            "",
        );

        match &err {
            Error::MalformedErrorBody {
                status,
                raw_response,
            } => {
                assert_eq!(*status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(raw_response, "");
            }
            other => panic!("expected MalformedErrorBody, got {other:?}"),
        }
        // The display message is generic but never empty, and no secondary
        // parse failure escapes.
        assert!(err.to_string().contains("500"));
        assert_eq!(err.error_label(), None);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_html_error_body_is_preserved_raw() {
        let body = "<html><body>502 Bad Gateway</body></html>";
        let err = Error::from_response(StatusCode::BAD_GATEWAY, &HeaderMap::new(), body);
        assert_eq!(err.raw_response(), Some(body));
    }

    #[test]
    fn test_partial_json_error_body_still_parses() {
        // Valid JSON with missing fields decodes into a partly empty
        // envelope; only non-JSON degrades.
        let err = Error::from_response(StatusCode::NOT_FOUND, &HeaderMap::new(), "{}");
        match err {
            Error::Api { status, error, message, .. } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert!(error.is_empty());
                assert!(message.is_empty());
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn test_transport_status_wins_over_body_status() {
        let body = r#"{"status":404,"error":"Not Found","message":"gone"}"#;
        let err = Error::from_response(StatusCode::GONE, &HeaderMap::new(), body);
        assert_eq!(err.status(), Some(StatusCode::GONE));
    }

    #[test]
    fn test_missing_scopes_message_lists_wire_names() {
        let err = Error::MissingScopes {
            missing: vec![Scope::BitsRead, Scope::UserEdit],
        };
        assert_eq!(
            err.to_string(),
            "Missing required scopes: bits:read, user:edit"
        );
        assert!(!err.is_retryable());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_client_errors_other_than_429_are_not_retryable() {
        let err = Error::from_response(
            StatusCode::BAD_REQUEST,
            &HeaderMap::new(),
            r#"{"status":400,"error":"Bad Request","message":"missing id"}"#,
        );
        assert!(!err.is_retryable());
    }
}
