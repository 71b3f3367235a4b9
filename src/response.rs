//! The response envelope returned by every successful Helix call.

use crate::error::{Error, Result};
use crate::pagination::{Continuation, Cursor, Pagination};
use crate::rate_limit::RateLimitInfo;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Wire shape of a Helix success body. The interesting content always
/// lives under `data`; `total` and `pagination` appear only on some
/// endpoints.
#[derive(Debug, Deserialize)]
struct Payload<T> {
    data: T,
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

/// A decoded Helix response: the typed payload plus the envelope metadata
/// that arrived with it.
///
/// `data` is the endpoint-specific content, already unwrapped from the
/// wire envelope. The rate-limit snapshot and the pagination state ride
/// along so callers can throttle and resume without touching headers or
/// raw JSON.
///
/// The envelope derefs to its payload for convenience:
///
/// ```
/// use helixir::HelixResponse;
/// use http::{HeaderMap, StatusCode};
///
/// #[derive(serde::Deserialize)]
/// struct User {
///     login: String,
/// }
///
/// let body = r#"{"data":[{"login":"ravendwyr"}]}"#;
/// let page = HelixResponse::<Vec<User>>::from_parts(
///     StatusCode::OK,
///     &HeaderMap::new(),
///     body,
/// )?;
/// assert_eq!(page.len(), 1);
/// assert_eq!(page.data[0].login, "ravendwyr");
/// assert!(page.pagination.is_finished());
/// # Ok::<(), helixir::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct HelixResponse<T> {
    /// The decoded payload from the envelope's `data` field.
    pub data: T,

    /// Total number of items across all pages, on the endpoints that
    /// report it.
    pub total: Option<u64>,

    /// Rate-limit snapshot from the response headers, zero-valued when
    /// they were absent.
    pub rate_limit: RateLimitInfo,

    /// Where iteration stands after this page.
    pub pagination: Continuation,
}

impl<T> HelixResponse<T> {
    /// Builds an envelope from the parts of an already-received HTTP
    /// response. No I/O happens here; the shipped client calls this after
    /// draining the body, and alternative transports can do the same.
    ///
    /// Non-2xx statuses classify into [`Error::Api`] or
    /// [`Error::MalformedErrorBody`]; a 2xx body that does not decode as
    /// `T` inside the envelope is [`Error::DeserializationFailed`]. The
    /// transport status is authoritative throughout, whatever the body
    /// claims.
    pub fn from_parts(status: StatusCode, headers: &HeaderMap, body: &str) -> Result<Self>
    where
        T: DeserializeOwned,
    {
        if !status.is_success() {
            return Err(Error::from_response(status, headers, body));
        }

        let payload: Payload<T> = serde_json::from_str(body).map_err(|source| {
            tracing::error!(
                status = status.as_u16(),
                error = %source,
                "success response body did not match the expected shape"
            );
            Error::DeserializationFailed {
                raw_response: body.to_owned(),
                source,
                status,
            }
        })?;

        Ok(HelixResponse {
            data: payload.data,
            total: payload.total,
            rate_limit: RateLimitInfo::from_headers(headers),
            pagination: Continuation::from_block(payload.pagination),
        })
    }

    /// The cursor to request the next page with, if there is one.
    pub fn next_cursor(&self) -> Option<&Cursor> {
        self.pagination.cursor()
    }

    /// Maps the payload while keeping the envelope metadata intact.
    pub fn map<U, F>(self, f: F) -> HelixResponse<U>
    where
        F: FnOnce(T) -> U,
    {
        HelixResponse {
            data: f(self.data),
            total: self.total,
            rate_limit: self.rate_limit,
            pagination: self.pagination,
        }
    }

    /// Consumes the envelope, returning just the payload.
    pub fn into_data(self) -> T {
        self.data
    }
}

impl<T> AsRef<T> for HelixResponse<T> {
    fn as_ref(&self) -> &T {
        &self.data
    }
}

impl<T> std::ops::Deref for HelixResponse<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Streamer {
        user_login: String,
        viewer_count: u64,
    }

    fn helix_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("ratelimit-limit", HeaderValue::from_static("30"));
        headers.insert("ratelimit-remaining", HeaderValue::from_static("12"));
        headers.insert("ratelimit-reset", HeaderValue::from_static("1700000000"));
        headers
    }

    #[test]
    fn test_full_envelope_decodes_payload_and_metadata() {
        let body = r#"{
            "data": [{"user_login": "ravendwyr", "viewer_count": 42}],
            "total": 97,
            "pagination": {"cursor": "eyJiI6..."}
        }"#;

        let page = HelixResponse::<Vec<Streamer>>::from_parts(
            StatusCode::OK,
            &helix_headers(),
            body,
        )
        .unwrap();

        assert_eq!(
            page.data,
            vec![Streamer {
                user_login: "ravendwyr".to_owned(),
                viewer_count: 42,
            }]
        );
        assert_eq!(page.total, Some(97));
        assert_eq!(page.rate_limit.limit, 30);
        assert_eq!(page.rate_limit.remaining, 12);
        assert_eq!(page.next_cursor().map(Cursor::as_str), Some("eyJiI6..."));
        assert!(!page.pagination.is_finished());
    }

    #[test]
    fn test_envelope_without_pagination_is_finished() {
        let body = r#"{"data": []}"#;
        let page =
            HelixResponse::<Vec<Streamer>>::from_parts(StatusCode::OK, &HeaderMap::new(), body)
                .unwrap();

        assert!(page.data.is_empty());
        assert_eq!(page.total, None);
        assert!(page.pagination.is_finished());
        assert_eq!(page.next_cursor(), None);
        // No headers means a zero-valued snapshot, not a failure.
        assert_eq!(page.rate_limit, RateLimitInfo::default());
    }

    #[test]
    fn test_out_of_range_reset_header_still_yields_an_envelope() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "ratelimit-reset",
            HeaderValue::from_static("9223372036854775808"),
        );
        let body = r#"{"data": [{"user_login": "ravendwyr", "viewer_count": 42}]}"#;

        let page =
            HelixResponse::<Vec<Streamer>>::from_parts(StatusCode::OK, &headers, body).unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(page.rate_limit.reset_at, std::time::UNIX_EPOCH);
    }

    #[test]
    fn test_empty_cursor_ends_iteration() {
        let body = r#"{"data": [], "pagination": {"cursor": ""}}"#;
        let page =
            HelixResponse::<Vec<Streamer>>::from_parts(StatusCode::OK, &HeaderMap::new(), body)
                .unwrap();
        assert!(page.pagination.is_finished());
    }

    #[test]
    fn test_malformed_success_body_is_a_distinct_error() {
        let err = HelixResponse::<Vec<Streamer>>::from_parts(
            StatusCode::OK,
            &HeaderMap::new(),
            "definitely not json",
        )
        .unwrap_err();

        match err {
            Error::DeserializationFailed {
                raw_response,
                status,
                ..
            } => {
                assert_eq!(raw_response, "definitely not json");
                assert_eq!(status, StatusCode::OK);
            }
            other => panic!("expected DeserializationFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_success_body_with_wrong_shape_reports_serde_source() {
        // Valid JSON, but `data` items do not match the target type.
        let body = r#"{"data": [{"unexpected": true}]}"#;
        let err =
            HelixResponse::<Vec<Streamer>>::from_parts(StatusCode::OK, &HeaderMap::new(), body)
                .unwrap_err();

        assert!(matches!(err, Error::DeserializationFailed { .. }));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_non_success_status_routes_to_error_classification() {
        let body = r#"{"status":401,"error":"Unauthorized","message":"invalid token"}"#;
        let err = HelixResponse::<Vec<Streamer>>::from_parts(
            StatusCode::UNAUTHORIZED,
            &HeaderMap::new(),
            body,
        )
        .unwrap_err();

        match err {
            Error::Api { status, error, .. } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(error, "Unauthorized");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn test_map_keeps_envelope_metadata() {
        let body = r#"{
            "data": [{"user_login": "a", "viewer_count": 1}],
            "pagination": {"cursor": "next"}
        }"#;
        let page = HelixResponse::<Vec<Streamer>>::from_parts(
            StatusCode::OK,
            &helix_headers(),
            body,
        )
        .unwrap();

        let names = page.map(|streamers| {
            streamers
                .into_iter()
                .map(|s| s.user_login)
                .collect::<Vec<_>>()
        });

        assert_eq!(names.data, vec!["a".to_owned()]);
        assert_eq!(names.rate_limit.limit, 30);
        assert_eq!(names.next_cursor().map(Cursor::as_str), Some("next"));
    }

    #[test]
    fn test_deref_exposes_payload() {
        let body = r#"{"data": [{"user_login": "a", "viewer_count": 1}]}"#;
        let page =
            HelixResponse::<Vec<Streamer>>::from_parts(StatusCode::OK, &HeaderMap::new(), body)
                .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page.as_ref().len(), 1);
        assert_eq!(page.into_data().len(), 1);
    }
}
