//! Rate-limit telemetry parsed from response headers.
//!
//! Every Helix response reports the state of the caller's request bucket
//! through three headers: `Ratelimit-Limit` (bucket size),
//! `Ratelimit-Remaining` (points left in the window), and `Ratelimit-Reset`
//! (Unix timestamp at which the bucket refills). [`RateLimitInfo`] is the
//! parsed snapshot.
//!
//! The telemetry is advisory, not load-bearing: missing or garbled headers
//! produce a zero-valued snapshot, never an error. A successful response
//! must not fail because its headers were thin.

use http::HeaderMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Header carrying the total size of the request bucket.
const LIMIT_HEADER: &str = "ratelimit-limit";
/// Header carrying the points remaining in the current window.
const REMAINING_HEADER: &str = "ratelimit-remaining";
/// Header carrying the bucket refill time as Unix seconds.
const RESET_HEADER: &str = "ratelimit-reset";

/// A snapshot of the rate-limit bucket, rebuilt fresh from every response.
///
/// Snapshots are never merged across calls; each response stands alone. A
/// zero-valued snapshot (`limit == 0`) means the headers were absent or
/// unparseable.
///
/// `reset_at` is derived from an absolute epoch timestamp rather than a
/// duration, so it stays accurate no matter how long the caller sits on the
/// response before acting on it.
///
/// # Examples
///
/// ```
/// use helixir::RateLimitInfo;
/// use http::HeaderMap;
///
/// let mut headers = HeaderMap::new();
/// headers.insert("ratelimit-limit", "800".parse().unwrap());
/// headers.insert("ratelimit-remaining", "799".parse().unwrap());
/// headers.insert("ratelimit-reset", "1700000000".parse().unwrap());
///
/// let info = RateLimitInfo::from_headers(&headers);
/// assert_eq!(info.limit, 800);
/// assert_eq!(info.remaining, 799);
/// assert!(!info.is_exhausted());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Total points in the request bucket.
    pub limit: u32,

    /// Points remaining in the current window. Never exceeds `limit`.
    pub remaining: u32,

    /// When the bucket refills. `UNIX_EPOCH` when the header was absent.
    pub reset_at: SystemTime,
}

impl Default for RateLimitInfo {
    /// The zero-valued snapshot produced when no headers are available.
    fn default() -> Self {
        Self {
            limit: 0,
            remaining: 0,
            reset_at: UNIX_EPOCH,
        }
    }
}

impl RateLimitInfo {
    /// Parses the three fixed rate-limit headers.
    ///
    /// Each field falls back to its zero value when the header is missing or
    /// malformed; parsing never fails. A reset timestamp too large to
    /// represent as a `SystemTime` counts as malformed. `remaining` is
    /// clamped so it cannot exceed `limit`.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let limit = parse_header::<u32>(headers, LIMIT_HEADER);
        let remaining = parse_header::<u32>(headers, REMAINING_HEADER).min(limit);
        let reset_seconds = parse_header::<u64>(headers, RESET_HEADER);
        let reset_at = UNIX_EPOCH
            .checked_add(Duration::from_secs(reset_seconds))
            .unwrap_or(UNIX_EPOCH);

        Self {
            limit,
            remaining,
            reset_at,
        }
    }

    /// `true` when a real limit was reported and nothing remains in the
    /// window.
    ///
    /// A zero-valued snapshot never reads as exhausted.
    pub fn is_exhausted(&self) -> bool {
        self.limit > 0 && self.remaining == 0
    }

    /// Time until the bucket refills.
    ///
    /// `None` once `reset_at` has passed or when the snapshot is
    /// zero-valued. The crate itself never waits on this; it exists so the
    /// caller's own pacing can.
    pub fn until_reset(&self) -> Option<Duration> {
        if self.limit == 0 {
            return None;
        }
        self.reset_at.duration_since(SystemTime::now()).ok()
    }
}

/// Reads one numeric header, falling back to the type's zero value.
fn parse_header<N>(headers: &HeaderMap, name: &str) -> N
where
    N: std::str::FromStr + Default,
{
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_parses_all_three_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("ratelimit-limit", HeaderValue::from_static("30"));
        headers.insert("ratelimit-remaining", HeaderValue::from_static("12"));
        headers.insert("ratelimit-reset", HeaderValue::from_static("1700000000"));

        let info = RateLimitInfo::from_headers(&headers);
        assert_eq!(info.limit, 30);
        assert_eq!(info.remaining, 12);
        assert_eq!(info.reset_at, UNIX_EPOCH + Duration::from_secs(1_700_000_000));
    }

    #[test]
    fn test_missing_headers_are_zero_valued() {
        let info = RateLimitInfo::from_headers(&HeaderMap::new());
        assert_eq!(info, RateLimitInfo::default());
        assert!(!info.is_exhausted());
        assert_eq!(info.until_reset(), None);
    }

    #[test]
    fn test_malformed_headers_are_zero_valued() {
        let mut headers = HeaderMap::new();
        headers.insert("ratelimit-limit", HeaderValue::from_static("a lot"));
        headers.insert("ratelimit-remaining", HeaderValue::from_static("-3"));
        headers.insert("ratelimit-reset", HeaderValue::from_static("soon"));

        let info = RateLimitInfo::from_headers(&headers);
        assert_eq!(info, RateLimitInfo::default());
    }

    #[test]
    fn test_out_of_range_reset_falls_back_to_epoch() {
        let mut headers = HeaderMap::new();
        headers.insert("ratelimit-limit", HeaderValue::from_static("800"));
        headers.insert("ratelimit-remaining", HeaderValue::from_static("799"));
        // Parses as a u64 but cannot be represented as a SystemTime.
        headers.insert(
            "ratelimit-reset",
            HeaderValue::from_static("9223372036854775808"),
        );

        let info = RateLimitInfo::from_headers(&headers);
        assert_eq!(info.limit, 800);
        assert_eq!(info.remaining, 799);
        assert_eq!(info.reset_at, UNIX_EPOCH);
        assert_eq!(info.until_reset(), None);
    }

    #[test]
    fn test_remaining_is_clamped_to_limit() {
        let mut headers = HeaderMap::new();
        headers.insert("ratelimit-limit", HeaderValue::from_static("10"));
        headers.insert("ratelimit-remaining", HeaderValue::from_static("999"));

        let info = RateLimitInfo::from_headers(&headers);
        assert_eq!(info.remaining, 10);
    }

    #[test]
    fn test_exhaustion_requires_a_real_limit() {
        let mut headers = HeaderMap::new();
        headers.insert("ratelimit-limit", HeaderValue::from_static("800"));
        headers.insert("ratelimit-remaining", HeaderValue::from_static("0"));
        assert!(RateLimitInfo::from_headers(&headers).is_exhausted());

        // Absent headers must not look like an exhausted bucket.
        assert!(!RateLimitInfo::from_headers(&HeaderMap::new()).is_exhausted());
    }

    #[test]
    fn test_until_reset_tracks_a_future_timestamp() {
        let future = SystemTime::now() + Duration::from_secs(120);
        let epoch_secs = future.duration_since(UNIX_EPOCH).unwrap().as_secs();

        let mut headers = HeaderMap::new();
        headers.insert("ratelimit-limit", HeaderValue::from_static("800"));
        headers.insert("ratelimit-remaining", HeaderValue::from_static("1"));
        headers.insert(
            "ratelimit-reset",
            HeaderValue::from_str(&epoch_secs.to_string()).unwrap(),
        );

        let info = RateLimitInfo::from_headers(&headers);
        let wait = info.until_reset().expect("reset lies in the future");
        // Whole-second truncation can shave up to a second off.
        assert!(wait >= Duration::from_secs(118) && wait <= Duration::from_secs(121));
    }

    #[test]
    fn test_past_reset_yields_no_wait() {
        let mut headers = HeaderMap::new();
        headers.insert("ratelimit-limit", HeaderValue::from_static("800"));
        headers.insert("ratelimit-remaining", HeaderValue::from_static("1"));
        headers.insert("ratelimit-reset", HeaderValue::from_static("1000000000"));

        assert_eq!(RateLimitInfo::from_headers(&headers).until_reset(), None);
    }
}
