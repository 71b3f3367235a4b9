//! Request descriptions and the per-call context that travels with them.
//!
//! A [`HelixRequest`] says what to ask for (method, path, query), a
//! [`RequestContext`] says who is asking (credentials, required scopes)
//! and how (per-call settings). Keeping them separate lets one context be
//! reused across many requests.

use crate::error::{Error, Result};
use crate::pagination::Cursor;
use crate::param::Clamped;
use crate::scope::Scope;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::Method;
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

/// Query key carrying the requested page size.
pub(crate) const PAGE_SIZE_KEY: &str = "first";

/// Query key carrying the pagination cursor.
pub(crate) const CURSOR_KEY: &str = "after";

/// Smallest page size the API accepts.
pub const MIN_PAGE_SIZE: u32 = 1;

/// Largest page size the API accepts.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size the API uses when none is sent.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// The canonical clamp for the `first` query parameter.
pub(crate) fn page_size_param() -> Clamped<u32> {
    Clamped::new(MIN_PAGE_SIZE, MAX_PAGE_SIZE, DEFAULT_PAGE_SIZE)
}

/// A description of a single API call: method, path, and query.
///
/// Query parameters are kept as an ordered list rather than a map because
/// Helix endpoints accept repeated keys (`id=1&id=2`). The `first` and
/// `after` keys are managed through [`with_page_size`] and [`with_after`],
/// which replace any previous value instead of appending.
///
/// [`with_page_size`]: HelixRequest::with_page_size
/// [`with_after`]: HelixRequest::with_after
///
/// # Examples
///
/// ```
/// use helixir::HelixRequest;
///
/// let request = HelixRequest::get("/streams")
///     .with_query_param("user_login", "ravendwyr")
///     .with_page_size(50);
///
/// assert_eq!(request.path, "/streams");
/// assert_eq!(
///     request.query(),
///     &[
///         ("user_login".to_owned(), "ravendwyr".to_owned()),
///         ("first".to_owned(), "50".to_owned()),
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct HelixRequest {
    /// HTTP method.
    pub method: Method,

    /// Path relative to the client's base URL, e.g. `/streams`.
    pub path: String,

    /// Extra headers for this request only. Merged over the client's
    /// defaults, before the credential headers.
    pub headers: HeaderMap,

    query: Vec<(String, String)>,
}

impl HelixRequest {
    /// Creates a request with the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            query: Vec::new(),
        }
    }

    /// Creates a GET request for the given path.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a POST request for the given path.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Adds a header to this request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigurationError`] if the name or value is not a
    /// valid HTTP header.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::ConfigurationError(format!("invalid header name: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::ConfigurationError(format!("invalid header value: {e}")))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Appends a query parameter. Repeated keys are kept in order.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets the requested page size, clamped to what the API accepts.
    ///
    /// Out-of-range values are silently pulled to the nearest bound (with a
    /// debug-level trace event), so the request that goes on the wire is
    /// always valid. Calling this again replaces the previous value.
    pub fn with_page_size(mut self, first: u32) -> Self {
        let mut param = page_size_param();
        let stored = param.set(first).get();
        if stored != first {
            tracing::debug!(requested = first, stored, "page size clamped to API bounds");
        }
        self.replace_query_param(PAGE_SIZE_KEY, stored.to_string());
        self
    }

    /// Sets the cursor to resume iteration from. Calling this again
    /// replaces the previous cursor, so one request value can be reused
    /// across a pagination loop.
    pub fn with_after(mut self, cursor: &Cursor) -> Self {
        self.replace_query_param(CURSOR_KEY, cursor.as_str().to_owned());
        self
    }

    /// The query parameters in the order they will be sent.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    fn replace_query_param(&mut self, key: &str, value: String) {
        self.query.retain(|(k, _)| k != key);
        self.query.push((key.to_owned(), value));
    }
}

/// The credentials attached to every request: application identity, user
/// token, and the scopes that token was granted.
///
/// The token never appears in `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    client_id: String,
    token: String,
    scopes: BTreeSet<Scope>,
}

impl Credentials {
    /// Creates a credential bundle from a client id, an OAuth token, and
    /// the scopes the token was granted.
    pub fn new(
        client_id: impl Into<String>,
        token: impl Into<String>,
        scopes: impl IntoIterator<Item = Scope>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            token: token.into(),
            scopes: scopes.into_iter().collect(),
        }
    }

    /// The application's client id, sent as the `Client-Id` header.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The bare OAuth token, without the `Bearer` prefix. Avoid logging
    /// this.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The scopes this token was granted.
    pub fn scopes(&self) -> &BTreeSet<Scope> {
        &self.scopes
    }

    /// `true` if the token was granted the given scope.
    pub fn grants(&self, scope: Scope) -> bool {
        self.scopes.contains(&scope)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("token", &"[redacted]")
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Per-call settings that override the client's defaults.
#[derive(Debug, Clone, Default)]
pub struct RequestSettings {
    /// Timeout for this call. `None` falls back to the client-wide
    /// timeout, if any.
    pub timeout: Option<Duration>,
}

/// Everything a call needs besides the request itself: credentials, the
/// scopes the call requires, and per-call settings.
///
/// # Examples
///
/// ```
/// use helixir::{Credentials, RequestContext, Scope};
///
/// let credentials = Credentials::new("my-app", "abc123", [Scope::ModerationRead]);
/// let ctx = RequestContext::new(credentials)
///     .with_required_scopes([Scope::ModerationRead]);
///
/// assert!(ctx.ensure_scopes().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The credentials to authenticate with.
    pub credentials: Credentials,

    /// Scopes the upcoming call requires. Empty for endpoints that need
    /// none beyond a valid token.
    pub required_scopes: BTreeSet<Scope>,

    /// Settings overriding the client's defaults for this call.
    pub settings: RequestSettings,
}

impl RequestContext {
    /// Creates a context with no required scopes and default settings.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            required_scopes: BTreeSet::new(),
            settings: RequestSettings::default(),
        }
    }

    /// Declares the scopes the upcoming call requires.
    pub fn with_required_scopes(mut self, scopes: impl IntoIterator<Item = Scope>) -> Self {
        self.required_scopes = scopes.into_iter().collect();
        self
    }

    /// Overrides the per-call settings.
    pub fn with_settings(mut self, settings: RequestSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Verifies the granted scopes cover the required ones.
    ///
    /// The shipped client runs this before any network I/O, so a doomed
    /// call fails locally instead of burning a rate-limit point on a
    /// guaranteed 401/403. The missing list is deduplicated and sorted,
    /// making the error message stable.
    pub fn ensure_scopes(&self) -> Result<()> {
        let missing: Vec<Scope> = self
            .required_scopes
            .difference(self.credentials.scopes())
            .copied()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingScopes { missing })
        }
    }
}
