//! The HTTP client that talks to the Helix API.
//!
//! [`HelixClient`] is the main entry point for making requests. Use
//! [`HelixClientBuilder`] to configure and create clients.

use crate::{
    error::{Error, Result},
    rate_limit::RateLimitInfo,
    request::{HelixRequest, RequestContext},
    response::HelixResponse,
};
use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// The production Helix endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.twitch.tv/helix";

/// A client for the Helix API.
///
/// The client is cheap to clone and designed to be reused across requests
/// and tasks; it maintains a connection pool and configuration shared by
/// all clones. Credentials are not baked into the client but passed per
/// call through a [`RequestContext`], so one client can serve several
/// tokens.
///
/// # Examples
///
/// ```no_run
/// use helixir::{Credentials, HelixClient, RequestContext, Scope};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Stream {
///     user_login: String,
///     viewer_count: u64,
/// }
///
/// # async fn example() -> Result<(), helixir::Error> {
/// let client = HelixClient::builder().build()?;
///
/// let credentials = Credentials::new(
///     "my-client-id",
///     "my-oauth-token",
///     [Scope::UserReadEmail],
/// );
/// let ctx = RequestContext::new(credentials);
///
/// let page = client.get::<Vec<Stream>>("/streams", &ctx).await?;
/// for stream in &page.data {
///     println!("{} has {} viewers", stream.user_login, stream.viewer_count);
/// }
/// println!("{} rate-limit points left", page.rate_limit.remaining);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HelixClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: Url,
    default_headers: HeaderMap,
    timeout: Option<Duration>,
}

impl HelixClient {
    /// Creates a new `HelixClientBuilder` for configuring a client.
    pub fn builder() -> HelixClientBuilder {
        HelixClientBuilder::new()
    }

    /// Makes a typed API call.
    ///
    /// This is the main request method. It checks the context's required
    /// scopes before touching the network, attaches the credential
    /// headers, sends the request, and decodes the body into a
    /// [`HelixResponse`]. Exactly one outcome is produced per call; the
    /// client never retries on its own.
    ///
    /// # Type Parameters
    ///
    /// * `Req` - The request body type (must implement `Serialize`)
    /// * `Res` - The payload type under the envelope's `data` field
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use helixir::{Credentials, HelixClient, HelixRequest, RequestContext};
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Stream {
    ///     user_login: String,
    /// }
    ///
    /// # async fn example() -> Result<(), helixir::Error> {
    /// # let client = HelixClient::builder().build()?;
    /// # let ctx = RequestContext::new(Credentials::new("id", "token", Vec::new()));
    /// let request = HelixRequest::get("/streams")
    ///     .with_query_param("game_id", "509658")
    ///     .with_page_size(100);
    ///
    /// let mut page = client.call::<(), Vec<Stream>>(request.clone(), None, &ctx).await?;
    /// while let Some(cursor) = page.next_cursor() {
    ///     page = client
    ///         .call::<(), Vec<Stream>>(request.clone().with_after(cursor), None, &ctx)
    ///         .await?;
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call<Req, Res>(
        &self,
        request: HelixRequest,
        body: Option<&Req>,
        ctx: &RequestContext,
    ) -> Result<HelixResponse<Res>>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        ctx.ensure_scopes()?;

        let start = Instant::now();
        let response = self.execute_request(&request, body, ctx).await?;

        let status = response.status();
        let headers = response.headers().clone();
        let raw_body = response.text().await?;

        tracing::info!(
            method = %request.method,
            path = %request.path,
            status = status.as_u16(),
            remaining = RateLimitInfo::from_headers(&headers).remaining,
            latency_ms = start.elapsed().as_millis() as u64,
            "received response"
        );

        HelixResponse::from_parts(status, &headers, &raw_body)
    }

    /// Sends a single request over the wire.
    async fn execute_request<Req>(
        &self,
        request: &HelixRequest,
        body: Option<&Req>,
        ctx: &RequestContext,
    ) -> Result<reqwest::Response>
    where
        Req: Serialize,
    {
        let url = self.build_url(request)?;

        tracing::debug!(method = %request.method, url = %url, "sending request");

        let mut builder = self.inner.http_client.request(request.method.clone(), url);

        for (name, value) in &self.inner.default_headers {
            builder = builder.header(name, value);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        // Credential headers go last so they cannot be shadowed.
        builder = builder.header("Client-Id", header_value(ctx.credentials.client_id())?);
        let mut auth = header_value(&format!("Bearer {}", ctx.credentials.token()))?;
        auth.set_sensitive(true);
        builder = builder.header(AUTHORIZATION, auth);

        if let Some(timeout) = ctx.settings.timeout.or(self.inner.timeout) {
            builder = builder.timeout(timeout);
        }

        if let Some(body) = body {
            let json = serde_json::to_value(body)
                .map_err(|e| Error::SerializationFailed(e.to_string()))?;
            builder = builder.json(&json);
        }

        let response = builder.send().await?;

        Ok(response)
    }

    /// Joins the request path onto the base URL and appends the query.
    ///
    /// The base URL's own path (`/helix` on the production endpoint) is
    /// preserved; the request path is appended segment by segment rather
    /// than replacing it.
    fn build_url(&self, request: &HelixRequest) -> Result<Url> {
        let mut url = self.inner.base_url.clone();

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| Error::ConfigurationError("base URL cannot be a base".to_owned()))?;
            segments.pop_if_empty();
            for segment in request.path.split('/').filter(|s| !s.is_empty()) {
                segments.push(segment);
            }
        }

        for (key, value) in request.query() {
            url.query_pairs_mut().append_pair(key, value);
        }

        Ok(url)
    }

    /// Makes a GET request to the given path.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use helixir::{Credentials, HelixClient, RequestContext};
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct User {
    ///     login: String,
    /// }
    ///
    /// # async fn example() -> Result<(), helixir::Error> {
    /// # let client = HelixClient::builder().build()?;
    /// # let ctx = RequestContext::new(Credentials::new("id", "token", Vec::new()));
    /// let users = client.get::<Vec<User>>("/users", &ctx).await?;
    /// println!("fetched {} users", users.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get<Res>(
        &self,
        path: impl Into<String>,
        ctx: &RequestContext,
    ) -> Result<HelixResponse<Res>>
    where
        Res: DeserializeOwned,
    {
        self.call::<(), Res>(HelixRequest::get(path), None, ctx).await
    }

    /// Makes a POST request with a JSON body.
    pub async fn post<Req, Res>(
        &self,
        path: impl Into<String>,
        body: &Req,
        ctx: &RequestContext,
    ) -> Result<HelixResponse<Res>>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        self.call(HelixRequest::post(path), Some(body), ctx).await
    }

    /// Makes a PUT request with a JSON body.
    pub async fn put<Req, Res>(
        &self,
        path: impl Into<String>,
        body: &Req,
        ctx: &RequestContext,
    ) -> Result<HelixResponse<Res>>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        self.call(HelixRequest::new(Method::PUT, path), Some(body), ctx)
            .await
    }

    /// Makes a PATCH request with a JSON body.
    pub async fn patch<Req, Res>(
        &self,
        path: impl Into<String>,
        body: &Req,
        ctx: &RequestContext,
    ) -> Result<HelixResponse<Res>>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        self.call(HelixRequest::new(Method::PATCH, path), Some(body), ctx)
            .await
    }

    /// Makes a DELETE request to the given path.
    pub async fn delete<Res>(
        &self,
        path: impl Into<String>,
        ctx: &RequestContext,
    ) -> Result<HelixResponse<Res>>
    where
        Res: DeserializeOwned,
    {
        self.call::<(), Res>(HelixRequest::new(Method::DELETE, path), None, ctx)
            .await
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| Error::ConfigurationError(format!("invalid header value: {e}")))
}

/// Builder for configuring and creating a [`HelixClient`].
///
/// # Examples
///
/// ```no_run
/// use helixir::HelixClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), helixir::Error> {
/// let client = HelixClientBuilder::new()
///     .timeout(Duration::from_secs(10))
///     .default_header("User-Agent", "my-app/1.0")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct HelixClientBuilder {
    base_url: Option<Url>,
    default_headers: HeaderMap,
    timeout: Option<Duration>,
}

impl HelixClientBuilder {
    /// Creates a new `HelixClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            base_url: None,
            default_headers: HeaderMap::new(),
            timeout: None,
        }
    }

    /// Overrides the base URL. Defaults to [`DEFAULT_BASE_URL`]; mostly
    /// useful for pointing at a mock server in tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.base_url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Adds a default header included in all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("invalid header name: {e}")))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("invalid header value: {e}")))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Sets the client-wide request timeout. Individual calls can override
    /// it through [`RequestSettings`](crate::RequestSettings).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configured `HelixClient`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be
    /// constructed.
    pub fn build(self) -> Result<HelixClient> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };

        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::ConfigurationError(format!("failed to build HTTP client: {e}")))?;

        Ok(HelixClient {
            inner: Arc::new(ClientInner {
                http_client,
                base_url,
                default_headers: self.default_headers,
                timeout: self.timeout,
            }),
        })
    }
}

impl Default for HelixClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_base(base: &str) -> HelixClient {
        HelixClient::builder()
            .base_url(base)
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_url_preserves_base_path_prefix() {
        let client = client_with_base("https://api.twitch.tv/helix");
        let url = client.build_url(&HelixRequest::get("/streams")).unwrap();
        assert_eq!(url.as_str(), "https://api.twitch.tv/helix/streams");
    }

    #[test]
    fn test_build_url_appends_query_in_order() {
        let client = client_with_base("https://api.twitch.tv/helix");
        let request = HelixRequest::get("/streams")
            .with_query_param("id", "1")
            .with_query_param("id", "2")
            .with_page_size(25);
        let url = client.build_url(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.twitch.tv/helix/streams?id=1&id=2&first=25"
        );
    }

    #[test]
    fn test_build_url_with_nested_path() {
        let client = client_with_base("http://localhost:8080");
        let url = client
            .build_url(&HelixRequest::get("/moderation/banned"))
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/moderation/banned");
    }

    #[test]
    fn test_build_url_escapes_query_values() {
        let client = client_with_base("https://api.twitch.tv/helix");
        let request = HelixRequest::get("/search/channels").with_query_param("query", "a b&c");
        let url = client.build_url(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.twitch.tv/helix/search/channels?query=a+b%26c"
        );
    }

    #[test]
    fn test_default_base_url_is_used_when_unset() {
        let client = HelixClient::builder().build().unwrap();
        let url = client.build_url(&HelixRequest::get("/users")).unwrap();
        assert_eq!(url.as_str(), "https://api.twitch.tv/helix/users");
    }
}
