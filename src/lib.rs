//! # Helixir - a typed client for the Twitch Helix API
//!
//! Helixir wraps the Helix REST API in a type-safe client built on top of
//! `reqwest`. Every response comes back as a [`HelixResponse`] that pairs
//! the decoded payload with the envelope metadata Helix sends alongside
//! it: the pagination cursor and the rate-limit headers. Errors are
//! classified into a small set of kinds that always preserve the raw
//! response for debugging.
//!
//! ## Quick Start
//!
//! ```no_run
//! use helixir::{Credentials, HelixClient, HelixRequest, RequestContext, Scope};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Subscription {
//!     user_name: String,
//!     tier: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), helixir::Error> {
//!     let client = HelixClient::builder().build()?;
//!
//!     let credentials = Credentials::new(
//!         "my-client-id",
//!         "my-oauth-token",
//!         [Scope::ChannelReadSubscriptions],
//!     );
//!     let ctx = RequestContext::new(credentials)
//!         .with_required_scopes([Scope::ChannelReadSubscriptions]);
//!
//!     let request = HelixRequest::get("/subscriptions")
//!         .with_query_param("broadcaster_id", "141981764")
//!         .with_page_size(100);
//!
//!     let page = client.call::<(), Vec<Subscription>>(request, None, &ctx).await?;
//!     println!("{} subscriptions on this page", page.data.len());
//!     if let Some(total) = page.total {
//!         println!("{total} across all pages");
//!     }
//!     println!("{} rate-limit points left", page.rate_limit.remaining);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Typed envelopes** - Generic over payload types, with the `data` /
//!   `total` / `pagination` wire envelope decoded for you
//! - **Cursor pagination** - [`Continuation`] distinguishes "not fetched
//!   yet" from "no more pages", so loops cannot run forever on a sentinel
//! - **Rate-limit telemetry** - Every response and API error carries a
//!   [`RateLimitInfo`] snapshot parsed from the bucket headers
//! - **Scope pre-flight** - Calls that require OAuth scopes the token was
//!   never granted fail locally, before spending a rate-limit point
//! - **Rich error handling** - Structured API errors, degraded reporting
//!   for unparseable bodies, raw responses preserved throughout
//! - **Automatic logging** - Structured logging with `tracing` for
//!   observability
//! - **Builder pattern** - Fluent API for configuring clients
//!
//! ## Error Handling
//!
//! One request produces exactly one outcome. Failures classify into
//! kinds you can match on:
//!
//! ```no_run
//! use helixir::{Credentials, Error, HelixClient, RequestContext};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = HelixClient::builder().build()?;
//! # let ctx = RequestContext::new(Credentials::new("id", "token", Vec::new()));
//! match client.get::<Vec<serde_json::Value>>("/streams", &ctx).await {
//!     Ok(page) => {
//!         println!("success: {} items", page.data.len());
//!     }
//!     Err(Error::Api { status, error, message, rate_limit }) => {
//!         eprintln!("API error {status}: {error}: {message}");
//!         if rate_limit.is_exhausted() {
//!             eprintln!("bucket empty, resets at {:?}", rate_limit.reset_at);
//!         }
//!     }
//!     Err(Error::MalformedErrorBody { status, raw_response }) => {
//!         eprintln!("HTTP {status} with an unparseable body: {raw_response}");
//!     }
//!     Err(e) => {
//!         eprintln!("other error: {e}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Pagination
//!
//! List endpoints return pages of up to [`MAX_PAGE_SIZE`] items and a
//! cursor for the next page. The envelope's [`Continuation`] tells you
//! whether to keep going; see the [`pagination`] module for the loop
//! idiom.

mod client;
mod error;
pub mod pagination;
mod param;
pub mod rate_limit;
mod request;
mod response;
pub mod scope;

pub use client::{HelixClient, HelixClientBuilder, DEFAULT_BASE_URL};
pub use error::{Error, ErrorEnvelope, Result};
pub use pagination::{Continuation, Cursor};
pub use param::Clamped;
pub use rate_limit::RateLimitInfo;
pub use request::{
    Credentials, HelixRequest, RequestContext, RequestSettings, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
    MIN_PAGE_SIZE,
};
pub use response::HelixResponse;
pub use scope::{Scope, UnknownScope};
