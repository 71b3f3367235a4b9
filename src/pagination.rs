//! Cursor pagination for multi-page listings.
//!
//! Helix splits large listings across pages and hands back an opaque cursor
//! in the response body's `pagination` block. [`Continuation`] tracks where
//! a listing stands, and callers drive the loop themselves: the crate never
//! fetches a next page on its own, because scheduling that I/O is the
//! caller's business.
//!
//! # Examples
//!
//! Draining a listing page by page:
//!
//! ```no_run
//! use helixir::{Continuation, Credentials, HelixClient, HelixRequest, RequestContext, Scope};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct BannedUser {
//!     user_login: String,
//! }
//!
//! # async fn example() -> Result<(), helixir::Error> {
//! let client = HelixClient::builder().build()?;
//! let ctx = RequestContext::new(Credentials::new(
//!     "client-id",
//!     "mod-token",
//!     [Scope::ModerationRead],
//! ))
//! .with_required_scopes([Scope::ModerationRead]);
//!
//! let mut continuation = Continuation::Start;
//! let mut banned = Vec::new();
//! loop {
//!     let mut request = HelixRequest::get("/moderation/banned")
//!         .with_query_param("broadcaster_id", "141981764")
//!         .with_page_size(100);
//!     if let Some(cursor) = continuation.cursor() {
//!         request = request.with_after(cursor);
//!     }
//!
//!     let page = client.call::<(), Vec<BannedUser>>(request, None, &ctx).await?;
//!     banned.extend(page.data);
//!     continuation = page.pagination;
//!     if continuation.is_finished() {
//!         break;
//!     }
//! }
//! println!("{} users banned", banned.len());
//! # Ok(())
//! # }
//! ```

use serde::Deserialize;
use std::fmt;

/// An opaque pagination token.
///
/// The server mints it; the next request echoes it back under the `after`
/// query parameter. No internal structure is ever interpreted client-side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Wraps a raw cursor string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw token as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` for the empty token, which the API uses to mean "no more
    /// pages".
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a paginated listing stands.
///
/// Two of the states mean "the next request carries no cursor", but only
/// one of them means the loop should stop:
///
/// - [`Start`](Continuation::Start): nothing fetched yet ("cursor not yet
///   requested").
/// - [`After`](Continuation::After): the listing continues after this token.
/// - [`Finished`](Continuation::Finished): the server reported no further
///   pages.
///
/// # Examples
///
/// ```
/// use helixir::Continuation;
///
/// let fresh = Continuation::default();
/// assert_eq!(fresh, Continuation::Start);
/// assert_ne!(fresh, Continuation::Finished);
/// assert!(!fresh.is_finished());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Continuation {
    /// No page has been requested yet; the first request goes out without a
    /// cursor.
    #[default]
    Start,
    /// The listing continues after this cursor.
    After(Cursor),
    /// The server reported no further pages.
    Finished,
}

impl Continuation {
    /// Builds the continuation state from a response body's pagination
    /// block.
    ///
    /// An absent block, an absent cursor field, and an empty cursor string
    /// all mean the same thing on the wire: the listing is complete.
    pub(crate) fn from_block(block: Option<Pagination>) -> Self {
        match block.and_then(|pagination| pagination.cursor) {
            Some(cursor) if !cursor.is_empty() => Continuation::After(cursor),
            _ => Continuation::Finished,
        }
    }

    /// The cursor to attach to the next request, if the listing continues.
    pub fn cursor(&self) -> Option<&Cursor> {
        match self {
            Continuation::After(cursor) => Some(cursor),
            _ => None,
        }
    }

    /// `true` once the server has reported the end of the listing.
    pub fn is_finished(&self) -> bool {
        matches!(self, Continuation::Finished)
    }
}

/// Wire shape of the `pagination` block in a success body.
#[derive(Debug, Deserialize)]
pub(crate) struct Pagination {
    #[serde(default)]
    pub(crate) cursor: Option<Cursor>,
}
