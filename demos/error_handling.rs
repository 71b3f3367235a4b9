//! Error classification walkthrough, no network required.
//!
//! This example shows how to:
//! - Classify raw response parts the way the client does
//! - Match on each error kind the crate produces
//! - Read rate-limit info and raw bodies off errors
//! - Run the scope pre-flight by hand
//!
//! Run with: `cargo run --example error_handling`

use helixir::{Credentials, Error, HelixResponse, RequestContext, Scope};
use http::{HeaderMap, HeaderValue, StatusCode};

fn classify(label: &str, status: StatusCode, headers: &HeaderMap, body: &str) {
    println!("=== {label} ===");
    match HelixResponse::<Vec<serde_json::Value>>::from_parts(status, headers, body) {
        Ok(page) => {
            println!(
                "ok: {} items, finished: {}",
                page.data.len(),
                page.pagination.is_finished()
            );
        }
        Err(Error::Api {
            status,
            error,
            message,
            rate_limit,
        }) => {
            println!("structured API error {status}: {error}: {message}");
            if rate_limit.is_exhausted() {
                println!("  bucket empty, resets in {:?}", rate_limit.until_reset());
            }
        }
        Err(Error::MalformedErrorBody {
            status,
            raw_response,
        }) => {
            println!("degraded: HTTP {status}, body kept raw: {raw_response:?}");
        }
        Err(Error::DeserializationFailed {
            status,
            source,
            raw_response,
        }) => {
            println!("2xx with a bad body (status {status}): {source}");
            println!("  raw: {raw_response:?}");
        }
        Err(e) => println!("other: {e}"),
    }
    println!();
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("helixir=debug")
        .init();

    // A healthy page.
    classify(
        "success",
        StatusCode::OK,
        &HeaderMap::new(),
        r#"{"data":[{"id":"1"}],"pagination":{"cursor":"abc"}}"#,
    );

    // A structured 429 with rate-limit headers.
    let mut headers = HeaderMap::new();
    headers.insert("ratelimit-limit", HeaderValue::from_static("800"));
    headers.insert("ratelimit-remaining", HeaderValue::from_static("0"));
    headers.insert("ratelimit-reset", HeaderValue::from_static("1700000000"));
    classify(
        "rate limited",
        StatusCode::TOO_MANY_REQUESTS,
        &headers,
        r#"{"status":429,"error":"Too Many Requests","message":"Thanks for watching!"}"#,
    );

    // A gateway error that hands back HTML instead of JSON.
    classify(
        "html error page",
        StatusCode::BAD_GATEWAY,
        &HeaderMap::new(),
        "<html>502</html>",
    );

    // A 2xx whose body is not the promised envelope.
    classify(
        "broken success",
        StatusCode::OK,
        &HeaderMap::new(),
        "not json at all",
    );

    // The scope pre-flight fails before any of the above can happen.
    let ctx = RequestContext::new(Credentials::new("id", "token", [Scope::ChatRead]))
        .with_required_scopes([Scope::ChannelModerate]);
    if let Err(Error::MissingScopes { missing }) = ctx.ensure_scopes() {
        println!("=== scope pre-flight ===");
        let names: Vec<&str> = missing.iter().map(|s| s.as_str()).collect();
        println!("token cannot make this call, missing: {}", names.join(", "));
    }
}
