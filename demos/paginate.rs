//! Pagination example that drains a real Helix listing.
//!
//! This example shows how to:
//! - Build a client and a request context with credentials
//! - Request pages with an explicit page size
//! - Follow the pagination cursor until the listing ends
//! - Watch the rate-limit bucket drain as pages come in
//!
//! Needs real credentials:
//! `TWITCH_CLIENT_ID=... TWITCH_TOKEN=... cargo run --example paginate`

use helixir::{Credentials, HelixClient, HelixRequest, RequestContext};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Game {
    id: String,
    name: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter("helixir=debug,paginate=info")
        .init();

    let (client_id, token) = match (
        std::env::var("TWITCH_CLIENT_ID"),
        std::env::var("TWITCH_TOKEN"),
    ) {
        (Ok(id), Ok(token)) => (id, token),
        _ => {
            eprintln!("set TWITCH_CLIENT_ID and TWITCH_TOKEN to run this example");
            return Ok(());
        }
    };

    let client = HelixClient::builder().build()?;
    // Top games needs no user scopes, any valid token will do.
    let ctx = RequestContext::new(Credentials::new(client_id, token, Vec::new()));

    let request = HelixRequest::get("/games/top").with_page_size(100);

    let mut fetched = 0usize;
    let mut pages = 0usize;
    let mut page = client
        .call::<(), Vec<Game>>(request.clone(), None, &ctx)
        .await?;

    loop {
        pages += 1;
        fetched += page.data.len();
        println!(
            "page {pages}: {} games, {} rate-limit points left",
            page.data.len(),
            page.rate_limit.remaining
        );

        let Some(cursor) = page.next_cursor() else {
            break;
        };
        if pages >= 5 {
            println!("stopping early, cursor to resume from: {cursor}");
            break;
        }

        page = client
            .call::<(), Vec<Game>>(request.clone().with_after(cursor), None, &ctx)
            .await?;
    }

    println!("fetched {fetched} games across {pages} pages");
    Ok(())
}
