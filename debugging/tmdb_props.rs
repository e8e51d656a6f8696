//! Fetch the raw TMDB records for a movie and print them next to the
//! normalized detail model.
//! Usage:
//!   cargo run --bin tmdb_props -- <tmdb_id>
//!   cargo run --bin tmdb_props -- <tmdb_id> --raw-only
//! Requires TMDB_API_KEY in the environment (.env supported).

use anyhow::{Context, Result};
use cinescope::config::CatalogConfig;
use cinescope::normalize::Normalizer;
use cinescope::tmdb::{MovieApi, TmdbClient};
use dotenvy::dotenv;
use serde_json::{json, Value};
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    let mut args = env::args().skip(1);
    let id = args
        .next()
        .context("usage: tmdb_props <tmdb_id> [--raw-only]")?;
    let raw_only = args.any(|a| a == "--raw-only");

    let config = CatalogConfig::from_env()?;
    let client = TmdbClient::new(&config)?;

    let (movie, similar, reviews) = tokio::join!(
        client.movie(&id),
        client.similar(&id),
        client.reviews(&id),
    );
    let movie = movie.context("fetching movie record")?;
    let similar = similar.unwrap_or_else(|e| {
        eprintln!("similar failed: {e:#}");
        Value::Null
    });
    let reviews = reviews.unwrap_or_else(|e| {
        eprintln!("reviews failed: {e:#}");
        Value::Null
    });

    let output = if raw_only {
        json!({ "movie": movie, "similar": similar, "reviews": reviews })
    } else {
        let normalized = Normalizer::from_config(&config).details(&movie, &similar, &reviews);
        json!({
            "raw": { "movie": movie, "similar": similar, "reviews": reviews },
            "normalized": normalized,
        })
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
