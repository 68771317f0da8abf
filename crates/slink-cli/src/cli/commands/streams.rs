//! `slink streams <url>` – list streams for a URL.

use anyhow::{Context, Result};
use slink_core::{Session, StreamParams, Streams};
use std::sync::Arc;

fn print_streams(streams: &Streams) {
    if streams.is_empty() {
        println!("No streams found.");
        return;
    }
    println!("{:<12} {:<6} {}", "QUALITY", "KIND", "URL");
    for (name, s) in streams {
        println!("{:<12} {:<6} {}", name, s.kind.as_str(), s.url);
    }
}

pub async fn run_streams(
    session: Arc<Session>,
    url: String,
    stream_types: Option<Vec<String>>,
    json: bool,
) -> Result<()> {
    let params = StreamParams {
        stream_types,
        ..Default::default()
    };
    let streams = tokio::task::spawn_blocking(move || session.streams(&url, &params))
        .await
        .context("streams task join")??;
    if json {
        println!("{}", serde_json::to_string_pretty(&streams)?);
    } else {
        print_streams(&streams);
    }
    Ok(())
}
