//! `slink resolve <url>` – print the plugin a URL resolves to.

use anyhow::{Context, Result};
use slink_core::Session;
use std::sync::Arc;

pub async fn run_resolve(session: Arc<Session>, url: String, no_redirect: bool) -> Result<()> {
    // Redirect probing blocks on curl.
    let plugin = tokio::task::spawn_blocking(move || {
        if no_redirect {
            session.resolve_url_no_redirect(&url)
        } else {
            session.resolve_url(&url)
        }
    })
    .await
    .context("resolve task join")??;
    println!("{}\t{}", plugin.module(), plugin.url());
    Ok(())
}
