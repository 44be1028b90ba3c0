//! Shared HTTP request helpers for CLI commands.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

pub fn base_url(host: &str, port: u16) -> String {
    format!("http://{}:{}", host, port)
}

pub async fn get_json<T: for<'de> Deserialize<'de>>(url: &str) -> Result<T> {
    reqwest::get(url)
        .await
        .with_context(|| format!("failed to connect to musterd at {} — is it running?", url))?
        .json::<T>()
        .await
        .context("failed to parse response")
}

/// PUT a JSON body and return the plain-text reply. Non-2xx replies become
/// errors carrying the server's message.
pub async fn put_json_text<T: Serialize>(url: &str, body: &T) -> Result<String> {
    let resp = reqwest::Client::new()
        .put(url)
        .json(body)
        .send()
        .await
        .with_context(|| format!("failed to connect to musterd at {} — is it running?", url))?;

    let status = resp.status();
    let text = resp.text().await.context("failed to read response")?;
    if !status.is_success() {
        bail!("musterd rejected the report ({}): {}", status, text);
    }
    Ok(text)
}
