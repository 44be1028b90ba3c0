//! Listing dump command.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::Deserialize;

use super::http::get_json;

#[derive(Deserialize)]
struct Listing {
    name: String,
    players: String,
    #[serde(rename = "maxPlayers")]
    max_players: String,
    added: String,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_json::Value>,
}

pub async fn cmd_listings(base: &str) -> Result<()> {
    let listings: BTreeMap<String, Listing> =
        get_json(&format!("{}/serverListings", base)).await?;

    if listings.is_empty() {
        println!("No servers are reporting.");
        return Ok(());
    }

    println!("═══════════════════════════════════════");
    println!("  Server Listings ({})", listings.len());
    println!("═══════════════════════════════════════");

    for (addr, l) in &listings {
        println!("  ┌─ {}", l.name);
        println!("  │  address   : {}", addr);
        println!("  │  players   : {} / {}", l.players, l.max_players);
        for (k, v) in &l.extra {
            let v = v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string());
            println!("  │  {:<9} : {}", k, v);
        }
        println!("  └─ last seen : {}", l.added);
    }

    Ok(())
}
