//! Manual reporter commands — announce or withdraw a listing by hand.

use anyhow::Result;
use serde_json::json;

use super::http::put_json_text;

pub async fn cmd_heartbeat(
    base: &str,
    port: u16,
    name: &str,
    players: u32,
    max_players: u32,
) -> Result<()> {
    let batch = json!([{
        "type": "add",
        "server": {
            "name": name,
            "port": port,
            "players": players,
            "maxPlayers": max_players,
        },
    }]);

    let reply = put_json_text(&format!("{}/serverListings", base), &batch).await?;
    println!("{}", reply);
    Ok(())
}

/// Withdraw the listing this host advertises on `port`. The registry still
/// requires the full field set on deletes, so placeholders are sent.
pub async fn cmd_delete(base: &str, port: u16) -> Result<()> {
    let batch = json!([{
        "type": "delete",
        "server": {
            "name": "",
            "port": port,
            "players": 0,
            "maxPlayers": 0,
        },
    }]);

    let reply = put_json_text(&format!("{}/serverListings", base), &batch).await?;
    println!("{}", reply);
    Ok(())
}
