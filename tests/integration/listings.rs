use crate::*;

/// A reporter's add shows up in the dump under `origin:port`, sanitized and
/// without the fields that are dropped on ingest.
#[tokio::test]
async fn test_add_then_list() {
    let node = start_node(NodeOptions::default()).await.unwrap();

    let result = async {
        let (status, text) = node
            .put(&json!([report("add", 7777, "Night Shift", 4, 16)]))
            .await?;
        assert_eq!(status, 200);
        assert_eq!(text, "Server added / Updated.");

        let listings = node.get_json("/serverListings").await?;
        let entry = &listings["127.0.0.1:7777"];
        assert_eq!(entry["name"], "Night Shift");
        assert_eq!(entry["players"], "4");
        assert_eq!(entry["maxPlayers"], "16");
        assert!(entry["added"].is_string(), "missing added: {}", entry);
        assert!(entry.get("timeout").is_none(), "timeout was kept: {}", entry);
        assert!(entry.get("port").is_none(), "port was kept: {}", entry);
        Ok::<_, anyhow::Error>(())
    }
    .await;

    node.stop().await.unwrap();
    result.unwrap();
}

/// Markup and punctuation never reach the registry.
#[tokio::test]
async fn test_values_are_sanitized() {
    let node = start_node(NodeOptions::default()).await.unwrap();

    let mut item = report("add", 7777, "<b>Evil</b> & co.", 1, 8);
    item["server"]["map"] = json!("de_dust2; DROP");
    let (status, _) = node.put(&json!([item])).await.unwrap();
    assert_eq!(status, 200);

    let listings = node.get_json("/serverListings").await.unwrap();
    let entry = &listings["127.0.0.1:7777"];
    assert_eq!(entry["name"], "bEvilb  co");
    assert_eq!(entry["map"], "dedust2 DROP");

    node.stop().await.unwrap();
}

/// Update replaces the whole record; delete withdraws it.
#[tokio::test]
async fn test_update_and_delete() {
    let node = start_node(NodeOptions::default()).await.unwrap();

    let mut first = report("add", 7777, "Alpha", 1, 8);
    first["server"]["map"] = json!("arena");
    node.put(&json!([first])).await.unwrap();

    let (status, _) = node
        .put(&json!([report("update", 7777, "Alpha", 6, 8)]))
        .await
        .unwrap();
    assert_eq!(status, 200);
    let listings = node.get_json("/serverListings").await.unwrap();
    assert_eq!(listings["127.0.0.1:7777"]["players"], "6");
    assert!(
        listings["127.0.0.1:7777"].get("map").is_none(),
        "update should replace, not merge"
    );

    let (status, text) = node
        .put(&json!([report("delete", 7777, "Alpha", 6, 8)]))
        .await
        .unwrap();
    assert_eq!(status, 200);
    assert_eq!(text, "Server removed.");
    assert_eq!(node.get_json("/serverListings").await.unwrap(), json!({}));

    // Deleting again is not an error.
    let (status, _) = node
        .put(&json!([report("delete", 7777, "Alpha", 6, 8)]))
        .await
        .unwrap();
    assert_eq!(status, 200);

    node.stop().await.unwrap();
}

/// One reporter can host several game servers, one listing per port.
#[tokio::test]
async fn test_multiple_ports_in_one_batch() {
    let node = start_node(NodeOptions::default()).await.unwrap();

    let (status, _) = node
        .put(&json!([
            report("add", 7777, "One", 1, 8),
            report("add", 7778, "Two", 2, 8),
            report("add", 7779, "Three", 3, 8),
        ]))
        .await
        .unwrap();
    assert_eq!(status, 200);

    let listings = node.get_json("/serverListings").await.unwrap();
    let keys: Vec<&String> = listings.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["127.0.0.1:7777", "127.0.0.1:7778", "127.0.0.1:7779"]);
    assert_eq!(node.registry.len(), 3);

    node.stop().await.unwrap();
}

/// Rejected bodies answer 400 with the protocol message and change nothing.
#[tokio::test]
async fn test_malformed_bodies() {
    let node = start_node(NodeOptions::default()).await.unwrap();
    let client = reqwest::Client::new();

    for raw in ["", "   ", "{not json", "{}", "[]", "42"] {
        let resp = client
            .put(node.url("/serverListings"))
            .header("content-type", "application/json")
            .body(raw)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 400, "body {:?}", raw);
        assert_eq!(resp.text().await.unwrap(), "Malformed request.", "body {:?}", raw);
    }
    assert!(node.registry.is_empty());

    node.stop().await.unwrap();
}

#[tokio::test]
async fn test_missing_field_is_named() {
    let node = start_node(NodeOptions::default()).await.unwrap();

    let mut item = report("add", 7777, "Alpha", 1, 8);
    item["server"].as_object_mut().unwrap().remove("maxPlayers");
    let (status, text) = node.put(&json!([item])).await.unwrap();
    assert_eq!(status, 400);
    assert_eq!(text, "Missing JSON data: maxPlayers");
    assert!(node.registry.is_empty());

    node.stop().await.unwrap();
}

/// Items before the bad one stay applied; items after it are never tried.
#[tokio::test]
async fn test_unknown_operation_stops_batch() {
    let node = start_node(NodeOptions::default()).await.unwrap();

    let (status, text) = node
        .put(&json!([
            report("add", 7777, "Kept", 1, 8),
            report("restart", 7778, "Bad", 1, 8),
            report("add", 7779, "Never", 1, 8),
        ]))
        .await
        .unwrap();
    assert_eq!(status, 400);
    assert_eq!(text, "Unknown operation type.");

    let listings = node.get_json("/serverListings").await.unwrap();
    assert!(listings.get("127.0.0.1:7777").is_some());
    assert!(listings.get("127.0.0.1:7778").is_none());
    assert!(listings.get("127.0.0.1:7779").is_none());

    node.stop().await.unwrap();
}

/// The same port reported from two hosts is two listings, and a host can
/// only withdraw its own.
#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_origins_are_isolated() {
    let node = start_node(NodeOptions::default()).await.unwrap();
    let other_ip: IpAddr = "127.0.0.2".parse().unwrap();
    let other = client_from(other_ip).unwrap();

    node.put(&json!([report("add", 7777, "Local", 1, 8)]))
        .await
        .unwrap();
    let (status, _) = node
        .put_from(&other, &json!([report("add", 7777, "Remote", 2, 8)]))
        .await
        .unwrap();
    assert_eq!(status, 200);

    let listings = node.get_json("/serverListings").await.unwrap();
    assert_eq!(listings["127.0.0.1:7777"]["name"], "Local");
    assert_eq!(listings["127.0.0.2:7777"]["name"], "Remote");

    let (status, _) = node
        .put_from(&other, &json!([report("delete", 7777, "Remote", 2, 8)]))
        .await
        .unwrap();
    assert_eq!(status, 200);

    let listings = node.get_json("/serverListings").await.unwrap();
    assert!(listings.get("127.0.0.1:7777").is_some());
    assert!(listings.get("127.0.0.2:7777").is_none());
    assert_eq!(
        node.registry.get(&ListingKey::new(LOOPBACK, "7777")).map(|r| r.name),
        Some("Local".to_string())
    );

    node.stop().await.unwrap();
}
