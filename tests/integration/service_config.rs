use crate::*;

/// A fresh directory under the system temp dir, unique per test run.
fn static_root(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "muster-static-{}-{}-{}",
        tag,
        std::process::id(),
        chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
    ));
    std::fs::create_dir_all(dir.join("css")).unwrap();
    dir
}

/// /config hands clients the configured announcement and heartbeat interval.
#[tokio::test]
async fn test_config_document() {
    let node = start_node(NodeOptions {
        service_config: ServiceConfig {
            service_message: "Maintenance at 22:00".into(),
            heartbeat_interval: 60_000,
        },
        ..NodeOptions::default()
    })
    .await
    .unwrap();

    let config = node.get_json("/config").await.unwrap();
    assert_eq!(
        config,
        json!({"ServiceMessage": "Maintenance at 22:00", "HeartbeatInterval": 60000})
    );

    node.stop().await.unwrap();
}

/// Any origin may read the API from a browser.
#[tokio::test]
async fn test_cors_allows_any_origin() {
    let node = start_node(NodeOptions::default()).await.unwrap();

    let resp = reqwest::Client::new()
        .get(node.url("/serverListings"))
        .header("Origin", "http://games.example")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );

    node.stop().await.unwrap();
}

/// The index page and the static directory share the root.
#[tokio::test]
async fn test_page_and_static_files() {
    let root = static_root("page");
    std::fs::write(root.join("css/style.css"), "body { color: black; }").unwrap();

    let node = start_node(NodeOptions {
        static_dir: root.clone(),
        ..NodeOptions::default()
    })
    .await
    .unwrap();

    node.put(&json!([report("add", 7777, "Night Shift", 6, 8)]))
        .await
        .unwrap();
    node.registry.sweep(Duration::from_secs(120));

    let page = reqwest::get(node.url("/")).await.unwrap();
    assert_eq!(page.status().as_u16(), 200);
    let html = page.text().await.unwrap();
    assert!(html.contains("Night Shift"), "listing missing: {}", html);
    assert!(html.contains("127.0.0.1:7777"), "address missing: {}", html);
    assert!(html.contains("75% capacity"), "capacity missing: {}", html);

    let css = reqwest::get(node.url("/css/style.css")).await.unwrap();
    assert_eq!(css.status().as_u16(), 200);
    assert_eq!(css.text().await.unwrap(), "body { color: black; }");

    let missing = reqwest::get(node.url("/css/nope.css")).await.unwrap();
    assert_eq!(missing.status().as_u16(), 404);

    node.stop().await.unwrap();
    let _ = std::fs::remove_dir_all(root);
}
