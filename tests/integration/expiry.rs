use crate::*;

const SWEEP_PERIOD: Duration = Duration::from_millis(50);
const EXPIRE_AFTER: Duration = Duration::from_millis(400);

fn sweeping() -> NodeOptions {
    NodeOptions {
        sweep: Some((SWEEP_PERIOD, EXPIRE_AFTER)),
        ..NodeOptions::default()
    }
}

/// A listing that stops reporting is gone after the expiry window.
#[tokio::test]
async fn test_silent_listing_expires() {
    let node = start_node(sweeping()).await.unwrap();

    node.put(&json!([report("add", 7777, "Quiet", 1, 8)]))
        .await
        .unwrap();
    assert_eq!(node.registry.len(), 1);

    let registry = node.registry.clone();
    assert!(
        wait_for(Duration::from_secs(5), || registry.is_empty()).await,
        "listing never expired"
    );
    assert_eq!(node.get_json("/serverListings").await.unwrap(), json!({}));

    node.stop().await.unwrap();
}

/// Heartbeats keep a listing alive well past a single expiry window.
#[tokio::test]
async fn test_heartbeats_keep_listing_alive() {
    let node = start_node(sweeping()).await.unwrap();
    let started = tokio::time::Instant::now();

    while started.elapsed() < EXPIRE_AFTER * 3 {
        let (status, _) = node
            .put(&json!([report("update", 7777, "Busy", 3, 8)]))
            .await
            .unwrap();
        assert_eq!(status, 200);
        tokio::time::sleep(SWEEP_PERIOD).await;
        assert_eq!(node.registry.len(), 1, "listing expired while reporting");
    }

    node.stop().await.unwrap();
}

/// /stats follows the sweeper, not the live listing count.
#[tokio::test]
async fn test_stats_after_sweep() {
    let node = start_node(sweeping()).await.unwrap();

    node.put(&json!([
        report("add", 7777, "Big", 10, 20),
        report("add", 7778, "Full", 5, 5),
    ]))
    .await
    .unwrap();

    let registry = node.registry.clone();
    assert!(
        wait_for(Duration::from_secs(2), || registry.stats().servers == 2).await,
        "sweeper never counted the listings"
    );

    let stats = node.get_json("/stats").await.unwrap();
    assert_eq!(stats["servers"], 2);
    assert_eq!(stats["totalPlayers"], 15);
    assert_eq!(stats["totalSlots"], 25);
    assert_eq!(stats["capacity"], 60.0);
    assert_eq!(stats["port"], node.addr.port());

    node.stop().await.unwrap();
}

/// Without a running sweeper nothing expires; a manual pass does the work.
#[tokio::test]
async fn test_manual_sweep() {
    let node = start_node(NodeOptions::default()).await.unwrap();

    node.put(&json!([report("add", 7777, "Old", 1, 8)]))
        .await
        .unwrap();

    let report = node
        .registry
        .sweep_at(chrono::Utc::now(), Duration::from_secs(120));
    assert_eq!(report.evicted, 0);
    assert_eq!(report.stats.servers, 1);

    let later = chrono::Utc::now() + chrono::Duration::seconds(121);
    let report = node.registry.sweep_at(later, Duration::from_secs(120));
    assert_eq!(report.evicted, 1);
    assert_eq!(report.stats.servers, 0);
    assert_eq!(node.get_json("/serverListings").await.unwrap(), json!({}));

    node.stop().await.unwrap();
}
