//! Integration tests for the ordering persisted in sled

use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use winring::config::WinringConfig;
use winring::outcome::FocusOutcome;
use winring::platform::SimulatedBrowser;
use winring::store::{KeyValueStore, SledKeyValueStore, LABELS_KEY, ORDER_KEY};
use winring::types::WindowKind;
use winring::WindowRing;

fn config_for(dir: &TempDir) -> WinringConfig {
    let mut config = WinringConfig::default();
    config.storage.path = Some(dir.path().join("store"));
    config.relocation.settle_delay_ms = 0;
    config
}

fn browser_with(n: usize) -> Arc<SimulatedBrowser> {
    let browser = Arc::new(SimulatedBrowser::new());
    for i in 0..n {
        browser.open_window(WindowKind::Normal, &[format!("w{i}").as_str()]);
    }
    browser
}

#[tokio::test]
async fn test_order_survives_restart() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir);

    {
        let browser = browser_with(3);
        let ring = WindowRing::from_config(browser, &config).unwrap();
        assert!(ring.save_order(&[3, 1, 2]).await.unwrap());
        ring.set_label(1, "Mail", "w0").await.unwrap();
    }

    let browser = browser_with(3);
    let ring = WindowRing::from_config(browser.clone(), &config).unwrap();
    assert_eq!(ring.reconcile().await.unwrap(), vec![3, 1, 2]);
    assert_eq!(
        ring.focus_by_offset(1).await.unwrap(),
        FocusOutcome::Focused { from: 3, to: 1 }
    );

    let rows = ring.window_summaries().await.unwrap();
    assert_eq!(rows[1].title, "Mail");
    assert!(rows[1].custom);
    assert!(rows[1].active);
}

#[tokio::test]
async fn test_restart_with_fewer_windows_prunes() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir);

    {
        let ring = WindowRing::from_config(browser_with(4), &config).unwrap();
        ring.save_order(&[4, 3, 2, 1]).await.unwrap();
    }

    let ring = WindowRing::from_config(browser_with(2), &config).unwrap();
    assert_eq!(ring.reconcile().await.unwrap(), vec![2, 1]);
    assert_eq!(ring.store().read_order().await.unwrap(), Some(vec![2, 1]));
}

#[tokio::test]
async fn test_corrupt_values_are_repaired() {
    let dir = TempDir::new().unwrap();
    let backend = Arc::new(SledKeyValueStore::new(dir.path().join("store")).unwrap());
    backend.set(ORDER_KEY, json!({ "not": "an array" })).await.unwrap();
    backend.set(LABELS_KEY, json!(["not", "a", "map"])).await.unwrap();

    let ring = WindowRing::new(browser_with(2), backend.clone(), std::time::Duration::ZERO);

    assert_eq!(ring.reconcile().await.unwrap(), vec![1, 2]);
    assert!(ring.labels().await.unwrap().is_empty());
    assert_eq!(backend.get(ORDER_KEY).await.unwrap(), Some(json!([1, 2])));
}

#[tokio::test]
async fn test_non_json_bytes_are_overwritten() {
    let dir = TempDir::new().unwrap();
    let backend = Arc::new(SledKeyValueStore::new(dir.path().join("store")).unwrap());
    backend.db().insert(ORDER_KEY, &b"garbage"[..]).unwrap();
    backend.db().insert(LABELS_KEY, &b"garbage"[..]).unwrap();

    let ring = WindowRing::new(browser_with(2), backend.clone(), std::time::Duration::ZERO);

    assert_eq!(ring.window_summaries().await.unwrap().len(), 2);
    assert_eq!(
        ring.set_label(2, "Work", "w1").await.unwrap().as_deref(),
        Some("Work")
    );
    assert_eq!(backend.get(LABELS_KEY).await.unwrap(), Some(json!({ "2": "Work" })));
    ring.clear_label(2).await.unwrap();
    assert!(ring.labels().await.unwrap().is_empty());
    assert_eq!(backend.get(ORDER_KEY).await.unwrap(), Some(json!([1, 2])));
}

#[tokio::test]
async fn test_mixed_entries_keep_valid_ids() {
    let dir = TempDir::new().unwrap();
    let backend = Arc::new(SledKeyValueStore::new(dir.path().join("store")).unwrap());
    backend
        .set(ORDER_KEY, json!([2, "x", -1, null, 1, 4294967296u64]))
        .await
        .unwrap();

    let ring = WindowRing::new(browser_with(3), backend, std::time::Duration::ZERO);

    assert_eq!(ring.reconcile().await.unwrap(), vec![2, 1, 3]);
}
