//! Integration tests for command dispatch: focus cycling, relocation and
//! the in-flight guard under concurrent commands

use super::test_utils::simulated_ring;
use std::time::Duration;
use tokio::sync::mpsc;
use winring::outcome::{FocusOutcome, RelocateOutcome, SkipReason};
use winring::types::WindowKind;
use winring::{Command, CommandOutcome};

#[tokio::test]
async fn test_focus_cycles_through_every_window_and_wraps() {
    let (browser, ring, ids) = simulated_ring(&[&["a"], &["b"], &["c"]], Duration::ZERO);
    browser.set_focused(ids[0]).unwrap();

    let mut visited = Vec::new();
    for _ in 0..3 {
        ring.dispatch(Command::FocusNextWindow).await;
        visited.push(browser.focused().unwrap());
    }
    assert_eq!(visited, vec![ids[1], ids[2], ids[0]]);

    ring.dispatch(Command::FocusPreviousWindow).await;
    assert_eq!(browser.focused(), Some(ids[2]));
}

#[tokio::test]
async fn test_saved_order_drives_cycling() {
    let (browser, ring, ids) = simulated_ring(&[&["a"], &["b"], &["c"]], Duration::ZERO);
    ring.save_order(&[ids[2], ids[0], ids[1]]).await.unwrap();
    browser.set_focused(ids[1]).unwrap();

    ring.dispatch(Command::FocusNextWindow).await;
    assert_eq!(browser.focused(), Some(ids[2]));
}

#[tokio::test]
async fn test_relocation_round_trip_restores_selection() {
    let (browser, ring, ids) =
        simulated_ring(&[&["a0", "a1", "a2"], &["b0"]], Duration::ZERO);
    browser.set_focused(ids[0]).unwrap();
    browser.set_highlighted(ids[0], &[1, 2]).unwrap();
    browser.set_active(ids[0], 2).unwrap();

    let outcome = ring.execute(Command::MoveTabsNextWindow).await.unwrap();
    let CommandOutcome::Relocate(RelocateOutcome::Moved(report)) = outcome else {
        panic!("expected a move, got {outcome:?}");
    };
    assert!(report.is_clean());
    assert_eq!(report.positions, vec![1, 2]);
    assert_eq!(browser.tab_titles(ids[1]), vec!["b0", "a1", "a2"]);
    assert_eq!(browser.highlighted_titles(ids[1]), vec!["a1", "a2"]);
    assert_eq!(browser.active_title(ids[1]).as_deref(), Some("a2"));
    assert_eq!(browser.focused(), Some(ids[1]));

    // And back again: the selection follows the tabs
    ring.execute(Command::MoveTabsPreviousWindow).await.unwrap();
    assert_eq!(browser.tab_titles(ids[0]), vec!["a0", "a1", "a2"]);
    assert_eq!(browser.active_title(ids[0]).as_deref(), Some("a2"));
    assert_eq!(browser.focused(), Some(ids[0]));
}

#[tokio::test]
async fn test_concurrent_relocations_move_once() {
    let (browser, ring, ids) =
        simulated_ring(&[&["a0", "a1"], &["b0"]], Duration::from_millis(40));
    browser.set_focused(ids[0]).unwrap();

    let (tx, rx) = mpsc::channel(8);
    tx.send(Command::MoveTabsNextWindow).await.unwrap();
    tx.send(Command::MoveTabsNextWindow).await.unwrap();
    drop(tx);
    ring.run_commands(rx).await;

    assert_eq!(browser.move_count(), 1);
    assert_eq!(browser.tab_titles(ids[1]), vec!["b0", "a0"]);
    assert_eq!(browser.tab_titles(ids[0]), vec!["a1"]);
}

#[tokio::test]
async fn test_relocation_after_guard_released() {
    let (browser, ring, ids) = simulated_ring(&[&["a0", "a1"], &["b0"]], Duration::ZERO);
    browser.set_focused(ids[0]).unwrap();

    ring.execute(Command::MoveTabsNextWindow).await.unwrap();
    browser.set_focused(ids[0]).unwrap();
    let second = ring.relocate_by_offset(1).await.unwrap();

    assert!(matches!(second, RelocateOutcome::Moved(_)));
    assert_eq!(browser.move_count(), 2);
    // The source was emptied and closed by the host
    assert_eq!(browser.window_ids(), vec![ids[1]]);
}

#[tokio::test]
async fn test_non_normal_windows_are_not_cycled() {
    let (browser, ring, ids) = simulated_ring(&[&["a"]], Duration::ZERO);
    browser.open_window(WindowKind::Popup, &["popup"]);
    browser.set_focused(ids[0]).unwrap();

    assert_eq!(
        ring.execute(Command::FocusNextWindow).await.unwrap(),
        CommandOutcome::Focus(FocusOutcome::Skipped(SkipReason::OrderTooShort))
    );
}

#[tokio::test]
async fn test_lifecycle_task_tracks_host_changes() {
    let (browser, ring, ids) = simulated_ring(&[&["a"], &["b"]], Duration::ZERO);
    ring.reconcile().await.unwrap();
    let handle = ring.spawn_lifecycle();

    let c = browser.open_window(WindowKind::Normal, &["c"]);
    browser.close_window(ids[0]).unwrap();

    let expected = Some(vec![ids[1], c]);
    for _ in 0..100 {
        if ring.store().read_order().await.unwrap() == expected {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(ring.store().read_order().await.unwrap(), expected);
    handle.abort();
}
