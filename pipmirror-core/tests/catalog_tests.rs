//! Integration tests for the capturable-source catalog

mod mocks;

use mocks::MockProvider;
use pipmirror_core::catalog::{SourceCatalog, TargetEntry, TargetList};
use pipmirror_core::config::MIN_WINDOW_HEIGHT;
use pipmirror_core::error::MirrorError;
use pipmirror_core::types::{CapturableTarget, DisplayInfo, WindowInfo};
use std::sync::Arc;

fn is_display(entry: &TargetEntry) -> bool {
    matches!(entry.target(), Some(CapturableTarget::Display(_)))
}

fn is_window(entry: &TargetEntry) -> bool {
    matches!(entry.target(), Some(CapturableTarget::Window(_)))
}

#[tokio::test]
async fn test_refresh_drops_menu_bar_slivers() {
    // One display, one 40pt menu-bar window and one real window
    let provider = Arc::new(MockProvider::new(
        vec![DisplayInfo::new(1)],
        vec![
            WindowInfo::new(10, 25, (30.0, 40.0)).with_app_name("Control Center"),
            WindowInfo::new(11, 0, (800.0, 200.0))
                .with_title("Inbox")
                .with_app_name("Mail"),
        ],
    ));
    let mut catalog = SourceCatalog::new(provider.clone());

    let list = catalog.refresh().await.expect("Refresh should succeed");

    assert_eq!(list.len(), 3);
    assert_eq!(
        list.entries()[0],
        TargetEntry::Target {
            target: CapturableTarget::Display(DisplayInfo::new(1)),
            label: "1".to_string(),
        }
    );
    assert!(list.entries()[1].is_separator());
    match list.entries()[2].target() {
        Some(CapturableTarget::Window(w)) => assert_eq!(w.height(), 200.0),
        other => panic!("Expected window entry, got {:?}", other),
    }
    assert_eq!(
        list.entries()[2].label(),
        "Inbox — Mail (Layer: 0, Size: 800x200)"
    );

    // Desktop-owner and off-screen windows are excluded at the provider
    assert_eq!(*provider.list_window_args.lock(), vec![(true, true)]);
}

#[test]
fn test_displays_precede_windows_and_heights_exceed_threshold() {
    let heights = [0.0, 12.0, 43.0, 48.0, 48.1, 49.0, 300.0, 1080.0];

    for display_count in 0..3u32 {
        for window_count in 0..heights.len() {
            let displays = (0..display_count).map(DisplayInfo::new).collect();
            let windows = heights[..window_count]
                .iter()
                .enumerate()
                .map(|(i, h)| WindowInfo::new(100 + i as u32, 0, (500.0, *h)))
                .collect();

            let list = TargetList::build(displays, windows, MIN_WINDOW_HEIGHT);

            let last_display = list.entries().iter().rposition(is_display);
            let first_window = list.entries().iter().position(is_window);
            if let (Some(d), Some(w)) = (last_display, first_window) {
                assert!(d < w, "display at {} after window at {}", d, w);
            }
            assert!(list.windows().all(|w| w.height() > MIN_WINDOW_HEIGHT));
            assert_eq!(list.displays().count(), display_count as usize);
        }
    }
}

#[test]
fn test_window_enumeration_order_preserved() {
    let list = TargetList::build(
        vec![],
        vec![
            WindowInfo::new(3, 0, (100.0, 100.0)),
            WindowInfo::new(1, 0, (100.0, 100.0)),
            WindowInfo::new(2, 0, (100.0, 100.0)),
        ],
        MIN_WINDOW_HEIGHT,
    );
    let ids: Vec<u32> = list.windows().map(|w| w.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_list() {
    let provider = Arc::new(MockProvider::new(
        vec![DisplayInfo::new(1), DisplayInfo::new(2)],
        vec![WindowInfo::new(5, 0, (640.0, 480.0))],
    ));
    let mut catalog = SourceCatalog::new(provider.clone());
    let before = catalog.refresh().await.expect("First refresh").clone();

    provider.set_fail_enumeration(true);
    let err = catalog.refresh().await.expect_err("Refresh should fail");

    assert!(err.to_string().contains("Listing displays"));
    assert!(matches!(
        err,
        MirrorError::WithContext { ref source, .. } if matches!(**source, MirrorError::CaptureUnavailable(_))
    ));
    assert_eq!(catalog.current(), &before);
}

#[tokio::test]
async fn test_refresh_replaces_whole_list() {
    let provider = Arc::new(MockProvider::new(
        vec![DisplayInfo::new(1)],
        vec![WindowInfo::new(5, 0, (640.0, 480.0))],
    ));
    let mut catalog = SourceCatalog::new(provider.clone());
    catalog.refresh().await.expect("First refresh");

    provider.windows.lock().clear();
    let list = catalog.refresh().await.expect("Second refresh");

    assert_eq!(list.windows().count(), 0);
    assert_eq!(list.len(), 2);
}

#[tokio::test]
async fn test_custom_height_threshold() {
    let provider = Arc::new(MockProvider::new(
        vec![],
        vec![
            WindowInfo::new(1, 0, (100.0, 60.0)),
            WindowInfo::new(2, 0, (100.0, 120.0)),
        ],
    ));
    let mut catalog = SourceCatalog::new(provider).with_min_window_height(100.0);
    let list = catalog.refresh().await.expect("Refresh should succeed");

    let ids: Vec<u32> = list.windows().map(|w| w.id).collect();
    assert_eq!(ids, vec![2]);
}
