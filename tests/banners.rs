mod common;

use common::{harness, harness_with, png_file, settle, Harness, RecordingClipboard, Script};
use image_to_text_lib::models::config::{AppConfig, MessagesConfig};
use image_to_text_lib::models::selected_file::SelectedFile;
use std::time::Duration;
use tokio::time::advance;
use tokio_test::{assert_err, assert_ok};

fn pdf() -> SelectedFile {
    SelectedFile::new("notes.pdf", "application/pdf", vec![0x25, 0x50, 0x44, 0x46])
}

fn legacy_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.banners.reset_timer_on_show = false;
    config
}

async fn reject(h: &Harness) {
    assert_err!(h.controller.handle_file(pdf()));
    settle().await;
}

/// Run one job to a visible result. Must start with no banner timers pending.
async fn produce_result(h: &Harness) {
    let task = assert_ok!(h.controller.handle_file(png_file("a.png")));
    task.finished().await;
    settle().await;
    assert!(h.controller.state().result_text().is_some());
}

async fn step(ms: u64) {
    advance(Duration::from_millis(ms)).await;
    settle().await;
}

#[tokio::test(start_paused = true)]
async fn test_error_banner_hides_after_five_seconds() {
    let h = harness(vec![]);

    reject(&h).await;
    assert!(h.controller.state().error_banner().is_some());

    step(4_999).await;
    assert!(h.controller.state().error_banner().is_some());

    step(1).await;
    assert!(h.controller.state().banner.is_none());
    assert!(h.presenter.last().banner.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_success_banner_hides_after_three_seconds() {
    let h = harness(vec![Script::text("hello")]);

    produce_result(&h).await;
    assert_eq!(
        h.controller.state().success_banner(),
        Some(MessagesConfig::default().extracted.as_str())
    );

    step(2_999).await;
    assert!(h.controller.state().success_banner().is_some());

    step(1).await;
    assert!(h.controller.state().banner.is_none());
    // The result itself stays
    assert_eq!(h.controller.state().result_text(), Some("hello"));
}

#[tokio::test(start_paused = true)]
async fn test_repeated_error_restarts_hide_timer() {
    let h = harness(vec![]);

    reject(&h).await;
    step(2_000).await;
    reject(&h).await;

    // First timer fires at T+5 but no longer owns the banner
    step(3_000).await;
    assert!(h.controller.state().error_banner().is_some());

    step(1_999).await;
    assert!(h.controller.state().error_banner().is_some());

    step(1).await;
    assert!(h.controller.state().banner.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_legacy_timers_hide_latest_banner_early() {
    let h = harness_with(legacy_config(), vec![], RecordingClipboard::default());

    reject(&h).await;
    step(2_000).await;
    reject(&h).await;
    assert!(h.controller.state().error_banner().is_some());

    step(3_000).await;
    assert!(h.controller.state().banner.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_success_after_error_hides_on_success_timer() {
    let h = harness_with(
        legacy_config(),
        vec![Script::text("copy me")],
        RecordingClipboard::default(),
    );

    produce_result(&h).await;
    step(3_000).await;
    assert!(h.controller.state().banner.is_none());

    reject(&h).await;
    step(1_000).await;
    assert!(assert_ok!(h.controller.copy_result()));
    settle().await;

    step(2_999).await;
    assert!(h.controller.state().success_banner().is_some());

    step(1).await;
    assert!(h.controller.state().banner.is_none());

    // The error timer firing later finds nothing to hide
    step(1_000).await;
    assert!(h.controller.state().banner.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_success_replaces_error_immediately() {
    let h = harness(vec![Script::text("abc")]);

    produce_result(&h).await;
    reject(&h).await;
    assert!(h.controller.state().error_banner().is_some());

    assert!(assert_ok!(h.controller.copy_result()));
    let state = h.controller.state();
    assert_eq!(state.error_banner(), None);
    assert_eq!(state.success_banner(), Some(MessagesConfig::default().copied.as_str()));
}
