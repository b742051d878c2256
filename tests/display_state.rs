use pdv_monitor::display::DisplayEngine;
use pdv_monitor::settings::WindowId;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::tempdir;

const TIMEOUT: Duration = Duration::from_secs(8);

fn engine(dir: &Path) -> DisplayEngine {
    DisplayEngine::new(dir, TIMEOUT)
}

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

#[test]
fn plain_text_appends_and_splits_on_separator() {
    let dir = tempdir().expect("tempdir");
    let mut engine = engine(dir.path());
    let t0 = Instant::now();

    engine.handle(WindowId::A, "linha A^linha B", t0);

    let text = engine.window(WindowId::A).text();
    assert_eq!(text, "********************\nlinha A\nlinha B");
}

#[test]
fn transaction_marker_flushes_once_per_marker() {
    let dir = tempdir().expect("tempdir");
    let mut engine = engine(dir.path());
    let t0 = Instant::now();

    engine.handle(WindowId::A, "PDV:123", t0);
    engine.handle(WindowId::A, "linha A^linha B", t0 + secs(1));
    engine.handle(WindowId::A, "PDV:456", t0 + secs(2));

    let logged =
        fs::read_to_string(dir.path().join("window_a_log.txt")).expect("transaction log exists");
    let entries: Vec<&str> = logged.split("\n\n").filter(|e| !e.is_empty()).collect();
    assert_eq!(entries.len(), 2, "one flush per marker message");

    // First flush captures what was on screen before the marker.
    assert!(entries[0].contains("********************"));
    // Second flush captures everything buffered between the two markers.
    assert!(entries[1].contains("linha A"));
    assert!(entries[1].contains("linha B"));
    assert!(!entries[0].contains("linha A"));
}

#[test]
fn marker_resets_visible_buffer_to_a_timestamp() {
    let dir = tempdir().expect("tempdir");
    let mut engine = engine(dir.path());
    let t0 = Instant::now();

    engine.handle(WindowId::B, "linha antiga", t0);
    engine.handle(WindowId::B, "PDV:123", t0 + secs(1));

    let text = engine.window(WindowId::B).text();
    assert!(!text.contains("linha antiga"));
    assert_eq!(text.lines().count(), 1, "only the timestamp line remains");
}

#[test]
fn liveness_alert_fires_after_timeout_and_clears_on_next_message() {
    let dir = tempdir().expect("tempdir");
    let mut engine = engine(dir.path());
    let t0 = Instant::now();

    engine.handle(WindowId::A, "PDV:1", t0);
    assert!(engine.window(WindowId::A).monitoring());

    engine.tick(t0 + secs(7));
    assert!(!engine.window(WindowId::A).alert_active());

    engine.tick(t0 + secs(9));
    assert!(engine.window(WindowId::A).alert_active());

    engine.handle(WindowId::A, "qualquer coisa", t0 + secs(10));
    assert!(!engine.window(WindowId::A).alert_active());
}

#[test]
fn report_segment_pauses_monitoring() {
    let dir = tempdir().expect("tempdir");
    let mut engine = engine(dir.path());
    let t0 = Instant::now();

    engine.handle(WindowId::A, "PDV:1", t0);
    engine.handle(WindowId::A, "Relatorio Gerencial", t0 + secs(1));
    assert!(!engine.window(WindowId::A).monitoring());

    engine.tick(t0 + secs(30));
    assert!(!engine.window(WindowId::A).alert_active());
}

#[test]
fn distinct_message_rearms_the_watch_from_its_own_arrival() {
    let dir = tempdir().expect("tempdir");
    let mut engine = engine(dir.path());
    let t0 = Instant::now();

    engine.handle(WindowId::A, "PDV:1", t0);
    // Distinct non-marker message at t+5 cancels the old watch and arms a
    // new one ending at t+13.
    engine.handle(WindowId::A, "linha", t0 + secs(5));

    engine.tick(t0 + secs(9));
    assert!(!engine.window(WindowId::A).alert_active());

    engine.tick(t0 + secs(14));
    assert!(engine.window(WindowId::A).alert_active());
}

#[test]
fn windows_do_not_share_state() {
    let dir = tempdir().expect("tempdir");
    let mut engine = engine(dir.path());
    let t0 = Instant::now();

    engine.handle(WindowId::A, "PDV:1", t0);
    engine.tick(t0 + secs(9));

    assert!(engine.window(WindowId::A).alert_active());
    assert!(!engine.window(WindowId::B).alert_active());
    assert!(!engine.window(WindowId::B).monitoring());
    assert!(engine.window(WindowId::B).last_event().is_none());
    assert!(!dir.path().join("window_b_log.txt").exists());
}

#[test]
fn failed_log_write_does_not_disturb_the_state_machine() {
    let dir = tempdir().expect("tempdir");
    let missing = dir.path().join("not_there");
    let mut engine = DisplayEngine::new(&missing, TIMEOUT);
    let t0 = Instant::now();

    engine.handle(WindowId::A, "PDV:1", t0);

    assert!(engine.window(WindowId::A).monitoring());
    engine.tick(t0 + secs(9));
    assert!(engine.window(WindowId::A).alert_active());
}
